//! Core types shared by every stage of the pipeline.
//!
//! Currently this is the error system; see [`error`].

pub mod error;

pub use error::{ErrorContext, InventoryError, user_friendly_error};
