//! Shared helpers.
//!
//! - [`fs`] - directory creation and atomic file replacement

pub mod fs;

pub use fs::{atomic_write, ensure_dir};
