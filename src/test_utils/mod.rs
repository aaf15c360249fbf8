//! Test helpers shared by unit and integration tests.
//!
//! Available in `#[cfg(test)]` builds and to integration tests through the
//! `test-utils` feature.
//!
//! - [`init_test_logging`] - one-time tracing setup honouring `RUST_LOG`
//! - [`StaticHostSource`] - in-memory [`HostSource`](crate::api::HostSource) with call counters
//! - [`fixtures`] - Foreman JSON payloads and settings files

pub mod fixtures;
mod source;

pub use source::StaticHostSource;

use std::sync::Once;
use tracing::Level;
use tracing_subscriber::EnvFilter;

static INIT_LOGGING: Once = Once::new();

/// Initialize logging for tests, once per process.
///
/// Uses `level` if given, otherwise `RUST_LOG`; with neither, logging stays off.
///
/// ```bash
/// RUST_LOG=foreman_inventory=debug cargo test
/// ```
pub fn init_test_logging(level: Option<Level>) {
    INIT_LOGGING.call_once(|| {
        let filter = if let Some(level) = level {
            EnvFilter::new(level.to_string())
        } else if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .try_init();
    });
}
