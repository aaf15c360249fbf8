//! Ansible dynamic inventory backed by Foreman.
//!
//! Hosts are listed from the Foreman v2 API, their parameters resolved, and
//! every host carrying an `openshift-role` parameter is placed in one group
//! per listed role. The result is cached on disk for a configurable time.
//!
//! Pipeline, leaf first:
//!
//! - [`api`] - paginated Foreman client behind the [`api::HostSource`] trait
//! - [`params`] - parameter decoding and per-host folding
//! - [`cache`] - three-document cache with mtime-based validity
//! - [`inventory`] - role grouping, incremental persistence, run session
//! - [`output`] - sorted, pretty JSON for `--list` and `--host`
//!
//! Supporting modules: [`cli`], [`config`], [`core`] (errors), [`constants`],
//! [`utils`].

// Pipeline
pub mod api;
pub mod cache;
pub mod inventory;
pub mod output;
pub mod params;

// Supporting modules
pub mod cli;
pub mod config;
pub mod constants;
pub mod core;
pub mod utils;

// test_utils module is available for both unit tests and integration tests
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
