//! Access to the host-management service.
//!
//! [`HostSource`] is the seam between the inventory builder and the network:
//! [`ForemanClient`] implements it over HTTP, tests implement it in memory.

mod client;
mod models;

pub use client::ForemanClient;
pub use models::{Host, HostId};

use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

use crate::params::Parameter;

/// Something that can list hosts and their parameters.
#[async_trait]
pub trait HostSource: Send + Sync {
    /// Every host known to the source, in the order the source returns them.
    async fn fetch_hosts(&self) -> Result<Vec<Host>>;

    /// Parameters of one host, in source order. An unknown host has none.
    async fn fetch_host_parameters(&self, id: &HostId) -> Result<Vec<Parameter>>;
}

#[async_trait]
impl<T: HostSource + ?Sized> HostSource for Arc<T> {
    async fn fetch_hosts(&self) -> Result<Vec<Host>> {
        (**self).fetch_hosts().await
    }

    async fn fetch_host_parameters(&self, id: &HostId) -> Result<Vec<Parameter>> {
        (**self).fetch_host_parameters(id).await
    }
}
