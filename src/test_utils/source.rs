use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::api::{Host, HostId, HostSource};
use crate::params::{ParamValue, Parameter};

/// A fixed set of hosts served from memory.
///
/// Parameters are decoded the same way the HTTP client decodes them, so
/// `"[...]"` values become structured.
#[derive(Debug, Default)]
pub struct StaticHostSource {
    hosts: Vec<Host>,
    parameters: HashMap<String, Vec<Parameter>>,
    host_list_calls: AtomicUsize,
    parameter_calls: AtomicUsize,
}

impl StaticHostSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a host with text parameters, in the given order.
    pub fn with_host(mut self, id: u64, name: &str, params: &[(&str, &str)]) -> Self {
        let host = Host::new(id, name);
        let parameters = params
            .iter()
            .map(|(key, value)| {
                Parameter::new(*key, ParamValue::decode(key, Value::String((*value).to_string())))
            })
            .collect();
        self.parameters.insert(host.id.to_string(), parameters);
        self.hosts.push(host);
        self
    }

    /// Number of `fetch_hosts` calls so far.
    pub fn host_list_calls(&self) -> usize {
        self.host_list_calls.load(Ordering::SeqCst)
    }

    /// Number of `fetch_host_parameters` calls so far.
    pub fn parameter_calls(&self) -> usize {
        self.parameter_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl HostSource for StaticHostSource {
    async fn fetch_hosts(&self) -> Result<Vec<Host>> {
        self.host_list_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.hosts.clone())
    }

    async fn fetch_host_parameters(&self, id: &HostId) -> Result<Vec<Parameter>> {
        self.parameter_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.parameters.get(&id.to_string()).cloned().unwrap_or_default())
    }
}
