//! Wire types of the Foreman v2 API.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

use crate::params::RawParameter;

/// Opaque host identifier, kept exactly as Foreman sent it.
///
/// Foreman uses integers, but nothing here depends on that.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HostId(pub Value);

impl fmt::Display for HostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Value::String(s) => f.write_str(s),
            other => write!(f, "{other}"),
        }
    }
}

impl From<u64> for HostId {
    fn from(id: u64) -> Self {
        Self(Value::from(id))
    }
}

/// A host record from `/api/v2/hosts`.
///
/// Only `id` and `name` are interpreted; every other attribute is carried
/// through to the cache untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Host {
    pub id: HostId,
    /// DNS name, used as the inventory host name.
    pub name: String,
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

impl Host {
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id: HostId::from(id),
            name: name.into(),
            attributes: Map::new(),
        }
    }
}

/// One page of a paginated collection.
#[derive(Debug, Deserialize)]
pub(crate) struct Page<T> {
    pub results: Vec<T>,
    /// Size of the whole collection across all pages.
    #[serde(default)]
    pub total: u64,
}

/// The parts of `/api/v2/hosts/{id}` this crate reads.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct HostDetail {
    #[serde(default)]
    pub all_parameters: Vec<RawParameter>,
}
