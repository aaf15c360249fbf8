//! Host parameters and their decoded values.
//!
//! Foreman delivers every parameter value as text, even list-valued ones
//! (`"[\"a\", \"b\"]"`). [`ParamValue::decode`] turns a raw value into a tagged
//! value exactly once, where the API response is parsed; everything downstream
//! (grouping, caching, rendering) works with the tagged value.
//!
//! [`resolve`] folds a host's parameter list into a [`HostParams`] map.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::warn;

use crate::api::{Host, HostSource};

/// Decoded parameters of one host, keyed by parameter name.
pub type HostParams = BTreeMap<String, ParamValue>;

/// A parameter value after boundary decoding.
///
/// Serialised untagged, so the cache and the rendered inventory contain the
/// plain string or the plain JSON structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    /// Literal text.
    Text(String),
    /// Structured value: a decoded `[...]` string, or a non-string raw value.
    Structured(Value),
}

impl ParamValue {
    /// Decodes a raw parameter value from the API.
    ///
    /// Strings starting with `[` are parsed as JSON; if that fails the text is
    /// kept verbatim and a warning is logged. Other strings stay text. Values
    /// Foreman already sent as JSON (numbers, booleans, null) stay structured.
    pub fn decode(name: &str, raw: Value) -> Self {
        match raw {
            Value::String(text) if text.starts_with('[') => {
                match serde_json::from_str::<Value>(&text) {
                    Ok(value) => Self::Structured(value),
                    Err(e) => {
                        warn!(parameter = name, error = %e, "Parameter looks like JSON but does not parse, keeping text");
                        Self::Text(text)
                    }
                }
            }
            Value::String(text) => Self::Text(text),
            other => Self::Structured(other),
        }
    }

    /// The literal text, if this is a text value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Structured(_) => None,
        }
    }
}

/// One named parameter attached to a host.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub name: String,
    pub value: ParamValue,
}

impl Parameter {
    pub fn new(name: impl Into<String>, value: ParamValue) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// Parameter entry as it appears in a Foreman host document.
#[derive(Debug, Deserialize)]
pub(crate) struct RawParameter {
    pub name: String,
    #[serde(default)]
    pub value: Value,
}

impl From<RawParameter> for Parameter {
    fn from(raw: RawParameter) -> Self {
        let value = ParamValue::decode(&raw.name, raw.value);
        Self {
            name: raw.name,
            value,
        }
    }
}

/// Collapses a parameter list into a map. Later entries win on name collisions.
pub fn fold(parameters: impl IntoIterator<Item = Parameter>) -> HostParams {
    parameters.into_iter().map(|p| (p.name, p.value)).collect()
}

/// Fetches the parameters of `host` from `source` and folds them.
pub async fn resolve<S>(source: &S, host: &Host) -> Result<HostParams>
where
    S: HostSource + ?Sized,
{
    let parameters = source.fetch_host_parameters(&host.id).await?;
    Ok(fold(parameters))
}
