//! JSON rendering for Ansible.
//!
//! `--list` output has one key per group plus `_meta.hostvars`, which carries
//! each host's decoded parameters so Ansible never has to call `--host`:
//!
//! ```json
//! {
//!   "_meta": {
//!     "hostvars": {
//!       "node1.example.com": { "openshift-role": "nodes" }
//!     }
//!   },
//!   "nodes": [
//!     "node1.example.com"
//!   ]
//! }
//! ```
//!
//! All JSON this crate writes, including the cache documents, goes through
//! [`to_pretty_json`]: two-space indentation and lexicographically sorted keys.

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::{Map, Value, json};
use tracing::warn;

use crate::api::Host;
use crate::cache::CacheDocument;
use crate::constants::{HOSTVARS_KEY, META_KEY};

/// Serialises `value` as indented JSON with object keys sorted.
pub fn to_pretty_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    // Going through `Value` sorts every object, including struct fields.
    let value = serde_json::to_value(value).context("Failed to serialize JSON")?;
    serde_json::to_string_pretty(&value).context("Failed to format JSON")
}

/// Renders the full inventory (`--list`).
pub fn render_all(document: &CacheDocument) -> Result<String> {
    let mut root = Map::new();

    for (group, hosts) in document.inventory.iter() {
        root.insert(group.to_string(), json!(hosts));
    }

    let hostvars: Map<String, Value> = document
        .hosts
        .keys()
        .map(|name| {
            let vars = document
                .params
                .get(name)
                .map(serde_json::to_value)
                .transpose()?
                .unwrap_or_else(|| json!({}));
            Ok((name.clone(), vars))
        })
        .collect::<Result<_, serde_json::Error>>()
        .context("Failed to serialize host variables")?;

    if root.contains_key(META_KEY) {
        warn!(group = META_KEY, "Group name collides with the reserved meta key and is dropped");
    }
    root.insert(META_KEY.to_string(), json!({ HOSTVARS_KEY: hostvars }));

    to_pretty_json(&root)
}

/// Renders one host's record (`--host`), or `{}` for an unknown host.
pub fn render_host(host: Option<&Host>) -> Result<String> {
    match host {
        Some(host) => to_pretty_json(host),
        None => to_pretty_json(&json!({})),
    }
}
