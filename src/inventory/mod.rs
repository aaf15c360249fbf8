//! Role grouping.
//!
//! Hosts join groups through the `openshift-role` parameter, a comma-separated
//! list such as `"master,etcd"`. Each role becomes an Ansible group name after
//! [`sanitize_group_name`]; hosts without the parameter are left out of the
//! inventory entirely.
//!
//! - [`Inventory`] - role → ordered host names
//! - [`InventoryBuilder`] - one full pass over a [`HostSource`](crate::api::HostSource)
//! - [`InventorySession`] - owns source, store and current generation for one run

mod builder;
mod session;

pub use builder::InventoryBuilder;
pub use session::InventorySession;

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::LazyLock;

use crate::params::HostParams;
use crate::constants::ROLE_PARAMETER;

static UNSAFE_GROUP_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9_]").expect("group name pattern is valid"));

/// Replaces every character outside `[A-Za-z0-9_]` (whitespace included) with `_`.
///
/// Idempotent: the output only contains allowed characters.
pub fn sanitize_group_name(role: &str) -> String {
    UNSAFE_GROUP_CHARS.replace_all(role, "_").into_owned()
}

/// Splits a role list into sanitised group names.
///
/// Segments are trimmed before sanitising so `"master, node"` yields
/// `master` and `node`; segments that are empty after trimming are dropped.
pub fn role_names(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .map(sanitize_group_name)
        .collect()
}

/// Group names for a host, or `None` if the host does not take part in the
/// inventory (no role parameter, a structured role value, or no non-empty role).
pub fn roles_for(params: &HostParams) -> Option<Vec<String>> {
    let value = params.get(ROLE_PARAMETER)?.as_text()?;
    let roles = role_names(value);
    (!roles.is_empty()).then_some(roles)
}

/// Role → host names, in discovery order. A name may repeat within a group.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Inventory(BTreeMap<String, Vec<String>>);

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `host` to `group`, creating the group on first use.
    pub fn push(&mut self, group: impl Into<String>, host: impl Into<String>) {
        self.0.entry(group.into()).or_default().push(host.into());
    }

    pub fn get(&self, group: &str) -> Option<&[String]> {
        self.0.get(group).map(Vec::as_slice)
    }

    pub fn contains_group(&self, group: &str) -> bool {
        self.0.contains_key(group)
    }

    /// Groups in lexicographic order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0.iter().map(|(group, hosts)| (group.as_str(), hosts.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
