//! On-disk cache of the last inventory generation.
//!
//! One generation is three JSON documents in the cache directory, named after
//! the executable:
//!
//! | File             | Content                                  |
//! |------------------|------------------------------------------|
//! | `<stem>.cache`   | host name → raw host record              |
//! | `<stem>.index`   | role → host names                        |
//! | `<stem>.params`  | host name → decoded parameters           |
//!
//! Freshness is judged by the modification time of the `.cache` file alone;
//! the two companions only have to exist. Each document is replaced atomically,
//! but the three writes are independent: an interrupted refresh can leave
//! documents from different generations, which the next refresh overwrites.
//! Nothing here locks against a concurrent invocation.

use anyhow::Result;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tracing::debug;

use crate::api::Host;
use crate::config::CacheSettings;
use crate::constants::DEFAULT_CACHE_STEM;
use crate::core::InventoryError;
use crate::inventory::Inventory;
use crate::output::to_pretty_json;
use crate::params::HostParams;
use crate::utils::fs::atomic_write;

/// Everything one refresh produces.
///
/// Invariant: every name listed in `inventory` is a key of `hosts` and of
/// `params`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CacheDocument {
    /// Host name → host record.
    pub hosts: BTreeMap<String, Host>,
    /// Role → host names.
    pub inventory: Inventory,
    /// Host name → parameters.
    pub params: BTreeMap<String, HostParams>,
}

impl CacheDocument {
    pub fn is_empty(&self) -> bool {
        self.hosts.is_empty()
    }
}

/// Reads, writes and validates the cache documents.
#[derive(Debug, Clone)]
pub struct CacheStore {
    cache_path: PathBuf,
    index_path: PathBuf,
    params_path: PathBuf,
    max_age: Duration,
}

impl CacheStore {
    /// Store for `<dir>/<stem>.{cache,index,params}`.
    pub fn new(dir: impl AsRef<Path>, stem: &str, max_age: Duration) -> Self {
        let dir = dir.as_ref();
        Self {
            cache_path: dir.join(format!("{stem}.cache")),
            index_path: dir.join(format!("{stem}.index")),
            params_path: dir.join(format!("{stem}.params")),
            max_age,
        }
    }

    /// Store configured by `[cache]`, named after the running executable.
    pub fn from_settings(settings: &CacheSettings) -> Self {
        let stem = std::env::current_exe()
            .ok()
            .and_then(|exe| exe.file_stem().map(|s| s.to_string_lossy().into_owned()))
            .unwrap_or_else(|| DEFAULT_CACHE_STEM.to_string());
        Self::new(&settings.path, &stem, settings.max_age)
    }

    /// Host map document (the one whose age decides validity).
    pub fn cache_path(&self) -> &Path {
        &self.cache_path
    }

    /// Role index document.
    pub fn index_path(&self) -> &Path {
        &self.index_path
    }

    /// Parameter map document.
    pub fn params_path(&self) -> &Path {
        &self.params_path
    }

    /// Whether the stored generation can be used instead of querying the API.
    pub fn is_valid(&self) -> bool {
        self.is_valid_at(SystemTime::now())
    }

    /// [`is_valid`](Self::is_valid) evaluated at `now`.
    ///
    /// Valid when the host map exists, `mtime + max_age` is later than `now`,
    /// and both companion documents exist.
    pub fn is_valid_at(&self, now: SystemTime) -> bool {
        let Ok(modified) = fs::metadata(&self.cache_path).and_then(|m| m.modified()) else {
            debug!(path = %self.cache_path.display(), "No cache file");
            return false;
        };

        let fresh = modified.checked_add(self.max_age).is_some_and(|expires| expires > now);
        if !fresh {
            debug!(path = %self.cache_path.display(), max_age = ?self.max_age, "Cache expired");
            return false;
        }

        let complete = self.index_path.is_file() && self.params_path.is_file();
        if !complete {
            debug!("Cache companion document missing");
        }
        complete
    }

    /// Loads all three documents. Any missing or corrupt document fails the load.
    pub fn load(&self) -> Result<CacheDocument> {
        let document = CacheDocument {
            inventory: read_json(&self.index_path)?,
            params: read_json(&self.params_path)?,
            hosts: read_json(&self.cache_path)?,
        };
        debug!(hosts = document.hosts.len(), "Loaded inventory from cache");
        Ok(document)
    }

    /// Loads only the host map.
    pub fn load_hosts(&self) -> Result<BTreeMap<String, Host>> {
        read_json(&self.cache_path)
    }

    /// Writes all three documents.
    pub fn save(&self, document: &CacheDocument) -> Result<()> {
        write_json(&self.cache_path, &document.hosts)?;
        write_json(&self.index_path, &document.inventory)?;
        write_json(&self.params_path, &document.params)?;
        Ok(())
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = fs::read_to_string(path).map_err(|e| InventoryError::CacheReadError {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;

    let value = serde_json::from_str(&content).map_err(|e| InventoryError::CacheParseError {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;
    Ok(value)
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = to_pretty_json(value)?;
    atomic_write(path, json.as_bytes()).map_err(|e| InventoryError::FileSystemError {
        operation: format!("write cache document ({e:#})"),
        path: path.display().to_string(),
    })?;
    Ok(())
}
