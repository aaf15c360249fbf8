//! Settings discovery and loading.
//!
//! Settings live in TOML files with two sections:
//!
//! ```toml
//! [foreman]
//! url = "https://foreman.example.com"
//! user = "admin"
//! password = "secret"
//! ssl_verify = true
//!
//! [cache]
//! path = "~/.cache/foreman-inventory"   # default "."
//! max_age = 60                           # seconds, default 60
//! ```
//!
//! # Search order
//!
//! Every existing file below is read, in this order, and later files override
//! individual keys of earlier ones:
//!
//! 1. `/etc/ansible/foreman.toml`
//! 2. `foreman.toml` next to the executable
//! 3. the file named by `$FOREMAN_CONFIG_PATH` (`~` and `$VAR` are expanded)
//! 4. the file given with `--config`
//!
//! A file that exists but does not parse is an error. After merging, the four
//! `[foreman]` keys are required; `[cache]` keys fall back to defaults.

use anyhow::Result;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

use crate::constants::{
    DEFAULT_CACHE_DIR, DEFAULT_CACHE_MAX_AGE_SECS, SETTINGS_FILE_NAME, SETTINGS_PATH_ENV,
    SYSTEM_SETTINGS_PATH,
};
use crate::core::InventoryError;

/// Connection settings for the Foreman API (`[foreman]`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForemanSettings {
    /// Base URL, e.g. `https://foreman.example.com`.
    pub url: String,
    pub user: String,
    pub password: String,
    /// Verify the server's TLS certificate.
    pub ssl_verify: bool,
}

/// Cache location and lifetime (`[cache]`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheSettings {
    /// Directory holding the three cache documents.
    pub path: PathBuf,
    /// How long a cache generation stays valid.
    pub max_age: Duration,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_CACHE_DIR),
            max_age: Duration::from_secs(DEFAULT_CACHE_MAX_AGE_SECS),
        }
    }
}

/// Fully resolved settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub foreman: ForemanSettings,
    pub cache: CacheSettings,
}

/// One settings file as written; every key optional so files can be layered.
#[derive(Debug, Default, Deserialize)]
struct SettingsFile {
    #[serde(default)]
    foreman: ForemanSection,
    #[serde(default)]
    cache: CacheSection,
}

#[derive(Debug, Default, Deserialize)]
struct ForemanSection {
    url: Option<String>,
    user: Option<String>,
    password: Option<String>,
    ssl_verify: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
struct CacheSection {
    path: Option<String>,
    max_age: Option<u64>,
}

impl SettingsFile {
    fn merge(&mut self, other: Self) {
        let Self { foreman, cache } = other;
        self.foreman.url = foreman.url.or(self.foreman.url.take());
        self.foreman.user = foreman.user.or(self.foreman.user.take());
        self.foreman.password = foreman.password.or(self.foreman.password.take());
        self.foreman.ssl_verify = foreman.ssl_verify.or(self.foreman.ssl_verify);
        self.cache.path = cache.path.or(self.cache.path.take());
        self.cache.max_age = cache.max_age.or(self.cache.max_age);
    }
}

fn require<T>(value: Option<T>, key: &str) -> Result<T> {
    value.ok_or_else(|| {
        InventoryError::ConfigError {
            message: format!("missing option '{key}' in section [foreman]"),
        }
        .into()
    })
}

impl Settings {
    /// Loads settings from the standard locations plus an optional explicit file.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let env_override = std::env::var(SETTINGS_PATH_ENV).ok();
        let paths = Self::search_paths(env_override.as_deref(), explicit);
        Self::load_from_paths(&paths)
    }

    /// The candidate settings files, lowest precedence first.
    pub fn search_paths(env_override: Option<&str>, explicit: Option<&Path>) -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(SYSTEM_SETTINGS_PATH)];

        if let Some(dir) = std::env::current_exe().ok().and_then(|exe| exe.parent().map(Path::to_path_buf)) {
            paths.push(dir.join(SETTINGS_FILE_NAME));
        }

        if let Some(value) = env_override.filter(|v| !v.is_empty()) {
            let expanded = shellexpand::full(value)
                .map(|s| s.into_owned())
                .unwrap_or_else(|_| value.to_string());
            paths.push(PathBuf::from(expanded));
        }

        if let Some(path) = explicit {
            paths.push(path.to_path_buf());
        }

        paths
    }

    /// Reads and merges every existing file in `paths`.
    ///
    /// # Errors
    ///
    /// - [`InventoryError::ConfigError`] if no file exists or a required key is
    ///   missing after merging
    /// - [`InventoryError::ConfigParseError`] if a file cannot be parsed
    pub fn load_from_paths(paths: &[PathBuf]) -> Result<Self> {
        let mut merged = SettingsFile::default();
        let mut found = false;

        for path in paths {
            if !path.is_file() {
                continue;
            }
            debug!(path = %path.display(), "Reading settings");
            merged.merge(Self::read_file(path)?);
            found = true;
        }

        if !found {
            let searched: Vec<String> = paths.iter().map(|p| p.display().to_string()).collect();
            return Err(InventoryError::ConfigError {
                message: format!("no settings file found (searched: {})", searched.join(", ")),
            }
            .into());
        }

        Self::from_file(merged)
    }

    /// Parses a single settings document.
    pub fn from_toml(content: &str) -> Result<Self> {
        let file: SettingsFile = toml::from_str(content).map_err(|e| InventoryError::ConfigParseError {
            file: "<inline>".to_string(),
            reason: e.to_string(),
        })?;
        Self::from_file(file)
    }

    fn read_file(path: &Path) -> Result<SettingsFile> {
        let content = fs::read_to_string(path).map_err(|e| InventoryError::ConfigParseError {
            file: path.display().to_string(),
            reason: e.to_string(),
        })?;

        let file = toml::from_str(&content).map_err(|e| InventoryError::ConfigParseError {
            file: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Ok(file)
    }

    fn from_file(file: SettingsFile) -> Result<Self> {
        let SettingsFile { foreman, cache } = file;

        let foreman = ForemanSettings {
            url: require(foreman.url, "url")?,
            user: require(foreman.user, "user")?,
            password: require(foreman.password, "password")?,
            ssl_verify: require(foreman.ssl_verify, "ssl_verify")?,
        };

        let defaults = CacheSettings::default();
        let cache = CacheSettings {
            path: cache
                .path
                .map(|p| PathBuf::from(shellexpand::tilde(&p).into_owned()))
                .unwrap_or(defaults.path),
            max_age: cache.max_age.map(Duration::from_secs).unwrap_or(defaults.max_age),
        };

        Ok(Self { foreman, cache })
    }
}
