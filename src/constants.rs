//! Constants shared across the inventory pipeline.
//!
//! API layout, pagination size, the role parameter name and the cache
//! defaults live here so tests and production code agree on them.

/// Collection endpoint for hosts, relative to the Foreman base URL.
pub const HOSTS_PATH: &str = "/api/v2/hosts";

/// Page size requested from every paginated Foreman endpoint.
pub const PER_PAGE: u32 = 250;

/// Host parameter holding the comma-separated role list.
pub const ROLE_PARAMETER: &str = "openshift-role";

/// Reserved top-level key of the rendered inventory.
pub const META_KEY: &str = "_meta";

/// Key under [`META_KEY`] mapping host names to their variables.
pub const HOSTVARS_KEY: &str = "hostvars";

/// Cache lifetime used when `[cache] max_age` is not configured (60 seconds).
pub const DEFAULT_CACHE_MAX_AGE_SECS: u64 = 60;

/// Cache directory used when `[cache] path` is not configured.
pub const DEFAULT_CACHE_DIR: &str = ".";

/// File stem for cache documents when the executable name cannot be determined.
pub const DEFAULT_CACHE_STEM: &str = "foreman-inventory";

/// Settings file name searched for in the fixed locations.
pub const SETTINGS_FILE_NAME: &str = "foreman.toml";

/// System-wide settings location.
pub const SYSTEM_SETTINGS_PATH: &str = "/etc/ansible/foreman.toml";

/// Environment variable naming an additional settings file.
pub const SETTINGS_PATH_ENV: &str = "FOREMAN_CONFIG_PATH";
