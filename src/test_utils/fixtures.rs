//! Foreman API payloads and settings files for tests.

use anyhow::{Context, Result};
use serde_json::{Value, json};
use std::fs;
use std::path::{Path, PathBuf};

/// A host record as listed by `/api/v2/hosts`.
pub fn host_json(id: u64, name: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "ip": format!("10.0.0.{}", id % 256),
        "operatingsystem_name": "RedHat 7.5",
        "hostgroup_name": "openshift",
    })
}

/// One page of a collection response.
pub fn page_json(results: Vec<Value>, total: u64, page: u32) -> Value {
    json!({
        "total": total,
        "subtotal": total,
        "page": page,
        "per_page": crate::constants::PER_PAGE,
        "search": null,
        "results": results,
    })
}

/// `count` consecutive host records starting at `first_id`.
pub fn host_range(first_id: u64, count: u64) -> Vec<Value> {
    (first_id..first_id + count).map(|id| host_json(id, &format!("host{id}.example.com"))).collect()
}

/// A `/api/v2/hosts/{id}` document carrying the given parameters.
pub fn host_detail_json(id: u64, name: &str, params: &[(&str, &str)]) -> Value {
    let all_parameters: Vec<Value> = params
        .iter()
        .enumerate()
        .map(|(i, (key, value))| {
            json!({
                "priority": 60,
                "created_at": "2018-03-01T10:00:00.000Z",
                "updated_at": "2018-03-01T10:00:00.000Z",
                "id": i + 1,
                "name": key,
                "value": value,
            })
        })
        .collect();

    let mut detail = host_json(id, name);
    detail["all_parameters"] = Value::Array(all_parameters);
    detail
}

/// Settings TOML pointing at `url` with the cache in `cache_dir`.
pub fn settings_toml(url: &str, cache_dir: &Path, max_age: u64) -> String {
    format!(
        "[foreman]\nurl = \"{url}\"\nuser = \"admin\"\npassword = \"changeme\"\nssl_verify = false\n\n[cache]\npath = \"{}\"\nmax_age = {max_age}\n",
        cache_dir.display().to_string().replace('\\', "\\\\"),
    )
}

/// Writes [`settings_toml`] to `<dir>/foreman.toml` and returns its path.
pub fn write_settings(dir: &Path, url: &str, cache_dir: &Path, max_age: u64) -> Result<PathBuf> {
    let path = dir.join(crate::constants::SETTINGS_FILE_NAME);
    fs::write(&path, settings_toml(url, cache_dir, max_age))
        .with_context(|| format!("Failed to write settings to {}", path.display()))?;
    Ok(path)
}
