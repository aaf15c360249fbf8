//! Cache validity and persistence on a real filesystem.

use foreman_inventory::api::Host;
use foreman_inventory::cache::{CacheDocument, CacheStore};
use foreman_inventory::core::InventoryError;
use foreman_inventory::params::{HostParams, ParamValue};
use serde_json::json;
use std::fs::{self, File};
use std::time::{Duration, SystemTime};
use tempfile::TempDir;

fn document() -> CacheDocument {
    let mut document = CacheDocument::default();
    for (id, name, roles) in [
        (1, "m1.example.com", vec!["masters", "etcd"]),
        (2, "n1.example.com", vec!["nodes"]),
        (3, "n2.example.com", vec!["nodes", "nodes"]),
    ] {
        let mut host = Host::new(id, name);
        host.attributes.insert("environment_name".to_string(), json!("production"));
        document.hosts.insert(name.to_string(), host);

        let mut params = HostParams::new();
        params.insert("openshift-role".to_string(), ParamValue::Text(roles.join(",")));
        params.insert("labels".to_string(), ParamValue::Structured(json!({"region": "primary"})));
        document.params.insert(name.to_string(), params);

        for role in roles {
            document.inventory.push(role, name);
        }
    }
    document
}

fn set_mtime(path: &std::path::Path, time: SystemTime) {
    File::options().write(true).open(path).unwrap().set_modified(time).unwrap();
}

#[test]
fn test_round_trip_preserves_document() {
    let temp = TempDir::new().unwrap();
    let store = CacheStore::new(temp.path(), "inventory", Duration::from_secs(60));
    let original = document();

    store.save(&original).unwrap();
    let loaded = store.load().unwrap();

    assert_eq!(loaded, original);
    assert_eq!(
        loaded.inventory.get("nodes").unwrap(),
        &["n1.example.com".to_string(), "n2.example.com".to_string(), "n2.example.com".to_string()]
    );
}

#[test]
fn test_validity_boundary() {
    let temp = TempDir::new().unwrap();
    let store = CacheStore::new(temp.path(), "inventory", Duration::from_secs(60));
    store.save(&document()).unwrap();

    let now = SystemTime::now();
    set_mtime(store.cache_path(), now);
    assert!(store.is_valid_at(now));

    set_mtime(store.cache_path(), now - Duration::from_secs(61));
    assert!(!store.is_valid_at(now));
    assert!(!store.is_valid());
}

#[test]
fn test_only_primary_age_matters() {
    let temp = TempDir::new().unwrap();
    let store = CacheStore::new(temp.path(), "inventory", Duration::from_secs(60));
    store.save(&document()).unwrap();

    let old = SystemTime::now() - Duration::from_secs(3600);
    set_mtime(store.index_path(), old);
    set_mtime(store.params_path(), old);

    assert!(store.is_valid());
}

#[test]
fn test_missing_inventory_companion_invalidates() {
    let temp = TempDir::new().unwrap();
    let store = CacheStore::new(temp.path(), "inventory", Duration::from_secs(60));
    store.save(&document()).unwrap();

    fs::remove_file(store.index_path()).unwrap();

    assert!(!store.is_valid());
}

#[test]
fn test_corrupt_companion_fails_whole_load() {
    let temp = TempDir::new().unwrap();
    let store = CacheStore::new(temp.path(), "inventory", Duration::from_secs(60));
    store.save(&document()).unwrap();

    fs::write(store.params_path(), "{ not json").unwrap();

    let err = store.load().unwrap_err();
    assert!(matches!(
        err.downcast_ref::<InventoryError>(),
        Some(InventoryError::CacheParseError { .. })
    ));
}

#[test]
fn test_save_creates_cache_directory() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path().join("var").join("cache");
    let store = CacheStore::new(&dir, "inventory", Duration::from_secs(60));

    store.save(&document()).unwrap();

    assert!(dir.join("inventory.cache").is_file());
    assert!(dir.join("inventory.index").is_file());
    assert!(dir.join("inventory.params").is_file());
}

#[test]
fn test_load_hosts_reads_only_primary() {
    let temp = TempDir::new().unwrap();
    let store = CacheStore::new(temp.path(), "inventory", Duration::from_secs(60));
    store.save(&document()).unwrap();
    fs::remove_file(store.params_path()).unwrap();

    let hosts = store.load_hosts().unwrap();
    assert_eq!(hosts.len(), 3);
    assert!(store.load().is_err());
}
