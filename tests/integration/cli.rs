//! The compiled binary against a mocked Foreman.

use assert_cmd::Command;
use assert_cmd::assert::OutputAssertExt;
use foreman_inventory::test_utils::fixtures::{host_detail_json, host_json, page_json, write_settings};
use predicates::prelude::*;
use serde_json::{Value, json};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Output;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

struct Fixture {
    server: MockServer,
    _temp: TempDir,
    config: PathBuf,
    cache_dir: PathBuf,
}

impl Fixture {
    async fn new(max_age: u64) -> Self {
        let server = MockServer::start().await;
        let temp = TempDir::new().unwrap();
        let cache_dir = temp.path().join("cache");
        let config = write_settings(temp.path(), &server.uri(), &cache_dir, max_age).unwrap();
        Self {
            server,
            _temp: temp,
            config,
            cache_dir,
        }
    }

    /// Three hosts: a master, a node and one without a role.
    async fn mount_hosts(&self, listing_calls: u64) {
        Mock::given(method("GET"))
            .and(path("/api/v2/hosts"))
            .respond_with(ResponseTemplate::new(200).set_body_json(page_json(
                vec![
                    host_json(1, "master1.example.com"),
                    host_json(2, "node1.example.com"),
                    host_json(3, "plain.example.com"),
                ],
                3,
                1,
            )))
            .expect(listing_calls)
            .mount(&self.server)
            .await;

        let details = [
            host_detail_json(1, "master1.example.com", &[("openshift-role", "masters, etcd")]),
            host_detail_json(
                2,
                "node1.example.com",
                &[("openshift-role", "nodes"), ("openshift_node_labels", "[\"region=infra\"]")],
            ),
            host_detail_json(3, "plain.example.com", &[("owner", "ops")]),
        ];
        for (id, detail) in (1..).zip(details) {
            Mock::given(method("GET"))
                .and(path(format!("/api/v2/hosts/{id}")))
                .respond_with(ResponseTemplate::new(200).set_body_json(detail))
                .mount(&self.server)
                .await;
        }
    }

    fn cache_file(&self, extension: &str) -> PathBuf {
        self.cache_dir.join(format!("foreman-inventory.{extension}"))
    }
}

async fn run(config: &Path, args: &[&str]) -> Output {
    let config = config.to_path_buf();
    let args: Vec<String> = args.iter().map(|a| a.to_string()).collect();
    tokio::task::spawn_blocking(move || {
        Command::cargo_bin("foreman-inventory")
            .unwrap()
            .arg("--config")
            .arg(config)
            .args(args)
            .env_remove("FOREMAN_CONFIG_PATH")
            .env_remove("RUST_LOG")
            .env("NO_COLOR", "1")
            .output()
            .unwrap()
    })
    .await
    .unwrap()
}

fn stdout_json(output: &Output) -> Value {
    serde_json::from_slice(&output.stdout).unwrap()
}

#[tokio::test(flavor = "multi_thread")]
async fn test_list_groups_hosts_by_role() {
    super::init();
    let fixture = Fixture::new(60).await;
    fixture.mount_hosts(1).await;

    let output = run(&fixture.config, &["--list"]).await;
    output.clone().assert().success();

    let inventory = stdout_json(&output);
    assert_eq!(inventory["masters"], json!(["master1.example.com"]));
    assert_eq!(inventory["etcd"], json!(["master1.example.com"]));
    assert_eq!(inventory["nodes"], json!(["node1.example.com"]));
    assert_eq!(
        inventory["_meta"]["hostvars"]["node1.example.com"],
        json!({
            "openshift-role": "nodes",
            "openshift_node_labels": ["region=infra"],
        })
    );
    assert!(inventory["_meta"]["hostvars"].get("plain.example.com").is_none());

    assert!(fixture.cache_file("cache").is_file());
    assert!(fixture.cache_file("index").is_file());
    assert!(fixture.cache_file("params").is_file());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_second_run_served_from_cache() {
    let fixture = Fixture::new(3600).await;
    fixture.mount_hosts(1).await;

    let first = run(&fixture.config, &["--list"]).await;
    let second = run(&fixture.config, &["--list"]).await;

    first.clone().assert().success();
    second.clone().assert().success();
    assert_eq!(stdout_json(&first), stdout_json(&second));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_host_prints_cached_record() {
    let fixture = Fixture::new(3600).await;
    fixture.mount_hosts(1).await;

    let output = run(&fixture.config, &["--host", "master1.example.com"]).await;
    output.clone().assert().success();

    let record = stdout_json(&output);
    assert_eq!(record["name"], json!("master1.example.com"));
    assert_eq!(record["ip"], json!("10.0.0.1"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_unknown_host_refreshes_once_and_prints_empty_object() {
    let fixture = Fixture::new(3600).await;
    fixture.mount_hosts(2).await;

    let output = run(&fixture.config, &["--host", "ghost.example.com", "--refresh-cache"]).await;

    output.clone().assert().success();
    assert_eq!(stdout_json(&output), json!({}));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_api_failure_exits_nonzero() {
    let fixture = Fixture::new(60).await;
    Mock::given(method("GET"))
        .and(path("/api/v2/hosts"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&fixture.server)
        .await;

    let output = run(&fixture.config, &["--list"]).await;

    output
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("HTTP 500"));
    assert!(!fixture.cache_file("cache").exists());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_incomplete_settings_exit_nonzero() {
    let temp = TempDir::new().unwrap();
    let config = temp.path().join("foreman.toml");
    fs::write(&config, "[foreman]\nurl = \"https://foreman.example.com\"\nuser = \"admin\"\nssl_verify = true\n")
        .unwrap();

    let output = run(&config, &["--list"]).await;

    output
        .assert()
        .code(1)
        .stderr(predicate::str::contains("missing option 'password'"));
}
