//! Tests for the smoke driver binary and its configuration file.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use std::io::Write;
use std::process::Command;

use kvssd::{Backend, KvssdConfig};
use pretty_assertions::assert_eq;
use tempfile::NamedTempFile;

fn smoke() -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_kvssd-smoke"));
    command.env_remove("KVSSD_BACKEND");
    command.env_remove("KVSSD_SHARD_AMOUNT");
    command.env("RUST_LOG", "warn");
    command
}

fn config_file(json: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create temporary config file");
    file.write_all(json.as_bytes())
        .expect("Failed to write config file");
    file
}

#[test]
fn config_file_parses() {
    let file = config_file(r#"{ "backend": "sharded", "shard_amount": 8 }"#);
    let text = std::fs::read_to_string(file.path()).unwrap();
    let config: KvssdConfig = serde_json::from_str(&text).unwrap();

    assert_eq!(
        config,
        KvssdConfig::new()
            .with_backend(Backend::Sharded)
            .with_shard_amount(8)
    );
}

#[test]
fn config_file_defaults_missing_fields() {
    let config: KvssdConfig = serde_json::from_str(r#"{ "backend": "sharded" }"#).unwrap();
    assert_eq!(config.backend, Backend::Sharded);
    assert_eq!(config.shard_amount, KvssdConfig::default().shard_amount);

    let config: KvssdConfig = serde_json::from_str("{}").unwrap();
    assert_eq!(config, KvssdConfig::default());
}

#[test]
fn smoke_default_backend() {
    let status = smoke().status().unwrap();
    assert!(status.success());
}

#[test]
fn smoke_sharded_with_bulk_run() {
    let status = smoke()
        .args(["--backend", "sharded", "--shard-amount", "16", "--keys", "200"])
        .status()
        .unwrap();
    assert!(status.success());
}

#[test]
fn smoke_from_config_file() {
    let file = config_file(r#"{ "backend": "sharded", "shard_amount": 4 }"#);
    let status = smoke()
        .arg("--config")
        .arg(file.path())
        .args(["--keys", "20"])
        .status()
        .unwrap();
    assert!(status.success());
}

#[test]
fn smoke_rejects_unsupported_backend() {
    let output = smoke().args(["--backend", "kvssd"]).output().unwrap();
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("not supported"), "{stderr}");
}

#[test]
fn smoke_rejects_bad_shard_amount() {
    let output = smoke()
        .args(["--backend", "sharded", "--shard-amount", "12"])
        .output()
        .unwrap();
    assert!(!output.status.success());
}

#[test]
fn smoke_rejects_malformed_config() {
    let file = config_file("{ not json");
    let output = smoke().arg("--config").arg(file.path()).output().unwrap();
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Failed to parse"), "{stderr}");
}
