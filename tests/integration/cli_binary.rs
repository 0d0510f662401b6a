//! Integration tests for the `cardgen` binary: exit codes and fatal startup errors.
//!
//! Each test runs with an isolated HOME / XDG_CONFIG_HOME so user configuration cannot leak in.

use super::test_utils::{touch_artifact, write_manifest, SCENARIO_MANIFEST};
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

fn cardgen(temp: &Path, root: &Path, args: &[&str], api_key: Option<&str>) -> Output {
    let home = temp.join("home");
    std::fs::create_dir_all(&home).unwrap();

    let mut cmd = Command::new(env!("CARGO_BIN_EXE_cardgen"));
    cmd.env("HOME", &home)
        .env("XDG_CONFIG_HOME", home.join(".config"))
        .env_remove("GEMINI_API_KEY")
        .env_remove("CARDGEN_LOG")
        .env_remove("CARDGEN_ENV")
        .arg("--quiet")
        .arg("--root")
        .arg(root)
        .args(args);
    if let Some(key) = api_key {
        cmd.env("GEMINI_API_KEY", key);
    }
    cmd.output().unwrap()
}

#[test]
fn test_missing_credential_aborts_without_writing() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("project");
    write_manifest(&root, SCENARIO_MANIFEST);

    let output = cardgen(temp.path(), &root, &[], None);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("GEMINI_API_KEY"), "stderr: {}", stderr);
    assert!(!root.join("public").exists());
}

#[test]
fn test_missing_manifest_exits_non_zero() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("project");
    std::fs::create_dir_all(&root).unwrap();

    let output = cardgen(temp.path(), &root, &["generate"], Some("dummy-key"));

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("manifest not found"), "stderr: {}", stderr);
}

#[test]
fn test_fully_generated_set_exits_zero_without_requests() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("project");
    write_manifest(&root, SCENARIO_MANIFEST);
    touch_artifact(&root.join("public"), "img/apple.png");

    // Point the service at a port nothing listens on; any request would fail loudly.
    let config = temp.path().join("cardgen.toml");
    std::fs::write(
        &config,
        r#"
[provider]
endpoint = "http://127.0.0.1:9/v1beta"
"#,
    )
    .unwrap();

    let output = cardgen(
        temp.path(),
        &root,
        &["--config", config.to_str().unwrap(), "generate"],
        Some("dummy-key"),
    );

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("img/b.png (frozen)"), "stdout: {}", stdout);
    assert!(stdout.contains("(3 records)"), "stdout: {}", stdout);
    assert!(!stdout.contains("Generating:"));
}

#[test]
fn test_dry_run_needs_no_credential() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("project");
    write_manifest(&root, SCENARIO_MANIFEST);

    let output = cardgen(temp.path(), &root, &["generate", "--dry-run"], None);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("1 to generate"), "stdout: {}", stdout);
    assert!(!root.join("public").exists());
}

#[test]
fn test_status_json() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("project");
    write_manifest(&root, SCENARIO_MANIFEST);

    let output = cardgen(temp.path(), &root, &["status", "--format", "json"], None);

    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["counts"]["total"], 3);
    assert_eq!(value["counts"]["frozen"], 1);
}
