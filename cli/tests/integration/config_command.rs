//! Integration tests for `hb-deploy config`.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn hb_deploy(config: &str) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("hb-deploy"));
    cmd.env("NO_COLOR", "1").env("HB_DEPLOY_CONFIG", config);
    cmd
}

/// Returns a `TempDir` and the path string for a config file inside it.
fn temp_config_path() -> (TempDir, String) {
    let dir = TempDir::new().expect("temp dir");
    let path = dir
        .path()
        .join("config.yaml")
        .to_string_lossy()
        .into_owned();
    (dir, path)
}

#[test]
fn test_config_help_shows_subcommands() {
    let (_dir, path) = temp_config_path();
    hb_deploy(&path)
        .args(["config", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("show"))
        .stdout(predicate::str::contains("path"))
        .stdout(predicate::str::contains("set"));
}

#[test]
fn test_config_path_prints_override() {
    let (_dir, path) = temp_config_path();
    hb_deploy(&path)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains(path.as_str()));
}

#[test]
fn test_config_show_without_file_shows_default_timeouts() {
    let (_dir, path) = temp_config_path();
    hb_deploy(&path)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("pack: 120"))
        .stdout(predicate::str::contains("HB_DEPLOY_CONFIG"));
    assert!(!std::path::Path::new(&path).exists(), "show must not create the file");
}

#[test]
fn test_config_set_persists_value() {
    let (_dir, path) = temp_config_path();
    hb_deploy(&path)
        .args(["config", "set", "pi.host", "192.168.1.20"])
        .assert()
        .success();

    let content = std::fs::read_to_string(&path).unwrap();
    assert!(content.contains("host: 192.168.1.20"), "file: {content}");

    hb_deploy(&path)
        .args(["config", "show", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("192.168.1.20"));
}

#[cfg(unix)]
#[test]
fn test_config_set_writes_private_file() {
    use std::os::unix::fs::PermissionsExt;

    let (_dir, path) = temp_config_path();
    hb_deploy(&path)
        .args(["config", "set", "vm.user", "admin"])
        .assert()
        .success();

    let mode = std::fs::metadata(&path).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o600);
}

#[test]
fn test_config_set_unknown_key_fails() {
    let (_dir, path) = temp_config_path();
    hb_deploy(&path)
        .args(["config", "set", "vm.password", "x"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("vm.password"));
    assert!(!std::path::Path::new(&path).exists());
}

#[test]
fn test_config_set_invalid_port_fails() {
    let (_dir, path) = temp_config_path();
    hb_deploy(&path)
        .args(["config", "set", "pi.port", "70000"])
        .assert()
        .code(1);
}

#[test]
fn test_config_set_invalid_cleanup_fails() {
    let (_dir, path) = temp_config_path();
    hb_deploy(&path)
        .args(["config", "set", "local.cleanup", "sometimes"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("keep"));
}
