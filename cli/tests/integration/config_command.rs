//! Integration tests for `skiff config`.
//!
//! Every test points `SKIFF_CONFIG` at a temp path so it never reads or
//! writes `~/.skiff/config.yaml`.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn skiff() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("skiff"));
    cmd.env("NO_COLOR", "1");
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
    skiff()
        .args(["config", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("show"))
        .stdout(predicate::str::contains("set"))
        .stdout(predicate::str::contains("path"));
}

#[test]
fn test_config_show_without_file_prints_defaults() {
    let (_dir, path) = temp_config_path();
    skiff()
        .args(["config", "show"])
        .env("SKIFF_CONFIG", &path)
        .assert()
        .success()
        .stdout(predicate::str::contains("cli: ccloud"))
        .stdout(predicate::str::contains("interval_secs: 10"))
        .stdout(predicate::str::contains("timeout_secs: 600"));
}

#[test]
fn test_config_show_does_not_create_file() {
    let (_dir, path) = temp_config_path();
    skiff()
        .args(["config", "show"])
        .env("SKIFF_CONFIG", &path)
        .assert()
        .success();
    assert!(!std::path::Path::new(&path).exists());
}

#[test]
fn test_config_path_honours_env_and_flag() {
    let (_dir, path) = temp_config_path();
    skiff()
        .args(["config", "path"])
        .env("SKIFF_CONFIG", &path)
        .assert()
        .success()
        .stdout(predicate::str::contains(path.as_str()));

    let (_dir2, other) = temp_config_path();
    skiff()
        .args(["--config", &other, "config", "path"])
        .env("SKIFF_CONFIG", &path)
        .assert()
        .success()
        .stdout(predicate::str::contains(other.as_str()));
}

#[test]
fn test_config_set_persists_and_show_reflects_it() {
    let (_dir, path) = temp_config_path();
    skiff()
        .args(["config", "set", "instance.cpus", "8"])
        .env("SKIFF_CONFIG", &path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Set instance.cpus = 8"));

    let content = std::fs::read_to_string(&path).expect("config written");
    assert!(content.contains("cpus: 8"), "got: {content}");

    skiff()
        .args(["--json", "config", "show"])
        .env("SKIFF_CONFIG", &path)
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""cpus": 8"#));
}

#[test]
fn test_config_set_teardown_strategy_list() {
    let (_dir, path) = temp_config_path();
    skiff()
        .args(["config", "set", "teardown.strategy", "graceful"])
        .env("SKIFF_CONFIG", &path)
        .assert()
        .success();
    let content = std::fs::read_to_string(&path).expect("config written");
    assert!(content.contains("- graceful"), "got: {content}");
    assert!(!content.contains("- forced"), "got: {content}");
}

#[test]
fn test_config_set_unknown_key_fails_without_writing() {
    let (_dir, path) = temp_config_path();
    skiff()
        .args(["config", "set", "instance.gpus", "2"])
        .env("SKIFF_CONFIG", &path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown setting: instance.gpus"));
    assert!(!std::path::Path::new(&path).exists());
}

#[test]
fn test_config_set_invalid_value_fails() {
    let (_dir, path) = temp_config_path();
    skiff()
        .args(["config", "set", "provider.output_format", "xml"])
        .env("SKIFF_CONFIG", &path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid value"));
}

#[test]
fn test_config_show_rejects_malformed_file() {
    let (_dir, path) = temp_config_path();
    std::fs::write(&path, "instance: [not, a, map\n").expect("write");
    skiff()
        .args(["config", "show"])
        .env("SKIFF_CONFIG", &path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot parse"));
}
