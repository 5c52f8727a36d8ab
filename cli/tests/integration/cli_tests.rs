//! Integration tests for the skiff CLI surface: help, version, global flags
//! and argument errors.

#![allow(clippy::expect_used)]

use assert_cmd::Command;
use predicates::prelude::*;

fn skiff() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("skiff"));
    cmd.env("NO_COLOR", "1");
    cmd
}

// --- Help and version tests ---

#[test]
fn test_cli_no_args_shows_help_and_exits_two() {
    // clap with arg_required_else_help shows help on stderr and exits 2
    skiff().assert().code(2).stderr(predicate::str::contains(
        "Run a containerized analysis on a short-lived cloud instance",
    ));
}

#[test]
fn test_cli_help_lists_every_command() {
    let mut assert = skiff().arg("--help").assert().success();
    for command in ["run", "check", "destroy", "config", "version"] {
        assert = assert.stdout(predicate::str::contains(command));
    }
}

#[test]
fn test_cli_version_flag_shows_version() {
    skiff()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("skiff"));
}

#[test]
fn test_version_command_shows_version() {
    skiff()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains("skiff 0.1.0"));
}

#[test]
fn test_version_command_json_outputs_valid_json() {
    let output = skiff().args(["--json", "version"]).output().expect("run");
    assert!(output.status.success());
    let v: serde_json::Value = serde_json::from_slice(&output.stdout).expect("valid JSON");
    assert_eq!(v["version"], "0.1.0");
}

#[test]
fn test_version_prints_even_when_quiet() {
    skiff()
        .args(["--quiet", "version"])
        .assert()
        .success()
        .stdout(predicate::str::contains("0.1.0"));
}

// --- Subcommand help ---

#[test]
fn test_run_help_lists_overrides() {
    skiff()
        .args(["run", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--artifacts-dir"))
        .stdout(predicate::str::contains("--poll-timeout"))
        .stdout(predicate::str::contains("--skip-runtime-install"));
}

#[test]
fn test_destroy_requires_id() {
    skiff()
        .arg("destroy")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("<ID>"));
}

#[test]
fn test_run_rejects_zero_poll_timeout() {
    skiff()
        .args(["run", "--poll-timeout", "0"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("--poll-timeout"));
}

// --- Error handling tests ---

#[test]
fn test_unknown_command_exits_with_error() {
    skiff()
        .arg("nonexistent")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unrecognized subcommand"));
}

#[test]
fn test_unknown_output_format_rejected() {
    skiff()
        .args(["check", "--output-format", "xml"])
        .assert()
        .code(2);
}
