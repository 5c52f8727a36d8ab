//! End-to-end tests for `skiff check`, `skiff run` and `skiff destroy`.
//!
//! The provider CLI, `ssh` and `scp` are replaced by shell scripts in a
//! temp directory that becomes the whole `PATH`, so nothing leaves the host.

#![cfg(unix)]
#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::os::unix::fs::PermissionsExt;
use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const FAKE_CCLOUD: &str = r#"#!/bin/sh
PATH=/usr/bin:/bin
echo "$*" >> "$SKIFF_FAKE_LOG"
case "$2" in
  create) echo "Created instance 3f2a9c1e-7b4d-4e8a-9f10-2c3d4e5f6a7b" ;;
  get) printf 'Status: running\nPublic IP: 203.0.113.10\n' ;;
  list) printf 'ID NAME STATUS\n' ;;
  delete) exit "${SKIFF_FAKE_DELETE_EXIT:-0}" ;;
esac
exit 0
"#;

const FAKE_SSH: &str = r#"#!/bin/sh
PATH=/usr/bin:/bin
for last; do :; done
echo "ssh $last" >> "$SKIFF_FAKE_LOG"
case "$last" in
  "docker run"*) echo "Starting Monte Carlo simulation"; echo "Simulation completed" ;;
esac
exit 0
"#;

const FAKE_SCP: &str = r#"#!/bin/sh
PATH=/usr/bin:/bin
for last; do :; done
case "$*" in
  *:/root/analysis/output/*)
    echo "scp download" >> "$SKIFF_FAKE_LOG"
    printf 'mc_option_price,bs_option_price\n8.02,8.02\n' > "$last/analysis_results.csv" ;;
  *)
    echo "scp upload" >> "$SKIFF_FAKE_LOG" ;;
esac
exit 0
"#;

/// A sandbox: fake tools, key pair, artifacts, config file and call log.
struct Sandbox {
    dir: TempDir,
}

impl Sandbox {
    fn new() -> Self {
        let dir = TempDir::new().expect("temp dir");
        let bin = dir.path().join("bin");
        std::fs::create_dir_all(&bin).expect("bin");
        for (name, body) in [("ccloud", FAKE_CCLOUD), ("ssh", FAKE_SSH), ("scp", FAKE_SCP)] {
            let path = bin.join(name);
            std::fs::write(&path, body).expect("script");
            std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))
                .expect("chmod");
        }
        let work = dir.path().join("work");
        std::fs::create_dir_all(&work).expect("work");
        std::fs::write(work.join("analysis.py"), "print('hi')\n").expect("analysis.py");
        std::fs::write(work.join("Dockerfile"), "FROM python:3.11-slim\n").expect("Dockerfile");
        std::fs::write(dir.path().join("id_ed25519"), "PRIVATE\n").expect("key");
        std::fs::write(dir.path().join("id_ed25519.pub"), "ssh-ed25519 AAAA op@host\n")
            .expect("pub");
        Self { dir }
    }

    fn path(&self, rel: &str) -> PathBuf {
        self.dir.path().join(rel)
    }

    fn log(&self) -> String {
        std::fs::read_to_string(self.path("calls.log")).unwrap_or_default()
    }

    fn skiff(&self) -> Command {
        let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("skiff"));
        cmd.env_clear()
            .env("PATH", self.path("bin"))
            .env("HOME", self.dir.path())
            .env("NO_COLOR", "1")
            .env("CCLOUD_API_KEY", "test-token")
            .env("SKIFF_CONFIG", self.path("config.yaml"))
            .env("SKIFF_FAKE_LOG", self.path("calls.log"))
            .env("SKIFF_ARTIFACTS_DIR", self.path("work"))
            .env("SKIFF_RESULTS_DIR", self.path("results"))
            .env("SKIFF_SSH_KEY", self.path("id_ed25519"));
        cmd
    }
}

fn line_index(log: &str, needle: &str) -> usize {
    log.lines()
        .position(|l| l.contains(needle))
        .unwrap_or_else(|| panic!("no call containing {needle:?} in:\n{log}"))
}

#[test]
fn test_check_passes_in_complete_sandbox() {
    let sb = Sandbox::new();
    sb.skiff()
        .arg("check")
        .assert()
        .success()
        .stdout(predicate::str::contains("SUCCESS"));
    assert_eq!(sb.log().trim(), "instance list");
}

#[test]
fn test_check_fails_without_token() {
    let sb = Sandbox::new();
    sb.skiff()
        .arg("check")
        .env_remove("CCLOUD_API_KEY")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("CCLOUD_API_KEY"));
    assert!(sb.log().is_empty());
}

#[test]
fn test_check_fails_when_provider_cli_missing() {
    let sb = Sandbox::new();
    std::fs::remove_file(sb.path("bin/ccloud")).expect("rm");
    sb.skiff()
        .arg("check")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("'ccloud' was not found on PATH"));
}

#[test]
fn test_check_ignores_non_executable_provider_cli() {
    let sb = Sandbox::new();
    std::fs::set_permissions(sb.path("bin/ccloud"), std::fs::Permissions::from_mode(0o644))
        .expect("chmod");
    sb.skiff()
        .arg("check")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("'ccloud' was not found on PATH"));
    assert!(sb.log().is_empty());
}

#[test]
fn test_run_full_pipeline_downloads_results_and_destroys() {
    let sb = Sandbox::new();
    sb.skiff()
        .arg("run")
        .assert()
        .success()
        .stdout(predicate::str::contains("Simulation completed"))
        .stdout(predicate::str::contains("mc_option_price"))
        .stdout(predicate::str::contains("destroyed"));

    let results = std::fs::read_to_string(sb.path("results/analysis_results.csv"))
        .expect("results downloaded");
    assert!(results.starts_with("mc_option_price"));

    let log = sb.log();
    let order = [
        "instance create --name hpc-analysis",
        "instance get 3f2a9c1e-7b4d-4e8a-9f10-2c3d4e5f6a7b",
        "ssh true",
        "scp upload",
        "ssh docker build",
        "ssh docker run",
        "scp download",
        "instance delete 3f2a9c1e-7b4d-4e8a-9f10-2c3d4e5f6a7b --force",
    ];
    let positions: Vec<usize> = order.iter().map(|n| line_index(&log, n)).collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]), "log:\n{log}");
    assert_eq!(log.matches("instance delete").count(), 1);
}

#[test]
fn test_run_json_report_on_stdout() {
    let sb = Sandbox::new();
    let output = sb.skiff().args(["--json", "run"]).output().expect("run");
    assert_eq!(output.status.code(), Some(0));
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).expect("JSON report");
    assert_eq!(report["outcome"]["status"], "succeeded");
    assert_eq!(report["cleanup"]["status"], "destroyed");
    assert_eq!(report["instance"]["id"], "3f2a9c1e-7b4d-4e8a-9f10-2c3d4e5f6a7b");
    assert_eq!(report["instance"]["address"], "203.0.113.10");
    assert_eq!(report["instance"]["readiness"], "reachable");
    assert_eq!(report["instance"]["cpus"], 4);
}

#[test]
fn test_run_destroy_failure_exits_three_with_instructions() {
    let sb = Sandbox::new();
    sb.skiff()
        .arg("run")
        .env("SKIFF_FAKE_DELETE_EXIT", "1")
        .assert()
        .code(3)
        .stderr(predicate::str::contains(
            "skiff destroy 3f2a9c1e-7b4d-4e8a-9f10-2c3d4e5f6a7b",
        ));
    assert_eq!(sb.log().matches("instance delete").count(), 2);
}

#[test]
fn test_run_missing_artifact_creates_nothing() {
    let sb = Sandbox::new();
    std::fs::remove_file(sb.path("work/Dockerfile")).expect("rm");
    sb.skiff()
        .arg("run")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Dockerfile"));
    assert!(!sb.log().contains("instance create"));
    assert!(!sb.log().contains("instance delete"));
}

#[test]
fn test_destroy_command_uses_configured_strategy() {
    let sb = Sandbox::new();
    sb.skiff()
        .args(["destroy", "abc-123"])
        .assert()
        .success();
    assert_eq!(sb.log().trim(), "instance delete abc-123 --force");
}

#[test]
fn test_destroy_command_reports_failure() {
    let sb = Sandbox::new();
    sb.skiff()
        .args(["destroy", "abc-123", "--force"])
        .env("SKIFF_FAKE_DELETE_EXIT", "1")
        .assert()
        .code(3)
        .stderr(predicate::str::contains("MANUAL CLEANUP REQUIRED"));
    assert_eq!(sb.log().matches("instance delete").count(), 1);
}
