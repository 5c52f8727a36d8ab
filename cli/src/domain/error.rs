//! Typed domain error enums.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All error types implement `thiserror::Error` and convert to `anyhow::Error`
//! via the `?` operator.

use std::time::Duration;

use thiserror::Error;

// ── Pre-flight errors ─────────────────────────────────────────────────────────

/// Local environment problems detected before any remote resource exists.
#[derive(Debug, Error)]
pub enum PreflightError {
    #[error("Required tool '{0}' was not found on PATH.")]
    ToolMissing(String),

    #[error("Environment variable {0} is not set. Export your provider API token first.")]
    TokenMissing(String),

    #[error("Provider rejected the API token in {var}: {detail}")]
    TokenRejected { var: String, detail: String },

    #[error("SSH {kind} key not found at {path}. Generate one with: ssh-keygen -t ed25519")]
    KeyMissing { kind: &'static str, path: String },

    #[error("Artifact not found: {0}")]
    ArtifactMissing(String),
}

// ── Provisioning errors ───────────────────────────────────────────────────────

/// Errors from the instance creation step.
#[derive(Debug, Error)]
pub enum ProvisionError {
    #[error("Instance creation was rejected by the provider: {0}")]
    Rejected(String),

    #[error("Could not determine the id of instance '{0}' from the provider output.")]
    IdUnavailable(String),
}

// ── Readiness errors ──────────────────────────────────────────────────────────

/// Errors from the address and login polling loops.
#[derive(Debug, Error)]
pub enum ReadinessError {
    #[error("Instance {id} did not report a network address within {}s ({attempts} attempts).", .waited.as_secs())]
    NoAddress {
        id: String,
        attempts: u32,
        waited: Duration,
    },

    #[error("SSH login to {address} was not accepted within {}s ({attempts} attempts).", .waited.as_secs())]
    NoLogin {
        address: String,
        attempts: u32,
        waited: Duration,
    },
}

// ── Remote execution errors ───────────────────────────────────────────────────

/// Non-zero exits from transfer, build, or run steps on the instance.
#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("{step} failed with exit code {code}: {stderr}")]
    NonZeroExit {
        step: &'static str,
        code: i32,
        stderr: String,
    },

    #[error("{step} was terminated by a signal")]
    Signalled { step: &'static str },

    #[error("No result files matched {0}")]
    NoResults(String),
}

// ── Cleanup errors ────────────────────────────────────────────────────────────

/// The destroy strategy ran out of variants.
#[derive(Debug, Error)]
pub enum CleanupError {
    #[error("Failed to destroy instance {id} after {attempts} attempts: {last}")]
    DestroyFailed {
        id: String,
        attempts: usize,
        last: String,
    },
}

// ── Config errors ─────────────────────────────────────────────────────────────

/// Errors related to configuration key/value validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Unknown setting: {key}\n\nValid settings: {valid}")]
    UnknownKey { key: String, valid: String },

    #[error("Invalid value for {key}: {value}\n\nValid values: {valid}")]
    InvalidValue {
        key: String,
        value: String,
        valid: String,
    },
}
