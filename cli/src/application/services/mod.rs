//! Application services: use-case orchestration.
//!
//! Each service module implements a single stage (or group of stages) by
//! composing domain logic with port trait calls. Services import only from
//! `crate::domain` and `crate::application::ports`, never from
//! `crate::infra`, `crate::commands`, or `crate::output`.

pub mod config_service;
pub mod deploy;
pub mod pipeline;
pub mod preflight;
pub mod provision;
pub mod readiness;
pub mod teardown;


use std::process::Output;

use crate::domain::RemoteError;

/// Map a non-zero exit into a `RemoteError` naming `step`.
///
/// # Errors
///
/// Returns `RemoteError::NonZeroExit` or `RemoteError::Signalled` when the
/// process did not exit cleanly.
pub(crate) fn ensure_success(output: &Output, step: &'static str) -> Result<(), RemoteError> {
    if output.status.success() {
        return Ok(());
    }
    match output.status.code() {
        Some(code) => Err(RemoteError::NonZeroExit {
            step,
            code,
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        }),
        None => Err(RemoteError::Signalled { step }),
    }
}
