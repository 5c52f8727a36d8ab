//! Pipeline stages and the report a run produces.

use std::path::PathBuf;
use std::time::Duration;

use serde::Serialize;

use crate::domain::instance::InstanceHandle;

/// One sequential step of a deployment run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Validating,
    Provisioning,
    AwaitingNetworkAddress,
    AwaitingRemoteLogin,
    InstallingRuntime,
    Syncing,
    Building,
    Executing,
    Retrieving,
    Destroying,
    Done,
}

impl Stage {
    /// Stages run before teardown, in order.
    pub const SEQUENCE: [Stage; 9] = [
        Stage::Validating,
        Stage::Provisioning,
        Stage::AwaitingNetworkAddress,
        Stage::AwaitingRemoteLogin,
        Stage::InstallingRuntime,
        Stage::Syncing,
        Stage::Building,
        Stage::Executing,
        Stage::Retrieving,
    ];

    /// Human-readable label used in progress output.
    #[must_use]
    pub fn description(self) -> &'static str {
        match self {
            Stage::Validating => "Validating local environment",
            Stage::Provisioning => "Provisioning instance",
            Stage::AwaitingNetworkAddress => "Waiting for network address",
            Stage::AwaitingRemoteLogin => "Waiting for SSH login",
            Stage::InstallingRuntime => "Installing container runtime",
            Stage::Syncing => "Uploading artifacts",
            Stage::Building => "Building container image",
            Stage::Executing => "Running analysis",
            Stage::Retrieving => "Retrieving results",
            Stage::Destroying => "Destroying instance",
            Stage::Done => "Done",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.description())
    }
}

/// How the stage sequence ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RunOutcome {
    Succeeded,
    Failed { stage: Stage, error: String },
    Interrupted { stage: Stage },
}

/// What happened to the instance at teardown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CleanupOutcome {
    /// No id was ever obtained, so there was nothing to destroy.
    NotNeeded,
    Destroyed { id: String },
    Failed {
        id: String,
        attempts: usize,
        error: String,
    },
    /// Create was accepted but no id was ever learned, so nothing could be
    /// destroyed. The instance may still exist under `name`.
    Unidentified { name: String },
}

impl CleanupOutcome {
    /// `true` when an instance may have been left running.
    #[must_use]
    pub fn left_behind(&self) -> bool {
        matches!(self, Self::Failed { .. } | Self::Unidentified { .. })
    }
}

/// Exit code for a fatal stage failure.
pub const EXIT_STAGE_FAILED: i32 = 1;
/// Exit code when every stage passed but the instance could not be destroyed.
pub const EXIT_CLEANUP_FAILED: i32 = 3;
/// Exit code after SIGINT / SIGTERM.
pub const EXIT_INTERRUPTED: i32 = 130;

/// The result of one orchestrator run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunReport {
    pub outcome: RunOutcome,
    pub cleanup: CleanupOutcome,
    pub completed: Vec<Stage>,
    pub results: Vec<PathBuf>,
    pub instance: InstanceHandle,
    #[serde(serialize_with = "serialize_secs")]
    pub elapsed: Duration,
}

impl RunReport {
    /// Process exit code. The first fatal error decides the code; a cleanup
    /// failure only changes a clean run.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match (&self.outcome, &self.cleanup) {
            (RunOutcome::Failed { .. }, _) => EXIT_STAGE_FAILED,
            (RunOutcome::Interrupted { .. }, _) => EXIT_INTERRUPTED,
            (RunOutcome::Succeeded, cleanup) if cleanup.left_behind() => EXIT_CLEANUP_FAILED,
            (RunOutcome::Succeeded, _) => 0,
        }
    }
}

fn serialize_secs<S: serde::Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_f64(d.as_secs_f64())
}
