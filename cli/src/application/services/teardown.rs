//! Instance teardown: the destroy strategy and its final report.

use crate::application::ports::{ProgressReporter, ProvisioningClient};
use crate::domain::{CleanupError, CleanupOutcome, DestroyVariant, InstanceHandle};

const DEFAULT_STRATEGY: [DestroyVariant; 2] = [DestroyVariant::Forced, DestroyVariant::Graceful];

/// Destroy the instance if an id was ever obtained.
///
/// Tries each variant of `strategy` in order and stops at the first success.
/// An empty strategy falls back to forced-then-graceful. Never fails: the
/// outcome is returned for the caller to report.
pub async fn destroy(
    provider: &impl ProvisioningClient,
    id: Option<&str>,
    strategy: &[DestroyVariant],
    reporter: &impl ProgressReporter,
) -> CleanupOutcome {
    let Some(id) = id else {
        tracing::debug!("no instance id obtained, nothing to destroy");
        return CleanupOutcome::NotNeeded;
    };
    let strategy = if strategy.is_empty() {
        &DEFAULT_STRATEGY[..]
    } else {
        strategy
    };

    reporter.step(&format!("destroying instance {id}"));
    let mut last_error = String::new();
    for (attempt, variant) in strategy.iter().enumerate() {
        match provider.destroy(id, variant.is_forced()).await {
            Ok(out) if out.status.success() => {
                tracing::info!(id, attempt = attempt + 1, ?variant, "instance destroyed");
                return CleanupOutcome::Destroyed { id: id.to_string() };
            }
            Ok(out) => {
                last_error = String::from_utf8_lossy(&out.stderr).trim().to_string();
                if last_error.is_empty() {
                    last_error = format!("exit code {:?}", out.status.code());
                }
            }
            Err(e) => last_error = format!("{e:#}"),
        }
        tracing::warn!(id, attempt = attempt + 1, ?variant, error = %last_error, "destroy attempt failed");
    }

    let err = CleanupError::DestroyFailed {
        id: id.to_string(),
        attempts: strategy.len(),
        last: last_error,
    };
    CleanupOutcome::Failed {
        id: id.to_string(),
        attempts: strategy.len(),
        error: err.to_string(),
    }
}

/// Release whatever `handle` says exists.
///
/// An instance whose create was accepted but whose id never arrived cannot
/// be destroyed; it is reported as `Unidentified` instead of `NotNeeded`.
pub async fn release(
    provider: &impl ProvisioningClient,
    handle: &InstanceHandle,
    strategy: &[DestroyVariant],
    reporter: &impl ProgressReporter,
) -> CleanupOutcome {
    if handle.is_unidentified() {
        tracing::warn!(name = %handle.name, "instance was created but its id is unknown");
        return CleanupOutcome::Unidentified {
            name: handle.name.clone(),
        };
    }
    destroy(provider, handle.id.as_deref(), strategy, reporter).await
}

/// Print the cleanup outcome. This is always the last thing a run prints so
/// the operator's remaining action is unambiguous.
pub fn report(outcome: &CleanupOutcome, reporter: &impl ProgressReporter) {
    match outcome {
        CleanupOutcome::NotNeeded => reporter.success("no instance was created, nothing to clean up"),
        CleanupOutcome::Destroyed { id } => {
            reporter.success(&format!("instance {id} destroyed, all clean"));
        }
        CleanupOutcome::Failed { id, error, .. } => {
            reporter.error(error);
            reporter.error(&format!(
                "MANUAL CLEANUP REQUIRED: instance {id} may still be running and billing.\n\
                 Retry with:  skiff destroy {id}\n\
                 Or delete it from your provider's management console (instance id {id})."
            ));
        }
        CleanupOutcome::Unidentified { name } => {
            reporter.error(&format!(
                "MANUAL CLEANUP REQUIRED: instance '{name}' was created but its id was never \
                 obtained, so it was not destroyed.\n\
                 Find its id in your provider's instance list, then run:  skiff destroy <id>"
            ));
        }
    }
}
