//! Readiness polling: wait for a network address, then for SSH login.
//!
//! Both loops share one fixed-interval policy. The sleep between attempts is
//! constant regardless of how long the previous attempt took, and no sleep
//! follows the final attempt.

use std::future::Future;

use anyhow::Result;

use crate::application::ports::{ProgressReporter, ProvisioningClient, RemoteExecutor};
use crate::domain::{PollPolicy, ProviderOutputParser, ReadinessError, workload};

/// Call `probe` until it yields `Some`, at most `policy.max_attempts()` times.
///
/// Returns the value, or the number of attempts made when the budget ran out.
pub async fn poll_until<T, F, Fut>(policy: PollPolicy, mut probe: F) -> Result<T, u32>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Option<T>>,
{
    let max = policy.max_attempts();
    for attempt in 1..=max {
        if let Some(value) = probe(attempt).await {
            return Ok(value);
        }
        tracing::debug!(attempt, max, "not ready yet");
        if attempt < max {
            tokio::time::sleep(policy.interval).await;
        }
    }
    Err(max)
}

/// Poll `describe(id)` until an address can be parsed from it.
///
/// Failed describe calls count as "not yet" rather than aborting the loop.
///
/// # Errors
///
/// Returns `ReadinessError::NoAddress` when the budget is exhausted.
pub async fn wait_for_address(
    provider: &impl ProvisioningClient,
    parser: &dyn ProviderOutputParser,
    id: &str,
    policy: PollPolicy,
    reporter: &impl ProgressReporter,
) -> Result<String> {
    reporter.step(&format!(
        "waiting up to {}s for instance {id} to report an address",
        policy.budget.as_secs()
    ));
    let found = poll_until(policy, |attempt| async move {
        match provider.describe(id).await {
            Ok(out) if out.status.success() => {
                parser.address(&String::from_utf8_lossy(&out.stdout))
            }
            Ok(out) => {
                tracing::debug!(
                    attempt,
                    stderr = %String::from_utf8_lossy(&out.stderr).trim(),
                    "describe failed"
                );
                None
            }
            Err(e) => {
                tracing::debug!(attempt, error = %e, "describe errored");
                None
            }
        }
    })
    .await;

    match found {
        Ok(address) => {
            reporter.success(&format!("instance address: {address}"));
            Ok(address)
        }
        Err(attempts) => Err(ReadinessError::NoAddress {
            id: id.to_string(),
            attempts,
            waited: policy.budget,
        }
        .into()),
    }
}

/// Poll a trivial remote command until SSH accepts the login.
///
/// # Errors
///
/// Returns `ReadinessError::NoLogin` when the budget is exhausted.
pub async fn wait_for_login(
    remote: &impl RemoteExecutor,
    address: &str,
    policy: PollPolicy,
    reporter: &impl ProgressReporter,
) -> Result<()> {
    reporter.step(&format!("waiting for SSH on {address}"));
    let found = poll_until(policy, |attempt| async move {
        match remote.run_command(address, workload::LOGIN_PROBE).await {
            Ok(out) if out.status.success() => Some(()),
            Ok(out) => {
                tracing::debug!(attempt, code = ?out.status.code(), "ssh probe refused");
                None
            }
            Err(e) => {
                tracing::debug!(attempt, error = %e, "ssh probe errored");
                None
            }
        }
    })
    .await;

    match found {
        Ok(()) => {
            reporter.success("SSH login accepted");
            Ok(())
        }
        Err(attempts) => Err(ReadinessError::NoLogin {
            address: address.to_string(),
            attempts,
            waited: policy.budget,
        }
        .into()),
    }
}
