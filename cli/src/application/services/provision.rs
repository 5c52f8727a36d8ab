//! Instance creation and id discovery.

use anyhow::Result;

use crate::application::ports::{ProgressReporter, ProvisioningClient};
use crate::domain::{InstanceHandle, InstanceRequest, ProviderOutputParser, ProvisionError};

/// Create the instance and record its id on `handle`.
///
/// The id is the UUID in the creation output when present; otherwise the
/// instance list is searched by name. The handle is updated as soon as an id
/// is known so teardown can find it whatever happens next.
///
/// # Errors
///
/// Returns `ProvisionError::Rejected` if the create call fails and
/// `ProvisionError::IdUnavailable` if neither lookup yields an id. In that
/// case the handle is left marked as created, for teardown to report.
pub async fn provision(
    provider: &impl ProvisioningClient,
    parser: &dyn ProviderOutputParser,
    request: &InstanceRequest,
    handle: &mut InstanceHandle,
    reporter: &impl ProgressReporter,
) -> Result<String> {
    reporter.step(&format!(
        "creating '{}' ({} vCPU, {} GB RAM, {} GB disk, tier {})",
        request.name, request.cpus, request.memory_gb, request.disk_gb, request.tier
    ));
    let output = provider
        .create(request)
        .await
        .map_err(|e| ProvisionError::Rejected(format!("{e:#}")))?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(ProvisionError::Rejected(stderr.trim().to_string()).into());
    }

    handle.mark_created();
    let stdout = String::from_utf8_lossy(&output.stdout);
    let id = match parser.instance_id(&stdout) {
        Some(id) => id,
        None => {
            tracing::debug!(name = %request.name, "no id in create output, looking up by name");
            lookup_by_name(provider, parser, &request.name)
                .await
                .ok_or_else(|| ProvisionError::IdUnavailable(request.name.clone()))?
        }
    };

    handle.assign_id(id.clone());
    reporter.success(&format!("instance created: {id}"));
    Ok(id)
}

async fn lookup_by_name(
    provider: &impl ProvisioningClient,
    parser: &dyn ProviderOutputParser,
    name: &str,
) -> Option<String> {
    match provider.list().await {
        Ok(out) if out.status.success() => {
            parser.id_for_name(&String::from_utf8_lossy(&out.stdout), name)
        }
        Ok(out) => {
            tracing::warn!(
                stderr = %String::from_utf8_lossy(&out.stderr).trim(),
                "instance list failed during id lookup"
            );
            None
        }
        Err(e) => {
            tracing::warn!(error = %e, "instance list failed during id lookup");
            None
        }
    }
}
