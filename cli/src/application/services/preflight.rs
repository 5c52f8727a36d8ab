//! Pre-flight validation: everything checked before a remote resource exists.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.

use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::application::ports::{LocalEnv, ProgressReporter, ProvisioningClient};
use crate::domain::{PreflightError, SkiffConfig, workload};

/// Tools resolved on `PATH` besides the provider CLI.
pub const TRANSPORT_TOOLS: [&str; 2] = ["ssh", "scp"];

/// What pre-flight hands to the later stages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preflight {
    /// Public key material to install on the instance.
    pub public_key: String,
    /// Local artifact paths, in upload order.
    pub artifacts: Vec<PathBuf>,
}

/// Run every local check, then probe the provider with the token.
///
/// Order: tools, token presence, key pair, artifacts, token probe. The probe
/// is a read-only `list` call, so nothing is created on failure.
///
/// # Errors
///
/// Returns the first `PreflightError` encountered.
pub async fn validate(
    provider: &impl ProvisioningClient,
    env: &impl LocalEnv,
    config: &SkiffConfig,
    reporter: &impl ProgressReporter,
) -> Result<Preflight> {
    for tool in std::iter::once(config.provider.cli.as_str()).chain(TRANSPORT_TOOLS) {
        let path = env
            .find_tool(tool)
            .ok_or_else(|| PreflightError::ToolMissing(tool.to_string()))?;
        tracing::debug!(tool, path = %path.display(), "resolved tool");
    }

    let token_env = &config.provider.token_env;
    env.var(token_env)
        .ok_or_else(|| PreflightError::TokenMissing(token_env.clone()))?;

    let private_key = &config.ssh.private_key;
    if !env.exists(private_key) {
        return Err(PreflightError::KeyMissing {
            kind: "private",
            path: private_key.display().to_string(),
        }
        .into());
    }
    let public_key_path = config.ssh.public_key_path();
    if !env.exists(&public_key_path) {
        return Err(PreflightError::KeyMissing {
            kind: "public",
            path: public_key_path.display().to_string(),
        }
        .into());
    }
    let public_key = env
        .read_to_string(&public_key_path)
        .with_context(|| format!("reading {}", public_key_path.display()))?;

    let mut artifacts = Vec::with_capacity(workload::ARTIFACTS.len());
    for name in workload::ARTIFACTS {
        let path = config.artifacts_dir.join(name);
        if !env.exists(&path) {
            return Err(PreflightError::ArtifactMissing(path.display().to_string()).into());
        }
        artifacts.push(path);
    }

    let probe = provider.list().await.map_err(|e| PreflightError::TokenRejected {
        var: token_env.clone(),
        detail: format!("{e:#}"),
    })?;
    if !probe.status.success() {
        return Err(PreflightError::TokenRejected {
            var: token_env.clone(),
            detail: String::from_utf8_lossy(&probe.stderr).trim().to_string(),
        }
        .into());
    }

    reporter.success("local environment and provider credentials look good");
    Ok(Preflight {
        public_key: public_key.trim().to_string(),
        artifacts,
    })
}
