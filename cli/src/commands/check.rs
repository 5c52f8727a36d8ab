//! `skiff check`: run the local validation stage only.

use std::process::ExitCode;

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::services::preflight;
use crate::commands::Overrides;
use crate::infra::env::SystemEnv;
use crate::infra::provisioner::CliProvisioner;
use crate::output::{TerminalReporter, json};

/// Arguments for the check command.
#[derive(Args, Debug, Default, Clone)]
pub struct CheckArgs {
    #[command(flatten)]
    pub overrides: Overrides,
}

/// Validate tools, token, keys and artifacts without creating anything.
///
/// # Errors
///
/// Returns the first failed check.
pub async fn run(app: &AppContext, args: &CheckArgs) -> Result<ExitCode> {
    let mut config = app.load_config()?;
    args.overrides.apply(&mut config);
    let config = config.with_home(dirs::home_dir().as_deref());

    let provider = CliProvisioner::default_runner(&config.provider.cli, config.provider.output_format);
    let reporter = TerminalReporter::new(&app.output);
    let checked = preflight::validate(&provider, &SystemEnv, &config, &reporter).await?;
    drop(reporter);

    if app.is_json() {
        let out = serde_json::json!({
            "ok": true,
            "provider_cli": config.provider.cli,
            "artifacts": checked.artifacts,
            "public_key": config.ssh.public_key_path(),
        });
        println!("{}", json::format_value(&out)?);
    }
    Ok(ExitCode::SUCCESS)
}
