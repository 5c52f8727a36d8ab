//! `skiff destroy`: manual cleanup of an instance left behind by a run.

use std::process::ExitCode;

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::services::teardown;
use crate::domain::stage::EXIT_CLEANUP_FAILED;
use crate::domain::DestroyVariant;
use crate::infra::provisioner::CliProvisioner;
use crate::output::{TerminalReporter, json};

/// Arguments for the destroy command.
#[derive(Args, Debug, Clone)]
pub struct DestroyArgs {
    /// Instance id printed by the failed run
    pub id: String,

    /// Only try the forced variant instead of the configured strategy
    #[arg(long)]
    pub force: bool,
}

/// Destroy one instance with the configured strategy.
///
/// # Errors
///
/// Returns an error if configuration cannot be loaded.
pub async fn run(app: &AppContext, args: &DestroyArgs) -> Result<ExitCode> {
    let config = app.load_config()?;
    let strategy = if args.force {
        vec![DestroyVariant::Forced]
    } else {
        config.teardown.strategy.clone()
    };

    let provider = CliProvisioner::default_runner(&config.provider.cli, config.provider.output_format);
    let reporter = TerminalReporter::new(&app.output);
    let outcome = teardown::destroy(&provider, Some(&args.id), &strategy, &reporter).await;
    teardown::report(&outcome, &reporter);
    drop(reporter);

    if app.is_json() {
        println!("{}", json::format_value(&outcome)?);
    }
    Ok(if outcome.left_behind() {
        crate::commands::exit_code(EXIT_CLEANUP_FAILED)
    } else {
        ExitCode::SUCCESS
    })
}
