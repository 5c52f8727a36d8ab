//! `skiff run`: provision, deploy, execute, retrieve, destroy.

use std::process::ExitCode;

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::services::pipeline::{self, Collaborators};
use crate::commands::{Overrides, exit_code};
use crate::domain::{SkiffConfig, parser_for};
use crate::infra::env::SystemEnv;
use crate::infra::provisioner::CliProvisioner;
use crate::infra::signal::shutdown_signal;
use crate::infra::ssh::SshTransport;
use crate::output::{TerminalReporter, json};

/// Arguments for the run command.
#[derive(Args, Debug, Default, Clone)]
pub struct RunArgs {
    #[command(flatten)]
    pub overrides: Overrides,

    /// Instance name
    #[arg(long, env = "SKIFF_INSTANCE_NAME")]
    pub name: Option<String>,

    /// vCPU count
    #[arg(long, env = "SKIFF_CPUS")]
    pub cpus: Option<u32>,

    /// Memory in GB
    #[arg(long, env = "SKIFF_MEMORY_GB")]
    pub memory_gb: Option<u32>,

    /// Disk in GB
    #[arg(long, env = "SKIFF_DISK_GB")]
    pub disk_gb: Option<u32>,

    /// Billing tier
    #[arg(long, env = "SKIFF_TIER")]
    pub tier: Option<String>,

    /// Seconds between readiness polls
    #[arg(long, env = "SKIFF_POLL_INTERVAL", value_parser = clap::value_parser!(u64).range(1..))]
    pub poll_interval: Option<u64>,

    /// Total seconds allowed per readiness wait
    #[arg(long, env = "SKIFF_POLL_TIMEOUT", value_parser = clap::value_parser!(u64).range(1..))]
    pub poll_timeout: Option<u64>,

    /// Assume docker is already installed on the instance
    #[arg(long)]
    pub skip_runtime_install: bool,
}

impl RunArgs {
    /// Apply every override that was given.
    pub fn apply(&self, config: &mut SkiffConfig) {
        self.overrides.apply(config);
        if let Some(name) = &self.name {
            config.instance.name.clone_from(name);
        }
        if let Some(cpus) = self.cpus {
            config.instance.cpus = cpus;
        }
        if let Some(memory) = self.memory_gb {
            config.instance.memory_gb = memory;
        }
        if let Some(disk) = self.disk_gb {
            config.instance.disk_gb = disk;
        }
        if let Some(tier) = &self.tier {
            config.instance.tier.clone_from(tier);
        }
        if let Some(secs) = self.poll_interval {
            config.poll.interval_secs = secs;
        }
        if let Some(secs) = self.poll_timeout {
            config.poll.timeout_secs = secs;
        }
        if self.skip_runtime_install {
            config.install_runtime = false;
        }
    }
}

/// Run the full pipeline. The exit code comes from the run report.
///
/// # Errors
///
/// Returns an error only if configuration cannot be loaded or the report
/// cannot be serialized; stage failures are reported through the exit code.
pub async fn run(app: &AppContext, args: &RunArgs) -> Result<ExitCode> {
    let mut config = app.load_config()?;
    args.apply(&mut config);
    let config = config.with_home(dirs::home_dir().as_deref());
    tracing::debug!(?config, "effective configuration");

    let provider = CliProvisioner::default_runner(&config.provider.cli, config.provider.output_format);
    let ssh = SshTransport::default_runner(&config.ssh);
    let parser = parser_for(config.provider.output_format);
    let reporter = TerminalReporter::new(&app.output);

    let collaborators = Collaborators {
        provider: &provider,
        remote: &ssh,
        transfer: &ssh,
        env: &SystemEnv,
        parser: parser.as_ref(),
        reporter: &reporter,
    };
    let report = pipeline::run(&collaborators, &config, shutdown_signal()).await;
    drop(reporter);

    if app.is_json() {
        println!("{}", json::format_value(&report)?);
    }
    Ok(exit_code(report.exit_code()))
}
