//! Infrastructure implementation of the `ProvisioningClient` port.
//!
//! `CliProvisioner<R>` drives the provider's command-line tool through a
//! `CommandRunner`. The tool inherits the operator's environment, so the API
//! token variable reaches it without being passed on the command line.

use std::process::Output;

use anyhow::{Context, Result};

use crate::application::ports::{CommandRunner, ProvisioningClient};
use crate::domain::{InstanceRequest, OutputFormat};
use crate::infra::command_runner::{DEFAULT_CMD_TIMEOUT, TokioCommandRunner};

/// Adapter that routes all provider calls through a `CommandRunner`.
///
/// Generic over `R: CommandRunner` so that tests can inject a recording
/// runner without spawning real processes.
pub struct CliProvisioner<R: CommandRunner> {
    runner: R,
    cli: String,
    format: OutputFormat,
}

impl<R: CommandRunner> CliProvisioner<R> {
    pub fn new(runner: R, cli: impl Into<String>, format: OutputFormat) -> Self {
        Self {
            runner,
            cli: cli.into(),
            format,
        }
    }

    async fn call(&self, mut args: Vec<&str>, what: &'static str) -> Result<Output> {
        if self.format == OutputFormat::Json {
            args.extend(["--output", "json"]);
        }
        self.runner
            .run(&self.cli, &args)
            .await
            .with_context(|| format!("{} {what}", self.cli))
    }
}

impl CliProvisioner<TokioCommandRunner> {
    /// Convenience constructor for production use.
    #[must_use]
    pub fn default_runner(cli: &str, format: OutputFormat) -> Self {
        Self::new(TokioCommandRunner::new(DEFAULT_CMD_TIMEOUT), cli, format)
    }
}

impl<R: CommandRunner> ProvisioningClient for CliProvisioner<R> {
    async fn create(&self, request: &InstanceRequest) -> Result<Output> {
        let cpus = request.cpus.to_string();
        let memory = format!("{}G", request.memory_gb);
        let disk = format!("{}G", request.disk_gb);
        let mut args = vec![
            "instance",
            "create",
            "--name",
            &request.name,
            "--cpus",
            &cpus,
            "--memory",
            &memory,
            "--disk",
            &disk,
            "--tier",
            &request.tier,
            "--ssh-key",
            &request.public_key,
        ];
        if request.static_ip {
            args.push("--static-ip");
        }
        self.call(args, "instance create").await
    }

    async fn describe(&self, id: &str) -> Result<Output> {
        self.call(vec!["instance", "get", id], "instance get").await
    }

    async fn destroy(&self, id: &str, force: bool) -> Result<Output> {
        let mut args = vec!["instance", "delete", id];
        if force {
            args.push("--force");
        }
        self.call(args, "instance delete").await
    }

    async fn list(&self) -> Result<Output> {
        self.call(vec!["instance", "list"], "instance list").await
    }
}
