//! CLI argument parsing with clap derive

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::app::{AppContext, OutputFlags};
use crate::commands;
use crate::infra::config::YamlConfigStore;

/// Run a containerized analysis on a short-lived cloud instance
#[derive(Parser)]
#[command(
    name = "skiff",
    version,
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    /// Config file (default: ~/.skiff/config.yaml)
    #[arg(long, global = true, env = "SKIFF_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Provision, deploy, run, collect results, destroy
    Run(commands::run::RunArgs),

    /// Validate tools, token, keys and artifacts without creating anything
    Check(commands::check::CheckArgs),

    /// Destroy an instance left behind by an earlier run
    Destroy(commands::destroy::DestroyArgs),

    /// Manage configuration
    #[command(subcommand)]
    Config(commands::config::ConfigCommand),

    /// Show version
    Version,
}

impl Cli {
    /// Execute the CLI command.
    ///
    /// # Errors
    ///
    /// Returns an error if the command fails before it can produce an exit code.
    pub async fn run(self) -> Result<ExitCode> {
        let Cli {
            json,
            quiet,
            no_color,
            config,
            command,
        } = self;
        let app = AppContext::new(
            &OutputFlags {
                no_color,
                quiet,
                json,
            },
            YamlConfigStore::new(config),
        );
        match command {
            Command::Run(args) => commands::run::run(&app, &args).await,
            Command::Check(args) => commands::check::run(&app, &args).await,
            Command::Destroy(args) => commands::destroy::run(&app, &args).await,
            Command::Config(cmd) => commands::config::run(&app, &cmd),
            Command::Version => Ok(commands::version::run(&app)),
        }
    }
}
