//! Command implementations

pub mod check;
pub mod config;
pub mod destroy;
pub mod run;
pub mod version;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Args;

use crate::domain::{OutputFormat, SkiffConfig};

/// Per-invocation overrides shared by `run` and `check`. Each wins over the
/// config file; each can also come from a `SKIFF_*` environment variable.
#[derive(Args, Debug, Default, Clone)]
pub struct Overrides {
    /// Provider CLI binary
    #[arg(long, env = "SKIFF_PROVIDER_CLI")]
    pub provider_cli: Option<String>,

    /// Environment variable holding the provider API token
    #[arg(long, env = "SKIFF_TOKEN_ENV")]
    pub token_env: Option<String>,

    /// How provider CLI output is parsed
    #[arg(long, env = "SKIFF_OUTPUT_FORMAT", value_enum)]
    pub output_format: Option<OutputFormatArg>,

    /// Directory holding analysis.py and Dockerfile
    #[arg(long, env = "SKIFF_ARTIFACTS_DIR")]
    pub artifacts_dir: Option<PathBuf>,

    /// Local directory for downloaded results
    #[arg(long, env = "SKIFF_RESULTS_DIR")]
    pub results_dir: Option<PathBuf>,

    /// SSH private key (the public key is `<key>.pub` unless configured)
    #[arg(long, env = "SKIFF_SSH_KEY")]
    pub ssh_key: Option<PathBuf>,

    /// Remote login user
    #[arg(long, env = "SKIFF_SSH_USER")]
    pub ssh_user: Option<String>,
}

/// Clap-facing mirror of [`OutputFormat`].
#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormatArg {
    Text,
    Json,
}

impl From<OutputFormatArg> for OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Text => OutputFormat::Text,
            OutputFormatArg::Json => OutputFormat::Json,
        }
    }
}

impl Overrides {
    /// Apply every override that was given.
    pub fn apply(&self, config: &mut SkiffConfig) {
        if let Some(cli) = &self.provider_cli {
            config.provider.cli.clone_from(cli);
        }
        if let Some(var) = &self.token_env {
            config.provider.token_env.clone_from(var);
        }
        if let Some(format) = self.output_format {
            config.provider.output_format = format.into();
        }
        if let Some(dir) = &self.artifacts_dir {
            config.artifacts_dir.clone_from(dir);
        }
        if let Some(dir) = &self.results_dir {
            config.results_dir.clone_from(dir);
        }
        if let Some(key) = &self.ssh_key {
            config.ssh.private_key.clone_from(key);
        }
        if let Some(user) = &self.ssh_user {
            config.ssh.user.clone_from(user);
        }
    }
}

/// Map a numeric exit status onto `ExitCode`.
#[must_use]
pub fn exit_code(code: i32) -> ExitCode {
    u8::try_from(code).map_or(ExitCode::FAILURE, ExitCode::from)
}
