//! SSH and SCP adapters for the `RemoteExecutor` and `FileTransfer` ports.
//!
//! Every invocation is non-interactive: key authentication only, and host
//! keys of freshly created instances are accepted without being recorded.

use std::path::{Path, PathBuf};
use std::process::Output;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::application::ports::{CommandRunner, FileTransfer, RemoteExecutor};
use crate::domain::config::SshConfig;
use crate::infra::command_runner::{DEFAULT_REMOTE_TIMEOUT, TokioCommandRunner};

/// Keepalive probe interval, so a dead session fails instead of hanging.
const SERVER_ALIVE_INTERVAL_SECS: u64 = 30;

/// Runs `ssh` / `scp` against `user@address` with a fixed private key.
pub struct SshTransport<R: CommandRunner> {
    runner: R,
    user: String,
    private_key: PathBuf,
    connect_timeout_secs: u64,
    command_timeout: Duration,
}

impl<R: CommandRunner> SshTransport<R> {
    pub fn new(runner: R, config: &SshConfig, command_timeout: Duration) -> Self {
        Self {
            runner,
            user: config.user.clone(),
            private_key: config.private_key.clone(),
            connect_timeout_secs: config.connect_timeout_secs,
            command_timeout,
        }
    }

    fn options(&self) -> Vec<String> {
        vec![
            "-i".to_string(),
            self.private_key.display().to_string(),
            "-o".to_string(),
            "BatchMode=yes".to_string(),
            "-o".to_string(),
            "StrictHostKeyChecking=no".to_string(),
            "-o".to_string(),
            "UserKnownHostsFile=/dev/null".to_string(),
            "-o".to_string(),
            "LogLevel=ERROR".to_string(),
            "-o".to_string(),
            format!("ConnectTimeout={}", self.connect_timeout_secs),
            "-o".to_string(),
            format!("ServerAliveInterval={SERVER_ALIVE_INTERVAL_SECS}"),
        ]
    }

    fn target(&self, address: &str) -> String {
        format!("{}@{address}", self.user)
    }

    fn ssh_args(&self, address: &str, command: &str) -> Vec<String> {
        let mut args = self.options();
        args.push(self.target(address));
        args.push(command.to_string());
        args
    }
}

impl SshTransport<TokioCommandRunner> {
    /// Convenience constructor for production use.
    #[must_use]
    pub fn default_runner(config: &SshConfig) -> Self {
        Self::new(
            TokioCommandRunner::new(DEFAULT_REMOTE_TIMEOUT),
            config,
            DEFAULT_REMOTE_TIMEOUT,
        )
    }
}

fn as_strs(args: &[String]) -> Vec<&str> {
    args.iter().map(String::as_str).collect()
}

impl<R: CommandRunner> RemoteExecutor for SshTransport<R> {
    async fn run_command(&self, address: &str, command: &str) -> Result<Output> {
        let args = self.ssh_args(address, command);
        self.runner
            .run_with_timeout("ssh", &as_strs(&args), self.command_timeout)
            .await
            .context("ssh")
    }

    async fn stream_command(
        &self,
        address: &str,
        command: &str,
        on_line: &dyn Fn(&str),
    ) -> Result<Output> {
        let args = self.ssh_args(address, command);
        self.runner
            .run_streaming("ssh", &as_strs(&args), self.command_timeout, on_line)
            .await
            .context("ssh")
    }
}

impl<R: CommandRunner> FileTransfer for SshTransport<R> {
    async fn upload(&self, address: &str, local: &[PathBuf], remote_dir: &str) -> Result<Output> {
        let mut args = self.options();
        args.extend(local.iter().map(|p| p.display().to_string()));
        args.push(format!("{}:{remote_dir}/", self.target(address)));
        self.runner
            .run_with_timeout("scp", &as_strs(&args), self.command_timeout)
            .await
            .context("scp upload")
    }

    async fn download(
        &self,
        address: &str,
        remote_glob: &str,
        local_dir: &Path,
    ) -> Result<Output> {
        // No local shell is involved, so the glob reaches the remote side intact.
        let mut args = self.options();
        args.push(format!("{}:{remote_glob}", self.target(address)));
        args.push(local_dir.display().to_string());
        self.runner
            .run_with_timeout("scp", &as_strs(&args), self.command_timeout)
            .await
            .context("scp download")
    }
}
