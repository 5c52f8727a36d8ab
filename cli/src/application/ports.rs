//! Port trait definitions for the Application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure must fulfill.
//! This file imports only from `crate::domain`, never from `crate::infra`,
//! `crate::commands`, or `crate::output`.

use std::path::{Path, PathBuf};
use std::process::Output;

use anyhow::Result;

use crate::domain::{InstanceRequest, SkiffConfig};

// ── Provisioning Port ─────────────────────────────────────────────────────────

/// Instance lifecycle calls against the provider.
///
/// Every call returns the raw process output; callers check the exit status
/// and hand stdout to a `ProviderOutputParser`.
#[allow(async_fn_in_trait)]
pub trait ProvisioningClient {
    /// Request a new instance.
    async fn create(&self, request: &InstanceRequest) -> Result<Output>;
    /// Fetch details of one instance.
    async fn describe(&self, id: &str) -> Result<Output>;
    /// Destroy an instance, optionally skipping the provider's confirmation.
    async fn destroy(&self, id: &str, force: bool) -> Result<Output>;
    /// List instances visible to the token. Doubles as the auth probe.
    async fn list(&self) -> Result<Output>;
}

// ── Remote Execution Port ─────────────────────────────────────────────────────

/// Authenticated command execution on the instance.
#[allow(async_fn_in_trait)]
pub trait RemoteExecutor {
    /// Run `command` through the remote shell and capture its output.
    async fn run_command(&self, address: &str, command: &str) -> Result<Output>;

    /// Run `command` and hand each stdout line to `on_line` as it arrives.
    ///
    /// The default implementation captures the whole output first.
    async fn stream_command(
        &self,
        address: &str,
        command: &str,
        on_line: &dyn Fn(&str),
    ) -> Result<Output> {
        let output = self.run_command(address, command).await?;
        for line in String::from_utf8_lossy(&output.stdout).lines() {
            on_line(line);
        }
        Ok(output)
    }
}

// ── File Transfer Port ────────────────────────────────────────────────────────

/// Authenticated, encrypted file transfer to and from the instance.
#[allow(async_fn_in_trait)]
pub trait FileTransfer {
    /// Copy local files into `remote_dir`.
    async fn upload(&self, address: &str, local: &[PathBuf], remote_dir: &str) -> Result<Output>;
    /// Copy every remote file matching `remote_glob` into `local_dir`.
    async fn download(&self, address: &str, remote_glob: &str, local_dir: &Path)
    -> Result<Output>;
}

// ── Local Environment Port ────────────────────────────────────────────────────

/// Read-only view of the operator's machine, used by pre-flight checks.
pub trait LocalEnv {
    /// Resolve an executable on `PATH`.
    fn find_tool(&self, name: &str) -> Option<PathBuf>;
    /// Read an environment variable. Empty values count as unset.
    fn var(&self, name: &str) -> Option<String>;
    /// Whether a file exists.
    fn exists(&self, path: &Path) -> bool;
    /// Read a small text file (public keys).
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read.
    fn read_to_string(&self, path: &Path) -> Result<String>;
}

// ── Command Runner Port ───────────────────────────────────────────────────────

/// Abstracts process execution so infrastructure can be swapped or mocked.
#[allow(async_fn_in_trait)]
pub trait CommandRunner {
    /// Run a program and capture its output.
    ///
    /// Implementations should delegate to `run_with_timeout` using the
    /// instance's configured default timeout.
    async fn run(&self, program: &str, args: &[&str]) -> Result<Output>;
    /// Run a program with a custom timeout override.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be spawned or exceeds `timeout`.
    /// On timeout, the child process must be killed (not left orphaned).
    async fn run_with_timeout(
        &self,
        program: &str,
        args: &[&str],
        timeout: std::time::Duration,
    ) -> Result<Output>;
    /// Run a program, forwarding stdout lines to `on_line` while also
    /// capturing them. Lines that are not valid UTF-8 are passed lossily.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be spawned or exceeds `timeout`,
    /// in which case it is killed.
    async fn run_streaming(
        &self,
        program: &str,
        args: &[&str],
        timeout: std::time::Duration,
        on_line: &dyn Fn(&str),
    ) -> Result<Output>;
}

// ── Progress Reporting Port ───────────────────────────────────────────────────

/// Abstracts progress reporting so services can emit events without
/// depending on the Presentation layer. Sync trait, no async needed.
pub trait ProgressReporter {
    /// Emit an in-progress step message.
    fn step(&self, message: &str);
    /// Emit a success message.
    fn success(&self, message: &str);
    /// Emit a warning message.
    fn warn(&self, message: &str);
    /// Emit an error message.
    fn error(&self, message: &str);
    /// Emit verbatim text (remote stdout, result files).
    fn detail(&self, text: &str);
}

// ── Config Port ───────────────────────────────────────────────────────────────

/// Abstracts persistence of the configuration file.
pub trait ConfigStore {
    /// Load the config, returning defaults when no file exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    fn load(&self) -> Result<SkiffConfig>;
    /// Persist the config.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    fn save(&self, config: &SkiffConfig) -> Result<()>;
    /// Path of the backing file.
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    fn path(&self) -> Result<PathBuf>;
}
