//! Infrastructure implementation of the `CommandRunner` port.
//!
//! `TokioCommandRunner` is the production implementation that uses tokio
//! for async process execution with guaranteed timeout and kill on all platforms.

use std::process::{Output, Stdio};
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, AsyncReadExt, BufReader};

use crate::application::ports::CommandRunner;

/// Default timeout for provider CLI calls (create, get, list, delete).
pub const DEFAULT_CMD_TIMEOUT: Duration = Duration::from_secs(120);

/// Default timeout for commands run over SSH (install, build).
pub const DEFAULT_REMOTE_TIMEOUT: Duration = Duration::from_secs(60 * 60);

/// Production `CommandRunner`.
///
/// `tokio::time::timeout` around `.output().await` does not kill the child on
/// every platform when it fires, so the timeout branch kills explicitly.
/// Every child is also spawned with `kill_on_drop`, so dropping a pending call
/// (an interrupted run) terminates the process.
pub struct TokioCommandRunner {
    timeout: Duration,
}

impl TokioCommandRunner {
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl Default for TokioCommandRunner {
    fn default() -> Self {
        Self::new(DEFAULT_CMD_TIMEOUT)
    }
}

fn spawn(program: &str, args: &[&str]) -> Result<tokio::process::Child> {
    tracing::debug!(program, ?args, "spawning");
    tokio::process::Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .with_context(|| format!("failed to spawn {program}"))
}

async fn read_all<R: tokio::io::AsyncRead + Unpin>(handle: Option<R>) -> Vec<u8> {
    let mut buf = Vec::new();
    if let Some(mut h) = handle {
        let _ = h.read_to_end(&mut buf).await;
    }
    buf
}

impl CommandRunner for TokioCommandRunner {
    async fn run(&self, program: &str, args: &[&str]) -> Result<Output> {
        self.run_with_timeout(program, args, self.timeout).await
    }

    async fn run_with_timeout(
        &self,
        program: &str,
        args: &[&str],
        timeout: Duration,
    ) -> Result<Output> {
        let mut child = spawn(program, args)?;
        let stdout_handle = child.stdout.take();
        let stderr_handle = child.stderr.take();

        tokio::select! {
            result = async {
                let (status, stdout, stderr) = tokio::join!(
                    child.wait(),
                    read_all(stdout_handle),
                    read_all(stderr_handle),
                );
                let status = status.with_context(|| format!("waiting for {program}"))?;
                tracing::debug!(program, code = ?status.code(), "finished");
                Ok(Output { status, stdout, stderr })
            } => result,
            () = tokio::time::sleep(timeout) => {
                let _ = child.kill().await;
                anyhow::bail!("{program} timed out after {}s", timeout.as_secs())
            }
        }
    }

    async fn run_streaming(
        &self,
        program: &str,
        args: &[&str],
        timeout: Duration,
        on_line: &dyn Fn(&str),
    ) -> Result<Output> {
        let mut child = spawn(program, args)?;
        let stdout_handle = child.stdout.take();
        let stderr_handle = child.stderr.take();

        // Reads raw bytes to EOF. Stopping early would close the pipe and
        // kill the child with SIGPIPE on its next write.
        let stdout = async {
            let mut captured = Vec::new();
            if let Some(h) = stdout_handle {
                let mut reader = BufReader::new(h);
                let mut buf = Vec::new();
                loop {
                    buf.clear();
                    match reader.read_until(b'\n', &mut buf).await {
                        Ok(0) => break,
                        Ok(_) => {
                            captured.extend_from_slice(&buf);
                            let line = String::from_utf8_lossy(&buf);
                            on_line(line.trim_end_matches(['\n', '\r']));
                        }
                        Err(e) => {
                            tracing::warn!(program, error = %e, "reading stdout failed");
                            break;
                        }
                    }
                }
            }
            captured
        };

        tokio::select! {
            result = async {
                let (status, stdout, stderr) =
                    tokio::join!(child.wait(), stdout, read_all(stderr_handle));
                let status = status.with_context(|| format!("waiting for {program}"))?;
                tracing::debug!(program, code = ?status.code(), "finished");
                Ok(Output { status, stdout, stderr })
            } => result,
            () = tokio::time::sleep(timeout) => {
                let _ = child.kill().await;
                anyhow::bail!("{program} timed out after {}s", timeout.as_secs())
            }
        }
    }
}
