//! Remote work on a reachable instance: runtime install, upload, build, run,
//! and result retrieval.
//!
//! Every step is a single attempt. A non-zero exit is fatal for the run.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::application::ports::{FileTransfer, ProgressReporter, RemoteExecutor};
use crate::application::services::ensure_success;
use crate::domain::{RemoteError, workload};

/// Install the container runtime unless it is already present.
///
/// # Errors
///
/// Returns an error if the install command cannot run or exits non-zero.
pub async fn install_runtime(
    remote: &impl RemoteExecutor,
    address: &str,
    reporter: &impl ProgressReporter,
) -> Result<()> {
    reporter.step("ensuring docker is installed");
    let output = remote
        .run_command(address, &workload::install_runtime_command())
        .await
        .context("installing docker")?;
    ensure_success(&output, "docker install")?;
    reporter.success("docker available");
    Ok(())
}

/// Create the remote directories and upload both artifacts.
///
/// # Errors
///
/// Returns an error if the directory cannot be created or the transfer fails.
pub async fn sync(
    remote: &impl RemoteExecutor,
    transfer: &impl FileTransfer,
    address: &str,
    artifacts: &[PathBuf],
    reporter: &impl ProgressReporter,
) -> Result<()> {
    let output = remote
        .run_command(address, &workload::prepare_dirs_command())
        .await
        .context("creating remote directories")?;
    ensure_success(&output, "mkdir")?;

    reporter.step(&format!(
        "uploading {} to {}",
        artifact_names(artifacts),
        workload::REMOTE_DIR
    ));
    let output = transfer
        .upload(address, artifacts, workload::REMOTE_DIR)
        .await
        .context("uploading artifacts")?;
    ensure_success(&output, "upload")?;
    reporter.success("artifacts uploaded");
    Ok(())
}

/// Build the analysis image on the instance.
///
/// # Errors
///
/// Returns an error if `docker build` exits non-zero.
pub async fn build(
    remote: &impl RemoteExecutor,
    address: &str,
    reporter: &impl ProgressReporter,
) -> Result<()> {
    reporter.step(&format!("building {}", workload::IMAGE_TAG));
    let output = remote
        .run_command(address, &workload::build_command())
        .await
        .context("running docker build")?;
    ensure_success(&output, "docker build")?;
    reporter.success("image built");
    Ok(())
}

/// Run the analysis container, echoing its stdout as it arrives.
///
/// # Errors
///
/// Returns an error if `docker run` exits non-zero.
pub async fn execute(
    remote: &impl RemoteExecutor,
    address: &str,
    reporter: &impl ProgressReporter,
) -> Result<()> {
    reporter.step("running analysis container");
    let output = remote
        .stream_command(address, &workload::run_command(), &|line: &str| reporter.detail(line))
        .await
        .context("running docker run")?;
    ensure_success(&output, "docker run")?;
    reporter.success("analysis finished");
    Ok(())
}

/// Download result CSVs into `results_dir` and print the primary one.
///
/// Returns the CSV files present in `results_dir` afterwards, sorted.
///
/// # Errors
///
/// Returns an error if the directory cannot be created, the download fails,
/// or the primary result file is missing.
pub async fn retrieve(
    transfer: &impl FileTransfer,
    address: &str,
    results_dir: &Path,
    reporter: &impl ProgressReporter,
) -> Result<Vec<PathBuf>> {
    tokio::fs::create_dir_all(results_dir)
        .await
        .with_context(|| format!("creating {}", results_dir.display()))?;

    let glob = workload::results_glob();
    reporter.step(&format!("downloading {glob} to {}", results_dir.display()));
    let output = transfer
        .download(address, &glob, results_dir)
        .await
        .context("downloading results")?;
    ensure_success(&output, "download")?;

    let files = csv_files(results_dir).await?;
    let primary = results_dir.join(workload::PRIMARY_RESULT);
    if !files.contains(&primary) {
        return Err(RemoteError::NoResults(format!(
            "{glob} (expected {})",
            workload::PRIMARY_RESULT
        ))
        .into());
    }
    reporter.success(&format!("{} result file(s) saved", files.len()));

    let contents = tokio::fs::read_to_string(&primary)
        .await
        .with_context(|| format!("reading {}", primary.display()))?;
    reporter.detail(contents.trim_end());
    Ok(files)
}

async fn csv_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut entries = tokio::fs::read_dir(dir)
        .await
        .with_context(|| format!("reading {}", dir.display()))?;
    let mut files = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if path.extension().is_some_and(|ext| ext == "csv") {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

fn artifact_names(artifacts: &[PathBuf]) -> String {
    artifacts
        .iter()
        .filter_map(|p| p.file_name())
        .map(|n| n.to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join(", ")
}
