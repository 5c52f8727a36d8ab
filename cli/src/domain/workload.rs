//! The fixed remote layout of the analysis workload and the shell commands
//! run against it.

/// Local artifacts pushed to the instance, relative to `artifacts_dir`.
pub const ARTIFACTS: [&str; 2] = ["analysis.py", "Dockerfile"];

/// Remote directory receiving the artifacts and serving as build context.
pub const REMOTE_DIR: &str = "/root/analysis";

/// Remote host directory mounted into the container for results.
pub const REMOTE_OUTPUT_DIR: &str = "/root/analysis/output";

/// Output path inside the container.
pub const CONTAINER_OUTPUT_DIR: &str = "/app/output";

/// Image tag built and run on the instance.
pub const IMAGE_TAG: &str = "hpc-analysis:latest";

/// Files pulled back after the run.
pub const RESULTS_GLOB: &str = "*.csv";

/// The result file echoed to the console after retrieval.
pub const PRIMARY_RESULT: &str = "analysis_results.csv";

/// Remote command that proves the login works.
pub const LOGIN_PROBE: &str = "true";

/// Installs Docker through the upstream convenience script when absent.
#[must_use]
pub fn install_runtime_command() -> String {
    "command -v docker >/dev/null 2>&1 || (curl -fsSL https://get.docker.com | sh)".to_string()
}

/// Creates the remote artifact and output directories.
#[must_use]
pub fn prepare_dirs_command() -> String {
    format!("mkdir -p {REMOTE_DIR} {REMOTE_OUTPUT_DIR}")
}

#[must_use]
pub fn build_command() -> String {
    format!("docker build -t {IMAGE_TAG} {REMOTE_DIR}")
}

#[must_use]
pub fn run_command() -> String {
    format!("docker run --rm -v {REMOTE_OUTPUT_DIR}:{CONTAINER_OUTPUT_DIR} {IMAGE_TAG}")
}

/// Remote glob for the retrieval stage.
#[must_use]
pub fn results_glob() -> String {
    format!("{REMOTE_OUTPUT_DIR}/{RESULTS_GLOB}")
}
