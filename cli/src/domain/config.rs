//! Domain types and validators for skiff configuration.
//!
//! Pure functions only: no I/O, no async, no filesystem access.

use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::domain::error::ConfigError;

// ── Constants ────────────────────────────────────────────────────────────────

pub const VALID_CONFIG_KEYS: &[&str] = &[
    "provider.cli",
    "provider.token_env",
    "provider.output_format",
    "instance.name",
    "instance.cpus",
    "instance.memory_gb",
    "instance.disk_gb",
    "instance.tier",
    "instance.static_ip",
    "ssh.user",
    "ssh.private_key",
    "ssh.public_key",
    "ssh.connect_timeout_secs",
    "poll.interval_secs",
    "poll.timeout_secs",
    "artifacts_dir",
    "results_dir",
    "install_runtime",
    "teardown.strategy",
];
pub const VALID_OUTPUT_FORMATS: &[&str] = &["text", "json"];
pub const VALID_DESTROY_VARIANTS: &[&str] = &["forced", "graceful"];

// ── Config schema ────────────────────────────────────────────────────────────

/// Top-level configuration stored in `~/.skiff/config.yaml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkiffConfig {
    pub provider: ProviderConfig,
    pub instance: InstanceConfig,
    pub ssh: SshConfig,
    pub poll: PollConfig,
    /// Directory holding `analysis.py` and `Dockerfile`.
    pub artifacts_dir: PathBuf,
    /// Local directory receiving the downloaded CSV files.
    pub results_dir: PathBuf,
    /// Install Docker on the instance when it is missing.
    pub install_runtime: bool,
    pub teardown: TeardownConfig,
}

impl Default for SkiffConfig {
    fn default() -> Self {
        Self {
            provider: ProviderConfig::default(),
            instance: InstanceConfig::default(),
            ssh: SshConfig::default(),
            poll: PollConfig::default(),
            artifacts_dir: PathBuf::from("."),
            results_dir: PathBuf::from("./results"),
            install_runtime: true,
            teardown: TeardownConfig::default(),
        }
    }
}

impl SkiffConfig {
    /// Expand a leading `~/` in every path setting against `home`.
    #[must_use]
    pub fn with_home(mut self, home: Option<&Path>) -> Self {
        self.ssh.private_key = expand_home(&self.ssh.private_key, home);
        self.ssh.public_key = self.ssh.public_key.map(|p| expand_home(&p, home));
        self.artifacts_dir = expand_home(&self.artifacts_dir, home);
        self.results_dir = expand_home(&self.results_dir, home);
        self
    }
}

/// How the provider CLI is invoked and how its output is read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Provider CLI binary name or path.
    pub cli: String,
    /// Environment variable carrying the API token.
    pub token_env: String,
    pub output_format: OutputFormat,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            cli: "ccloud".to_string(),
            token_env: "CCLOUD_API_KEY".to_string(),
            output_format: OutputFormat::Text,
        }
    }
}

/// Shape of the provider CLI's stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Free-form text, read with regular expressions.
    #[default]
    Text,
    /// Machine-readable JSON.
    Json,
}

/// Desired capacity of the instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InstanceConfig {
    pub name: String,
    pub cpus: u32,
    pub memory_gb: u32,
    pub disk_gb: u32,
    /// Capability tier label passed through to the provider.
    pub tier: String,
    /// Request a stable public address.
    pub static_ip: bool,
}

impl Default for InstanceConfig {
    fn default() -> Self {
        Self {
            name: "hpc-analysis".to_string(),
            cpus: 4,
            memory_gb: 16,
            disk_gb: 100,
            tier: "standard".to_string(),
            static_ip: true,
        }
    }
}

/// SSH identity and connection options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SshConfig {
    pub user: String,
    pub private_key: PathBuf,
    /// Defaults to `<private_key>.pub` when unset.
    pub public_key: Option<PathBuf>,
    pub connect_timeout_secs: u64,
}

impl Default for SshConfig {
    fn default() -> Self {
        Self {
            user: "root".to_string(),
            private_key: PathBuf::from("~/.ssh/id_ed25519"),
            public_key: None,
            connect_timeout_secs: 10,
        }
    }
}

impl SshConfig {
    /// The public key path, derived from the private key when not set.
    #[must_use]
    pub fn public_key_path(&self) -> PathBuf {
        self.public_key.clone().unwrap_or_else(|| {
            let mut raw = self.private_key.as_os_str().to_owned();
            raw.push(".pub");
            PathBuf::from(raw)
        })
    }
}

/// Readiness polling cadence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PollConfig {
    pub interval_secs: u64,
    pub timeout_secs: u64,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval_secs: 10,
            timeout_secs: 600,
        }
    }
}

/// One flag variant of the destroy call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DestroyVariant {
    Forced,
    Graceful,
}

impl DestroyVariant {
    #[must_use]
    pub fn is_forced(self) -> bool {
        self == Self::Forced
    }
}

/// Ordered destroy attempts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TeardownConfig {
    pub strategy: Vec<DestroyVariant>,
}

impl Default for TeardownConfig {
    fn default() -> Self {
        Self {
            strategy: vec![DestroyVariant::Forced, DestroyVariant::Graceful],
        }
    }
}

// ── Path helpers ─────────────────────────────────────────────────────────────

/// Expands a leading `~/` against `home`. Other paths are returned as-is.
#[must_use]
pub fn expand_home(path: &Path, home: Option<&Path>) -> PathBuf {
    match (path.strip_prefix("~"), home) {
        (Ok(rest), Some(home)) => home.join(rest),
        _ => path.to_path_buf(),
    }
}

// ── Validators ───────────────────────────────────────────────────────────────

/// Validates a configuration key against the whitelist.
///
/// # Errors
///
/// Returns an error if the key is not in the allowed list.
pub fn validate_config_key(key: &str) -> Result<()> {
    if !VALID_CONFIG_KEYS.contains(&key) {
        return Err(ConfigError::UnknownKey {
            key: key.to_string(),
            valid: VALID_CONFIG_KEYS.join(", "),
        }
        .into());
    }
    Ok(())
}

/// Validates a configuration value for the given key.
///
/// # Errors
///
/// Returns an error if the value is not valid for the key.
pub fn validate_config_value(key: &str, value: &str) -> Result<()> {
    let invalid = |valid: &str| -> anyhow::Error {
        ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
            valid: valid.to_string(),
        }
        .into()
    };
    match key {
        "provider.output_format" if !VALID_OUTPUT_FORMATS.contains(&value) => {
            Err(invalid(&VALID_OUTPUT_FORMATS.join(", ")))
        }
        "instance.cpus"
        | "instance.memory_gb"
        | "instance.disk_gb"
        | "ssh.connect_timeout_secs"
        | "poll.interval_secs"
        | "poll.timeout_secs" => match value.parse::<u64>() {
            Ok(n) if n > 0 => Ok(()),
            _ => Err(invalid("a positive integer")),
        },
        "instance.static_ip" | "install_runtime" if value.parse::<bool>().is_err() => {
            Err(invalid("true, false"))
        }
        "teardown.strategy" => {
            let parts: Vec<&str> = value.split(',').map(str::trim).collect();
            if parts.iter().all(|p| VALID_DESTROY_VARIANTS.contains(p)) {
                Ok(())
            } else {
                Err(invalid("comma-separated list of forced, graceful"))
            }
        }
        "provider.cli" | "provider.token_env" | "instance.name" | "instance.tier"
        | "ssh.user"
            if value.trim().is_empty() =>
        {
            Err(invalid("a non-empty string"))
        }
        _ => Ok(()),
    }
}

/// Applies a validated `key = value` pair to `config`.
///
/// # Errors
///
/// Returns an error if the key or value fails validation.
pub fn apply_config_value(config: &mut SkiffConfig, key: &str, value: &str) -> Result<()> {
    validate_config_key(key)?;
    validate_config_value(key, value)?;
    let int = || value.parse::<u64>().unwrap_or_default();
    let small = || u32::try_from(int()).unwrap_or(u32::MAX);
    let flag = || value.parse::<bool>().unwrap_or_default();
    match key {
        "provider.cli" => config.provider.cli = value.to_string(),
        "provider.token_env" => config.provider.token_env = value.to_string(),
        "provider.output_format" => {
            config.provider.output_format = if value == "json" {
                OutputFormat::Json
            } else {
                OutputFormat::Text
            };
        }
        "instance.name" => config.instance.name = value.to_string(),
        "instance.cpus" => config.instance.cpus = small(),
        "instance.memory_gb" => config.instance.memory_gb = small(),
        "instance.disk_gb" => config.instance.disk_gb = small(),
        "instance.tier" => config.instance.tier = value.to_string(),
        "instance.static_ip" => config.instance.static_ip = flag(),
        "ssh.user" => config.ssh.user = value.to_string(),
        "ssh.private_key" => config.ssh.private_key = PathBuf::from(value),
        "ssh.public_key" => config.ssh.public_key = Some(PathBuf::from(value)),
        "ssh.connect_timeout_secs" => config.ssh.connect_timeout_secs = int(),
        "poll.interval_secs" => config.poll.interval_secs = int(),
        "poll.timeout_secs" => config.poll.timeout_secs = int(),
        "artifacts_dir" => config.artifacts_dir = PathBuf::from(value),
        "results_dir" => config.results_dir = PathBuf::from(value),
        "install_runtime" => config.install_runtime = flag(),
        "teardown.strategy" => {
            config.teardown.strategy = value
                .split(',')
                .map(|p| {
                    if p.trim() == "forced" {
                        DestroyVariant::Forced
                    } else {
                        DestroyVariant::Graceful
                    }
                })
                .collect();
        }
        _ => {}
    }
    Ok(())
}

// ── Unit tests ───────────────────────────────────────────────────────────────
