//! Application context: unified state passed to every command handler.
//!
//! Adding a cross-cutting concern requires one field change here; command
//! signatures stay the same.

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use crate::application::services::config_service;
use crate::domain::SkiffConfig;
use crate::infra::config::YamlConfigStore;
use crate::output::OutputContext;

/// Environment variable holding the diagnostic log filter.
pub const LOG_ENV: &str = "SKIFF_LOG";

/// Output rendering mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Human-readable terminal output (default).
    Human,
    /// Machine-readable JSON output.
    Json,
}

/// Output rendering flags.
pub struct OutputFlags {
    /// Disable ANSI color output.
    pub no_color: bool,
    /// Suppress non-error output.
    pub quiet: bool,
    /// Enable JSON output mode.
    pub json: bool,
}

/// Unified application context passed to every command handler.
pub struct AppContext {
    /// Terminal output context (colors, quiet mode).
    pub output: OutputContext,
    /// Output rendering mode (human vs JSON).
    pub mode: OutputMode,
    /// Config file persistence.
    pub config_store: YamlConfigStore,
}

impl AppContext {
    /// Construct an `AppContext` from top-level CLI flags.
    ///
    /// JSON mode silences progress lines so stdout carries only the JSON
    /// document. Errors still reach stderr.
    #[must_use]
    pub fn new(flags: &OutputFlags, config_store: YamlConfigStore) -> Self {
        let mode = if flags.json {
            OutputMode::Json
        } else {
            OutputMode::Human
        };
        Self {
            output: OutputContext::new(flags.no_color, flags.quiet || flags.json),
            mode,
            config_store,
        }
    }

    /// Returns `true` when JSON output mode is active.
    #[must_use]
    pub fn is_json(&self) -> bool {
        self.mode == OutputMode::Json
    }

    /// Load the config file with `~/` expanded in path settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed.
    pub fn load_config(&self) -> Result<SkiffConfig> {
        let config = config_service::load_config(&self.config_store)?;
        Ok(config.with_home(dirs::home_dir().as_deref()))
    }
}

/// Install the stderr diagnostic subscriber, filtered by `SKIFF_LOG`
/// (default `warn`). Safe to call more than once.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
