//! Human-readable terminal renderer.

use std::path::Path;

use anyhow::{Context, Result};

use crate::domain::SkiffConfig;
use crate::output::OutputContext;

/// Renders domain types as human-readable terminal output using `OutputContext`.
pub struct HumanRenderer<'a> {
    ctx: &'a OutputContext,
}

impl<'a> HumanRenderer<'a> {
    /// Create a new `HumanRenderer` wrapping the given output context.
    #[must_use]
    pub fn new(ctx: &'a OutputContext) -> Self {
        Self { ctx }
    }

    /// Render the CLI version information. Printed even when quiet.
    pub fn render_version(&self, version: &str) {
        println!("skiff {version}");
    }

    /// Render the effective configuration as YAML under its file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be serialized.
    pub fn render_config(&self, config: &SkiffConfig, path: &Path) -> Result<()> {
        let yaml = serde_yaml::to_string(config).context("cannot serialize config")?;
        self.ctx.kv("Config file:", &path.display().to_string());
        print!("{yaml}");
        Ok(())
    }
}
