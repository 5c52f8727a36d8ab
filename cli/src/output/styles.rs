//! Output styles using owo-colors stylesheet pattern

use owo_colors::Style;

/// Centralized stylesheet for CLI output colors.
#[derive(Default, Clone)]
pub struct Styles {
    /// `SUCCESS` tag (green)
    pub success: Style,
    /// `WARNING` tag (yellow)
    pub warning: Style,
    /// `ERROR` tag (red)
    pub error: Style,
    /// `INFO` tag (blue)
    pub info: Style,
    /// Timestamps and keys
    pub dim: Style,
}

impl Styles {
    /// Apply colors to the stylesheet.
    pub fn colorize(&mut self) {
        self.success = Style::new().green().bold();
        self.warning = Style::new().yellow().bold();
        self.error = Style::new().red().bold();
        self.info = Style::new().blue();
        self.dim = Style::new().dimmed();
    }
}
