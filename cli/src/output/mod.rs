//! Output formatting module

pub mod human;
pub mod json;
pub mod progress;
pub mod reporter;
pub mod styles;

use chrono::{DateTime, Local, TimeZone};
use console::Term;
use owo_colors::OwoColorize as _;
pub use reporter::TerminalReporter;
pub use styles::Styles;

/// Severity of one console line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Success,
    Warning,
    Error,
}

impl Level {
    #[must_use]
    pub fn tag(self) -> &'static str {
        match self {
            Level::Info => "INFO",
            Level::Success => "SUCCESS",
            Level::Warning => "WARNING",
            Level::Error => "ERROR",
        }
    }
}

/// Render `[YYYY-MM-DD HH:MM:SS] LEVEL message`.
#[must_use]
pub fn format_line<Tz: TimeZone>(at: &DateTime<Tz>, level: Level, msg: &str, styles: &Styles) -> String
where
    Tz::Offset: std::fmt::Display,
{
    let style = match level {
        Level::Info => styles.info,
        Level::Success => styles.success,
        Level::Warning => styles.warning,
        Level::Error => styles.error,
    };
    format!(
        "{} {} {msg}",
        format!("[{}]", at.format("%Y-%m-%d %H:%M:%S")).style(styles.dim),
        level.tag().style(style),
    )
}

/// Output context carrying styling and terminal state.
pub struct OutputContext {
    /// Stylesheet for colored output.
    pub styles: Styles,
    /// Whether stdout is a TTY.
    pub is_tty: bool,
    /// Whether to suppress non-error output.
    pub quiet: bool,
}

impl OutputContext {
    /// Create output context based on CLI flags and environment.
    #[must_use]
    pub fn new(no_color: bool, quiet: bool) -> Self {
        let is_tty = Term::stdout().is_term();
        let use_colors = !no_color && is_tty && std::env::var("NO_COLOR").is_err();

        let mut styles = Styles::default();
        if use_colors {
            styles.colorize();
        }

        Self {
            styles,
            is_tty,
            quiet,
        }
    }

    /// Check if progress indicators should be shown.
    #[must_use]
    pub fn show_progress(&self) -> bool {
        self.is_tty && !self.quiet
    }

    /// A timestamped line for `level`, stamped now.
    #[must_use]
    pub fn line(&self, level: Level, msg: &str) -> String {
        format_line(&Local::now(), level, msg, &self.styles)
    }

    /// Print an `INFO` line. Suppressed when `quiet`.
    pub fn info(&self, msg: &str) {
        if !self.quiet {
            println!("{}", self.line(Level::Info, msg));
        }
    }

    /// Print a `SUCCESS` line. Suppressed when `quiet`.
    pub fn success(&self, msg: &str) {
        if !self.quiet {
            println!("{}", self.line(Level::Success, msg));
        }
    }

    /// Print a `WARNING` line. Suppressed when `quiet`.
    pub fn warn(&self, msg: &str) {
        if !self.quiet {
            println!("{}", self.line(Level::Warning, msg));
        }
    }

    /// Print an `ERROR` line to stderr. Never suppressed.
    pub fn error(&self, msg: &str) {
        eprintln!("{}", self.line(Level::Error, msg));
    }

    /// Print text verbatim. Suppressed when `quiet`.
    pub fn detail(&self, text: &str) {
        if !self.quiet {
            println!("{text}");
        }
    }

    /// Print a key-value pair with the key dimmed. Suppressed when `quiet`.
    pub fn kv(&self, key: &str, value: &str) {
        if !self.quiet {
            println!("  {:<14} {value}", key.style(self.styles.dim));
        }
    }
}
