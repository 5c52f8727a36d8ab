//! `TerminalReporter`: Presentation-layer implementation of `ProgressReporter`.
//!
//! Wraps `&OutputContext` and implements the `application::ports::ProgressReporter`
//! trait so application services can emit progress events without depending on
//! any presentation type directly.

use std::cell::RefCell;

use indicatif::ProgressBar;

use crate::application::ports::ProgressReporter;
use crate::output::{Level, OutputContext, progress};

/// Terminal progress reporter that wraps an `OutputContext`.
///
/// On a TTY each `step()` line carries a spinner until the next event, so
/// long polls and builds visibly tick. Otherwise every event is one line.
pub struct TerminalReporter<'a> {
    ctx: &'a OutputContext,
    active: RefCell<Option<ProgressBar>>,
}

impl<'a> TerminalReporter<'a> {
    /// Create a new `TerminalReporter` wrapping the given output context.
    #[must_use]
    pub fn new(ctx: &'a OutputContext) -> Self {
        Self {
            ctx,
            active: RefCell::new(None),
        }
    }

    /// Freeze the running spinner, if any, as a plain line.
    fn settle(&self) {
        if let Some(pb) = self.active.borrow_mut().take() {
            let line = pb.message();
            progress::finish_with_line(&pb, &line);
        }
    }
}

impl ProgressReporter for TerminalReporter<'_> {
    fn step(&self, message: &str) {
        self.settle();
        if self.ctx.show_progress() {
            let pb = progress::spinner(&self.ctx.line(Level::Info, message));
            *self.active.borrow_mut() = Some(pb);
        } else {
            self.ctx.info(message);
        }
    }

    fn success(&self, message: &str) {
        self.settle();
        self.ctx.success(message);
    }

    fn warn(&self, message: &str) {
        self.settle();
        self.ctx.warn(message);
    }

    fn error(&self, message: &str) {
        self.settle();
        self.ctx.error(message);
    }

    fn detail(&self, text: &str) {
        match self.active.borrow().as_ref() {
            Some(pb) if !self.ctx.quiet => pb.suspend(|| println!("{text}")),
            _ => self.ctx.detail(text),
        }
    }
}

impl Drop for TerminalReporter<'_> {
    fn drop(&mut self) {
        self.settle();
    }
}
