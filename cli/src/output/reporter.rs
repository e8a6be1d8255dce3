//! `TerminalReporter`: Presentation-layer implementation of `ProgressReporter`.
//!
//! Wraps `&OutputContext` and implements the `application::ports::ProgressReporter`
//! trait so application services can emit progress events without depending on
//! any presentation type directly.
//!
//! On a TTY the transient progress line lives in an indicatif spinner and log
//! lines are printed above it. Elsewhere each distinct progress line is
//! printed once.

use std::cell::RefCell;

use indicatif::ProgressBar;
use owo_colors::OwoColorize as _;

use crate::application::ports::ProgressReporter;
use crate::output::{OutputContext, progress};

/// Terminal progress reporter that wraps an `OutputContext`.
///
/// - `step()` prints `"  → {message}"` (suppressed when `ctx.quiet`)
/// - `success()` prints `"  ✓ {message}"` (suppressed when `ctx.quiet`)
/// - `warn()` prints `"  ! {message}"` (suppressed when `ctx.quiet`)
/// - `failed()` prints `FAILED` and the message together on stderr (the
///   message is never suppressed)
pub struct TerminalReporter<'a> {
    ctx: &'a OutputContext,
    spinner: RefCell<Option<ProgressBar>>,
    last_progress: RefCell<Option<String>>,
}

impl<'a> TerminalReporter<'a> {
    /// Create a new `TerminalReporter` wrapping the given output context.
    #[must_use]
    pub fn new(ctx: &'a OutputContext) -> Self {
        Self {
            ctx,
            spinner: RefCell::new(None),
            last_progress: RefCell::new(None),
        }
    }

    /// Freeze the current progress line, if any, so the next message prints
    /// below it.
    fn settle(&self) {
        if let Some(pb) = self.spinner.borrow_mut().take() {
            progress::settle(&pb);
        }
        self.last_progress.borrow_mut().take();
    }
}

impl ProgressReporter for TerminalReporter<'_> {
    fn step(&self, message: &str) {
        self.settle();
        self.ctx.step(message);
    }

    fn success(&self, message: &str) {
        self.settle();
        self.ctx.success(message);
    }

    fn warn(&self, message: &str) {
        self.settle();
        self.ctx.warn(message);
    }

    fn progress(&self, message: &str) {
        if self.ctx.quiet {
            return;
        }
        if self.ctx.show_progress() {
            let mut spinner = self.spinner.borrow_mut();
            match spinner.as_ref() {
                Some(pb) => pb.set_message(message.to_string()),
                None => *spinner = Some(progress::spinner(message)),
            }
            return;
        }
        let mut last = self.last_progress.borrow_mut();
        if last.as_deref() != Some(message) {
            println!("    {message}");
            *last = Some(message.to_string());
        }
    }

    fn log_line(&self, line: &str) {
        if self.ctx.quiet {
            return;
        }
        let styled = format!("    {}", line.style(self.ctx.styles.log));
        match self.spinner.borrow().as_ref() {
            Some(pb) => pb.println(styled),
            None => println!("{styled}"),
        }
    }

    fn failed(&self, message: &str) {
        self.settle();
        eprintln!("{}", failure_text(self.ctx, message));
    }
}

/// `FAILED` followed by its cause, as one block for stderr. Quiet mode keeps
/// only the cause.
pub(crate) fn failure_text(ctx: &OutputContext, message: &str) -> String {
    let cause = ctx.error_line(message);
    if ctx.quiet {
        return cause;
    }
    format!(
        "{}\n{cause}",
        "FAILED".style(ctx.styles.error).style(ctx.styles.bold)
    )
}

impl Drop for TerminalReporter<'_> {
    fn drop(&mut self) {
        if let Some(pb) = self.spinner.get_mut().take() {
            progress::clear(&pb);
        }
    }
}
