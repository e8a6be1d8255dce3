//! Terminal output for liftoff.
//!
//! [`OutputContext`] decides once whether stdout gets colors and spinners.
//! Everything that prints goes through it or through a renderer built on it:
//! [`TerminalReporter`] for `start` progress, [`HumanRenderer`] for summaries
//! and [`json`] for `--json` documents.

pub mod human;
pub mod json;
pub mod progress;
pub mod reporter;
pub mod styles;

use console::Term;
use owo_colors::{OwoColorize as _, Style};

pub use human::HumanRenderer;
pub use reporter::TerminalReporter;
pub use styles::Styles;

/// Width of the key column in summary rows.
const KEY_WIDTH: usize = 12;

/// Where and how liftoff writes to the terminal.
pub struct OutputContext {
    pub styles: Styles,
    /// Stdout is an interactive terminal.
    pub is_tty: bool,
    /// `--quiet` or `--json`: only failures reach the terminal.
    pub quiet: bool,
}

impl OutputContext {
    /// Colors are used only on a terminal, and never with `--no-color` or
    /// `NO_COLOR` set.
    #[must_use]
    pub fn new(no_color: bool, quiet: bool) -> Self {
        let is_tty = Term::stdout().is_term();
        let styles = if !no_color && is_tty && std::env::var_os("NO_COLOR").is_none() {
            Styles::colored()
        } else {
            Styles::default()
        };
        Self {
            styles,
            is_tty,
            quiet,
        }
    }

    /// Whether the transient progress line may use a spinner.
    #[must_use]
    pub fn show_progress(&self) -> bool {
        self.is_tty && !self.quiet
    }

    /// `  → msg`
    pub fn step(&self, msg: &str) {
        self.marked("→", self.styles.step, msg);
    }

    /// `  ✓ msg`
    pub fn success(&self, msg: &str) {
        self.marked("✓", self.styles.success, msg);
    }

    /// `  ! msg`
    pub fn warn(&self, msg: &str) {
        self.marked("!", self.styles.warning, msg);
    }

    /// `  ✗ msg` on stderr, even when quiet.
    pub fn error(&self, msg: &str) {
        eprintln!("{}", self.error_line(msg));
    }

    pub(crate) fn error_line(&self, msg: &str) -> String {
        format!("  {} {msg}", "✗".style(self.styles.error))
    }

    pub fn header(&self, msg: &str) {
        if !self.quiet {
            println!("  {}", msg.style(self.styles.header));
        }
    }

    /// One `key  value` row of a summary block.
    pub fn kv(&self, key: &str, value: &str) {
        if !self.quiet {
            let key = format!("{key:<KEY_WIDTH$}");
            println!("  {}  {value}", key.style(self.styles.key));
        }
    }

    fn marked(&self, mark: &str, style: Style, msg: &str) {
        if !self.quiet {
            println!("  {} {msg}", mark.style(style));
        }
    }
}
