//! The spinner that carries the transient `start` progress line.
//!
//! One spinner lives at a time. It is either settled (its last line stays on
//! screen) when a permanent line follows, or cleared when the reporter goes
//! away.

#![allow(clippy::expect_used)] // Templates are compile-time constants

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

const TICKS: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
const TICK_INTERVAL: Duration = Duration::from_millis(100);

/// Indent of progress lines, matching the step text after `  → `.
const RUNNING: &str = "  {spinner:.cyan} {msg}";
const SETTLED: &str = "    {msg}";

/// Show `msg` next to a ticking spinner.
///
/// # Panics
///
/// Never in practice: the template is a constant.
#[must_use]
pub fn spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_strings(TICKS)
            .template(RUNNING)
            .expect("valid template"),
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(TICK_INTERVAL);
    pb
}

/// Freeze the last progress line in place, without the spinner glyph.
pub fn settle(pb: &ProgressBar) {
    pb.set_style(ProgressStyle::with_template(SETTLED).expect("valid template"));
    pb.finish();
}

/// Remove the spinner line entirely.
pub fn clear(pb: &ProgressBar) {
    pb.finish_and_clear();
}
