//! Colors used by liftoff's terminal output.

use owo_colors::Style;

/// One style per kind of line `start` and `config` print. The default is
/// plain text; see [`Styles::colored`].
#[derive(Debug, Default, Clone, Copy)]
pub struct Styles {
    /// `✓` marks and the `OK` after the state update.
    pub success: Style,
    /// `!` marks: already started, log tail trouble.
    pub warning: Style,
    /// `✗` marks and `FAILED`.
    pub error: Style,
    /// `→` marks in front of each step.
    pub step: Style,
    /// Left column of summary rows.
    pub key: Style,
    pub bold: Style,
    pub header: Style,
    /// Staging output streamed from the log endpoint.
    pub log: Style,
}

impl Styles {
    /// The palette used on an interactive terminal.
    #[must_use]
    pub fn colored() -> Self {
        Self {
            success: Style::new().green(),
            warning: Style::new().yellow(),
            error: Style::new().red(),
            step: Style::new().blue(),
            key: Style::new().dimmed(),
            bold: Style::new().bold(),
            header: Style::new().bold().cyan(),
            log: Style::new().bright_black(),
        }
    }
}
