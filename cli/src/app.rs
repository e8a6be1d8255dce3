//! Application context: unified state passed to every command handler.
//!
//! Adding a new cross-cutting concern (e.g. `--verbose`) requires only one
//! field change here; command signatures stay the same.

use anyhow::Result;

use crate::application::services::config_service;
use crate::domain::config::LiftoffConfig;
use crate::infra::config::YamlConfigStore;
use crate::output::{HumanRenderer, OutputContext, TerminalReporter};

/// Output rendering mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Human-readable terminal output (default).
    Human,
    /// Machine-readable JSON output.
    Json,
}

/// Flags passed from the top-level CLI to `AppContext::new`.
pub struct AppFlags {
    /// Disable ANSI color output.
    pub no_color: bool,
    /// Suppress non-error output.
    pub quiet: bool,
    /// Enable JSON output mode.
    pub json: bool,
}

/// Unified application context passed to every command handler.
///
/// Constructed once in `Cli::run()` and passed as `&AppContext` to all
/// command handlers.
pub struct AppContext {
    /// Terminal output context (colors, quiet mode).
    pub output: OutputContext,
    /// Output rendering mode (human vs JSON).
    pub mode: OutputMode,
    /// Configuration persistence.
    pub config_store: YamlConfigStore,
}

impl AppContext {
    /// Construct an `AppContext` from top-level CLI flags.
    ///
    /// JSON mode implies quiet terminal output so stdout carries only the
    /// JSON document.
    #[must_use]
    pub fn new(flags: &AppFlags) -> Self {
        let mode = if flags.json {
            OutputMode::Json
        } else {
            OutputMode::Human
        };

        Self {
            output: OutputContext::new(flags.no_color, flags.quiet || flags.json),
            mode,
            config_store: YamlConfigStore::default(),
        }
    }

    /// Returns `true` when JSON output mode is active.
    #[must_use]
    pub fn is_json(&self) -> bool {
        self.mode == OutputMode::Json
    }

    /// Load the configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn config(&self) -> Result<LiftoffConfig> {
        config_service::load_config(&self.config_store)
    }

    /// Human renderer over this context's output settings.
    #[must_use]
    pub fn human(&self) -> HumanRenderer<'_> {
        HumanRenderer::new(&self.output)
    }

    /// Progress reporter for application services.
    #[must_use]
    pub fn terminal_reporter(&self) -> TerminalReporter<'_> {
        TerminalReporter::new(&self.output)
    }
}
