//! `liftoff config`: show and set configuration values.

use std::process::ExitCode;

use anyhow::Result;
use clap::Subcommand;

use crate::app::AppContext;
use crate::application::ports::ConfigStore;
use crate::application::services::config_service;
use crate::output::human::mask_token;
use crate::output::json;

/// Config subcommands.
#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show,
    /// Set configuration value
    Set {
        /// Configuration key, e.g. `target.api` or `timeouts.staging_minutes`
        key: String,
        /// Configuration value
        value: String,
    },
}

/// Run the config command.
///
/// # Errors
///
/// Returns an error if the key or value is invalid, or the file cannot be
/// read or written.
pub fn run(app: &AppContext, cmd: ConfigCommand) -> Result<ExitCode> {
    match cmd {
        ConfigCommand::Show => show_config(app),
        ConfigCommand::Set { key, value } => set_config(app, &key, &value),
    }
}

fn show_config(app: &AppContext) -> Result<ExitCode> {
    let mut config = app.config()?;
    let path = app.config_store.path()?;
    if app.is_json() {
        config.target.token = config.target.token.as_deref().map(mask_token);
        println!("{}", json::format_value(&config)?);
    } else {
        app.human().render_config(&config, &path);
    }
    Ok(ExitCode::SUCCESS)
}

fn set_config(app: &AppContext, key: &str, value: &str) -> Result<ExitCode> {
    config_service::set_value(&app.config_store, key, value)?;
    let shown = if key == "target.token" {
        mask_token(value)
    } else {
        value.to_string()
    };
    app.output.success(&format!("Set {key} = {shown}"));
    Ok(ExitCode::SUCCESS)
}
