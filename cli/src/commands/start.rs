//! `liftoff start`: start an app and wait until its instances are running.

use std::process::ExitCode;

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::services::app_start::{AppStarter, StartOutcome, StartTarget};
use crate::application::services::config_service;
use crate::domain::config::TimeoutOverrides;
use crate::infra::PlatformClient;
use crate::infra::config::env_overrides;
use crate::output::json;

/// Exit code used when the operator interrupts the wait.
const INTERRUPTED: u8 = 130;

/// Arguments for the start command.
#[derive(Args, Debug, Default)]
pub struct StartArgs {
    /// Name of the app to start
    pub app: String,

    /// Minutes to wait for staging to finish [env: LIFTOFF_STAGING_TIMEOUT]
    #[arg(long, value_name = "MINUTES")]
    pub staging_timeout: Option<u64>,

    /// Minutes to wait for instances once staged [env: LIFTOFF_STARTUP_TIMEOUT]
    #[arg(long, value_name = "MINUTES")]
    pub startup_timeout: Option<u64>,
}

impl StartArgs {
    fn overrides(&self) -> TimeoutOverrides {
        TimeoutOverrides {
            staging_timeout: self.staging_timeout,
            startup_timeout: self.startup_timeout,
            ping_throttle: None,
        }
    }
}

/// Run `liftoff start`.
///
/// # Errors
///
/// Returns an error if the configuration is incomplete or the app cannot be
/// read. Start failures after that are reported and mapped to a failing exit
/// code.
pub async fn run(args: &StartArgs, app: &AppContext) -> Result<ExitCode> {
    let config = app.config()?;
    let settings = config_service::resolve_settings(&config, &env_overrides()?, &args.overrides());
    tracing::debug!(?settings, app = %args.app, "resolved start settings");

    let client = PlatformClient::new(&config.target)?;
    let starter = AppStarter::new(&client, &client, &client, settings);
    let target = StartTarget {
        org: config.target.org.as_deref(),
        space: config.target.space.as_deref(),
        user: config.target.user.as_deref(),
    };
    let reporter = app.terminal_reporter();

    // Dropping the start future on Ctrl-C also aborts the log tail.
    let outcome = tokio::select! {
        outcome = starter.start(&args.app, target, &reporter) => outcome?,
        Ok(()) = tokio::signal::ctrl_c() => {
            tracing::info!(app = %args.app, "interrupted");
            app.output.error("Interrupted");
            return Ok(ExitCode::from(INTERRUPTED));
        }
    };

    if app.is_json() {
        println!("{}", json::format_outcome(&outcome)?);
    } else if let StartOutcome::Started { app: started } = &outcome {
        app.human().render_started(started);
    }

    Ok(if outcome.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
