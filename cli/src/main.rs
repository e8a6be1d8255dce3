//! liftoff - start apps and watch them come up

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;

use cli::Cli;

/// Environment variable holding the diagnostic log filter.
const LOG_ENV: &str = "LIFTOFF_LOG";

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    let cli = Cli::parse();
    let json = cli.json;
    match cli.run().await {
        Ok(code) => code,
        Err(e) => {
            if json {
                match liftoff_cli::output::json::format_error(&format!("{e:#}"), "command_failed") {
                    Ok(body) => println!("{body}"),
                    Err(_) => eprintln!("Error: {e:#}"),
                }
            } else {
                eprintln!("Error: {e:#}");
            }
            ExitCode::FAILURE
        }
    }
}

/// Diagnostics go to stderr so they never mix with command output.
fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
