//! CLI argument parsing with clap derive

use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};

use liftoff_cli::app::{AppContext, AppFlags};
use liftoff_cli::commands;

/// Start apps on the platform and watch them come up
#[derive(Parser)]
#[command(
    name = "liftoff",
    version,
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Start an app and wait for its instances to run
    Start(commands::start::StartArgs),

    /// Manage configuration
    #[command(subcommand)]
    Config(commands::config::ConfigCommand),
}

impl Cli {
    /// Execute the CLI command.
    ///
    /// # Errors
    ///
    /// Returns an error if the command fails before it can report an outcome.
    pub async fn run(self) -> Result<ExitCode> {
        let Cli {
            no_color,
            quiet,
            json,
            command,
        } = self;
        let app = AppContext::new(&AppFlags {
            no_color,
            quiet,
            json,
        });
        match command {
            Command::Start(args) => commands::start::run(&args, &app).await,
            Command::Config(cmd) => commands::config::run(&app, cmd),
        }
    }
}
