//! Port trait definitions for the Application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure must fulfill.
//! This file imports only from `crate::domain`, never from `crate::infra`,
//! `crate::commands`, or `crate::output`.

use std::path::PathBuf;
use std::pin::Pin;

use anyhow::Result;
use futures_util::Stream;

use crate::domain::{
    ApiError, Application, DesiredState, InstanceSnapshot, LiftoffConfig, LogMessage,
};

// ── Platform Ports ────────────────────────────────────────────────────────────

/// Application lookup and desired-state changes.
#[allow(async_fn_in_trait)]
pub trait ApplicationRepository {
    /// Find an application by name in the targeted space.
    async fn read(&self, name: &str) -> Result<Application>;
    /// Change the application's desired state and return the updated record.
    async fn update(&self, guid: &str, state: DesiredState) -> Result<Application>;
}

/// Per-instance state queries.
#[allow(async_fn_in_trait)]
pub trait InstanceRepository {
    /// Fetch the current instance states.
    ///
    /// Backend-reported failures come back as [`ApiError::Backend`] so the
    /// caller can tell "not staged yet" apart from real failures.
    async fn get_instances(&self, app_guid: &str) -> Result<InstanceSnapshot, ApiError>;
}

/// Push-based stream of log messages. Dropping it closes the connection.
pub type LogStream = Pin<Box<dyn Stream<Item = Result<LogMessage>> + Send>>;

/// Live log streaming.
#[allow(async_fn_in_trait)]
pub trait LogsRepository {
    /// Open a tail on the application's log stream.
    async fn tail(&self, app_guid: &str) -> Result<LogStream>;
}

// ── Progress Reporting Port ───────────────────────────────────────────────────

/// Abstracts progress reporting so services can emit events without
/// depending on the Presentation layer. Sync trait, no async needed.
pub trait ProgressReporter {
    /// Emit an in-progress step message.
    fn step(&self, message: &str);
    /// Emit a success message.
    fn success(&self, message: &str);
    /// Emit a warning message.
    fn warn(&self, message: &str);
    /// Replace the transient progress line.
    fn progress(&self, message: &str);
    /// Emit one streamed log line.
    fn log_line(&self, line: &str);
    /// Emit the terminal failure message.
    fn failed(&self, message: &str);
}

// ── Configuration Port ────────────────────────────────────────────────────────

/// Abstracts configuration persistence.
pub trait ConfigStore {
    /// Load configuration, falling back to defaults when no file exists.
    fn load(&self) -> Result<LiftoffConfig>;
    /// Persist configuration.
    fn save(&self, config: &LiftoffConfig) -> Result<()>;
    /// Location of the configuration file.
    fn path(&self) -> Result<PathBuf>;
}
