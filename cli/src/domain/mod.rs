//! Domain layer: pure business logic, types, and validation.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All functions are synchronous and take data in, returning data out.

pub mod app;
pub mod config;
pub mod error;
pub mod instances;
pub mod logs;

pub use app::{Application, DesiredState, InstanceSnapshot, InstanceState, RouteBinding};
pub use config::{LiftoffConfig, StartSettings, validate_config_key, validate_config_value};
pub use error::{ApiError, AppError, ConfigError};
pub use instances::{AggregateStatus, Verdict, classify};
pub use logs::{LogMessage, LogSource, is_relevant};
