//! Infrastructure layer: concrete implementations of application port traits.
//!
//! This module contains all I/O-performing code: HTTP calls to the platform
//! API, log streaming, and configuration files.
//!
//! Imports from `crate::domain` and `crate::application::ports` are allowed.
//! Imports from `crate::commands` or `crate::output` are forbidden.

pub mod config;
pub mod log_stream;
pub mod platform;

pub use platform::PlatformClient;
