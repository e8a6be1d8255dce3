//! Typed domain error enums.
//!
//! All error types implement `thiserror::Error` and convert to `anyhow::Error`
//! via the `?` operator.

use thiserror::Error;

// ── API errors ────────────────────────────────────────────────────────────────

/// Errors reported by the platform API.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApiError {
    /// The backend answered with an error body carrying a code.
    #[error("{description}")]
    Backend { code: String, description: String },

    /// The request never produced a usable answer.
    #[error("{0}")]
    Transport(String),
}

impl ApiError {
    /// Backend error code, if the backend supplied one.
    #[must_use]
    pub fn code(&self) -> Option<&str> {
        match self {
            Self::Backend { code, .. } => Some(code),
            Self::Transport(_) => None,
        }
    }
}

// ── Application errors ────────────────────────────────────────────────────────

/// Errors related to application lookup.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("App {0} not found")]
    NotFound(String),

    #[error("No target space. Run 'liftoff config set target.space_guid <guid>'.")]
    NoTargetSpace,
}

// ── Config errors ─────────────────────────────────────────────────────────────

/// Errors related to configuration key/value validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Unknown setting: {key}\n\nValid settings: {valid}")]
    UnknownKey { key: String, valid: String },

    #[error("Invalid value for {key}: {value}\n\n{hint}")]
    InvalidValue {
        key: String,
        value: String,
        hint: String,
    },
}
