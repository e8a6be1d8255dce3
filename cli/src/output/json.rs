//! JSON output helpers.
//!
//! `--json` prints exactly one object per invocation: the start outcome, the
//! configuration, or an error object when the command fails.

use anyhow::{Context, Result};
use serde::Serialize;

use crate::application::services::app_start::StartOutcome;

/// Format a JSON error object.
///
/// Output (pretty-printed):
/// ```json
/// {
///   "error": true,
///   "message": "...",
///   "code": "..."
/// }
/// ```
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn format_error(message: &str, code: &str) -> Result<String> {
    let obj = serde_json::json!({
        "error": true,
        "message": message,
        "code": code,
    });
    serde_json::to_string_pretty(&obj).context("JSON serialization failed")
}

/// Format a start outcome, adding `success` and, on failure, `message`.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn format_outcome(outcome: &StartOutcome) -> Result<String> {
    let mut obj = serde_json::to_value(outcome).context("JSON serialization failed")?;
    if let Some(map) = obj.as_object_mut() {
        map.insert("success".into(), outcome.is_success().into());
        if let Some(message) = outcome.failure_message() {
            map.insert("message".into(), message.into());
        }
    }
    serde_json::to_string_pretty(&obj).context("JSON serialization failed")
}

/// Pretty-print any serializable value.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn format_value<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).context("JSON serialization failed")
}
