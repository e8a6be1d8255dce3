//! Domain types and validators for liftoff configuration.
//!
//! Pure functions only: no I/O, no async, no filesystem access.

use std::time::Duration;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::domain::error::ConfigError;

// ── Constants ────────────────────────────────────────────────────────────────

pub const VALID_CONFIG_KEYS: &[&str] = &[
    "target.api",
    "target.logs",
    "target.token",
    "target.org",
    "target.space",
    "target.space_guid",
    "target.user",
    "timeouts.staging_minutes",
    "timeouts.startup_minutes",
    "timeouts.ping_throttle_seconds",
];

pub const DEFAULT_STAGING_MINUTES: u64 = 15;
pub const DEFAULT_STARTUP_MINUTES: u64 = 5;
pub const DEFAULT_PING_THROTTLE_SECONDS: u64 = 5;

// ── Config schema ────────────────────────────────────────────────────────────

/// Top-level configuration stored in `~/.liftoff/config.yaml`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct LiftoffConfig {
    /// Platform endpoint and identity.
    pub target: TargetConfig,
    /// Start command timing.
    pub timeouts: TimeoutConfig,
}

/// Where requests go and who they are made as.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct TargetConfig {
    /// Platform API base URL, e.g. `https://api.example.com`.
    pub api: Option<String>,
    /// Log streaming base URL.
    pub logs: Option<String>,
    /// Bearer token sent with every request.
    pub token: Option<String>,
    pub org: Option<String>,
    pub space: Option<String>,
    pub space_guid: Option<String>,
    pub user: Option<String>,
}

/// Timeouts in the units operators set them in.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeoutConfig {
    pub staging_minutes: u64,
    pub startup_minutes: u64,
    pub ping_throttle_seconds: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            staging_minutes: DEFAULT_STAGING_MINUTES,
            startup_minutes: DEFAULT_STARTUP_MINUTES,
            ping_throttle_seconds: DEFAULT_PING_THROTTLE_SECONDS,
        }
    }
}

/// Overrides layered on top of the config file (environment, then flags).
///
/// Minutes for the two timeouts, seconds for the throttle.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TimeoutOverrides {
    pub staging_timeout: Option<u64>,
    pub startup_timeout: Option<u64>,
    pub ping_throttle: Option<u64>,
}

/// Resolved timing for one start invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StartSettings {
    /// How long staging may take before giving up.
    pub staging_timeout: Duration,
    /// How long instances may take to reach running once staged.
    pub startup_timeout: Duration,
    /// Pause between instance polls.
    pub ping_throttle: Duration,
}

impl Default for StartSettings {
    fn default() -> Self {
        Self::from_config(&TimeoutConfig::default())
    }
}

impl StartSettings {
    #[must_use]
    pub fn from_config(cfg: &TimeoutConfig) -> Self {
        Self {
            staging_timeout: minutes(cfg.staging_minutes),
            startup_timeout: minutes(cfg.startup_minutes),
            ping_throttle: throttle(cfg.ping_throttle_seconds),
        }
    }

    /// Apply overrides; unset fields keep their current value.
    #[must_use]
    pub fn with_overrides(mut self, overrides: &TimeoutOverrides) -> Self {
        if let Some(m) = overrides.staging_timeout {
            self.staging_timeout = minutes(m);
        }
        if let Some(m) = overrides.startup_timeout {
            self.startup_timeout = minutes(m);
        }
        if let Some(s) = overrides.ping_throttle {
            self.ping_throttle = throttle(s);
        }
        self
    }
}

fn minutes(m: u64) -> Duration {
    Duration::from_secs(m.saturating_mul(60))
}

/// Polling never runs back to back, even with a hand-edited zero.
fn throttle(s: u64) -> Duration {
    Duration::from_secs(s.max(1))
}

impl LiftoffConfig {
    /// Set a whitelisted key after validating its value.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value is invalid.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        validate_config_key(key)?;
        validate_config_value(key, value)?;
        let text = Some(value.to_string());
        match key {
            "target.api" => self.target.api = text,
            "target.logs" => self.target.logs = text,
            "target.token" => self.target.token = text,
            "target.org" => self.target.org = text,
            "target.space" => self.target.space = text,
            "target.space_guid" => self.target.space_guid = text,
            "target.user" => self.target.user = text,
            "timeouts.staging_minutes" => self.timeouts.staging_minutes = parse_number(value),
            "timeouts.startup_minutes" => self.timeouts.startup_minutes = parse_number(value),
            "timeouts.ping_throttle_seconds" => {
                self.timeouts.ping_throttle_seconds = parse_number(value);
            }
            _ => unknown_key(key)?,
        }
        Ok(())
    }
}

fn parse_number(value: &str) -> u64 {
    value.parse().unwrap_or_default()
}

fn unknown_key(key: &str) -> Result<()> {
    Err(ConfigError::UnknownKey {
        key: key.to_string(),
        valid: VALID_CONFIG_KEYS.join(", "),
    }
    .into())
}

// ── Validators ───────────────────────────────────────────────────────────────

/// Validates a configuration key against the whitelist.
///
/// # Errors
///
/// Returns an error if the key is not in the allowed list.
pub fn validate_config_key(key: &str) -> Result<()> {
    if !VALID_CONFIG_KEYS.contains(&key) {
        return unknown_key(key);
    }
    Ok(())
}

/// Validates a configuration value for the given key.
///
/// # Errors
///
/// Returns an error if the value is not valid for the key.
pub fn validate_config_value(key: &str, value: &str) -> Result<()> {
    let invalid = |hint: &str| -> Result<()> {
        Err(ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
            hint: hint.to_string(),
        }
        .into())
    };

    match key {
        "target.api" | "target.logs" => {
            if !(value.starts_with("https://") || value.starts_with("http://")) {
                return invalid("Expected an http:// or https:// URL");
            }
        }
        "timeouts.staging_minutes" | "timeouts.startup_minutes" => {
            if value.parse::<u64>().is_err() {
                return invalid("Expected a whole number of minutes");
            }
        }
        "timeouts.ping_throttle_seconds" => {
            if !value.parse::<u64>().is_ok_and(|s| s > 0) {
                return invalid("Expected a positive whole number of seconds");
            }
        }
        _ => {
            if value.trim().is_empty() {
                return invalid("Value must not be empty");
            }
        }
    }
    Ok(())
}

// ── Unit tests ───────────────────────────────────────────────────────────────
