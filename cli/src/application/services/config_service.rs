//! Application service: configuration use-cases.

use anyhow::Result;

use crate::application::ports::ConfigStore;
use crate::domain::config::{LiftoffConfig, StartSettings, TimeoutOverrides};

/// Load configuration.
///
/// # Errors
///
/// Returns an error if the store cannot read or parse the file.
pub fn load_config(store: &impl ConfigStore) -> Result<LiftoffConfig> {
    store.load()
}

/// Validate and persist a single `key = value` change.
///
/// # Errors
///
/// Returns an error if the key or value is invalid, or persistence fails.
pub fn set_value(store: &impl ConfigStore, key: &str, value: &str) -> Result<LiftoffConfig> {
    let mut config = store.load()?;
    config.set(key, value)?;
    store.save(&config)?;
    Ok(config)
}

/// Resolve start timing: config file, then environment, then flags.
#[must_use]
pub fn resolve_settings(
    config: &LiftoffConfig,
    env: &TimeoutOverrides,
    flags: &TimeoutOverrides,
) -> StartSettings {
    StartSettings::from_config(&config.timeouts)
        .with_overrides(env)
        .with_overrides(flags)
}
