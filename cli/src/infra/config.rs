//! Infrastructure implementation of the `ConfigStore` port, plus environment
//! overrides for start timing.

use anyhow::{Context, Result};
use std::path::PathBuf;

use crate::application::ports::ConfigStore;
use crate::domain::config::{LiftoffConfig, TimeoutOverrides};
use crate::domain::error::ConfigError;

/// Environment variable prefix for timing overrides.
///
/// `LIFTOFF_STAGING_TIMEOUT` / `LIFTOFF_STARTUP_TIMEOUT` are minutes,
/// `LIFTOFF_PING_THROTTLE` is seconds.
pub const ENV_PREFIX: &str = "LIFTOFF_";

/// Production implementation of `ConfigStore` that uses a YAML file on disk.
///
/// The default store resolves `LIFTOFF_CONFIG`, then `~/.liftoff/config.yaml`.
#[derive(Debug, Clone, Default)]
pub struct YamlConfigStore {
    path: Option<PathBuf>,
}

impl YamlConfigStore {
    /// A store pinned to an explicit file.
    #[must_use]
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }
}

impl ConfigStore for YamlConfigStore {
    fn load(&self) -> Result<LiftoffConfig> {
        let path = self.path()?;
        if !path.exists() {
            return Ok(LiftoffConfig::default());
        }
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("cannot read {}", path.display()))?;
        serde_yaml::from_str(&content).with_context(|| format!("cannot parse {}", path.display()))
    }

    fn save(&self, config: &LiftoffConfig) -> Result<()> {
        let path = self.path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("cannot create {}", parent.display()))?;
        }
        let content = serde_yaml::to_string(config).context("cannot serialize config")?;
        std::fs::write(&path, content)
            .with_context(|| format!("cannot write {}", path.display()))?;

        // The file holds a bearer token.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o600))
                .with_context(|| format!("cannot set permissions on {}", path.display()))?;
        }
        Ok(())
    }

    fn path(&self) -> Result<PathBuf> {
        if let Some(path) = &self.path {
            return Ok(path.clone());
        }
        if let Ok(val) = std::env::var("LIFTOFF_CONFIG") {
            return Ok(PathBuf::from(val));
        }
        let home =
            dirs::home_dir().ok_or_else(|| anyhow::anyhow!("cannot determine home directory"))?;
        Ok(home.join(".liftoff").join("config.yaml"))
    }
}

/// Read `LIFTOFF_*` timing overrides from the environment.
///
/// # Errors
///
/// Returns an error if a variable is set but is not a whole number.
pub fn env_overrides() -> Result<TimeoutOverrides> {
    overrides_from(std::env::vars())
}

/// Read timing overrides from `(name, value)` pairs.
///
/// # Errors
///
/// Returns an error if a recognised variable is not a whole number, or if the
/// ping throttle is zero.
pub fn overrides_from<I>(vars: I) -> Result<TimeoutOverrides>
where
    I: IntoIterator<Item = (String, String)>,
{
    let overrides: TimeoutOverrides = envy::prefixed(ENV_PREFIX)
        .from_iter(vars)
        .context("invalid LIFTOFF_* timeout override")?;
    if overrides.ping_throttle == Some(0) {
        return Err(ConfigError::InvalidValue {
            key: format!("{ENV_PREFIX}PING_THROTTLE"),
            value: "0".to_string(),
            hint: "Expected a positive whole number of seconds".to_string(),
        }
        .into());
    }
    Ok(overrides)
}
