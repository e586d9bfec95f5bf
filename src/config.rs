//! Client configuration loaded from environment variables.

use std::env;
use std::time::Duration;

use crate::models::DEFAULT_HISTORY_LIMIT;

/// Default values used when a variable is unset.
pub mod defaults {
    /// Remote calls wait indefinitely unless a timeout is configured.
    pub const CALL_TIMEOUT_SECS: u64 = 0;
    pub const HISTORY_LIMIT: u32 = super::DEFAULT_HISTORY_LIMIT;
    pub const RETENTION_DAYS: u32 = 30;
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Upper bound on a single remote call (None = wait indefinitely)
    pub call_timeout: Option<Duration>,
    /// History limit used when the caller does not pass one
    pub history_limit: u32,
    /// Retention period in days used by host-side cleanup
    pub retention_days: u32,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            call_timeout: None,
            history_limit: defaults::HISTORY_LIMIT,
            retention_days: defaults::RETENTION_DAYS,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `TSH_CALL_TIMEOUT_SECS`: Per-call timeout in seconds (default: 0 = none)
    /// - `TSH_HISTORY_LIMIT`: Default history limit (default: 50)
    /// - `TSH_RETENTION_DAYS`: Retention period for cleanup (default: 30)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let timeout_secs = lookup("TSH_CALL_TIMEOUT_SECS")
            .unwrap_or_else(|| defaults::CALL_TIMEOUT_SECS.to_string())
            .trim()
            .parse::<u64>()
            .map_err(|_| {
                ConfigError::InvalidValue("TSH_CALL_TIMEOUT_SECS must be a valid number")
            })?;

        let history_limit = lookup("TSH_HISTORY_LIMIT")
            .unwrap_or_else(|| defaults::HISTORY_LIMIT.to_string())
            .trim()
            .parse::<u32>()
            .map_err(|_| ConfigError::InvalidValue("TSH_HISTORY_LIMIT must be a valid number"))?;

        if history_limit == 0 {
            return Err(ConfigError::InvalidValue(
                "TSH_HISTORY_LIMIT must be greater than zero",
            ));
        }

        let retention_days = lookup("TSH_RETENTION_DAYS")
            .unwrap_or_else(|| defaults::RETENTION_DAYS.to_string())
            .trim()
            .parse::<u32>()
            .map_err(|_| ConfigError::InvalidValue("TSH_RETENTION_DAYS must be a valid number"))?;

        Ok(Config {
            call_timeout: (timeout_secs > 0).then(|| Duration::from_secs(timeout_secs)),
            history_limit,
            retention_days,
        })
    }

    /// Set the per-call timeout.
    pub fn with_call_timeout(mut self, timeout: Duration) -> Self {
        self.call_timeout = Some(timeout);
        self
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration value: {0}")]
    InvalidValue(&'static str),
}
