//! Runtime configuration for the scheduling core.
//!
//! # Responsibility
//! - Hold store timeout, listing page size and logging settings.
//! - Load overrides from `RENDEZVOUS_*` environment variables.
//!
//! # Invariants
//! - `page_size >= 1` and `store.timeout > 0` for every constructed config.

use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::num::NonZeroU32;
use std::path::PathBuf;
use std::time::Duration;

/// Per-operation store timeout, in seconds.
pub const DEFAULT_STORE_TIMEOUT_SECS: u64 = 10;

/// Listing page size.
pub const DEFAULT_PAGE_SIZE: u32 = 2;

pub const ENV_STORE_TIMEOUT_SECS: &str = "RENDEZVOUS_STORE_TIMEOUT_SECS";
pub const ENV_PAGE_SIZE: &str = "RENDEZVOUS_PAGE_SIZE";
pub const ENV_LOG_LEVEL: &str = "RENDEZVOUS_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "RENDEZVOUS_LOG_DIR";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidValue { key: &'static str, value: String },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidValue { key, value } => {
                write!(f, "invalid value `{value}` for {key}")
            }
        }
    }
}

impl Error for ConfigError {}

/// Store connection settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Upper bound a single store operation waits on a locked database.
    pub timeout: Duration,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_STORE_TIMEOUT_SECS),
        }
    }
}

/// File logging settings. Logging stays off when `log_dir` is `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    pub level: String,
    pub log_dir: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: crate::logging::default_log_level().to_string(),
            log_dir: None,
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchedulerConfig {
    pub store: StoreConfig,
    pub page_size: NonZeroU32,
    pub logging: LoggingConfig,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            store: StoreConfig::default(),
            page_size: NonZeroU32::MIN.saturating_add(DEFAULT_PAGE_SIZE - 1),
            logging: LoggingConfig::default(),
        }
    }
}

impl SchedulerConfig {
    /// Loads configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(&std::env::vars().collect())
    }

    /// Loads configuration from a variable map; unset keys keep defaults.
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(raw) = non_empty(vars, ENV_STORE_TIMEOUT_SECS) {
            let secs = raw
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or_else(|| invalid(ENV_STORE_TIMEOUT_SECS, raw))?;
            config.store.timeout = Duration::from_secs(secs);
        }

        if let Some(raw) = non_empty(vars, ENV_PAGE_SIZE) {
            config.page_size = raw
                .parse::<NonZeroU32>()
                .map_err(|_| invalid(ENV_PAGE_SIZE, raw))?;
        }

        if let Some(raw) = non_empty(vars, ENV_LOG_LEVEL) {
            config.logging.level = raw.to_string();
        }

        if let Some(raw) = non_empty(vars, ENV_LOG_DIR) {
            config.logging.log_dir = Some(PathBuf::from(raw));
        }

        Ok(config)
    }
}

fn non_empty<'a>(vars: &'a HashMap<String, String>, key: &str) -> Option<&'a str> {
    vars.get(key)
        .map(|value| value.trim())
        .filter(|value| !value.is_empty())
}

fn invalid(key: &'static str, value: &str) -> ConfigError {
    ConfigError::InvalidValue {
        key,
        value: value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect()
    }

    #[test]
    fn defaults_match_service_settings() {
        let config = SchedulerConfig::from_vars(&HashMap::new()).unwrap();
        assert_eq!(config.store.timeout, Duration::from_secs(10));
        assert_eq!(config.page_size.get(), 2);
        assert!(config.logging.log_dir.is_none());
    }

    #[test]
    fn overrides_are_applied() {
        let config = SchedulerConfig::from_vars(&vars(&[
            (ENV_STORE_TIMEOUT_SECS, "3"),
            (ENV_PAGE_SIZE, "25"),
            (ENV_LOG_LEVEL, "warn"),
            (ENV_LOG_DIR, "/var/log/rendezvous"),
        ]))
        .unwrap();

        assert_eq!(config.store.timeout, Duration::from_secs(3));
        assert_eq!(config.page_size.get(), 25);
        assert_eq!(config.logging.level, "warn");
        assert_eq!(
            config.logging.log_dir,
            Some(PathBuf::from("/var/log/rendezvous"))
        );
    }

    #[test]
    fn zero_page_size_is_rejected() {
        let err = SchedulerConfig::from_vars(&vars(&[(ENV_PAGE_SIZE, "0")])).unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidValue {
                key: ENV_PAGE_SIZE,
                value: "0".to_string()
            }
        );
    }

    #[test]
    fn non_numeric_timeout_is_rejected() {
        let err =
            SchedulerConfig::from_vars(&vars(&[(ENV_STORE_TIMEOUT_SECS, "soon")])).unwrap_err();
        assert!(err.to_string().contains(ENV_STORE_TIMEOUT_SECS));
    }

    #[test]
    fn zero_timeout_is_rejected() {
        assert!(SchedulerConfig::from_vars(&vars(&[(ENV_STORE_TIMEOUT_SECS, "0")])).is_err());
    }
}
