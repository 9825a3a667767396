//! Client configuration.
//!
//! Read from `config.toml` in the platform config directory when present;
//! every key is optional. `EXPENSETUI_API_URL` overrides the API endpoint.

use serde::Deserialize;
use std::path::Path;

pub(crate) const DEFAULT_API_URL: &str = "http://localhost:8080/api/expenses";
pub(crate) const DEFAULT_LOG_FILTER: &str = "expensetui=info";
pub(crate) const API_URL_ENV: &str = "EXPENSETUI_API_URL";

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct Config {
    pub(crate) api_url: String,
    /// No timeout beyond the transport's own when unset.
    pub(crate) request_timeout_secs: Option<u64>,
    pub(crate) log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            request_timeout_secs: None,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub(crate) enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid config value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

impl Config {
    pub(crate) fn load(path: &Path) -> Result<Self, ConfigError> {
        let mut config = if path.exists() {
            Self::from_path(path)?
        } else {
            Self::default()
        };
        if let Ok(url) = std::env::var(API_URL_ENV) {
            if !url.trim().is_empty() {
                config.api_url = url;
            }
        }
        config.validate()?;
        Ok(config)
    }

    pub(crate) fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    pub(crate) fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        let url = self.api_url.trim();
        if url.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "api_url",
                reason: "must not be empty".to_string(),
            });
        }
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::InvalidValue {
                field: "api_url",
                reason: format!("must start with http:// or https:// (got '{url}')"),
            });
        }
        if self.request_timeout_secs == Some(0) {
            return Err(ConfigError::InvalidValue {
                field: "request_timeout_secs",
                reason: "must be > 0".to_string(),
            });
        }
        Ok(())
    }
}
