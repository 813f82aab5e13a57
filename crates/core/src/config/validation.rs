//! Configuration validation rules.
//!
//! This module provides validation logic for `AppConfig` values
//! after they have been loaded from environment, files, or defaults.

use crate::config::AppConfig;
use thiserror::Error;

/// Configuration validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("invalid configuration: {field} - {reason}")]
    Invalid { field: String, reason: String },

    #[error("missing required configuration: {field} ({hint})")]
    Missing { field: String, hint: String },
}

fn check_timeout(field: &str, value: u64) -> Result<(), ConfigError> {
    if value < 100 {
        return Err(ConfigError::Invalid { field: field.into(), reason: "must be at least 100ms".into() });
    }
    if value > 300_000 {
        return Err(ConfigError::Invalid { field: field.into(), reason: "must not exceed 5 minutes (300000ms)".into() });
    }
    Ok(())
}

fn check_base_url(field: &str, value: &str) -> Result<(), ConfigError> {
    let parsed =
        url::Url::parse(value).map_err(|e| ConfigError::Invalid { field: field.into(), reason: e.to_string() })?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ConfigError::Invalid { field: field.into(), reason: "scheme must be http or https".into() });
    }
    Ok(())
}

impl AppConfig {
    /// Validate configuration values after loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Missing` if `api_key` is empty, and
    /// `ConfigError::Invalid` if:
    /// - a timeout is below 100ms or above 5 minutes
    /// - `user_agent` is empty
    /// - a provider base URL is not an http(s) URL
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_key.trim().is_empty() {
            return Err(ConfigError::Missing {
                field: "api_key".into(),
                hint: "Set PHONECHECK_API_KEY environment variable".into(),
            });
        }

        check_timeout("timeout_ms", self.timeout_ms)?;
        check_timeout("enrichment_timeout_ms", self.enrichment_timeout_ms)?;

        if self.user_agent.is_empty() {
            return Err(ConfigError::Invalid { field: "user_agent".into(), reason: "must not be empty".into() });
        }

        check_base_url("validation_base_url", &self.validation_base_url)?;
        check_base_url("identity_base_url", &self.identity_base_url)?;
        check_base_url("spam_base_url", &self.spam_base_url)?;

        if self.cache_max_age_secs == Some(0) {
            tracing::warn!("cache_max_age_secs is 0; every lookup will bypass the cache");
        }

        Ok(())
    }
}
