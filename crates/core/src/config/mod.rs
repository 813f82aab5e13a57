//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (PHONECHECK_*)
//! 2. TOML config file (if PHONECHECK_CONFIG_FILE set)
//! 3. Built-in defaults
//!
//! The config is loaded once at startup and passed by reference into the
//! provider clients and the lookup pipeline.

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

mod validation;

pub use validation::ConfigError;

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (PHONECHECK_*)
/// 2. TOML config file (if PHONECHECK_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// API key for the validation provider.
    ///
    /// Set via PHONECHECK_API_KEY environment variable. Required.
    #[serde(default)]
    pub api_key: String,

    /// Path to SQLite cache database.
    ///
    /// Set via PHONECHECK_DB_PATH environment variable.
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    /// User-Agent string for provider requests.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Timeout for the validation call in milliseconds.
    ///
    /// Set via PHONECHECK_TIMEOUT_MS environment variable.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Timeout for each best-effort enrichment call in milliseconds.
    ///
    /// Set via PHONECHECK_ENRICHMENT_TIMEOUT_MS environment variable.
    #[serde(default = "default_enrichment_timeout_ms")]
    pub enrichment_timeout_ms: u64,

    /// Base URL of the validation provider.
    #[serde(default = "default_validation_base_url")]
    pub validation_base_url: String,

    /// Base URL of the caller-name provider.
    #[serde(default = "default_identity_base_url")]
    pub identity_base_url: String,

    /// Base URL of the spam-score provider.
    #[serde(default = "default_spam_base_url")]
    pub spam_base_url: String,

    /// Optional freshness window for cached records, in seconds.
    ///
    /// Unset means a cached record is served indefinitely.
    #[serde(default)]
    pub cache_max_age_secs: Option<u64>,
}

fn default_db_path() -> PathBuf {
    PathBuf::from("./lookup_cache.db")
}

fn default_user_agent() -> String {
    "phonecheck/0.1".into()
}

fn default_timeout_ms() -> u64 {
    10_000
}

fn default_enrichment_timeout_ms() -> u64 {
    5_000
}

fn default_validation_base_url() -> String {
    "https://api.numlookupapi.com/v1".into()
}

fn default_identity_base_url() -> String {
    "https://api.opencnam.com/v3".into()
}

fn default_spam_base_url() -> String {
    "https://spamcalls.net/api".into()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            db_path: default_db_path(),
            user_agent: default_user_agent(),
            timeout_ms: default_timeout_ms(),
            enrichment_timeout_ms: default_enrichment_timeout_ms(),
            validation_base_url: default_validation_base_url(),
            identity_base_url: default_identity_base_url(),
            spam_base_url: default_spam_base_url(),
            cache_max_age_secs: None,
        }
    }
}

impl AppConfig {
    /// Validation timeout as Duration for use with reqwest.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Per-call timeout for the identity and spam providers.
    pub fn enrichment_timeout(&self) -> Duration {
        Duration::from_millis(self.enrichment_timeout_ms)
    }

    /// Freshness window for cached records, if one is configured.
    pub fn cache_max_age(&self) -> Option<chrono::Duration> {
        self.cache_max_age_secs
            .and_then(|secs| i64::try_from(secs).ok())
            .and_then(chrono::Duration::try_seconds)
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// Priority (highest wins):
    /// 1. Environment variables prefixed with `PHONECHECK_`
    /// 2. TOML file from `PHONECHECK_CONFIG_FILE` (if set)
    /// 3. Built-in defaults via `Default::default()`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading, including a missing API key
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("PHONECHECK_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(
            Env::prefixed("PHONECHECK_")
                .ignore(&["CONFIG_FILE"])
                .map(|key| key.as_str().to_lowercase().into()),
        );

        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.db_path, PathBuf::from("./lookup_cache.db"));
        assert_eq!(config.user_agent, "phonecheck/0.1");
        assert_eq!(config.timeout_ms, 10_000);
        assert_eq!(config.enrichment_timeout_ms, 5_000);
        assert_eq!(config.validation_base_url, "https://api.numlookupapi.com/v1");
        assert!(config.api_key.is_empty());
        assert!(config.cache_max_age_secs.is_none());
    }

    #[test]
    fn test_timeout_durations() {
        let config = AppConfig::default();
        assert_eq!(config.timeout(), Duration::from_millis(10_000));
        assert_eq!(config.enrichment_timeout(), Duration::from_secs(5));
    }

    #[test]
    fn test_cache_max_age() {
        let config = AppConfig::default();
        assert!(config.cache_max_age().is_none());

        let config = AppConfig { cache_max_age_secs: Some(86_400), ..Default::default() };
        assert_eq!(config.cache_max_age(), Some(chrono::Duration::days(1)));
    }

    #[test]
    fn test_load_from_env() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("PHONECHECK_API_KEY", "secret");
            jail.set_env("PHONECHECK_DB_PATH", "/tmp/numbers.db");
            jail.set_env("PHONECHECK_ENRICHMENT_TIMEOUT_MS", "2500");

            let config = AppConfig::load().map_err(|e| e.to_string())?;
            assert_eq!(config.api_key, "secret");
            assert_eq!(config.db_path, PathBuf::from("/tmp/numbers.db"));
            assert_eq!(config.enrichment_timeout_ms, 2500);
            assert_eq!(config.timeout_ms, 10_000);
            Ok(())
        });
    }

    #[test]
    fn test_load_env_overrides_file() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "phonecheck.toml",
                r#"
                api_key = "from-file"
                user_agent = "file-agent"
                cache_max_age_secs = 3600
                "#,
            )?;
            jail.set_env("PHONECHECK_CONFIG_FILE", "phonecheck.toml");
            jail.set_env("PHONECHECK_API_KEY", "from-env");

            let config = AppConfig::load().map_err(|e| e.to_string())?;
            assert_eq!(config.api_key, "from-env");
            assert_eq!(config.user_agent, "file-agent");
            assert_eq!(config.cache_max_age_secs, Some(3600));
            Ok(())
        });
    }

    #[test]
    fn test_load_without_api_key_fails() {
        figment::Jail::expect_with(|_jail| {
            let result = AppConfig::load();
            assert!(matches!(result, Err(ConfigError::Missing { .. })));
            Ok(())
        });
    }
}
