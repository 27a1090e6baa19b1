//! Application configuration module
//!
//! Type-safe configuration loading from environment variables using the
//! `config` and `dotenvy` crates. Configuration is loaded with the
//! `CONCIERGE` prefix and nested values use double underscores as
//! separators.
//!
//! # Example
//!
//! ```no_run
//! use course_concierge::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod error;
mod reasoning;
mod storage;

pub use error::{ConfigError, ValidationError};
pub use reasoning::{ReasoningConfig, ReasoningProvider};
pub use storage::{StorageBackend, StorageConfig};

use serde::Deserialize;

/// Root application configuration.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    /// Reasoning engine configuration.
    #[serde(default)]
    pub reasoning: ReasoningConfig,

    /// Session storage configuration.
    #[serde(default)]
    pub storage: StorageConfig,
}

impl AppConfig {
    /// Load configuration from environment variables.
    ///
    /// Loads a `.env` file first if one is present, then reads variables
    /// with the `CONCIERGE` prefix:
    ///
    /// - `CONCIERGE__REASONING__ANTHROPIC_API_KEY=sk-ant-...`
    /// - `CONCIERGE__REASONING__MODEL=claude-sonnet-4-20250514`
    /// - `CONCIERGE__STORAGE__BACKEND=file`
    /// - `CONCIERGE__STORAGE__SESSION_DIR=/var/lib/concierge/sessions`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into the expected
    /// types.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("CONCIERGE")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.reasoning.validate()?;
        self.storage.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    // Env vars are process-global; serialize tests that touch them.
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    fn clear_env() {
        env::remove_var("CONCIERGE__REASONING__PROVIDER");
        env::remove_var("CONCIERGE__REASONING__ANTHROPIC_API_KEY");
        env::remove_var("CONCIERGE__REASONING__MODEL");
        env::remove_var("CONCIERGE__STORAGE__BACKEND");
        env::remove_var("CONCIERGE__STORAGE__SESSION_DIR");
    }

    #[test]
    fn load_with_no_env_uses_defaults() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();

        let config = AppConfig::load().unwrap();
        assert_eq!(config.reasoning.provider, ReasoningProvider::Anthropic);
        assert_eq!(config.storage.backend, StorageBackend::Memory);
    }

    #[test]
    fn load_reads_nested_values() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("CONCIERGE__REASONING__ANTHROPIC_API_KEY", "sk-ant-test");
        env::set_var("CONCIERGE__STORAGE__BACKEND", "file");
        env::set_var("CONCIERGE__STORAGE__SESSION_DIR", "/tmp/sessions");

        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(
            config.reasoning.anthropic_api_key.as_deref(),
            Some("sk-ant-test")
        );
        assert_eq!(config.storage.backend, StorageBackend::File);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn default_config_fails_validation_without_a_key() {
        let config = AppConfig::default();
        assert!(config.validate().is_err());
    }
}
