//! Reasoning engine configuration.

use serde::Deserialize;
use std::time::Duration;

use crate::adapters::AnthropicConfig;

use super::error::ValidationError;

/// Reasoning engine configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ReasoningConfig {
    /// Engine to use.
    #[serde(default)]
    pub provider: ReasoningProvider,

    /// Anthropic API key.
    pub anthropic_api_key: Option<String>,

    /// Model identifier.
    #[serde(default = "default_model")]
    pub model: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Maximum tokens per reply.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Maximum retries on transient failure.
    #[serde(default = "default_retries")]
    pub max_retries: u32,
}

/// Reasoning engine kind.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ReasoningProvider {
    #[default]
    Anthropic,
    /// Scripted engine, for tests and local development without a key.
    Scripted,
}

impl ReasoningConfig {
    /// Get timeout as Duration.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Check if an Anthropic API key is present.
    pub fn has_anthropic_key(&self) -> bool {
        self.anthropic_api_key
            .as_ref()
            .is_some_and(|k| !k.is_empty())
    }

    /// Validate reasoning configuration.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.provider == ReasoningProvider::Anthropic && !self.has_anthropic_key() {
            return Err(ValidationError::MissingRequired("ANTHROPIC_API_KEY"));
        }
        if self.timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout);
        }
        if self.max_tokens == 0 {
            return Err(ValidationError::InvalidMaxTokens);
        }
        Ok(())
    }

    /// Build the Anthropic adapter configuration from these settings.
    ///
    /// # Errors
    ///
    /// Returns `MissingRequired` if no API key is configured.
    pub fn anthropic(&self) -> Result<AnthropicConfig, ValidationError> {
        let key = self
            .anthropic_api_key
            .as_ref()
            .filter(|k| !k.is_empty())
            .ok_or(ValidationError::MissingRequired("ANTHROPIC_API_KEY"))?;
        let mut adapter = AnthropicConfig::new(key.clone())
            .with_model(self.model.clone())
            .with_timeout(self.timeout())
            .with_retries(self.max_retries);
        adapter.max_tokens = self.max_tokens;
        Ok(adapter)
    }
}

impl Default for ReasoningConfig {
    fn default() -> Self {
        Self {
            provider: ReasoningProvider::default(),
            anthropic_api_key: None,
            model: default_model(),
            timeout_secs: default_timeout(),
            max_tokens: default_max_tokens(),
            max_retries: default_retries(),
        }
    }
}

fn default_model() -> String {
    "claude-sonnet-4-20250514".to_string()
}

fn default_timeout() -> u64 {
    60
}

fn default_max_tokens() -> u32 {
    1024
}

fn default_retries() -> u32 {
    3
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_select_anthropic() {
        let config = ReasoningConfig::default();
        assert_eq!(config.provider, ReasoningProvider::Anthropic);
        assert_eq!(config.timeout_secs, 60);
        assert_eq!(config.max_tokens, 1024);
    }

    #[test]
    fn anthropic_without_key_fails_validation() {
        let config = ReasoningConfig::default();
        assert!(config.validate().is_err());
    }

    #[test]
    fn scripted_needs_no_key() {
        let config = ReasoningConfig {
            provider: ReasoningProvider::Scripted,
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn empty_key_counts_as_missing() {
        let config = ReasoningConfig {
            anthropic_api_key: Some(String::new()),
            ..Default::default()
        };
        assert!(!config.has_anthropic_key());
        assert!(config.anthropic().is_err());
    }

    #[test]
    fn adapter_config_inherits_model_and_timeout() {
        let config = ReasoningConfig {
            anthropic_api_key: Some("sk-ant-xxx".to_string()),
            model: "claude-3-5-haiku-latest".to_string(),
            timeout_secs: 30,
            ..Default::default()
        };
        let adapter = config.anthropic().unwrap();
        assert_eq!(adapter.model, "claude-3-5-haiku-latest");
        assert_eq!(adapter.timeout, Duration::from_secs(30));
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let config = ReasoningConfig {
            provider: ReasoningProvider::Scripted,
            timeout_secs: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
