#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use crate::domain::model::{ModelRef, DEFAULT_MODEL};
use crate::domain::ports::ConfigProvider;
use crate::provider::replicate::DEFAULT_API_URL;
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use std::time::Duration;

pub const DEFAULT_BIND: &str = "127.0.0.1:3000";
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 1000;

/// Resolved relay settings.
///
/// `api_token` is the only secret; everything else has a default.
#[derive(Clone)]
pub struct RelayConfig {
    pub bind: String,
    pub provider_url: String,
    pub api_token: String,
    pub model: String,
    pub poll_interval_ms: u64,
}

impl RelayConfig {
    pub fn new(api_token: impl Into<String>) -> Self {
        Self {
            bind: DEFAULT_BIND.to_string(),
            provider_url: DEFAULT_API_URL.to_string(),
            api_token: api_token.into(),
            model: DEFAULT_MODEL.to_string(),
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }

    pub fn model_ref(&self) -> Result<ModelRef> {
        self.model.parse()
    }
}

impl std::fmt::Debug for RelayConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RelayConfig")
            .field("bind", &self.bind)
            .field("provider_url", &self.provider_url)
            .field("api_token", &"<redacted>")
            .field("model", &self.model)
            .field("poll_interval_ms", &self.poll_interval_ms)
            .finish()
    }
}

impl ConfigProvider for RelayConfig {
    fn bind_address(&self) -> &str {
        &self.bind
    }

    fn provider_url(&self) -> &str {
        &self.provider_url
    }

    fn api_token(&self) -> &str {
        &self.api_token
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

impl Validate for RelayConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_socket_addr("bind", &self.bind)?;
        validation::validate_url("provider_url", &self.provider_url)?;
        validation::validate_non_empty_string("api_token", &self.api_token)?;
        validation::validate_resolved("api_token", &self.api_token)?;
        self.model_ref()?;
        validation::validate_range("poll_interval_ms", self.poll_interval_ms, 10, 60_000)?;

        tracing::debug!("Relay configuration validation passed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        let config = RelayConfig::new("r8_token");
        assert!(config.validate().is_ok());
        assert_eq!(config.poll_interval(), Duration::from_secs(1));
        assert_eq!(config.model_ref().unwrap().name, "roop_face_swap");
    }

    #[test]
    fn test_invalid_values_rejected() {
        let mut config = RelayConfig::new("   ");
        assert!(config.validate().is_err());

        config.api_token = "r8_token".to_string();
        config.model = "not-a-model".to_string();
        assert!(config.validate().is_err());

        config.model = DEFAULT_MODEL.to_string();
        config.bind = "nowhere".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_debug_redacts_token() {
        let config = RelayConfig::new("r8_secret");
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("r8_secret"));
        assert!(rendered.contains("<redacted>"));
    }
}
