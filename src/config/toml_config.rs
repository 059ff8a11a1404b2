use crate::config::RelayConfig;
use crate::utils::error::{RelayError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Optional file-based configuration.
///
/// ```toml
/// [server]
/// bind = "0.0.0.0:3000"
///
/// [provider]
/// api_url = "https://api.replicate.com"
/// api_token = "${REPLICATE_API_TOKEN}"
/// model = "owner/name:version"
/// poll_interval_ms = 1000
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub server: ServerSection,
    #[serde(default)]
    pub provider: ProviderSection,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerSection {
    pub bind: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProviderSection {
    pub api_url: Option<String>,
    pub api_token: Option<String>,
    pub model: Option<String>,
    pub poll_interval_ms: Option<u64>,
}

impl TomlConfig {
    /// Load configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(RelayError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| RelayError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replace `${VAR}` references (e.g. `${REPLICATE_API_TOKEN}`) with environment values.
    ///
    /// Unknown variables are left in place so validation can report them.
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| RelayError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// Overlay the file's values onto `base`.
    pub fn apply_to(&self, base: &mut RelayConfig) {
        if let Some(bind) = &self.server.bind {
            base.bind = bind.clone();
        }
        if let Some(api_url) = &self.provider.api_url {
            base.provider_url = api_url.clone();
        }
        if let Some(api_token) = &self.provider.api_token {
            base.api_token = api_token.clone();
        }
        if let Some(model) = &self.provider.model {
            base.model = model.clone();
        }
        if let Some(poll_interval_ms) = self.provider.poll_interval_ms {
            base.poll_interval_ms = poll_interval_ms;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::validation::Validate;

    #[test]
    fn test_parse_with_env_substitution() {
        std::env::set_var("FACE_RELAY_TEST_TOKEN", "r8_from_env");
        let config = TomlConfig::from_toml_str(
            r#"
[server]
bind = "0.0.0.0:8080"

[provider]
api_token = "${FACE_RELAY_TEST_TOKEN}"
poll_interval_ms = 250
"#,
        )
        .unwrap();

        let mut relay = RelayConfig::new("");
        config.apply_to(&mut relay);

        assert_eq!(relay.bind, "0.0.0.0:8080");
        assert_eq!(relay.api_token, "r8_from_env");
        assert_eq!(relay.poll_interval_ms, 250);
        assert!(relay.validate().is_ok());
    }

    #[test]
    fn test_unset_variable_fails_validation() {
        let config = TomlConfig::from_toml_str(
            r#"
[provider]
api_token = "${FACE_RELAY_TEST_UNSET_VARIABLE}"
"#,
        )
        .unwrap();

        let mut relay = RelayConfig::new("");
        config.apply_to(&mut relay);
        assert!(relay.validate().is_err());
    }

    #[test]
    fn test_empty_file_keeps_defaults() {
        let config = TomlConfig::from_toml_str("").unwrap();
        let mut relay = RelayConfig::new("r8_token");
        config.apply_to(&mut relay);
        assert_eq!(relay.bind, crate::config::DEFAULT_BIND);
    }

    #[test]
    fn test_invalid_toml() {
        assert!(matches!(
            TomlConfig::from_toml_str("[provider\napi_url = 1"),
            Err(RelayError::ConfigError { .. })
        ));
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("relay.toml");
        std::fs::write(&path, "[provider]\nmodel = \"owner/model\"\n").unwrap();

        let config = TomlConfig::from_file(&path).unwrap();
        assert_eq!(config.provider.model.as_deref(), Some("owner/model"));
    }
}
