use crate::config::toml_config::TomlConfig;
use crate::config::RelayConfig;
use crate::utils::error::Result;
use crate::utils::validation::validate_required_field;
use clap::Parser;

/// Command-line arguments of the relay server.
///
/// Precedence: flag or environment variable, then the `--config` file, then
/// built-in defaults.
#[derive(Debug, Clone, Parser)]
#[command(name = "face-relay")]
#[command(about = "Relay face-swap submissions to a hosted inference provider")]
pub struct RelayArgs {
    /// Address to listen on
    #[arg(long, env = "RELAY_BIND")]
    pub bind: Option<String>,

    /// Base URL of the provider API
    #[arg(long, env = "REPLICATE_API_URL")]
    pub provider_url: Option<String>,

    /// Provider credential
    #[arg(long, env = "REPLICATE_API_TOKEN", hide_env_values = true)]
    pub api_token: Option<String>,

    /// Model as owner/name[:version]
    #[arg(long, env = "REPLICATE_MODEL")]
    pub model: Option<String>,

    /// Delay between job status checks
    #[arg(long)]
    pub poll_interval_ms: Option<u64>,

    /// Optional TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Emit JSON log lines
    #[arg(long)]
    pub json_logs: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl RelayArgs {
    pub fn into_config(self) -> Result<RelayConfig> {
        let file = match &self.config {
            Some(path) => TomlConfig::from_file(path)?,
            None => TomlConfig::default(),
        };

        let mut config = RelayConfig::new("");
        file.apply_to(&mut config);
        if file.provider.api_token.is_none() {
            validate_required_field("api_token", &self.api_token)?;
        }

        if let Some(bind) = self.bind {
            config.bind = bind;
        }
        if let Some(provider_url) = self.provider_url {
            config.provider_url = provider_url;
        }
        if let Some(api_token) = self.api_token {
            config.api_token = api_token;
        }
        if let Some(model) = self.model {
            config.model = model;
        }
        if let Some(poll_interval_ms) = self.poll_interval_ms {
            config.poll_interval_ms = poll_interval_ms;
        }

        Ok(config)
    }
}
