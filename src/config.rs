use serde::Deserialize;
use std::time::Duration;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// OpenRouter API key
    pub openrouter_api_key: String,

    /// Chat completions endpoint
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Model identifier passed through to the completion service
    #[serde(default = "default_model")]
    pub model: String,

    /// Sent as `X-Title` for provider attribution
    #[serde(default = "default_site_name")]
    pub site_name: String,

    /// Sent as `HTTP-Referer` for provider attribution
    #[serde(default = "default_site_url")]
    pub site_url: String,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Transport bound for any single completion request
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Upper bound for one book's analysis inside the prefetch batch.
    /// Kept below the request timeout so this is what bounds the batch join.
    #[serde(default = "default_analysis_timeout_secs")]
    pub analysis_timeout_secs: u64,
}

fn default_api_base_url() -> String {
    "https://openrouter.ai/api/v1/chat/completions".to_string()
}

fn default_model() -> String {
    "openai/gpt-4o-mini".to_string()
}

fn default_site_name() -> String {
    "BookPeckers".to_string()
}

fn default_site_url() -> String {
    "https://bookpeckers.com".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_request_timeout_secs() -> u64 {
    120
}

fn default_analysis_timeout_secs() -> u64 {
    90
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let config = envy::from_env::<Config>()
            .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

        if config.openrouter_api_key.trim().is_empty() {
            anyhow::bail!("OPENROUTER_API_KEY is set but empty");
        }

        Ok(config)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn analysis_timeout(&self) -> Duration {
        Duration::from_secs(self.analysis_timeout_secs)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
