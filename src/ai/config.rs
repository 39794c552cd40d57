//! AI provider configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{Error, Result};

/// Settings for the OpenAI-compatible provider
#[derive(Clone, Serialize, Deserialize)]
pub struct AiConfig {
    /// API key; without one the mock provider is used
    pub api_key: Option<String>,

    /// Base URL of the chat-completions API
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Model name sent with each request
    #[serde(default = "default_model")]
    pub model: String,

    /// Per-request timeout
    #[serde(with = "humantime_serde", default = "default_timeout")]
    pub timeout: Duration,
}

impl std::fmt::Debug for AiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AiConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("timeout", &self.timeout)
            .finish()
    }
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_model() -> String {
    "gpt-4.1-mini".to_string()
}

fn default_timeout() -> Duration {
    Duration::from_secs(60)
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            model: default_model(),
            timeout: default_timeout(),
        }
    }
}

impl AiConfig {
    /// Create configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup (environment in production)
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self {
            api_key: lookup("OPENAI_API_KEY").filter(|k| !k.trim().is_empty()),
            ..Self::default()
        };

        if let Some(base_url) = lookup("OPENAI_BASE_URL") {
            config.base_url = base_url.trim_end_matches('/').to_string();
        }
        if let Some(model) = lookup("OPENAI_MODEL") {
            config.model = model;
        }
        if let Some(timeout) = lookup("OPENAI_TIMEOUT") {
            config.timeout = humantime_serde::re::humantime::parse_duration(&timeout)
                .map_err(|e| Error::config(format!("OPENAI_TIMEOUT `{timeout}`: {e}")))?;
        }

        Ok(config)
    }
}
