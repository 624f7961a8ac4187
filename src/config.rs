use std::time::Duration;

use anyhow::{Context, Result};

pub const DEFAULT_LLM_API_URL: &str = "https://api.groq.com/openai/v1/chat/completions";
pub const DEFAULT_LLM_MODEL: &str = "llama-3.1-8b-instant";
pub const DEFAULT_IMAGE_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_IMAGE_MODEL: &str = "gemini-2.5-flash-image";

/// Endpoint, credentials and model for one generation backend.
#[derive(Debug, Clone)]
pub struct BackendConfig {
    pub api_url: String,
    /// `None` sends requests unauthenticated, e.g. against a local server.
    pub api_key: Option<String>,
    pub model: String,
}

/// Service configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub llm: BackendConfig,
    pub image: BackendConfig,
    /// Upper bound for the single story request.
    pub story_timeout: Duration,
    /// Upper bound for each panel image request.
    pub image_timeout: Duration,
}

impl AppConfig {
    /// Load configuration from the process environment.
    ///
    /// | Env Var              | Default                                            |
    /// |----------------------|----------------------------------------------------|
    /// | `HOST`               | `0.0.0.0`                                          |
    /// | `PORT`               | `3000`                                             |
    /// | `LLM_API_URL`        | `https://api.groq.com/openai/v1/chat/completions`  |
    /// | `LLM_API_KEY`        | unset                                              |
    /// | `LLM_MODEL`          | `llama-3.1-8b-instant`                             |
    /// | `IMAGE_API_URL`      | `https://generativelanguage.googleapis.com/v1beta` |
    /// | `IMAGE_API_KEY`      | unset                                              |
    /// | `IMAGE_MODEL`        | `gemini-2.5-flash-image`                           |
    /// | `STORY_TIMEOUT_SECS` | `120`                                              |
    /// | `IMAGE_TIMEOUT_SECS` | `90`                                               |
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());
        let secret = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let port = var("PORT", "3000")
            .parse::<u16>()
            .context("PORT must be a valid u16")?;
        let story_timeout_secs = var("STORY_TIMEOUT_SECS", "120")
            .parse::<u64>()
            .context("STORY_TIMEOUT_SECS must be a valid u64")?;
        let image_timeout_secs = var("IMAGE_TIMEOUT_SECS", "90")
            .parse::<u64>()
            .context("IMAGE_TIMEOUT_SECS must be a valid u64")?;

        Ok(Self {
            host: var("HOST", "0.0.0.0"),
            port,
            llm: BackendConfig {
                api_url: var("LLM_API_URL", DEFAULT_LLM_API_URL),
                api_key: secret("LLM_API_KEY"),
                model: var("LLM_MODEL", DEFAULT_LLM_MODEL),
            },
            image: BackendConfig {
                api_url: var("IMAGE_API_URL", DEFAULT_IMAGE_API_URL),
                api_key: secret("IMAGE_API_KEY"),
                model: var("IMAGE_MODEL", DEFAULT_IMAGE_MODEL),
            },
            story_timeout: Duration::from_secs(story_timeout_secs),
            image_timeout: Duration::from_secs(image_timeout_secs),
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
