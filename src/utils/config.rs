//! Process configuration.
//!
//! All credentials come from the environment (optionally via a `.env` file
//! loaded by the binary); none are ever embedded in source. The [`Config`] is
//! built once at startup and passed by reference to each component.

use crate::types::{AppError, Result};
use std::env;

/// Top-level configuration, grouped per external service.
#[derive(Debug, Clone)]
pub struct Config {
    /// Embedding endpoint settings.
    pub embedding: EmbeddingConfig,
    /// Chat-completion endpoint settings.
    pub chat: ChatConfig,
    /// Blockchain explorer settings.
    pub explorer: ExplorerConfig,
}

/// Settings for the remote embedding endpoint.
#[derive(Debug, Clone)]
pub struct EmbeddingConfig {
    /// Bearer token for the embedding provider.
    pub api_key: String,
    /// Base URL, e.g. `https://api.openai.com/v1`.
    pub base_url: String,
    /// Embedding model identifier.
    pub model: String,
}

/// Settings for the chat-completion endpoint.
///
/// Defaults to the embedding provider's key and base URL, but both can be
/// pointed at a different OpenAI-compatible host.
#[derive(Debug, Clone)]
pub struct ChatConfig {
    /// Bearer token for the chat provider.
    pub api_key: String,
    /// Base URL, e.g. `https://api.openai.com/v1`.
    pub base_url: String,
    /// Chat model identifier.
    pub model: String,
    /// Sampling temperature sent with every request.
    pub temperature: f32,
}

/// Settings for the blockchain explorer API.
#[derive(Debug, Clone)]
pub struct ExplorerConfig {
    /// Explorer API key. Optional at load time; required once the audit
    /// phase constructs an explorer client.
    pub api_key: Option<String>,
    /// Explorer endpoint, e.g. `https://api.etherscan.io/api`.
    pub base_url: String,
}

impl Config {
    /// Build the configuration from environment variables.
    ///
    /// A missing `OPENAI_API_KEY` is a fatal error here, before any network
    /// call is attempted. `ETHERSCAN_API_KEY` is only checked when the audit
    /// phase actually needs the explorer.
    pub fn from_env() -> Result<Self> {
        let openai_api_key = env::var("OPENAI_API_KEY").map_err(|_| {
            AppError::Configuration(
                "OPENAI_API_KEY is not set in the environment".to_string(),
            )
        })?;
        let openai_base_url = env::var("OPENAI_BASE_URL")
            .unwrap_or_else(|_| "https://api.openai.com/v1".to_string());

        let temperature = env::var("CHAT_TEMPERATURE")
            .unwrap_or_else(|_| "1.0".to_string())
            .parse::<f32>()
            .map_err(|e| {
                AppError::Configuration(format!("CHAT_TEMPERATURE is not a number: {e}"))
            })?;

        Ok(Config {
            embedding: EmbeddingConfig {
                api_key: openai_api_key.clone(),
                base_url: openai_base_url.clone(),
                model: env::var("EMBEDDING_MODEL")
                    .unwrap_or_else(|_| "text-embedding-ada-002".to_string()),
            },
            chat: ChatConfig {
                api_key: env::var("CHAT_API_KEY").unwrap_or(openai_api_key),
                base_url: env::var("CHAT_BASE_URL").unwrap_or(openai_base_url),
                model: env::var("CHAT_MODEL").unwrap_or_else(|_| "gpt-4o".to_string()),
                temperature,
            },
            explorer: ExplorerConfig {
                api_key: env::var("ETHERSCAN_API_KEY").ok(),
                base_url: env::var("ETHERSCAN_BASE_URL")
                    .unwrap_or_else(|_| "https://api.etherscan.io/api".to_string()),
            },
        })
    }
}
