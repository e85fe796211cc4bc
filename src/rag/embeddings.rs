//! Remote embedding client.
//!
//! One blocking request per chunk; no retry logic. A failed request aborts
//! the containing operation and propagates to the caller.

use crate::types::{AppError, Result};
use crate::utils::config::EmbeddingConfig;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Input ceiling, in characters, for one embedding request. Keeps the
/// request under the upstream's size limit.
pub const MAX_EMBED_CHARS: usize = 7000;

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    input: &'a str,
    model: &'a str,
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

/// Client for an OpenAI-compatible `/embeddings` endpoint.
pub struct EmbeddingClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl EmbeddingClient {
    /// Create a client for the configured embedding endpoint.
    pub fn new(config: &EmbeddingConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
        }
    }

    /// Embed `text`, truncated to [`MAX_EMBED_CHARS`] characters.
    ///
    /// Returns the vector from the response's first result. A non-success
    /// HTTP status becomes [`AppError::RemoteService`] carrying the status
    /// and raw body; an empty `data` array becomes
    /// [`AppError::UpstreamLogic`].
    pub async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let input = truncate_chars(text, MAX_EMBED_CHARS);
        let url = format!("{}/embeddings", self.base_url);

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&EmbeddingRequest {
                input,
                model: &self.model,
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::RemoteService {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: EmbeddingResponse = response.json().await?;
        let first = parsed.data.into_iter().next().ok_or_else(|| {
            AppError::UpstreamLogic("embedding response contained no data".to_string())
        })?;
        debug!(model = %self.model, dimensions = first.embedding.len(), "embedded text");
        Ok(first.embedding)
    }
}

/// Truncate to at most `max_chars` characters, on a char boundary.
fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => &text[..byte_index],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate_chars("hello", 10), "hello");
        assert_eq!(truncate_chars("hello", 3), "hel");
        // Multi-byte characters count as one char each.
        assert_eq!(truncate_chars("ααβββ", 2), "αα");
    }

    #[test]
    fn truncate_exact_length_is_untouched() {
        assert_eq!(truncate_chars("abc", 3), "abc");
    }
}
