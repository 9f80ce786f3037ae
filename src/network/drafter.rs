use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::common::ChatError;

/// Text-generation backend that drafts replies.
#[async_trait]
pub trait ReplyDrafter: Send + Sync {
    async fn draft(&self, prompt: &str) -> Result<String, ChatError>;
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: String,
}

/// `ReplyDrafter` backed by an Ollama `/api/generate` endpoint.
pub struct OllamaDrafter {
    client: reqwest::Client,
    base_url: String,
    model: String,
}

impl OllamaDrafter {
    pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
        }
    }
}

#[async_trait]
impl ReplyDrafter for OllamaDrafter {
    async fn draft(&self, prompt: &str) -> Result<String, ChatError> {
        let request = GenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
        };

        let response = self
            .client
            .post(format!("{}/api/generate", self.base_url))
            .json(&request)
            .send()
            .await
            .map_err(|err| ChatError::Generation(err.to_string()))?;

        if !response.status().is_success() {
            return Err(ChatError::GenerationStatus {
                status: response.status().as_u16(),
            });
        }

        let body = response
            .json::<GenerateResponse>()
            .await
            .map_err(|err| ChatError::Generation(err.to_string()))?;
        Ok(body.response.trim().to_string())
    }
}
