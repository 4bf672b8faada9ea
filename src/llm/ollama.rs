//! Ollama chat backend

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use super::{ChatModel, ChatRequest};
use crate::config::LlmConfig;
use crate::{CareCompassError, Result};

/// Non-streaming client for `POST /api/chat`
#[derive(Clone)]
pub struct OllamaChatModel {
    client: Client,
    endpoint: String,
    model: String,
}

impl OllamaChatModel {
    pub fn new(config: &LlmConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| CareCompassError::config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            model: config.model.clone(),
        })
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}/api{}", self.endpoint, path)
    }

    fn build_request(&self, request: &ChatRequest<'_>) -> OllamaChatRequest {
        OllamaChatRequest {
            model: self.model.clone(),
            messages: vec![
                OllamaMessage {
                    role: "system".to_string(),
                    content: request.system.to_string(),
                },
                OllamaMessage {
                    role: "user".to_string(),
                    content: request.user.to_string(),
                },
            ],
            stream: false,
            options: OllamaOptions {
                num_predict: request.options.max_tokens,
                temperature: request.options.temperature,
                top_p: request.options.top_p,
            },
        }
    }
}

#[async_trait]
impl ChatModel for OllamaChatModel {
    #[instrument(skip(self, request), fields(model = %self.model))]
    async fn chat(&self, request: &ChatRequest<'_>) -> Result<String> {
        let body = self.build_request(request);

        let response = self
            .client
            .post(self.api_url("/chat"))
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error = response.text().await.unwrap_or_default();
            return Err(CareCompassError::api(format!("Ollama HTTP {status}: {error}")));
        }

        let parsed: OllamaChatResponse = response.json().await.map_err(|e| {
            match CareCompassError::from(e) {
                CareCompassError::Parse { message } => {
                    CareCompassError::parse(format!("Invalid Ollama response: {message}"))
                }
                other => other,
            }
        })?;

        debug!(eval_count = parsed.eval_count, "Ollama generation finished");

        parsed
            .message
            .map(|m| m.content)
            .ok_or_else(|| CareCompassError::parse("Ollama response has no message"))
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

// Ollama API types
#[derive(Debug, Serialize)]
struct OllamaChatRequest {
    model: String,
    messages: Vec<OllamaMessage>,
    stream: bool,
    options: OllamaOptions,
}

#[derive(Debug, Serialize, Deserialize)]
struct OllamaMessage {
    role: String,
    content: String,
}

#[derive(Debug, Serialize)]
struct OllamaOptions {
    num_predict: u32,
    temperature: f32,
    top_p: f32,
}

#[derive(Debug, Deserialize)]
struct OllamaChatResponse {
    message: Option<OllamaMessage>,
    #[serde(default)]
    eval_count: Option<u64>,
}
