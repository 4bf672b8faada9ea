//! Conversational model capability

pub mod ollama;

use async_trait::async_trait;

use crate::Result;
use crate::config::LlmConfig;

pub use ollama::OllamaChatModel;

/// Sampling parameters for one generation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationOptions {
    /// Maximum tokens to generate
    pub max_tokens: u32,
    pub temperature: f32,
    /// Nucleus sampling threshold
    pub top_p: f32,
}

impl From<&LlmConfig> for GenerationOptions {
    fn from(config: &LlmConfig) -> Self {
        Self {
            max_tokens: config.max_tokens,
            temperature: config.temperature,
            top_p: config.top_p,
        }
    }
}

/// A single-turn chat: one system instruction, one user message
#[derive(Debug, Clone)]
pub struct ChatRequest<'a> {
    pub system: &'a str,
    pub user: &'a str,
    pub options: GenerationOptions,
}

/// Chat-completion backend
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Returns the raw assistant text
    async fn chat(&self, request: &ChatRequest<'_>) -> Result<String>;

    fn model_name(&self) -> &str;
}
