//! Empathic reply generation
//!
//! Wraps one chat-model call with a fixed therapist persona. The caller always
//! gets text back: any failure, including an empty completion, is replaced by
//! [`FALLBACK_REPLY`].

use std::sync::Arc;

use tracing::{error, info, instrument, warn};

use crate::Result;
use crate::config::LlmConfig;
use crate::llm::{ChatModel, ChatRequest, GenerationOptions, OllamaChatModel};

/// Persona instruction used when none is configured
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are Dr. Emily Hartman, a warm and experienced clinical psychologist.
Respond to patients with:

1. Emotional attunement (\"I can sense how difficult this must be...\")
2. Gentle normalization (\"Many people feel this way when...\")
3. Practical guidance (\"What sometimes helps is...\")
4. Strengths-focused support (\"I notice how you're...\")

Key principles:
- Never use brackets or labels
- Blend elements seamlessly
- Vary sentence structure
- Use natural transitions
- Mirror the user's language level
- Always keep the conversation going by asking open ended questions to dive into the root cause of the patient's problem";

/// Returned verbatim whenever generation fails
pub const FALLBACK_REPLY: &str = "I'm having technical difficulties, but I want you to know your feelings matter. Please try again shortly.";

pub struct ResponseGenerator {
    model: Arc<dyn ChatModel>,
    system_prompt: String,
    options: GenerationOptions,
}

impl ResponseGenerator {
    pub fn new(
        model: Arc<dyn ChatModel>,
        system_prompt: impl Into<String>,
        options: GenerationOptions,
    ) -> Self {
        Self {
            model,
            system_prompt: system_prompt.into(),
            options,
        }
    }

    /// Build a generator backed by Ollama
    pub fn from_config(config: &LlmConfig) -> Result<Self> {
        let model = Arc::new(OllamaChatModel::new(config)?);
        Ok(Self::new(
            model,
            config.system_prompt.clone(),
            GenerationOptions::from(config),
        ))
    }

    /// Produce a reply to `user_message`. Never fails and never returns empty text.
    #[instrument(skip_all, fields(model = self.model.model_name(), message_len = user_message.len()))]
    pub async fn generate(&self, user_message: &str) -> String {
        let request = ChatRequest {
            system: &self.system_prompt,
            user: user_message,
            options: self.options,
        };

        match self.model.chat(&request).await {
            Ok(reply) => {
                let reply = reply.trim();
                if reply.is_empty() {
                    warn!("Model returned an empty reply, using fallback");
                    FALLBACK_REPLY.to_string()
                } else {
                    info!(reply_len = reply.len(), "Generated reply");
                    reply.to_string()
                }
            }
            Err(e) => {
                error!("Reply generation failed: {}", e);
                FALLBACK_REPLY.to_string()
            }
        }
    }
}
