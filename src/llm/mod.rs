use async_trait::async_trait;
use serde::Serialize;

use crate::error::ModelError;

mod openrouter;
pub use openrouter::OpenRouterClient;

/// Sampling knobs for one completion.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatOptions {
    pub temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub presence_penalty: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frequency_penalty: Option<f32>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub stop: Vec<String>,
}

impl ChatOptions {
    pub fn with_temperature(temperature: f32) -> Self {
        Self {
            temperature,
            max_tokens: None,
            presence_penalty: None,
            frequency_penalty: None,
            stop: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChatRequest {
    pub model: String,
    pub system_prompt: String,
    pub user_prompt: String,
    pub options: ChatOptions,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChatCompletion {
    pub text: String,
    /// Model identifier reported by the provider.
    pub model: String,
}

/// Black-box language-model capability.
#[async_trait]
pub trait ChatModel: Send + Sync {
    async fn chat_complete(&self, request: ChatRequest) -> Result<ChatCompletion, ModelError>;
}
