use std::sync::Arc;
use tracing::{debug, info};

use crate::error::ModelError;
use crate::llm::{ChatCompletion, ChatModel, ChatOptions, ChatRequest};
use crate::prompts::{comparison_system_prompt, comparison_user_prompt};

/// Stops the model once it closes the document, and before it wanders off
/// into a second one.
const STOP_SEQUENCES: &[&str] = &["}}", "]}", "}}}", "]}}}"];

/// Asks the model for the raw comparison document.
pub struct ComparisonRequester {
    model: Arc<dyn ChatModel>,
    model_name: String,
}

impl ComparisonRequester {
    pub fn new(model: Arc<dyn ChatModel>, model_name: impl Into<String>) -> Self {
        Self {
            model,
            model_name: model_name.into(),
        }
    }

    pub fn options() -> ChatOptions {
        ChatOptions {
            temperature: 0.7,
            max_tokens: Some(500),
            presence_penalty: Some(0.7),
            frequency_penalty: Some(0.7),
            stop: STOP_SEQUENCES.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn build_request(&self, item: &str, price: f64, country: Option<&str>) -> ChatRequest {
        ChatRequest {
            model: self.model_name.clone(),
            system_prompt: comparison_system_prompt(item, price, country),
            user_prompt: comparison_user_prompt(item, price, country),
            options: Self::options(),
        }
    }

    /// Raw text may be malformed or truncated; the salvage engine deals with it.
    pub async fn request(
        &self,
        item: &str,
        price: f64,
        country: Option<&str>,
    ) -> Result<ChatCompletion, ModelError> {
        info!(model = %self.model_name, action = "comparison generation", item, price, "starting model request");

        let completion = self
            .model
            .chat_complete(self.build_request(item, price, country))
            .await?;

        debug!(model = %completion.model, text = %completion.text, "raw comparison response");
        Ok(completion)
    }
}
