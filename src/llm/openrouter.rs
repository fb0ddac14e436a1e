use async_trait::async_trait;
use reqwest::{Client, ClientBuilder};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

use crate::config::Config;
use crate::error::ModelError;
use crate::llm::{ChatCompletion, ChatModel, ChatOptions, ChatRequest};

#[derive(Serialize)]
struct WireRequest<'a> {
    model: &'a str,
    messages: [WireMessage<'a>; 2],
    #[serde(flatten)]
    options: &'a ChatOptions,
}

#[derive(Serialize)]
struct WireMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct WireResponse {
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    choices: Vec<WireChoice>,
}

#[derive(Deserialize)]
struct WireChoice {
    message: Option<WireChoiceMessage>,
}

#[derive(Deserialize)]
struct WireChoiceMessage {
    content: Option<String>,
}

/// OpenAI-compatible chat-completions client (OpenRouter by default).
pub struct OpenRouterClient {
    client: Client,
    endpoint: Url,
    api_key: Option<String>,
    referer: String,
    title: String,
}

impl OpenRouterClient {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let client = ClientBuilder::new()
            .user_agent(concat!("worth-check/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .pool_max_idle_per_host(6)
            .build()?;

        // Url::join drops the last path segment unless the base ends with '/'
        let base = format!("{}/", config.api_base_url.trim_end_matches('/'));
        let endpoint = Url::parse(&base)?.join("chat/completions")?;

        Ok(Self {
            client,
            endpoint,
            api_key: config.api_key.clone(),
            referer: config.app_referer.clone(),
            title: config.app_title.clone(),
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl ChatModel for OpenRouterClient {
    async fn chat_complete(&self, request: ChatRequest) -> Result<ChatCompletion, ModelError> {
        let body = WireRequest {
            model: &request.model,
            messages: [
                WireMessage {
                    role: "system",
                    content: &request.system_prompt,
                },
                WireMessage {
                    role: "user",
                    content: &request.user_prompt,
                },
            ],
            options: &request.options,
        };

        let mut builder = self
            .client
            .post(self.endpoint.clone())
            .header("HTTP-Referer", &self.referer)
            .header("X-Title", &self.title)
            .json(&body);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder.send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            warn!("Model endpoint returned {}: {}", status, body);
            return Err(ModelError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let payload: WireResponse = response
            .json()
            .await
            .map_err(|e| ModelError::Decode(e.to_string()))?;

        let text = payload
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or(ModelError::EmptyResponse)?;

        let model = payload
            .model
            .filter(|m| !m.is_empty())
            .unwrap_or(request.model);
        debug!(model = %model, chars = text.len(), "model replied");

        Ok(ChatCompletion { text, model })
    }
}
