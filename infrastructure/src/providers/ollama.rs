//! Ollama backend adapter.
//!
//! Ollama's chat endpoint differs from the OpenAI-compatible family: it
//! answers with a single-message envelope (`message.content`) instead of
//! a `choices` array, and reports at most a flat `total_tokens` count.

use async_trait::async_trait;
use conduit_application::ports::provider_gateway::{ChatBackend, GatewayError};
use conduit_domain::{ChatTurn, GatewayResponse, LlmSettings, TokenUsage};
use serde_json::{Value, json};
use tracing::debug;

const DEFAULT_BASE_URL: &str = "http://localhost:11434";
const DEFAULT_MODEL: &str = "llama3";

/// Backend adapter for a local Ollama instance.
pub struct OllamaBackend {
    client: reqwest::Client,
    base_url: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

impl OllamaBackend {
    pub fn new(settings: &LlmSettings) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: settings
                .base_url
                .clone()
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            model: settings
                .model
                .clone()
                .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            temperature: settings.temperature_or_default(),
            max_tokens: settings.max_tokens_or_default(),
        }
    }

    fn request_body(&self, messages: &[ChatTurn]) -> Value {
        json!({
            "model": self.model,
            "messages": messages,
            "temperature": self.temperature,
            "max_tokens": self.max_tokens,
            "stream": false,
        })
    }

    fn parse_reply(value: &Value) -> Result<GatewayResponse, GatewayError> {
        let text = value
            .get("message")
            .and_then(|m| m.get("content"))
            .and_then(|c| c.as_str())
            .ok_or_else(|| GatewayError::MalformedResponse {
                provider: "ollama".to_string(),
                message: "missing message.content".to_string(),
            })?;

        let usage = TokenUsage {
            prompt_tokens: None,
            completion_tokens: None,
            total_tokens: Some(value.get("total_tokens").and_then(|t| t.as_u64()).unwrap_or(0)),
        };

        Ok(GatewayResponse::new(text, Some(usage)))
    }
}

#[async_trait]
impl ChatBackend for OllamaBackend {
    fn provider(&self) -> &str {
        "ollama"
    }

    async fn send(&self, messages: &[ChatTurn]) -> Result<GatewayResponse, GatewayError> {
        let url = format!("{}/api/chat", self.base_url.trim_end_matches('/'));
        debug!(url = %url, model = %self.model, "Sending chat request");

        let response = self
            .client
            .post(&url)
            .json(&self.request_body(messages))
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| GatewayError::RequestFailed {
                provider: "ollama".to_string(),
                message: e.to_string(),
            })?;

        let body: Value = response
            .json()
            .await
            .map_err(|e| GatewayError::MalformedResponse {
                provider: "ollama".to_string(),
                message: e.to_string(),
            })?;

        Self::parse_reply(&body)
    }
}
