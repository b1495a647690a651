//! OpenAI-compatible backend adapters.
//!
//! OpenAI, OpenRouter, and Deepseek all speak the same chat-completions
//! contract (`choices[0].message.content` out, optional `usage`
//! counters), differing only in default endpoint and default model. One
//! adapter covers the family; each provider gets its own constructor
//! with its own defaults.

use async_trait::async_trait;
use conduit_application::ports::provider_gateway::{ChatBackend, GatewayError};
use conduit_domain::{ChatTurn, GatewayResponse, LlmSettings, TokenUsage};
use serde_json::{Value, json};
use tracing::debug;

/// Backend adapter for chat-completions providers.
pub struct ChatCompletionsBackend {
    provider: &'static str,
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

impl ChatCompletionsBackend {
    pub fn openai(settings: &LlmSettings) -> Self {
        Self::with_defaults(settings, "openai", "https://api.openai.com/v1", "gpt-3.5-turbo")
    }

    pub fn openrouter(settings: &LlmSettings) -> Self {
        Self::with_defaults(
            settings,
            "openrouter",
            "https://openrouter.ai/api/v1",
            "gpt-3.5-turbo",
        )
    }

    pub fn deepseek(settings: &LlmSettings) -> Self {
        Self::with_defaults(
            settings,
            "deepseek",
            "https://api.deepseek.com/v1",
            "deepseek-chat",
        )
    }

    fn with_defaults(
        settings: &LlmSettings,
        provider: &'static str,
        default_base_url: &str,
        default_model: &str,
    ) -> Self {
        Self {
            provider,
            client: reqwest::Client::new(),
            base_url: settings
                .base_url
                .clone()
                .unwrap_or_else(|| default_base_url.to_string()),
            api_key: settings.api_key.clone(),
            model: settings
                .model
                .clone()
                .unwrap_or_else(|| default_model.to_string()),
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
        })
    }

    fn parse_reply(provider: &str, value: &Value) -> Result<GatewayResponse, GatewayError> {
        let text = value
            .get("choices")
            .and_then(|c| c.get(0))
            .and_then(|c| c.get("message"))
            .and_then(|m| m.get("content"))
            .and_then(|c| c.as_str())
            .ok_or_else(|| GatewayError::MalformedResponse {
                provider: provider.to_string(),
                message: "missing choices[0].message.content".to_string(),
            })?;

        // Each counter is independently optional; providers report
        // usage inconsistently.
        let usage = value.get("usage").map(|u| TokenUsage {
            prompt_tokens: u.get("prompt_tokens").and_then(|v| v.as_u64()),
            completion_tokens: u.get("completion_tokens").and_then(|v| v.as_u64()),
            total_tokens: u.get("total_tokens").and_then(|v| v.as_u64()),
        });

        Ok(GatewayResponse::new(text, usage))
    }
}

#[async_trait]
impl ChatBackend for ChatCompletionsBackend {
    fn provider(&self) -> &str {
        self.provider
    }

    async fn send(&self, messages: &[ChatTurn]) -> Result<GatewayResponse, GatewayError> {
        let url = format!("{}/chat/completions", self.base_url.trim_end_matches('/'));
        debug!(url = %url, model = %self.model, provider = self.provider, "Sending chat request");

        let mut request = self.client.post(&url).json(&self.request_body(messages));
        if let Some(api_key) = &self.api_key {
            request = request.bearer_auth(api_key);
        }

        let response = request
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| GatewayError::RequestFailed {
                provider: self.provider.to_string(),
                message: e.to_string(),
            })?;

        let body: Value = response
            .json()
            .await
            .map_err(|e| GatewayError::MalformedResponse {
                provider: self.provider.to_string(),
                message: e.to_string(),
            })?;

        Self::parse_reply(self.provider, &body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_defaults() {
        let settings = LlmSettings {
            base_url: None,
            model: None,
            ..Default::default()
        };

        let openai = ChatCompletionsBackend::openai(&settings);
        assert_eq!(openai.base_url, "https://api.openai.com/v1");
        assert_eq!(openai.model, "gpt-3.5-turbo");

        let deepseek = ChatCompletionsBackend::deepseek(&settings);
        assert_eq!(deepseek.base_url, "https://api.deepseek.com/v1");
        assert_eq!(deepseek.model, "deepseek-chat");
    }

    #[test]
    fn test_settings_override_defaults() {
        let settings = LlmSettings {
            base_url: Some("https://proxy.internal/v1".to_string()),
            model: Some("gpt-4o".to_string()),
            ..Default::default()
        };
        let backend = ChatCompletionsBackend::openai(&settings);
        assert_eq!(backend.base_url, "https://proxy.internal/v1");
        assert_eq!(backend.model, "gpt-4o");
    }

    #[test]
    fn test_request_body_shape() {
        let settings = LlmSettings {
            base_url: None,
            model: None,
            ..Default::default()
        };
        let backend = ChatCompletionsBackend::openai(&settings);
        let body = backend.request_body(&[ChatTurn::system("sys"), ChatTurn::user("hi")]);

        assert_eq!(body["model"], "gpt-3.5-turbo");
        assert!((body["temperature"].as_f64().unwrap() - 0.7).abs() < 1e-6);
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["role"], "user");
        assert!(body.get("stream").is_none());
    }

    #[test]
    fn test_parse_reply_reads_choices() {
        let reply = ChatCompletionsBackend::parse_reply(
            "openai",
            &json!({
                "choices": [{"message": {"role": "assistant", "content": "Hello!"}}],
                "usage": {"prompt_tokens": 10, "completion_tokens": 5, "total_tokens": 15}
            }),
        )
        .unwrap();
        assert_eq!(reply.text, "Hello!");
        let usage = reply.usage.unwrap();
        assert_eq!(usage.prompt_tokens, Some(10));
        assert_eq!(usage.completion_tokens, Some(5));
        assert_eq!(usage.total_tokens, Some(15));
    }

    #[test]
    fn test_parse_reply_tolerates_partial_usage() {
        let reply = ChatCompletionsBackend::parse_reply(
            "openrouter",
            &json!({
                "choices": [{"message": {"content": "Hi"}}],
                "usage": {"total_tokens": 7}
            }),
        )
        .unwrap();
        let usage = reply.usage.unwrap();
        assert_eq!(usage.prompt_tokens, None);
        assert_eq!(usage.total_tokens, Some(7));
    }

    #[test]
    fn test_parse_reply_tolerates_absent_usage() {
        let reply = ChatCompletionsBackend::parse_reply(
            "deepseek",
            &json!({"choices": [{"message": {"content": "Hi"}}]}),
        )
        .unwrap();
        assert!(reply.usage.is_none());
    }

    #[test]
    fn test_parse_reply_rejects_empty_choices() {
        let err = ChatCompletionsBackend::parse_reply("openai", &json!({"choices": []}))
            .unwrap_err();
        assert!(matches!(err, GatewayError::MalformedResponse { .. }));
    }
}
