//! Provider settings.

use serde::{Deserialize, Serialize};

/// Settings for the configured chat-completion provider.
///
/// `provider` selects the backend adapter (case-insensitive). The
/// remaining fields are optional; each backend supplies its own default
/// endpoint and model when they are absent.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmSettings {
    /// Backend selector: "ollama", "openai", "openrouter", "deepseek".
    pub provider: String,
    /// Bearer credential for hosted backends.
    pub api_key: Option<String>,
    /// Endpoint override.
    pub base_url: Option<String>,
    /// Backend model identifier.
    pub model: Option<String>,
    /// Sampling temperature (default 0.7).
    pub temperature: Option<f32>,
    /// Response length cap (default 1000).
    pub max_tokens: Option<u32>,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            provider: "ollama".to_string(),
            api_key: None,
            base_url: Some("http://localhost:11434".to_string()),
            model: Some("llama3".to_string()),
            temperature: Some(0.7),
            max_tokens: Some(1000),
        }
    }
}

impl LlmSettings {
    pub fn temperature_or_default(&self) -> f32 {
        self.temperature.unwrap_or(0.7)
    }

    pub fn max_tokens_or_default(&self) -> u32 {
        self.max_tokens.unwrap_or(1000)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = LlmSettings::default();
        assert_eq!(settings.provider, "ollama");
        assert_eq!(settings.temperature_or_default(), 0.7);
        assert_eq!(settings.max_tokens_or_default(), 1000);
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let settings: LlmSettings =
            serde_json::from_value(serde_json::json!({"provider": "openai"})).unwrap();
        assert_eq!(settings.provider, "openai");
        assert_eq!(settings.model.as_deref(), Some("llama3"));
    }
}
