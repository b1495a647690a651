//! Provider gateway router.
//!
//! Resolves the configured provider name to its backend adapter once at
//! construction; an unrecognized name is a configuration error raised
//! before any network call is possible. `chat` then prepares messages
//! (injecting the capabilities system instruction when asked), dispatches
//! to the backend, and post-processes the reply for an embedded tool
//! call.

use std::sync::Arc;

use async_trait::async_trait;
use conduit_application::catalog::ToolCatalog;
use conduit_application::ports::provider_gateway::{
    ChatBackend, GatewayError, ProviderGatewayPort,
};
use conduit_domain::{ChatTurn, GatewayResponse, LlmSettings, Role, build_system_message};
use tracing::debug;

use crate::providers::ollama::OllamaBackend;
use crate::providers::openai_compat::ChatCompletionsBackend;

/// The gateway the orchestrator talks to.
pub struct ProviderRouter {
    backend: Box<dyn ChatBackend>,
    catalog: Arc<ToolCatalog>,
}

impl std::fmt::Debug for ProviderRouter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderRouter").finish_non_exhaustive()
    }
}

impl ProviderRouter {
    /// Resolve the configured provider (case-insensitive) to a backend.
    pub fn new(settings: &LlmSettings, catalog: Arc<ToolCatalog>) -> Result<Self, GatewayError> {
        let backend: Box<dyn ChatBackend> = match settings.provider.to_lowercase().as_str() {
            "ollama" => Box::new(OllamaBackend::new(settings)),
            "openai" => Box::new(ChatCompletionsBackend::openai(settings)),
            "openrouter" => Box::new(ChatCompletionsBackend::openrouter(settings)),
            "deepseek" => Box::new(ChatCompletionsBackend::deepseek(settings)),
            other => return Err(GatewayError::UnsupportedProvider(other.to_string())),
        };

        Ok(Self { backend, catalog })
    }

    pub fn provider(&self) -> &str {
        self.backend.provider()
    }
}

/// Place the system instruction so the model always sees the current
/// tool set before any conversation content: replace the first existing
/// system turn, or prepend one when the history has none.
fn inject_system_turn(history: &[ChatTurn], instruction: String) -> Vec<ChatTurn> {
    let mut messages = history.to_vec();
    match messages.iter_mut().find(|turn| turn.role == Role::System) {
        Some(turn) => turn.content = instruction,
        None => messages.insert(0, ChatTurn::system(instruction)),
    }
    messages
}

#[async_trait]
impl ProviderGatewayPort for ProviderRouter {
    async fn chat(
        &self,
        history: &[ChatTurn],
        include_capabilities: bool,
    ) -> Result<GatewayResponse, GatewayError> {
        let mut reply = if include_capabilities {
            let instruction = build_system_message(&self.catalog.render_capabilities());
            let messages = inject_system_turn(history, instruction);
            self.backend.send(&messages).await?
        } else {
            self.backend.send(history).await?
        };

        if let Some(call) = self.catalog.parse_tool_call(&reply.text) {
            debug!(tool = %call.tool, "Reply is a tool call");
            reply.tool_call = Some(call);
        }

        Ok(reply)
    }
}
