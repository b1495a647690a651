//! Provider gateway port
//!
//! Defines how the application layer talks to chat-completion backends.
//! Implementations (adapters) live in the infrastructure layer.

use async_trait::async_trait;
use conduit_domain::{ChatTurn, GatewayResponse};
use thiserror::Error;

/// Errors that can occur during gateway operations
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Unsupported LLM provider: {0}")]
    UnsupportedProvider(String),

    #[error("Request to {provider} failed: {message}")]
    RequestFailed { provider: String, message: String },

    #[error("Malformed {provider} response: {message}")]
    MalformedResponse { provider: String, message: String },
}

/// A single chat-completion backend.
///
/// One conforming implementation per provider; each builds its own
/// request body, speaks its own response shape, and returns the
/// normalized `{text, usage}` pair. `tool_call` is left unset here;
/// attaching it is gateway post-processing, not a backend concern.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Provider label used in error reporting.
    fn provider(&self) -> &str;

    /// Send the prepared messages and return the normalized reply.
    async fn send(&self, messages: &[ChatTurn]) -> Result<GatewayResponse, GatewayError>;
}

/// The gateway the orchestrator drives.
///
/// `chat` prepares messages (injecting the capabilities system
/// instruction when requested), dispatches to the resolved backend, and
/// post-processes the reply for an embedded tool call. One attempt per
/// call; errors propagate unchanged.
#[async_trait]
pub trait ProviderGatewayPort: Send + Sync {
    async fn chat(
        &self,
        history: &[ChatTurn],
        include_capabilities: bool,
    ) -> Result<GatewayResponse, GatewayError>;
}
