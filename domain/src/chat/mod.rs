//! Conversation entities.
//!
//! A conversation is an ordered, append-only sequence of [`ChatTurn`]s.
//! Provider backends consume the sequence verbatim; the orchestrator is
//! the only writer.

use crate::tool::entities::ToolCall;
use serde::{Deserialize, Serialize};

/// Chat message role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// A single turn in the conversation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: Role,
    pub content: String,
}

impl ChatTurn {
    /// Creates a system turn (instructions or tool results for the model).
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    /// Creates a user turn (human input).
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    /// Creates an assistant turn (model response).
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Token accounting reported by a provider backend.
///
/// Backends report these inconsistently, so each counter is optional on
/// its own.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: Option<u64>,
    pub completion_tokens: Option<u64>,
    pub total_tokens: Option<u64>,
}

impl TokenUsage {
    /// Whether any counter was reported at all.
    pub fn is_empty(&self) -> bool {
        self.prompt_tokens.is_none()
            && self.completion_tokens.is_none()
            && self.total_tokens.is_none()
    }
}

/// Normalized reply from a provider backend.
///
/// `tool_call` is attached by gateway post-processing when the reply text
/// is a well-formed invocation of a known tool; it is `None` for ordinary
/// conversational replies.
#[derive(Debug, Clone)]
pub struct GatewayResponse {
    pub text: String,
    pub usage: Option<TokenUsage>,
    pub tool_call: Option<ToolCall>,
}

impl GatewayResponse {
    pub fn new(text: impl Into<String>, usage: Option<TokenUsage>) -> Self {
        Self {
            text: text.into(),
            usage,
            tool_call: None,
        }
    }

    pub fn is_tool_call(&self) -> bool {
        self.tool_call.is_some()
    }
}
