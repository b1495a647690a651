//! Domain layer for conduit
//!
//! This crate contains the core entities and value objects of the agent
//! shell: conversation turns, tool descriptors and calls, server
//! descriptors, and the model-facing prompt contract. It has no
//! dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Conversation
//!
//! An ordered, append-only sequence of [`ChatTurn`]s. Tool calls and tool
//! results are recorded as assistant/system turns so every provider
//! request sees full context.
//!
//! ## Tools
//!
//! A tool server advertises [`ToolDescriptor`]s; the model requests an
//! invocation by replying with a bare JSON object naming a tool and its
//! arguments, which [`tool::parsing`] recognizes and everything else
//! passes through as ordinary conversation.

pub mod chat;
pub mod config;
pub mod core;
pub mod prompt;
pub mod server;
pub mod tool;

// Re-export commonly used types
pub use chat::{ChatTurn, GatewayResponse, Role, TokenUsage};
pub use config::LlmSettings;
pub use crate::core::error::DomainError;
pub use prompt::build_system_message;
pub use server::ServerDescriptor;
pub use tool::{
    entities::{InputSchema, PropertySpec, ResourceDescriptor, ToolCall, ToolDescriptor},
    parsing::parse_tool_call_shape,
    rendering::render_capabilities,
};
