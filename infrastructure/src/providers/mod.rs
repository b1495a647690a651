//! Provider backend adapters and the gateway router.
//!
//! One [`ChatBackend`](conduit_application::ChatBackend) implementation
//! per chat-completion provider, plus the [`router::ProviderRouter`]
//! that resolves the configured provider name to its adapter once at
//! construction.

pub mod ollama;
pub mod openai_compat;
pub mod router;
