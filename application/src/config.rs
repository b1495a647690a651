//! Application configuration.

use conduit_domain::{LlmSettings, ServerDescriptor};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Fully-resolved application configuration, produced once at startup by
/// the infrastructure loader.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Provider settings for the chat gateway.
    pub llm: LlmSettings,
    /// Named tool-server descriptors, keyed by their config key.
    pub servers: BTreeMap<String, ServerDescriptor>,
    /// Key of the server to activate at startup.
    pub default_server: Option<String>,
}
