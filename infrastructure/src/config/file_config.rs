//! Configuration file schema (`conduit.toml`)
//!
//! ```toml
//! [llm]
//! provider = "openai"
//! model = "gpt-4o"
//!
//! [servers.weather]
//! command = "mcp-weather"
//! args = ["--units", "metric"]
//!
//! [servers.files]
//! base_url = "tcp://localhost:9300"
//!
//! default_server = "weather"
//! ```

use conduit_application::AppConfig;
use conduit_domain::{LlmSettings, ServerDescriptor};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Raw configuration as written in the file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Provider settings (`[llm]` section).
    pub llm: LlmSettings,
    /// Tool servers (`[servers.<key>]` tables).
    pub servers: BTreeMap<String, FileServerConfig>,
    /// Key of the server to activate at startup.
    pub default_server: Option<String>,
}

/// One `[servers.<key>]` table.
///
/// `name` defaults to the table key, and servers are enabled unless the
/// file says otherwise.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileServerConfig {
    pub name: Option<String>,
    pub command: Option<String>,
    pub args: Vec<String>,
    pub env: BTreeMap<String, String>,
    pub base_url: Option<String>,
    pub registry_url: Option<String>,
    pub auto_approve: Vec<String>,
    pub enabled: bool,
}

impl Default for FileServerConfig {
    fn default() -> Self {
        Self {
            name: None,
            command: None,
            args: Vec::new(),
            env: BTreeMap::new(),
            base_url: None,
            registry_url: None,
            auto_approve: Vec::new(),
            enabled: true,
        }
    }
}

impl FileServerConfig {
    fn into_descriptor(self, key: &str) -> ServerDescriptor {
        ServerDescriptor {
            name: self.name.unwrap_or_else(|| key.to_string()),
            command: self.command,
            args: self.args,
            env: self.env,
            base_url: self.base_url,
            registry_url: self.registry_url,
            auto_approve: self.auto_approve,
            enabled: self.enabled,
        }
    }
}

impl FileConfig {
    /// Resolve the file schema into the application configuration.
    pub fn into_app_config(self) -> AppConfig {
        let servers = self
            .servers
            .into_iter()
            .map(|(key, server)| {
                let descriptor = server.into_descriptor(&key);
                (key, descriptor)
            })
            .collect();

        AppConfig {
            llm: self.llm,
            servers,
            default_server: self.default_server,
        }
    }
}
