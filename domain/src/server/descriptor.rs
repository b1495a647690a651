//! Server descriptor — configuration identifying one tool-provider
//! endpoint and how to reach it.
//!
//! A descriptor carries exactly one transport: a `command` launch spec
//! (subprocess speaking the protocol over its standard pipes) or a
//! `base_url` (persistent network stream). The connection cache is keyed
//! by [`cache_key`](ServerDescriptor::cache_key), a stable serialization
//! of the transport-relevant fields, so two descriptors that would reach
//! the same server share one connection.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Configuration for a single tool-provider server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerDescriptor {
    /// Unique display label.
    pub name: String,
    /// Subprocess launch command.
    pub command: Option<String>,
    /// Arguments for the launch command.
    pub args: Vec<String>,
    /// Extra environment merged over the ambient environment at spawn.
    pub env: BTreeMap<String, String>,
    /// Network endpoint (`tcp://host:port` or bare `host:port`).
    pub base_url: Option<String>,
    /// Optional registry endpoint advertised by the server.
    pub registry_url: Option<String>,
    /// Tool names pre-approved for invocation without prompting.
    pub auto_approve: Vec<String>,
    /// Whether this server may be activated.
    pub enabled: bool,
}

impl Default for ServerDescriptor {
    fn default() -> Self {
        Self {
            name: String::new(),
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

impl ServerDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_command(mut self, command: impl Into<String>) -> Self {
        self.command = Some(command.into());
        self
    }

    pub fn with_args(mut self, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Whether any transport is configured at all.
    pub fn has_transport(&self) -> bool {
        self.base_url.is_some() || self.command.is_some()
    }

    /// Stable identity for the connection cache.
    ///
    /// Serializes the transport-relevant fields in a fixed order; `env`
    /// is a `BTreeMap` so key ordering cannot vary between runs.
    pub fn cache_key(&self) -> String {
        serde_json::json!({
            "baseUrl": self.base_url,
            "command": self.command,
            "args": self.args,
            "registryUrl": self.registry_url,
            "env": self.env,
            "name": self.name,
        })
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_key_is_stable() {
        let server = ServerDescriptor::new("files")
            .with_command("mcp-files")
            .with_args(["--root", "/tmp"]);
        assert_eq!(server.cache_key(), server.cache_key());
    }

    #[test]
    fn test_cache_key_distinguishes_transports() {
        let stdio = ServerDescriptor::new("files").with_command("mcp-files");
        let tcp = ServerDescriptor::new("files").with_base_url("tcp://localhost:9300");
        assert_ne!(stdio.cache_key(), tcp.cache_key());
    }

    #[test]
    fn test_cache_key_ignores_enabled_flag() {
        let mut a = ServerDescriptor::new("files").with_command("mcp-files");
        let b = a.clone();
        a.enabled = false;
        assert_eq!(a.cache_key(), b.cache_key());
    }

    #[test]
    fn test_env_ordering_does_not_change_key() {
        let mut a = ServerDescriptor::new("files").with_command("mcp-files");
        a.env.insert("B".into(), "2".into());
        a.env.insert("A".into(), "1".into());

        let mut b = ServerDescriptor::new("files").with_command("mcp-files");
        b.env.insert("A".into(), "1".into());
        b.env.insert("B".into(), "2".into());

        assert_eq!(a.cache_key(), b.cache_key());
    }

    #[test]
    fn test_has_transport() {
        assert!(!ServerDescriptor::new("none").has_transport());
        assert!(ServerDescriptor::new("s").with_command("cmd").has_transport());
        assert!(
            ServerDescriptor::new("s")
                .with_base_url("tcp://localhost:9300")
                .has_transport()
        );
    }
}
