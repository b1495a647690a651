//! Tool connector port
//!
//! Defines the protocol-level operations available against a
//! tool-provider server. The adapter acquires a live connection for
//! every call and propagates failures unchanged; retries are a caller
//! policy, not a connector one.

use async_trait::async_trait;
use conduit_domain::{ResourceDescriptor, ServerDescriptor, ToolDescriptor};
use thiserror::Error;

/// Errors that can occur while talking to a tool-provider server
#[derive(Error, Debug)]
pub enum ConnectorError {
    #[error("Server '{0}' has neither a command nor a base URL configured")]
    NoTransport(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Tool server error (code {code}): {message}")]
    Server { code: i64, message: String },
}

/// Port for tool-provider protocol operations.
#[async_trait]
pub trait ToolConnectorPort: Send + Sync {
    /// Enumerate the tools the server advertises, stamped with the
    /// server's name.
    async fn list_tools(
        &self,
        server: &ServerDescriptor,
    ) -> Result<Vec<ToolDescriptor>, ConnectorError>;

    /// Enumerate the readable resources the server advertises.
    async fn list_resources(
        &self,
        server: &ServerDescriptor,
    ) -> Result<Vec<ResourceDescriptor>, ConnectorError>;

    /// Invoke a tool by name. The result is opaque and returned verbatim.
    async fn call_tool(
        &self,
        server: &ServerDescriptor,
        name: &str,
        arguments: serde_json::Value,
    ) -> Result<serde_json::Value, ConnectorError>;

    /// Fetch a resource by URI. The content is opaque and returned
    /// verbatim.
    async fn read_resource(
        &self,
        server: &ServerDescriptor,
        uri: &str,
    ) -> Result<serde_json::Value, ConnectorError>;
}
