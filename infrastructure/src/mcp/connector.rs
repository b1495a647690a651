//! Connector adapter — protocol operations behind the application port.
//!
//! Thin per-call operations: each acquires a live handle from the
//! [`ConnectionManager`], performs one protocol call, and returns the
//! payload verbatim. Tool output is never interpreted here, and no call
//! retries: failures propagate to the caller unchanged.

use std::sync::Arc;

use async_trait::async_trait;
use conduit_application::ports::tool_connector::{ConnectorError, ToolConnectorPort};
use conduit_domain::{InputSchema, ResourceDescriptor, ServerDescriptor, ToolDescriptor};
use tracing::debug;

use crate::mcp::error::McpError;
use crate::mcp::manager::ConnectionManager;
use crate::mcp::protocol::WireTool;

impl From<McpError> for ConnectorError {
    fn from(error: McpError) -> Self {
        match error {
            McpError::NoTransport(name) => ConnectorError::NoTransport(name),
            McpError::Rpc { code, message } => ConnectorError::Server { code, message },
            other => ConnectorError::Transport(other.to_string()),
        }
    }
}

/// [`ToolConnectorPort`] implementation over the MCP connection stack.
pub struct McpConnector {
    manager: Arc<ConnectionManager>,
}

impl McpConnector {
    pub fn new(manager: Arc<ConnectionManager>) -> Self {
        Self { manager }
    }

    pub fn manager(&self) -> &Arc<ConnectionManager> {
        &self.manager
    }
}

/// Convert a wire tool into a domain descriptor, stamping provenance.
fn to_descriptor(tool: WireTool, server_name: &str) -> ToolDescriptor {
    let input_schema = tool
        .input_schema
        .and_then(|schema| serde_json::from_value::<InputSchema>(schema).ok())
        .unwrap_or_default();

    ToolDescriptor {
        name: tool.name,
        description: tool
            .description
            .unwrap_or_else(|| "No description available".to_string()),
        input_schema,
        server_name: server_name.to_string(),
    }
}

#[async_trait]
impl ToolConnectorPort for McpConnector {
    async fn list_tools(
        &self,
        server: &ServerDescriptor,
    ) -> Result<Vec<ToolDescriptor>, ConnectorError> {
        debug!(server = %server.name, "Listing tools");
        let client = self.manager.acquire(server).await?;
        let tools = client.list_tools().await?;
        Ok(tools
            .into_iter()
            .map(|t| to_descriptor(t, &server.name))
            .collect())
    }

    async fn list_resources(
        &self,
        server: &ServerDescriptor,
    ) -> Result<Vec<ResourceDescriptor>, ConnectorError> {
        debug!(server = %server.name, "Listing resources");
        let client = self.manager.acquire(server).await?;
        let resources = client.list_resources().await?;
        Ok(resources
            .into_iter()
            .map(|r| ResourceDescriptor {
                uri: r.uri,
                name: r.name,
                description: r.description,
                server_name: server.name.clone(),
            })
            .collect())
    }

    async fn call_tool(
        &self,
        server: &ServerDescriptor,
        name: &str,
        arguments: serde_json::Value,
    ) -> Result<serde_json::Value, ConnectorError> {
        debug!(server = %server.name, tool = name, "Calling tool");
        let client = self.manager.acquire(server).await?;
        Ok(client.call_tool(name, arguments).await?)
    }

    async fn read_resource(
        &self,
        server: &ServerDescriptor,
        uri: &str,
    ) -> Result<serde_json::Value, ConnectorError> {
        debug!(server = %server.name, uri, "Reading resource");
        let client = self.manager.acquire(server).await?;
        Ok(client.read_resource(uri).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descriptor_defaults_missing_description() {
        let tool = WireTool {
            name: "get_weather".to_string(),
            description: None,
            input_schema: None,
        };
        let descriptor = to_descriptor(tool, "weather");
        assert_eq!(descriptor.description, "No description available");
        assert_eq!(descriptor.server_name, "weather");
        assert!(descriptor.input_schema.properties.is_empty());
    }

    #[test]
    fn test_descriptor_parses_schema_leniently() {
        let tool = WireTool {
            name: "get_weather".to_string(),
            description: Some("Weather".to_string()),
            input_schema: Some(serde_json::json!({
                "type": "object",
                "properties": {"city": {"type": "string", "description": "City"}},
                "required": ["city"],
                "additionalProperties": false
            })),
        };
        let descriptor = to_descriptor(tool, "weather");
        assert!(descriptor.input_schema.is_required("city"));
    }

    #[tokio::test]
    async fn test_list_tools_propagates_config_error() {
        let connector = McpConnector::new(Arc::new(ConnectionManager::new()));
        let err = connector
            .list_tools(&ServerDescriptor::new("empty"))
            .await
            .unwrap_err();
        assert!(matches!(err, ConnectorError::NoTransport(_)));
    }
}
