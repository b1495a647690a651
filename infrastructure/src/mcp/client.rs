//! MCP client — request/response correlation over a [`Transport`].
//!
//! A client wraps one transport behind a mutex; each request locks it,
//! writes one line, and reads frames until the matching response arrives.
//! Server notifications interleaved with the response are skipped, and
//! server-initiated requests are logged and ignored (this client offers
//! no server-callable capabilities).

use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{debug, trace, warn};

use crate::mcp::error::{McpError, Result};
use crate::mcp::protocol::{
    CallToolParams, FrameKind, InitializeParams, InitializeResult, JsonRpcNotificationOut,
    JsonRpcRequest, JsonRpcResponse, ReadResourceParams, ResourcesListResult, ToolsListResult,
    WireResource, WireTool, classify_frame,
};
use crate::mcp::transport::Transport;

/// A handshaken connection to one tool-provider server.
pub struct McpClient {
    transport: Mutex<Transport>,
    server_name: String,
}

impl std::fmt::Debug for McpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("McpClient")
            .field("server_name", &self.server_name)
            .finish_non_exhaustive()
    }
}

impl McpClient {
    /// Perform the capability-negotiation handshake and return a ready
    /// client.
    ///
    /// Handshake failures propagate to the caller; whether to retry is
    /// a caller policy.
    pub async fn initialize(mut transport: Transport, server_name: &str) -> Result<Self> {
        let params = serde_json::to_value(InitializeParams::default())?;
        let request = JsonRpcRequest::new("initialize", Some(params));
        let result = Self::roundtrip(&mut transport, &request).await?;

        let info: InitializeResult = serde_json::from_value(result)
            .map_err(|e| McpError::UnexpectedResponse(format!("initialize result: {e}")))?;
        debug!(
            server = server_name,
            protocol = %info.protocol_version,
            "Handshake complete"
        );

        let initialized = JsonRpcNotificationOut::new("notifications/initialized");
        transport.send(&serde_json::to_string(&initialized)?).await?;

        Ok(Self {
            transport: Mutex::new(transport),
            server_name: server_name.to_string(),
        })
    }

    pub fn server_name(&self) -> &str {
        &self.server_name
    }

    /// Send a request and wait for its correlated response.
    pub async fn request(&self, method: &str, params: Option<Value>) -> Result<Value> {
        let request = JsonRpcRequest::new(method, params);
        let mut transport = self.transport.lock().await;
        Self::roundtrip(&mut transport, &request).await
    }

    /// Write one request and read frames until its response arrives.
    async fn roundtrip(transport: &mut Transport, request: &JsonRpcRequest) -> Result<Value> {
        transport.send(&serde_json::to_string(request)?).await?;

        loop {
            let line = transport.recv().await?;
            let json: Value = match serde_json::from_str(&line) {
                Ok(v) => v,
                Err(e) => {
                    warn!("Skipping unparseable frame: {} — {}", e, line);
                    continue;
                }
            };

            match classify_frame(&json) {
                FrameKind::Notification => {
                    trace!(
                        "Skipping notification: {}",
                        json.get("method").and_then(|m| m.as_str()).unwrap_or("?")
                    );
                }
                FrameKind::ServerRequest { id } => {
                    warn!("Ignoring server-initiated request (id={})", id);
                }
                FrameKind::Response => {
                    let response: JsonRpcResponse = serde_json::from_value(json)
                        .map_err(|e| McpError::UnexpectedResponse(e.to_string()))?;

                    if response.id != Some(request.id) {
                        warn!(
                            "Response id {:?} does not match request id {}, skipping",
                            response.id, request.id
                        );
                        continue;
                    }

                    if let Some(error) = response.error {
                        return Err(McpError::Rpc {
                            code: error.code,
                            message: error.message,
                        });
                    }
                    return Ok(response.result.unwrap_or(Value::Null));
                }
            }
        }
    }

    /// Liveness probe: a lightweight round-trip.
    pub async fn ping(&self) -> Result<()> {
        self.request("ping", None).await.map(|_| ())
    }

    /// Enumerate the tools the server advertises.
    pub async fn list_tools(&self) -> Result<Vec<WireTool>> {
        let result = self.request("tools/list", None).await?;
        let listing: ToolsListResult = serde_json::from_value(result)
            .map_err(|e| McpError::UnexpectedResponse(format!("tools/list result: {e}")))?;
        Ok(listing.tools)
    }

    /// Invoke a tool; the result is returned verbatim.
    pub async fn call_tool(&self, name: &str, arguments: Value) -> Result<Value> {
        let params = CallToolParams {
            name: name.to_string(),
            arguments,
        };
        self.request("tools/call", Some(serde_json::to_value(params)?))
            .await
    }

    /// Enumerate the resources the server advertises.
    pub async fn list_resources(&self) -> Result<Vec<WireResource>> {
        let result = self.request("resources/list", None).await?;
        let listing: ResourcesListResult = serde_json::from_value(result)
            .map_err(|e| McpError::UnexpectedResponse(format!("resources/list result: {e}")))?;
        Ok(listing.resources)
    }

    /// Fetch a resource by URI; the content is returned verbatim.
    pub async fn read_resource(&self, uri: &str) -> Result<Value> {
        let params = ReadResourceParams {
            uri: uri.to_string(),
        };
        self.request("resources/read", Some(serde_json::to_value(params)?))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mcp::testing::scripted_client;

    #[tokio::test]
    async fn test_handshake_and_ping() {
        let client = scripted_client(true).await;
        assert_eq!(client.server_name(), "fake");
        client.ping().await.unwrap();
    }

    #[tokio::test]
    async fn test_ping_fails_when_server_hangs_up() {
        let client = scripted_client(false).await;
        let err = client.ping().await.unwrap_err();
        assert!(matches!(err, McpError::TransportClosed));
    }

    #[tokio::test]
    async fn test_list_tools() {
        let client = scripted_client(true).await;
        let tools = client.list_tools().await.unwrap();
        assert_eq!(tools.len(), 1);
        assert_eq!(tools[0].name, "get_weather");
        assert!(tools[0].input_schema.is_some());
    }

    #[tokio::test]
    async fn test_call_tool_returns_verbatim_result() {
        let client = scripted_client(true).await;
        let result = client
            .call_tool("get_weather", serde_json::json!({"city": "Paris"}))
            .await
            .unwrap();
        assert_eq!(result["content"][0]["text"], "sunny");
    }

    #[tokio::test]
    async fn test_unknown_method_surfaces_rpc_error() {
        let client = scripted_client(true).await;
        let err = client.request("no/such/method", None).await.unwrap_err();
        match err {
            McpError::Rpc { code, .. } => assert_eq!(code, -32601),
            other => panic!("expected rpc error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_notifications_are_skipped() {
        // The scripted server emits a progress notification before every
        // tools/list response; the client must read past it.
        let client = scripted_client(true).await;
        let tools = client.list_tools().await.unwrap();
        assert_eq!(tools[0].name, "get_weather");
    }

    #[tokio::test]
    async fn test_read_resource() {
        let client = scripted_client(true).await;
        let content = client.read_resource("mem://greeting").await.unwrap();
        assert_eq!(content["contents"][0]["text"], "hello");
    }
}
