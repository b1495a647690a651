//! JSON-RPC protocol types for tool-provider communication.
//!
//! Messages are JSON-RPC 2.0, one JSON document per line, carried over a
//! subprocess's standard pipes or a persistent network stream.
//!
//! # Protocol Overview
//!
//! - **Requests**: client → server (`initialize`, `tools/list`,
//!   `tools/call`, `resources/list`, `resources/read`, `ping`)
//! - **Responses**: server → client (result or error)
//! - **Notifications**: either direction (`notifications/initialized`
//!   from us after the handshake; servers may emit progress or log
//!   notifications at any time, which the client skips over)

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// Protocol revision sent during the handshake.
pub const PROTOCOL_VERSION: &str = "2024-11-05";

/// Global request ID counter for JSON-RPC requests.
static REQUEST_ID: AtomicU64 = AtomicU64::new(1);

/// Generates a unique request ID.
fn next_id() -> u64 {
    REQUEST_ID.fetch_add(1, Ordering::SeqCst)
}

/// JSON-RPC request
#[derive(Debug, Clone, Serialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: &'static str,
    pub id: u64,
    pub method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<serde_json::Value>,
}

impl JsonRpcRequest {
    /// Creates a new JSON-RPC request with an auto-generated ID.
    pub fn new(method: impl Into<String>, params: Option<serde_json::Value>) -> Self {
        Self {
            jsonrpc: "2.0",
            id: next_id(),
            method: method.into(),
            params,
        }
    }
}

/// JSON-RPC notification (no `id`, no response expected)
#[derive(Debug, Clone, Serialize)]
pub struct JsonRpcNotificationOut {
    pub jsonrpc: &'static str,
    pub method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<serde_json::Value>,
}

impl JsonRpcNotificationOut {
    pub fn new(method: impl Into<String>) -> Self {
        Self {
            jsonrpc: "2.0",
            method: method.into(),
            params: None,
        }
    }
}

/// JSON-RPC response
#[derive(Debug, Clone, Deserialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    pub id: Option<u64>,
    pub result: Option<serde_json::Value>,
    pub error: Option<RpcErrorBody>,
}

/// JSON-RPC error object
#[derive(Debug, Clone, Deserialize)]
pub struct RpcErrorBody {
    pub code: i64,
    pub message: String,
    pub data: Option<serde_json::Value>,
}

/// Classification of an incoming JSON-RPC frame.
///
/// The request loop reads frames until it sees the response it is
/// waiting for; everything else is skipped (notifications) or rejected
/// by logging (server-initiated requests, which this client does not
/// support).
#[derive(Debug, PartialEq, Eq)]
pub enum FrameKind {
    /// A response to a request we sent (has `id`, no `method`).
    Response,
    /// A request from the server (has `id` + `method`).
    ServerRequest { id: u64 },
    /// A notification (has `method`, no `id`).
    Notification,
}

/// Classify a frame by inspecting its `id` and `method` fields.
pub fn classify_frame(json: &serde_json::Value) -> FrameKind {
    let id = json.get("id").and_then(|v| v.as_u64());
    let method = json.get("method").and_then(|v| v.as_str());

    match (id, method) {
        (Some(id), Some(_)) => FrameKind::ServerRequest { id },
        (Some(_), None) => FrameKind::Response,
        _ => FrameKind::Notification,
    }
}

/// Handshake parameters (`initialize`)
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializeParams {
    pub protocol_version: &'static str,
    pub capabilities: serde_json::Value,
    pub client_info: ClientInfo,
}

#[derive(Debug, Clone, Serialize)]
pub struct ClientInfo {
    pub name: &'static str,
    pub version: &'static str,
}

impl Default for InitializeParams {
    fn default() -> Self {
        Self {
            protocol_version: PROTOCOL_VERSION,
            capabilities: serde_json::json!({}),
            client_info: ClientInfo {
                name: "conduit",
                version: env!("CARGO_PKG_VERSION"),
            },
        }
    }
}

/// Handshake result
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializeResult {
    pub protocol_version: String,
    #[serde(default)]
    pub server_info: Option<ServerInfo>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerInfo {
    pub name: String,
    #[serde(default)]
    pub version: Option<String>,
}

/// `tools/list` result
#[derive(Debug, Clone, Deserialize)]
pub struct ToolsListResult {
    #[serde(default)]
    pub tools: Vec<WireTool>,
}

/// A tool as advertised on the wire.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireTool {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub input_schema: Option<serde_json::Value>,
}

/// `tools/call` parameters
#[derive(Debug, Clone, Serialize)]
pub struct CallToolParams {
    pub name: String,
    pub arguments: serde_json::Value,
}

/// `resources/list` result
#[derive(Debug, Clone, Deserialize)]
pub struct ResourcesListResult {
    #[serde(default)]
    pub resources: Vec<WireResource>,
}

/// A resource as advertised on the wire.
#[derive(Debug, Clone, Deserialize)]
pub struct WireResource {
    pub uri: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// `resources/read` parameters
#[derive(Debug, Clone, Serialize)]
pub struct ReadResourceParams {
    pub uri: String,
}
