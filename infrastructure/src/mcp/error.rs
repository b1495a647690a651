//! Error types for the MCP connection stack

use thiserror::Error;

/// Result type alias for MCP operations
pub type Result<T> = std::result::Result<T, McpError>;

/// Errors that can occur when communicating with a tool-provider server
#[derive(Error, Debug)]
pub enum McpError {
    #[error("Failed to spawn '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to connect to {address}: {source}")]
    Connect {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Server '{0}' has neither a command nor a base URL configured")]
    NoTransport(String),

    #[error("JSON serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Transport I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON-RPC error (code {code}): {message}")]
    Rpc { code: i64, message: String },

    #[error("Transport closed")]
    TransportClosed,

    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),
}
