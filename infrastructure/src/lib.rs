//! Infrastructure layer for conduit
//!
//! This crate contains the adapters that implement the ports defined in
//! the application layer: the MCP connection stack (transports,
//! connection cache, connector), the provider backend adapters and
//! gateway router, and configuration file loading.

pub mod config;
pub mod mcp;
pub mod providers;

// Re-export commonly used types
pub use config::{ConfigLoader, FileConfig};
pub use mcp::{
    connector::McpConnector,
    error::{McpError, Result},
    manager::ConnectionManager,
};
pub use providers::router::ProviderRouter;
