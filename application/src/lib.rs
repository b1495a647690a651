//! Application layer for conduit
//!
//! This crate contains the port definitions, the tool catalog, and the
//! chat session use case. It depends only on the domain layer.

pub mod catalog;
pub mod config;
pub mod ports;
pub mod session;

// Re-export commonly used types
pub use catalog::ToolCatalog;
pub use config::AppConfig;
pub use ports::{
    provider_gateway::{ChatBackend, GatewayError, ProviderGatewayPort},
    tool_connector::{ConnectorError, ToolConnectorPort},
};
pub use session::{ChatSession, ExchangeOutcome, SessionError, ToolActivity};
