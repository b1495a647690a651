//! Chat session — the conversation orchestrator.
//!
//! Drives the two-pass protocol per user input: ask the gateway, and if
//! the reply is a tool call, run the tool and ask the gateway again so
//! the model can turn raw tool output into a conversational answer.
//!
//! The exchange is modelled as an explicit state machine rather than
//! nested branching:
//!
//! ```text
//! AwaitingFirstReply ──> Final
//!                   └──> AwaitingToolResult ──> AwaitingSecondReply ──> Final
//! ```
//!
//! History is append-only: turns appended before a failing call remain,
//! and no failure ends the session, only the current exchange.

use std::collections::BTreeMap;
use std::sync::Arc;

use conduit_domain::{
    ChatTurn, DomainError, GatewayResponse, ResourceDescriptor, ServerDescriptor, ToolCall,
    ToolDescriptor,
};
use thiserror::Error;

use crate::catalog::ToolCatalog;
use crate::ports::provider_gateway::{GatewayError, ProviderGatewayPort};
use crate::ports::tool_connector::{ConnectorError, ToolConnectorPort};

/// Errors surfaced to the interactive layer
#[derive(Error, Debug)]
pub enum SessionError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error(transparent)]
    Connector(#[from] ConnectorError),
}

/// What happened to the tool call inside an exchange.
#[derive(Debug, Clone)]
pub enum ToolActivity {
    Succeeded {
        call: ToolCall,
        result: serde_json::Value,
    },
    Failed {
        call: ToolCall,
        error: String,
    },
}

impl ToolActivity {
    pub fn call(&self) -> &ToolCall {
        match self {
            Self::Succeeded { call, .. } | Self::Failed { call, .. } => call,
        }
    }
}

/// Result of one fully-resolved user input.
#[derive(Debug, Clone)]
pub struct ExchangeOutcome {
    /// The reply to show the user (the second reply when a tool ran).
    pub reply: GatewayResponse,
    /// Tool round-trip details, when the first reply was a tool call.
    pub tool_activity: Option<ToolActivity>,
}

/// Exchange state machine states.
enum ExchangeState {
    AwaitingFirstReply,
    AwaitingToolResult { call: ToolCall },
    AwaitingSecondReply { activity: ToolActivity },
    Final { outcome: ExchangeOutcome },
}

/// One interactive conversation and the server bookkeeping around it.
///
/// Owns the turn history and the active-server reference; the catalog
/// and gateway are shared with the rest of the process. Exchanges are
/// strictly sequential: one input is fully resolved before the next is
/// accepted.
pub struct ChatSession {
    gateway: Arc<dyn ProviderGatewayPort>,
    catalog: Arc<ToolCatalog>,
    connector: Arc<dyn ToolConnectorPort>,
    servers: BTreeMap<String, ServerDescriptor>,
    active_server: Option<ServerDescriptor>,
    history: Vec<ChatTurn>,
}

impl ChatSession {
    pub fn new(
        gateway: Arc<dyn ProviderGatewayPort>,
        catalog: Arc<ToolCatalog>,
        connector: Arc<dyn ToolConnectorPort>,
        servers: BTreeMap<String, ServerDescriptor>,
    ) -> Self {
        Self {
            gateway,
            catalog,
            connector,
            servers,
            active_server: None,
            history: Vec::new(),
        }
    }

    /// Resolve one user input through the two-pass protocol.
    pub async fn send_message(&mut self, input: &str) -> Result<ExchangeOutcome, SessionError> {
        self.history.push(ChatTurn::user(input));
        let include_capabilities = self.catalog.tool_count() > 0;

        let mut state = ExchangeState::AwaitingFirstReply;
        loop {
            state = match state {
                ExchangeState::AwaitingFirstReply => {
                    let reply = self.gateway.chat(&self.history, include_capabilities).await?;
                    self.history.push(ChatTurn::assistant(reply.text.clone()));

                    match reply.tool_call.clone() {
                        Some(call) => {
                            tracing::info!(tool = %call.tool, "Model requested a tool");
                            ExchangeState::AwaitingToolResult { call }
                        }
                        None => ExchangeState::Final {
                            outcome: ExchangeOutcome {
                                reply,
                                tool_activity: None,
                            },
                        },
                    }
                }

                ExchangeState::AwaitingToolResult { call } => {
                    let activity = match self.catalog.invoke(&call).await {
                        Ok(result) => {
                            let serialized = serde_json::to_string(&result)
                                .unwrap_or_else(|_| result.to_string());
                            self.history.push(ChatTurn::system(format!(
                                "Tool execution result: {serialized}"
                            )));
                            ToolActivity::Succeeded { call, result }
                        }
                        Err(e) => {
                            tracing::error!(tool = %call.tool, error = %e, "Tool execution failed");
                            self.history
                                .push(ChatTurn::system(format!("Error executing tool: {e}")));
                            ToolActivity::Failed {
                                call,
                                error: e.to_string(),
                            }
                        }
                    };
                    ExchangeState::AwaitingSecondReply { activity }
                }

                // The second pass is mandatory: the model is always asked
                // to turn the tool result (or failure) into a
                // conversational answer.
                ExchangeState::AwaitingSecondReply { activity } => {
                    let reply = self.gateway.chat(&self.history, include_capabilities).await?;
                    self.history.push(ChatTurn::assistant(reply.text.clone()));
                    ExchangeState::Final {
                        outcome: ExchangeOutcome {
                            reply,
                            tool_activity: Some(activity),
                        },
                    }
                }

                ExchangeState::Final { outcome } => return Ok(outcome),
            };
        }
    }

    /// Activate a configured server and reload its tools.
    pub async fn set_active_server(&mut self, key: &str) -> Result<(), SessionError> {
        let server = self
            .servers
            .get(key)
            .ok_or_else(|| DomainError::UnknownServer(key.to_string()))?;
        if !server.enabled {
            return Err(DomainError::ServerDisabled(server.name.clone()).into());
        }

        let server = server.clone();
        tracing::info!(server = %server.name, "Active tool server set");
        self.active_server = Some(server.clone());
        self.catalog.set_active(Some(server));
        self.catalog.reload().await;
        Ok(())
    }

    /// Enable or disable a configured server.
    ///
    /// Disabling the active server clears the active reference and
    /// empties the tool cache.
    pub async fn toggle_server(&mut self, key: &str, enabled: bool) -> Result<(), SessionError> {
        let server = self
            .servers
            .get_mut(key)
            .ok_or_else(|| DomainError::UnknownServer(key.to_string()))?;
        server.enabled = enabled;
        let name = server.name.clone();

        if !enabled
            && self
                .active_server
                .as_ref()
                .is_some_and(|active| active.name == name)
        {
            tracing::info!(server = %name, "Active server disabled, clearing");
            self.active_server = None;
            self.catalog.set_active(None);
            self.catalog.reload().await;
        }
        Ok(())
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    pub fn history(&self) -> &[ChatTurn] {
        &self.history
    }

    pub fn active_server(&self) -> Option<&ServerDescriptor> {
        self.active_server.as_ref()
    }

    pub fn servers(&self) -> &BTreeMap<String, ServerDescriptor> {
        &self.servers
    }

    pub fn tool_count(&self) -> usize {
        self.catalog.tool_count()
    }

    fn require_active(&self) -> Result<&ServerDescriptor, SessionError> {
        self.active_server
            .as_ref()
            .ok_or_else(|| DomainError::NoActiveServer.into())
    }

    /// List the active server's tools directly from the server.
    pub async fn list_tools(&self) -> Result<Vec<ToolDescriptor>, SessionError> {
        let server = self.require_active()?;
        Ok(self.connector.list_tools(server).await?)
    }

    /// List the active server's resources.
    pub async fn list_resources(&self) -> Result<Vec<ResourceDescriptor>, SessionError> {
        let server = self.require_active()?;
        Ok(self.connector.list_resources(server).await?)
    }

    /// Invoke a tool by hand, bypassing the model.
    pub async fn call_tool(
        &self,
        name: &str,
        arguments: serde_json::Value,
    ) -> Result<serde_json::Value, SessionError> {
        let server = self.require_active()?;
        Ok(self.connector.call_tool(server, name, arguments).await?)
    }

    /// Read a resource from the active server.
    pub async fn read_resource(&self, uri: &str) -> Result<serde_json::Value, SessionError> {
        let server = self.require_active()?;
        Ok(self.connector.read_resource(server, uri).await?)
    }
}
