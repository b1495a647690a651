//! Tool catalog
//!
//! The [`ToolCatalog`] caches the tool set advertised by the currently
//! active server, renders it into the model-facing capabilities text,
//! and validates incoming tool-call requests against it.
//!
//! The cache is scoped to "whichever server is currently active":
//! switching servers invalidates it, and a reload replaces the whole set
//! or clears it. Tools are never partially loaded.

use std::sync::{Arc, RwLock};

use conduit_domain::tool::parsing::parse_tool_call_shape;
use conduit_domain::tool::rendering::render_capabilities;
use conduit_domain::{ServerDescriptor, ToolCall, ToolDescriptor};
use thiserror::Error;

use crate::ports::tool_connector::{ConnectorError, ToolConnectorPort};

/// Errors from catalog-mediated tool invocation
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("No active tool server")]
    NoActiveServer,

    #[error(transparent)]
    Connector(#[from] ConnectorError),
}

#[derive(Default)]
struct CatalogState {
    active: Option<ServerDescriptor>,
    tools: Vec<ToolDescriptor>,
}

/// Cached view of the active server's tools.
///
/// Shared between the gateway (capabilities rendering, tool-call
/// validation) and the session (invocation, tool counting). The lock is
/// never held across an await.
pub struct ToolCatalog {
    connector: Arc<dyn ToolConnectorPort>,
    state: RwLock<CatalogState>,
}

impl ToolCatalog {
    pub fn new(connector: Arc<dyn ToolConnectorPort>) -> Self {
        Self {
            connector,
            state: RwLock::new(CatalogState::default()),
        }
    }

    /// Replace the active-server reference.
    ///
    /// Does not reload tools; callers follow up with [`reload`](Self::reload)
    /// so interactive layers can report progress between the two steps.
    pub fn set_active(&self, server: Option<ServerDescriptor>) {
        let mut state = self.state.write().unwrap_or_else(|e| e.into_inner());
        state.active = server;
    }

    /// The currently active server, if any.
    pub fn active_server(&self) -> Option<ServerDescriptor> {
        let state = self.state.read().unwrap_or_else(|e| e.into_inner());
        state.active.clone()
    }

    /// Reload the tool cache from the active server.
    ///
    /// No active server clears the cache. A listing failure also clears
    /// it (logged, not surfaced), so the cache never holds a mix of old
    /// and new tools.
    pub async fn reload(&self) {
        let active = self.active_server();

        let Some(server) = active else {
            self.replace_tools(Vec::new());
            return;
        };

        match self.connector.list_tools(&server).await {
            Ok(tools) => {
                tracing::debug!(server = %server.name, count = tools.len(), "Loaded tools");
                self.replace_tools(tools);
            }
            Err(e) => {
                tracing::error!(server = %server.name, error = %e, "Failed to load tools");
                self.replace_tools(Vec::new());
            }
        }
    }

    fn replace_tools(&self, tools: Vec<ToolDescriptor>) {
        let mut state = self.state.write().unwrap_or_else(|e| e.into_inner());
        state.tools = tools;
    }

    /// Snapshot of the cached tool set.
    pub fn list(&self) -> Vec<ToolDescriptor> {
        let state = self.state.read().unwrap_or_else(|e| e.into_inner());
        state.tools.clone()
    }

    pub fn tool_count(&self) -> usize {
        let state = self.state.read().unwrap_or_else(|e| e.into_inner());
        state.tools.len()
    }

    /// Render the cached tools into the model-facing capabilities text.
    pub fn render_capabilities(&self) -> String {
        let state = self.state.read().unwrap_or_else(|e| e.into_inner());
        render_capabilities(&state.tools)
    }

    /// Interpret model output as a tool call against the cached set.
    ///
    /// A reply that is not shaped like a call is an ordinary
    /// conversational reply: `None`, silently. A well-formed call naming
    /// a tool that is not in the cache is a hallucination: logged, then
    /// also treated as a plain reply.
    pub fn parse_tool_call(&self, text: &str) -> Option<ToolCall> {
        let call = parse_tool_call_shape(text)?;

        let state = self.state.read().unwrap_or_else(|e| e.into_inner());
        if !state.tools.iter().any(|t| t.name == call.tool) {
            tracing::warn!(tool = %call.tool, "Model requested a tool that is not available");
            return None;
        }

        Some(call)
    }

    /// Execute a validated tool call on the active server.
    pub async fn invoke(&self, call: &ToolCall) -> Result<serde_json::Value, CatalogError> {
        let server = self.active_server().ok_or(CatalogError::NoActiveServer)?;

        tracing::info!(server = %server.name, tool = %call.tool, "Invoking tool");
        let arguments = serde_json::Value::Object(call.arguments.clone());
        let result = self.connector.call_tool(&server, &call.tool, arguments).await?;
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use conduit_domain::ResourceDescriptor;
    use std::sync::Mutex;

    /// Connector stub with scripted listings and recorded calls.
    struct FakeConnector {
        tools: Mutex<Result<Vec<ToolDescriptor>, String>>,
        calls: Mutex<Vec<(String, serde_json::Value)>>,
    }

    impl FakeConnector {
        fn with_tools(tools: Vec<ToolDescriptor>) -> Self {
            Self {
                tools: Mutex::new(Ok(tools)),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn set_tools(&self, tools: Vec<ToolDescriptor>) {
            *self.tools.lock().unwrap() = Ok(tools);
        }

        fn set_error(&self, message: &str) {
            *self.tools.lock().unwrap() = Err(message.to_string());
        }
    }

    #[async_trait]
    impl ToolConnectorPort for FakeConnector {
        async fn list_tools(
            &self,
            server: &ServerDescriptor,
        ) -> Result<Vec<ToolDescriptor>, ConnectorError> {
            match &*self.tools.lock().unwrap() {
                Ok(tools) => Ok(tools
                    .iter()
                    .cloned()
                    .map(|t| t.with_server(&server.name))
                    .collect()),
                Err(e) => Err(ConnectorError::Transport(e.clone())),
            }
        }

        async fn list_resources(
            &self,
            _server: &ServerDescriptor,
        ) -> Result<Vec<ResourceDescriptor>, ConnectorError> {
            Ok(Vec::new())
        }

        async fn call_tool(
            &self,
            _server: &ServerDescriptor,
            name: &str,
            arguments: serde_json::Value,
        ) -> Result<serde_json::Value, ConnectorError> {
            self.calls
                .lock()
                .unwrap()
                .push((name.to_string(), arguments));
            Ok(serde_json::json!({"ok": true}))
        }

        async fn read_resource(
            &self,
            _server: &ServerDescriptor,
            _uri: &str,
        ) -> Result<serde_json::Value, ConnectorError> {
            Ok(serde_json::Value::Null)
        }
    }

    fn weather_server() -> ServerDescriptor {
        ServerDescriptor::new("weather").with_command("mcp-weather")
    }

    fn catalog_with(connector: FakeConnector) -> (ToolCatalog, Arc<FakeConnector>) {
        let connector = Arc::new(connector);
        (ToolCatalog::new(connector.clone()), connector)
    }

    #[tokio::test]
    async fn test_reload_replaces_set_wholesale() {
        let (catalog, connector) =
            catalog_with(FakeConnector::with_tools(vec![ToolDescriptor::new(
                "get_weather",
                "Weather",
            )]));
        catalog.set_active(Some(weather_server()));
        catalog.reload().await;
        assert_eq!(catalog.tool_count(), 1);

        connector.set_tools(vec![
            ToolDescriptor::new("get_forecast", "Forecast"),
            ToolDescriptor::new("get_alerts", "Alerts"),
        ]);
        catalog.reload().await;

        let names: Vec<_> = catalog.list().into_iter().map(|t| t.name).collect();
        assert_eq!(names, vec!["get_forecast", "get_alerts"]);
    }

    #[tokio::test]
    async fn test_reload_failure_clears_cache() {
        let (catalog, connector) =
            catalog_with(FakeConnector::with_tools(vec![ToolDescriptor::new(
                "get_weather",
                "Weather",
            )]));
        catalog.set_active(Some(weather_server()));
        catalog.reload().await;
        assert_eq!(catalog.tool_count(), 1);

        // The next listing fails: the previously loaded set must not
        // survive, even partially.
        connector.set_error("connection refused");
        catalog.reload().await;
        assert_eq!(catalog.tool_count(), 0);
    }

    #[tokio::test]
    async fn test_reload_without_active_server_clears() {
        let (catalog, _) = catalog_with(FakeConnector::with_tools(vec![ToolDescriptor::new(
            "get_weather",
            "Weather",
        )]));
        catalog.set_active(Some(weather_server()));
        catalog.reload().await;
        assert_eq!(catalog.tool_count(), 1);

        catalog.set_active(None);
        catalog.reload().await;
        assert_eq!(catalog.tool_count(), 0);
    }

    #[tokio::test]
    async fn test_tools_are_stamped_with_server_name() {
        let (catalog, _) = catalog_with(FakeConnector::with_tools(vec![ToolDescriptor::new(
            "get_weather",
            "Weather",
        )]));
        catalog.set_active(Some(weather_server()));
        catalog.reload().await;

        assert_eq!(catalog.list()[0].server_name, "weather");
    }

    #[tokio::test]
    async fn test_parse_rejects_unknown_tool() {
        let (catalog, _) = catalog_with(FakeConnector::with_tools(vec![ToolDescriptor::new(
            "get_weather",
            "Weather",
        )]));
        catalog.set_active(Some(weather_server()));
        catalog.reload().await;

        let known = catalog.parse_tool_call(r#"{"tool": "get_weather", "arguments": {}}"#);
        assert!(known.is_some());

        let hallucinated = catalog.parse_tool_call(r#"{"tool": "launch_rockets", "arguments": {}}"#);
        assert!(hallucinated.is_none());
    }

    #[tokio::test]
    async fn test_parse_rejects_plain_text() {
        let (catalog, _) = catalog_with(FakeConnector::with_tools(Vec::new()));
        assert!(catalog.parse_tool_call("just chatting").is_none());
    }

    #[tokio::test]
    async fn test_invoke_requires_active_server() {
        let (catalog, _) = catalog_with(FakeConnector::with_tools(Vec::new()));
        let call = ToolCall::new("get_weather");
        let err = catalog.invoke(&call).await.unwrap_err();
        assert!(matches!(err, CatalogError::NoActiveServer));
    }

    #[tokio::test]
    async fn test_invoke_passes_arguments_through() {
        let (catalog, connector) =
            catalog_with(FakeConnector::with_tools(vec![ToolDescriptor::new(
                "get_weather",
                "Weather",
            )]));
        catalog.set_active(Some(weather_server()));
        catalog.reload().await;

        let call = ToolCall::new("get_weather").with_arg("city", "Paris");
        catalog.invoke(&call).await.unwrap();

        let calls = connector.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "get_weather");
        assert_eq!(calls[0].1["city"], "Paris");
    }

    #[tokio::test]
    async fn test_render_capabilities_reflects_cache() {
        let (catalog, _) = catalog_with(FakeConnector::with_tools(Vec::new()));
        assert_eq!(catalog.render_capabilities(), "No tools available.");
    }
}
