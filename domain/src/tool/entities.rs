//! Tool domain entities

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A tool advertised by a tool-provider server.
///
/// The whole set is (re)loaded wholesale whenever the active server
/// changes; descriptors are never patched individually.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDescriptor {
    /// Unique name of the tool within the active server.
    pub name: String,
    /// Human-readable description.
    pub description: String,
    /// Declared argument schema, used for rendering and validation only.
    #[serde(default)]
    pub input_schema: InputSchema,
    /// Name of the server that advertised this tool.
    pub server_name: String,
}

impl ToolDescriptor {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            input_schema: InputSchema::default(),
            server_name: String::new(),
        }
    }

    pub fn with_schema(mut self, schema: InputSchema) -> Self {
        self.input_schema = schema;
        self
    }

    pub fn with_server(mut self, server_name: impl Into<String>) -> Self {
        self.server_name = server_name.into();
        self
    }
}

/// Declared input schema of a tool.
///
/// Deserialized leniently from the server's JSON Schema: only the parts
/// needed for rendering (property descriptions and the `required` list)
/// are kept, and everything else is ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InputSchema {
    #[serde(default)]
    pub properties: BTreeMap<String, PropertySpec>,
    #[serde(default)]
    pub required: Vec<String>,
}

impl InputSchema {
    pub fn is_required(&self, property: &str) -> bool {
        self.required.iter().any(|r| r == property)
    }
}

/// A single property of a tool's input schema.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PropertySpec {
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "type", default)]
    pub property_type: Option<String>,
}

/// A structured request, parsed from model output, to invoke a tool.
///
/// Transient: constructed by parsing, consumed by execution, never
/// persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    pub tool: String,
    pub arguments: serde_json::Map<String, serde_json::Value>,
}

impl ToolCall {
    pub fn new(tool: impl Into<String>) -> Self {
        Self {
            tool: tool.into(),
            arguments: serde_json::Map::new(),
        }
    }

    pub fn with_arg(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.arguments.insert(key.into(), value.into());
        self
    }
}

/// A resource advertised by a tool-provider server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceDescriptor {
    pub uri: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    pub server_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_deserializes_from_json_schema() {
        let schema: InputSchema = serde_json::from_value(serde_json::json!({
            "type": "object",
            "properties": {
                "city": {"type": "string", "description": "City name"},
                "units": {"type": "string"}
            },
            "required": ["city"]
        }))
        .unwrap();

        assert!(schema.is_required("city"));
        assert!(!schema.is_required("units"));
        assert_eq!(
            schema.properties["city"].description.as_deref(),
            Some("City name")
        );
    }

    #[test]
    fn test_schema_tolerates_empty_object() {
        let schema: InputSchema = serde_json::from_value(serde_json::json!({})).unwrap();
        assert!(schema.properties.is_empty());
        assert!(schema.required.is_empty());
    }

    #[test]
    fn test_tool_call_builder() {
        let call = ToolCall::new("get_weather").with_arg("city", "Paris");
        assert_eq!(call.tool, "get_weather");
        assert_eq!(call.arguments["city"], "Paris");
    }
}
