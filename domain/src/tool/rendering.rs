//! Capability rendering — the model-facing description of the loaded
//! tool set.
//!
//! Rendering is deterministic: the same cached tool set always produces
//! byte-identical text, so prompt caching on the provider side is not
//! defeated by incidental reordering.

use crate::tool::entities::{InputSchema, ToolDescriptor};

/// Render the tool set into the text block embedded in the system
/// instruction.
///
/// One block per tool, in cached order:
///
/// ```text
/// Tool: get_weather
/// Description: Current weather for a city
/// Arguments:
/// - city: City name (required)
/// - units: No description
/// ```
pub fn render_capabilities(tools: &[ToolDescriptor]) -> String {
    if tools.is_empty() {
        return "No tools available.".to_string();
    }

    tools
        .iter()
        .map(|tool| {
            format!(
                "Tool: {}\nDescription: {}\nArguments:\n{}",
                tool.name,
                tool.description,
                render_arguments(&tool.input_schema)
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn render_arguments(schema: &InputSchema) -> String {
    if schema.properties.is_empty() {
        return "- No arguments".to_string();
    }

    schema
        .properties
        .iter()
        .map(|(name, spec)| {
            let description = spec.description.as_deref().unwrap_or("No description");
            let required = if schema.is_required(name) {
                " (required)"
            } else {
                ""
            };
            format!("- {}: {}{}", name, description, required)
        })
        .collect::<Vec<_>>()
        .join("\n")
}
