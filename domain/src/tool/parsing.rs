//! Tool-call detection in model output.
//!
//! The wire contract with the model: to invoke a tool it must reply with
//! *exactly* a JSON object of the shape
//!
//! ```json
//! {"tool": "<name>", "arguments": {"<arg>": "<value>"}}
//! ```
//!
//! and nothing else. Anything that fails to parse that way is an
//! ordinary conversational reply, not an error. This function is the
//! discriminator between the two, so it returns `None` silently on every
//! mismatch.

use crate::tool::entities::ToolCall;

/// Try to interpret the entire trimmed text as a single tool call.
///
/// Returns `Some` only when the text is a JSON object carrying a string
/// `tool` field and an object `arguments` field. This is a pure shape
/// check; verifying that the name refers to a known tool is the
/// catalog's job.
pub fn parse_tool_call_shape(text: &str) -> Option<ToolCall> {
    let parsed: serde_json::Value = serde_json::from_str(text.trim()).ok()?;
    let object = parsed.as_object()?;

    let tool = object.get("tool")?.as_str()?;
    let arguments = object.get("arguments")?.as_object()?;

    Some(ToolCall {
        tool: tool.to_string(),
        arguments: arguments.clone(),
    })
}
