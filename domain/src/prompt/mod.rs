//! The model-facing system instruction.
//!
//! The wording here is part of the wire contract with the model: it
//! spells out the exact JSON shape a tool invocation must take and how
//! to phrase the follow-up once a tool result comes back. Keep edits in
//! sync with [`crate::tool::parsing`].

/// Build the system instruction from rendered capabilities text.
pub fn build_system_message(capabilities: &str) -> String {
    format!(
        r#"You are a helpful assistant with access to these tools:

{capabilities}

Choose the appropriate tool based on the user's question. If no tool is needed, reply directly.

IMPORTANT: When you need to use a tool, you must ONLY respond with the exact JSON object format below, nothing else:
{{
    "tool": "tool-name",
    "arguments": {{
        "argument-name": "value"
    }}
}}

After receiving a tool's response:
1. Transform the raw data into a natural, conversational response
2. Keep responses concise but informative
3. Focus on the most relevant information
4. Use appropriate context from the user's question
5. Avoid simply repeating the raw data

Please use only the tools that are explicitly defined above."#
    )
}
