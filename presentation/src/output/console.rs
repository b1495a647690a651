//! Console output formatting.
//!
//! All user-facing text rendering lives here so the REPL stays a thin
//! input loop.

use conduit_application::{AppConfig, ExchangeOutcome, ToolActivity};
use conduit_domain::{GatewayResponse, ResourceDescriptor, ServerDescriptor, ToolDescriptor};

/// Stateless text formatter for the interactive console.
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Render a fully-resolved exchange, including any tool round-trip.
    pub fn format_exchange(outcome: &ExchangeOutcome) -> String {
        let mut out = String::new();

        if let Some(activity) = &outcome.tool_activity {
            let call = activity.call();
            out.push_str(&format!("\nModel wants to use tool: {}\n", call.tool));
            let arguments = serde_json::Value::Object(call.arguments.clone());
            out.push_str(&format!(
                "Arguments: {}\n",
                serde_json::to_string_pretty(&arguments).unwrap_or_default()
            ));

            match activity {
                ToolActivity::Succeeded { result, .. } => {
                    out.push_str(&format!(
                        "\nTool result: {}\n",
                        serde_json::to_string_pretty(result).unwrap_or_default()
                    ));
                }
                ToolActivity::Failed { error, .. } => {
                    out.push_str(&format!("\nTool failed: {}\n", error));
                }
            }
        }

        out.push_str(&format!("\nLLM: {}\n", outcome.reply.text));
        out.push_str(&Self::format_usage(&outcome.reply));
        out
    }

    /// Render token usage, one line per counter the backend reported.
    pub fn format_usage(response: &GatewayResponse) -> String {
        let Some(usage) = &response.usage else {
            return String::new();
        };
        if usage.is_empty() {
            return String::new();
        }

        let mut out = String::from("\nToken Usage:\n");
        if let Some(prompt) = usage.prompt_tokens {
            out.push_str(&format!("- Prompt tokens: {}\n", prompt));
        }
        if let Some(completion) = usage.completion_tokens {
            out.push_str(&format!("- Completion tokens: {}\n", completion));
        }
        if let Some(total) = usage.total_tokens {
            out.push_str(&format!("- Total tokens: {}\n", total));
        }
        out
    }

    /// Render the configured server table.
    pub fn format_servers<'a>(
        servers: impl Iterator<Item = (&'a String, &'a ServerDescriptor)>,
        active: Option<&ServerDescriptor>,
    ) -> String {
        let mut out = String::from("\nAvailable Tool Servers:\n---------------------\n");
        for (index, (key, server)) in servers.enumerate() {
            let status = if server.enabled { "Enabled" } else { "Disabled" };
            let marker = if active.is_some_and(|a| a.name == server.name) {
                "* "
            } else {
                "  "
            };
            out.push_str(&format!(
                "{}{}. {} [{}] ({})\n",
                marker,
                index + 1,
                server.name,
                key,
                status
            ));
        }
        out
    }

    pub fn format_tools(server_name: &str, tools: &[ToolDescriptor]) -> String {
        let mut out = format!("\nTools for {}:\n-------------------------\n", server_name);
        for (index, tool) in tools.iter().enumerate() {
            out.push_str(&format!("{}. {}\n", index + 1, tool.name));
            out.push_str(&format!("   Description: {}\n\n", tool.description));
        }
        out
    }

    pub fn format_resources(server_name: &str, resources: &[ResourceDescriptor]) -> String {
        let mut out = format!(
            "\nResources for {}:\n-------------------------\n",
            server_name
        );
        for (index, resource) in resources.iter().enumerate() {
            out.push_str(&format!("{}. {}\n", index + 1, resource.uri));
            if let Some(name) = &resource.name {
                out.push_str(&format!("   Name: {}\n", name));
            }
            if let Some(description) = &resource.description {
                out.push_str(&format!("   Description: {}\n", description));
            }
            out.push('\n');
        }
        out
    }

    pub fn format_tool_result(result: &serde_json::Value) -> String {
        format!(
            "\nTool Result:\n------------\n{}\n",
            serde_json::to_string_pretty(result).unwrap_or_default()
        )
    }

    pub fn format_resource_content(content: &serde_json::Value) -> String {
        format!(
            "\nResource Content:\n-----------------\n{}\n",
            serde_json::to_string_pretty(content).unwrap_or_default()
        )
    }

    pub fn format_config(config: &AppConfig) -> String {
        format!(
            "\nCurrent Configuration:\n---------------------\n{}\n",
            serde_json::to_string_pretty(config).unwrap_or_default()
        )
    }

    pub fn help_text() -> &'static str {
        "\nAvailable Commands:\n\
         -----------------\n\
         help             - Show this help message\n\
         servers          - List available tool servers\n\
         use <server-key> - Set the active tool server\n\
         enable <server>  - Enable a tool server\n\
         disable <server> - Disable a tool server\n\
         tools            - List tools for the active server\n\
         resources        - List resources for the active server\n\
         call <tool> <args> - Call a tool with JSON arguments\n\
         resource <uri>   - Read a resource from the active server\n\
         clear            - Clear chat history\n\
         config           - Show current configuration\n\
         exit/quit        - Exit the application\n\
         \nAnything else will be sent as a message to the LLM.\n"
    }
}
