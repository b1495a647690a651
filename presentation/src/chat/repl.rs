//! REPL (Read-Eval-Print Loop) for the interactive console.
//!
//! A thin input loop: the first word of a line selects a command, and
//! anything that is not a command goes to the model as a chat message.
//! All real work happens in the [`ChatSession`].

use crate::ConsoleFormatter;
use conduit_application::{AppConfig, ChatSession};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

/// Interactive console over a chat session.
pub struct ChatRepl {
    session: ChatSession,
    config: AppConfig,
}

impl ChatRepl {
    pub fn new(session: ChatSession, config: AppConfig) -> Self {
        Self { session, config }
    }

    /// Run the interactive loop until `exit`/`quit` or EOF.
    pub async fn run(&mut self) -> rustyline::Result<()> {
        let mut rl = DefaultEditor::new()?;

        // Try to load history
        let history_path = dirs::data_dir().map(|p| p.join("conduit").join("history.txt"));
        if let Some(path) = &history_path {
            if let Some(parent) = path.parent() {
                let _ = std::fs::create_dir_all(parent);
            }
            let _ = rl.load_history(path);
        }

        self.print_welcome();

        loop {
            match rl.readline("> ") {
                Ok(line) => {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }
                    let _ = rl.add_history_entry(line);

                    if !self.process_command(line).await {
                        break;
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    println!("^C");
                    continue;
                }
                Err(ReadlineError::Eof) => {
                    println!("Bye!");
                    break;
                }
                Err(err) => {
                    eprintln!("Error: {:?}", err);
                    break;
                }
            }
        }

        // Save history
        if let Some(path) = &history_path {
            let _ = rl.save_history(path);
        }

        Ok(())
    }

    fn print_welcome(&self) {
        println!();
        println!("Conduit started.");
        println!("LLM provider: {}", self.config.llm.provider);

        match self.session.active_server() {
            Some(server) => {
                println!("Active tool server: {}", server.name);
                let count = self.session.tool_count();
                if count > 0 {
                    println!("Loaded {} tools for the LLM to use.", count);
                } else {
                    println!("No tools loaded. The LLM will not be able to use tools.");
                }
            }
            None => println!("No active tool server."),
        }

        println!();
        println!("Type \"help\" for available commands.");
    }

    /// Dispatch one input line. Returns false when the loop should end.
    async fn process_command(&mut self, input: &str) -> bool {
        let mut tokens = input.split_whitespace();
        let command = tokens.next().unwrap_or("").to_lowercase();
        let rest: Vec<&str> = tokens.collect();

        match command.as_str() {
            "exit" | "quit" => return false,

            "help" => println!("{}", ConsoleFormatter::help_text()),

            "servers" => {
                let text = ConsoleFormatter::format_servers(
                    self.session.servers().iter(),
                    self.session.active_server(),
                );
                println!("{}", text);
            }

            "use" => match rest.first() {
                Some(key) => match self.session.set_active_server(key).await {
                    Ok(()) => {
                        let server = self.session.active_server().map(|s| s.name.clone());
                        println!(
                            "Active tool server set to: {}",
                            server.unwrap_or_default()
                        );
                        println!("Loaded {} tools.", self.session.tool_count());
                    }
                    Err(e) => println!("{}", e),
                },
                None => println!("Usage: use <server-key>"),
            },

            "enable" | "disable" => {
                let enable = command == "enable";
                let was_active = self.session.active_server().is_some();
                match rest.first() {
                    Some(key) => match self.session.toggle_server(key, enable).await {
                        Ok(()) => {
                            let name = self
                                .session
                                .servers()
                                .get(*key)
                                .map(|s| s.name.clone())
                                .unwrap_or_else(|| key.to_string());
                            let status = if enable { "enabled" } else { "disabled" };
                            println!("Server '{}' {}.", name, status);
                            if !enable && was_active && self.session.active_server().is_none() {
                                println!("Active server cleared.");
                            }
                        }
                        Err(e) => println!("{}", e),
                    },
                    None => println!("Usage: {} <server-key>", command),
                }
            }

            "tools" => match self.session.list_tools().await {
                Ok(tools) => {
                    let name = self
                        .session
                        .active_server()
                        .map(|s| s.name.clone())
                        .unwrap_or_default();
                    println!("{}", ConsoleFormatter::format_tools(&name, &tools));
                }
                Err(e) => eprintln!("Error listing tools: {}", e),
            },

            "resources" => match self.session.list_resources().await {
                Ok(resources) => {
                    let name = self
                        .session
                        .active_server()
                        .map(|s| s.name.clone())
                        .unwrap_or_default();
                    println!("{}", ConsoleFormatter::format_resources(&name, &resources));
                }
                Err(e) => eprintln!("Error listing resources: {}", e),
            },

            "call" => {
                if rest.len() >= 2 {
                    let tool = rest[0];
                    match serde_json::from_str(&rest[1..].join(" ")) {
                        Ok(arguments) => match self.session.call_tool(tool, arguments).await {
                            Ok(result) => {
                                println!("{}", ConsoleFormatter::format_tool_result(&result));
                            }
                            Err(e) => eprintln!("Error calling tool: {}", e),
                        },
                        Err(_) => {
                            eprintln!("Error parsing arguments. Please provide valid JSON.");
                        }
                    }
                } else {
                    println!("Usage: call <tool-name> <json-arguments>");
                }
            }

            "resource" => match rest.first() {
                Some(_) => {
                    let uri = rest.join(" ");
                    match self.session.read_resource(&uri).await {
                        Ok(content) => {
                            println!("{}", ConsoleFormatter::format_resource_content(&content));
                        }
                        Err(e) => eprintln!("Error reading resource: {}", e),
                    }
                }
                None => println!("Usage: resource <uri>"),
            },

            "clear" => {
                self.session.clear_history();
                println!("Chat history cleared.");
            }

            "config" => println!("{}", ConsoleFormatter::format_config(&self.config)),

            // Not a command: send it to the model.
            _ => match self.session.send_message(input).await {
                Ok(outcome) => println!("{}", ConsoleFormatter::format_exchange(&outcome)),
                Err(e) => eprintln!("Error sending message to LLM: {}", e),
            },
        }

        true
    }
}
