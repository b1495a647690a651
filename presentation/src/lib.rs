//! Presentation layer for conduit
//!
//! This crate contains the CLI definition, the interactive console, and
//! output formatting.

pub mod chat;
pub mod cli;
pub mod output;

// Re-export commonly used types
pub use chat::ChatRepl;
pub use cli::commands::Cli;
pub use output::console::ConsoleFormatter;
