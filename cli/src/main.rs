//! CLI entrypoint for conduit
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use conduit_application::{ChatSession, ToolCatalog};
use conduit_infrastructure::{ConfigLoader, ConnectionManager, McpConnector, ProviderRouter};
use conduit_presentation::{ChatRepl, Cli};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity level
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    info!("Starting conduit");

    // Load configuration
    let file_config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref()).map_err(|e| anyhow::anyhow!(e))?
    };
    let config = file_config.into_app_config();

    // === Dependency Injection ===
    let manager = Arc::new(ConnectionManager::new());
    let connector = Arc::new(McpConnector::new(manager));
    let catalog = Arc::new(ToolCatalog::new(connector.clone()));
    let router = Arc::new(ProviderRouter::new(&config.llm, Arc::clone(&catalog))?);

    let mut session = ChatSession::new(router, catalog, connector, config.servers.clone());

    // Activate the startup server, if one is configured
    let startup_server = cli.server.as_ref().or(config.default_server.as_ref());
    if let Some(key) = startup_server {
        match session.set_active_server(key).await {
            Ok(()) => info!(server = %key, "Default tool server activated"),
            Err(e) => warn!(server = %key, error = %e, "Could not activate default server"),
        }
    }

    ChatRepl::new(session, config).run().await?;

    Ok(())
}
