//! CLI argument definitions

use clap::Parser;
use std::path::PathBuf;

/// Interactive agent shell bridging LLM providers and tool servers
#[derive(Parser, Debug)]
#[command(name = "conduit", version, about)]
pub struct Cli {
    /// Path to a configuration file (overrides discovered configs)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Skip config file discovery and use built-in defaults
    #[arg(long)]
    pub no_config: bool,

    /// Tool server to activate at startup (overrides the configured default)
    #[arg(short, long)]
    pub server: Option<String>,

    /// Increase logging verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_defaults() {
        let cli = Cli::parse_from(["conduit"]);
        assert!(cli.config.is_none());
        assert!(cli.server.is_none());
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn test_counts_verbosity() {
        let cli = Cli::parse_from(["conduit", "-vvv"]);
        assert_eq!(cli.verbose, 3);
    }

    #[test]
    fn test_accepts_server_override() {
        let cli = Cli::parse_from(["conduit", "--server", "weather"]);
        assert_eq!(cli.server.as_deref(), Some("weather"));
    }
}
