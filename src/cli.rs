//! CLI for store-api
//!
//! Commands:
//! - start: seed the collection and serve the product API

use clap::{Parser, Subcommand};
use thiserror::Error;

use crate::api::ApiServer;
use crate::config::ServerConfig;
use crate::observability::{Logger, Severity};
use crate::products;
use crate::store::{Collection, StoreError};

/// store-api - a product listing service with query filtering and pagination
#[derive(Parser, Debug)]
#[command(name = "store-api")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the product API server
    Start {
        /// Host to bind to
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to (falls back to the PORT environment
        /// variable, then 3000)
        #[arg(long)]
        port: Option<u16>,
    },
}

/// Result type for CLI operations
pub type CliResult<T> = Result<T, CliError>;

/// CLI errors; all are fatal
#[derive(Debug, Error)]
pub enum CliError {
    #[error("runtime error: {0}")]
    Io(#[from] std::io::Error),

    #[error("seed error: {0}")]
    Seed(#[from] StoreError),
}

/// Parse arguments and dispatch
pub fn run() -> CliResult<()> {
    let cli = Cli::parse();
    match cli.command {
        Command::Start { host, port } => start(host, port),
    }
}

/// Boot the server: build config, seed sample data, serve until
/// interrupted
fn start(host: Option<String>, port: Option<u16>) -> CliResult<()> {
    let mut config = ServerConfig::default();
    if let Some(host) = host {
        config.host = host;
    }
    if let Some(port) = port.or_else(env_port) {
        config.port = port;
    }

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        let collection = Collection::new();
        let seeded = products::seed(&collection)?;
        Logger::log(
            Severity::Info,
            "collection_seeded",
            &[("products", &seeded.to_string())],
        );

        let server = ApiServer::with_config(collection, config);
        server.start().await?;
        Ok(())
    })
}

/// Read the PORT environment variable, if set and numeric
fn env_port() -> Option<u16> {
    std::env::var("PORT").ok().and_then(|p| p.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_start_command() {
        let cli = Cli::try_parse_from(["store-api", "start", "--port", "8080"]).unwrap();
        let Command::Start { host, port } = cli.command;
        assert_eq!(host, None);
        assert_eq!(port, Some(8080));
    }

    #[test]
    fn test_cli_requires_a_command() {
        assert!(Cli::try_parse_from(["store-api"]).is_err());
    }
}
