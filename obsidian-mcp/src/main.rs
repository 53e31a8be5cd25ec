//! Obsidian MCP Server
//!
//! A Model Context Protocol (MCP) server that exposes an Obsidian vault,
//! served by the Local REST API plugin, to AI agents over stdio transport.
//!
//! ## Usage
//!
//! ```bash
//! # Settings come from the environment or a .env file in the working directory
//! OBSIDIAN_API_KEY=... obsidian-mcp
//!
//! # Load settings from a specific env file
//! obsidian-mcp --env-file ~/.config/obsidian-mcp.env
//!
//! # Enable verbose logging
//! obsidian-mcp --verbose
//! ```
//!
//! ## MCP Configuration
//!
//! ```json
//! {
//!   "mcpServers": {
//!     "obsidian": {
//!       "command": "obsidian-mcp",
//!       "env": { "OBSIDIAN_API_KEY": "<key from the plugin settings>" }
//!     }
//!   }
//! }
//! ```
//!
//! ## Environment
//!
//! - **OBSIDIAN_API_KEY** (required): bearer token for the REST API
//! - **OBSIDIAN_HOST** / **OBSIDIAN_PORT** / **OBSIDIAN_PROTOCOL**: defaults
//!   `127.0.0.1`, `27124`, `https`
//! - **OBSIDIAN_VERIFY_SSL**: `true` to verify the plugin's certificate
//! - **OBSIDIAN_TIMEOUT**: request timeout in seconds, default 10
//! - **LOG_LEVEL** / **DEBUG**: stderr log verbosity

use anyhow::{Context, Result};
use clap::Parser;
use obsidian_rest::mcp::McpServer;
use obsidian_rest::Config;
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Obsidian MCP Server - Expose an Obsidian vault to AI agents via Model Context Protocol
#[derive(Parser, Debug)]
#[command(name = "obsidian-mcp")]
#[command(
    author,
    version,
    about = "Obsidian MCP Server - Model Context Protocol interface for an Obsidian vault"
)]
struct Args {
    /// Env file to load instead of ./.env
    #[arg(long, short = 'e', env = "OBSIDIAN_ENV_FILE")]
    env_file: Option<PathBuf>,

    /// Enable verbose logging (outputs to stderr)
    #[arg(long, short = 'v')]
    verbose: bool,
}

fn log_filter(verbose: bool, config: &Config) -> EnvFilter {
    if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_new(config.log_filter()).unwrap_or_else(|_| EnvFilter::new("info"))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = Config::load(args.env_file.as_deref()).context("Invalid configuration")?;

    // Logs go to stderr; stdout carries the protocol
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(log_filter(args.verbose, &config))
        .init();

    tracing::info!(
        "Starting Obsidian MCP server for {}",
        config.connection.base_url()
    );

    let server = McpServer::new(config.connection);
    server.run().await?;

    Ok(())
}
