//! MCP (Model Context Protocol) server for an Obsidian vault
//!
//! This module implements an MCP server using stdio transport, exposing
//! the [`VaultClient`](crate::VaultClient) operations to AI agents.
//!
//! ## Tools Exposed
//!
//! - `obsidian_read_note` / `obsidian_read_metadata` / `obsidian_batch_read`
//! - `obsidian_create_note` / `obsidian_append_note` / `obsidian_patch_note`
//! - `obsidian_delete_note` - Requires `confirm: true`
//! - `obsidian_list_files` - Vault root or a directory
//! - `obsidian_search` / `obsidian_structured_search`
//! - `obsidian_*_active_file` - The note focused in the Obsidian UI
//! - `obsidian_open_note` - Open a note in the UI
//!
//! ## Usage
//!
//! ```rust,ignore
//! use obsidian_rest::{mcp::McpServer, Config};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = Config::load(None).unwrap();
//!     McpServer::new(config.connection).run().await.unwrap();
//! }
//! ```

mod params;
mod protocol;
mod server;
pub mod tools;

pub use protocol::{JsonRpcError, JsonRpcRequest, JsonRpcResponse, ToolDefinition, ToolResult};
pub use server::McpServer;
