//! # obsidian-rest
//!
//! Client and MCP tool surface for an Obsidian vault served by the
//! [Local REST API](https://github.com/coddingtonbear/obsidian-local-rest-api)
//! plugin.
//!
//! The crate provides:
//! - **Transport**: a `reqwest` client attaching the bearer token, timeout
//!   and TLS settings, behind a [`Transport`] trait
//! - **Error normalization**: HTTP and network outcomes folded into a closed
//!   set of [`Error`] kinds
//! - **Vault operations**: [`VaultClient`], one method per capability
//! - **MCP server**: JSON-RPC over stdio exposing the operations as tools
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use obsidian_rest::{Config, NoteFormat, NotePath, VaultClient};
//!
//! let config = Config::load(None)?;
//! let client = VaultClient::from_profile(&config.connection)?;
//!
//! let path = NotePath::parse("Daily Notes/2024-01-01.md")?;
//! let note = client.get_note(&path, NoteFormat::Markdown).await?;
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod frontmatter;
pub mod mcp;
pub mod model;
pub mod path;
pub mod query;
pub mod transport;

// Re-exports for convenience
pub use client::VaultClient;
pub use config::{Config, ConfigError, ConnectionProfile};
pub use error::{Error, Result};
pub use model::{NoteContent, NoteFormat, PatchOperation, PatchTarget, StructuredQuery, TargetType};
pub use path::{DirPath, NotePath};
pub use transport::{ApiRequest, ApiResponse, HttpTransport, Method, Transport, TransportError};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
