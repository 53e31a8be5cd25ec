//! MCP server implementation
//!
//! Implements the stdio transport for the Model Context Protocol:
//! line-delimited JSON-RPC requests in, one response line per request out.

use super::protocol::{
    JsonRpcError, JsonRpcRequest, JsonRpcResponse, ServerCapabilities, ServerInfo,
    JSONRPC_VERSION, MCP_PROTOCOL_VERSION,
};
use super::tools::{check_tool_name, format_error, get_tool_definitions, handle_tool_call};
use crate::client::VaultClient;
use crate::config::ConnectionProfile;
use crate::error::Error;
use serde_json::{json, Value};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::OnceCell;

/// MCP server for an Obsidian vault
///
/// The vault client is built on the first tool call and shared by every
/// call after that.
pub struct McpServer {
    profile: Option<ConnectionProfile>,
    client: OnceCell<VaultClient>,
}

impl McpServer {
    /// Create a server that connects using `profile` when first needed
    pub fn new(profile: ConnectionProfile) -> Self {
        Self {
            profile: Some(profile),
            client: OnceCell::new(),
        }
    }

    /// Create a server around an existing client
    pub fn with_client(client: VaultClient) -> Self {
        Self {
            profile: None,
            client: OnceCell::from(client),
        }
    }

    async fn client(&self) -> Result<&VaultClient, Error> {
        self.client
            .get_or_try_init(|| async {
                let profile = self
                    .profile
                    .as_ref()
                    .ok_or_else(|| Error::Unexpected("no connection profile".to_string()))?;
                tracing::info!("Connecting to Obsidian at {}", profile.base_url());
                VaultClient::from_profile(profile)
            })
            .await
    }

    /// Run the MCP server on stdio until EOF
    pub async fn run(&self) -> std::io::Result<()> {
        self.serve(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
            .await
    }

    /// Serve requests from `reader`, writing responses to `writer`
    pub async fn serve<R, W>(&self, mut reader: R, mut writer: W) -> std::io::Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut buf = Vec::new();

        tracing::info!(
            "Obsidian MCP server started (protocol version {})",
            MCP_PROTOCOL_VERSION
        );

        loop {
            buf.clear();
            match reader.read_until(b'\n', &mut buf).await {
                Ok(0) => {
                    tracing::info!("EOF received, shutting down");
                    break;
                }
                Ok(_) => {}
                Err(e) => {
                    tracing::error!("Read error: {}", e);
                    break;
                }
            }

            let response = match std::str::from_utf8(&buf) {
                Ok(line) => {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }
                    tracing::debug!("Received: {}", line);
                    self.handle_line(line).await
                }
                Err(e) => {
                    tracing::warn!("Discarding line that is not UTF-8: {}", e);
                    Some(JsonRpcResponse::error(
                        None,
                        JsonRpcError::parse_error(format!("Parse error: {}", e)),
                    ))
                }
            };

            if let Some(response) = response {
                let response_json = serde_json::to_string(&response)?;
                writer.write_all(response_json.as_bytes()).await?;
                writer.write_all(b"\n").await?;
                writer.flush().await?;
                tracing::debug!("Sent: {}", response_json);
            }
        }

        Ok(())
    }

    async fn handle_line(&self, line: &str) -> Option<JsonRpcResponse> {
        match serde_json::from_str::<JsonRpcRequest>(line) {
            Ok(request) => self.handle_request(request).await,
            Err(e) => Some(JsonRpcResponse::error(
                None,
                JsonRpcError::parse_error(format!("Parse error: {}", e)),
            )),
        }
    }

    /// Handle a single JSON-RPC request; notifications yield no response
    async fn handle_request(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        if request.is_notification() {
            tracing::debug!("Notification: {}", request.method);
            return None;
        }

        if request.jsonrpc != JSONRPC_VERSION {
            return Some(JsonRpcResponse::error(
                request.id,
                JsonRpcError::invalid_request(format!(
                    "Unsupported jsonrpc version: {}",
                    request.jsonrpc
                )),
            ));
        }

        let result = match request.method.as_str() {
            "initialize" => self.handle_initialize(&request.params),
            "tools/list" => self.handle_tools_list(),
            "tools/call" => self.handle_tools_call(&request.params).await,
            "ping" => Ok(json!({})),
            _ => Err(JsonRpcError::method_not_found(&request.method)),
        };

        Some(match result {
            Ok(value) => JsonRpcResponse::success(request.id, value),
            Err(error) => JsonRpcResponse::error(request.id, error),
        })
    }

    /// Handle initialize request
    fn handle_initialize(&self, _params: &Option<Value>) -> Result<Value, JsonRpcError> {
        Ok(json!({
            "protocolVersion": MCP_PROTOCOL_VERSION,
            "capabilities": ServerCapabilities::default(),
            "serverInfo": ServerInfo::default()
        }))
    }

    /// Handle tools/list request
    fn handle_tools_list(&self) -> Result<Value, JsonRpcError> {
        Ok(json!({ "tools": get_tool_definitions() }))
    }

    /// Handle tools/call request
    async fn handle_tools_call(&self, params: &Option<Value>) -> Result<Value, JsonRpcError> {
        let params = params
            .as_ref()
            .ok_or_else(|| JsonRpcError::invalid_params("Missing params"))?;

        let tool_name = params
            .get("name")
            .and_then(|v| v.as_str())
            .ok_or_else(|| JsonRpcError::invalid_params("Missing tool name"))?;

        let arguments = params.get("arguments").cloned().unwrap_or(json!({}));

        tracing::debug!("Calling tool {} with {}", tool_name, arguments);
        check_tool_name(tool_name)?;

        let result = match self.client().await {
            Ok(client) => handle_tool_call(client, tool_name, &arguments).await?,
            Err(e) => {
                tracing::error!("Failed to create vault client: {}", e);
                format_error(&e)
            }
        };

        serde_json::to_value(result).map_err(|e| JsonRpcError::internal_error(e.to_string()))
    }
}
