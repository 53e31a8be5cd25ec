//! Integration tests for MCP server functionality
//!
//! These tests drive the tool surface end to end against an in-memory API.

mod common;

use common::{Failure, FakeVault};
use obsidian_rest::mcp::tools::{get_tool_definitions, handle_tool_call};
use obsidian_rest::mcp::{McpServer, ToolResult};
use obsidian_rest::VaultClient;
use serde_json::{json, Value};

async fn call(client: &VaultClient, tool: &str, args: Value) -> ToolResult {
    handle_tool_call(client, tool, &args).await.unwrap()
}

fn text(result: &ToolResult) -> &str {
    &result.content[0].text
}

#[tokio::test]
async fn test_mcp_tools_list() {
    let tools = get_tool_definitions();
    assert_eq!(tools.len(), 16);

    let names: Vec<&str> = tools.iter().map(|t| t.name.as_str()).collect();
    for expected in [
        "obsidian_read_note",
        "obsidian_create_note",
        "obsidian_append_note",
        "obsidian_patch_note",
        "obsidian_delete_note",
        "obsidian_list_files",
        "obsidian_search",
        "obsidian_get_active_file",
    ] {
        assert!(names.contains(&expected), "missing {}", expected);
    }
}

#[tokio::test]
async fn test_create_then_read_with_metadata() {
    let vault = FakeVault::new();
    let client = vault.client();

    let created = call(
        &client,
        "obsidian_create_note",
        json!({"path": "x.md", "content": "hello", "metadata": {"tags": ["a"]}}),
    )
    .await;
    assert!(!created.is_error, "{}", text(&created));

    let stripped = call(
        &client,
        "obsidian_read_note",
        json!({"path": "x.md", "include_metadata": false}),
    )
    .await;
    assert_eq!(text(&stripped), "hello");

    let full = call(&client, "obsidian_read_note", json!({"path": "x.md"})).await;
    assert!(text(&full).starts_with("---\ntags:"));
    assert!(text(&full).ends_with("hello"));
}

#[tokio::test]
async fn test_validation_failure_makes_no_request() {
    let vault = FakeVault::new();
    let client = vault.client();

    let result = call(&client, "obsidian_read_note", json!({"path": ""})).await;
    assert!(result.is_error);
    assert!(text(&result).starts_with("ValidationFailure:"));

    let result = call(
        &client,
        "obsidian_patch_note",
        json!({"path": "a.md", "operation": "upsert", "target": "H", "content": "c"}),
    )
    .await;
    assert!(result.is_error);

    let result = call(&client, "obsidian_delete_note", json!({"path": "a.md"})).await;
    assert!(text(&result).contains("Confirm must be true"));

    assert!(vault.requests().is_empty());
}

#[tokio::test]
async fn test_delete_requires_confirmation_then_deletes() {
    let vault = FakeVault::with_notes(&[("old.md", "x")]);
    let client = vault.client();

    let result = call(
        &client,
        "obsidian_delete_note",
        json!({"path": "old.md", "confirm": true}),
    )
    .await;
    assert!(!result.is_error);
    assert!(vault.note("old.md").is_none());

    let again = call(
        &client,
        "obsidian_delete_note",
        json!({"path": "old.md", "confirm": true}),
    )
    .await;
    assert!(again.is_error);
    assert_eq!(text(&again), "NotFound: File not found: old.md");
}

#[tokio::test]
async fn test_remote_failure_is_reported_as_content() {
    let vault = FakeVault::new();
    vault.fail_with(Failure::Status(
        500,
        json!({"errorCode": 7, "message": "x"}).to_string(),
    ));

    let result = call(&vault.client(), "obsidian_list_files", json!({})).await;
    assert!(result.is_error);
    assert_eq!(text(&result), "RemoteError: [7] x");
}

#[tokio::test]
async fn test_search_tool_rewrites_filename() {
    let vault = FakeVault::with_notes(&[("inbox/todo.md", "buy milk")]);
    let client = vault.client();

    let result = call(&client, "obsidian_search", json!({"query": "todo.md"})).await;
    let hits: Value = serde_json::from_str(text(&result)).unwrap();
    assert_eq!(hits[0]["filename"], "inbox/todo.md");

    let request = &vault.requests()[0];
    assert!(request
        .query
        .contains(&("query".to_string(), "file:todo.md".to_string())));
}

#[tokio::test]
async fn test_batch_read_reports_each_note() {
    let vault = FakeVault::with_notes(&[("a.md", "first")]);
    let client = vault.client();

    let result = call(
        &client,
        "obsidian_batch_read",
        json!({"paths": ["a.md", "missing.md"]}),
    )
    .await;
    assert!(!result.is_error);
    assert!(text(&result).contains("# a.md\n\nfirst"));
    assert!(text(&result).contains("Error reading file: File not found: missing.md"));
}

#[tokio::test]
async fn test_unknown_tool_is_protocol_error() {
    let vault = FakeVault::new();
    let err = handle_tool_call(&vault.client(), "obsidian_nope", &json!({}))
        .await
        .unwrap_err();
    assert_eq!(err.code, -32602);
}

#[tokio::test]
async fn test_server_session_over_stdio_buffers() {
    let vault = FakeVault::with_notes(&[("hello.md", "# Hello")]);
    let server = McpServer::with_client(vault.client());

    let input = [
        json!({"jsonrpc": "2.0", "id": 1, "method": "initialize", "params": {}}),
        json!({"jsonrpc": "2.0", "method": "notifications/initialized"}),
        json!({"jsonrpc": "2.0", "id": 2, "method": "tools/list"}),
        json!({"jsonrpc": "2.0", "id": 3, "method": "tools/call",
               "params": {"name": "obsidian_read_note", "arguments": {"path": "hello.md"}}}),
    ]
    .iter()
    .map(|v| v.to_string() + "\n")
    .collect::<String>();

    let mut output = Vec::new();
    server.serve(input.as_bytes(), &mut output).await.unwrap();

    let responses: Vec<Value> = String::from_utf8(output)
        .unwrap()
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(responses.len(), 3);
    assert_eq!(responses[1]["result"]["tools"].as_array().unwrap().len(), 16);
    assert_eq!(responses[2]["id"], 3);
    assert_eq!(responses[2]["result"]["content"][0]["text"], "# Hello");
}
