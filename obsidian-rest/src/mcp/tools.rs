//! MCP tool handlers for the Obsidian vault
//!
//! Each tool call is one validate-execute-format cycle. Failures of any kind
//! become a single text block flagged with `isError`; only an unknown tool
//! name is reported as a protocol error.

use super::params::{
    ActiveFileParams, AppendNoteParams, BatchReadParams, ContentParams, CreateNoteParams,
    DeleteActiveParams, DeleteNoteParams, ListFilesParams, OpenNoteParams, PatchActiveParams,
    PatchNoteParams, ReadMetadataParams, ReadNoteParams, SearchParams, StructuredSearchParams,
    ToolParams,
};
use super::protocol::{JsonRpcError, ToolDefinition, ToolResult};
use crate::client::VaultClient;
use crate::error::{Error, Result};
use crate::frontmatter;
use crate::model::{NoteContent, NoteFormat, PatchOperation, TargetType};
use serde_json::{json, Value};

/// Get all tool definitions
pub fn get_tool_definitions() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition {
            name: "obsidian_read_note".to_string(),
            description: "Get the content of a note from the Obsidian vault.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "path": {
                        "type": "string",
                        "description": "Path to the note (relative to vault root)"
                    },
                    "format": {
                        "type": "string",
                        "enum": NoteFormat::VARIANTS,
                        "description": "Return raw markdown or the structured note (content, frontmatter, tags, stat)",
                        "default": "markdown"
                    },
                    "include_metadata": {
                        "type": "boolean",
                        "description": "Keep the frontmatter block in markdown output",
                        "default": true
                    }
                },
                "required": ["path"]
            }),
        },
        ToolDefinition {
            name: "obsidian_read_metadata".to_string(),
            description: "Get the parsed frontmatter of a note as JSON.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "path": {
                        "type": "string",
                        "description": "Path to the note (relative to vault root)"
                    }
                },
                "required": ["path"]
            }),
        },
        ToolDefinition {
            name: "obsidian_batch_read".to_string(),
            description: "Read several notes at once. Each note is returned under a heading with its path; notes that cannot be read are reported inline.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "paths": {
                        "type": "array",
                        "items": { "type": "string" },
                        "description": "Paths of the notes to read (relative to vault root)"
                    }
                },
                "required": ["paths"]
            }),
        },
        ToolDefinition {
            name: "obsidian_create_note".to_string(),
            description: "Create a new note or overwrite an existing note in the Obsidian vault.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "path": {
                        "type": "string",
                        "description": "Path to the note (relative to vault root)"
                    },
                    "content": {
                        "type": "string",
                        "description": "Content to write to the note"
                    },
                    "metadata": {
                        "type": "object",
                        "description": "Frontmatter fields to put at the top of the note"
                    }
                },
                "required": ["path", "content"]
            }),
        },
        ToolDefinition {
            name: "obsidian_append_note".to_string(),
            description: "Append content to the end of an existing note, separated by a blank line.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "path": {
                        "type": "string",
                        "description": "Path to the note (relative to vault root)"
                    },
                    "content": {
                        "type": "string",
                        "description": "Content to append"
                    }
                },
                "required": ["path", "content"]
            }),
        },
        ToolDefinition {
            name: "obsidian_patch_note".to_string(),
            description: "Insert or replace content relative to a heading, block reference or frontmatter field in a note.".to_string(),
            input_schema: patch_schema(true),
        },
        ToolDefinition {
            name: "obsidian_delete_note".to_string(),
            description: "Delete a note from the Obsidian vault.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "path": {
                        "type": "string",
                        "description": "Path to the note (relative to vault root)"
                    },
                    "confirm": {
                        "type": "boolean",
                        "description": "Must be true to delete the note",
                        "default": false
                    }
                },
                "required": ["path", "confirm"]
            }),
        },
        ToolDefinition {
            name: "obsidian_list_files".to_string(),
            description: "List files and folders in a vault directory, or in the vault root when no path is given.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "path": {
                        "type": "string",
                        "description": "Directory path (relative to vault root)"
                    }
                },
                "required": []
            }),
        },
        ToolDefinition {
            name: "obsidian_search".to_string(),
            description: "Full-text search across the vault. Returns matching notes with surrounding context. A bare filename such as 'note.md' searches by file name.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "Text to search for"
                    },
                    "context_length": {
                        "type": "integer",
                        "description": "Characters of context around each match (default: 100)",
                        "default": 100
                    }
                },
                "required": ["query"]
            }),
        },
        ToolDefinition {
            name: "obsidian_structured_search".to_string(),
            description: "Search with a JsonLogic expression (object) or a Dataview DQL query (string).".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "query": {
                        "type": ["object", "string"],
                        "description": "JsonLogic expression evaluated per note, or a Dataview TABLE query"
                    }
                },
                "required": ["query"]
            }),
        },
        ToolDefinition {
            name: "obsidian_get_active_file".to_string(),
            description: "Get the note currently open in Obsidian.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "format": {
                        "type": "string",
                        "enum": NoteFormat::VARIANTS,
                        "description": "Return raw markdown or the structured note",
                        "default": "markdown"
                    }
                },
                "required": []
            }),
        },
        ToolDefinition {
            name: "obsidian_update_active_file".to_string(),
            description: "Replace the content of the note currently open in Obsidian.".to_string(),
            input_schema: content_schema("New content of the note"),
        },
        ToolDefinition {
            name: "obsidian_append_active_file".to_string(),
            description: "Append content to the note currently open in Obsidian.".to_string(),
            input_schema: content_schema("Content to append"),
        },
        ToolDefinition {
            name: "obsidian_patch_active_file".to_string(),
            description: "Insert or replace content relative to a heading, block reference or frontmatter field in the note currently open in Obsidian.".to_string(),
            input_schema: patch_schema(false),
        },
        ToolDefinition {
            name: "obsidian_delete_active_file".to_string(),
            description: "Delete the note currently open in Obsidian.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "confirm": {
                        "type": "boolean",
                        "description": "Must be true to delete the note",
                        "default": false
                    }
                },
                "required": ["confirm"]
            }),
        },
        ToolDefinition {
            name: "obsidian_open_note".to_string(),
            description: "Open a note in the Obsidian user interface.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "path": {
                        "type": "string",
                        "description": "Path to the note (relative to vault root)"
                    },
                    "new_leaf": {
                        "type": "boolean",
                        "description": "Open in a new pane",
                        "default": false
                    }
                },
                "required": ["path"]
            }),
        },
    ]
}

fn content_schema(description: &str) -> Value {
    json!({
        "type": "object",
        "properties": {
            "content": {
                "type": "string",
                "description": description
            }
        },
        "required": ["content"]
    })
}

fn patch_schema(with_path: bool) -> Value {
    let mut schema = json!({
        "type": "object",
        "properties": {
            "operation": {
                "type": "string",
                "enum": PatchOperation::VARIANTS,
                "description": "Where to put the content relative to the target",
                "default": "append"
            },
            "target_type": {
                "type": "string",
                "enum": TargetType::VARIANTS,
                "description": "Kind of target",
                "default": "heading"
            },
            "target": {
                "type": "string",
                "description": "Heading path (e.g. 'Heading 1::Subheading'), block reference or frontmatter field"
            },
            "content": {
                "type": "string",
                "description": "Content to insert"
            },
            "create_target_if_missing": {
                "type": "boolean",
                "description": "Create the target if it does not exist",
                "default": true
            }
        },
        "required": ["target", "content"]
    });

    if with_path {
        schema["properties"]["path"] = json!({
            "type": "string",
            "description": "Path to the note (relative to vault root)"
        });
        schema["required"] = json!(["path", "target", "content"]);
    }
    schema
}

/// Handle tool call dispatch
pub async fn handle_tool_call(
    client: &VaultClient,
    tool_name: &str,
    arguments: &Value,
) -> std::result::Result<ToolResult, JsonRpcError> {
    check_tool_name(tool_name)?;

    let outcome = if arguments.is_object() {
        run_tool(client, tool_name, arguments).await
    } else {
        Err(Error::validation("Tool arguments must be an object"))
    };

    Ok(match outcome {
        Ok(result) => result,
        Err(e) => {
            tracing::warn!("Tool {} failed: {}", tool_name, e);
            format_error(&e)
        }
    })
}

/// Reject names that are not in the tool list with `-32602`
pub fn check_tool_name(tool_name: &str) -> std::result::Result<(), JsonRpcError> {
    if get_tool_definitions().iter().any(|t| t.name == tool_name) {
        Ok(())
    } else {
        Err(JsonRpcError::invalid_params(format!(
            "Unknown tool: {}",
            tool_name
        )))
    }
}

/// Render a failure as a single error content block
pub fn format_error(error: &Error) -> ToolResult {
    ToolResult::error(format!("{}: {}", error.kind(), error))
}

async fn run_tool(client: &VaultClient, tool_name: &str, args: &Value) -> Result<ToolResult> {
    match tool_name {
        "obsidian_read_note" => tool_read_note(client, ReadNoteParams::from_args(args)?).await,
        "obsidian_read_metadata" => {
            let params = ReadMetadataParams::from_args(args)?;
            let metadata = client.get_metadata(&params.path).await?;
            json_result(&Value::Object(metadata))
        }
        "obsidian_batch_read" => {
            let params = BatchReadParams::from_args(args)?;
            Ok(ToolResult::text(client.batch_get(&params.paths).await))
        }
        "obsidian_create_note" => {
            let params = CreateNoteParams::from_args(args)?;
            client
                .put_note(&params.path, &params.content, params.metadata.as_ref())
                .await?;
            Ok(ToolResult::text(format!(
                "Successfully created/updated note at {}",
                params.path
            )))
        }
        "obsidian_append_note" => {
            let params = AppendNoteParams::from_args(args)?;
            client.append_note(&params.path, &params.content).await?;
            Ok(ToolResult::text(format!(
                "Successfully appended content to note at {}",
                params.path
            )))
        }
        "obsidian_patch_note" => {
            let params = PatchNoteParams::from_args(args)?;
            client
                .patch_note(&params.path, &params.target, &params.content)
                .await?;
            Ok(ToolResult::text(format!(
                "Successfully patched content in note at {}",
                params.path
            )))
        }
        "obsidian_delete_note" => {
            let params = DeleteNoteParams::from_args(args)?;
            let deleted = client.delete_note(&params.path).await?;
            json_result(&json!({ "path": params.path.as_str(), "deleted": deleted }))
        }
        "obsidian_list_files" => {
            let params = ListFilesParams::from_args(args)?;
            let files = match &params.dir {
                Some(dir) => client.list_directory(dir).await?,
                None => client.list_vault().await?,
            };
            json_result(&Value::Array(files))
        }
        "obsidian_search" => {
            let params = SearchParams::from_args(args)?;
            let results = client.search(&params.query, params.context_length).await?;
            json_result(&Value::Array(results))
        }
        "obsidian_structured_search" => {
            let params = StructuredSearchParams::from_args(args)?;
            let results = client.search_structured(&params.query).await?;
            json_result(&results)
        }
        "obsidian_get_active_file" => {
            let params = ActiveFileParams::from_args(args)?;
            note_result(client.get_active_file(params.format).await?)
        }
        "obsidian_update_active_file" => {
            let params = ContentParams::from_args(args)?;
            client.update_active_file(&params.content).await?;
            Ok(ToolResult::text("Successfully updated the active file"))
        }
        "obsidian_append_active_file" => {
            let params = ContentParams::from_args(args)?;
            client.append_active_file(&params.content).await?;
            Ok(ToolResult::text("Successfully appended content to the active file"))
        }
        "obsidian_patch_active_file" => {
            let params = PatchActiveParams::from_args(args)?;
            client
                .patch_active_file(&params.target, &params.content)
                .await?;
            Ok(ToolResult::text("Successfully patched content in the active file"))
        }
        "obsidian_delete_active_file" => {
            DeleteActiveParams::from_args(args)?;
            let deleted = client.delete_active_file().await?;
            json_result(&json!({ "deleted": deleted }))
        }
        "obsidian_open_note" => {
            let params = OpenNoteParams::from_args(args)?;
            client.open_note(&params.path, params.new_leaf).await?;
            Ok(ToolResult::text(format!("Opened {} in Obsidian", params.path)))
        }
        other => Err(Error::Unexpected(format!("No handler for tool {}", other))),
    }
}

async fn tool_read_note(client: &VaultClient, params: ReadNoteParams) -> Result<ToolResult> {
    match client.get_note(&params.path, params.format).await? {
        NoteContent::Markdown(text) if !params.include_metadata => {
            Ok(ToolResult::text(frontmatter::strip(&text)))
        }
        note => note_result(note),
    }
}

fn note_result(note: NoteContent) -> Result<ToolResult> {
    match note {
        NoteContent::Markdown(text) => Ok(ToolResult::text(text)),
        NoteContent::Json(value) => json_result(&value),
    }
}

fn json_result(value: &Value) -> Result<ToolResult> {
    Ok(ToolResult::text(serde_json::to_string_pretty(value)?))
}
