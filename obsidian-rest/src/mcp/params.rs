//! Per-tool parameter structs
//!
//! Arguments arrive as an untyped JSON object. Each struct validates
//! presence, type and allowed values before it is constructed, so a tool
//! never reaches the network with bad input.

use crate::client::DEFAULT_CONTEXT_LENGTH;
use crate::error::{Error, Result};
use crate::model::{NoteFormat, PatchOperation, PatchTarget, StructuredQuery, TargetType};
use crate::path::{DirPath, NotePath};
use serde_json::{Map, Value};
use std::str::FromStr;

/// Parameters parsed from a `tools/call` arguments object
pub trait ToolParams: Sized {
    fn from_args(args: &Value) -> Result<Self>;
}

// Null is treated the same as an absent argument
fn field<'a>(args: &'a Value, name: &str) -> Option<&'a Value> {
    args.get(name).filter(|v| !v.is_null())
}

fn missing(name: &str) -> Error {
    Error::validation(format!("Missing required argument: {}", name))
}

fn wrong_type(name: &str, expected: &str) -> Error {
    Error::validation(format!("Argument '{}' must be {}", name, expected))
}

fn optional_str(args: &Value, name: &str) -> Result<Option<String>> {
    match field(args, name) {
        None => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(wrong_type(name, "a string")),
    }
}

fn required_str(args: &Value, name: &str) -> Result<String> {
    let value = optional_str(args, name)?.ok_or_else(|| missing(name))?;
    if value.is_empty() {
        return Err(Error::validation(format!("Argument '{}' must not be empty", name)));
    }
    Ok(value)
}

fn optional_bool(args: &Value, name: &str, default: bool) -> Result<bool> {
    match field(args, name) {
        None => Ok(default),
        Some(Value::Bool(b)) => Ok(*b),
        Some(_) => Err(wrong_type(name, "a boolean")),
    }
}

fn optional_u64(args: &Value, name: &str, default: u64) -> Result<u64> {
    match field(args, name) {
        None => Ok(default),
        Some(v) => v
            .as_u64()
            .ok_or_else(|| wrong_type(name, "a non-negative integer")),
    }
}

fn enum_arg<T>(args: &Value, name: &str) -> Result<T>
where
    T: FromStr<Err = Error> + Default,
{
    match optional_str(args, name)? {
        Some(value) => value.parse(),
        None => Ok(T::default()),
    }
}

fn note_path(args: &Value, name: &str) -> Result<NotePath> {
    let raw = optional_str(args, name)?.ok_or_else(|| missing(name))?;
    NotePath::parse(&raw)
}

fn require_confirm(args: &Value, action: &str) -> Result<()> {
    if optional_bool(args, "confirm", false)? {
        Ok(())
    } else {
        Err(Error::validation(format!("Confirm must be true to {}", action)))
    }
}

fn patch_target(args: &Value) -> Result<PatchTarget> {
    Ok(PatchTarget {
        operation: enum_arg::<PatchOperation>(args, "operation")?,
        target_type: enum_arg::<TargetType>(args, "target_type")?,
        target: required_str(args, "target")?,
        create_if_missing: optional_bool(args, "create_target_if_missing", true)?,
    })
}

/// `obsidian_read_note`
#[derive(Debug, Clone, PartialEq)]
pub struct ReadNoteParams {
    pub path: NotePath,
    pub format: NoteFormat,
    /// Keep the front matter block in markdown output
    pub include_metadata: bool,
}

impl ToolParams for ReadNoteParams {
    fn from_args(args: &Value) -> Result<Self> {
        Ok(Self {
            path: note_path(args, "path")?,
            format: enum_arg(args, "format")?,
            include_metadata: optional_bool(args, "include_metadata", true)?,
        })
    }
}

/// `obsidian_read_metadata`
#[derive(Debug, Clone, PartialEq)]
pub struct ReadMetadataParams {
    pub path: NotePath,
}

impl ToolParams for ReadMetadataParams {
    fn from_args(args: &Value) -> Result<Self> {
        Ok(Self {
            path: note_path(args, "path")?,
        })
    }
}

/// `obsidian_batch_read`
#[derive(Debug, Clone, PartialEq)]
pub struct BatchReadParams {
    pub paths: Vec<NotePath>,
}

impl ToolParams for BatchReadParams {
    fn from_args(args: &Value) -> Result<Self> {
        let items = match field(args, "paths") {
            None => return Err(missing("paths")),
            Some(Value::Array(items)) => items,
            Some(_) => return Err(wrong_type("paths", "an array of strings")),
        };
        if items.is_empty() {
            return Err(Error::validation("Argument 'paths' must not be empty"));
        }

        let paths = items
            .iter()
            .map(|item| match item {
                Value::String(raw) => NotePath::parse(raw),
                _ => Err(wrong_type("paths", "an array of strings")),
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { paths })
    }
}

/// `obsidian_create_note`
#[derive(Debug, Clone, PartialEq)]
pub struct CreateNoteParams {
    pub path: NotePath,
    pub content: String,
    pub metadata: Option<Map<String, Value>>,
}

impl ToolParams for CreateNoteParams {
    fn from_args(args: &Value) -> Result<Self> {
        let metadata = match field(args, "metadata") {
            None => None,
            Some(Value::Object(map)) => Some(map.clone()),
            Some(_) => return Err(wrong_type("metadata", "an object")),
        };

        Ok(Self {
            path: note_path(args, "path")?,
            content: required_str(args, "content")?,
            metadata,
        })
    }
}

/// `obsidian_append_note`
#[derive(Debug, Clone, PartialEq)]
pub struct AppendNoteParams {
    pub path: NotePath,
    pub content: String,
}

impl ToolParams for AppendNoteParams {
    fn from_args(args: &Value) -> Result<Self> {
        Ok(Self {
            path: note_path(args, "path")?,
            content: required_str(args, "content")?,
        })
    }
}

/// `obsidian_patch_note`
#[derive(Debug, Clone, PartialEq)]
pub struct PatchNoteParams {
    pub path: NotePath,
    pub target: PatchTarget,
    pub content: String,
}

impl ToolParams for PatchNoteParams {
    fn from_args(args: &Value) -> Result<Self> {
        Ok(Self {
            path: note_path(args, "path")?,
            target: patch_target(args)?,
            content: required_str(args, "content")?,
        })
    }
}

/// `obsidian_delete_note`
#[derive(Debug, Clone, PartialEq)]
pub struct DeleteNoteParams {
    pub path: NotePath,
}

impl ToolParams for DeleteNoteParams {
    fn from_args(args: &Value) -> Result<Self> {
        let path = note_path(args, "path")?;
        require_confirm(args, "delete a note")?;
        Ok(Self { path })
    }
}

/// `obsidian_list_files`
#[derive(Debug, Clone, PartialEq)]
pub struct ListFilesParams {
    /// Directory to list; `None` lists the vault root
    pub dir: Option<DirPath>,
}

impl ToolParams for ListFilesParams {
    fn from_args(args: &Value) -> Result<Self> {
        let dir = match optional_str(args, "path")? {
            Some(raw) if !raw.trim_matches('/').is_empty() => Some(DirPath::parse(&raw)?),
            _ => None,
        };
        Ok(Self { dir })
    }
}

/// `obsidian_search`
#[derive(Debug, Clone, PartialEq)]
pub struct SearchParams {
    pub query: String,
    pub context_length: u64,
}

impl ToolParams for SearchParams {
    fn from_args(args: &Value) -> Result<Self> {
        Ok(Self {
            query: required_str(args, "query")?,
            context_length: optional_u64(args, "context_length", DEFAULT_CONTEXT_LENGTH)?,
        })
    }
}

/// `obsidian_structured_search`
#[derive(Debug, Clone, PartialEq)]
pub struct StructuredSearchParams {
    pub query: StructuredQuery,
}

impl ToolParams for StructuredSearchParams {
    fn from_args(args: &Value) -> Result<Self> {
        let query = match field(args, "query") {
            None => return Err(missing("query")),
            Some(Value::Object(_)) => StructuredQuery::JsonLogic(args["query"].clone()),
            Some(Value::String(dql)) if !dql.trim().is_empty() => StructuredQuery::Dql(dql.clone()),
            Some(Value::String(_)) => {
                return Err(Error::validation("Argument 'query' must not be empty"))
            }
            Some(_) => {
                return Err(wrong_type(
                    "query",
                    "a JsonLogic object or a Dataview query string",
                ))
            }
        };
        Ok(Self { query })
    }
}

/// `obsidian_get_active_file`
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveFileParams {
    pub format: NoteFormat,
}

impl ToolParams for ActiveFileParams {
    fn from_args(args: &Value) -> Result<Self> {
        Ok(Self {
            format: enum_arg(args, "format")?,
        })
    }
}

/// `obsidian_update_active_file` and `obsidian_append_active_file`
#[derive(Debug, Clone, PartialEq)]
pub struct ContentParams {
    pub content: String,
}

impl ToolParams for ContentParams {
    fn from_args(args: &Value) -> Result<Self> {
        Ok(Self {
            content: required_str(args, "content")?,
        })
    }
}

/// `obsidian_patch_active_file`
#[derive(Debug, Clone, PartialEq)]
pub struct PatchActiveParams {
    pub target: PatchTarget,
    pub content: String,
}

impl ToolParams for PatchActiveParams {
    fn from_args(args: &Value) -> Result<Self> {
        Ok(Self {
            target: patch_target(args)?,
            content: required_str(args, "content")?,
        })
    }
}

/// `obsidian_delete_active_file`
#[derive(Debug, Clone, PartialEq)]
pub struct DeleteActiveParams;

impl ToolParams for DeleteActiveParams {
    fn from_args(args: &Value) -> Result<Self> {
        require_confirm(args, "delete the active file")?;
        Ok(Self)
    }
}

/// `obsidian_open_note`
#[derive(Debug, Clone, PartialEq)]
pub struct OpenNoteParams {
    pub path: NotePath,
    pub new_leaf: bool,
}

impl ToolParams for OpenNoteParams {
    fn from_args(args: &Value) -> Result<Self> {
        Ok(Self {
            path: note_path(args, "path")?,
            new_leaf: optional_bool(args, "new_leaf", false)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn message(err: Error) -> String {
        assert_eq!(err.kind(), "ValidationFailure");
        err.to_string()
    }

    #[test]
    fn test_read_note_defaults() {
        let params = ReadNoteParams::from_args(&json!({"path": "/a.md"})).unwrap();
        assert_eq!(params.path.as_str(), "a.md");
        assert_eq!(params.format, NoteFormat::Markdown);
        assert!(params.include_metadata);
    }

    #[test]
    fn test_missing_required_field_is_named() {
        let err = ReadNoteParams::from_args(&json!({})).unwrap_err();
        assert_eq!(message(err), "Missing required argument: path");

        let err = AppendNoteParams::from_args(&json!({"path": "a.md"})).unwrap_err();
        assert_eq!(message(err), "Missing required argument: content");
    }

    #[test]
    fn test_wrong_type_is_named() {
        let err = ReadNoteParams::from_args(&json!({"path": 42})).unwrap_err();
        assert_eq!(message(err), "Argument 'path' must be a string");

        let err = SearchParams::from_args(&json!({"query": "x", "context_length": "long"}))
            .unwrap_err();
        assert!(message(err).contains("context_length"));
    }

    #[test]
    fn test_enum_membership() {
        let err = ReadNoteParams::from_args(&json!({"path": "a.md", "format": "html"})).unwrap_err();
        assert!(message(err).contains("Invalid format: html"));

        let err = PatchNoteParams::from_args(&json!({
            "path": "a.md",
            "operation": "insert",
            "target": "H1",
            "content": "x"
        }))
        .unwrap_err();
        assert!(message(err).contains("Invalid operation"));
    }

    #[test]
    fn test_patch_defaults() {
        let params = PatchNoteParams::from_args(&json!({
            "path": "a.md",
            "target": "Tasks",
            "content": "- [ ] new"
        }))
        .unwrap();
        assert_eq!(
            params.target,
            PatchTarget {
                operation: PatchOperation::Append,
                target_type: TargetType::Heading,
                target: "Tasks".to_string(),
                create_if_missing: true,
            }
        );
    }

    #[test]
    fn test_delete_requires_confirm() {
        let err = DeleteNoteParams::from_args(&json!({"path": "a.md"})).unwrap_err();
        assert_eq!(message(err), "Confirm must be true to delete a note");

        let err = DeleteNoteParams::from_args(&json!({"path": "a.md", "confirm": false})).unwrap_err();
        assert_eq!(err.kind(), "ValidationFailure");

        assert!(DeleteNoteParams::from_args(&json!({"path": "a.md", "confirm": true})).is_ok());
        assert!(DeleteActiveParams::from_args(&json!({"confirm": true})).is_ok());
    }

    #[test]
    fn test_empty_content_is_rejected() {
        let err = CreateNoteParams::from_args(&json!({"path": "a.md", "content": ""})).unwrap_err();
        assert_eq!(message(err), "Argument 'content' must not be empty");
    }

    #[test]
    fn test_create_metadata_must_be_object() {
        let err = CreateNoteParams::from_args(&json!({
            "path": "a.md",
            "content": "x",
            "metadata": ["tags"]
        }))
        .unwrap_err();
        assert_eq!(message(err), "Argument 'metadata' must be an object");

        let params = CreateNoteParams::from_args(&json!({
            "path": "a.md",
            "content": "x",
            "metadata": {"tags": ["x"]}
        }))
        .unwrap();
        assert_eq!(params.metadata.unwrap()["tags"], json!(["x"]));
    }

    #[test]
    fn test_list_files_paths() {
        let params = ListFilesParams::from_args(&json!({})).unwrap();
        assert_eq!(params.dir, None);

        let params = ListFilesParams::from_args(&json!({"path": "/"})).unwrap();
        assert_eq!(params.dir, None);

        let params = ListFilesParams::from_args(&json!({"path": "/projects"})).unwrap();
        assert_eq!(params.dir.unwrap().as_str(), "projects/");
    }

    #[test]
    fn test_batch_read_paths() {
        let params = BatchReadParams::from_args(&json!({"paths": ["/a.md", "b.md"]})).unwrap();
        let paths: Vec<&str> = params.paths.iter().map(NotePath::as_str).collect();
        assert_eq!(paths, vec!["a.md", "b.md"]);

        assert!(BatchReadParams::from_args(&json!({"paths": []})).is_err());
        assert!(BatchReadParams::from_args(&json!({"paths": ["a.md", 1]})).is_err());
        assert!(BatchReadParams::from_args(&json!({"paths": "a.md"})).is_err());
    }

    #[test]
    fn test_structured_query_kinds() {
        let params =
            StructuredSearchParams::from_args(&json!({"query": {"in": ["x", {"var": "tags"}]}}))
                .unwrap();
        assert!(matches!(params.query, StructuredQuery::JsonLogic(_)));

        let params = StructuredSearchParams::from_args(&json!({"query": "LIST"})).unwrap();
        assert_eq!(params.query, StructuredQuery::Dql("LIST".to_string()));

        let err = StructuredSearchParams::from_args(&json!({"query": 3})).unwrap_err();
        assert!(message(err).contains("query"));
    }

    #[test]
    fn test_null_is_absent() {
        let params = SearchParams::from_args(&json!({"query": "x", "context_length": null})).unwrap();
        assert_eq!(params.context_length, 100);
    }
}
