//! Request and result types shared by the client and the tool surface

use crate::error::{Error, Result};
use serde_json::Value;

/// Media type for structured note reads
pub const NOTE_JSON_MEDIA_TYPE: &str = "application/vnd.olrapi.note+json";
/// Content type for JsonLogic searches
pub const JSON_LOGIC_MEDIA_TYPE: &str = "application/vnd.olrapi.jsonlogic+json";
/// Content type for Dataview DQL searches
pub const DQL_MEDIA_TYPE: &str = "application/vnd.olrapi.dataview.dql+txt";

/// Representation requested when reading a note
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NoteFormat {
    /// Raw markdown body (default)
    #[default]
    Markdown,
    /// Structured note with content, front matter, tags and stat
    Json,
}

impl NoteFormat {
    pub const VARIANTS: [&'static str; 2] = ["markdown", "json"];
}

impl std::str::FromStr for NoteFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "markdown" => Ok(NoteFormat::Markdown),
            "json" => Ok(NoteFormat::Json),
            _ => Err(Error::validation(format!(
                "Invalid format: {}. Must be 'markdown' or 'json'.",
                s
            ))),
        }
    }
}

/// A note as returned by a read
#[derive(Debug, Clone, PartialEq)]
pub enum NoteContent {
    Markdown(String),
    Json(Value),
}

impl NoteContent {
    /// Markdown body, if this is a markdown read
    pub fn as_markdown(&self) -> Option<&str> {
        match self {
            NoteContent::Markdown(text) => Some(text),
            NoteContent::Json(_) => None,
        }
    }
}

/// Where patched content goes relative to the target
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PatchOperation {
    #[default]
    Append,
    Prepend,
    Replace,
}

impl PatchOperation {
    pub const VARIANTS: [&'static str; 3] = ["append", "prepend", "replace"];

    pub fn as_str(&self) -> &'static str {
        match self {
            PatchOperation::Append => "append",
            PatchOperation::Prepend => "prepend",
            PatchOperation::Replace => "replace",
        }
    }
}

impl std::str::FromStr for PatchOperation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "append" => Ok(PatchOperation::Append),
            "prepend" => Ok(PatchOperation::Prepend),
            "replace" => Ok(PatchOperation::Replace),
            _ => Err(Error::validation(format!(
                "Invalid operation: {}. Must be 'append', 'prepend', or 'replace'.",
                s
            ))),
        }
    }
}

/// Kind of structure a patch addresses
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TargetType {
    #[default]
    Heading,
    Block,
    Frontmatter,
}

impl TargetType {
    pub const VARIANTS: [&'static str; 3] = ["heading", "block", "frontmatter"];

    pub fn as_str(&self) -> &'static str {
        match self {
            TargetType::Heading => "heading",
            TargetType::Block => "block",
            TargetType::Frontmatter => "frontmatter",
        }
    }
}

impl std::str::FromStr for TargetType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "heading" => Ok(TargetType::Heading),
            "block" => Ok(TargetType::Block),
            "frontmatter" => Ok(TargetType::Frontmatter),
            _ => Err(Error::validation(format!(
                "Invalid target_type: {}. Must be 'heading', 'block', or 'frontmatter'.",
                s
            ))),
        }
    }
}

/// Location inside a note that a patch inserts at or replaces.
///
/// Interpreted entirely by the API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchTarget {
    pub operation: PatchOperation,
    pub target_type: TargetType,
    /// Heading path (`H1::H2`), block reference or front matter field
    pub target: String,
    pub create_if_missing: bool,
}

/// Query for the structured search endpoint
#[derive(Debug, Clone, PartialEq)]
pub enum StructuredQuery {
    /// JsonLogic expression evaluated against each note
    JsonLogic(Value),
    /// Dataview query language string
    Dql(String),
}

impl StructuredQuery {
    pub fn content_type(&self) -> &'static str {
        match self {
            StructuredQuery::JsonLogic(_) => JSON_LOGIC_MEDIA_TYPE,
            StructuredQuery::Dql(_) => DQL_MEDIA_TYPE,
        }
    }
}
