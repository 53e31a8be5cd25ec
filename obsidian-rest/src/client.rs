//! Vault operations on top of the Local REST API
//!
//! Each method performs one logical operation, usually one HTTP round trip.
//! Appends and batch reads issue several requests in sequence; nothing is
//! retried.

use crate::config::ConnectionProfile;
use crate::error::{normalize_response, Error, Result};
use crate::frontmatter;
use crate::model::{NoteContent, NoteFormat, PatchTarget, StructuredQuery, NOTE_JSON_MEDIA_TYPE};
use crate::path::{encode_segments, DirPath, NotePath};
use crate::query::normalize_query;
use crate::transport::{ApiRequest, ApiResponse, HttpTransport, Transport};
use serde_json::{Map, Value};
use std::sync::Arc;

const ACTIVE_FILE: &str = "/active/";
const ACTIVE_FILE_RESOURCE: &str = "active file";

/// Default number of characters of context around simple search matches
pub const DEFAULT_CONTEXT_LENGTH: u64 = 100;

/// Client for an Obsidian vault exposed by the Local REST API plugin
#[derive(Clone)]
pub struct VaultClient {
    transport: Arc<dyn Transport>,
}

impl VaultClient {
    /// Create a client over any transport
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Create a client talking HTTP(S) to the configured API
    pub fn from_profile(profile: &ConnectionProfile) -> Result<Self> {
        let transport =
            HttpTransport::new(profile).map_err(|e| Error::Unexpected(e.to_string()))?;
        Ok(Self::new(Arc::new(transport)))
    }

    pub fn base_url(&self) -> &str {
        self.transport.base_url()
    }

    async fn call(&self, request: ApiRequest, resource: &str) -> Result<ApiResponse> {
        let outcome = self.transport.send(request).await;
        normalize_response(outcome, self.transport.base_url(), resource)
    }

    // File operations

    /// Read a note, optionally negotiating the structured representation
    pub async fn get_note(&self, path: &NotePath, format: NoteFormat) -> Result<NoteContent> {
        let request = read_request(format!("/vault/{}", path.encoded()), format);
        let response = self.call(request, path.as_str()).await?;
        decode_note(response, format)
    }

    /// Create or overwrite a note, prefixing a front matter block built from
    /// `metadata` when given
    pub async fn put_note(
        &self,
        path: &NotePath,
        content: &str,
        metadata: Option<&Map<String, Value>>,
    ) -> Result<()> {
        let body = match metadata {
            Some(metadata) => frontmatter::with_metadata(content, metadata)
                .map_err(|e| Error::validation(format!("Invalid metadata: {}", e)))?,
            None => content.to_string(),
        };

        tracing::debug!("Writing {} bytes to {}", body.len(), path);
        let request = ApiRequest::put(format!("/vault/{}", path.encoded())).body(body);
        self.call(request, path.as_str()).await?;
        Ok(())
    }

    /// Append to an existing note.
    ///
    /// Reads the current body and writes back `body + "\n\n" + content`.
    /// The two requests are not atomic: a concurrent writer between them
    /// loses its update.
    pub async fn append_note(&self, path: &NotePath, content: &str) -> Result<()> {
        let current = self.get_note(path, NoteFormat::Markdown).await?;
        let current = current.as_markdown().unwrap_or_default();

        let updated = format!("{}\n\n{}", current, content);
        let request = ApiRequest::put(format!("/vault/{}", path.encoded())).body(updated);
        self.call(request, path.as_str()).await?;
        Ok(())
    }

    /// Insert or replace content relative to a heading, block or front
    /// matter field
    pub async fn patch_note(
        &self,
        path: &NotePath,
        target: &PatchTarget,
        content: &str,
    ) -> Result<()> {
        let request = patch_request(format!("/vault/{}", path.encoded()), target, content);
        self.call(request, path.as_str()).await?;
        Ok(())
    }

    pub async fn delete_note(&self, path: &NotePath) -> Result<bool> {
        let request = ApiRequest::delete(format!("/vault/{}", path.encoded()));
        self.call(request, path.as_str()).await?;
        Ok(true)
    }

    /// Parsed front matter of a note; empty when it has none
    pub async fn get_metadata(&self, path: &NotePath) -> Result<Map<String, Value>> {
        let note = self.get_note(path, NoteFormat::Markdown).await?;
        Ok(note
            .as_markdown()
            .map(frontmatter::parse)
            .unwrap_or_default())
    }

    /// Read several notes into one markdown document.
    ///
    /// Failures are reported inline for the affected note and do not stop
    /// the batch.
    pub async fn batch_get(&self, paths: &[NotePath]) -> String {
        let mut output = String::new();
        for path in paths {
            match self.get_note(path, NoteFormat::Markdown).await {
                Ok(note) => {
                    let text = note.as_markdown().unwrap_or_default();
                    output.push_str(&format!("# {}\n\n{}\n\n---\n\n", path, text));
                }
                Err(e) => {
                    tracing::warn!("Batch read of {} failed: {}", path, e);
                    output.push_str(&format!(
                        "# {}\n\nError reading file: {}\n\n---\n\n",
                        path, e
                    ));
                }
            }
        }
        output
    }

    // Folder operations

    /// List the vault root
    pub async fn list_vault(&self) -> Result<Vec<Value>> {
        let response = self.call(ApiRequest::get("/vault/"), "/").await?;
        listing(&response)
    }

    pub async fn list_directory(&self, dir: &DirPath) -> Result<Vec<Value>> {
        let request = ApiRequest::get(format!("/vault/{}", dir.encoded()));
        let response = self.call(request, dir.as_str()).await?;
        listing(&response)
    }

    // Search operations

    /// Plain text search; bare filenames become filename searches
    pub async fn search(&self, query: &str, context_length: u64) -> Result<Vec<Value>> {
        let query = normalize_query(query);
        tracing::debug!("Simple search: {}", query);

        let request = ApiRequest::post("/search/simple/")
            .query("query", query)
            .query("contextLength", context_length.to_string());
        let response = self.call(request, "/search/simple/").await?;
        Ok(serde_json::from_str(&response.body)?)
    }

    /// JsonLogic or Dataview DQL search; results are returned as-is
    pub async fn search_structured(&self, query: &StructuredQuery) -> Result<Value> {
        let body = match query {
            StructuredQuery::JsonLogic(logic) => serde_json::to_string(logic)?,
            StructuredQuery::Dql(dql) => dql.clone(),
        };
        let request = ApiRequest::post("/search/")
            .content_type(query.content_type())
            .body(body);
        let response = self.call(request, "/search/").await?;
        Ok(serde_json::from_str(&response.body)?)
    }

    // Active file operations

    /// Note currently open in Obsidian; fails when nothing is open
    pub async fn get_active_file(&self, format: NoteFormat) -> Result<NoteContent> {
        let request = read_request(ACTIVE_FILE.to_string(), format);
        let response = self.call(request, ACTIVE_FILE_RESOURCE).await?;
        decode_note(response, format)
    }

    pub async fn update_active_file(&self, content: &str) -> Result<()> {
        let request = ApiRequest::put(ACTIVE_FILE).body(content);
        self.call(request, ACTIVE_FILE_RESOURCE).await?;
        Ok(())
    }

    /// Append to the active file; the API does the concatenation
    pub async fn append_active_file(&self, content: &str) -> Result<()> {
        let request = ApiRequest::post(ACTIVE_FILE).body(content);
        self.call(request, ACTIVE_FILE_RESOURCE).await?;
        Ok(())
    }

    pub async fn patch_active_file(&self, target: &PatchTarget, content: &str) -> Result<()> {
        let request = patch_request(ACTIVE_FILE.to_string(), target, content);
        self.call(request, ACTIVE_FILE_RESOURCE).await?;
        Ok(())
    }

    pub async fn delete_active_file(&self) -> Result<bool> {
        self.call(ApiRequest::delete(ACTIVE_FILE), ACTIVE_FILE_RESOURCE)
            .await?;
        Ok(true)
    }

    /// Show a note in the Obsidian UI
    pub async fn open_note(&self, path: &NotePath, new_leaf: bool) -> Result<()> {
        let mut request = ApiRequest::post(format!("/open/{}", path.encoded()));
        if new_leaf {
            request = request.query("newLeaf", "true");
        }
        self.call(request, path.as_str()).await?;
        Ok(())
    }
}

fn read_request(path: String, format: NoteFormat) -> ApiRequest {
    let request = ApiRequest::get(path);
    match format {
        NoteFormat::Markdown => request,
        NoteFormat::Json => request.accept(NOTE_JSON_MEDIA_TYPE),
    }
}

fn decode_note(response: ApiResponse, format: NoteFormat) -> Result<NoteContent> {
    match format {
        NoteFormat::Markdown => Ok(NoteContent::Markdown(response.body)),
        NoteFormat::Json => Ok(NoteContent::Json(serde_json::from_str(&response.body)?)),
    }
}

fn patch_request(path: String, target: &PatchTarget, content: &str) -> ApiRequest {
    ApiRequest::patch(path)
        .header("Operation", target.operation.as_str())
        .header("Target-Type", target.target_type.as_str())
        .header("Target", encode_segments(&target.target))
        .header(
            "Create-Target-If-Missing",
            target.create_if_missing.to_string(),
        )
        .body(content)
}

fn listing(response: &ApiResponse) -> Result<Vec<Value>> {
    let mut value: Value = serde_json::from_str(&response.body)?;
    match value.get_mut("files").map(Value::take) {
        Some(Value::Array(files)) => Ok(files),
        _ => Err(Error::Unexpected(
            "directory listing has no files array".to_string(),
        )),
    }
}
