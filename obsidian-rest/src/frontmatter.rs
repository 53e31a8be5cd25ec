//! Front matter handling
//!
//! A front matter block starts with a `---` line at the very beginning of a
//! note and ends at the next line that is exactly `---`. Everything here is
//! best-effort: malformed blocks are left alone rather than rejected.

use serde_json::{Map, Value};

/// Block marker line
pub const MARKER: &str = "---";

/// Serialize `metadata` as YAML `key: value` lines wrapped in markers and
/// put it in front of `content`.
pub fn with_metadata(content: &str, metadata: &Map<String, Value>) -> Result<String, serde_yaml::Error> {
    if metadata.is_empty() {
        return Ok(content.to_string());
    }
    let yaml = serde_yaml::to_string(metadata)?;
    Ok(format!("{MARKER}\n{yaml}{MARKER}\n\n{content}"))
}

/// Split a note into its raw front matter (without markers) and body.
///
/// Returns `None` when the note does not open with a marker line or the
/// block is never closed.
pub fn split(content: &str) -> Option<(&str, &str)> {
    let rest = content
        .strip_prefix("---\r\n")
        .or_else(|| content.strip_prefix("---\n"))?;

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end_matches(['\r', '\n']) == MARKER {
            let block = &rest[..offset];
            let body = &rest[offset + line.len()..];
            return Some((block, body.trim_start_matches(['\r', '\n'])));
        }
        offset += line.len();
    }
    None
}

/// Drop the front matter block, leaving unclosed blocks untouched
pub fn strip(content: &str) -> &str {
    split(content).map(|(_, body)| body).unwrap_or(content)
}

/// Parse the front matter into a JSON object; empty when absent or invalid
pub fn parse(content: &str) -> Map<String, Value> {
    let Some((block, _)) = split(content) else {
        return Map::new();
    };

    match serde_yaml::from_str::<Value>(block) {
        Ok(Value::Object(map)) => map,
        Ok(_) => Map::new(),
        Err(e) => {
            tracing::debug!("Ignoring unparseable front matter: {}", e);
            Map::new()
        }
    }
}
