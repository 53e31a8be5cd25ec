//! Vault path canonicalization
//!
//! Paths are vault-relative, `/`-delimited and case-sensitive. A leading `/`
//! is dropped; directory paths always carry a trailing `/`.

use crate::error::{Error, Result};

/// Path to a note, relative to the vault root
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NotePath(String);

impl NotePath {
    /// Canonicalize a caller-supplied note path
    pub fn parse(raw: &str) -> Result<Self> {
        let path = raw.strip_prefix('/').unwrap_or(raw);
        if path.is_empty() {
            return Err(Error::validation("File path is required"));
        }
        Ok(NotePath(path.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Percent-encoded form for use in a URL
    pub fn encoded(&self) -> String {
        encode_segments(&self.0)
    }
}

impl std::fmt::Display for NotePath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Path to a directory inside the vault, always ending with `/`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DirPath(String);

impl DirPath {
    /// Canonicalize a caller-supplied directory path
    pub fn parse(raw: &str) -> Result<Self> {
        let path = raw.strip_prefix('/').unwrap_or(raw);
        if path.is_empty() {
            return Err(Error::validation("Directory path is required"));
        }
        if path.ends_with('/') {
            Ok(DirPath(path.to_string()))
        } else {
            Ok(DirPath(format!("{}/", path)))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn encoded(&self) -> String {
        encode_segments(&self.0)
    }
}

impl std::fmt::Display for DirPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Percent-encode each `/`-separated segment, keeping the separators.
pub fn encode_segments(value: &str) -> String {
    value
        .split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}
