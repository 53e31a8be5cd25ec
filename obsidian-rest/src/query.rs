//! Search query normalization

use regex::Regex;
use std::sync::LazyLock;

/// Operator prefix used for filename searches
pub const FILE_OPERATOR: &str = "file:";

// A single token ending in a note suffix
static BARE_FILENAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^[^\s:]+\.md$").expect("valid regex"));

/// Rewrite a bare note filename (`note.md`) into a filename search
/// (`file:note.md`). Queries containing whitespace or an operator are
/// returned unchanged.
pub fn normalize_query(query: &str) -> String {
    if BARE_FILENAME_RE.is_match(query) {
        format!("{}{}", FILE_OPERATOR, query)
    } else {
        query.to_string()
    }
}
