//! Reply normalization: strip formatting artifacts, parse strictly.
//!
//! Models occasionally wrap their JSON reply in markdown code fences even
//! when told not to. The normalizer trims a leading ``` marker (with an
//! optional language tag) and a trailing ``` marker, then requires the
//! remainder to parse fully as JSON - no lenient recovery. Failures carry
//! the offending raw text for diagnostics.

use std::sync::LazyLock;

use regex::Regex;
use serde::de::DeserializeOwned;

static OPEN_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^```[A-Za-z]*\s*").expect("open fence regex"));
static CLOSE_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*```$").expect("close fence regex"));

/// A reply that failed to parse against the declared shape.
#[derive(Debug, thiserror::Error)]
#[error("{reason}")]
pub struct NormalizeError {
    pub reason: String,
    /// The unmodified provider output, for diagnostics.
    pub raw: String,
}

/// Remove surrounding code-fence markup, if any.
pub fn strip_fences(raw: &str) -> String {
    let trimmed = raw.trim();
    let without_open = OPEN_FENCE.replace(trimmed, "");
    let without_close = CLOSE_FENCE.replace(&without_open, "");
    without_close.trim().to_string()
}

/// Normalize raw provider output into a typed reply.
pub fn normalize<T: DeserializeOwned>(raw: &str) -> Result<T, NormalizeError> {
    let stripped = strip_fences(raw);
    serde_json::from_str(&stripped).map_err(|e| NormalizeError {
        reason: e.to_string(),
        raw: raw.to_string(),
    })
}
