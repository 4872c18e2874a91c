// ── Form-field coercion ──
//
// Edits are forwarded to the backend unchanged apart from two light
// conversions: numeric text to integers, and comma-joined text to lists.

use crate::error::CoreError;

/// Parse an optional numeric field. Blank input means "not set".
pub fn integer(field: &str, raw: &str) -> Result<Option<u32>, CoreError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed
        .parse::<u32>()
        .map(Some)
        .map_err(|_| CoreError::ValidationFailed {
            message: format!("{field} must be a whole number, got {trimmed:?}"),
        })
}

/// Split `"a, b,,a"` into `["a", "b"]`: trimmed, empties dropped,
/// duplicates removed keeping first occurrence.
pub fn list(raw: &str) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for item in raw.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        if !out.iter().any(|seen| seen == item) {
            out.push(item.to_owned());
        }
    }
    out
}

/// Normalize a list gathered from repeated flags and/or comma strings.
pub fn merge_lists<I, S>(values: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let joined = values
        .into_iter()
        .map(|s| s.as_ref().to_owned())
        .collect::<Vec<_>>()
        .join(",");
    list(&joined)
}
