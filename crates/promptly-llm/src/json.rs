//! Locating and decoding JSON payloads inside free-form model replies.
//!
//! Models often wrap the requested JSON in prose or a Markdown code fence.
//! Decoding first tries the whole reply (minus a wrapping fence), then falls
//! back to the outermost `{...}` or `[...]` span. Either way it runs against
//! an explicit payload type.

use serde::de::DeserializeOwned;

use crate::error::LlmError;

/// Remove a Markdown code fence that wraps the whole reply, with or without a
/// language tag. Fences inside the text are left alone.
#[must_use]
pub fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    if trimmed.len() < 6 || !trimmed.starts_with("```") || !trimmed.ends_with("```") {
        return trimmed;
    }
    let inner = &trimmed[3..trimmed.len() - 3];
    // Skip the info string (e.g. `json`) up to the end of the fence line.
    inner.find('\n').map_or(inner, |i| &inner[i + 1..]).trim()
}

fn span(text: &str, open: char, close: char) -> Option<&str> {
    let start = text.find(open)?;
    let end = text.rfind(close)?;
    (end > start).then(|| &text[start..=end])
}

/// The outermost JSON object in `text`.
#[must_use]
pub fn extract_object(text: &str) -> Option<&str> {
    span(strip_code_fence(text), '{', '}')
}

/// The outermost JSON array in `text`.
#[must_use]
pub fn extract_array(text: &str) -> Option<&str> {
    span(strip_code_fence(text), '[', ']')
}

fn decode<T: DeserializeOwned>(reply: &str, open: char, close: char, kind: &str) -> Result<T, LlmError> {
    let body = strip_code_fence(reply);
    if let Ok(value) = serde_json::from_str(body) {
        return Ok(value);
    }
    let json = span(body, open, close)
        .ok_or_else(|| LlmError::malformed(format!("no JSON {kind} in reply")))?;
    serde_json::from_str(json).map_err(|e| LlmError::malformed(e.to_string()))
}

/// Decode the JSON object embedded in a reply.
///
/// # Errors
///
/// Returns [`LlmError::MalformedResponse`] when no object is present or it
/// does not match `T`.
pub fn decode_object<T: DeserializeOwned>(reply: &str) -> Result<T, LlmError> {
    decode(reply, '{', '}', "object")
}

/// Decode the JSON array embedded in a reply.
///
/// # Errors
///
/// Returns [`LlmError::MalformedResponse`] when no array is present or it
/// does not match `T`.
pub fn decode_array<T: DeserializeOwned>(reply: &str) -> Result<T, LlmError> {
    decode(reply, '[', ']', "array")
}

/// Trim a rewritten prompt and drop one layer of wrapping quotes.
#[must_use]
pub fn clean_rewrite(reply: &str) -> String {
    let text = strip_code_fence(reply);
    for (open, close) in [('"', '"'), ('\'', '\''), ('“', '”')] {
        if let Some(inner) = text.strip_prefix(open).and_then(|t| t.strip_suffix(close)) {
            return inner.trim().to_string();
        }
    }
    text.to_string()
}
