//! Shared HTTP response helpers for the chat-completion client.
//!
//! Centralizes status-code checks (429 rate limiting with `Retry-After`
//! parsing, non-success → [`LlmError::Api`]) so the client stays focused on
//! request construction and reply mapping.

use serde::Deserialize;

use crate::error::LlmError;

const DEFAULT_RETRY_AFTER_SECS: u64 = 60;

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

/// Check an HTTP response for common error conditions.
///
/// Returns the response unchanged on success. Handles:
/// - **429 Too Many Requests** → [`LlmError::RateLimited`] with
///   `Retry-After` header parsing (falls back to 60 s if absent or
///   unparseable).
/// - **Non-success status** → [`LlmError::Api`] with the provider's
///   `error.message`, or the raw body when it has none.
pub async fn check_response(resp: reqwest::Response) -> Result<reqwest::Response, LlmError> {
    if resp.status() == 429 {
        return Err(LlmError::RateLimited {
            retry_after_secs: parse_retry_after(&resp),
        });
    }
    if !resp.status().is_success() {
        let status = resp.status().as_u16();
        let body = resp.text().await.unwrap_or_default();
        return Err(LlmError::Api {
            status,
            message: provider_message(&body),
        });
    }
    Ok(resp)
}

/// Parse the `Retry-After` header as seconds, falling back to 60 s.
fn parse_retry_after(resp: &reqwest::Response) -> u64 {
    resp.headers()
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(DEFAULT_RETRY_AFTER_SECS)
}

fn provider_message(body: &str) -> String {
    serde_json::from_str::<ErrorEnvelope>(body)
        .map_or_else(|_| body.trim().to_string(), |envelope| envelope.error.message)
}
