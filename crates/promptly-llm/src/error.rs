//! Chat-completion error types.

use thiserror::Error;

/// Errors from chat-completion calls and from decoding model replies.
#[derive(Debug, Error)]
pub enum LlmError {
    /// HTTP transport error, including timeouts.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The provider returned a non-success status code.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code returned by the provider.
        status: u16,
        /// Provider error message, or the raw response body.
        message: String,
    },

    /// The provider returned a 429 Too Many Requests response.
    #[error("rate limited, retry after {retry_after_secs}s")]
    RateLimited {
        /// Seconds the provider asked us to wait.
        retry_after_secs: u64,
    },

    /// The reply did not have the expected structure.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// The optimize call failed. Wraps the underlying cause.
    #[error("optimization failed: {0}")]
    OptimizationFailed(#[source] Box<LlmError>),
}

impl LlmError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedResponse(reason.into())
    }

    /// Whether the error came from the transport or the provider rather than
    /// from decoding a reply.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Http(_) | Self::Api { .. } | Self::RateLimited { .. })
    }
}
