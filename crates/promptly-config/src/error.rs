//! Configuration error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// Figment extraction or merge error.
    #[error("Configuration error: {0}")]
    Figment(#[from] figment::Error),

    /// A required setting is missing.
    #[error("'{section}' is not configured. Run `promptly config` to set it up")]
    NotConfigured { section: String },

    /// A configuration field has an invalid value.
    #[error("Invalid configuration value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("Config file I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl ConfigError {
    pub(crate) fn invalid(field: &str, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}
