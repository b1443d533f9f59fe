//! Error types for the promptly core.
//!
//! Transport, configuration, and file errors live in their own crates.
//! The binary converges everything into `anyhow`.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    /// The session workflow received an event its current state does not accept.
    #[error("Invalid workflow transition: {event} while {from}")]
    InvalidTransition { from: String, event: String },

    /// Session data failed an invariant check.
    #[error("Validation error: {0}")]
    Validation(String),
}
