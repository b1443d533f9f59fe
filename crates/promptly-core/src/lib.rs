//! # promptly-core
//!
//! Domain types and pure logic for promptly.
//!
//! - Task types and the enumerated tone/length/complexity/format/template choices
//! - Analysis, option set, clarification, and optimized-result records
//! - The system-message template engine
//! - The session workflow state machine, free of any I/O
//! - Cross-cutting error types

pub mod entities;
pub mod enums;
pub mod errors;
pub mod templates;
pub mod workflow;

pub use errors::CoreError;
