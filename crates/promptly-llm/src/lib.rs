//! # promptly-llm
//!
//! Remote language-model calls for promptly.
//!
//! - [`ChatClient`]: OpenAI-compatible `chat/completions` client
//! - [`Analyzer`]: classifies a raw prompt, falling back to keyword heuristics
//! - [`Optimizer`]: optimize, clarify, and refine calls
//!
//! Both [`Analyzer`] and [`Optimizer`] are generic over [`CompletionBackend`].

pub mod analyzer;
pub mod client;
pub mod heuristic;
pub mod json;
pub mod optimizer;
pub mod prompts;

mod error;
mod http;
#[cfg(any(test, feature = "test-support"))]
mod scripted;

pub use analyzer::Analyzer;
pub use client::{ChatClient, ChatMessage, ChatSettings, CompletionBackend, Role};
pub use error::LlmError;
pub use optimizer::Optimizer;
#[cfg(any(test, feature = "test-support"))]
pub use scripted::ScriptedBackend;
