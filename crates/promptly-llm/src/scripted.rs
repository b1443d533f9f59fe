//! Scripted [`CompletionBackend`] for tests.

use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};

use crate::client::{ChatMessage, CompletionBackend};
use crate::error::LlmError;

/// Replays queued replies in order and records every request.
///
/// Once the queue is empty each call fails with
/// [`LlmError::MalformedResponse`].
#[derive(Debug, Default)]
pub struct ScriptedBackend {
    replies: Mutex<VecDeque<Result<String, LlmError>>>,
    requests: Mutex<Vec<Vec<ChatMessage>>>,
}

impl ScriptedBackend {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful reply.
    #[must_use]
    pub fn reply(self, text: impl Into<String>) -> Self {
        self.push(Ok(text.into()));
        self
    }

    /// Queue a failure.
    #[must_use]
    pub fn fail(self, error: LlmError) -> Self {
        self.push(Err(error));
        self
    }

    pub fn push(&self, reply: Result<String, LlmError>) {
        self.replies
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(reply);
    }

    /// Every request received so far, oldest first.
    #[must_use]
    pub fn requests(&self) -> Vec<Vec<ChatMessage>> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    #[must_use]
    pub fn remaining(&self) -> usize {
        self.replies
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl CompletionBackend for ScriptedBackend {
    async fn complete(&self, messages: Vec<ChatMessage>) -> Result<String, LlmError> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(messages);
        self.replies
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
            .unwrap_or_else(|| Err(LlmError::malformed("no scripted reply left")))
    }
}
