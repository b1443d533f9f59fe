//! Prompt optimization, clarification, and manual refinement calls.

use promptly_core::entities::{Analysis, Clarification, OptimizedResult, OptionSet};
use serde::Deserialize;

use crate::client::{ChatMessage, CompletionBackend};
use crate::error::LlmError;
use crate::json::{clean_rewrite, decode_array, decode_object};
use crate::prompts;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OptimizePayload {
    optimized_prompt: String,
    #[serde(default)]
    improvements: Vec<String>,
}

/// Decode an optimize reply.
///
/// # Errors
///
/// Returns [`LlmError::MalformedResponse`] when the reply has no JSON object,
/// lacks `optimizedPrompt`, or the prompt is blank.
pub fn parse_optimized(reply: &str) -> Result<OptimizedResult, LlmError> {
    let payload: OptimizePayload = decode_object(reply)?;
    let prompt = payload.optimized_prompt.trim();
    if prompt.is_empty() {
        return Err(LlmError::malformed("optimizedPrompt is empty"));
    }
    Ok(OptimizedResult {
        prompt: prompt.to_string(),
        improvements: payload
            .improvements
            .into_iter()
            .map(|note| note.trim().to_string())
            .filter(|note| !note.is_empty())
            .collect(),
    })
}

/// Decode a clarification reply, keeping only entries with questions.
///
/// # Errors
///
/// Returns [`LlmError::MalformedResponse`] when the reply is not an array of
/// `{ambiguity, questions}` objects.
pub fn parse_clarifications(reply: &str) -> Result<Vec<Clarification>, LlmError> {
    let clarifications: Vec<Clarification> = decode_array(reply)?;
    Ok(clarifications
        .into_iter()
        .filter(|item| !item.questions.is_empty())
        .collect())
}

fn non_empty_rewrite(reply: &str) -> Result<String, LlmError> {
    let text = clean_rewrite(reply);
    if text.is_empty() {
        Err(LlmError::malformed("rewrite was empty"))
    } else {
        Ok(text)
    }
}

/// Rewrites prompts through a [`CompletionBackend`].
pub struct Optimizer<'a, B> {
    backend: &'a B,
}

impl<'a, B: CompletionBackend> Optimizer<'a, B> {
    pub const fn new(backend: &'a B) -> Self {
        Self { backend }
    }

    /// Produce an optimized prompt and the list of changes made.
    ///
    /// # Errors
    ///
    /// Returns [`LlmError::OptimizationFailed`] wrapping the transport or
    /// decode error. Nothing is retried and no result is fabricated.
    pub async fn optimize(
        &self,
        raw_text: &str,
        analysis: &Analysis,
        options: &OptionSet,
        system_message: &str,
    ) -> Result<OptimizedResult, LlmError> {
        let messages = vec![
            ChatMessage::system(system_message),
            ChatMessage::user(prompts::optimize_prompt(raw_text, analysis, options)),
        ];
        self.backend
            .complete(messages)
            .await
            .and_then(|reply| parse_optimized(&reply))
            .map_err(|error| LlmError::OptimizationFailed(Box::new(error)))
    }

    /// Generate clarifying questions for every ambiguity in one request.
    ///
    /// Degrades to an empty list on any failure.
    pub async fn clarify_ambiguities(
        &self,
        raw_text: &str,
        ambiguities: &[String],
    ) -> Vec<Clarification> {
        if ambiguities.is_empty() {
            return Vec::new();
        }
        let messages = vec![ChatMessage::user(prompts::clarification_prompt(
            raw_text,
            ambiguities,
        ))];
        self.backend
            .complete(messages)
            .await
            .and_then(|reply| parse_clarifications(&reply))
            .unwrap_or_else(|error| {
                tracing::warn!(%error, "could not generate clarification questions");
                Vec::new()
            })
    }

    /// Fold the user's answers into the raw prompt.
    ///
    /// # Errors
    ///
    /// Returns the transport error, or [`LlmError::MalformedResponse`] when the
    /// rewrite comes back empty.
    pub async fn apply_clarifications(
        &self,
        raw_text: &str,
        answers: &[(String, Vec<String>)],
    ) -> Result<String, LlmError> {
        let messages = vec![ChatMessage::user(prompts::enhancement_prompt(
            raw_text, answers,
        ))];
        non_empty_rewrite(&self.backend.complete(messages).await?)
    }

    /// Rewrite the current optimized prompt per the user's instructions.
    ///
    /// # Errors
    ///
    /// Same as [`Self::apply_clarifications`].
    pub async fn refine(&self, current_prompt: &str, instructions: &str) -> Result<String, LlmError> {
        let messages = vec![ChatMessage::user(prompts::refinement_prompt(
            current_prompt,
            instructions,
        ))];
        non_empty_rewrite(&self.backend.complete(messages).await?)
    }
}
