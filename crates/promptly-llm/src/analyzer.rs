//! Remote prompt analysis with a local fallback.

use promptly_core::entities::Analysis;
use promptly_core::enums::TaskType;
use serde::Deserialize;

use crate::client::{ChatMessage, CompletionBackend};
use crate::error::LlmError;
use crate::heuristic;
use crate::json::decode_object;
use crate::prompts;

const MALFORMED_INTENT: &str = "Could not determine accurately";
const MALFORMED_AMBIGUITY: &str = "Could not determine ambiguities automatically";
const MALFORMED_CLARITY: u8 = 5;

const FAILED_INTENT: &str = "Could not determine";
const FAILED_AMBIGUITY: &str = "Analysis failed, please try again or be more specific";
const FAILED_CLARITY: u8 = 3;

const FALLBACK_TONE: &str = "neutral";

/// Wire shape of the analysis reply. Every field is required.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnalysisPayload {
    task_type: TaskType,
    intent: String,
    key_concepts: Vec<String>,
    tone: String,
    clarity: f64,
    ambiguities: Vec<String>,
}

impl From<AnalysisPayload> for Analysis {
    #[allow(clippy::cast_possible_truncation)]
    fn from(payload: AnalysisPayload) -> Self {
        Self {
            task_type: payload.task_type,
            intent: payload.intent,
            key_concepts: payload.key_concepts,
            tone: payload.tone,
            clarity: Self::clamp_clarity(payload.clarity.round() as i64),
            ambiguities: payload.ambiguities,
        }
    }
}

/// Decode a raw analysis reply.
///
/// # Errors
///
/// Returns [`LlmError::MalformedResponse`] when the reply has no JSON object
/// or any field is missing or mistyped.
pub fn parse_analysis(reply: &str) -> Result<Analysis, LlmError> {
    decode_object::<AnalysisPayload>(reply).map(Analysis::from)
}

/// Heuristic analysis used when the reply could not be decoded.
#[must_use]
pub fn malformed_fallback(raw_text: &str) -> Analysis {
    fallback(raw_text, MALFORMED_INTENT, MALFORMED_CLARITY, MALFORMED_AMBIGUITY)
}

/// Heuristic analysis used when the request itself failed.
#[must_use]
pub fn failed_fallback(raw_text: &str) -> Analysis {
    fallback(raw_text, FAILED_INTENT, FAILED_CLARITY, FAILED_AMBIGUITY)
}

fn fallback(raw_text: &str, intent: &str, clarity: u8, ambiguity: &str) -> Analysis {
    Analysis {
        task_type: heuristic::detect_task_type(raw_text),
        intent: intent.to_string(),
        key_concepts: heuristic::key_concepts(raw_text),
        tone: FALLBACK_TONE.to_string(),
        clarity,
        ambiguities: vec![ambiguity.to_string()],
    }
}

/// Classifies raw prompts through a [`CompletionBackend`].
pub struct Analyzer<'a, B> {
    backend: &'a B,
}

impl<'a, B: CompletionBackend> Analyzer<'a, B> {
    pub const fn new(backend: &'a B) -> Self {
        Self { backend }
    }

    /// Analyze `raw_text`. Never fails.
    ///
    /// Undecodable replies and failed requests are logged and replaced by a
    /// local heuristic analysis.
    pub async fn analyze(&self, raw_text: &str) -> Analysis {
        let messages = vec![ChatMessage::user(prompts::analysis_prompt(raw_text))];
        match self.backend.complete(messages).await {
            Ok(reply) => parse_analysis(&reply).unwrap_or_else(|error| {
                tracing::warn!(%error, "analysis reply was not usable, using keyword fallback");
                malformed_fallback(raw_text)
            }),
            Err(error) => {
                tracing::warn!(%error, "analysis request failed, using keyword fallback");
                failed_fallback(raw_text)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn parses_fenced_reply() {
        let reply = "```json\n{\"taskType\":\"creative\",\"intent\":\"a poem\",\"keyConcepts\":[\"moon\"],\"tone\":\"wistful\",\"clarity\":8,\"ambiguities\":[]}\n```";
        let analysis = parse_analysis(reply).unwrap();
        assert_eq!(analysis.task_type, TaskType::Creative);
        assert_eq!(analysis.tone, "wistful");
        assert_eq!(analysis.clarity, 8);
    }

    #[test]
    fn clarity_is_clamped_and_rounded() {
        let reply = r#"{"taskType":"technical","intent":"x","keyConcepts":[],"tone":"t","clarity":14,"ambiguities":[]}"#;
        assert_eq!(parse_analysis(reply).unwrap().clarity, 10);
        let reply = r#"{"taskType":"technical","intent":"x","keyConcepts":[],"tone":"t","clarity":6.6,"ambiguities":[]}"#;
        assert_eq!(parse_analysis(reply).unwrap().clarity, 7);
        let reply = r#"{"taskType":"technical","intent":"x","keyConcepts":[],"tone":"t","clarity":0,"ambiguities":[]}"#;
        assert_eq!(parse_analysis(reply).unwrap().clarity, 1);
    }

    #[test]
    fn missing_field_is_malformed() {
        let reply = r#"{"taskType":"technical","intent":"x","keyConcepts":[],"tone":"t","clarity":5}"#;
        assert!(matches!(
            parse_analysis(reply),
            Err(LlmError::MalformedResponse(_))
        ));
    }

    #[test]
    fn malformed_fallback_uses_keyword_task_type() {
        let analysis = malformed_fallback("Write a creative story about space");
        assert_eq!(analysis.task_type, TaskType::Creative);
        assert_eq!(analysis.intent, "Could not determine accurately");
        assert_eq!(analysis.tone, "neutral");
        assert_eq!(analysis.clarity, 5);
        assert_eq!(
            analysis.ambiguities,
            vec!["Could not determine ambiguities automatically"]
        );
        assert!(analysis.key_concepts.contains(&"space".to_string()));
    }

    #[test]
    fn failed_fallback_has_low_clarity() {
        let analysis = failed_fallback("hello");
        assert_eq!(analysis.task_type, TaskType::Conversational);
        assert_eq!(analysis.intent, "Could not determine");
        assert_eq!(analysis.clarity, 3);
        assert_eq!(
            analysis.ambiguities,
            vec!["Analysis failed, please try again or be more specific"]
        );
    }
}
