use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Clarifying questions generated for one ambiguity.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Clarification {
    pub ambiguity: String,
    pub questions: Vec<String>,
}
