use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Improvement note appended after every manual refinement.
pub const MANUAL_REFINEMENT_NOTE: &str = "Applied manual refinements";

/// Output of an optimize call.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct OptimizedResult {
    pub prompt: String,
    pub improvements: Vec<String>,
}

impl OptimizedResult {
    /// Replace the prompt text with a manually refined version.
    ///
    /// The improvements list is only ever appended to.
    pub fn apply_refinement(&mut self, refined: String) {
        self.prompt = refined;
        self.improvements.push(MANUAL_REFINEMENT_NOTE.to_string());
    }
}
