use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::TaskType;

/// Classification of a raw prompt.
///
/// Produced once per raw prompt and replaced wholesale when a new analysis runs.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Analysis {
    pub task_type: TaskType,
    pub intent: String,
    pub key_concepts: Vec<String>,
    pub tone: String,
    /// Clarity rating, always within `1..=10`.
    pub clarity: u8,
    pub ambiguities: Vec<String>,
}

impl Analysis {
    pub const MIN_CLARITY: u8 = 1;
    pub const MAX_CLARITY: u8 = 10;

    /// Clamp an arbitrary rating into the valid clarity range.
    #[must_use]
    pub fn clamp_clarity(raw: i64) -> u8 {
        let clamped = raw.clamp(i64::from(Self::MIN_CLARITY), i64::from(Self::MAX_CLARITY));
        u8::try_from(clamped).unwrap_or(Self::MAX_CLARITY)
    }

    #[must_use]
    pub fn has_ambiguities(&self) -> bool {
        !self.ambiguities.is_empty()
    }
}
