use serde::{Deserialize, Serialize};

use crate::entities::{Analysis, OptimizedResult, OptionSet};
use crate::enums::TaskType;

/// Whether a clarification rewrite triggers a fresh analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReanalysisPolicy {
    /// Keep the analysis computed before the rewrite.
    #[default]
    KeepAnalysis,
    /// Analyze the rewritten prompt before configuring options.
    Reanalyze,
}

/// Data owned by one interactive optimization run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub raw_prompt: String,
    pub analysis: Option<Analysis>,
    pub options: OptionSet,
    pub optimized: Option<OptimizedResult>,
}

impl Session {
    /// Start a session with the given options as configuration defaults.
    #[must_use]
    pub fn new(options: OptionSet) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    /// Clear everything except the configured options.
    pub fn restart(&mut self) {
        self.raw_prompt.clear();
        self.analysis = None;
        self.optimized = None;
    }

    /// Task type of the current analysis, conversational when none exists.
    #[must_use]
    pub fn task_type(&self) -> TaskType {
        self.analysis
            .as_ref()
            .map_or_else(TaskType::default, |analysis| analysis.task_type)
    }
}
