use serde::{Deserialize, Serialize};
use std::fmt;

/// Step of an optimization session.
///
/// ```text
/// collecting_prompt → analyzing → configuring_options → optimizing → refining → accepted
/// analyzing → awaiting_clarification_choice → clarifying_ambiguities → configuring_options
/// clarifying_ambiguities → reanalyzing → configuring_options
/// optimizing | refining → configuring_options | collecting_prompt
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum State {
    CollectingPrompt,
    Analyzing,
    AwaitingClarificationChoice,
    ClarifyingAmbiguities,
    Reanalyzing,
    ConfiguringOptions,
    Optimizing,
    Refining,
    Accepted,
}

impl State {
    /// Valid next states from the current state.
    #[must_use]
    pub const fn allowed_next_states(self) -> &'static [Self] {
        match self {
            Self::CollectingPrompt => &[Self::CollectingPrompt, Self::Analyzing],
            Self::Analyzing => &[Self::AwaitingClarificationChoice, Self::ConfiguringOptions],
            Self::AwaitingClarificationChoice => {
                &[Self::ClarifyingAmbiguities, Self::ConfiguringOptions]
            }
            Self::ClarifyingAmbiguities => &[Self::Reanalyzing, Self::ConfiguringOptions],
            Self::Reanalyzing => &[Self::ConfiguringOptions],
            Self::ConfiguringOptions => &[Self::Optimizing],
            Self::Optimizing => &[
                Self::Optimizing,
                Self::Refining,
                Self::ConfiguringOptions,
                Self::CollectingPrompt,
            ],
            Self::Refining => &[
                Self::Refining,
                Self::ConfiguringOptions,
                Self::CollectingPrompt,
                Self::Accepted,
            ],
            Self::Accepted => &[],
        }
    }

    /// Check whether transitioning to `next` is allowed.
    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        self.allowed_next_states().contains(&next)
    }

    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Accepted)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CollectingPrompt => "collecting_prompt",
            Self::Analyzing => "analyzing",
            Self::AwaitingClarificationChoice => "awaiting_clarification_choice",
            Self::ClarifyingAmbiguities => "clarifying_ambiguities",
            Self::Reanalyzing => "reanalyzing",
            Self::ConfiguringOptions => "configuring_options",
            Self::Optimizing => "optimizing",
            Self::Refining => "refining",
            Self::Accepted => "accepted",
        }
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
