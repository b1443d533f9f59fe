//! Task types and the enumerated option choices for prompt optimization.
//!
//! Every choice enum exposes:
//! - `as_str()` returning the wire key used in config files and JSON payloads
//! - `label()` returning the human menu text
//! - `ALL` listing the variants in menu order
//! - `from_key()` for lossy parsing of flag and config values

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! impl_display {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(self.as_str())
                }
            }
        )+
    };
}

// ---------------------------------------------------------------------------
// TaskType
// ---------------------------------------------------------------------------

/// Category of intent detected in a raw prompt.
///
/// Deserialization is lossy: any unrecognized key becomes
/// [`TaskType::Conversational`], the same fallback the template engine uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", from = "String")]
pub enum TaskType {
    Creative,
    Technical,
    Informational,
    ProblemSolving,
    #[default]
    Conversational,
}

impl TaskType {
    /// Variants in the order the keyword heuristic iterates them.
    pub const ALL: [Self; 5] = [
        Self::Creative,
        Self::Technical,
        Self::Informational,
        Self::ProblemSolving,
        Self::Conversational,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Creative => "creative",
            Self::Technical => "technical",
            Self::Informational => "informational",
            Self::ProblemSolving => "problemSolving",
            Self::Conversational => "conversational",
        }
    }

    /// Parse a task type key. Accepts both `problemSolving` and `problem_solving`.
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        match key.trim().to_ascii_lowercase().as_str() {
            "creative" => Some(Self::Creative),
            "technical" => Some(Self::Technical),
            "informational" => Some(Self::Informational),
            "problemsolving" | "problem_solving" | "problem-solving" => Some(Self::ProblemSolving),
            "conversational" => Some(Self::Conversational),
            _ => None,
        }
    }
}

impl From<String> for TaskType {
    fn from(value: String) -> Self {
        Self::from_key(&value).unwrap_or_default()
    }
}

// ---------------------------------------------------------------------------
// Tone
// ---------------------------------------------------------------------------

/// Tone the optimized prompt should ask for.
///
/// `Neutral` is the default and carries no tone paragraph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Tone {
    Formal,
    Casual,
    Technical,
    Friendly,
    #[default]
    Neutral,
}

impl Tone {
    pub const ALL: [Self; 5] = [
        Self::Formal,
        Self::Casual,
        Self::Technical,
        Self::Friendly,
        Self::Neutral,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Formal => "formal",
            Self::Casual => "casual",
            Self::Technical => "technical",
            Self::Friendly => "friendly",
            Self::Neutral => "neutral",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Formal => "Formal - Professional and structured",
            Self::Casual => "Casual - Conversational and relaxed",
            Self::Technical => "Technical - Precise and domain-specific",
            Self::Friendly => "Friendly - Warm and approachable",
            Self::Neutral => "Neutral - No particular tone",
        }
    }

    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|tone| tone.as_str().eq_ignore_ascii_case(key.trim()))
    }
}

// ---------------------------------------------------------------------------
// Length
// ---------------------------------------------------------------------------

/// How much detail the optimized prompt should request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Length {
    Short,
    #[default]
    Medium,
    Detailed,
}

impl Length {
    pub const ALL: [Self; 3] = [Self::Short, Self::Medium, Self::Detailed];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Short => "short",
            Self::Medium => "medium",
            Self::Detailed => "detailed",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Short => "Short - Brief and to the point",
            Self::Medium => "Medium - Balanced level of detail",
            Self::Detailed => "Detailed - Comprehensive instructions",
        }
    }

    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|length| length.as_str().eq_ignore_ascii_case(key.trim()))
    }
}

// ---------------------------------------------------------------------------
// Complexity
// ---------------------------------------------------------------------------

/// Audience sophistication the optimized prompt should target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Complexity {
    Beginner,
    #[default]
    Intermediate,
    Expert,
}

impl Complexity {
    pub const ALL: [Self; 3] = [Self::Beginner, Self::Intermediate, Self::Expert];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Beginner => "beginner",
            Self::Intermediate => "intermediate",
            Self::Expert => "expert",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Beginner => "Beginner - Simple language and concepts",
            Self::Intermediate => "Intermediate - Moderate sophistication",
            Self::Expert => "Expert - Advanced concepts and terminology",
        }
    }

    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|complexity| complexity.as_str().eq_ignore_ascii_case(key.trim()))
    }
}

// ---------------------------------------------------------------------------
// Format
// ---------------------------------------------------------------------------

/// Structure the optimized prompt should ask the model to answer in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Format {
    #[default]
    Narrative,
    List,
    Bullet,
    #[serde(rename = "step-by-step")]
    StepByStep,
}

impl Format {
    pub const ALL: [Self; 4] = [Self::Narrative, Self::List, Self::Bullet, Self::StepByStep];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Narrative => "narrative",
            Self::List => "list",
            Self::Bullet => "bullet",
            Self::StepByStep => "step-by-step",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Narrative => "Narrative - Flowing textual description",
            Self::List => "List - Organized list format",
            Self::Bullet => "Bullet points - Easy to scan content",
            Self::StepByStep => "Step-by-step - Sequential instructions",
        }
    }

    /// Parse a format key. `step_by_step` is accepted as an alias.
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        let key = key.trim().replace('_', "-");
        Self::ALL
            .into_iter()
            .find(|format| format.as_str().eq_ignore_ascii_case(&key))
    }
}

// ---------------------------------------------------------------------------
// Template
// ---------------------------------------------------------------------------

/// Preset system-message templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Template {
    #[default]
    Default,
    TechnicalWriting,
    CreativeWriting,
    Academic,
    Business,
}

impl Template {
    pub const ALL: [Self; 5] = [
        Self::Default,
        Self::TechnicalWriting,
        Self::CreativeWriting,
        Self::Academic,
        Self::Business,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::TechnicalWriting => "technical_writing",
            Self::CreativeWriting => "creative_writing",
            Self::Academic => "academic",
            Self::Business => "business",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Default => "Default - General purpose optimization",
            Self::TechnicalWriting => "Technical Writing - For code, technical docs, etc.",
            Self::CreativeWriting => "Creative Writing - For stories, creative content",
            Self::Academic => "Academic - For scholarly writing",
            Self::Business => "Business - For professional communications",
        }
    }

    /// Parse a template name. `technical-writing` is accepted for `technical_writing`.
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        let key = key.trim().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|template| template.as_str().eq_ignore_ascii_case(&key))
    }
}

impl_display!(TaskType, Tone, Length, Complexity, Format, Template);
