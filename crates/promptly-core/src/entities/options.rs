use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{Complexity, Format, Length, Template, Tone};

/// Per-field optimization choices.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CustomOptions {
    pub tone: Tone,
    pub length: Length,
    pub complexity: Complexity,
    pub format: Format,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_instructions: Option<String>,
}

impl CustomOptions {
    /// Additional instructions, ignoring blank input.
    #[must_use]
    pub fn instructions(&self) -> Option<&str> {
        self.additional_instructions
            .as_deref()
            .map(str::trim)
            .filter(|text| !text.is_empty())
    }
}

/// The active optimization configuration of a session.
///
/// Exactly one shape is active. Choosing a template discards any custom
/// fields and choosing custom fields discards the template.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OptionSet {
    Custom(CustomOptions),
    Template { template: Template },
}

impl Default for OptionSet {
    fn default() -> Self {
        Self::Custom(CustomOptions::default())
    }
}

impl OptionSet {
    #[must_use]
    pub const fn template(&self) -> Option<Template> {
        match self {
            Self::Template { template } => Some(*template),
            Self::Custom(_) => None,
        }
    }

    #[must_use]
    pub const fn custom(&self) -> Option<&CustomOptions> {
        match self {
            Self::Custom(options) => Some(options),
            Self::Template { .. } => None,
        }
    }

    #[must_use]
    pub const fn is_template(&self) -> bool {
        matches!(self, Self::Template { .. })
    }
}
