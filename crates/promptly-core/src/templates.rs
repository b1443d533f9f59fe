//! System-message construction.
//!
//! Two mutually exclusive paths produce the system message sent with an
//! optimize request:
//! - [`build_system_message`] assembles a message from the analyzed task type
//!   and per-field custom options.
//! - [`template_message`] returns a preset template verbatim.
//!
//! [`system_message_for`] picks the path from the active [`OptionSet`] shape.
//! Lookups are keyed by wire strings and are total: unknown task types fall
//! back to the conversational paragraph, unknown style keys to the empty
//! fragment, unknown template names to the default template.

use crate::entities::{CustomOptions, OptionSet};
use crate::enums::{Template, TaskType};

pub const PREAMBLE: &str = "You are an expert prompt optimizer. Your goal is to rewrite prompts to get the best possible AI responses.";

const CREATIVE_TASK: &str = "For creative tasks, focus on rich, imaginative language that encourages originality. Include specific details about style, mood, and narrative elements.";
const TECHNICAL_TASK: &str = "For technical tasks, focus on precision, clarity, and correctness. Structure prompts with clearly defined requirements, expected formats, and technical constraints.";
const INFORMATIONAL_TASK: &str = "For informational tasks, focus on specifying the depth of information needed, the perspective required, and any particular aspects to emphasize.";
const PROBLEM_SOLVING_TASK: &str = "For problem-solving tasks, clearly define the problem scope, constraints, and desired outcome metrics. Break complex problems into logical steps.";
const CONVERSATIONAL_TASK: &str = "For conversational tasks, focus on establishing the right tone, context, and persona for the conversation. Specify the nature of the dialogue and the desired interaction style.";

const TECHNICAL_WRITING_TEMPLATE: &str = "You are a technical writing expert who specializes in creating clear, precise technical prompts.
Focus on structural clarity, technical accuracy, and eliminating ambiguity.
Use technical terminology appropriately and include specifications where relevant.";
const CREATIVE_WRITING_TEMPLATE: &str = "You are a creative writing coach who helps craft imaginative and inspiring prompts.
Emphasize vivid descriptions, emotional resonance, and creative elements.
Consider narrative structure, character development, and thematic elements when appropriate.";
const ACADEMIC_TEMPLATE: &str = "You are an academic writing consultant who specializes in scholarly prompts.
Focus on rigor, proper citation needs, methodological considerations, and academic terminology.
Ensure prompts request appropriate levels of evidence and theoretical framework when relevant.";
const BUSINESS_TEMPLATE: &str = "You are a business communications expert who crafts effective professional prompts.
Focus on clarity, actionability, and business value.
Use appropriate business terminology and ensure prompts align with professional objectives.";

/// Task paragraph for a task type key. Unknown keys get the conversational paragraph.
#[must_use]
pub fn task_paragraph(task_type: &str) -> &'static str {
    match task_type {
        "creative" => CREATIVE_TASK,
        "technical" => TECHNICAL_TASK,
        "informational" => INFORMATIONAL_TASK,
        "problemSolving" => PROBLEM_SOLVING_TASK,
        _ => CONVERSATIONAL_TASK,
    }
}

/// Tone paragraph for a tone key. Unknown keys (including `neutral`) are empty.
#[must_use]
pub fn tone_paragraph(tone: &str) -> &'static str {
    match tone {
        "formal" => "Use formal language and structured presentation. Maintain professional terminology and avoid colloquialisms.",
        "casual" => "Use conversational language and a relaxed tone. Include occasional colloquialisms and a more approachable style.",
        "technical" => "Use precise technical language and domain-specific terminology. Focus on accuracy and specificity.",
        "friendly" => "Use warm, engaging language that creates a connection. Incorporate encouraging phrases and a supportive tone.",
        _ => "",
    }
}

/// Length paragraph for a length key. Unknown keys are empty.
#[must_use]
pub fn length_paragraph(length: &str) -> &'static str {
    match length {
        "short" => "Keep responses concise and to the point, focusing only on the most essential information.",
        "medium" => "Provide a balanced amount of detail, covering key points thoroughly without excessive elaboration.",
        "detailed" => "Include comprehensive details, thorough explanations, and supporting examples where relevant.",
        _ => "",
    }
}

/// Format paragraph for a format key. Unknown keys are empty.
#[must_use]
pub fn format_paragraph(format: &str) -> &'static str {
    match format {
        "narrative" => "Structure the response as a cohesive narrative with a logical flow.",
        "list" => "Structure the response as an organized list of items.",
        "bullet" => "Format the response with bullet points for easy scanning.",
        "step-by-step" => "Present information as a sequential process with numbered steps.",
        _ => "",
    }
}

/// Assemble a system message from string keys.
///
/// Layout is fixed: preamble, blank line, task paragraph, blank line, then the
/// tone, length and format lines. Empty fragments keep their line.
#[must_use]
pub fn assemble_system_message(task_type: &str, tone: &str, length: &str, format: &str) -> String {
    format!(
        "{PREAMBLE}\n\n{}\n\n{}\n{}\n{}",
        task_paragraph(task_type),
        tone_paragraph(tone),
        length_paragraph(length),
        format_paragraph(format),
    )
}

/// Build the system message for a task type and per-field options.
#[must_use]
pub fn build_system_message(task_type: TaskType, options: &CustomOptions) -> String {
    assemble_system_message(
        task_type.as_str(),
        options.tone.as_str(),
        options.length.as_str(),
        options.format.as_str(),
    )
}

/// Preset template text by name. Unknown names return the default template.
#[must_use]
pub fn template_message(name: &str) -> &'static str {
    Template::from_key(name).map_or(PREAMBLE, preset)
}

/// Preset template text.
#[must_use]
pub const fn preset(template: Template) -> &'static str {
    match template {
        Template::Default => PREAMBLE,
        Template::TechnicalWriting => TECHNICAL_WRITING_TEMPLATE,
        Template::CreativeWriting => CREATIVE_WRITING_TEMPLATE,
        Template::Academic => ACADEMIC_TEMPLATE,
        Template::Business => BUSINESS_TEMPLATE,
    }
}

/// System message for the active option shape.
#[must_use]
pub fn system_message_for(options: &OptionSet, task_type: TaskType) -> String {
    match options {
        OptionSet::Template { template } => preset(*template).to_string(),
        OptionSet::Custom(custom) => build_system_message(task_type, custom),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;
    use crate::enums::{Complexity, Format, Length, Tone};

    fn formal_detailed() -> CustomOptions {
        CustomOptions {
            tone: Tone::Formal,
            length: Length::Detailed,
            complexity: Complexity::Expert,
            format: Format::StepByStep,
            additional_instructions: None,
        }
    }

    #[test]
    fn build_is_deterministic() {
        let options = formal_detailed();
        for task in TaskType::ALL {
            assert_eq!(
                build_system_message(task, &options),
                build_system_message(task, &options)
            );
        }
    }

    #[test]
    fn layout_is_fixed() {
        let message = build_system_message(TaskType::Creative, &formal_detailed());
        let expected = format!(
            "{PREAMBLE}\n\n{CREATIVE_TASK}\n\n{}\n{}\n{}",
            tone_paragraph("formal"),
            length_paragraph("detailed"),
            format_paragraph("step-by-step"),
        );
        assert_eq!(message, expected);
    }

    #[test]
    fn neutral_tone_keeps_empty_line() {
        let options = CustomOptions::default();
        let message = build_system_message(TaskType::Technical, &options);
        let lines: Vec<&str> = message.split('\n').collect();
        // preamble, blank, task, blank, tone, length, format
        assert_eq!(lines.len(), 7);
        assert_eq!(lines[4], "");
        assert_eq!(lines[5], length_paragraph("medium"));
        assert_eq!(lines[6], format_paragraph("narrative"));
    }

    #[rstest]
    #[case("")]
    #[case("poetry")]
    #[case("Creative")]
    #[case("problem_solving")]
    fn unknown_task_type_falls_back_to_conversational(#[case] key: &str) {
        assert_eq!(task_paragraph(key), CONVERSATIONAL_TASK);
        let message = assemble_system_message(key, "formal", "short", "list");
        assert!(message.contains(CONVERSATIONAL_TASK));
    }

    #[rstest]
    #[case("neutral")]
    #[case("sarcastic")]
    #[case("")]
    fn unknown_style_keys_are_empty(#[case] key: &str) {
        assert_eq!(tone_paragraph(key), "");
        assert_eq!(length_paragraph(key), "");
        assert_eq!(format_paragraph(key), "");
    }

    #[test]
    fn every_known_style_key_has_a_paragraph() {
        for tone in Tone::ALL.into_iter().filter(|tone| *tone != Tone::Neutral) {
            assert!(!tone_paragraph(tone.as_str()).is_empty(), "{tone}");
        }
        for length in Length::ALL {
            assert!(!length_paragraph(length.as_str()).is_empty(), "{length}");
        }
        for format in Format::ALL {
            assert!(!format_paragraph(format.as_str()).is_empty(), "{format}");
        }
    }

    #[rstest]
    #[case("unknown")]
    #[case("")]
    #[case("legal")]
    fn unknown_template_returns_default(#[case] name: &str) {
        assert_eq!(template_message(name), template_message("default"));
    }

    #[test]
    fn known_templates_resolve() {
        for template in Template::ALL {
            assert_eq!(template_message(template.as_str()), preset(template));
        }
        assert!(template_message("business").starts_with("You are a business communications expert"));
    }

    #[test]
    fn template_path_ignores_task_type() {
        let options = OptionSet::Template {
            template: Template::Academic,
        };
        assert_eq!(
            system_message_for(&options, TaskType::Creative),
            system_message_for(&options, TaskType::Technical)
        );
        assert_eq!(
            system_message_for(&options, TaskType::Creative),
            ACADEMIC_TEMPLATE
        );
    }

    #[test]
    fn custom_path_uses_task_type() {
        let options = OptionSet::Custom(formal_detailed());
        let message = system_message_for(&options, TaskType::ProblemSolving);
        assert!(message.contains(PROBLEM_SOLVING_TASK));
        assert!(!message.contains(ACADEMIC_TEMPLATE));
    }
}
