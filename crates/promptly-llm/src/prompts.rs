//! Instruction texts sent to the model.
//!
//! Raw user text is interpolated verbatim.

use promptly_core::entities::{Analysis, OptionSet};

pub fn analysis_prompt(raw_text: &str) -> String {
    format!(
        r#"Analyze the following text and provide a JSON response with these fields:
- taskType: one of [creative, technical, informational, problemSolving, conversational]
- intent: a brief description of the user's intent
- keyConcepts: an array of key concepts mentioned
- tone: detected tone
- clarity: rating from 1-10 how clear the request is
- ambiguities: array of any ambiguous parts that need clarification

Text to analyze: "{raw_text}"

Response in JSON format only:"#
    )
}

/// User message for the optimize call. The system message carries the style
/// guidance, this carries the prompt, its analysis, and the reply contract.
pub fn optimize_prompt(raw_text: &str, analysis: &Analysis, options: &OptionSet) -> String {
    let mut message = format!(
        "Optimize the following prompt.\n\n\
         Original prompt: \"{raw_text}\"\n\n\
         Analysis:\n\
         - Task type: {}\n\
         - Intent: {}\n\
         - Key concepts: {}\n\
         - Clarity: {}/10\n",
        analysis.task_type,
        analysis.intent,
        analysis.key_concepts.join(", "),
        analysis.clarity,
    );
    if let Some(custom) = options.custom() {
        message.push_str(&format!("\nTarget complexity level: {}\n", custom.complexity));
        if let Some(instructions) = custom.instructions() {
            message.push_str(&format!("Additional instructions: {instructions}\n"));
        }
    }
    message.push_str(
        "\nRespond with a JSON object only, in this shape:\n\
         {\"optimizedPrompt\": \"<the rewritten prompt>\", \"improvements\": [\"<one short note per change>\"]}",
    );
    message
}

pub fn clarification_prompt(raw_text: &str, ambiguities: &[String]) -> String {
    let listed = ambiguities
        .iter()
        .map(|ambiguity| format!("- {ambiguity}"))
        .collect::<Vec<_>>()
        .join("\n");
    format!(
        "The following prompt contains ambiguous parts.\n\n\
         Prompt: \"{raw_text}\"\n\n\
         Ambiguities:\n{listed}\n\n\
         For each ambiguity, write one to three short questions that would resolve it.\n\
         Respond with a JSON array only, in this shape:\n\
         [{{\"ambiguity\": \"<ambiguity>\", \"questions\": [\"<question>\"]}}]"
    )
}

pub fn enhancement_prompt(raw_text: &str, answers: &[(String, Vec<String>)]) -> String {
    let clarifications = answers
        .iter()
        .map(|(ambiguity, replies)| format!("For \"{ambiguity}\": {}", replies.join(" ")))
        .collect::<Vec<_>>()
        .join("\n");
    format!(
        "Original prompt: \"{raw_text}\"\n\n\
         The user has provided clarifications for ambiguous parts:\n{clarifications}\n\n\
         Please rewrite the original prompt incorporating these clarifications.\n\
         Make the prompt clear, specific, and actionable.\n\
         Return only the enhanced prompt, without explanations or quotation marks."
    )
}

pub fn refinement_prompt(current_prompt: &str, instructions: &str) -> String {
    format!(
        "I have a prompt that needs specific refinements:\n\n\
         Current prompt: \"{current_prompt}\"\n\n\
         Refinement instructions: \"{instructions}\"\n\n\
         Please refine the prompt according to these instructions.\n\
         Return only the refined prompt, without explanations or quotation marks."
    )
}
