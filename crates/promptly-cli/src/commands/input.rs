use std::io::{IsTerminal, Read};

use anyhow::{Context, bail};

use crate::cli::root_commands::PromptSource;
use crate::interactive::Prompter;
use crate::interactive::terminal::TerminalPrompter;

/// Read the raw prompt from `--text`, `--file`, piped stdin, or terminal entry.
///
/// # Errors
///
/// Fails when the source cannot be read or the prompt is blank.
pub fn read_prompt(source: &PromptSource) -> anyhow::Result<String> {
    let raw = if let Some(text) = &source.text {
        text.clone()
    } else if let Some(path) = &source.file {
        std::fs::read_to_string(path)
            .with_context(|| format!("failed to read prompt file {}", path.display()))?
    } else if std::io::stdin().is_terminal() {
        TerminalPrompter::new()?.text("Enter your prompt:")?
    } else {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .context("failed to read prompt from stdin")?;
        buffer
    };
    non_empty(raw)
}

fn non_empty(raw: String) -> anyhow::Result<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        bail!("prompt is empty");
    }
    Ok(trimmed.to_string())
}
