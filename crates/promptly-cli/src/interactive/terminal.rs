use anyhow::{Context, bail};
use colored::Colorize;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

use super::{Notice, Prompter};
use crate::ui;

const DEFAULT_RULE_WIDTH: usize = 60;

/// [`Prompter`] backed by a rustyline editor on the controlling terminal.
pub struct TerminalPrompter {
    editor: DefaultEditor,
}

impl TerminalPrompter {
    pub fn new() -> anyhow::Result<Self> {
        let editor = DefaultEditor::new().context("failed to open terminal line editor")?;
        Ok(Self { editor })
    }

    pub fn banner(&self) {
        println!("{}", "Promptly interactive session".bright_blue().bold());
        println!(
            "{}",
            "Build an optimized prompt step by step. Press Ctrl-C to quit.\n".dimmed()
        );
    }

    /// One line of input. `None` on end of input.
    fn read(&mut self, prompt: &str) -> anyhow::Result<Option<String>> {
        match self.editor.readline(prompt) {
            Ok(line) => {
                if !line.trim().is_empty() {
                    if let Err(error) = self.editor.add_history_entry(line.as_str()) {
                        tracing::debug!(%error, "could not record input history");
                    }
                }
                Ok(Some(line))
            }
            Err(ReadlineError::Eof) => Ok(None),
            Err(ReadlineError::Interrupted) => bail!("cancelled"),
            Err(error) => Err(error).context("failed to read from terminal"),
        }
    }

    fn read_required(&mut self, prompt: &str) -> anyhow::Result<String> {
        self.read(prompt)?.context("input closed")
    }
}

impl Prompter for TerminalPrompter {
    fn text(&mut self, message: &str) -> anyhow::Result<String> {
        println!(
            "{} {}",
            message.bold(),
            "(finish with an empty line)".dimmed()
        );
        let mut lines = Vec::new();
        loop {
            match self.read("> ")? {
                Some(line) if line.trim().is_empty() => break,
                Some(line) => lines.push(line),
                None if lines.is_empty() => bail!("no prompt entered"),
                None => break,
            }
        }
        Ok(lines.join("\n"))
    }

    fn line(&mut self, message: &str, default: Option<&str>) -> anyhow::Result<String> {
        let prompt = match default.filter(|value| !value.is_empty()) {
            Some(value) => format!("{message} [{value}] "),
            None => format!("{message} "),
        };
        let answer = self.read_required(&prompt)?;
        let answer = answer.trim();
        if answer.is_empty() {
            Ok(default.unwrap_or_default().to_string())
        } else {
            Ok(answer.to_string())
        }
    }

    fn confirm(&mut self, message: &str, default: bool) -> anyhow::Result<bool> {
        let hint = if default { "[Y/n]" } else { "[y/N]" };
        loop {
            let answer = self.read_required(&format!("{message} {hint} "))?;
            match answer.trim().to_ascii_lowercase().as_str() {
                "" => return Ok(default),
                "y" | "yes" => return Ok(true),
                "n" | "no" => return Ok(false),
                _ => println!("{}", "Please answer y or n.".yellow()),
            }
        }
    }

    fn select(&mut self, message: &str, choices: &[&str], default: usize) -> anyhow::Result<usize> {
        println!("{}", message.bold());
        for (index, choice) in choices.iter().enumerate() {
            let marker = if index == default { "*" } else { " " };
            println!("  {marker} {}) {choice}", index + 1);
        }
        loop {
            let answer = self.read_required(&format!("Choice [{}]: ", default + 1))?;
            let answer = answer.trim();
            if answer.is_empty() {
                return Ok(default);
            }
            match answer.parse::<usize>() {
                Ok(number) if (1..=choices.len()).contains(&number) => return Ok(number - 1),
                _ => println!(
                    "{}",
                    format!("Enter a number between 1 and {}.", choices.len()).yellow()
                ),
            }
        }
    }

    fn show(&mut self, notice: Notice) {
        match notice {
            Notice::Analysis(analysis) => {
                let mut body = vec![
                    format!("- Task Type: {}", analysis.task_type),
                    format!("- Intent: {}", analysis.intent),
                    format!("- Key Concepts: {}", analysis.key_concepts.join(", ")),
                    format!("- Clarity Score: {}/10", analysis.clarity),
                ];
                if analysis.tone != "neutral" {
                    body.push(format!("- Tone: {}", analysis.tone));
                }
                let body = body
                    .iter()
                    .map(|line| line.yellow().to_string())
                    .collect::<Vec<_>>()
                    .join("\n");
                print_block("Analysis", &body);
            }
            Notice::Prompt { title, text } => print_block(&title, &text.green().to_string()),
            Notice::Result(result) => {
                print_block("Optimized Prompt", &result.prompt.green().to_string());
                if !result.improvements.is_empty() {
                    println!("{}", "Improvements made:".blue());
                    for improvement in &result.improvements {
                        println!("{}", format!("- {improvement}").blue());
                    }
                    println!();
                }
            }
            Notice::Info(text) => println!("{}", text.blue()),
            Notice::Warning(text) => println!("{}", text.red()),
            Notice::Success(text) => println!("{}", text.green().bold()),
        }
    }
}

fn rule_width() -> usize {
    ui::prefs()
        .term_width
        .unwrap_or(DEFAULT_RULE_WIDTH)
        .min(DEFAULT_RULE_WIDTH + 20)
}

fn print_block(title: &str, body: &str) {
    let width = rule_width();
    let heading = format!("── {title} ");
    let fill = width.saturating_sub(heading.chars().count());
    println!();
    println!("{}{}", heading.bold(), "─".repeat(fill).dimmed());
    println!("{body}");
    println!("{}", "─".repeat(width).dimmed());
    println!();
}
