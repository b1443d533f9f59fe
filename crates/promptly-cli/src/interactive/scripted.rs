use std::collections::VecDeque;

use anyhow::{Context, bail};

use super::{Notice, Prompter};

/// One canned user response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer {
    Text(String),
    Yes,
    No,
    Pick(usize),
    /// Press enter: accept the default.
    Enter,
}

impl Answer {
    pub fn text(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

/// Replays answers in order and records everything shown.
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    answers: VecDeque<Answer>,
    pub asked: Vec<String>,
    pub shown: Vec<Notice>,
}

impl ScriptedPrompter {
    pub fn new(answers: impl IntoIterator<Item = Answer>) -> Self {
        Self {
            answers: answers.into_iter().collect(),
            ..Self::default()
        }
    }

    pub fn remaining(&self) -> usize {
        self.answers.len()
    }

    pub fn warnings(&self) -> Vec<&str> {
        self.shown
            .iter()
            .filter_map(|notice| match notice {
                Notice::Warning(text) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    fn next(&mut self, message: &str) -> anyhow::Result<Answer> {
        self.asked.push(message.to_string());
        self.answers
            .pop_front()
            .with_context(|| format!("no scripted answer for '{message}'"))
    }
}

impl Prompter for ScriptedPrompter {
    fn text(&mut self, message: &str) -> anyhow::Result<String> {
        match self.next(message)? {
            Answer::Text(text) => Ok(text),
            Answer::Enter => Ok(String::new()),
            other => bail!("expected text for '{message}', got {other:?}"),
        }
    }

    fn line(&mut self, message: &str, default: Option<&str>) -> anyhow::Result<String> {
        match self.next(message)? {
            Answer::Text(text) if !text.trim().is_empty() => Ok(text),
            Answer::Text(_) | Answer::Enter => Ok(default.unwrap_or_default().to_string()),
            other => bail!("expected a line for '{message}', got {other:?}"),
        }
    }

    fn confirm(&mut self, message: &str, default: bool) -> anyhow::Result<bool> {
        match self.next(message)? {
            Answer::Yes => Ok(true),
            Answer::No => Ok(false),
            Answer::Enter => Ok(default),
            other => bail!("expected yes/no for '{message}', got {other:?}"),
        }
    }

    fn select(&mut self, message: &str, _choices: &[&str], default: usize) -> anyhow::Result<usize> {
        match self.next(message)? {
            Answer::Pick(index) => Ok(index),
            Answer::Enter => Ok(default),
            other => bail!("expected a choice for '{message}', got {other:?}"),
        }
    }

    fn show(&mut self, notice: Notice) {
        self.shown.push(notice);
    }
}
