use std::path::{Path, PathBuf};

use anyhow::Context;
use promptly_config::PromptlyConfig;
use promptly_core::enums::{Complexity, Format, Length, Tone};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::bootstrap;
use crate::cli::GlobalFlags;
use crate::cli::subcommands::ConfigCommands;
use crate::interactive::terminal::TerminalPrompter;
use crate::interactive::{Notice, Prompter, choose};
use crate::output::output;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ConfigChange {
    path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    key: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    value: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ConfigPaths {
    user: String,
    user_exists: bool,
    project: String,
    project_exists: bool,
}

/// Handle `promptly config`.
pub fn handle(action: Option<&ConfigCommands>, flags: &GlobalFlags) -> anyhow::Result<()> {
    match action {
        None => wizard(),
        Some(ConfigCommands::Show) => show(flags),
        Some(ConfigCommands::Reset) => reset(flags),
        Some(ConfigCommands::Set { key, value }) => set(key, value, flags),
        Some(ConfigCommands::Path) => paths(flags),
    }
}

fn user_config_path() -> anyhow::Result<PathBuf> {
    PromptlyConfig::global_config_path().context("no user config directory on this platform")
}

/// Only the persisted document, so env values never get written back.
fn load_persisted(path: &Path) -> anyhow::Result<PromptlyConfig> {
    PromptlyConfig::load_file(path)
        .with_context(|| format!("failed to read config file {}", path.display()))
}

fn settings(config: &PromptlyConfig) -> Map<String, Value> {
    config
        .entries()
        .into_iter()
        .map(|(key, value)| (key.to_string(), Value::String(value)))
        .collect()
}

fn show(flags: &GlobalFlags) -> anyhow::Result<()> {
    let config = bootstrap::load_config()?;
    output(&settings(&config), flags.format)
}

fn reset(flags: &GlobalFlags) -> anyhow::Result<()> {
    let path = user_config_path()?;
    PromptlyConfig::default().save_to(&path)?;
    output(
        &ConfigChange {
            path: path.display().to_string(),
            key: None,
            value: None,
        },
        flags.format,
    )
}

fn set(key: &str, value: &str, flags: &GlobalFlags) -> anyhow::Result<()> {
    let path = user_config_path()?;
    let mut config = load_persisted(&path)?;
    config.set(key, value)?;
    config.save_to(&path)?;

    let field = promptly_config::canonical_key(key);
    output(
        &ConfigChange {
            path: path.display().to_string(),
            key: field,
            value: field.and_then(|field| config.get(field)),
        },
        flags.format,
    )
}

fn paths(flags: &GlobalFlags) -> anyhow::Result<()> {
    let user = PromptlyConfig::global_config_path();
    let project = std::path::absolute(PromptlyConfig::local_config_path())
        .context("failed to resolve the project config path")?;
    output(
        &ConfigPaths {
            user: user
                .as_ref()
                .map_or_else(|| "(unavailable)".to_string(), |path| path.display().to_string()),
            user_exists: user.as_ref().is_some_and(|path| path.exists()),
            project: project.display().to_string(),
            project_exists: project.exists(),
        },
        flags.format,
    )
}

/// Bare `promptly config`: walk through the connection settings and option
/// defaults, then save.
fn wizard() -> anyhow::Result<()> {
    let path = user_config_path()?;
    let current = load_persisted(&path)?;
    let mut prompter = TerminalPrompter::new()?;

    let updated = run_wizard(&mut prompter, current)?;
    updated.save_to(&path)?;
    prompter.show(Notice::Success(format!(
        "Configuration saved to {}",
        path.display()
    )));
    Ok(())
}

fn run_wizard<P: Prompter>(prompter: &mut P, mut config: PromptlyConfig) -> anyhow::Result<PromptlyConfig> {
    prompter.show(Notice::Info("Promptly configuration".into()));

    let api_key = prompter.line(
        &format!(
            "API key (current: {}, leave blank to keep):",
            config.masked_api_key()
        ),
        None,
    )?;
    if !api_key.trim().is_empty() {
        config.set("apiKey", &api_key)?;
    }

    ask_setting(prompter, &mut config, "baseUrl", "API base URL:")?;
    ask_setting(prompter, &mut config, "modelName", "Model name:")?;

    config.tone = choose(
        prompter,
        "Default tone:",
        &Tone::ALL,
        Tone::label,
        config.tone,
    )?;
    config.response_length = choose(
        prompter,
        "Default response length:",
        &Length::ALL,
        Length::label,
        config.response_length,
    )?;
    config.complexity_level = choose(
        prompter,
        "Default complexity level:",
        &Complexity::ALL,
        Complexity::label,
        config.complexity_level,
    )?;
    config.output_format = choose(
        prompter,
        "Default output format:",
        &Format::ALL,
        Format::label,
        config.output_format,
    )?;

    Ok(config)
}

/// Ask for one text setting until it validates. Blank keeps the current value.
fn ask_setting<P: Prompter>(
    prompter: &mut P,
    config: &mut PromptlyConfig,
    key: &str,
    message: &str,
) -> anyhow::Result<()> {
    loop {
        let current = config.get(key);
        let value = prompter.line(message, current.as_deref())?;
        match config.set(key, &value) {
            Ok(()) => return Ok(()),
            Err(error) => prompter.show(Notice::Warning(error.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::interactive::scripted::{Answer, ScriptedPrompter};

    #[test]
    fn wizard_updates_connection_and_defaults() {
        let mut prompter = ScriptedPrompter::new([
            Answer::text("sk-new-key-123456"),
            Answer::Enter,
            Answer::text("gpt-4o"),
            Answer::Pick(0),
            Answer::Enter,
            Answer::Enter,
            Answer::Pick(3),
        ]);

        let config = run_wizard(&mut prompter, PromptlyConfig::default()).unwrap();

        assert_eq!(config.api_key, "sk-new-key-123456");
        assert_eq!(config.base_url, promptly_config::DEFAULT_BASE_URL);
        assert_eq!(config.model_name, "gpt-4o");
        assert_eq!(config.tone, Tone::Formal);
        assert_eq!(config.response_length, PromptlyConfig::default().response_length);
        assert_eq!(config.output_format, Format::StepByStep);
        assert_eq!(prompter.remaining(), 0);
    }

    #[test]
    fn wizard_keeps_key_and_retries_bad_url() {
        let existing = PromptlyConfig {
            api_key: "sk-existing-abcdef".into(),
            ..PromptlyConfig::default()
        };
        let mut prompter = ScriptedPrompter::new([
            Answer::Enter,
            Answer::text("ftp://example.com"),
            Answer::text("http://localhost:11434/v1/"),
            Answer::Enter,
            Answer::Enter,
            Answer::Enter,
            Answer::Enter,
            Answer::Enter,
        ]);

        let config = run_wizard(&mut prompter, existing).unwrap();

        assert_eq!(config.api_key, "sk-existing-abcdef");
        assert_eq!(config.base_url, "http://localhost:11434/v1");
        assert_eq!(config.model_name, promptly_config::DEFAULT_MODEL);
        assert_eq!(prompter.warnings().len(), 1);
        assert!(prompter.warnings()[0].contains("baseUrl"));
        assert!(prompter.asked[0].contains("sk-*"));
    }

    #[test]
    fn settings_mask_the_api_key() {
        let config = PromptlyConfig {
            api_key: "sk-abcdefghijkl".into(),
            ..PromptlyConfig::default()
        };
        let map = settings(&config);
        assert_eq!(map["apiKey"], "sk-*********jkl");
        assert_eq!(map["modelName"], "gpt-4");
        assert_eq!(map.len(), promptly_config::KEYS.len());
    }
}
