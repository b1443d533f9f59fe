use std::path::PathBuf;

use clap::{Args, Subcommand};
use promptly_core::enums::{Complexity, Format, Length, Template, Tone};

use crate::cli::subcommands::ConfigCommands;

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Optimize a prompt, directly or through the interactive session.
    Optimize(OptimizeArgs),
    /// Analyze a prompt without optimizing it.
    Analyze(AnalyzeArgs),
    /// Show or change configuration. Without an action, runs the setup wizard.
    Config {
        #[command(subcommand)]
        action: Option<ConfigCommands>,
    },
    /// List the preset templates and their system messages.
    Templates,
}

/// Where the raw prompt comes from. Defaults to terminal entry.
#[derive(Clone, Debug, Default, Args)]
#[group(multiple = false)]
pub struct PromptSource {
    /// Prompt text.
    #[arg(long)]
    pub text: Option<String>,
    /// Read the prompt from a file.
    #[arg(long)]
    pub file: Option<PathBuf>,
}

#[derive(Clone, Debug, Args)]
pub struct OptimizeArgs {
    /// Run the guided session with clarification and refinement.
    #[arg(short, long)]
    pub interactive: bool,
    /// Tone of the optimized prompt.
    #[arg(long, value_parser = parse_tone)]
    pub tone: Option<Tone>,
    /// Level of detail.
    #[arg(long, value_parser = parse_length)]
    pub length: Option<Length>,
    /// Target complexity level.
    #[arg(long, value_parser = parse_complexity)]
    pub complexity: Option<Complexity>,
    /// Structure of the optimized prompt.
    #[arg(long = "output-format", value_parser = parse_format)]
    pub output_format: Option<Format>,
    /// Extra optimization instructions.
    #[arg(long)]
    pub instructions: Option<String>,
    /// Use a preset template instead of per-field options.
    #[arg(long, value_parser = parse_template, conflicts_with_all = ["tone", "length", "complexity", "output_format", "instructions"])]
    pub template: Option<Template>,
    #[command(flatten)]
    pub source: PromptSource,
    /// Save the optimized prompt under the output directory.
    #[arg(long, value_name = "FILENAME")]
    pub save: Option<String>,
    /// Analyze the prompt again after clarifications rewrite it.
    #[arg(long)]
    pub reanalyze: bool,
}

#[derive(Clone, Debug, Args)]
pub struct AnalyzeArgs {
    #[command(flatten)]
    pub source: PromptSource,
}

fn parse_with<T>(value: &str, parse: fn(&str) -> Option<T>, allowed: &[&str]) -> Result<T, String> {
    parse(value).ok_or_else(|| format!("expected one of: {}", allowed.join(", ")))
}

fn parse_tone(value: &str) -> Result<Tone, String> {
    parse_with(value, Tone::from_key, &Tone::ALL.map(Tone::as_str))
}

fn parse_length(value: &str) -> Result<Length, String> {
    parse_with(value, Length::from_key, &Length::ALL.map(Length::as_str))
}

fn parse_complexity(value: &str) -> Result<Complexity, String> {
    parse_with(value, Complexity::from_key, &Complexity::ALL.map(Complexity::as_str))
}

fn parse_format(value: &str) -> Result<Format, String> {
    parse_with(value, Format::from_key, &Format::ALL.map(Format::as_str))
}

fn parse_template(value: &str) -> Result<Template, String> {
    parse_with(value, Template::from_key, &Template::ALL.map(Template::as_str))
}
