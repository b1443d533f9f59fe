use clap::Parser;

pub mod global;
pub mod root_commands;
pub mod subcommands;

pub use global::{ColorMode, GlobalFlags, OutputFormat, ProgressMode};
pub use root_commands::Commands;

/// Top-level CLI parser for the `promptly` binary.
#[derive(Debug, Parser)]
#[command(
    name = "promptly",
    version,
    about = "Promptly - analyze, optimize and refine prompts for LLMs"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format: json, table, raw
    #[arg(short, long, global = true, default_value = "table")]
    pub format: OutputFormat,

    /// Quiet mode (suppress non-essential output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Colorize output: auto, always, never
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorMode,

    /// Show spinners during remote calls: auto, on, off
    #[arg(long, global = true, default_value = "auto")]
    pub progress: ProgressMode,
}

impl Cli {
    /// Extract ergonomic global flags struct for command handlers.
    #[must_use]
    pub fn global_flags(&self) -> GlobalFlags {
        GlobalFlags {
            format: self.format,
            quiet: self.quiet,
            verbose: self.verbose,
            color: self.color,
            progress: self.progress,
        }
    }
}
