//! Terminal adapter for the session workflow.
//!
//! [`driver::Driver`] executes the effects emitted by
//! [`promptly_core::workflow::Workflow`] and talks to the user only through
//! the [`Prompter`] trait, so the whole session can run against a scripted
//! prompter in tests.

pub mod driver;
pub mod terminal;

#[cfg(test)]
pub mod scripted;

use anyhow::{Context, bail};
use promptly_core::entities::{Analysis, OptimizedResult};
use promptly_core::workflow::{ReanalysisPolicy, Workflow};

use crate::cli::root_commands::OptimizeArgs;
use crate::cli::{GlobalFlags, OutputFormat};
use crate::commands::optimize::option_set;
use crate::context::AppContext;

/// Something the session wants the user to see.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Analysis(Analysis),
    /// A rewritten raw prompt, such as the clarified prompt.
    Prompt { title: String, text: String },
    Result(OptimizedResult),
    Info(String),
    Warning(String),
    Success(String),
}

/// Blocking user interaction used by the session driver.
pub trait Prompter {
    /// Multi-line entry. Returns the lines joined with `\n`.
    fn text(&mut self, message: &str) -> anyhow::Result<String>;

    /// Single-line entry. Blank input yields `default`, or an empty string.
    fn line(&mut self, message: &str, default: Option<&str>) -> anyhow::Result<String>;

    fn confirm(&mut self, message: &str, default: bool) -> anyhow::Result<bool>;

    /// Pick one of `choices`. Returns its index.
    fn select(&mut self, message: &str, choices: &[&str], default: usize) -> anyhow::Result<usize>;

    fn show(&mut self, notice: Notice);
}

/// Pick one of `choices` by label, defaulting to `current`.
pub fn choose<P: Prompter + ?Sized, T: Copy + PartialEq>(
    prompter: &mut P,
    message: &str,
    choices: &[T],
    label: fn(T) -> &'static str,
    current: T,
) -> anyhow::Result<T> {
    let labels = choices.iter().map(|choice| label(*choice)).collect::<Vec<_>>();
    let default = choices
        .iter()
        .position(|choice| *choice == current)
        .unwrap_or(0);
    let index = prompter.select(message, &labels, default)?;
    choices
        .get(index)
        .copied()
        .with_context(|| format!("choice {index} is out of range"))
}

/// The session draws on stdout, so machine-readable output cannot share it.
fn ensure_terminal_format(format: OutputFormat) -> anyhow::Result<()> {
    if format != OutputFormat::Table {
        bail!("--interactive only supports --format table; drop --format or run without --interactive");
    }
    Ok(())
}

/// Handle `promptly optimize --interactive`.
pub async fn run(args: &OptimizeArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    ensure_terminal_format(flags.format)?;
    let policy = if args.reanalyze {
        ReanalysisPolicy::Reanalyze
    } else {
        ReanalysisPolicy::KeepAnalysis
    };
    let defaults = option_set(args, &ctx.config);

    let mut prompter = terminal::TerminalPrompter::new()?;
    prompter.banner();

    let mut driver = driver::Driver::new(
        &ctx.client,
        &mut prompter,
        ctx.config.custom_options(),
        ctx.config.output_dir.clone(),
    )
    .with_filename(args.save.clone());
    driver.run(Workflow::new(defaults, policy)).await?;
    Ok(())
}
