use std::io::IsTerminal;
use std::sync::OnceLock;

use crate::cli::{ColorMode, GlobalFlags, OutputFormat, ProgressMode};

#[derive(Clone, Copy, Debug)]
pub struct UiPrefs {
    /// Colorize terminal text (session boxes, messages).
    pub color: bool,
    /// Colorize status cells in table output.
    pub table_color: bool,
    pub progress: bool,
    pub term_width: Option<usize>,
}

static UI_PREFS: OnceLock<UiPrefs> = OnceLock::new();

pub fn init(flags: &GlobalFlags) {
    let prefs = resolve(
        flags,
        std::io::stdout().is_terminal(),
        std::io::stderr().is_terminal(),
        std::env::var_os("NO_COLOR").is_some(),
        std::env::var("COLUMNS").ok().as_deref(),
    );
    colored::control::set_override(prefs.color);
    let _ = UI_PREFS.set(prefs);
}

fn resolve(
    flags: &GlobalFlags,
    stdout_tty: bool,
    stderr_tty: bool,
    no_color: bool,
    columns: Option<&str>,
) -> UiPrefs {
    let color = match flags.color {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => stdout_tty && !no_color,
    };
    let table_color = color && flags.format == OutputFormat::Table && !flags.quiet;

    // Spinners draw on stderr.
    let progress = match flags.progress {
        ProgressMode::On => stderr_tty && !flags.quiet,
        ProgressMode::Off => false,
        ProgressMode::Auto => stderr_tty && !flags.quiet && flags.format != OutputFormat::Json,
    };

    let term_width = columns
        .and_then(|value| value.parse::<usize>().ok())
        .filter(|width| *width >= 40);

    UiPrefs {
        color,
        table_color,
        progress,
        term_width,
    }
}

#[must_use]
pub fn prefs() -> UiPrefs {
    *UI_PREFS.get().unwrap_or(&UiPrefs {
        color: false,
        table_color: false,
        progress: false,
        term_width: None,
    })
}
