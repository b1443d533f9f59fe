use clap::Subcommand;

/// Configuration management.
#[derive(Clone, Debug, Subcommand)]
pub enum ConfigCommands {
    /// Show the effective configuration with the API key masked.
    Show,
    /// Restore every setting to its default.
    Reset,
    /// Change one setting (e.g. `promptly config set model gpt-4o`).
    Set {
        /// Setting name, such as apiKey, baseUrl, model, tone or temperature.
        key: String,
        /// New value.
        value: String,
    },
    /// Print where configuration files are read from.
    Path,
}
