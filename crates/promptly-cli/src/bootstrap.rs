use anyhow::Context;
use promptly_config::PromptlyConfig;

/// Load the effective configuration once at startup.
///
/// `.env` in the working directory is read first, so its values take part
/// in env layering.
pub fn load_config() -> anyhow::Result<PromptlyConfig> {
    PromptlyConfig::load_with_dotenv().context("failed to load promptly configuration")
}
