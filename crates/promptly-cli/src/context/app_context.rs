use anyhow::Context;
use promptly_config::PromptlyConfig;
use promptly_llm::ChatClient;

/// Shared resources for commands that call the model.
pub struct AppContext {
    pub config: PromptlyConfig,
    pub client: ChatClient,
}

impl AppContext {
    /// Fails before any remote call when no API key is configured.
    pub fn init(config: PromptlyConfig) -> anyhow::Result<Self> {
        config.require_api_key().context(
            "no API key configured. Run 'promptly config' or set PROMPTLY_API_KEY",
        )?;
        let client =
            ChatClient::from_config(&config).context("failed to build chat completion client")?;
        tracing::debug!(
            endpoint = client.endpoint(),
            model = client.model(),
            api_key = %config.masked_api_key(),
            "application context ready"
        );
        Ok(Self { config, client })
    }
}
