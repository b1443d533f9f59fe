//! OpenAI-compatible chat-completion client.

use std::future::Future;
use std::time::Duration;

use promptly_config::PromptlyConfig;
use serde::{Deserialize, Serialize};

use crate::error::LlmError;
use crate::http::check_response;

/// Author of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// Transport for one chat-completion round trip.
///
/// Implemented by [`ChatClient`] for real traffic. The analyzer and
/// optimizer are generic over it so they can run against scripted replies.
pub trait CompletionBackend: Send + Sync {
    /// Send `messages` and return the first choice's content, trimmed.
    fn complete(
        &self,
        messages: Vec<ChatMessage>,
    ) -> impl Future<Output = Result<String, LlmError>> + Send;
}

/// Connection and sampling settings for [`ChatClient`].
#[derive(Clone)]
pub struct ChatSettings {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
    pub temperature: f64,
    pub max_tokens: u32,
    pub timeout: Duration,
}

impl ChatSettings {
    #[must_use]
    pub fn from_config(config: &PromptlyConfig) -> Self {
        Self {
            base_url: config.base_url.clone(),
            api_key: config.api_key.trim().to_string(),
            model: config.model_name.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            timeout: config.timeout(),
        }
    }
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f64,
    max_tokens: u32,
}

#[derive(Deserialize)]
struct CompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ReplyMessage,
}

#[derive(Deserialize)]
struct ReplyMessage {
    #[serde(default)]
    content: Option<String>,
}

/// HTTP client for `POST <base_url>/chat/completions`.
pub struct ChatClient {
    http: reqwest::Client,
    endpoint: String,
    settings: ChatSettings,
}

impl ChatClient {
    /// Build a client with the request timeout from `settings`.
    ///
    /// # Errors
    ///
    /// Returns [`LlmError::Http`] if the underlying `reqwest::Client` fails to build.
    pub fn new(settings: ChatSettings) -> Result<Self, LlmError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("promptly/", env!("CARGO_PKG_VERSION")))
            .timeout(settings.timeout)
            .build()?;
        let endpoint = format!("{}/chat/completions", settings.base_url.trim_end_matches('/'));
        Ok(Self {
            http,
            endpoint,
            settings,
        })
    }

    /// # Errors
    ///
    /// Same as [`Self::new`].
    pub fn from_config(config: &PromptlyConfig) -> Result<Self, LlmError> {
        Self::new(ChatSettings::from_config(config))
    }

    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    #[must_use]
    pub fn model(&self) -> &str {
        &self.settings.model
    }
}

impl CompletionBackend for ChatClient {
    async fn complete(&self, messages: Vec<ChatMessage>) -> Result<String, LlmError> {
        let body = CompletionRequest {
            model: &self.settings.model,
            messages: &messages,
            temperature: self.settings.temperature,
            max_tokens: self.settings.max_tokens,
        };
        tracing::debug!(
            endpoint = %self.endpoint,
            model = %self.settings.model,
            messages = messages.len(),
            "sending chat completion"
        );

        let resp = check_response(
            self.http
                .post(&self.endpoint)
                .bearer_auth(&self.settings.api_key)
                .json(&body)
                .send()
                .await?,
        )
        .await?;

        let text = resp.text().await?;
        let data: CompletionResponse = serde_json::from_str(&text)
            .map_err(|e| LlmError::malformed(format!("unexpected completion body: {e}")))?;
        let content = data
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| LlmError::malformed("response contained no choices"))?
            .message
            .content
            .unwrap_or_default();
        Ok(content.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roles_serialize_lowercase() {
        let json = serde_json::to_value(ChatMessage::system("be brief")).unwrap();
        assert_eq!(json["role"], "system");
        assert_eq!(json["content"], "be brief");
    }

    #[test]
    fn endpoint_ignores_trailing_slash() {
        let config = PromptlyConfig {
            base_url: "http://localhost:1234/v1/".into(),
            ..PromptlyConfig::default()
        };
        let client = ChatClient::from_config(&config).unwrap();
        assert_eq!(client.endpoint(), "http://localhost:1234/v1/chat/completions");
        assert_eq!(client.model(), "gpt-4");
    }
}
