//! # promptly-config
//!
//! Layered configuration loading for promptly using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. `PROMPTLY_*` environment variables (`PROMPTLY_API_KEY`, `PROMPTLY_MODEL_NAME`, ...)
//! 2. `OPENAI_API_KEY`, `OPENAI_BASE_URL` and `OPENAI_MODEL`
//! 3. Project-level `.promptly/config.json`
//! 4. User-level `~/.config/promptly/config.json`
//! 5. Built-in defaults
//!
//! The persisted document is a flat JSON object with camelCase keys. Env var
//! names are snake case and are mapped onto those keys, so
//! `PROMPTLY_MAX_TOKENS` sets `maxTokens`.
//!
//! # Usage
//!
//! ```no_run
//! use promptly_config::PromptlyConfig;
//!
//! let config = PromptlyConfig::load_with_dotenv().expect("config");
//! let api_key = config.require_api_key().expect("api key");
//! println!("{} via {}", config.model_name, config.base_url);
//! # let _ = api_key;
//! ```

mod error;
mod store;

pub use error::ConfigError;
pub use store::{KEYS, canonical_key, mask_secret};

use figment::{
    Figment,
    providers::{Env, Format as _, Json, Serialized},
    value::{Uncased, UncasedStr},
};
use promptly_core::entities::CustomOptions;
use promptly_core::enums::{Complexity, Format, Length, Tone};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4";
pub const DEFAULT_OUTPUT_DIR: &str = "output_prompt";
pub const ENV_PREFIX: &str = "PROMPTLY_";

const LEGACY_ENV_KEYS: [&str; 3] = ["OPENAI_API_KEY", "OPENAI_BASE_URL", "OPENAI_MODEL"];

const fn default_temperature() -> f64 {
    0.7
}

const fn default_max_tokens() -> u32 {
    2048
}

const fn default_timeout_secs() -> u64 {
    120
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(DEFAULT_OUTPUT_DIR)
}

/// Resolved promptly settings.
///
/// Loaded once at startup and passed by reference to every component.
#[derive(Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptlyConfig {
    /// Bearer token for the chat-completion endpoint. Empty when unset.
    #[serde(default)]
    pub api_key: String,

    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_model")]
    pub model_name: String,

    #[serde(default)]
    pub tone: Tone,

    #[serde(default)]
    pub response_length: Length,

    #[serde(default)]
    pub complexity_level: Complexity,

    #[serde(default)]
    pub output_format: Format,

    #[serde(default = "default_temperature")]
    pub temperature: f64,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Per-request timeout for chat-completion calls.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Directory saved prompts are written to, relative to the working directory.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

impl Default for PromptlyConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: default_base_url(),
            model_name: default_model(),
            tone: Tone::default(),
            response_length: Length::default(),
            complexity_level: Complexity::default(),
            output_format: Format::default(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            timeout_secs: default_timeout_secs(),
            output_dir: default_output_dir(),
        }
    }
}

impl fmt::Debug for PromptlyConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PromptlyConfig")
            .field("api_key", &self.masked_api_key())
            .field("base_url", &self.base_url)
            .field("model_name", &self.model_name)
            .field("tone", &self.tone)
            .field("response_length", &self.response_length)
            .field("complexity_level", &self.complexity_level)
            .field("output_format", &self.output_format)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("timeout_secs", &self.timeout_secs)
            .field("output_dir", &self.output_dir)
            .finish()
    }
}

impl PromptlyConfig {
    /// Load configuration from all sources (JSON files + environment variables).
    ///
    /// Does NOT call `dotenvy`. Use [`Self::load_with_dotenv`] for `.env` support.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Figment`] when a source cannot be parsed and
    /// [`ConfigError::InvalidValue`] when a value is out of range.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_figment(&Self::figment())
    }

    /// Load configuration after reading `.env` from the working directory.
    ///
    /// # Errors
    ///
    /// Same as [`Self::load`].
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        // A missing .env is not an error.
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!(path = %path.display(), "loaded .env");
        }
        Self::load()
    }

    /// Build the full provider chain using the user-level config file.
    #[must_use]
    pub fn figment() -> Figment {
        Self::figment_with_global(Self::global_config_path().as_deref())
    }

    /// Build the provider chain with an explicit user-level config file.
    ///
    /// Files that do not exist are skipped.
    #[must_use]
    pub fn figment_with_global(global_path: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Layer 1: user-global config
        if let Some(path) = global_path.filter(|path| path.exists()) {
            figment = figment.merge(Json::file(path));
        }

        // Layer 2: project-local config
        let local_path = Self::local_config_path();
        if local_path.exists() {
            figment = figment.merge(Json::file(local_path));
        }

        // Layer 3: OpenAI-style env vars
        figment = figment.merge(
            Env::raw()
                .only(&LEGACY_ENV_KEYS)
                .map(legacy_env_key)
                .lowercase(false),
        );

        // Layer 4: PROMPTLY_* env vars (highest priority)
        figment.merge(Env::prefixed(ENV_PREFIX).map(env_key).lowercase(false))
    }

    /// Extract and validate a config from an arbitrary figment.
    ///
    /// # Errors
    ///
    /// Same as [`Self::load`].
    pub fn from_figment(figment: &Figment) -> Result<Self, ConfigError> {
        let config: Self = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Load only the persisted document at `path`, without env layering.
    ///
    /// Used by configuration commands so env values never get written back
    /// to disk.
    ///
    /// # Errors
    ///
    /// Same as [`Self::load`].
    pub fn load_file(path: &Path) -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        if path.exists() {
            figment = figment.merge(Json::file(path));
        }
        Self::from_figment(&figment)
    }

    /// Path to the user-global config file.
    #[must_use]
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("promptly").join("config.json"))
    }

    /// Path to the project-local config file, relative to the working directory.
    #[must_use]
    pub fn local_config_path() -> PathBuf {
        PathBuf::from(".promptly").join("config.json")
    }

    /// Whether an API key is available.
    #[must_use]
    pub fn has_api_key(&self) -> bool {
        !self.api_key.trim().is_empty()
    }

    /// The API key, or [`ConfigError::NotConfigured`] when it is unset.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotConfigured`] when no key is set.
    pub fn require_api_key(&self) -> Result<&str, ConfigError> {
        if self.has_api_key() {
            Ok(self.api_key.trim())
        } else {
            Err(ConfigError::NotConfigured {
                section: "apiKey".into(),
            })
        }
    }

    /// The API key with all but its first and last three characters hidden.
    #[must_use]
    pub fn masked_api_key(&self) -> String {
        if self.has_api_key() {
            mask_secret(&self.api_key)
        } else {
            "(not set)".into()
        }
    }

    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Custom option defaults taken from the configured tone, length,
    /// complexity and format.
    #[must_use]
    pub fn custom_options(&self) -> CustomOptions {
        CustomOptions {
            tone: self.tone,
            length: self.response_length,
            complexity: self.complexity_level,
            format: self.output_format,
            additional_instructions: None,
        }
    }

    /// Check value ranges that the type system cannot express.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] naming the first bad field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        store::validate_base_url(&self.base_url)?;
        store::validate_temperature(self.temperature)?;
        if self.model_name.trim().is_empty() {
            return Err(ConfigError::invalid("modelName", "must not be empty"));
        }
        if self.max_tokens == 0 {
            return Err(ConfigError::invalid("maxTokens", "must be greater than 0"));
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::invalid("timeoutSecs", "must be greater than 0"));
        }
        Ok(())
    }
}

/// Map a `PROMPTLY_*` suffix onto a document key.
fn env_key(key: &UncasedStr) -> Uncased<'_> {
    match store::canonical_key(key.as_str()) {
        Some(mapped) => mapped.into(),
        None => key.as_str().into(),
    }
}

fn legacy_env_key(key: &UncasedStr) -> Uncased<'_> {
    let raw = key.as_str();
    if raw.eq_ignore_ascii_case("OPENAI_API_KEY") {
        "apiKey".into()
    } else if raw.eq_ignore_ascii_case("OPENAI_BASE_URL") {
        "baseUrl".into()
    } else if raw.eq_ignore_ascii_case("OPENAI_MODEL") {
        "modelName".into()
    } else {
        raw.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_correct() {
        let config = PromptlyConfig::default();
        assert!(!config.has_api_key());
        assert_eq!(config.base_url, "https://api.openai.com/v1");
        assert_eq!(config.model_name, "gpt-4");
        assert_eq!(config.tone, Tone::Neutral);
        assert_eq!(config.response_length, Length::Medium);
        assert_eq!(config.complexity_level, Complexity::Intermediate);
        assert_eq!(config.output_format, Format::Narrative);
        assert!((config.temperature - 0.7).abs() < f64::EPSILON);
        assert_eq!(config.max_tokens, 2048);
        assert_eq!(config.timeout(), Duration::from_secs(120));
        assert_eq!(config.output_dir, PathBuf::from("output_prompt"));
    }

    #[test]
    fn figment_builds_without_files() {
        let figment = PromptlyConfig::figment_with_global(None);
        let config = PromptlyConfig::from_figment(&figment).expect("should extract defaults");
        assert_eq!(config.max_tokens, 2048);
    }

    #[test]
    fn missing_api_key_is_not_configured() {
        let err = PromptlyConfig::default().require_api_key().unwrap_err();
        assert!(matches!(err, ConfigError::NotConfigured { section } if section == "apiKey"));
    }

    #[test]
    fn debug_output_masks_api_key() {
        let config = PromptlyConfig {
            api_key: "sk-supersecretvalue".into(),
            ..PromptlyConfig::default()
        };
        let debug = format!("{config:?}");
        assert!(!debug.contains("supersecret"));
        assert!(debug.contains("sk-"));
    }

    #[test]
    fn custom_options_follow_configured_defaults() {
        let config = PromptlyConfig {
            tone: Tone::Formal,
            output_format: Format::Bullet,
            ..PromptlyConfig::default()
        };
        let options = config.custom_options();
        assert_eq!(options.tone, Tone::Formal);
        assert_eq!(options.format, Format::Bullet);
        assert_eq!(options.length, Length::Medium);
        assert!(options.additional_instructions.is_none());
    }
}
