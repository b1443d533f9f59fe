//! Persisted settings document: key lookup, typed updates, and atomic writes.

use std::fs;
use std::path::{Path, PathBuf};

use promptly_core::enums::{Complexity, Format, Length, Tone};

use crate::{ConfigError, PromptlyConfig};

/// Document keys in display order.
pub const KEYS: [&str; 11] = [
    "apiKey",
    "baseUrl",
    "modelName",
    "tone",
    "responseLength",
    "complexityLevel",
    "outputFormat",
    "temperature",
    "maxTokens",
    "timeoutSecs",
    "outputDir",
];

const TEMPERATURE_RANGE: std::ops::RangeInclusive<f64> = 0.0..=2.0;

/// Resolve a user-supplied key to its document key.
///
/// Case, `_` and `-` are ignored, so `max_tokens`, `MAX-TOKENS` and
/// `maxTokens` all resolve to `maxTokens`. Short aliases (`model`, `length`,
/// `complexity`, `format`, `timeout`) are accepted too.
#[must_use]
pub fn canonical_key(key: &str) -> Option<&'static str> {
    let folded: String = key
        .chars()
        .filter(|c| *c != '_' && *c != '-')
        .map(|c| c.to_ascii_lowercase())
        .collect();
    let key = match folded.as_str() {
        "apikey" => "apiKey",
        "baseurl" => "baseUrl",
        "modelname" | "model" => "modelName",
        "tone" => "tone",
        "responselength" | "length" => "responseLength",
        "complexitylevel" | "complexity" => "complexityLevel",
        "outputformat" | "format" => "outputFormat",
        "temperature" => "temperature",
        "maxtokens" => "maxTokens",
        "timeoutsecs" | "timeout" => "timeoutSecs",
        "outputdir" => "outputDir",
        _ => return None,
    };
    Some(key)
}

/// Hide all but the first and last three characters.
///
/// Secrets of six characters or fewer are hidden entirely.
#[must_use]
pub fn mask_secret(secret: &str) -> String {
    let chars: Vec<char> = secret.trim().chars().collect();
    if chars.len() <= 6 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..3].iter().collect();
    let tail: String = chars[chars.len() - 3..].iter().collect();
    format!("{head}{}{tail}", "*".repeat(chars.len() - 6))
}

pub(crate) fn validate_base_url(url: &str) -> Result<(), ConfigError> {
    let url = url.trim();
    if url.starts_with("http://") || url.starts_with("https://") {
        Ok(())
    } else {
        Err(ConfigError::invalid(
            "baseUrl",
            format!("'{url}' must start with http:// or https://"),
        ))
    }
}

pub(crate) fn validate_temperature(temperature: f64) -> Result<(), ConfigError> {
    if TEMPERATURE_RANGE.contains(&temperature) {
        Ok(())
    } else {
        Err(ConfigError::invalid(
            "temperature",
            format!("{temperature} is outside 0.0..=2.0"),
        ))
    }
}

fn parse_choice<T>(
    field: &str,
    value: &str,
    parse: fn(&str) -> Option<T>,
    all: &[&str],
) -> Result<T, ConfigError> {
    parse(value).ok_or_else(|| {
        ConfigError::invalid(field, format!("'{value}' is not one of: {}", all.join(", ")))
    })
}

fn parse_positive<T>(field: &str, value: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr + PartialEq + Default,
{
    let parsed: T = value
        .trim()
        .parse()
        .map_err(|_| ConfigError::invalid(field, format!("'{value}' is not a positive integer")))?;
    if parsed == T::default() {
        return Err(ConfigError::invalid(field, "must be greater than 0"));
    }
    Ok(parsed)
}

impl PromptlyConfig {
    /// Update one setting from its string form.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] for unknown keys and for values
    /// that do not parse or are out of range. The config is unchanged on error.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let Some(field) = canonical_key(key) else {
            return Err(ConfigError::invalid(
                key,
                format!("unknown key, expected one of: {}", KEYS.join(", ")),
            ));
        };
        let value = value.trim();
        match field {
            "apiKey" => self.api_key = value.to_string(),
            "baseUrl" => {
                validate_base_url(value)?;
                self.base_url = value.trim_end_matches('/').to_string();
            }
            "modelName" => {
                if value.is_empty() {
                    return Err(ConfigError::invalid(field, "must not be empty"));
                }
                self.model_name = value.to_string();
            }
            "tone" => {
                self.tone =
                    parse_choice(field, value, Tone::from_key, &Tone::ALL.map(Tone::as_str))?;
            }
            "responseLength" => {
                self.response_length =
                    parse_choice(field, value, Length::from_key, &Length::ALL.map(Length::as_str))?;
            }
            "complexityLevel" => {
                self.complexity_level = parse_choice(
                    field,
                    value,
                    Complexity::from_key,
                    &Complexity::ALL.map(Complexity::as_str),
                )?;
            }
            "outputFormat" => {
                self.output_format =
                    parse_choice(field, value, Format::from_key, &Format::ALL.map(Format::as_str))?;
            }
            "temperature" => {
                let temperature: f64 = value.parse().map_err(|_| {
                    ConfigError::invalid(field, format!("'{value}' is not a number"))
                })?;
                validate_temperature(temperature)?;
                self.temperature = temperature;
            }
            "maxTokens" => self.max_tokens = parse_positive(field, value)?,
            "timeoutSecs" => self.timeout_secs = parse_positive(field, value)?,
            "outputDir" => {
                if value.is_empty() {
                    return Err(ConfigError::invalid(field, "must not be empty"));
                }
                self.output_dir = PathBuf::from(value);
            }
            _ => return Err(ConfigError::invalid(field, "not settable")),
        }
        Ok(())
    }

    /// Current value of a setting in display form. The API key is masked.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<String> {
        let value = match canonical_key(key)? {
            "apiKey" => self.masked_api_key(),
            "baseUrl" => self.base_url.clone(),
            "modelName" => self.model_name.clone(),
            "tone" => self.tone.to_string(),
            "responseLength" => self.response_length.to_string(),
            "complexityLevel" => self.complexity_level.to_string(),
            "outputFormat" => self.output_format.to_string(),
            "temperature" => self.temperature.to_string(),
            "maxTokens" => self.max_tokens.to_string(),
            "timeoutSecs" => self.timeout_secs.to_string(),
            "outputDir" => self.output_dir.display().to_string(),
            _ => return None,
        };
        Some(value)
    }

    /// Every setting as `(key, display value)` pairs in [`KEYS`] order.
    #[must_use]
    pub fn entries(&self) -> Vec<(&'static str, String)> {
        KEYS.iter()
            .filter_map(|key| self.get(key).map(|value| (*key, value)))
            .collect()
    }

    /// Restore every setting to its default.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Write the whole document to `path`, replacing any previous content.
    ///
    /// The document is written to a sibling temp file first and renamed into
    /// place, so readers never observe a partial write.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] or [`ConfigError::Json`] on failure.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        if let Err(error) = fs::rename(&tmp, path) {
            let _ = fs::remove_file(&tmp);
            return Err(error.into());
        }
        tracing::debug!(path = %path.display(), "saved config");
        Ok(())
    }

    /// Write the whole document to the user-global config file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotConfigured`] when the platform has no config
    /// directory, otherwise the errors of [`Self::save_to`].
    pub fn save(&self) -> Result<PathBuf, ConfigError> {
        let path = Self::global_config_path().ok_or_else(|| ConfigError::NotConfigured {
            section: "config directory".into(),
        })?;
        self.save_to(&path)?;
        Ok(path)
    }
}
