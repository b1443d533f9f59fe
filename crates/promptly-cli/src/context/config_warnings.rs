use promptly_config::{ENV_PREFIX, KEYS, PromptlyConfig, canonical_key};

/// `PROMPTLY_*` variables read by the binary itself rather than the config.
const NON_CONFIG_VARS: [&str; 1] = ["LOG"];

/// Emit warnings for likely mistyped env var keys that silently fell back to defaults.
pub fn warn_unconfigured(config: &PromptlyConfig) {
    for warning in collect_unconfigured_warnings(config, std::env::vars()) {
        tracing::warn!("{warning}");
    }
}

fn collect_unconfigured_warnings<I>(config: &PromptlyConfig, env: I) -> Vec<String>
where
    I: IntoIterator<Item = (String, String)>,
{
    let env = env.into_iter().collect::<Vec<_>>();
    let mut warnings = Vec::new();

    for (key, _) in &env {
        let Some(suffix) = key.strip_prefix(ENV_PREFIX) else {
            continue;
        };
        if canonical_key(suffix).is_none() && !NON_CONFIG_VARS.contains(&suffix) {
            warnings.push(format!(
                "{key} is not a promptly setting and was ignored. Known settings: {}.",
                KEYS.join(", ")
            ));
        }
    }

    let api_key_var_present = env.iter().any(|(key, _)| {
        key == "OPENAI_API_KEY"
            || key
                .strip_prefix(ENV_PREFIX)
                .and_then(canonical_key)
                .is_some_and(|field| field == "apiKey")
    });
    if !config.has_api_key() && api_key_var_present {
        warnings.push(
            "An API key env var is set but empty. Remote calls will fail until it has a value."
                .to_string(),
        );
    }

    warnings
}
