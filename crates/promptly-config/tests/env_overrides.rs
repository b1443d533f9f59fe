use figment::Jail;
use promptly_config::PromptlyConfig;
use promptly_core::enums::{Length, Tone};

fn load() -> PromptlyConfig {
    PromptlyConfig::from_figment(&PromptlyConfig::figment_with_global(None)).expect("config loads")
}

#[test]
fn prefixed_env_sets_document_keys() {
    Jail::expect_with(|jail| {
        jail.set_env("PROMPTLY_API_KEY", "sk-from-env");
        jail.set_env("PROMPTLY_MODEL_NAME", "gpt-4o");
        jail.set_env("PROMPTLY_RESPONSE_LENGTH", "detailed");
        jail.set_env("PROMPTLY_MAX_TOKENS", "4096");
        jail.set_env("PROMPTLY_TEMPERATURE", "0.1");

        let config = load();
        assert_eq!(config.api_key, "sk-from-env");
        assert_eq!(config.model_name, "gpt-4o");
        assert_eq!(config.response_length, Length::Detailed);
        assert_eq!(config.max_tokens, 4096);
        assert!((config.temperature - 0.1).abs() < f64::EPSILON);
        Ok(())
    });
}

#[test]
fn openai_env_vars_are_read() {
    Jail::expect_with(|jail| {
        jail.set_env("OPENAI_API_KEY", "sk-openai");
        jail.set_env("OPENAI_BASE_URL", "https://proxy.example.com/v1");
        jail.set_env("OPENAI_MODEL", "gpt-3.5-turbo");

        let config = load();
        assert_eq!(config.api_key, "sk-openai");
        assert_eq!(config.base_url, "https://proxy.example.com/v1");
        assert_eq!(config.model_name, "gpt-3.5-turbo");
        Ok(())
    });
}

#[test]
fn prefixed_env_beats_openai_env() {
    Jail::expect_with(|jail| {
        jail.set_env("OPENAI_API_KEY", "sk-openai");
        jail.set_env("PROMPTLY_API_KEY", "sk-promptly");

        assert_eq!(load().api_key, "sk-promptly");
        Ok(())
    });
}

#[test]
fn env_beats_project_file() {
    Jail::expect_with(|jail| {
        std::fs::create_dir_all(".promptly").map_err(|e| e.to_string())?;
        jail.create_file(
            ".promptly/config.json",
            r#"{ "tone": "formal", "apiKey": "sk-file" }"#,
        )?;
        jail.set_env("PROMPTLY_TONE", "casual");

        let config = load();
        assert_eq!(config.tone, Tone::Casual);
        assert_eq!(config.api_key, "sk-file");
        Ok(())
    });
}

#[test]
fn unrelated_prefixed_vars_are_ignored() {
    Jail::expect_with(|jail| {
        jail.set_env("PROMPTLY_LOG", "debug");

        let config = load();
        assert_eq!(config, PromptlyConfig {
            api_key: config.api_key.clone(),
            ..PromptlyConfig::default()
        });
        Ok(())
    });
}
