use std::time::Duration;

use anyhow::{anyhow, Context, Result};

use crate::extraction::ExtractionOptions;
use crate::llm_client::{LlmConfig, LlmProvider, DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE};

const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;
const DEFAULT_LLM_TIMEOUT_SECS: u64 = 120;

/// Application configuration loaded from environment variables.
/// Startup fails if the generation backend credentials are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub llm: LlmConfig,
    pub extraction: ExtractionOptions,
    pub max_upload_bytes: usize,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from any key/value source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let provider = match lookup("LLM_PROVIDER") {
            Some(value) => LlmProvider::parse(&value)
                .ok_or_else(|| anyhow!("LLM_PROVIDER must be 'openai' or 'anthropic', got '{value}'"))?,
            None => LlmProvider::OpenAi,
        };

        let provider_key = match provider {
            LlmProvider::OpenAi => "OPENAI_API_KEY",
            LlmProvider::Anthropic => "ANTHROPIC_API_KEY",
        };
        let api_key = lookup("LLM_API_KEY")
            .or_else(|| lookup(provider_key))
            .filter(|key| !key.trim().is_empty())
            .with_context(|| {
                format!("Required environment variable 'LLM_API_KEY' (or '{provider_key}') is not set")
            })?;

        let llm = LlmConfig {
            provider,
            api_key,
            model: lookup("LLM_MODEL").unwrap_or_else(|| provider.default_model().to_string()),
            base_url: lookup("LLM_BASE_URL"),
            temperature: parse_or(&lookup, "LLM_TEMPERATURE", DEFAULT_TEMPERATURE)?,
            max_tokens: parse_or(&lookup, "LLM_MAX_TOKENS", DEFAULT_MAX_TOKENS)?,
            timeout: Duration::from_secs(parse_or(
                &lookup,
                "LLM_TIMEOUT_SECS",
                DEFAULT_LLM_TIMEOUT_SECS,
            )?),
        };

        Ok(Config {
            llm,
            extraction: ExtractionOptions {
                strict_format_check: parse_or(&lookup, "STRICT_FORMAT_CHECK", false)?,
            },
            max_upload_bytes: parse_or(&lookup, "MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES)?,
            port: parse_or(&lookup, "PORT", 8080u16).context("PORT must be a valid port number")?,
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value '{raw}'")),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_follow_openai_backend() {
        let config = Config::from_lookup(lookup_from(&[("OPENAI_API_KEY", "sk-1")])).unwrap();
        assert_eq!(config.llm.provider, LlmProvider::OpenAi);
        assert_eq!(config.llm.api_key, "sk-1");
        assert_eq!(config.llm.model, "gpt-4o-mini");
        assert!((config.llm.temperature - 0.7).abs() < f32::EPSILON);
        assert_eq!(config.max_upload_bytes, 10 * 1024 * 1024);
        assert!(!config.extraction.strict_format_check);
        assert_eq!(config.port, 8080);
        assert_eq!(config.rust_log, "info");
    }

    #[test]
    fn test_missing_api_key_fails() {
        let err = Config::from_lookup(lookup_from(&[])).unwrap_err();
        assert!(err.to_string().contains("LLM_API_KEY"));
    }

    #[test]
    fn test_anthropic_provider_uses_its_own_key_and_model() {
        let config = Config::from_lookup(lookup_from(&[
            ("LLM_PROVIDER", "anthropic"),
            ("ANTHROPIC_API_KEY", "ak-1"),
            ("OPENAI_API_KEY", "sk-ignored"),
        ]))
        .unwrap();
        assert_eq!(config.llm.provider, LlmProvider::Anthropic);
        assert_eq!(config.llm.api_key, "ak-1");
        assert_eq!(config.llm.model, "claude-sonnet-4-5");
    }

    #[test]
    fn test_overrides_are_parsed() {
        let config = Config::from_lookup(lookup_from(&[
            ("LLM_API_KEY", "k"),
            ("LLM_MODEL", "gpt-4o"),
            ("LLM_TEMPERATURE", "0.2"),
            ("LLM_TIMEOUT_SECS", "30"),
            ("STRICT_FORMAT_CHECK", "true"),
            ("MAX_UPLOAD_BYTES", "1024"),
            ("PORT", "9000"),
        ]))
        .unwrap();
        assert_eq!(config.llm.model, "gpt-4o");
        assert!((config.llm.temperature - 0.2).abs() < f32::EPSILON);
        assert_eq!(config.llm.timeout, Duration::from_secs(30));
        assert!(config.extraction.strict_format_check);
        assert_eq!(config.max_upload_bytes, 1024);
        assert_eq!(config.port, 9000);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        assert!(Config::from_lookup(lookup_from(&[("LLM_API_KEY", "k"), ("PORT", "http")])).is_err());
        assert!(
            Config::from_lookup(lookup_from(&[("LLM_API_KEY", "k"), ("LLM_PROVIDER", "gemini")]))
                .is_err()
        );
    }
}
