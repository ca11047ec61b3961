//! LLM Client — the single point of entry for text generation calls.
//!
//! ARCHITECTURAL RULE: No other module may call a generation provider directly.
//! Handlers hold an `Arc<dyn CompletionBackend>` built once at startup from `LlmConfig`.
//!
//! One prompt in, one completion out. No retries: a failed call is reported to the user.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;

mod anthropic;
#[cfg(test)]
pub mod mock;
mod openai;

pub use anthropic::AnthropicClient;
pub use openai::OpenAiClient;

pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_ANTHROPIC_MODEL: &str = "claude-sonnet-4-5";
pub const DEFAULT_TEMPERATURE: f32 = 0.7;
pub const DEFAULT_MAX_TOKENS: u32 = 4096;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("LLM returned empty content")]
    EmptyContent,
}

/// A text-generation service: send one prompt, get one completion.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    async fn complete(&self, prompt: &str, system: &str) -> Result<String, LlmError>;

    /// Model identifier, reported back to clients alongside the generated text.
    fn model(&self) -> &str;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LlmProvider {
    OpenAi,
    Anthropic,
}

impl LlmProvider {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "openai" => Some(Self::OpenAi),
            "anthropic" => Some(Self::Anthropic),
            _ => None,
        }
    }

    pub fn default_model(self) -> &'static str {
        match self {
            Self::OpenAi => DEFAULT_OPENAI_MODEL,
            Self::Anthropic => DEFAULT_ANTHROPIC_MODEL,
        }
    }
}

/// Everything needed to talk to the generation backend. Built from the
/// environment at startup and handed to the client explicitly.
#[derive(Clone)]
pub struct LlmConfig {
    pub provider: LlmProvider,
    pub api_key: String,
    pub model: String,
    /// Overrides the provider's public endpoint (proxies, compatible servers, tests).
    pub base_url: Option<String>,
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout: Duration,
}

impl std::fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmConfig")
            .field("provider", &self.provider)
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Builds the configured backend.
pub fn build_backend(config: &LlmConfig) -> Result<Arc<dyn CompletionBackend>, LlmError> {
    let backend: Arc<dyn CompletionBackend> = match config.provider {
        LlmProvider::OpenAi => Arc::new(OpenAiClient::new(config)?),
        LlmProvider::Anthropic => Arc::new(AnthropicClient::new(config)?),
    };
    Ok(backend)
}

fn http_client(timeout: Duration) -> Result<Client, LlmError> {
    Ok(Client::builder().timeout(timeout).build()?)
}

// Both providers wrap failures as {"error": {"message": "..."}}.
#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

fn api_error(status: reqwest::StatusCode, body: String) -> LlmError {
    let message = serde_json::from_str::<ApiErrorEnvelope>(&body)
        .map(|e| e.error.message)
        .unwrap_or(body);
    LlmError::Api {
        status: status.as_u16(),
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_parse_is_case_insensitive() {
        assert_eq!(LlmProvider::parse("OpenAI"), Some(LlmProvider::OpenAi));
        assert_eq!(LlmProvider::parse(" anthropic "), Some(LlmProvider::Anthropic));
        assert_eq!(LlmProvider::parse("gemini"), None);
    }

    #[test]
    fn test_api_error_prefers_structured_message() {
        let body = r#"{"error": {"message": "Incorrect API key provided", "type": "invalid_request_error"}}"#;
        match api_error(reqwest::StatusCode::UNAUTHORIZED, body.to_string()) {
            LlmError::Api { status, message } => {
                assert_eq!(status, 401);
                assert_eq!(message, "Incorrect API key provided");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_api_error_falls_back_to_raw_body() {
        match api_error(reqwest::StatusCode::BAD_GATEWAY, "upstream down".to_string()) {
            LlmError::Api { message, .. } => assert_eq!(message, "upstream down"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_config_debug_redacts_key() {
        let config = LlmConfig {
            provider: LlmProvider::OpenAi,
            api_key: "sk-secret".to_string(),
            model: DEFAULT_OPENAI_MODEL.to_string(),
            base_url: None,
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
            timeout: Duration::from_secs(5),
        };
        let printed = format!("{config:?}");
        assert!(!printed.contains("sk-secret"));
        assert!(printed.contains("gpt-4o-mini"));
    }

    #[test]
    fn test_build_backend_reports_configured_model() {
        let config = LlmConfig {
            provider: LlmProvider::Anthropic,
            api_key: "key".to_string(),
            model: "claude-test".to_string(),
            base_url: None,
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
            timeout: Duration::from_secs(5),
        };
        let backend = build_backend(&config).unwrap();
        assert_eq!(backend.model(), "claude-test");
    }
}
