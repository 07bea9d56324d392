//! Provider adapters for hosted text-generation services.
//!
//! Each adapter turns a prompt into one HTTPS call against its upstream and
//! pulls the generated text out of the provider-specific response envelope.
//! Adapters never retry; fallback policy lives in [`crate::dispatch`].

mod anthropic;
mod gemini;
mod openai;

pub use anthropic::AnthropicProvider;
pub use gemini::GeminiProvider;
pub use openai::OpenAiProvider;

use crate::config::ProvidersConfig;
use crate::error::ProviderError;
use crate::http::create_client;
use crate::logger::preview;
use async_trait::async_trait;
use reqwest::RequestBuilder;
use serde_json::Value;
use std::sync::Arc;

/// Token ceiling sent with every generation request.
pub const MAX_TOKENS: u32 = 1000;

/// Longest upstream body kept in an error message.
const ERROR_BODY_LIMIT: usize = 500;

/// Uniform call contract for an upstream text-generation service.
#[async_trait]
pub trait TextProvider: Send + Sync {
    /// Display name used in logs and error messages.
    fn name(&self) -> &str;

    /// Generate text for a prompt with exactly one upstream call.
    async fn generate(&self, prompt: &str) -> Result<String, ProviderError>;
}

/// Return the configured key or fail without calling upstream.
fn require_key<'a>(provider: &str, api_key: &'a Option<String>) -> Result<&'a str, ProviderError> {
    api_key
        .as_deref()
        .ok_or_else(|| ProviderError::MissingApiKey {
            provider: provider.to_string(),
        })
}

/// Send a prepared request and decode a successful JSON body.
async fn send_json(provider: &str, request: RequestBuilder) -> Result<Value, ProviderError> {
    let response = request
        .send()
        .await
        .map_err(|e| ProviderError::Transport {
            provider: provider.to_string(),
            detail: e.to_string(),
        })?;

    let status = response.status();
    let text = response.text().await.map_err(|e| ProviderError::Transport {
        provider: provider.to_string(),
        detail: e.to_string(),
    })?;

    if !status.is_success() {
        return Err(ProviderError::Upstream {
            provider: provider.to_string(),
            status: status.as_u16(),
            body: preview(&text, ERROR_BODY_LIMIT),
        });
    }

    serde_json::from_str(&text).map_err(|e| ProviderError::InvalidResponse {
        provider: provider.to_string(),
        detail: format!("{} | Response: {}", e, preview(&text, ERROR_BODY_LIMIT)),
    })
}

/// Pull a string out of a response body by JSON pointer.
fn extract_text(provider: &str, body: &Value, pointer: &str) -> Result<String, ProviderError> {
    body.pointer(pointer)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| ProviderError::InvalidResponse {
            provider: provider.to_string(),
            detail: format!(
                "missing {} in {}",
                pointer,
                preview(&body.to_string(), ERROR_BODY_LIMIT)
            ),
        })
}

/// The three hosted providers the relay knows about.
#[derive(Clone)]
pub struct ProviderSet {
    pub openai: Arc<dyn TextProvider>,
    pub gemini: Arc<dyn TextProvider>,
    pub anthropic: Arc<dyn TextProvider>,
}

impl ProviderSet {
    /// Build all adapters from config, sharing one HTTP client.
    pub fn from_config(config: &ProvidersConfig) -> Self {
        let client = create_client();
        Self {
            openai: Arc::new(OpenAiProvider::new(&config.openai, client.clone())),
            gemini: Arc::new(GeminiProvider::new(&config.gemini, client.clone())),
            anthropic: Arc::new(AnthropicProvider::new(&config.anthropic, client)),
        }
    }

    /// Names of providers with an API key, for the startup banner.
    pub fn configured(config: &ProvidersConfig) -> Vec<&'static str> {
        [
            (OpenAiProvider::NAME, &config.openai),
            (GeminiProvider::NAME, &config.gemini),
            (AnthropicProvider::NAME, &config.anthropic),
        ]
        .into_iter()
        .filter(|(_, c)| c.api_key.is_some())
        .map(|(name, _)| name)
        .collect()
    }
}
