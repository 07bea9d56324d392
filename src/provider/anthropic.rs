//! Anthropic messages adapter.

use super::{extract_text, require_key, send_json, TextProvider, MAX_TOKENS};
use crate::config::{ProviderConfig, DEFAULT_ANTHROPIC_MODEL, DEFAULT_ANTHROPIC_URL};
use crate::error::ProviderError;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;

const ANTHROPIC_VERSION: &str = "2023-06-01";

pub struct AnthropicProvider {
    client: Client,
    api_key: Option<String>,
    url: String,
    model: String,
}

impl AnthropicProvider {
    pub const NAME: &'static str = "Anthropic";

    pub fn new(config: &ProviderConfig, client: Client) -> Self {
        Self {
            client,
            api_key: config.api_key.clone(),
            url: format!("{}/messages", config.base_url_or(DEFAULT_ANTHROPIC_URL)),
            model: config.model_or(DEFAULT_ANTHROPIC_MODEL).to_string(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl TextProvider for AnthropicProvider {
    fn name(&self) -> &str {
        Self::NAME
    }

    async fn generate(&self, prompt: &str) -> Result<String, ProviderError> {
        let api_key = require_key(Self::NAME, &self.api_key)?;

        let body = json!({
            "model": self.model,
            "max_tokens": MAX_TOKENS,
            "messages": [{"role": "user", "content": prompt}],
        });

        tracing::debug!(model = %self.model, "Calling Anthropic");
        let request = self
            .client
            .post(&self.url)
            .header("x-api-key", api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&body);

        let response = send_json(Self::NAME, request).await?;
        extract_text(Self::NAME, &response, "/content/0/text")
    }
}
