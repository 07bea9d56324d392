//! OpenAI chat completions adapter.

use super::{extract_text, require_key, send_json, TextProvider, MAX_TOKENS};
use crate::config::{ProviderConfig, DEFAULT_OPENAI_MODEL, DEFAULT_OPENAI_URL};
use crate::error::ProviderError;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;

pub struct OpenAiProvider {
    client: Client,
    api_key: Option<String>,
    url: String,
    model: String,
}

impl OpenAiProvider {
    pub const NAME: &'static str = "OpenAI";

    pub fn new(config: &ProviderConfig, client: Client) -> Self {
        Self {
            client,
            api_key: config.api_key.clone(),
            url: format!("{}/chat/completions", config.base_url_or(DEFAULT_OPENAI_URL)),
            model: config.model_or(DEFAULT_OPENAI_MODEL).to_string(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl TextProvider for OpenAiProvider {
    fn name(&self) -> &str {
        Self::NAME
    }

    async fn generate(&self, prompt: &str) -> Result<String, ProviderError> {
        let api_key = require_key(Self::NAME, &self.api_key)?;

        let body = json!({
            "model": self.model,
            "messages": [{"role": "user", "content": prompt}],
            "max_tokens": MAX_TOKENS,
        });

        tracing::debug!(model = %self.model, "Calling OpenAI");
        let request = self
            .client
            .post(&self.url)
            .bearer_auth(api_key)
            .json(&body);

        let response = send_json(Self::NAME, request).await?;
        extract_text(Self::NAME, &response, "/choices/0/message/content")
    }
}
