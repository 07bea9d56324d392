//! Google Gemini `generateContent` adapter.

use super::{extract_text, require_key, send_json, TextProvider};
use crate::config::{ProviderConfig, DEFAULT_GEMINI_MODEL, DEFAULT_GEMINI_URL};
use crate::error::ProviderError;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;

pub struct GeminiProvider {
    client: Client,
    api_key: Option<String>,
    url: String,
}

impl GeminiProvider {
    pub const NAME: &'static str = "Gemini";

    pub fn new(config: &ProviderConfig, client: Client) -> Self {
        Self {
            client,
            api_key: config.api_key.clone(),
            url: format!(
                "{}/models/{}:generateContent",
                config.base_url_or(DEFAULT_GEMINI_URL),
                config.model_or(DEFAULT_GEMINI_MODEL)
            ),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl TextProvider for GeminiProvider {
    fn name(&self) -> &str {
        Self::NAME
    }

    async fn generate(&self, prompt: &str) -> Result<String, ProviderError> {
        let api_key = require_key(Self::NAME, &self.api_key)?;

        let body = json!({
            "contents": [{"parts": [{"text": prompt}]}],
        });

        tracing::debug!(url = %self.url, "Calling Gemini");
        // Gemini takes the key as a query parameter rather than a header.
        let request = self
            .client
            .post(&self.url)
            .query(&[("key", api_key)])
            .json(&body);

        let response = send_json(Self::NAME, request).await?;
        extract_text(Self::NAME, &response, "/candidates/0/content/parts/0/text")
    }
}
