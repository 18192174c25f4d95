//! Gemini generative language API provider
//!
//! Posts a single-turn prompt to `v1beta/models/{model}:generateContent`.
//! The API key travels as a query parameter, so errors are stripped of their
//! URL before they reach the logs.

use reqwest::Client as HttpClient;

use crate::{
    config::Config,
    error::{AppError, AppResult},
    models::GenerateContentRequest,
    services::providers::GenerativeTextProvider,
};

#[derive(Clone)]
pub struct GeminiProvider {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
    model: String,
}

impl GeminiProvider {
    pub fn new(http_client: HttpClient, api_key: String, api_url: String, model: String) -> Self {
        Self {
            http_client,
            api_key,
            api_url,
            model,
        }
    }

    /// Creates a provider with a timeout-bounded HTTP client
    pub fn from_config(config: &Config) -> AppResult<Self> {
        let http_client = HttpClient::builder()
            .timeout(config.http_timeout())
            .build()?;

        Ok(Self::new(
            http_client,
            config.gemini_api_key.clone(),
            config.gemini_api_url.clone(),
            config.gemini_model.clone(),
        ))
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.api_url, self.model
        )
    }
}

#[async_trait::async_trait]
impl GenerativeTextProvider for GeminiProvider {
    async fn generate_content(&self, prompt: &str) -> AppResult<String> {
        let response = self
            .http_client
            .post(self.endpoint())
            .query(&[("key", self.api_key.as_str())])
            .json(&GenerateContentRequest::from_prompt(prompt))
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|e| AppError::HttpClient(e.without_url()))?;

        let body = response
            .text()
            .await
            .map_err(|e| AppError::HttpClient(e.without_url()))?;

        tracing::debug!(
            model = %self.model,
            bytes = body.len(),
            provider = "gemini",
            "Content generated"
        );

        Ok(body)
    }

    fn name(&self) -> &'static str {
        "gemini"
    }
}
