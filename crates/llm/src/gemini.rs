//! Client for Google's generative-language `generateContent` endpoint.

use async_trait::async_trait;
use pipeline::{CompletionError, TextCompletion};
use reqwest::Client;
use tracing::{debug, instrument};

use crate::http::{build_client, decode, transport, GenerationSettings};
use crate::types::{Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig, Part};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// Gemini text completion. The key travels in the `x-goog-api-key` header.
#[derive(Debug)]
pub struct GeminiClient {
    http: Client,
    api_key: String,
    model: String,
    base_url: String,
    settings: GenerationSettings,
}

impl GeminiClient {
    /// Create a client against the public endpoint.
    pub fn new(
        api_key: impl Into<String>,
        model: impl Into<String>,
        settings: GenerationSettings,
    ) -> Result<Self, CompletionError> {
        Self::with_base_url(api_key, model, settings, DEFAULT_BASE_URL)
    }

    /// Create a client with a custom base URL (for testing against a local server).
    pub fn with_base_url(
        api_key: impl Into<String>,
        model: impl Into<String>,
        settings: GenerationSettings,
        base_url: impl Into<String>,
    ) -> Result<Self, CompletionError> {
        let model = model.into();
        Ok(Self {
            http: build_client(settings.timeout)?,
            api_key: api_key.into().trim().to_string(),
            model: if model.trim().is_empty() {
                DEFAULT_MODEL.to_string()
            } else {
                model
            },
            base_url: base_url.into().trim_end_matches('/').to_string(),
            settings,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }
}

#[async_trait]
impl TextCompletion for GeminiClient {
    fn provider(&self) -> &str {
        "gemini"
    }

    fn is_configured(&self) -> bool {
        !self.api_key.is_empty()
    }

    #[instrument(skip(self, prompt), fields(model = %self.model, prompt_len = prompt.len()))]
    async fn complete(&self, prompt: &str) -> Result<String, CompletionError> {
        if !self.is_configured() {
            return Err(CompletionError::MissingCredential(
                "GEMINI_API_KEY not set".into(),
            ));
        }

        let body = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
            generation_config: GenerationConfig {
                temperature: self.settings.temperature,
                max_output_tokens: self.settings.max_output_tokens,
            },
        };

        let response = self
            .http
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(transport)?;

        let decoded: GenerateContentResponse = decode(response).await?;
        let text = decoded.text().ok_or(CompletionError::EmptyResponse)?;
        debug!(response_len = text.len(), "completion received");
        Ok(text)
    }
}
