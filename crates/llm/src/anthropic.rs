//! Client for the Anthropic Messages API.

use async_trait::async_trait;
use pipeline::{CompletionError, TextCompletion};
use reqwest::Client;
use tracing::{debug, instrument};

use crate::http::{build_client, decode, transport, GenerationSettings};
use crate::types::{Message, MessagesRequest, MessagesResponse};

pub const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
const API_VERSION: &str = "2023-06-01";

/// Resolve model aliases to full Anthropic model IDs.
pub fn resolve_model(alias: &str) -> &str {
    match alias {
        "" | "sonnet" => "claude-sonnet-4-5",
        "opus" => "claude-opus-4-1",
        "haiku" => "claude-haiku-4-5",
        _ => alias,
    }
}

/// Anthropic text completion. Each prompt is sent as a single user message.
#[derive(Debug)]
pub struct AnthropicClient {
    http: Client,
    api_key: String,
    model: String,
    base_url: String,
    settings: GenerationSettings,
}

impl AnthropicClient {
    /// Create a client with the default base URL. `model` may be an alias.
    pub fn new(
        api_key: impl Into<String>,
        model: &str,
        settings: GenerationSettings,
    ) -> Result<Self, CompletionError> {
        Self::with_base_url(api_key, model, settings, DEFAULT_BASE_URL)
    }

    /// Create a client with a custom base URL (for testing with mock servers).
    pub fn with_base_url(
        api_key: impl Into<String>,
        model: &str,
        settings: GenerationSettings,
        base_url: impl Into<String>,
    ) -> Result<Self, CompletionError> {
        Ok(Self {
            http: build_client(settings.timeout)?,
            api_key: api_key.into().trim().to_string(),
            model: resolve_model(model.trim()).to_string(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            settings,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl TextCompletion for AnthropicClient {
    fn provider(&self) -> &str {
        "anthropic"
    }

    fn is_configured(&self) -> bool {
        !self.api_key.is_empty()
    }

    #[instrument(skip(self, prompt), fields(model = %self.model, prompt_len = prompt.len()))]
    async fn complete(&self, prompt: &str) -> Result<String, CompletionError> {
        if !self.is_configured() {
            return Err(CompletionError::MissingCredential(
                "ANTHROPIC_API_KEY not set".into(),
            ));
        }

        let request = MessagesRequest {
            model: &self.model,
            max_tokens: self.settings.max_output_tokens,
            messages: vec![Message {
                role: "user",
                content: prompt,
            }],
            temperature: Some(self.settings.temperature),
        };

        let response = self
            .http
            .post(format!("{}/v1/messages", self.base_url))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .json(&request)
            .send()
            .await
            .map_err(transport)?;

        let decoded: MessagesResponse = decode(response).await?;
        if decoded.stop_reason.as_deref() == Some("max_tokens") {
            debug!("completion truncated at max_tokens");
        }
        decoded
            .text()
            .map(str::to_string)
            .ok_or(CompletionError::EmptyResponse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_model_aliases() {
        assert_eq!(resolve_model("sonnet"), "claude-sonnet-4-5");
        assert_eq!(resolve_model(""), "claude-sonnet-4-5");
        assert_eq!(resolve_model("haiku"), "claude-haiku-4-5");
        assert_eq!(resolve_model("claude-3-5-haiku-latest"), "claude-3-5-haiku-latest");
    }

    #[test]
    fn client_resolves_alias_and_trims_key() {
        let client = AnthropicClient::new(" key ", "opus", GenerationSettings::default()).unwrap();
        assert_eq!(client.model(), "claude-opus-4-1");
        assert_eq!(client.api_key, "key");
        assert_eq!(client.base_url, DEFAULT_BASE_URL);
        assert!(client.is_configured());
    }

    #[tokio::test]
    async fn missing_key_sends_nothing() {
        let client = AnthropicClient::new("", "haiku", GenerationSettings::default()).unwrap();
        assert!(!client.is_configured());
        let err = client.complete("prompt").await.unwrap_err();
        assert!(matches!(err, CompletionError::MissingCredential(_)));
    }
}
