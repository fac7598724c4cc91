//! Transport helpers shared by both providers.

use std::time::Duration;

use pipeline::CompletionError;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;

/// Sampling and transport knobs applied to every request.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationSettings {
    pub temperature: f32,
    pub max_output_tokens: u32,
    /// Whole-request timeout on the HTTP client.
    pub timeout: Duration,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            max_output_tokens: 2048,
            timeout: Duration::from_secs(60),
        }
    }
}

pub(crate) fn build_client(timeout: Duration) -> Result<Client, CompletionError> {
    Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| CompletionError::Http(format!("could not build HTTP client: {e}")))
}

pub(crate) fn transport(err: reqwest::Error) -> CompletionError {
    CompletionError::Http(err.to_string())
}

/// Maps 429 and other non-success statuses onto [`CompletionError`], then
/// decodes the body.
pub(crate) async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, CompletionError> {
    let status = response.status().as_u16();

    if status == 429 {
        let retry_after = response
            .headers()
            .get("retry-after")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.trim().parse::<u64>().ok());
        return Err(CompletionError::RateLimited { retry_after });
    }

    if status >= 400 {
        let message = response.text().await.unwrap_or_else(|_| "(no body)".into());
        return Err(CompletionError::Api { status, message });
    }

    response
        .json()
        .await
        .map_err(|e| CompletionError::MalformedResponse(e.to_string()))
}
