//! StorySeed text-completion adapters.
//!
//! Implements the [`pipeline::TextCompletion`] trait for two providers:
//!
//! - [`GeminiClient`]: Google's generative-language API, the default.
//! - [`AnthropicClient`]: the Anthropic Messages API.
//!
//! Additional providers are added as new types in this crate without any
//! changes to the `pipeline` crate.
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** HTTP transport, request formatting, response parsing,
//! and status-code mapping live here. The [`pipeline`] crate sees only
//! [`pipeline::TextCompletion`] and [`pipeline::CompletionError`].
//!
//! A client built with an empty API key is valid: it reports
//! `is_configured() == false` and refuses to send anything.

mod anthropic;
mod gemini;
mod http;
mod types;

pub use anthropic::{resolve_model, AnthropicClient};
pub use gemini::GeminiClient;
pub use http::GenerationSettings;
