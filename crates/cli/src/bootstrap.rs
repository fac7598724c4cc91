//! Composition root: turns an [`AppConfig`] into a signed-in [`CoWriter`].

use std::sync::Arc;

use anyhow::Context;
use cowriter::{CoWriter, Collaborators};
use llm::{AnthropicClient, GeminiClient, GenerationSettings};
use pipeline::{IdentityProvider, StoreError, TextCompletion};
use store::{
    DirectoryExport, Fallback, LocalNoteStore, MemoryArticleRepository, MemorySeedRepository,
    SupabaseArticles, SupabaseClient, SupabaseNotes, SupabaseSeeds, SupabaseSettings,
};
use tracing::{info, warn};

use crate::config::{AppConfig, Provider};
use crate::identity::ConfiguredIdentity;

pub fn completion(config: &AppConfig) -> anyhow::Result<Arc<dyn TextCompletion>> {
    let llm = &config.llm;
    let settings = GenerationSettings {
        temperature: llm.temperature,
        max_output_tokens: llm.max_output_tokens,
        timeout: llm.timeout(),
    };
    let client: Arc<dyn TextCompletion> = match llm.provider {
        Provider::Gemini => Arc::new(
            GeminiClient::new(llm.api_key.as_str(), llm.model.as_str(), settings)
                .context("failed to build Gemini client")?,
        ),
        Provider::Anthropic => Arc::new(
            AnthropicClient::new(llm.api_key.as_str(), &llm.model, settings)
                .context("failed to build Anthropic client")?,
        ),
    };
    Ok(client)
}

/// The shared remote client, or `None` when storage is not configured.
fn remote_store(config: &AppConfig) -> anyhow::Result<Option<Arc<SupabaseClient>>> {
    let storage = &config.storage;
    if !storage.is_configured() {
        return Ok(None);
    }
    let settings = SupabaseSettings {
        url: storage.url.clone(),
        anon_key: storage.anon_key.clone(),
        access_token: storage.access_token.clone(),
        timeout: storage.timeout(),
    };
    match SupabaseClient::new(settings) {
        Ok(client) => Ok(Some(Arc::new(client))),
        Err(StoreError::NotConfigured) => Ok(None),
        Err(err) => Err(err).context("failed to build storage client"),
    }
}

pub fn collaborators(config: &AppConfig) -> anyhow::Result<Collaborators> {
    let remote = remote_store(config)?;
    let storage_configured = remote.is_some();

    let seeds = Fallback::new(
        remote.clone().map(SupabaseSeeds),
        MemorySeedRepository::with_demo_data(),
    );
    let articles = Fallback::new(
        remote.clone().map(SupabaseArticles),
        MemoryArticleRepository::new(),
    );
    let notes = Fallback::new(
        remote.map(SupabaseNotes),
        LocalNoteStore::new(config.notes_dir()),
    );

    let completion = completion(config)?;
    info!(
        provider = completion.provider(),
        completion_configured = completion.is_configured(),
        storage_configured,
        "collaborators ready"
    );

    Ok(Collaborators {
        completion,
        seeds: Arc::new(seeds),
        articles: Arc::new(articles),
        notes: Arc::new(notes),
        storage_configured,
        clipboard: None,
        file_export: Some(Arc::new(DirectoryExport::new(config.export_dir()))),
    })
}

/// Builds the co-writer and signs in the configured user, if any.
pub fn cowriter(config: &AppConfig) -> anyhow::Result<CoWriter> {
    let mut writer = CoWriter::new(collaborators(config)?);
    match ConfiguredIdentity::from_config(&config.user).current_user() {
        Some(user) => writer.sign_in(user),
        None => warn!("no user configured; set user.id or STORYSEED_USER_ID"),
    }
    Ok(writer)
}
