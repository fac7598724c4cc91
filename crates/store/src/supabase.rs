//! Remote record store over Supabase's PostgREST interface.
//!
//! One [`SupabaseClient`] is constructed at start-up and shared (via `Arc`) by
//! the three repository wrappers. Tables are `seeds`, `articles`, and
//! `notes`; each has a `user_id` column and a server-assigned `id` and
//! `created_at`. Rows map one-to-one onto the domain records, so no separate
//! row types are needed.
//!
//! Transport failures map to [`StoreError::Unreachable`], which makes the
//! fallback layer answer locally; a non-success status maps to
//! [`StoreError::Rejected`], which is surfaced.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use pipeline::{
    Article, ArticleRepository, NewArticle, NewNote, NewSeed, Note, NoteId, NoteRepository,
    NoteUpdate, Seed, SeedId, SeedRepository, SeedStatus, StoreError, UserId,
};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, instrument};
use uuid::Uuid;

const SEEDS: &str = "seeds";
const ARTICLES: &str = "articles";
const NOTES: &str = "notes";

/// Connection settings for the remote store.
#[derive(Debug, Clone)]
pub struct SupabaseSettings {
    /// Project URL, e.g. `https://abcd.supabase.co`.
    pub url: String,
    /// Public anon key, sent as the `apikey` header.
    pub anon_key: String,
    /// Signed-in user's access token. Falls back to the anon key when absent.
    pub access_token: Option<String>,
    pub timeout: Duration,
}

/// Thin PostgREST client shared by every remote repository.
#[derive(Debug)]
pub struct SupabaseClient {
    http: Client,
    rest_url: String,
    anon_key: String,
    bearer: String,
}

impl SupabaseClient {
    /// Builds the client. Fails with [`StoreError::NotConfigured`] when the
    /// URL or key is empty.
    pub fn new(settings: SupabaseSettings) -> Result<Self, StoreError> {
        if settings.url.trim().is_empty() || settings.anon_key.trim().is_empty() {
            return Err(StoreError::NotConfigured);
        }
        let http = Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(|e| StoreError::Unreachable(format!("could not build HTTP client: {e}")))?;
        let bearer = settings
            .access_token
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| settings.anon_key.clone());
        Ok(Self {
            http,
            rest_url: format!("{}/rest/v1", settings.url.trim_end_matches('/')),
            anon_key: settings.anon_key,
            bearer,
        })
    }

    pub fn table_url(&self, table: &str) -> String {
        format!("{}/{table}", self.rest_url)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("apikey", &self.anon_key)
            .bearer_auth(&self.bearer)
            .header("Prefer", "return=representation")
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, StoreError> {
        let response = self
            .authorized(request)
            .send()
            .await
            .map_err(|e| StoreError::Unreachable(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "(no body)".into());
            return Err(status_error(status, message));
        }
        Ok(response)
    }

    async fn rows<T: DeserializeOwned>(response: Response) -> Result<Vec<T>, StoreError> {
        response
            .json()
            .await
            .map_err(|e| StoreError::Malformed(e.to_string()))
    }

    /// `GET /{table}?user_id=eq.{user}&order=created_at.desc`
    #[instrument(skip(self))]
    pub async fn select<T: DeserializeOwned>(
        &self,
        table: &str,
        user: &UserId,
    ) -> Result<Vec<T>, StoreError> {
        let request = self.http.get(self.table_url(table)).query(&[
            ("select", "*".to_string()),
            ("user_id", format!("eq.{user}")),
            ("order", "created_at.desc".to_string()),
        ]);
        let rows = Self::rows(self.send(request).await?).await?;
        debug!(count = rows.len(), "rows selected");
        Ok(rows)
    }

    /// `POST /{table}` returning the stored row.
    #[instrument(skip(self, body))]
    pub async fn insert<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        table: &str,
        body: &B,
    ) -> Result<T, StoreError> {
        let request = self.http.post(self.table_url(table)).json(body);
        Self::rows(self.send(request).await?)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| StoreError::Malformed(format!("insert into {table} returned no row")))
    }

    /// `PATCH /{table}?id=eq.{id}&user_id=eq.{user}` returning the updated row.
    #[instrument(skip(self, body))]
    pub async fn update<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        table: &'static str,
        user: &UserId,
        id: Uuid,
        body: &B,
    ) -> Result<T, StoreError> {
        let request = self
            .http
            .patch(self.table_url(table))
            .query(&Self::row_filter(user, id))
            .json(body);
        Self::rows(self.send(request).await?)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| not_found(table, id))
    }

    /// `DELETE /{table}?id=eq.{id}&user_id=eq.{user}`. Fails if no row matched.
    #[instrument(skip(self))]
    pub async fn delete(&self, table: &'static str, user: &UserId, id: Uuid) -> Result<(), StoreError> {
        let request = self
            .http
            .delete(self.table_url(table))
            .query(&Self::row_filter(user, id));
        let deleted: Vec<serde_json::Value> = Self::rows(self.send(request).await?).await?;
        if deleted.is_empty() {
            return Err(not_found(table, id));
        }
        Ok(())
    }

    fn row_filter(user: &UserId, id: Uuid) -> [(&'static str, String); 2] {
        [("id", format!("eq.{id}")), ("user_id", format!("eq.{user}"))]
    }
}

fn not_found(table: &'static str, id: Uuid) -> StoreError {
    StoreError::NotFound {
        kind: table.trim_end_matches('s'),
        id: id.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Repository wrappers
// ---------------------------------------------------------------------------

/// Seeds table.
#[derive(Debug, Clone)]
pub struct SupabaseSeeds(pub Arc<SupabaseClient>);

/// Articles table.
#[derive(Debug, Clone)]
pub struct SupabaseArticles(pub Arc<SupabaseClient>);

/// Notes table.
#[derive(Debug, Clone)]
pub struct SupabaseNotes(pub Arc<SupabaseClient>);

#[derive(Serialize)]
struct SeedInsert<'a> {
    #[serde(flatten)]
    seed: &'a NewSeed,
    status: SeedStatus,
}

#[derive(Serialize)]
struct StatusPatch {
    status: SeedStatus,
}

#[async_trait]
impl SeedRepository for SupabaseSeeds {
    async fn list_by_user(&self, user: &UserId) -> Result<Vec<Seed>, StoreError> {
        self.0.select(SEEDS, user).await
    }

    async fn create(&self, seed: NewSeed) -> Result<Seed, StoreError> {
        let body = SeedInsert {
            seed: &seed,
            status: SeedStatus::Captured,
        };
        self.0.insert(SEEDS, &body).await
    }

    async fn set_status(
        &self,
        user: &UserId,
        id: SeedId,
        status: SeedStatus,
    ) -> Result<Seed, StoreError> {
        self.0
            .update(SEEDS, user, id.as_uuid(), &StatusPatch { status })
            .await
    }
}

#[async_trait]
impl ArticleRepository for SupabaseArticles {
    async fn list_by_user(&self, user: &UserId) -> Result<Vec<Article>, StoreError> {
        self.0.select(ARTICLES, user).await
    }

    async fn create(&self, article: NewArticle) -> Result<Article, StoreError> {
        self.0.insert(ARTICLES, &article).await
    }
}

#[async_trait]
impl NoteRepository for SupabaseNotes {
    async fn list_by_user(&self, user: &UserId) -> Result<Vec<Note>, StoreError> {
        self.0.select(NOTES, user).await
    }

    async fn create(&self, note: NewNote) -> Result<Note, StoreError> {
        self.0.insert(NOTES, &note).await
    }

    async fn update(
        &self,
        user: &UserId,
        id: NoteId,
        update: NoteUpdate,
    ) -> Result<Note, StoreError> {
        self.0.update(NOTES, user, id.as_uuid(), &update).await
    }

    async fn delete(&self, user: &UserId, id: NoteId) -> Result<(), StoreError> {
        self.0.delete(NOTES, user, id.as_uuid()).await
    }
}

/// Gateway failures mean the database could not be reached; anything else
/// is the database answering no.
fn status_error(status: StatusCode, message: String) -> StoreError {
    match status {
        StatusCode::BAD_GATEWAY | StatusCode::SERVICE_UNAVAILABLE | StatusCode::GATEWAY_TIMEOUT => {
            StoreError::Unreachable(format!("{status}: {message}"))
        }
        _ => StoreError::Rejected {
            status: status.as_u16(),
            message,
        },
    }
}
