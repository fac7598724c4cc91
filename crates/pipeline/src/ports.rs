//! Collaborator port traits.
//!
//! The domain defines *what* it needs from the outside world; the `llm` and
//! `store` crates define *how* to supply it. Host capabilities that only some
//! front ends have (clipboard, file download) are optional: the orchestrator
//! holds them as `Option<Arc<dyn …>>` and reports
//! [`StorySeedError::CapabilityUnavailable`](crate::StorySeedError) when absent.
//!
//! All traits are object-safe via `async_trait` so adapters can be swapped at
//! the composition root and replaced with fakes in tests.

use async_trait::async_trait;

use crate::{
    Article, CompletionError, NewArticle, NewNote, NewSeed, Note, NoteId, NoteUpdate, Seed,
    SeedId, SeedStatus, StoreError, User, UserId,
};

// ---------------------------------------------------------------------------
// Text completion
// ---------------------------------------------------------------------------

/// A black-box text completion service: prompt in, text out.
///
/// No schema is enforced on the far side; callers parse the returned text.
#[async_trait]
pub trait TextCompletion: Send + Sync {
    /// Short provider label used in logs (e.g. `"gemini"`).
    fn provider(&self) -> &str;

    /// Pre-flight check: `true` when a credential is present.
    ///
    /// Generation steps are gated on this; an unconfigured provider is never
    /// called.
    fn is_configured(&self) -> bool;

    /// Sends `prompt` and returns the raw response text.
    async fn complete(&self, prompt: &str) -> Result<String, CompletionError>;
}

// ---------------------------------------------------------------------------
// Record repositories
// ---------------------------------------------------------------------------

/// Storage for captured seeds.
#[async_trait]
pub trait SeedRepository: Send + Sync {
    /// Lists the user's seeds, newest first.
    async fn list_by_user(&self, user: &UserId) -> Result<Vec<Seed>, StoreError>;

    /// Stores a new seed, assigning its id and creation timestamp.
    async fn create(&self, seed: NewSeed) -> Result<Seed, StoreError>;

    /// Changes the status of an existing seed (its only mutable field).
    async fn set_status(
        &self,
        user: &UserId,
        id: SeedId,
        status: SeedStatus,
    ) -> Result<Seed, StoreError>;
}

/// Storage for saved articles. Articles are immutable: there is no update.
#[async_trait]
pub trait ArticleRepository: Send + Sync {
    /// Lists the user's articles, newest first.
    async fn list_by_user(&self, user: &UserId) -> Result<Vec<Article>, StoreError>;

    /// Stores a new article, assigning its id and creation timestamp.
    async fn create(&self, article: NewArticle) -> Result<Article, StoreError>;
}

/// Storage for library notes.
#[async_trait]
pub trait NoteRepository: Send + Sync {
    /// Lists the user's notes, newest first.
    async fn list_by_user(&self, user: &UserId) -> Result<Vec<Note>, StoreError>;

    /// Stores a new note, assigning its id and creation timestamp.
    async fn create(&self, note: NewNote) -> Result<Note, StoreError>;

    /// Applies a partial update and returns the updated note.
    async fn update(&self, user: &UserId, id: NoteId, update: NoteUpdate)
        -> Result<Note, StoreError>;

    /// Deletes a note. Fails with [`StoreError::NotFound`] if it does not exist.
    async fn delete(&self, user: &UserId, id: NoteId) -> Result<(), StoreError>;
}

// ---------------------------------------------------------------------------
// Identity
// ---------------------------------------------------------------------------

/// Supplies the signed-in user, or `None` when unauthenticated.
pub trait IdentityProvider: Send + Sync {
    fn current_user(&self) -> Option<User>;
}

// ---------------------------------------------------------------------------
// Optional host capabilities
// ---------------------------------------------------------------------------

/// One-way sink that places text on the system clipboard.
#[async_trait]
pub trait Clipboard: Send + Sync {
    async fn copy_text(&self, text: &str) -> Result<(), StoreError>;
}

/// One-way sink that hands a text file to the user (download, save dialog, …).
#[async_trait]
pub trait FileExport: Send + Sync {
    /// Exports `contents` under `file_name` and returns a human-readable
    /// description of where it went.
    async fn export_text(&self, file_name: &str, contents: &str) -> Result<String, StoreError>;
}
