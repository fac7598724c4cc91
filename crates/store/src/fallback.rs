//! Remote-first repositories that fall back to a local implementation.
//!
//! [`Fallback`] asks the remote side first. If the remote is not configured
//! (`None`) or answers with an error for which
//! [`StoreError::is_fallback_eligible`] holds, the local side answers instead.
//! Any other remote error is returned as-is.
//!
//! For notes the local side is a [`LocalNoteStore`]. A successful remote
//! listing first receives the notes created or edited while offline, and
//! the merged result is written through so a later offline run sees it.

use async_trait::async_trait;
use pipeline::{
    newest_first, Article, ArticleRepository, NewArticle, NewNote, NewSeed, Note, NoteId,
    NoteRepository, NoteUpdate, Seed, SeedId, SeedRepository, SeedStatus, StoreError, UserId,
};
use tracing::{debug, warn};

use crate::LocalNoteStore;

/// A remote repository with a local stand-in.
#[derive(Debug)]
pub struct Fallback<R, L> {
    remote: Option<R>,
    local: L,
}

impl<R, L> Fallback<R, L> {
    /// `remote = None` means storage is not configured: every call goes local.
    pub fn new(remote: Option<R>, local: L) -> Self {
        Self { remote, local }
    }

    pub fn is_remote_configured(&self) -> bool {
        self.remote.is_some()
    }

    pub fn local(&self) -> &L {
        &self.local
    }
}

/// Runs `$call` with `$side` bound to the remote repository, then, if the
/// remote is absent or unreachable, again with `$side` bound to the local one.
macro_rules! route {
    ($self:ident, $operation:literal, $side:ident => $call:expr) => {{
        if let Some($side) = &$self.remote {
            match $call.await {
                Err(err) if err.is_fallback_eligible() => {
                    warn!(
                        operation = $operation,
                        error = %err,
                        "remote store unavailable, using local fallback"
                    );
                }
                other => return other,
            }
        }
        let $side = &$self.local;
        $call.await
    }};
}

#[async_trait]
impl<R, L> SeedRepository for Fallback<R, L>
where
    R: SeedRepository,
    L: SeedRepository,
{
    async fn list_by_user(&self, user: &UserId) -> Result<Vec<Seed>, StoreError> {
        route!(self, "list seeds", side => side.list_by_user(user))
    }

    async fn create(&self, seed: NewSeed) -> Result<Seed, StoreError> {
        route!(self, "create seed", side => side.create(seed.clone()))
    }

    async fn set_status(
        &self,
        user: &UserId,
        id: SeedId,
        status: SeedStatus,
    ) -> Result<Seed, StoreError> {
        route!(self, "set seed status", side => side.set_status(user, id, status))
    }
}

#[async_trait]
impl<R, L> ArticleRepository for Fallback<R, L>
where
    R: ArticleRepository,
    L: ArticleRepository,
{
    async fn list_by_user(&self, user: &UserId) -> Result<Vec<Article>, StoreError> {
        route!(self, "list articles", side => side.list_by_user(user))
    }

    async fn create(&self, article: NewArticle) -> Result<Article, StoreError> {
        route!(self, "create article", side => side.create(article.clone()))
    }
}

impl<R> Fallback<R, LocalNoteStore>
where
    R: NoteRepository,
{
    /// Pushes notes changed offline to the remote and caches the merged
    /// listing. A note the remote refuses stays in the listing and pending.
    async fn sync_notes(&self, remote: &R, user: &UserId, mut notes: Vec<Note>) -> Vec<Note> {
        let pending = self.local.pending(user).await.unwrap_or_else(|err| {
            warn!(error = %err, "could not read pending notes");
            Vec::new()
        });

        let mut unsent = Vec::new();
        for note in pending {
            let pushed = if notes.iter().any(|n| n.id == note.id) {
                remote.update(user, note.id, note.to_update()).await
            } else {
                remote.create(note.to_new()).await
            };
            notes.retain(|n| n.id != note.id);
            match pushed {
                Ok(stored) => {
                    debug!(local = %note.id, remote = %stored.id, "pending note synchronised");
                    notes.retain(|n| n.id != stored.id);
                    notes.push(stored);
                }
                Err(err) => {
                    warn!(note = %note.id, error = %err, "pending note kept on this device");
                    unsent.push(note.id);
                    notes.push(note);
                }
            }
        }
        newest_first(&mut notes, |n| n.created_at);

        // Cache failures must not hide a good remote answer.
        if let Err(err) = self.local.replace_all(user, &notes, &unsent).await {
            warn!(error = %err, "could not cache notes locally");
        }
        notes
    }
}

#[async_trait]
impl<R> NoteRepository for Fallback<R, LocalNoteStore>
where
    R: NoteRepository,
{
    async fn list_by_user(&self, user: &UserId) -> Result<Vec<Note>, StoreError> {
        if let Some(remote) = &self.remote {
            match remote.list_by_user(user).await {
                Ok(notes) => return Ok(self.sync_notes(remote, user, notes).await),
                Err(err) if err.is_fallback_eligible() => {
                    warn!(error = %err, "remote store unavailable, using cached notes");
                }
                Err(err) => return Err(err),
            }
        }
        self.local.list_by_user(user).await
    }

    async fn create(&self, note: NewNote) -> Result<Note, StoreError> {
        route!(self, "create note", side => side.create(note.clone()))
    }

    async fn update(
        &self,
        user: &UserId,
        id: NoteId,
        update: NoteUpdate,
    ) -> Result<Note, StoreError> {
        route!(self, "update note", side => side.update(user, id, update.clone()))
    }

    async fn delete(&self, user: &UserId, id: NoteId) -> Result<(), StoreError> {
        route!(self, "delete note", side => side.delete(user, id))
    }
}
