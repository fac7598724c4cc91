//! Seed capture, article history, and the notes library.
//!
//! Every operation here requires a signed-in user; store failures are logged
//! and returned unchanged.

use pipeline::{
    Article, DashboardStats, NewNote, NewSeed, Note, NoteId, NoteKind, NoteUpdate, Pillar, Seed,
    StorySeedError, Timestamp,
};
use tracing::{info, instrument, warn};

use crate::CoWriter;

impl CoWriter {
    /// Captures a new seed and puts it at the front of the cached list.
    #[instrument(skip(self, content))]
    pub async fn capture_seed(
        &mut self,
        title: &str,
        content: &str,
        pillar: Pillar,
    ) -> Result<Seed, StorySeedError> {
        let user = self.require_user()?;
        let new_seed = NewSeed::new(user, title, content, pillar)?;
        let seed = self
            .collaborators
            .seeds
            .create(new_seed)
            .await
            .inspect_err(|err| warn!(error = %err, "failed to capture seed"))?;
        info!(seed = %seed.id, "seed captured");
        self.seeds.insert(0, seed.clone());
        Ok(seed)
    }

    /// Reloads the seed list from the store, newest first.
    #[instrument(skip(self))]
    pub async fn refresh_seeds(&mut self) -> Result<&[Seed], StorySeedError> {
        let user = self.require_user()?;
        let seeds = self
            .collaborators
            .seeds
            .list_by_user(&user)
            .await
            .inspect_err(|err| warn!(error = %err, "failed to load seeds"))?;
        self.seeds = seeds;
        Ok(&self.seeds)
    }

    /// The cached seed list as of the last refresh or capture.
    pub fn seeds(&self) -> &[Seed] {
        &self.seeds
    }

    /// Dashboard counters over the cached seed list.
    pub fn dashboard(&self) -> DashboardStats {
        DashboardStats::compute(&self.seeds, Timestamp::now())
    }

    #[instrument(skip(self))]
    pub async fn articles(&self) -> Result<Vec<Article>, StorySeedError> {
        let user = self.require_user()?;
        Ok(self
            .collaborators
            .articles
            .list_by_user(&user)
            .await
            .inspect_err(|err| warn!(error = %err, "failed to load articles"))?)
    }

    #[instrument(skip(self))]
    pub async fn notes(&self) -> Result<Vec<Note>, StorySeedError> {
        let user = self.require_user()?;
        Ok(self
            .collaborators
            .notes
            .list_by_user(&user)
            .await
            .inspect_err(|err| warn!(error = %err, "failed to load notes"))?)
    }

    #[instrument(skip(self, content, tags))]
    pub async fn add_note(
        &self,
        title: &str,
        content: &str,
        kind: NoteKind,
        tags: Vec<String>,
    ) -> Result<Note, StorySeedError> {
        let user = self.require_user()?;
        let new_note = NewNote::new(user, title, content, kind, tags)?;
        let note = self
            .collaborators
            .notes
            .create(new_note)
            .await
            .inspect_err(|err| warn!(error = %err, "failed to add note"))?;
        info!(note = %note.id, "note added");
        Ok(note)
    }

    #[instrument(skip(self, update))]
    pub async fn update_note(&self, id: NoteId, update: NoteUpdate) -> Result<Note, StorySeedError> {
        let user = self.require_user()?;
        let update = update.validated()?;
        if update.is_empty() {
            return Err(StorySeedError::Validation {
                field: "update",
                reason: "nothing to change".into(),
            });
        }
        Ok(self
            .collaborators
            .notes
            .update(&user, id, update)
            .await
            .inspect_err(|err| warn!(note = %id, error = %err, "failed to update note"))?)
    }

    #[instrument(skip(self))]
    pub async fn delete_note(&self, id: NoteId) -> Result<(), StorySeedError> {
        let user = self.require_user()?;
        self.collaborators
            .notes
            .delete(&user, id)
            .await
            .inspect_err(|err| warn!(note = %id, error = %err, "failed to delete note"))?;
        info!(note = %id, "note deleted");
        Ok(())
    }
}
