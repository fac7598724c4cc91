//! On-device note storage: one JSON file per user.
//!
//! A user with no file sees the default templates; the first mutation writes
//! the file. Writes go to a temporary sibling first and are then renamed over
//! the target so a crash never leaves a half-written file.
//!
//! Notes created or edited here are recorded as pending until a remote
//! listing has accepted them (see [`crate::Fallback`]).

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use pipeline::{
    newest_first, NewNote, Note, NoteId, NoteRepository, NoteUpdate, StoreError, Timestamp,
    UserId,
};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::debug;

use crate::demo::default_note_templates;

/// Notes persisted under a directory on this device.
#[derive(Debug)]
pub struct LocalNoteStore {
    dir: PathBuf,
    // Serialises read-modify-write cycles within this process.
    write_lock: Mutex<()>,
}

/// On-disk layout of one user's file.
#[derive(Debug, Default, Serialize, Deserialize)]
struct NoteFile {
    notes: Vec<Note>,
    /// Notes changed here that the remote has not seen yet.
    #[serde(default)]
    pending: Vec<NoteId>,
}

impl NoteFile {
    fn mark_pending(&mut self, id: NoteId) {
        if !self.pending.contains(&id) {
            self.pending.push(id);
        }
    }
}

impl LocalNoteStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file holding `user`'s notes.
    ///
    /// The id is hex-encoded so distinct ids never share a file.
    pub fn file_for(&self, user: &UserId) -> PathBuf {
        let mut name = String::from("notes-");
        for byte in user.as_str().bytes() {
            let _ = write!(name, "{byte:02x}");
        }
        name.push_str(".json");
        self.dir.join(name)
    }

    /// Reads `user`'s file, or `None` when nothing has been stored yet.
    /// Records belonging to anyone else are dropped.
    async fn read(&self, user: &UserId) -> Result<Option<NoteFile>, StoreError> {
        let path = self.file_for(user);
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StoreError::Io(format!("{}: {e}", path.display()))),
        };
        let mut file: NoteFile = serde_json::from_slice(&bytes)
            .map_err(|e| StoreError::Malformed(format!("{}: {e}", path.display())))?;
        file.notes.retain(|n| &n.user_id == user);
        let notes = &file.notes;
        file.pending.retain(|id| notes.iter().any(|n| n.id == *id));
        Ok(Some(file))
    }

    async fn read_or_defaults(&self, user: &UserId) -> Result<NoteFile, StoreError> {
        Ok(self.read(user).await?.unwrap_or_else(|| NoteFile {
            notes: default_note_templates(user),
            pending: Vec::new(),
        }))
    }

    async fn write(&self, user: &UserId, file: &NoteFile) -> Result<(), StoreError> {
        let path = self.file_for(user);
        let io_err = |e: std::io::Error| StoreError::Io(format!("{}: {e}", path.display()));
        tokio::fs::create_dir_all(&self.dir).await.map_err(io_err)?;

        let json =
            serde_json::to_vec_pretty(file).map_err(|e| StoreError::Malformed(e.to_string()))?;
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json).await.map_err(io_err)?;
        tokio::fs::rename(&tmp, &path).await.map_err(io_err)?;
        debug!(
            path = %path.display(),
            count = file.notes.len(),
            pending = file.pending.len(),
            "notes written"
        );
        Ok(())
    }

    /// Notes changed on this device that the remote has not accepted yet.
    pub async fn pending(&self, user: &UserId) -> Result<Vec<Note>, StoreError> {
        let Some(file) = self.read(user).await? else {
            return Ok(Vec::new());
        };
        Ok(file
            .notes
            .into_iter()
            .filter(|n| file.pending.contains(&n.id))
            .collect())
    }

    /// Replaces `user`'s local notes with a synchronised listing. Ids in
    /// `unsent` stay pending.
    pub async fn replace_all(
        &self,
        user: &UserId,
        notes: &[Note],
        unsent: &[NoteId],
    ) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;
        let file = NoteFile {
            notes: notes.iter().filter(|n| &n.user_id == user).cloned().collect(),
            pending: unsent.to_vec(),
        };
        self.write(user, &file).await
    }
}

fn not_found(id: NoteId) -> StoreError {
    StoreError::NotFound {
        kind: "note",
        id: id.to_string(),
    }
}

#[async_trait]
impl NoteRepository for LocalNoteStore {
    async fn list_by_user(&self, user: &UserId) -> Result<Vec<Note>, StoreError> {
        let mut notes = self.read_or_defaults(user).await?.notes;
        newest_first(&mut notes, |n| n.created_at);
        Ok(notes)
    }

    async fn create(&self, note: NewNote) -> Result<Note, StoreError> {
        let _guard = self.write_lock.lock().await;
        let user = note.user_id.clone();
        let mut file = self.read_or_defaults(&user).await?;
        let stored = note.into_note(NoteId::new_random(), Timestamp::now());
        file.notes.push(stored.clone());
        file.mark_pending(stored.id);
        self.write(&user, &file).await?;
        Ok(stored)
    }

    async fn update(
        &self,
        user: &UserId,
        id: NoteId,
        update: NoteUpdate,
    ) -> Result<Note, StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut file = self.read_or_defaults(user).await?;
        let note = file
            .notes
            .iter_mut()
            .find(|n| n.id == id)
            .ok_or_else(|| not_found(id))?;
        note.apply(update);
        let updated = note.clone();
        file.mark_pending(id);
        self.write(user, &file).await?;
        Ok(updated)
    }

    async fn delete(&self, user: &UserId, id: NoteId) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut file = self.read_or_defaults(user).await?;
        let before = file.notes.len();
        file.notes.retain(|n| n.id != id);
        if file.notes.len() == before {
            return Err(not_found(id));
        }
        file.pending.retain(|p| *p != id);
        self.write(user, &file).await
    }
}

#[cfg(test)]
mod tests {
    use pipeline::NoteKind;
    use pretty_assertions::assert_eq;

    use super::*;

    fn user() -> UserId {
        UserId::new("writer@example.com").unwrap()
    }

    fn new_note(title: &str) -> NewNote {
        NewNote::new(user(), title, "body", NoteKind::Reference, vec!["t".to_string()]).unwrap()
    }

    #[tokio::test]
    async fn defaults_when_nothing_stored() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalNoteStore::new(dir.path());
        let notes = store.list_by_user(&user()).await.unwrap();
        assert_eq!(notes.len(), 2);
        assert!(notes.iter().all(|n| n.user_id == user()));
        assert!(!store.file_for(&user()).exists());
    }

    #[tokio::test]
    async fn create_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let created = LocalNoteStore::new(dir.path())
            .create(new_note("Sources"))
            .await
            .unwrap();

        let reopened = LocalNoteStore::new(dir.path());
        let notes = reopened.list_by_user(&user()).await.unwrap();
        assert_eq!(notes.len(), 3);
        assert_eq!(notes[0].id, created.id);
    }

    #[tokio::test]
    async fn update_and_delete() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalNoteStore::new(dir.path());
        let created = store.create(new_note("Old")).await.unwrap();

        let updated = store
            .update(
                &user(),
                created.id,
                NoteUpdate {
                    title: Some("New".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.title, "New");
        assert_eq!(updated.content, "body");

        store.delete(&user(), created.id).await.unwrap();
        let notes = store.list_by_user(&user()).await.unwrap();
        assert!(notes.iter().all(|n| n.id != created.id));

        let err = store.delete(&user(), created.id).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound { kind: "note", .. }));
    }

    #[test]
    fn file_names_are_hex_encoded() {
        let store = LocalNoteStore::new("/tmp/x");
        let path = store.file_for(&UserId::new("a/b c").unwrap());
        assert_eq!(path, PathBuf::from("/tmp/x/notes-612f622063.json"));

        let dotted = store.file_for(&UserId::new("jo.smith").unwrap());
        let underscored = store.file_for(&UserId::new("jo_smith").unwrap());
        assert_ne!(dotted, underscored);
    }

    #[tokio::test]
    async fn similar_user_ids_do_not_share_notes() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalNoteStore::new(dir.path());
        let dotted = UserId::new("jo.smith").unwrap();
        let underscored = UserId::new("jo_smith").unwrap();
        let private = NewNote::new(dotted.clone(), "Private", "body", NoteKind::Prompt, vec![])
            .unwrap();
        let created = store.create(private).await.unwrap();

        let theirs = store.list_by_user(&underscored).await.unwrap();
        assert!(theirs.iter().all(|n| n.user_id == underscored));
        assert!(theirs.iter().all(|n| n.id != created.id));
        let err = store.delete(&underscored, created.id).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }

    #[tokio::test]
    async fn foreign_records_in_a_file_are_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalNoteStore::new(dir.path());
        let stranger = UserId::new("stranger").unwrap();
        let foreign = NewNote::new(stranger, "Theirs", "body", NoteKind::Prompt, vec![])
            .unwrap()
            .into_note(NoteId::new_random(), Timestamp::now());
        store.replace_all(&user(), &[], &[]).await.unwrap();
        let json = serde_json::json!({ "notes": [foreign], "pending": [foreign.id] });
        std::fs::write(store.file_for(&user()), json.to_string()).unwrap();

        assert!(store.list_by_user(&user()).await.unwrap().is_empty());
        assert!(store.pending(&user()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn local_changes_are_pending_until_replaced() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalNoteStore::new(dir.path());
        let created = store.create(new_note("Draft idea")).await.unwrap();
        let pending = store.pending(&user()).await.unwrap();
        assert_eq!(pending, vec![created.clone()]);

        store.replace_all(&user(), &[created.clone()], &[]).await.unwrap();
        assert!(store.pending(&user()).await.unwrap().is_empty());

        store
            .update(&user(), created.id, NoteUpdate {
                content: Some("edited".into()),
                ..Default::default()
            })
            .await
            .unwrap();
        let pending = store.pending(&user()).await.unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].content, "edited");
    }

    #[tokio::test]
    async fn corrupt_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalNoteStore::new(dir.path());
        std::fs::write(store.file_for(&user()), b"not json").unwrap();
        let err = store.list_by_user(&user()).await.unwrap_err();
        assert!(matches!(err, StoreError::Malformed(_)));
    }
}
