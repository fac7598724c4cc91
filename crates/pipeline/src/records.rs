//! Stored records: seeds, articles, and notes.
//!
//! Each record has a `New*` counterpart carrying only the user-supplied fields.
//! Repositories turn a `New*` into the stored record by assigning the id and
//! the creation timestamp.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{
    ArticleId, NoteId, NoteKind, Pillar, SeedId, SeedStatus, StorySeedError, Timestamp, UserId,
};

fn require_text(field: &'static str, value: &str) -> Result<(), StorySeedError> {
    if value.trim().is_empty() {
        Err(StorySeedError::Validation {
            field,
            reason: "must not be empty".into(),
        })
    } else {
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Seeds
// ---------------------------------------------------------------------------

/// A short captured idea awaiting development into an article.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Seed {
    pub id: SeedId,
    pub user_id: UserId,
    pub title: String,
    pub content: String,
    pub pillar: Pillar,
    pub status: SeedStatus,
    pub created_at: Timestamp,
}

/// User-supplied fields of a seed, validated at construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewSeed {
    pub user_id: UserId,
    pub title: String,
    pub content: String,
    pub pillar: Pillar,
}

impl NewSeed {
    /// Builds a capture request, rejecting an empty title or content.
    pub fn new(
        user_id: UserId,
        title: impl Into<String>,
        content: impl Into<String>,
        pillar: Pillar,
    ) -> Result<Self, StorySeedError> {
        let title = title.into();
        let content = content.into();
        require_text("title", &title)?;
        require_text("content", &content)?;
        Ok(Self {
            user_id,
            title: title.trim().to_string(),
            content: content.trim().to_string(),
            pillar,
        })
    }

    /// Stamps the request into a stored seed with status `captured`.
    pub fn into_seed(self, id: SeedId, created_at: Timestamp) -> Seed {
        Seed {
            id,
            user_id: self.user_id,
            title: self.title,
            content: self.content,
            pillar: self.pillar,
            status: SeedStatus::Captured,
            created_at,
        }
    }
}

// ---------------------------------------------------------------------------
// Articles
// ---------------------------------------------------------------------------

/// A saved draft, with the exact inputs that produced it copied by value.
///
/// Articles are immutable once created; deleting or changing the source seed
/// leaves them untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub id: ArticleId,
    pub user_id: UserId,
    pub seed_id: SeedId,
    pub title: String,
    pub content: String,
    pub pillar: Pillar,
    /// Selected questions, in the order they were generated.
    pub questions: Vec<String>,
    /// Answers keyed by question, restricted to `questions`.
    pub answers: BTreeMap<String, String>,
    pub created_at: Timestamp,
}

/// Everything needed to store an article except the id and timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewArticle {
    pub user_id: UserId,
    pub seed_id: SeedId,
    pub title: String,
    pub content: String,
    pub pillar: Pillar,
    pub questions: Vec<String>,
    pub answers: BTreeMap<String, String>,
}

impl NewArticle {
    /// Stamps the request into a stored article.
    pub fn into_article(self, id: ArticleId, created_at: Timestamp) -> Article {
        Article {
            id,
            user_id: self.user_id,
            seed_id: self.seed_id,
            title: self.title,
            content: self.content,
            pillar: self.pillar,
            questions: self.questions,
            answers: self.answers,
            created_at,
        }
    }
}

// ---------------------------------------------------------------------------
// Notes
// ---------------------------------------------------------------------------

/// A library entry (template, prompt, or reference). Unrelated to the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub id: NoteId,
    pub user_id: UserId,
    pub title: String,
    pub content: String,
    #[serde(rename = "type")]
    pub kind: NoteKind,
    #[serde(default)]
    pub tags: Vec<String>,
    pub created_at: Timestamp,
}

impl Note {
    /// Applies a partial update in place.
    pub fn apply(&mut self, update: NoteUpdate) {
        if let Some(title) = update.title {
            self.title = title;
        }
        if let Some(content) = update.content {
            self.content = content;
        }
        if let Some(kind) = update.kind {
            self.kind = kind;
        }
        if let Some(tags) = update.tags {
            self.tags = tags;
        }
    }

    /// The note's user-supplied fields as a create request.
    pub fn to_new(&self) -> NewNote {
        NewNote {
            user_id: self.user_id.clone(),
            title: self.title.clone(),
            content: self.content.clone(),
            kind: self.kind,
            tags: self.tags.clone(),
        }
    }

    /// An update that sets every user-supplied field to this note's value.
    pub fn to_update(&self) -> NoteUpdate {
        NoteUpdate {
            title: Some(self.title.clone()),
            content: Some(self.content.clone()),
            kind: Some(self.kind),
            tags: Some(self.tags.clone()),
        }
    }
}

/// User-supplied fields of a note, validated at construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewNote {
    pub user_id: UserId,
    pub title: String,
    pub content: String,
    #[serde(rename = "type")]
    pub kind: NoteKind,
    pub tags: Vec<String>,
}

impl NewNote {
    /// Builds a note request, rejecting an empty title or content.
    ///
    /// Tags are trimmed; blank tags and duplicates are dropped.
    pub fn new(
        user_id: UserId,
        title: impl Into<String>,
        content: impl Into<String>,
        kind: NoteKind,
        tags: impl IntoIterator<Item = String>,
    ) -> Result<Self, StorySeedError> {
        let title = title.into();
        let content = content.into();
        require_text("title", &title)?;
        require_text("content", &content)?;
        Ok(Self {
            user_id,
            title: title.trim().to_string(),
            content,
            kind,
            tags: normalize_tags(tags),
        })
    }

    /// Stamps the request into a stored note.
    pub fn into_note(self, id: NoteId, created_at: Timestamp) -> Note {
        Note {
            id,
            user_id: self.user_id,
            title: self.title,
            content: self.content,
            kind: self.kind,
            tags: self.tags,
            created_at,
        }
    }
}

/// Partial update for a note. `None` fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NoteUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<NoteKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

impl NoteUpdate {
    /// Returns `true` when the update would change nothing.
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.content.is_none() && self.kind.is_none() && self.tags.is_none()
    }

    /// Rejects updates that would blank a required field and normalises tags.
    pub fn validated(mut self) -> Result<Self, StorySeedError> {
        if let Some(title) = &self.title {
            require_text("title", title)?;
            self.title = Some(title.trim().to_string());
        }
        if let Some(content) = &self.content {
            require_text("content", content)?;
        }
        self.tags = self.tags.map(normalize_tags);
        Ok(self)
    }
}

fn normalize_tags(tags: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for tag in tags {
        let tag = tag.trim();
        if !tag.is_empty() && !out.iter().any(|t| t == tag) {
            out.push(tag.to_string());
        }
    }
    out
}

/// Sorts records newest-first, the ordering every listing promises.
pub fn newest_first<T>(records: &mut [T], created_at: impl Fn(&T) -> Timestamp) {
    records.sort_by_key(|r| std::cmp::Reverse(created_at(r)));
}
