//! The set of collaborators a [`CoWriter`](crate::CoWriter) is built from.

use std::sync::Arc;

use pipeline::{
    ArticleRepository, Clipboard, FileExport, NoteRepository, SeedRepository, TextCompletion,
};

/// Concrete collaborators, constructed once by the composition root and
/// shared by reference for the life of the process.
#[derive(Clone)]
pub struct Collaborators {
    pub completion: Arc<dyn TextCompletion>,
    pub seeds: Arc<dyn SeedRepository>,
    pub articles: Arc<dyn ArticleRepository>,
    pub notes: Arc<dyn NoteRepository>,
    /// `false` when no remote store is configured and the repositories are
    /// answering from local fallbacks.
    pub storage_configured: bool,
    pub clipboard: Option<Arc<dyn Clipboard>>,
    pub file_export: Option<Arc<dyn FileExport>>,
}

impl std::fmt::Debug for Collaborators {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Collaborators")
            .field("completion", &self.completion.provider())
            .field("completion_configured", &self.completion.is_configured())
            .field("storage_configured", &self.storage_configured)
            .field("clipboard", &self.clipboard.is_some())
            .field("file_export", &self.file_export.is_some())
            .finish()
    }
}

/// Persistent setup banner content.
///
/// Present while any configuration is missing. A missing completion
/// credential blocks every generation step; missing storage only means the
/// data shown is local.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetupNotice {
    pub completion_missing: bool,
    pub storage_missing: bool,
}

impl SetupNotice {
    /// Builds a notice from the collaborators, or `None` when fully set up.
    pub fn check(collaborators: &Collaborators) -> Option<Self> {
        let notice = Self {
            completion_missing: !collaborators.completion.is_configured(),
            storage_missing: !collaborators.storage_configured,
        };
        (notice.completion_missing || notice.storage_missing).then_some(notice)
    }

    /// Human-readable banner lines.
    pub fn messages(&self) -> Vec<&'static str> {
        let mut lines = Vec::new();
        if self.completion_missing {
            lines.push(
                "No AI provider key is configured. Set GEMINI_API_KEY (or llm.api_key in \
                 .storyseed/config.toml) to enable title, question, and draft generation.",
            );
        }
        if self.storage_missing {
            lines.push(
                "Cloud storage is not configured. Seeds and articles use demo data for this \
                 run; notes are kept on this device.",
            );
        }
        lines
    }
}
