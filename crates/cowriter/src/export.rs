//! Copy and export of a finished draft through the optional host capabilities.

use pipeline::{Stage, StorySeedError};
use tracing::info;

use crate::CoWriter;

/// File name for an exported draft: the title slugged, with a `.txt` suffix.
pub fn draft_file_name(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    for c in title.chars() {
        if c.is_alphanumeric() {
            slug.extend(c.to_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    let slug = slug.trim_end_matches('-');
    if slug.is_empty() {
        "draft.txt".to_string()
    } else {
        format!("{slug}.txt")
    }
}

impl CoWriter {
    fn finished_draft(&self) -> Result<(String, String), StorySeedError> {
        if self.session.stage() != Stage::Complete {
            return Err(StorySeedError::InvalidTransition {
                action: "export the draft",
                stage: self.session.stage(),
            });
        }
        let title = self.session.chosen_title().unwrap_or_default().to_string();
        let body = format!("{title}\n\n{}\n", self.session.draft_content());
        Ok((title, body))
    }

    /// Copies the finished draft to the clipboard, if the host has one.
    pub async fn copy_draft(&self) -> Result<(), StorySeedError> {
        let (_, body) = self.finished_draft()?;
        let clipboard = self
            .collaborators
            .clipboard
            .as_ref()
            .ok_or(StorySeedError::CapabilityUnavailable("clipboard"))?;
        clipboard.copy_text(&body).await?;
        info!("draft copied to clipboard");
        Ok(())
    }

    /// Exports the finished draft as a text file and returns where it went.
    pub async fn export_draft(&self) -> Result<String, StorySeedError> {
        let (title, body) = self.finished_draft()?;
        let export = self
            .collaborators
            .file_export
            .as_ref()
            .ok_or(StorySeedError::CapabilityUnavailable("file export"))?;
        let location = export.export_text(&draft_file_name(&title), &body).await?;
        info!(%location, "draft exported");
        Ok(location)
    }
}
