//! File export into a local directory.

use std::path::PathBuf;

use async_trait::async_trait;
use pipeline::{FileExport, StoreError};

/// Writes exported files into a fixed directory, creating it on demand.
#[derive(Debug, Clone)]
pub struct DirectoryExport {
    dir: PathBuf,
}

impl DirectoryExport {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

#[async_trait]
impl FileExport for DirectoryExport {
    async fn export_text(&self, file_name: &str, contents: &str) -> Result<String, StoreError> {
        let name = std::path::Path::new(file_name)
            .file_name()
            .ok_or_else(|| StoreError::Io(format!("invalid export file name '{file_name}'")))?;
        let path = self.dir.join(name);
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| StoreError::Io(format!("{}: {e}", self.dir.display())))?;
        tokio::fs::write(&path, contents)
            .await
            .map_err(|e| StoreError::Io(format!("{}: {e}", path.display())))?;
        Ok(path.display().to_string())
    }
}
