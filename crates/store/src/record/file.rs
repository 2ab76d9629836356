//! File-based DocumentBackend implementation.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::document::Document;
use crate::error::{Result, StoreError};
use crate::record::DocumentBackend;

/// Persists the document as one JSON file.
///
/// # Write discipline
///
/// Saves go to `<file>.tmp` next to the target, are fsynced, then renamed
/// over the target. A failed save leaves the previous file in place.
pub struct FileBackend {
    path: PathBuf,
}

impl FileBackend {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn write_failed(&self, source: std::io::Error) -> StoreError {
        StoreError::StorageWriteFailed {
            path: self.location(),
            source,
        }
    }

    fn corrupt(&self, reason: impl Into<String>) -> StoreError {
        StoreError::StorageCorrupt {
            path: self.location(),
            reason: reason.into(),
        }
    }

    fn write_atomic(&self, bytes: &[u8]) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        let temp_path = self.temp_path();
        let mut file = File::create(&temp_path)?;
        file.write_all(bytes)?;
        file.sync_all()?;
        drop(file);

        fs::rename(&temp_path, &self.path)
    }
}

impl DocumentBackend for FileBackend {
    fn load(&mut self) -> Result<Document> {
        if !self.path.exists() {
            let document = Document::default();
            self.save(&document)?;
            tracing::info!("Initialized empty document at {}", self.path.display());
            return Ok(document);
        }

        let bytes = fs::read(&self.path).map_err(|e| self.corrupt(e.to_string()))?;
        let (document, missing) = Document::parse(&bytes).map_err(|reason| self.corrupt(reason))?;

        if !missing.is_empty() {
            tracing::warn!(
                "Healing {}: adding missing collections {:?}",
                self.path.display(),
                missing
            );
            self.save(&document)?;
        }

        tracing::debug!(
            "Loaded document from {} ({} users, {} quests, {} achievements)",
            self.path.display(),
            document.users.len(),
            document.quests.len(),
            document.achievements.len()
        );

        Ok(document)
    }

    fn save(&mut self, document: &Document) -> Result<()> {
        let bytes = document
            .to_pretty_bytes()
            .map_err(|e| self.write_failed(std::io::Error::other(e)))?;

        if let Err(e) = self.write_atomic(&bytes) {
            let _ = fs::remove_file(self.temp_path());
            return Err(self.write_failed(e));
        }

        tracing::debug!("Saved document to {}", self.path.display());
        Ok(())
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}
