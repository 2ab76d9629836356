//! Record store: the single persisted document and its critical section.
//!
//! Every mutation reads the whole document, changes it, and writes the whole
//! document back. Two such sequences running side by side would lose one
//! another's changes, so [`RecordStore`] serializes the complete
//! load → mutate → save sequence behind one lock, reads included.
//!
//! Backends only know how to load and save; locking lives here.
//! - [`FileBackend`]: JSON file, temp-file + rename on save
//! - [`MemoryBackend`]: isolated in-process document for tests

mod file;
mod memory;

use std::path::Path;
use std::sync::Mutex;

pub use file::FileBackend;
pub use memory::MemoryBackend;

use crate::document::Document;
use crate::error::{Result, StoreError};

/// Storage for the document.
///
/// `load` must return a document with all collections present, creating or
/// healing the persisted copy when needed. `save` must replace the persisted
/// copy all-or-nothing.
pub trait DocumentBackend: Send {
    fn load(&mut self) -> Result<Document>;

    fn save(&mut self, document: &Document) -> Result<()>;

    /// Human-readable location, for logs.
    fn location(&self) -> String;
}

/// Outcome of a [`RecordStore::transact`] closure.
#[derive(Debug)]
pub enum Commit<T> {
    /// Persist the mutated document, then return the value.
    Write(T),
    /// Return the value without touching storage.
    Skip(T),
}

/// Process-wide owner of the persisted document.
///
/// Shared through `Arc` and injected into every repository.
pub struct RecordStore {
    backend: Mutex<Box<dyn DocumentBackend>>,
}

impl RecordStore {
    pub fn new(backend: impl DocumentBackend + 'static) -> Self {
        Self {
            backend: Mutex::new(Box::new(backend)),
        }
    }

    /// Open a file-backed store, initializing or healing the file right away.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let store = Self::new(FileBackend::new(path));
        store.load()?;
        Ok(store)
    }

    pub fn in_memory() -> Self {
        Self::new(MemoryBackend::default())
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Box<dyn DocumentBackend>>> {
        self.backend.lock().map_err(|_| StoreError::LockPoisoned)
    }

    /// Load a snapshot of the whole document.
    pub fn load(&self) -> Result<Document> {
        self.lock()?.load()
    }

    /// Overwrite the whole document.
    pub fn save(&self, document: &Document) -> Result<()> {
        self.lock()?.save(document)
    }

    /// Run a read-only view over the document inside the critical section.
    pub fn read<T>(&self, f: impl FnOnce(&Document) -> T) -> Result<T> {
        let mut backend = self.lock()?;
        let document = backend.load()?;
        Ok(f(&document))
    }

    /// Load, mutate, and optionally save, all under the store lock.
    ///
    /// An `Err` from `f` discards its in-memory changes and leaves storage
    /// untouched.
    pub fn transact<T>(&self, f: impl FnOnce(&mut Document) -> Result<Commit<T>>) -> Result<T> {
        let mut backend = self.lock()?;
        let mut document = backend.load()?;

        match f(&mut document)? {
            Commit::Write(value) => {
                backend.save(&document)?;
                Ok(value)
            }
            Commit::Skip(value) => Ok(value),
        }
    }

    /// Reset all three collections to empty.
    pub fn clear_all(&self) -> Result<()> {
        let mut backend = self.lock()?;
        tracing::warn!("Clearing all collections in {}", backend.location());
        backend.save(&Document::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quest_core::{Quest, QuestDraft};

    #[test]
    fn skip_does_not_persist() {
        let store = RecordStore::in_memory();

        let count = store
            .transact(|doc| {
                doc.quests.push(Quest::from_draft(QuestDraft::new("draft"), "u1"));
                Ok(Commit::Skip(doc.quests.len()))
            })
            .unwrap();

        assert_eq!(count, 1);
        assert!(store.load().unwrap().quests.is_empty());
    }

    #[test]
    fn error_discards_changes() {
        let store = RecordStore::in_memory();

        let result: Result<()> = store.transact(|doc| {
            doc.quests.push(Quest::from_draft(QuestDraft::new("draft"), "u1"));
            Err(StoreError::not_found(crate::EntityKind::Quest, "q1"))
        });

        assert!(result.unwrap_err().is_not_found());
        assert!(store.load().unwrap().quests.is_empty());
    }

    #[test]
    fn clear_all_wipes_every_collection() {
        let store = RecordStore::in_memory();
        store
            .transact(|doc| {
                doc.quests.push(Quest::from_draft(QuestDraft::new("a"), "u1"));
                Ok(Commit::Write(()))
            })
            .unwrap();

        store.clear_all().unwrap();
        assert_eq!(store.load().unwrap(), Document::default());
    }
}
