//! Single-file JSON document store for the quest tracker.
//!
//! The whole dataset is one [`Document`] with three collections. All access
//! goes through a shared [`RecordStore`], which serializes every
//! load → mutate → save sequence so concurrent request handlers never lose
//! each other's updates.
//!
//! Layers, leaf first:
//! - [`record`] owns the persisted document and the critical section
//! - [`repository`] gives typed, owner-agnostic access per collection
//! - [`completion`] derives achievements from completed quests
//! - [`vault`] is the owner-checked façade request handlers call
pub mod completion;
pub mod document;
pub mod error;
pub mod record;
pub mod repository;
pub mod vault;

pub use completion::{CompletionPipeline, is_completion_edge};
pub use document::{Document, EntityKind};
pub use error::{Result, StoreError};
pub use record::{Commit, DocumentBackend, FileBackend, MemoryBackend, RecordStore};
pub use repository::{Entity, Repository, Visible};
pub use vault::{QuestVault, ResetSummary};
