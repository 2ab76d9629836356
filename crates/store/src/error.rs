//! Error types raised by the record store and the layers above it.

use quest_core::ValidationError;
use thiserror::Error;

use crate::document::EntityKind;

/// Errors surfaced by the store, repositories and the vault.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Missing, or present but owned by someone else when ownership matters.
    #[error("{kind} '{key}' not found")]
    NotFound { kind: EntityKind, key: String },

    #[error("storage at {path} is unreadable: {reason}")]
    StorageCorrupt { path: String, reason: String },

    #[error("failed to write storage at {path}")]
    StorageWriteFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid {kind}")]
    ValidationFailed {
        kind: EntityKind,
        #[source]
        source: ValidationError,
    },

    #[error("username '{0}' is already registered")]
    UsernameTaken(String),

    #[error("record store lock was poisoned")]
    LockPoisoned,
}

impl StoreError {
    pub fn not_found(kind: EntityKind, key: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            key: key.into(),
        }
    }

    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;
