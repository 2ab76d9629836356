//! In-memory DocumentBackend for tests and throwaway runs.

use crate::document::Document;
use crate::error::Result;
use crate::record::DocumentBackend;

/// Keeps the document in process memory. Saves always succeed.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    document: Document,
}

impl MemoryBackend {
    pub fn with_document(document: Document) -> Self {
        Self { document }
    }
}

impl DocumentBackend for MemoryBackend {
    fn load(&mut self) -> Result<Document> {
        Ok(self.document.clone())
    }

    fn save(&mut self, document: &Document) -> Result<()> {
        self.document = document.clone();
        Ok(())
    }

    fn location(&self) -> String {
        "memory".to_string()
    }
}
