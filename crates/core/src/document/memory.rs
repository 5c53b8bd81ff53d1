//! In-memory document store.

use std::collections::HashMap;
use std::sync::RwLock;

use super::store::DocumentStore;
use super::types::Document;

/// In-memory implementation of [`DocumentStore`].
///
/// Documents live only as long as the process; there is no persistence
/// across restarts.
#[derive(Debug, Default)]
pub struct InMemoryDocumentStore {
    documents: RwLock<HashMap<String, Document>>,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents currently held.
    pub fn len(&self) -> usize {
        self.documents.read().expect("store lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl DocumentStore for InMemoryDocumentStore {
    fn save(&self, document: Document) {
        self.documents
            .write()
            .expect("store lock poisoned")
            .insert(document.id().to_string(), document);
    }

    fn get(&self, id: &str) -> Option<Document> {
        self.documents
            .read()
            .expect("store lock poisoned")
            .get(id)
            .cloned()
    }

    fn remove(&self, id: &str) -> bool {
        self.documents
            .write()
            .expect("store lock poisoned")
            .remove(id)
            .is_some()
    }
}
