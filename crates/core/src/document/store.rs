//! Storage trait for documents.

use super::types::Document;

/// A store for conversion request records.
///
/// The reference deployment keeps documents in memory only; a durable
/// implementation can be swapped in behind this trait without touching the
/// pipeline.
pub trait DocumentStore: Send + Sync {
    /// Saves a document, replacing any previous snapshot with the same id.
    fn save(&self, document: Document);

    /// Returns a document snapshot by id.
    fn get(&self, id: &str) -> Option<Document>;

    /// Removes a document by id, returning true if it existed.
    fn remove(&self, id: &str) -> bool;
}
