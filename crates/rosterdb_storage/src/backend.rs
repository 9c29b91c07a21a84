//! Storage backend trait definition.

use crate::error::StorageResult;

/// A whole-document storage backend for RosterDB.
///
/// Storage backends are **opaque byte stores** holding exactly one document.
/// RosterDB reads the document once when a store is opened and replaces it
/// after every successful mutation.
///
/// # Invariants
///
/// - `read` returns `Ok(None)` when no document has ever been written
/// - `read` after a successful `write` returns exactly the written bytes
/// - `write` replaces; nothing of the previous document survives
/// - A failed `write` leaves no guarantee about the document's contents
///
/// # Implementors
///
/// - [`super::InMemoryBackend`] - For testing
/// - [`super::FileBackend`] - For persistent storage
pub trait StorageBackend: Send + Sync {
    /// Reads the whole document.
    ///
    /// # Errors
    ///
    /// Returns an error if the document exists but cannot be read.
    fn read(&self) -> StorageResult<Option<Vec<u8>>>;

    /// Replaces the whole document with `data`.
    ///
    /// After this returns successfully the data is durable.
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot be opened or written.
    fn write(&mut self, data: &[u8]) -> StorageResult<()>;

    /// Human-readable description of where the document lives.
    fn location(&self) -> String;
}
