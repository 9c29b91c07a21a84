//! In-memory storage backend for testing.

use crate::backend::StorageBackend;
use crate::error::{StorageError, StorageResult};
use parking_lot::RwLock;
use std::sync::Arc;

#[derive(Debug, Default)]
struct Shared {
    document: Option<Vec<u8>>,
    writes: usize,
    fail_writes: bool,
}

/// An in-memory storage backend.
///
/// Clones share the same document, so a test can hand one clone to a store
/// and keep another to inspect what was persisted:
///
/// ```rust
/// use rosterdb_storage::{StorageBackend, InMemoryBackend};
///
/// let handle = InMemoryBackend::new();
/// let mut backend = handle.clone();
/// backend.write(b"test data").unwrap();
///
/// assert_eq!(handle.document().unwrap(), b"test data");
/// assert_eq!(handle.write_count(), 1);
/// ```
///
/// Writes can be made to fail with [`InMemoryBackend::set_fail_writes`] to
/// exercise persistence error paths.
#[derive(Debug, Clone, Default)]
pub struct InMemoryBackend {
    shared: Arc<RwLock<Shared>>,
}

impl InMemoryBackend {
    /// Creates a new backend with no document.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new backend with a pre-existing document.
    ///
    /// Useful for testing load behavior.
    #[must_use]
    pub fn with_data(data: impl Into<Vec<u8>>) -> Self {
        let backend = Self::default();
        backend.shared.write().document = Some(data.into());
        backend
    }

    /// Returns a copy of the current document, if any.
    #[must_use]
    pub fn document(&self) -> Option<Vec<u8>> {
        self.shared.read().document.clone()
    }

    /// Returns the current document as text, if any.
    #[must_use]
    pub fn document_text(&self) -> Option<String> {
        self.document()
            .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Number of successful writes so far.
    #[must_use]
    pub fn write_count(&self) -> usize {
        self.shared.read().writes
    }

    /// Makes every following write fail (or succeed again).
    pub fn set_fail_writes(&self, fail: bool) {
        self.shared.write().fail_writes = fail;
    }
}

impl StorageBackend for InMemoryBackend {
    fn read(&self) -> StorageResult<Option<Vec<u8>>> {
        Ok(self.shared.read().document.clone())
    }

    fn write(&mut self, data: &[u8]) -> StorageResult<()> {
        let mut shared = self.shared.write();
        if shared.fail_writes {
            return Err(StorageError::unavailable("writes are disabled"));
        }
        shared.document = Some(data.to_vec());
        shared.writes += 1;
        Ok(())
    }

    fn location(&self) -> String {
        "<memory>".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_new_is_absent() {
        let backend = InMemoryBackend::new();
        assert!(backend.read().unwrap().is_none());
        assert_eq!(backend.write_count(), 0);
    }

    #[test]
    fn memory_write_replaces() {
        let mut backend = InMemoryBackend::new();
        backend.write(b"hello world").unwrap();
        backend.write(b"bye").unwrap();

        assert_eq!(backend.read().unwrap().unwrap(), b"bye");
        assert_eq!(backend.write_count(), 2);
    }

    #[test]
    fn memory_with_data() {
        let backend = InMemoryBackend::with_data(b"preloaded".to_vec());
        assert_eq!(backend.read().unwrap().unwrap(), b"preloaded");
        assert_eq!(backend.write_count(), 0);
    }

    #[test]
    fn memory_clones_share_document() {
        let handle = InMemoryBackend::new();
        let mut writer = handle.clone();
        writer.write(b"shared").unwrap();

        assert_eq!(handle.document_text().as_deref(), Some("shared"));
    }

    #[test]
    fn memory_failed_write_keeps_previous_document() {
        let mut backend = InMemoryBackend::with_data(b"before".to_vec());
        backend.set_fail_writes(true);

        let result = backend.write(b"after");
        assert!(matches!(result, Err(StorageError::Unavailable(_))));
        assert_eq!(backend.document().unwrap(), b"before");
        assert_eq!(backend.write_count(), 0);

        backend.set_fail_writes(false);
        backend.write(b"after").unwrap();
        assert_eq!(backend.document().unwrap(), b"after");
    }
}
