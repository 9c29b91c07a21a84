//! Test fixtures and store helpers.
//!
//! Provides convenience functions for setting up test stores
//! and common test scenarios.

use rosterdb_core::{Config, RecordStore, StudentRecord};
use rosterdb_storage::InMemoryBackend;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A test store with automatic cleanup.
pub struct TestStore {
    /// The store instance.
    pub store: RecordStore,
    /// Handle to the in-memory document, for in-memory stores.
    pub backend: Option<InMemoryBackend>,
    path: Option<PathBuf>,
    /// The temporary directory (kept alive to prevent cleanup).
    _temp_dir: Option<TempDir>,
}

impl TestStore {
    /// Creates a new in-memory test store.
    pub fn memory() -> Self {
        Self::memory_with_config(&Config::default())
    }

    /// Creates a new in-memory test store with the given configuration.
    pub fn memory_with_config(config: &Config) -> Self {
        let backend = InMemoryBackend::new();
        let store = RecordStore::open_with_backend(config, Box::new(backend.clone()))
            .expect("Failed to open in-memory store");
        Self {
            store,
            backend: Some(backend),
            path: None,
            _temp_dir: None,
        }
    }

    /// Creates a new file-based test store in a fresh temporary directory.
    pub fn file() -> Self {
        Self::file_with_config(Config::default())
    }

    /// Creates a new file-based test store; `config.path` is replaced by a
    /// path inside a fresh temporary directory.
    pub fn file_with_config(config: Config) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("students.csv");
        let store = RecordStore::open(&config.path(&path)).expect("Failed to open file store");
        Self {
            store,
            backend: None,
            path: Some(path),
            _temp_dir: Some(temp_dir),
        }
    }

    /// Returns the backing file path if file-based, None if in-memory.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Opens a second store over the same backing document.
    pub fn reopen(&self, config: &Config) -> RecordStore {
        match (&self.backend, &self.path) {
            (Some(backend), _) => {
                RecordStore::open_with_backend(config, Box::new(backend.clone()))
                    .expect("Failed to reopen in-memory store")
            }
            (None, Some(path)) => RecordStore::open(&config.clone().path(path))
                .expect("Failed to reopen file store"),
            (None, None) => unreachable!("test store has neither backend nor path"),
        }
    }
}

impl std::ops::Deref for TestStore {
    type Target = RecordStore;

    fn deref(&self) -> &Self::Target {
        &self.store
    }
}

impl std::ops::DerefMut for TestStore {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.store
    }
}

/// Runs a test with a temporary in-memory store.
pub fn with_temp_store<F, R>(f: F) -> R
where
    F: FnOnce(&mut RecordStore) -> R,
{
    let mut test_store = TestStore::memory();
    f(&mut test_store.store)
}

/// A small roster with distinct roll numbers, including the names used in
/// name-search examples.
pub fn sample_records() -> Vec<StudentRecord> {
    vec![
        StudentRecord::new(101, "Ann", "CS", 20, "a@x.com", "555"),
        StudentRecord::new(102, "Alice Smith", "Math", 21, "alice@x.com", "555-0102"),
        StudentRecord::new(103, "Bob Jones", "EE", 22, "bob@x.com", "555-0103"),
        StudentRecord::new(104, "Malice Cooper", "Music", 23, "mc@x.com", "555-0104"),
    ]
}

/// Test scenario helpers.
pub mod scenarios {
    use super::*;

    /// Creates an in-memory store holding [`sample_records`].
    pub fn populated_store() -> TestStore {
        let mut test_store = TestStore::memory();
        for record in sample_records() {
            test_store.store.add(record).expect("Failed to add record");
        }
        test_store
    }

    /// Creates an in-memory store with `count` generated records, roll
    /// numbers `1..=count`.
    pub fn numbered_store(count: usize) -> TestStore {
        let mut test_store = TestStore::memory();
        for i in 1..=count {
            let roll = i64::try_from(i).expect("count fits in i64");
            test_store
                .store
                .add(StudentRecord::new(
                    roll,
                    format!("Student {i}"),
                    "General",
                    18,
                    format!("s{i}@x.com"),
                    format!("555-{i:04}"),
                ))
                .expect("Failed to add record");
        }
        test_store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rosterdb_core::RollNumber;

    #[test]
    fn test_memory_store() {
        let test_store = TestStore::memory();
        assert!(test_store.is_empty());
        assert!(test_store.path().is_none());
    }

    #[test]
    fn test_file_store_reopens() {
        let mut test_store = TestStore::file();
        test_store.add(sample_records().remove(0)).unwrap();
        assert!(test_store.path().unwrap().exists());

        let reopened = test_store.reopen(&Config::default());
        assert_eq!(reopened.len(), 1);
    }

    #[test]
    fn test_with_temp_store() {
        with_temp_store(|store| {
            store.add(sample_records().remove(1)).unwrap();
            assert_eq!(store.find_by_name_part("smith"), vec![0]);
        });
    }

    #[test]
    fn test_populated_scenario() {
        let test_store = scenarios::populated_store();
        assert_eq!(test_store.len(), 4);
        assert_eq!(test_store.backend.as_ref().unwrap().write_count(), 4);
    }

    #[test]
    fn test_numbered_scenario() {
        let test_store = scenarios::numbered_store(12);
        assert_eq!(test_store.len(), 12);
        assert_eq!(test_store.find_by_roll(RollNumber(12)), Some(11));
    }
}
