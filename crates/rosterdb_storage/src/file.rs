//! File-based storage backend for persistent storage.

use crate::backend::StorageBackend;
use crate::error::{StorageError, StorageResult};
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// A file-based storage backend.
///
/// The document is a single file. Opening the backend does not touch the
/// file system; a missing file is reported by [`StorageBackend::read`] as
/// `Ok(None)` and is first created by [`StorageBackend::write`].
///
/// # Durability
///
/// Every `write` truncates the file, writes the full document, flushes, and
/// calls `File::sync_all()` before closing it again.
///
/// # Example
///
/// ```no_run
/// use rosterdb_storage::{StorageBackend, FileBackend};
/// use std::path::Path;
///
/// let mut backend = FileBackend::open(Path::new("students.csv"));
/// backend.write(b"RollNumber,Name,Department,Age,Email,Phone\n").unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct FileBackend {
    path: PathBuf,
    create_dirs: bool,
}

impl FileBackend {
    /// Creates a file backend for the given path.
    #[must_use]
    pub fn open(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            create_dirs: false,
        }
    }

    /// Creates a file backend that creates missing parent directories on write.
    #[must_use]
    pub fn open_with_create_dirs(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            create_dirs: true,
        }
    }
}

impl StorageBackend for FileBackend {
    fn read(&self) -> StorageResult<Option<Vec<u8>>> {
        match fs::read(&self.path) {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(_) if self.path.is_dir() => Err(StorageError::NotAFile {
                location: self.location(),
            }),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&mut self, data: &[u8]) -> StorageResult<()> {
        if self.create_dirs {
            if let Some(parent) = self.path.parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent)?;
                }
            }
        }

        let mut file = File::create(&self.path)?;
        file.write_all(data)?;
        file.flush()?;
        file.sync_all()?;
        Ok(())
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}
