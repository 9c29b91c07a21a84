//! Error types for RosterDB core.

use crate::types::RollNumber;
use rosterdb_codec::CodecError;
use thiserror::Error;

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur in RosterDB core operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// No record has the given roll number.
    #[error("student with roll number {roll} not found")]
    NotFound {
        /// The roll number searched for.
        roll: RollNumber,
    },

    /// Another record already has the given roll number.
    #[error("student with roll number {roll} already exists")]
    DuplicateKey {
        /// The conflicting roll number.
        roll: RollNumber,
    },

    /// The in-memory change was applied but could not be written out.
    #[error("could not save to {location}: {source}")]
    Persist {
        /// Where the store tried to write.
        location: String,
        /// The underlying storage error.
        #[source]
        source: rosterdb_storage::StorageError,
    },

    /// Storage backend error while reading.
    #[error("storage error: {0}")]
    Storage(#[from] rosterdb_storage::StorageError),

    /// The backing file is not valid UTF-8 text.
    #[error("{location} is not valid UTF-8 text")]
    InvalidUtf8 {
        /// Where the store read from.
        location: String,
    },

    /// A line could not be decoded and the load policy is abort.
    #[error("line {line}: {source}")]
    Malformed {
        /// 1-based line number.
        line: usize,
        /// Why the line was rejected.
        #[source]
        source: CodecError,
    },

    /// The backing file lists a roll number twice and the load policy is abort.
    #[error("line {line}: duplicate roll number {roll}")]
    DuplicateInFile {
        /// 1-based line number of the second occurrence.
        line: usize,
        /// The repeated roll number.
        roll: RollNumber,
    },
}

impl CoreError {
    /// Creates a not found error.
    pub fn not_found(roll: RollNumber) -> Self {
        Self::NotFound { roll }
    }

    /// Creates a duplicate key error.
    pub fn duplicate_key(roll: RollNumber) -> Self {
        Self::DuplicateKey { roll }
    }

    /// Returns true if the error left the in-memory store modified.
    ///
    /// Only [`CoreError::Persist`] does; every other error is raised before
    /// any change.
    #[must_use]
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Persist { .. })
    }
}
