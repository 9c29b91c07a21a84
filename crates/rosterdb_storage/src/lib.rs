//! # RosterDB Storage
//!
//! Storage backend trait and implementations for RosterDB.
//!
//! A backing store here is a single **opaque document**: the whole roster is
//! read in one call at startup and rewritten in one call after every change.
//! Backends do not interpret the bytes; the delimited text format is owned by
//! `rosterdb_codec`.
//!
//! ## Design Principles
//!
//! - A missing document is `Ok(None)`, not an error
//! - `write` replaces the previous contents entirely
//! - No partial writes, no appends, no locking
//! - Must be `Send + Sync`
//!
//! ## Available Backends
//!
//! - [`InMemoryBackend`] - For testing, with shared handles and write failure injection
//! - [`FileBackend`] - For persistent storage using OS file APIs
//!
//! ## Example
//!
//! ```rust
//! use rosterdb_storage::{StorageBackend, InMemoryBackend};
//!
//! let mut backend = InMemoryBackend::new();
//! assert!(backend.read().unwrap().is_none());
//!
//! backend.write(b"RollNumber,Name\n").unwrap();
//! assert_eq!(backend.read().unwrap().unwrap(), b"RollNumber,Name\n");
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod backend;
mod error;
mod file;
mod memory;

pub use backend::StorageBackend;
pub use error::{StorageError, StorageResult};
pub use file::FileBackend;
pub use memory::InMemoryBackend;
