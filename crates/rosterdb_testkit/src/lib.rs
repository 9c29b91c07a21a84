//! # RosterDB Testkit
//!
//! Test utilities for RosterDB.
//!
//! This crate provides:
//! - Test fixtures: in-memory and temp-file stores, sample rosters
//! - Property-based test generators using proptest
//!
//! ## Usage
//!
//! ```rust
//! use rosterdb_testkit::prelude::*;
//!
//! with_temp_store(|store| {
//!     store.add(sample_records().remove(0)).unwrap();
//!     assert_eq!(store.len(), 1);
//! });
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod generators;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::fixtures::*;
    pub use crate::generators::*;
}

pub use fixtures::*;
pub use generators::*;
