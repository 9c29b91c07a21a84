//! # RosterDB Core
//!
//! Student record store for RosterDB.
//!
//! This crate provides:
//! - [`StudentRecord`] and its [`RollNumber`] key
//! - [`RecordStore`], an ordered in-memory roster with unique roll numbers
//!   that rewrites its backing file after every change
//! - [`Config`] and [`LoadPolicy`] for how the backing file is opened
//! - [`LoadReport`] describing what the initial load kept and skipped

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod error;
mod load;
mod record;
mod store;
mod types;

pub use config::{Config, LoadPolicy, DEFAULT_FILE_NAME};
pub use error::{CoreError, CoreResult};
pub use load::{LoadReport, SkipReason, SkippedLine};
pub use record::{StudentRecord, FIELD_COUNT, HEADER};
pub use store::RecordStore;
pub use types::RollNumber;
