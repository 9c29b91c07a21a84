//! Decoding the backing file into records.

use crate::config::LoadPolicy;
use crate::error::{CoreError, CoreResult};
use crate::record::{StudentRecord, FIELD_COUNT, HEADER};
use crate::types::RollNumber;
use rosterdb_codec::{decode_document, CodecError, Format};
use std::collections::HashSet;
use std::fmt;
use tracing::{debug, warn};

/// Why a line of the backing file was left out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The line did not decode into a record.
    Malformed(CodecError),
    /// An earlier line already used this roll number.
    DuplicateRoll(RollNumber),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Malformed(e) => write!(f, "{e}"),
            Self::DuplicateRoll(roll) => write!(f, "duplicate roll number {roll}"),
        }
    }
}

/// A line that was skipped during load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedLine {
    /// 1-based line number.
    pub line: usize,
    /// Why it was skipped.
    pub reason: SkipReason,
    /// The line's text, kept so that rewrites do not lose it.
    pub text: String,
}

/// Outcome of loading the backing file.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LoadReport {
    /// Whether a backing file existed.
    pub found: bool,
    /// Number of records loaded.
    pub loaded: usize,
    /// Lines that were skipped, in file order.
    pub skipped: Vec<SkippedLine>,
}

impl LoadReport {
    /// Report for a store that started without a backing file.
    #[must_use]
    pub fn absent() -> Self {
        Self::default()
    }
}

/// Decode `text` into records.
///
/// The first line is the header and is never decoded as a record. Under
/// [`LoadPolicy::Skip`] every undecodable line and every repeated roll number
/// is skipped and reported; under [`LoadPolicy::Abort`] the first one fails
/// the load.
pub(crate) fn decode_records(
    text: &str,
    format: Format,
    policy: LoadPolicy,
) -> CoreResult<(Vec<StudentRecord>, LoadReport)> {
    let document = decode_document(text, format, FIELD_COUNT);

    let expected = HEADER.join(",");
    match document.header.as_deref() {
        Some(header) if header != expected => {
            warn!(%header, "unexpected header line in roster file");
        }
        _ => {}
    }

    let mut records = Vec::with_capacity(document.rows.len());
    let mut seen = HashSet::new();
    let mut report = LoadReport {
        found: true,
        ..LoadReport::default()
    };

    for decoded in document.rows {
        let line = decoded.line;
        let text = decoded.raw;
        let parsed = decoded
            .result
            .and_then(|row| StudentRecord::from_row(&row));

        let reason = match parsed {
            Ok(record) if seen.insert(record.roll_number) => {
                records.push(record);
                continue;
            }
            Ok(record) => {
                if policy == LoadPolicy::Abort {
                    return Err(CoreError::DuplicateInFile {
                        line,
                        roll: record.roll_number,
                    });
                }
                SkipReason::DuplicateRoll(record.roll_number)
            }
            Err(source) => {
                if policy == LoadPolicy::Abort {
                    return Err(CoreError::Malformed { line, source });
                }
                SkipReason::Malformed(source)
            }
        };

        warn!(line, %reason, "skipping line in roster file");
        report.skipped.push(SkippedLine { line, reason, text });
    }

    report.loaded = records.len();
    debug!(
        loaded = report.loaded,
        skipped = report.skipped.len(),
        "decoded roster file"
    );
    Ok((records, report))
}
