//! Error types for the codec crate.

use thiserror::Error;

/// Result type for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;

/// Errors that can occur while decoding a row.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// The row does not have the expected number of fields.
    #[error("expected {expected} fields, found {found}")]
    FieldCount {
        /// Fields the schema requires.
        expected: usize,
        /// Fields present in the row.
        found: usize,
    },

    /// A field that must hold an integer does not.
    #[error("field `{field}` is not an integer: {value:?}")]
    InvalidInteger {
        /// Name of the field.
        field: String,
        /// The raw text found.
        value: String,
    },

    /// A quoted field was never closed.
    #[error("unterminated quoted field")]
    UnterminatedQuote,

    /// Text follows a closing quote before the next delimiter.
    #[error("unexpected character {found:?} after closing quote")]
    TrailingAfterQuote {
        /// The offending character.
        found: char,
    },
}

impl CodecError {
    /// Create an invalid integer error.
    pub fn invalid_integer(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::InvalidInteger {
            field: field.into(),
            value: value.into(),
        }
    }
}
