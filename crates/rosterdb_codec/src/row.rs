//! Schema-free decoded rows.

use crate::error::{CodecError, CodecResult};
use std::str::FromStr;

/// The raw text fields of one record, in file order.
///
/// A `Row` knows nothing about what its fields mean; the schema owner picks
/// fields out by index and converts them.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Row {
    fields: Vec<String>,
}

impl Row {
    /// Creates a row from its fields.
    #[must_use]
    pub fn new(fields: Vec<String>) -> Self {
        Self { fields }
    }

    /// Consumes the row, returning its fields.
    #[must_use]
    pub fn into_fields(self) -> Vec<String> {
        self.fields
    }

    /// The field at `index` as text, or `""` if the row is shorter.
    #[must_use]
    pub fn text(&self, index: usize) -> &str {
        self.fields.get(index).map_or("", String::as_str)
    }

    /// Parses the field at `index` as an integer, ignoring surrounding
    /// whitespace.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::InvalidInteger`] naming `field` if the text is
    /// not an integer of type `T`.
    pub fn integer<T: FromStr>(&self, index: usize, field: &str) -> CodecResult<T> {
        let raw = self.text(index);
        raw.trim()
            .parse()
            .map_err(|_| CodecError::invalid_integer(field, raw))
    }
}
