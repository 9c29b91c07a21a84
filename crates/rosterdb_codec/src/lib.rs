//! # RosterDB Codec
//!
//! Delimited text encoding/decoding for RosterDB roster files.
//!
//! A roster file is a header line followed by one record per line:
//!
//! ```text
//! RollNumber,Name,Department,Age,Email,Phone
//! 101,Ann,CS,20,a@x.com,555
//! ```
//!
//! The codec is schema-free: it turns lines into [`Row`]s of text fields and
//! back. Which field is which, and which ones are integers, is decided by the
//! caller.
//!
//! ## Formats
//!
//! - [`Format::Legacy`] - unescaped fields; the last field takes the rest of
//!   the line, commas included
//! - [`Format::Quoted`] - double-quote escaping for fields containing
//!   delimiters, quotes, or line breaks
//!
//! ## Usage
//!
//! ```
//! use rosterdb_codec::{decode_document, Format, RowEncoder};
//!
//! let mut encoder = RowEncoder::new(Format::Legacy);
//! encoder.encode_row(["Id", "Name"]);
//! encoder.encode_row(["1", "Ann"]);
//! let text = encoder.into_string();
//! assert_eq!(text, "Id,Name\n1,Ann\n");
//!
//! let doc = decode_document(&text, Format::Legacy, 2);
//! assert_eq!(doc.header.as_deref(), Some("Id,Name"));
//! assert_eq!(doc.rows[0].result.as_ref().unwrap().text(1), "Ann");
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod decoder;
mod encoder;
mod error;
mod format;
mod row;

pub use decoder::{decode_document, DecodedRow, Document, RowDecoder};
pub use encoder::RowEncoder;
pub use error::{CodecError, CodecResult};
pub use format::{Format, DELIMITER, QUOTE};
pub use row::Row;

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn field() -> impl Strategy<Value = String> {
        prop::string::string_regex("[ -~\n]{0,12}").expect("Invalid regex")
    }

    proptest! {
        #[test]
        fn quoted_documents_decode_to_their_rows(
            rows in prop::collection::vec(prop::collection::vec(field(), 4), 0..8)
        ) {
            let mut encoder = RowEncoder::new(Format::Quoted);
            encoder.encode_row(["A", "B", "C", "D"]);
            for row in &rows {
                encoder.encode_row(row);
            }
            let text = encoder.into_string();
            let doc = decode_document(&text, Format::Quoted, 4);

            let decoded: Vec<Vec<String>> = doc
                .rows
                .into_iter()
                .map(|r| r.result.unwrap().into_fields())
                .collect();
            prop_assert_eq!(decoded, rows);
        }
    }
}
