//! Row encoder.

use crate::format::{Format, DELIMITER, QUOTE};

/// Returns true if `field` must be quoted under [`Format::Quoted`].
#[must_use]
fn needs_quoting(field: &str) -> bool {
    field
        .chars()
        .any(|c| c == DELIMITER || c == QUOTE || c == '\n' || c == '\r')
}

/// A line-oriented row encoder.
///
/// Rows are appended to an internal buffer, each terminated by `\n`. A
/// document is its header row followed by one row per record.
#[derive(Debug, Clone)]
pub struct RowEncoder {
    format: Format,
    buffer: String,
}

impl RowEncoder {
    /// Create a new encoder.
    #[must_use]
    pub fn new(format: Format) -> Self {
        Self {
            format,
            buffer: String::new(),
        }
    }

    /// Append one row.
    pub fn encode_row<I, S>(&mut self, fields: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for (i, field) in fields.into_iter().enumerate() {
            if i > 0 {
                self.buffer.push(DELIMITER);
            }
            self.encode_field(field.as_ref());
        }
        self.buffer.push('\n');
    }

    fn encode_field(&mut self, field: &str) {
        match self.format {
            Format::Legacy => self.buffer.push_str(field),
            Format::Quoted if needs_quoting(field) => {
                self.buffer.push(QUOTE);
                for c in field.chars() {
                    if c == QUOTE {
                        self.buffer.push(QUOTE);
                    }
                    self.buffer.push(c);
                }
                self.buffer.push(QUOTE);
            }
            Format::Quoted => self.buffer.push_str(field),
        }
    }

    /// Append `text` verbatim, followed by `\n`.
    ///
    /// Used to carry lines that did not decode through a rewrite unchanged.
    pub fn encode_raw(&mut self, text: &str) {
        self.buffer.push_str(text);
        self.buffer.push('\n');
    }

    /// Consume the encoder and return the encoded text.
    #[must_use]
    pub fn into_string(self) -> String {
        self.buffer
    }
}
