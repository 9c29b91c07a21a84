//! Row encodings understood by the codec.

use std::fmt;

/// Field delimiter for every format.
pub const DELIMITER: char = ',';

/// Quote character used by [`Format::Quoted`].
pub const QUOTE: char = '"';

/// How fields are written to and read from a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Format {
    /// Unescaped comma-separated fields.
    ///
    /// The first `n - 1` fields end at the first `n - 1` commas, and the last
    /// field takes the rest of the line verbatim. A comma inside any other
    /// field shifts every following field.
    #[default]
    Legacy,

    /// Comma-separated fields with double-quote escaping.
    ///
    /// Fields containing a comma, quote, or line break are quoted, with inner
    /// quotes doubled. Fields without such characters are written exactly as
    /// in [`Format::Legacy`].
    Quoted,
}

impl Format {
    /// Returns the canonical name of the format.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Legacy => "legacy",
            Self::Quoted => "quoted",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
