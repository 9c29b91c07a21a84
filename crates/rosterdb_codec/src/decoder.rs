//! Row decoder.

use crate::error::{CodecError, CodecResult};
use crate::format::{Format, DELIMITER, QUOTE};
use crate::row::Row;

/// One decoded record together with where it started.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedRow {
    /// 1-based physical line on which the record starts.
    pub line: usize,
    /// The row, or why it could not be decoded.
    pub result: CodecResult<Row>,
    /// The record's text as it appeared, without its final line ending.
    pub raw: String,
}

/// A decoded document.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Document {
    /// The first line of the document, if there was one.
    pub header: Option<String>,
    /// Every non-blank record after the header, in order.
    pub rows: Vec<DecodedRow>,
}

/// Decode a whole document.
///
/// The first line is always taken as the header, whatever it contains.
/// Blank lines are skipped. A record that cannot be decoded is returned as an
/// error in place; decoding continues with the next record.
#[must_use]
pub fn decode_document(text: &str, format: Format, field_count: usize) -> Document {
    let mut decoder = RowDecoder::new(text, format, field_count);
    let header = decoder.take_header().map(str::to_string);
    Document {
        header,
        rows: decoder.collect(),
    }
}

/// An iterator over the records of a document.
///
/// Line endings may be `\n` or `\r\n`.
#[derive(Debug, Clone)]
pub struct RowDecoder<'a> {
    rest: &'a str,
    line: usize,
    format: Format,
    field_count: usize,
}

impl<'a> RowDecoder<'a> {
    /// Create a decoder positioned at the start of `text`.
    #[must_use]
    pub fn new(text: &'a str, format: Format, field_count: usize) -> Self {
        Self {
            rest: text,
            line: 0,
            format,
            field_count,
        }
    }

    /// Consume the next physical line as a header and return it.
    pub fn take_header(&mut self) -> Option<&'a str> {
        self.next_line().map(|(_, line)| line)
    }

    fn next_line(&mut self) -> Option<(usize, &'a str)> {
        if self.rest.is_empty() {
            return None;
        }
        let (line, rest) = match self.rest.find('\n') {
            Some(pos) => (&self.rest[..pos], &self.rest[pos + 1..]),
            None => (self.rest, ""),
        };
        self.rest = rest;
        self.line += 1;
        Some((self.line, line.strip_suffix('\r').unwrap_or(line)))
    }

    fn next_legacy(&mut self) -> Option<DecodedRow> {
        loop {
            let (line_no, line) = self.next_line()?;
            if line.is_empty() {
                continue;
            }
            return Some(DecodedRow {
                line: line_no,
                result: split_legacy(line, self.field_count),
                raw: line.to_string(),
            });
        }
    }

    fn next_quoted(&mut self) -> Option<DecodedRow> {
        loop {
            if self.rest.is_empty() {
                return None;
            }
            let start = self.line + 1;
            let record = parse_quoted_record(self.rest);

            if record.blank {
                self.rest = &self.rest[record.consumed..];
                self.line += record.lines;
                continue;
            }

            let result = record.fields.and_then(|fields| {
                if fields.len() == self.field_count {
                    Ok(Row::new(fields))
                } else {
                    Err(CodecError::FieldCount {
                        expected: self.field_count,
                        found: fields.len(),
                    })
                }
            });

            // A line the quoted grammar rejects may still be a valid legacy
            // line, such as a phone with commas or a name starting with a quote.
            if result.is_err() {
                if let Some((line_no, line)) = self.peek_line() {
                    if let Ok(row) = split_legacy(line, self.field_count) {
                        self.next_line();
                        return Some(DecodedRow {
                            line: line_no,
                            result: Ok(row),
                            raw: line.to_string(),
                        });
                    }
                }
            }

            let text = &self.rest[..record.consumed];
            let raw = text.strip_suffix('\n').unwrap_or(text);
            let raw = raw.strip_suffix('\r').unwrap_or(raw).to_string();
            self.rest = &self.rest[record.consumed..];
            self.line += record.lines;
            return Some(DecodedRow {
                line: start,
                result,
                raw,
            });
        }
    }

    fn peek_line(&self) -> Option<(usize, &'a str)> {
        self.clone().next_line()
    }
}

impl Iterator for RowDecoder<'_> {
    type Item = DecodedRow;

    fn next(&mut self) -> Option<Self::Item> {
        match self.format {
            Format::Legacy => self.next_legacy(),
            Format::Quoted => self.next_quoted(),
        }
    }
}

/// Split one legacy line into exactly `field_count` fields.
///
/// The last field keeps any further delimiters verbatim.
fn split_legacy(line: &str, field_count: usize) -> CodecResult<Row> {
    let fields: Vec<String> = line
        .splitn(field_count, DELIMITER)
        .map(str::to_string)
        .collect();
    if fields.len() < field_count {
        return Err(CodecError::FieldCount {
            expected: field_count,
            found: fields.len(),
        });
    }
    Ok(Row::new(fields))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    FieldStart,
    Unquoted,
    Quoted,
    AfterQuote,
    Skipping,
}

struct QuotedRecord {
    fields: CodecResult<Vec<String>>,
    consumed: usize,
    lines: usize,
    blank: bool,
}

/// Parse one quoted-format record from the front of `input`.
///
/// On error the rest of the physical line is skipped so that decoding can
/// resume at the next record.
fn parse_quoted_record(input: &str) -> QuotedRecord {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut state = State::FieldStart;
    let mut error = None;
    let mut saw_quote = false;
    let mut lines = 1;
    let mut consumed = input.len();

    let mut chars = input.char_indices().peekable();
    while let Some((i, c)) = chars.next() {
        match state {
            State::FieldStart | State::Unquoted => match c {
                QUOTE if state == State::FieldStart => {
                    saw_quote = true;
                    state = State::Quoted;
                }
                DELIMITER => {
                    fields.push(std::mem::take(&mut field));
                    state = State::FieldStart;
                }
                '\n' => {
                    consumed = i + 1;
                    break;
                }
                _ => {
                    field.push(c);
                    state = State::Unquoted;
                }
            },
            State::Quoted => match c {
                QUOTE => {
                    if matches!(chars.peek(), Some((_, QUOTE))) {
                        chars.next();
                        field.push(QUOTE);
                    } else {
                        state = State::AfterQuote;
                    }
                }
                '\n' => {
                    lines += 1;
                    field.push(c);
                }
                _ => field.push(c),
            },
            State::AfterQuote => match c {
                DELIMITER => {
                    fields.push(std::mem::take(&mut field));
                    state = State::FieldStart;
                }
                '\n' => {
                    consumed = i + 1;
                    break;
                }
                '\r' if matches!(chars.peek(), None | Some((_, '\n'))) => {}
                other => {
                    error = Some(CodecError::TrailingAfterQuote { found: other });
                    state = State::Skipping;
                }
            },
            State::Skipping => {
                if c == '\n' {
                    consumed = i + 1;
                    break;
                }
            }
        }
    }

    if state == State::Quoted {
        error = Some(CodecError::UnterminatedQuote);
    }
    if matches!(state, State::FieldStart | State::Unquoted) && field.ends_with('\r') {
        field.pop();
    }
    fields.push(field);

    let blank = !saw_quote && fields.len() == 1 && fields[0].is_empty();
    QuotedRecord {
        fields: match error {
            Some(e) => Err(e),
            None => Ok(fields),
        },
        consumed,
        lines,
        blank,
    }
}
