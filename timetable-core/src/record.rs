//! Record decoding for comma-delimited, double-quoted text.
//!
//! Rules:
//! - A field wrapped in `"..."` may contain the delimiter and newlines; a
//!   literal quote inside it is written `""`.
//! - Whitespace outside quotes is trimmed, whitespace inside quotes is kept.
//! - A quote left open at the end of a physical line continues the record on
//!   the next line. A quote still open at the end of input is an error.
//! - Blank lines between records are skipped.

use std::iter::Enumerate;
use std::str::Lines;

use crate::constants::DELIMITER;
use crate::diagnostics::{Diagnostic, DiagnosticCode};

/// Ordered raw fields of one logical record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRow {
    /// 1-based line the record starts on.
    pub line: usize,
    pub fields: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// A quoted field was still open when the input ended.
    UnterminatedQuote { line: usize },
    /// Text followed a closing quote before the next delimiter.
    MalformedQuoting { line: usize, found: char },
}

impl DecodeError {
    pub fn line(&self) -> usize {
        match self {
            DecodeError::UnterminatedQuote { line } => *line,
            DecodeError::MalformedQuoting { line, .. } => *line,
        }
    }
}

impl From<DecodeError> for Diagnostic {
    fn from(err: DecodeError) -> Self {
        match err {
            DecodeError::UnterminatedQuote { line } => Diagnostic::new(
                line,
                DiagnosticCode::UnterminatedQuote,
                "Quoted field is never closed; the rest of the file was read as part of it",
            ),
            DecodeError::MalformedQuoting { line, found } => Diagnostic::new(
                line,
                DiagnosticCode::MalformedQuoting,
                format!("Unexpected '{}' after a closing quote", found.escape_default()),
            ),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    FieldStart,
    Unquoted,
    Quoted,
    /// Just saw a quote inside a quoted field: either `""` or the close.
    QuoteInQuoted,
    AfterQuoted,
}

/// Character-level state machine shared by [`decode_record`] and
/// [`RecordDecoder`].
struct Scanner {
    fields: Vec<String>,
    buf: String,
    state: State,
    /// First character found after a closing quote. Scanning carries on so
    /// the record still ends at its real boundary.
    malformed: Option<char>,
}

impl Scanner {
    fn new() -> Self {
        Scanner {
            fields: Vec::new(),
            buf: String::new(),
            state: State::FieldStart,
            malformed: None,
        }
    }

    fn in_quotes(&self) -> bool {
        self.state == State::Quoted
    }

    fn feed(&mut self, text: &str) {
        for ch in text.chars() {
            match self.state {
                State::FieldStart => match ch {
                    DELIMITER => self.end_field(),
                    '"' => self.state = State::Quoted,
                    c if c.is_whitespace() => {}
                    c => {
                        self.buf.push(c);
                        self.state = State::Unquoted;
                    }
                },
                State::Unquoted => match ch {
                    DELIMITER => self.end_field(),
                    c => self.buf.push(c),
                },
                State::Quoted => match ch {
                    '"' => self.state = State::QuoteInQuoted,
                    c => self.buf.push(c),
                },
                State::QuoteInQuoted => match ch {
                    '"' => {
                        self.buf.push('"');
                        self.state = State::Quoted;
                    }
                    DELIMITER => self.end_field(),
                    c if c.is_whitespace() => self.state = State::AfterQuoted,
                    c => self.stray(c),
                },
                State::AfterQuoted => match ch {
                    DELIMITER => self.end_field(),
                    c if c.is_whitespace() => {}
                    c => self.stray(c),
                },
            }
        }
    }

    /// Text after a closing quote: remember it and read the rest of the
    /// field as unquoted so later quotes are still tracked.
    fn stray(&mut self, c: char) {
        self.malformed.get_or_insert(c);
        self.buf.push(c);
        self.state = State::Unquoted;
    }

    fn end_field(&mut self) {
        let raw = std::mem::take(&mut self.buf);
        let value = match self.state {
            State::Unquoted => raw.trim_end().to_string(),
            _ => raw,
        };
        self.fields.push(value);
        self.state = State::FieldStart;
    }

    /// Close the record. Malformed quoting wins over a quote left open,
    /// since it is where the record first went wrong.
    fn finish(mut self, line: usize) -> Result<Vec<String>, DecodeError> {
        if let Some(found) = self.malformed {
            return Err(DecodeError::MalformedQuoting { line, found });
        }
        if self.in_quotes() {
            return Err(DecodeError::UnterminatedQuote { line });
        }
        self.end_field();
        Ok(self.fields)
    }
}

/// Decode one logical record (embedded newlines already joined).
pub fn decode_record(text: &str, line: usize) -> Result<Vec<String>, DecodeError> {
    let mut scanner = Scanner::new();
    scanner.feed(text);
    scanner.finish(line)
}

/// Streams logical records out of a whole document, joining physical lines
/// while a quoted field is open.
pub struct RecordDecoder<'a> {
    lines: Enumerate<Lines<'a>>,
}

impl<'a> RecordDecoder<'a> {
    pub fn new(text: &'a str) -> Self {
        RecordDecoder {
            lines: text.lines().enumerate(),
        }
    }
}

impl Iterator for RecordDecoder<'_> {
    type Item = Result<RawRow, DecodeError>;

    fn next(&mut self) -> Option<Self::Item> {
        let (index, first) = self.lines.by_ref().find(|(_, l)| !l.trim().is_empty())?;
        let line = index + 1;

        let mut scanner = Scanner::new();
        let mut current = first;
        loop {
            scanner.feed(current);
            if !scanner.in_quotes() {
                break;
            }
            match self.lines.next() {
                Some((_, next)) => {
                    scanner.buf.push('\n');
                    current = next;
                }
                None => break,
            }
        }

        Some(scanner.finish(line).map(|fields| RawRow { line, fields }))
    }
}
