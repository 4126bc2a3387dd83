//! Per-column validators. Each is a pure function from raw text to a typed
//! value or a finding about that one field.

use chrono::NaiveDateTime;

use crate::constants::DATETIME_FORMAT;
use crate::diagnostics::{Diagnostic, DiagnosticCode};
use crate::schema::Column;

/// A problem with a single field, not yet tied to a source line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldIssue {
    pub column: Column,
    pub code: DiagnosticCode,
    pub message: String,
}

impl FieldIssue {
    fn new(column: Column, code: DiagnosticCode, message: impl Into<String>) -> Self {
        FieldIssue {
            column,
            code,
            message: message.into(),
        }
    }

    pub fn at(self, line: usize) -> Diagnostic {
        Diagnostic::new(
            line,
            self.code,
            format!("{}: {}", self.column.name(), self.message),
        )
    }
}

pub fn required(column: Column, raw: &str) -> Result<String, FieldIssue> {
    if raw.trim().is_empty() {
        return Err(FieldIssue::new(
            column,
            DiagnosticCode::EmptyRequiredField,
            "value is required",
        ));
    }
    Ok(raw.to_string())
}

/// Optional text. A missing value normalizes to the empty string.
pub fn optional(raw: Option<&str>) -> String {
    raw.unwrap_or_default().to_string()
}

/// Monday-first weekday number, 1 through 7.
pub fn weekday(raw: &str) -> Result<u8, FieldIssue> {
    let text = raw.trim();
    let digits = text.strip_prefix(['+', '-']).unwrap_or(text);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(FieldIssue::new(
            Column::Weekday,
            DiagnosticCode::InvalidWeekday,
            format!("'{}' is not an integer", raw),
        ));
    }

    // Integers too large for i64 are still integers, just out of range.
    match text.parse::<i64>().ok().and_then(|v| u8::try_from(v).ok()) {
        Some(day @ 1..=7) => Ok(day),
        _ => Err(FieldIssue::new(
            Column::Weekday,
            DiagnosticCode::WeekdayOutOfRange,
            format!("{} is outside 1-7 (1 = Monday)", text),
        )),
    }
}

/// `YYYY-MM-DD HH:MM`, nothing else: no seconds, no offset, zero-padded.
pub fn datetime(column: Column, raw: &str) -> Result<NaiveDateTime, FieldIssue> {
    let text = raw.trim();
    let invalid = || {
        FieldIssue::new(
            column,
            DiagnosticCode::InvalidDateTime,
            format!("'{}' does not match YYYY-MM-DD HH:MM", raw),
        )
    };

    if !has_datetime_shape(text) {
        return Err(invalid());
    }
    NaiveDateTime::parse_from_str(text, DATETIME_FORMAT).map_err(|_| invalid())
}

/// Byte-level shape check; chrono alone would accept unpadded fields.
fn has_datetime_shape(text: &str) -> bool {
    let bytes = text.as_bytes();
    bytes.len() == 16
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            10 => *b == b' ',
            13 => *b == b':',
            _ => b.is_ascii_digit(),
        })
}

/// `IsCourse` accepts exactly "0" or "1".
pub fn boolean_flag(raw: &str) -> Result<bool, FieldIssue> {
    match raw.trim() {
        "1" => Ok(true),
        "0" => Ok(false),
        other => Err(FieldIssue::new(
            Column::IsCourse,
            DiagnosticCode::InvalidBooleanFlag,
            format!("'{}' must be 0 or 1", other),
        )),
    }
}

/// Best-effort address shape: one `@`, non-empty local part, and a domain
/// containing a dot with text on both sides. Returns a warning-class issue.
pub fn email(raw: &str) -> Option<FieldIssue> {
    let text = raw.trim();
    let suspicious = || {
        Some(FieldIssue::new(
            Column::Email,
            DiagnosticCode::SuspiciousEmail,
            format!("'{}' does not look like an email address", text),
        ))
    };

    if text.chars().any(char::is_whitespace) {
        return suspicious();
    }
    let Some((local, domain)) = text.split_once('@') else {
        return suspicious();
    };
    if local.is_empty() || domain.contains('@') {
        return suspicious();
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) if !host.is_empty() && !tld.is_empty() => None,
        _ => suspicious(),
    }
}
