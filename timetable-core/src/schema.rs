//! Header checking and positional binding of decoded rows.

use serde::{Deserialize, Serialize};

use crate::diagnostics::{Diagnostic, DiagnosticCode};
use crate::kind::ScheduleKind;
use crate::record::RawRow;

/// Every column either file shape may contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Column {
    ProfessorName,
    Email,
    EventName,
    Location,
    Description,
    Weekday,
    StartTime,
    EndTime,
    IsCourse,
}

impl Column {
    /// Header spelling, which is also how diagnostics name the column.
    pub fn name(&self) -> &'static str {
        match self {
            Column::ProfessorName => "ProfessorName",
            Column::Email => "Email",
            Column::EventName => "EventName",
            Column::Location => "Location",
            Column::Description => "Description",
            Column::Weekday => "Weekday",
            Column::StartTime => "StartTime",
            Column::EndTime => "EndTime",
            Column::IsCourse => "IsCourse",
        }
    }
}

/// A row whose field count matched its kind. Values are still raw text.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundRow {
    pub kind: ScheduleKind,
    pub line: usize,
    fields: Vec<String>,
}

impl BoundRow {
    /// Raw value of a column, or `None` when the kind has no such column.
    pub fn get(&self, column: Column) -> Option<&str> {
        self.kind
            .position(column)
            .and_then(|i| self.fields.get(i))
            .map(String::as_str)
    }
}

/// Check that a decoded header names exactly the kind's columns, in order.
pub fn check_header(header: &RawRow, kind: ScheduleKind) -> Result<(), Diagnostic> {
    let expected = kind.header();
    if expected.iter().eq(header.fields.iter()) {
        return Ok(());
    }

    let mut message = format!(
        "Header must be exactly `{}`, found `{}`",
        kind.header_line(),
        header.fields.join(",")
    );
    if let Some(other) = ScheduleKind::detect(&header.fields) {
        message.push_str(&format!(" (this looks like a {} schedule)", other));
    }

    Err(Diagnostic::new(header.line, DiagnosticCode::HeaderMismatch, message))
}

/// Bind a decoded row to the kind's field layout.
pub fn bind(row: RawRow, kind: ScheduleKind) -> Result<BoundRow, Diagnostic> {
    if row.fields.len() != kind.arity() {
        return Err(Diagnostic::new(
            row.line,
            DiagnosticCode::FieldCount,
            format!(
                "Expected {} fields for a {} row, found {}",
                kind.arity(),
                kind,
                row.fields.len()
            ),
        ));
    }

    Ok(BoundRow {
        kind,
        line: row.line,
        fields: row.fields,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(line: usize, text: &str) -> RawRow {
        RawRow {
            line,
            fields: text.split(',').map(str::to_string).collect(),
        }
    }

    #[test]
    fn test_bind_professor_row_by_name() {
        let row = raw(3, "Dr. Li,li@uni.edu,Office Hour,B-201,,2,2025-01-07 14:00,2025-01-07 16:00");
        let bound = bind(row, ScheduleKind::ProfessorOfficeHour).unwrap();

        assert_eq!(bound.line, 3);
        assert_eq!(bound.get(Column::ProfessorName), Some("Dr. Li"));
        assert_eq!(bound.get(Column::Email), Some("li@uni.edu"));
        assert_eq!(bound.get(Column::Description), Some(""));
        assert_eq!(bound.get(Column::EndTime), Some("2025-01-07 16:00"));
        assert_eq!(bound.get(Column::IsCourse), None);
    }

    #[test]
    fn test_bind_rejects_wrong_arity() {
        let row = raw(5, "Calculus,Room 101,,1,2025-01-06 09:00,2025-01-06 12:00");
        let diagnostic = bind(row, ScheduleKind::StudentEvent).unwrap_err();

        assert_eq!(diagnostic.code, DiagnosticCode::FieldCount);
        assert_eq!(diagnostic.line, 5);
        assert!(diagnostic.message.contains("found 6"));
    }

    #[test]
    fn test_header_mismatch_hints_other_kind() {
        let header = raw(1, &ScheduleKind::ProfessorOfficeHour.header_line());
        let diagnostic = check_header(&header, ScheduleKind::StudentEvent).unwrap_err();

        assert_eq!(diagnostic.code, DiagnosticCode::HeaderMismatch);
        assert!(diagnostic.message.contains("professor schedule"));
    }

    #[test]
    fn test_header_order_is_load_bearing() {
        let header = raw(1, "Location,EventName,Description,Weekday,StartTime,EndTime,IsCourse");
        assert!(check_header(&header, ScheduleKind::StudentEvent).is_err());

        let header = raw(1, &ScheduleKind::StudentEvent.header_line());
        assert!(check_header(&header, ScheduleKind::StudentEvent).is_ok());
    }
}
