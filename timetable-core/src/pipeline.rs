//! One file, start to end: decode, bind, type, check, detect conflicts.
//!
//! A pipeline owns nothing mutable between runs, so independent files can be
//! validated concurrently with one `Pipeline::run` call each.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::conflict;
use crate::constants::DEFAULT_STUDENT;
use crate::diagnostics::{Diagnostic, DiagnosticCode, Diagnostics, Severity};
use crate::event::{Event, SubjectKey};
use crate::field;
use crate::kind::ScheduleKind;
use crate::policy::Policy;
use crate::record::RecordDecoder;
use crate::schema::{self, BoundRow, Column};
use crate::temporal;

const BYTE_ORDER_MARK: char = '\u{feff}';

/// Zero or more findings plus the value, if one could be built.
#[derive(Debug, Clone, PartialEq)]
pub struct RowOutcome<T> {
    pub value: Option<T>,
    pub diagnostics: Vec<Diagnostic>,
}

#[derive(Debug, Clone)]
pub struct Pipeline {
    kind: ScheduleKind,
    policy: Policy,
    student: String,
}

impl Pipeline {
    pub fn new(kind: ScheduleKind, policy: Policy) -> Self {
        Pipeline {
            kind,
            policy,
            student: DEFAULT_STUDENT.to_string(),
        }
    }

    /// Name the student a student file belongs to.
    pub fn with_student(mut self, name: impl Into<String>) -> Self {
        self.student = name.into();
        self
    }

    pub fn kind(&self) -> ScheduleKind {
        self.kind
    }

    pub fn policy(&self) -> &Policy {
        &self.policy
    }

    /// Validate a whole document. Never fails: every problem becomes a
    /// diagnostic in the returned report.
    pub fn run(&self, input: &str) -> ImportReport {
        let mut diagnostics = Diagnostics::new(self.policy.clone());
        let mut events = Vec::new();
        let mut rows = 0;

        let text = match input.strip_prefix(BYTE_ORDER_MARK) {
            Some(rest) => {
                diagnostics.record(Diagnostic::new(
                    1,
                    DiagnosticCode::ByteOrderMark,
                    "File starts with a UTF-8 byte-order mark; save it as UTF-8 without BOM",
                ));
                rest
            }
            None => input,
        };

        let mut records = RecordDecoder::new(text);

        let header_ok = match records.next() {
            None => {
                diagnostics.record(Diagnostic::new(
                    1,
                    DiagnosticCode::MissingHeader,
                    format!("File is empty; expected header `{}`", self.kind.header_line()),
                ));
                false
            }
            Some(Err(err)) => {
                diagnostics.record(Diagnostic::new(
                    err.line(),
                    DiagnosticCode::HeaderMismatch,
                    format!(
                        "Header could not be decoded; expected `{}`",
                        self.kind.header_line()
                    ),
                ));
                false
            }
            Some(Ok(header)) => match schema::check_header(&header, self.kind) {
                Ok(()) => true,
                Err(diagnostic) => {
                    diagnostics.record(diagnostic);
                    false
                }
            },
        };

        if header_ok {
            for record in records {
                rows += 1;
                let row = match record {
                    Ok(row) => row,
                    Err(err) => {
                        diagnostics.record(err.into());
                        continue;
                    }
                };
                let bound = match schema::bind(row, self.kind) {
                    Ok(bound) => bound,
                    Err(diagnostic) => {
                        diagnostics.record(diagnostic);
                        continue;
                    }
                };
                if let Some(event) = self.accept_row(&bound, &mut diagnostics) {
                    events.push(event);
                }
            }

            if rows == 0 {
                diagnostics.record(Diagnostic::new(
                    1,
                    DiagnosticCode::NoRecords,
                    "File has a header but no records",
                ));
            }

            let conflicts = conflict::detect(&events);
            diagnostics.record_all(conflicts.iter().map(|pair| pair.to_diagnostic()));
        }

        ImportReport {
            kind: self.kind,
            rows,
            events,
            diagnostics: diagnostics.into_sorted(),
        }
    }

    /// Run the field and temporal stages for one row. A row that picks up an
    /// error at the field stage is not checked temporally.
    fn accept_row(&self, row: &BoundRow, diagnostics: &mut Diagnostics) -> Option<Event> {
        let typed = self.type_row(row);
        let fatal = diagnostics.record_all(typed.diagnostics);
        let event = typed.value.filter(|_| !fatal)?;

        let fatal = diagnostics.record_all(temporal::check(&event, self.policy.minute_step));
        (!fatal).then_some(event)
    }

    /// Convert every field of a bound row, collecting all failures instead of
    /// stopping at the first one.
    pub fn type_row(&self, row: &BoundRow) -> RowOutcome<Event> {
        let line = row.line;
        let mut issues = Vec::new();
        let raw = |column| row.get(column).unwrap_or_default();

        let subject = match self.kind {
            ScheduleKind::StudentEvent => Some(SubjectKey::Student {
                name: self.student.clone(),
            }),
            ScheduleKind::ProfessorOfficeHour => {
                let name = field::required(Column::ProfessorName, raw(Column::ProfessorName));
                let email = field::required(Column::Email, raw(Column::Email));
                let name = keep(&mut issues, line, name);
                let email = keep(&mut issues, line, email);
                name.zip(email)
                    .map(|(name, email)| SubjectKey::Professor { name, email })
            }
        };

        let name = field::required(Column::EventName, raw(Column::EventName));
        let name = keep(&mut issues, line, name);
        let location = field::required(Column::Location, raw(Column::Location));
        let location = keep(&mut issues, line, location);
        let description = field::optional(row.get(Column::Description));
        let weekday = keep(&mut issues, line, field::weekday(raw(Column::Weekday)));
        let start = field::datetime(Column::StartTime, raw(Column::StartTime));
        let start = keep(&mut issues, line, start);
        let end = field::datetime(Column::EndTime, raw(Column::EndTime));
        let end = keep(&mut issues, line, end);
        let is_course = match self.kind {
            ScheduleKind::StudentEvent => {
                keep(&mut issues, line, field::boolean_flag(raw(Column::IsCourse))).map(Some)
            }
            ScheduleKind::ProfessorOfficeHour => Some(None),
        };

        if let Some(SubjectKey::Professor { email, .. }) = &subject {
            if let Some(issue) = field::email(email) {
                issues.push(issue.at(line));
            }
        }

        let value = match (subject, name, location, weekday, start, end, is_course) {
            (
                Some(subject),
                Some(name),
                Some(location),
                Some(weekday),
                Some(start),
                Some(end),
                Some(is_course),
            ) => Some(Event {
                name,
                location,
                description,
                weekday,
                start,
                end,
                is_course,
                subject,
                source_line: line,
            }),
            _ => None,
        };

        RowOutcome {
            value,
            diagnostics: issues,
        }
    }
}

fn keep<T>(
    issues: &mut Vec<Diagnostic>,
    line: usize,
    result: Result<T, field::FieldIssue>,
) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(issue) => {
            issues.push(issue.at(line));
            None
        }
    }
}

/// Everything one pipeline run produced.
#[derive(Debug, Clone, Serialize)]
pub struct ImportReport {
    pub kind: ScheduleKind,
    /// Non-header records seen, including ones that failed.
    pub rows: usize,
    /// Events that passed every row-level check, in source order.
    pub events: Vec<Event>,
    /// Findings from all stages, ordered by source line.
    pub diagnostics: Vec<Diagnostic>,
}

impl ImportReport {
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    pub fn is_importable(&self) -> bool {
        !self.has_errors()
    }

    pub fn error_count(&self) -> usize {
        self.count(Severity::Error)
    }

    pub fn warning_count(&self) -> usize {
        self.count(Severity::Warning)
    }

    fn count(&self, severity: Severity) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == severity)
            .count()
    }

    /// Accepted events grouped by subject, or `None` if the batch has errors.
    pub fn batch(&self) -> Option<BTreeMap<&SubjectKey, Vec<&Event>>> {
        if self.has_errors() {
            return None;
        }
        let mut grouped: BTreeMap<&SubjectKey, Vec<&Event>> = BTreeMap::new();
        for event in &self.events {
            grouped.entry(&event.subject).or_default().push(event);
        }
        Some(grouped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STUDENT_HEADER: &str = "EventName,Location,Description,Weekday,StartTime,EndTime,IsCourse";
    const PROFESSOR_HEADER: &str =
        "ProfessorName,Email,EventName,Location,Description,Weekday,StartTime,EndTime";

    fn student(rows: &[&str]) -> ImportReport {
        let text = std::iter::once(STUDENT_HEADER)
            .chain(rows.iter().copied())
            .collect::<Vec<_>>()
            .join("\n");
        Pipeline::new(ScheduleKind::StudentEvent, Policy::default()).run(&text)
    }

    fn codes(report: &ImportReport) -> Vec<DiagnosticCode> {
        report.diagnostics.iter().map(|d| d.code).collect()
    }

    #[test]
    fn test_collects_every_field_error_in_a_row() {
        let report = student(&[",,,9,tomorrow,2025-01-06 10:00,yes"]);

        assert_eq!(
            codes(&report),
            vec![
                DiagnosticCode::EmptyRequiredField,
                DiagnosticCode::EmptyRequiredField,
                DiagnosticCode::WeekdayOutOfRange,
                DiagnosticCode::InvalidDateTime,
                DiagnosticCode::InvalidBooleanFlag,
            ]
        );
        assert!(report.diagnostics.iter().all(|d| d.line == 2));
        assert!(report.events.is_empty());
    }

    #[test]
    fn test_row_with_field_errors_skips_temporal_checks() {
        // Weekday 9 is out of range and the times are reversed; only the
        // field error is reported.
        let report = student(&["X,Y,,9,2025-01-06 10:00,2025-01-06 09:00,1"]);
        assert_eq!(codes(&report), vec![DiagnosticCode::WeekdayOutOfRange]);
    }

    #[test]
    fn test_bad_row_does_not_stop_the_batch() {
        let report = student(&[
            "Calculus,Room 1,,1,2025-01-06 09:00",
            "Physics,Room 2,,1,2025-01-06 13:00,2025-01-06 14:00,0",
        ]);

        assert_eq!(codes(&report), vec![DiagnosticCode::FieldCount]);
        assert_eq!(report.rows, 2);
        assert_eq!(report.events.len(), 1);
        assert_eq!(report.events[0].is_course, Some(false));
        assert_eq!(report.events[0].source_line, 3);
    }

    #[test]
    fn test_malformed_multiline_record_counts_as_one_row() {
        let report = student(&[
            "\"ab\"c,Room,\"multi",
            "line\",1,2025-01-06 09:00,2025-01-06 10:00,1",
            "Calculus,Room 1,,1,2025-01-06 10:00,2025-01-06 11:00,1",
        ]);

        assert_eq!(codes(&report), vec![DiagnosticCode::MalformedQuoting]);
        assert_eq!(report.diagnostics[0].line, 2);
        assert_eq!(report.rows, 2);
        assert_eq!(report.events.len(), 1);
        assert_eq!(report.events[0].source_line, 4);
    }

    #[test]
    fn test_header_mismatch_is_fatal_for_the_file() {
        let text = format!(
            "{}\nCalculus,Room 1,,1,2025-01-06 09:00,2025-01-06 10:00,1",
            PROFESSOR_HEADER
        );
        let report = Pipeline::new(ScheduleKind::StudentEvent, Policy::default()).run(&text);

        assert_eq!(codes(&report), vec![DiagnosticCode::HeaderMismatch]);
        assert_eq!(report.rows, 0);
        assert!(report.events.is_empty());
    }

    #[test]
    fn test_empty_input_and_header_only() {
        let pipeline = Pipeline::new(ScheduleKind::StudentEvent, Policy::default());
        assert_eq!(codes(&pipeline.run("\n\n")), vec![DiagnosticCode::MissingHeader]);
        assert_eq!(codes(&student(&[])), vec![DiagnosticCode::NoRecords]);
    }

    #[test]
    fn test_byte_order_mark_is_stripped_with_warning() {
        let text = format!(
            "\u{feff}{}\nCalculus,Room 1,,1,2025-01-06 09:00,2025-01-06 10:00,1",
            STUDENT_HEADER
        );
        let report = Pipeline::new(ScheduleKind::StudentEvent, Policy::default()).run(&text);

        assert_eq!(codes(&report), vec![DiagnosticCode::ByteOrderMark]);
        assert!(report.is_importable());
        assert_eq!(report.events.len(), 1);
    }

    #[test]
    fn test_strict_mode_drops_weekday_mismatch_rows() {
        let text = format!(
            "{}\nCalculus,Room 1,,2,2025-01-06 09:00,2025-01-06 10:00,1",
            STUDENT_HEADER
        );

        let lenient = Pipeline::new(ScheduleKind::StudentEvent, Policy::default()).run(&text);
        assert_eq!(codes(&lenient), vec![DiagnosticCode::WeekdayMismatch]);
        assert_eq!(lenient.events.len(), 1);
        assert!(lenient.is_importable());

        let strict = Pipeline::new(ScheduleKind::StudentEvent, Policy::strict()).run(&text);
        assert_eq!(strict.error_count(), 1);
        assert!(strict.events.is_empty());
        assert!(strict.batch().is_none());
    }

    #[test]
    fn test_professor_subjects_are_grouped() {
        let text = [
            PROFESSOR_HEADER,
            "Dr. Li,li@uni.edu,Office Hour,B-201,,2,2025-01-07 14:00,2025-01-07 16:00",
            "Dr. Wang,wang@uni.edu,Office Hour,B-305,,2,2025-01-07 14:00,2025-01-07 16:00",
            "Dr. Li,li@uni.edu,Office Hour,B-201,,4,2025-01-09 10:00,2025-01-09 11:00",
        ]
        .join("\n");
        let report = Pipeline::new(ScheduleKind::ProfessorOfficeHour, Policy::default()).run(&text);

        assert!(report.diagnostics.is_empty(), "{:?}", report.diagnostics);
        let batch = report.batch().unwrap();
        assert_eq!(batch.len(), 2);

        let li = SubjectKey::Professor {
            name: "Dr. Li".to_string(),
            email: "li@uni.edu".to_string(),
        };
        assert_eq!(batch[&li].len(), 2);
    }

    #[test]
    fn test_professor_email_is_required_and_shape_checked() {
        let text = [
            PROFESSOR_HEADER,
            "Dr. Li,,Office Hour,B-201,,2,2025-01-07 14:00,2025-01-07 16:00",
            "Dr. Wang,wang-at-uni,Office Hour,B-305,,2,2025-01-07 14:00,2025-01-07 16:00",
        ]
        .join("\n");
        let report = Pipeline::new(ScheduleKind::ProfessorOfficeHour, Policy::default()).run(&text);

        assert_eq!(
            codes(&report),
            vec![DiagnosticCode::EmptyRequiredField, DiagnosticCode::SuspiciousEmail]
        );
        assert_eq!(report.events.len(), 1);
        assert_eq!(report.events[0].source_line, 3);
    }

    #[test]
    fn test_student_label_becomes_subject() {
        let text = format!(
            "{}\nCalculus,Room 1,,1,2025-01-06 09:00,2025-01-06 10:00,1",
            STUDENT_HEADER
        );
        let report = Pipeline::new(ScheduleKind::StudentEvent, Policy::default())
            .with_student("zhang.san")
            .run(&text);

        assert_eq!(
            report.events[0].subject,
            SubjectKey::Student {
                name: "zhang.san".to_string()
            }
        );
    }
}
