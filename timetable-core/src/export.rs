//! Writing events back out as CSV, and header-only templates.

use std::path::{Path, PathBuf};

use crate::constants::DATETIME_FORMAT;
use crate::error::{TimetableError, TimetableResult};
use crate::event::{Event, SubjectKey};
use crate::kind::ScheduleKind;

/// Encode events as a complete CSV document with the kind's header.
///
/// Text fields are always quoted so that whitespace, delimiters and newlines
/// survive a round trip through the decoder unchanged.
pub fn encode_events(kind: ScheduleKind, events: &[Event]) -> TimetableResult<String> {
    let mut out = kind.header_line().into_bytes();
    out.push(b'\n');

    let mut writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::NonNumeric)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(out);

    for event in events {
        writer.write_record(record_for(kind, event)?)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| std::io::Error::new(e.error().kind(), e.error().to_string()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Write events to `path`. An empty event list is refused.
pub fn write_events(path: &Path, kind: ScheduleKind, events: &[Event]) -> TimetableResult<()> {
    if events.is_empty() {
        return Err(TimetableError::NothingToExport(kind));
    }
    std::fs::write(path, encode_events(kind, events)?)?;
    Ok(())
}

/// Write a header-only file for the kind.
pub fn write_template(path: &Path, kind: ScheduleKind) -> TimetableResult<()> {
    std::fs::write(path, format!("{}\n", kind.header_line()))?;
    Ok(())
}

/// Normalize a user-supplied output path.
///
/// A directory gets the kind's default file name appended, and missing
/// parent directories are created.
pub fn resolve_output_path(path_text: &str, kind: ScheduleKind) -> TimetableResult<PathBuf> {
    let trimmed = path_text.trim();
    if trimmed.is_empty() {
        return Err(TimetableError::InvalidPath(
            "Choose a CSV output path".to_string(),
        ));
    }

    let mut path = PathBuf::from(trimmed);
    if path.is_dir() {
        path = path.join(kind.default_file_name());
    }

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }

    Ok(path)
}

fn record_for(kind: ScheduleKind, event: &Event) -> TimetableResult<Vec<String>> {
    let mismatch = || TimetableError::KindMismatch {
        line: event.source_line,
        expected: kind,
    };

    let start = event.start.format(DATETIME_FORMAT).to_string();
    let end = event.end.format(DATETIME_FORMAT).to_string();

    let record = match (kind, &event.subject) {
        (ScheduleKind::StudentEvent, SubjectKey::Student { .. }) => {
            let is_course = event.is_course.ok_or_else(mismatch)?;
            vec![
                event.name.clone(),
                event.location.clone(),
                event.description.clone(),
                event.weekday.to_string(),
                start,
                end,
                if is_course { "1" } else { "0" }.to_string(),
            ]
        }
        (ScheduleKind::ProfessorOfficeHour, SubjectKey::Professor { name, email }) => vec![
            name.clone(),
            email.clone(),
            event.name.clone(),
            event.location.clone(),
            event.description.clone(),
            event.weekday.to_string(),
            start,
            end,
        ],
        _ => return Err(mismatch()),
    };

    Ok(record)
}
