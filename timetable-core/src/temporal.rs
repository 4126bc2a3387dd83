//! Cross-field checks on a single typed event.

use chrono::{NaiveDateTime, Timelike};

use crate::diagnostics::{Diagnostic, DiagnosticCode};
use crate::event::Event;

const WEEKDAY_NAMES: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// Run every temporal check and return all findings.
///
/// `CrossesMidnight` and `NonPositiveDuration` are errors. `WeekdayMismatch`
/// and `OffGridMinute` are advisory; the caller's policy decides whether they
/// block the row.
pub fn check(event: &Event, minute_step: Option<u32>) -> Vec<Diagnostic> {
    let line = event.source_line;
    let mut findings = Vec::new();

    if event.end.date() != event.start.date() {
        findings.push(Diagnostic::new(
            line,
            DiagnosticCode::CrossesMidnight,
            format!(
                "Starts on {} but ends on {}; split it into one row per day",
                event.start.date(),
                event.end.date()
            ),
        ));
    }

    if event.end <= event.start {
        findings.push(Diagnostic::new(
            line,
            DiagnosticCode::NonPositiveDuration,
            format!(
                "EndTime {} is not after StartTime {}",
                event.end.format("%H:%M"),
                event.start.format("%H:%M")
            ),
        ));
    }

    let actual = event.iso_weekday();
    if actual != event.weekday {
        findings.push(Diagnostic::new(
            line,
            DiagnosticCode::WeekdayMismatch,
            format!(
                "Weekday is {} but {} is a {} ({})",
                event.weekday,
                event.date(),
                WEEKDAY_NAMES[usize::from(actual - 1)],
                actual
            ),
        ));
    }

    if let Some(step) = minute_step.filter(|s| *s > 0) {
        for (label, time) in [("StartTime", event.start), ("EndTime", event.end)] {
            if !on_grid(time, step) {
                findings.push(Diagnostic::new(
                    line,
                    DiagnosticCode::OffGridMinute,
                    format!(
                        "{} {} is not on the {}-minute grid",
                        label,
                        time.format("%H:%M"),
                        step
                    ),
                ));
            }
        }
    }

    findings
}

fn on_grid(time: NaiveDateTime, step: u32) -> bool {
    time.minute() % step == 0
}
