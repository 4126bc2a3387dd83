//! Overlap detection between events of the same subject on the same day.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::diagnostics::{Diagnostic, DiagnosticCode};
use crate::event::{Event, SubjectKey};

/// Two events of one subject whose `[start, end)` intervals intersect.
/// `first` sorts before `second` by start time, then source line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConflictPair<'a> {
    pub first: &'a Event,
    pub second: &'a Event,
}

impl ConflictPair<'_> {
    /// Order-independent identity: the two source lines, smaller first.
    pub fn lines(&self) -> (usize, usize) {
        let (a, b) = (self.first.source_line, self.second.source_line);
        (a.min(b), a.max(b))
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        let (line, other) = self.lines();
        Diagnostic::new(
            line,
            DiagnosticCode::TimeOverlap,
            format!(
                "{} overlaps {} (line {}) for {}",
                self.first, self.second, other, self.first.subject
            ),
        )
        .with_related([other])
    }
}

/// Find every overlapping pair, grouped by subject and calendar day.
pub fn detect(events: &[Event]) -> Vec<ConflictPair<'_>> {
    let mut groups: BTreeMap<(&SubjectKey, NaiveDate), Vec<&Event>> = BTreeMap::new();
    for event in events {
        groups
            .entry((&event.subject, event.date()))
            .or_default()
            .push(event);
    }

    groups.into_values().flat_map(sweep_day).collect()
}

/// Sweep one subject-day group in start order, keeping the set of intervals
/// still open at the current start. Every open interval overlaps the new one,
/// so each pair is reported exactly once and non-adjacent overlaps in a chain
/// of three or more are not missed.
fn sweep_day(mut day: Vec<&Event>) -> Vec<ConflictPair<'_>> {
    day.sort_by_key(|e| (e.start, e.source_line));

    let mut open: Vec<&Event> = Vec::new();
    let mut pairs = Vec::new();

    for event in day {
        open.retain(|o| o.end > event.start);
        pairs.extend(open.iter().map(|o| ConflictPair {
            first: *o,
            second: event,
        }));
        open.push(event);
    }

    pairs
}
