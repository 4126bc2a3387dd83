//! The canonical bound record and the subject it belongs to.

use std::fmt;

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::constants::DATETIME_FORMAT;

/// The entity whose calendar an event belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SubjectKey {
    /// The single student a student file belongs to.
    Student { name: String },
    /// A professor, identified by name and email as written in the row.
    Professor { name: String, email: String },
}

impl fmt::Display for SubjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubjectKey::Student { name } => write!(f, "{}", name),
            SubjectKey::Professor { name, email } => write!(f, "{} <{}>", name, email),
        }
    }
}

/// A validated calendar entry. Start and end are naive local wall-clock time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub name: String,
    pub location: String,
    pub description: String,
    /// 1 = Monday ... 7 = Sunday
    pub weekday: u8,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    /// Only present on student rows.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_course: Option<bool>,
    pub subject: SubjectKey,
    pub source_line: usize,
}

impl Event {
    pub fn date(&self) -> NaiveDate {
        self.start.date()
    }

    /// ISO weekday of the start date, Monday = 1.
    pub fn iso_weekday(&self) -> u8 {
        self.start.weekday().number_from_monday() as u8
    }

    /// Half-open overlap: events that only touch do not overlap.
    pub fn overlaps(&self, other: &Event) -> bool {
        self.start < other.end && other.start < self.end
    }

    pub fn render_time_range(&self) -> String {
        format!(
            "{}-{}",
            self.start.format(DATETIME_FORMAT),
            self.end.format("%H:%M")
        )
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.render_time_range())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(day: u32, hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 1, day)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    fn event(start: NaiveDateTime, end: NaiveDateTime) -> Event {
        Event {
            name: "Office Hour".to_string(),
            location: "B-201".to_string(),
            description: String::new(),
            weekday: 1,
            start,
            end,
            is_course: None,
            subject: SubjectKey::Student {
                name: "student".to_string(),
            },
            source_line: 2,
        }
    }

    #[test]
    fn test_iso_weekday() {
        // 2025-01-06 is a Monday
        assert_eq!(event(at(6, 9, 0), at(6, 10, 0)).iso_weekday(), 1);
        assert_eq!(event(at(12, 9, 0), at(12, 10, 0)).iso_weekday(), 7);
    }

    #[test]
    fn test_touching_events_do_not_overlap() {
        let a = event(at(6, 9, 0), at(6, 10, 0));
        let b = event(at(6, 10, 0), at(6, 11, 0));
        let c = event(at(6, 9, 30), at(6, 10, 30));

        assert!(!a.overlaps(&b));
        assert!(!b.overlaps(&a));
        assert!(a.overlaps(&c));
        assert!(c.overlaps(&b));
    }

    #[test]
    fn test_display() {
        let e = event(at(6, 9, 0), at(6, 10, 30));
        assert_eq!(e.to_string(), "Office Hour (2025-01-06 09:00-10:30)");

        let subject = SubjectKey::Professor {
            name: "Dr. Li".to_string(),
            email: "li@uni.edu".to_string(),
        };
        assert_eq!(subject.to_string(), "Dr. Li <li@uni.edu>");
    }
}
