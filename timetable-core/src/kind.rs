//! The two file shapes the engine understands.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::{PROFESSOR_FILE_NAME, STUDENT_FILE_NAME};
use crate::schema::Column;

const STUDENT_COLUMNS: [Column; 7] = [
    Column::EventName,
    Column::Location,
    Column::Description,
    Column::Weekday,
    Column::StartTime,
    Column::EndTime,
    Column::IsCourse,
];

const PROFESSOR_COLUMNS: [Column; 8] = [
    Column::ProfessorName,
    Column::Email,
    Column::EventName,
    Column::Location,
    Column::Description,
    Column::Weekday,
    Column::StartTime,
    Column::EndTime,
];

/// Which schedule a file holds. Selects the expected header, the field
/// bindings and the subject a row belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScheduleKind {
    #[serde(rename = "student")]
    StudentEvent,
    #[serde(rename = "professor")]
    ProfessorOfficeHour,
}

impl ScheduleKind {
    /// Columns in the exact order the header must list them.
    pub fn columns(&self) -> &'static [Column] {
        match self {
            ScheduleKind::StudentEvent => &STUDENT_COLUMNS,
            ScheduleKind::ProfessorOfficeHour => &PROFESSOR_COLUMNS,
        }
    }

    pub fn arity(&self) -> usize {
        self.columns().len()
    }

    /// Header names in field order.
    pub fn header(&self) -> Vec<&'static str> {
        self.columns().iter().map(Column::name).collect()
    }

    /// Header as a single delimited line, without a trailing newline.
    pub fn header_line(&self) -> String {
        self.header().join(",")
    }

    /// Position of a column within a row of this kind.
    pub fn position(&self, column: Column) -> Option<usize> {
        self.columns().iter().position(|c| *c == column)
    }

    pub fn default_file_name(&self) -> &'static str {
        match self {
            ScheduleKind::StudentEvent => STUDENT_FILE_NAME,
            ScheduleKind::ProfessorOfficeHour => PROFESSOR_FILE_NAME,
        }
    }

    /// Identify the kind from already-decoded header fields.
    pub fn detect(header: &[String]) -> Option<Self> {
        [ScheduleKind::StudentEvent, ScheduleKind::ProfessorOfficeHour]
            .into_iter()
            .find(|kind| kind.header().iter().eq(header.iter()))
    }
}

impl fmt::Display for ScheduleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScheduleKind::StudentEvent => write!(f, "student"),
            ScheduleKind::ProfessorOfficeHour => write!(f, "professor"),
        }
    }
}

impl FromStr for ScheduleKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "student" => Ok(ScheduleKind::StudentEvent),
            "professor" => Ok(ScheduleKind::ProfessorOfficeHour),
            other => Err(format!(
                "Unknown schedule kind '{}'. Expected 'student' or 'professor'",
                other
            )),
        }
    }
}
