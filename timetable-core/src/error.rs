//! Error types for operations outside the validation pipeline.
//!
//! Validation findings are never errors; they are reported as
//! [`Diagnostic`](crate::diagnostics::Diagnostic)s. These variants cover
//! the surrounding plumbing: config files, exports and paths.

use thiserror::Error;

use crate::kind::ScheduleKind;

#[derive(Error, Debug)]
pub enum TimetableError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid output path: {0}")]
    InvalidPath(String),

    #[error("No {0} events to export; add at least one record first")]
    NothingToExport(ScheduleKind),

    #[error("Event from line {line} does not belong in a {expected} file")]
    KindMismatch { line: usize, expected: ScheduleKind },
}

pub type TimetableResult<T> = Result<T, TimetableError>;
