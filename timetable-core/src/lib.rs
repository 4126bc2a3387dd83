//! Core engine for timetable CSV ingestion.
//!
//! Turns student schedule and professor office-hour CSV text into typed
//! [`Event`]s, running every row through the same stages:
//! - `record`: quote-aware record decoding
//! - `schema`: header and field-count binding
//! - `field`: per-column validators
//! - `temporal`: same-day, duration and weekday checks
//! - `conflict`: per-subject overlap detection
//! - `diagnostics`: the line-ordered report with policy-driven severities
//!
//! The engine never fails on bad input; it returns an [`ImportReport`] whose
//! diagnostics decide whether the batch is importable.

pub mod config;
pub mod conflict;
pub mod constants;
pub mod diagnostics;
pub mod error;
pub mod event;
pub mod export;
pub mod field;
pub mod kind;
pub mod pipeline;
pub mod policy;
pub mod record;
pub mod schema;
pub mod temporal;

pub use diagnostics::{Diagnostic, DiagnosticCode, Severity};
pub use event::{Event, SubjectKey};
pub use kind::ScheduleKind;
pub use pipeline::{ImportReport, Pipeline};
pub use policy::Policy;
