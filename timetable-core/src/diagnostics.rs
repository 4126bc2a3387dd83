//! Validation findings and the per-batch aggregator that collects them.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::policy::Policy;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// Which stage of the taxonomy a code belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticClass {
    Structural,
    Semantic,
    Temporal,
    Advisory,
}

/// Machine-readable diagnostic codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DiagnosticCode {
    // Structural
    MissingHeader,
    HeaderMismatch,
    NoRecords,
    UnterminatedQuote,
    MalformedQuoting,
    FieldCount,

    // Semantic field
    EmptyRequiredField,
    InvalidWeekday,
    WeekdayOutOfRange,
    InvalidDateTime,
    InvalidBooleanFlag,

    // Temporal
    CrossesMidnight,
    NonPositiveDuration,

    // Advisory
    ByteOrderMark,
    SuspiciousEmail,
    WeekdayMismatch,
    OffGridMinute,
    TimeOverlap,
}

impl DiagnosticCode {
    pub fn class(&self) -> DiagnosticClass {
        use DiagnosticCode::*;
        match self {
            MissingHeader | HeaderMismatch | NoRecords | UnterminatedQuote | MalformedQuoting
            | FieldCount => DiagnosticClass::Structural,
            EmptyRequiredField | InvalidWeekday | WeekdayOutOfRange | InvalidDateTime
            | InvalidBooleanFlag => DiagnosticClass::Semantic,
            CrossesMidnight | NonPositiveDuration => DiagnosticClass::Temporal,
            ByteOrderMark | SuspiciousEmail | WeekdayMismatch | OffGridMinute | TimeOverlap => {
                DiagnosticClass::Advisory
            }
        }
    }

    pub fn is_advisory(&self) -> bool {
        self.class() == DiagnosticClass::Advisory
    }

    /// Severity before any policy promotion.
    pub fn default_severity(&self) -> Severity {
        if self.is_advisory() {
            Severity::Warning
        } else {
            Severity::Error
        }
    }
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// One validation finding with its row provenance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    /// 1-based source line the finding refers to.
    pub line: usize,
    pub code: DiagnosticCode,
    pub message: String,
    /// Other source lines involved (the second event of an overlap).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub related_lines: Vec<usize>,
}

impl Diagnostic {
    pub fn new(line: usize, code: DiagnosticCode, message: impl Into<String>) -> Self {
        Diagnostic {
            severity: code.default_severity(),
            line,
            code,
            message: message.into(),
            related_lines: Vec::new(),
        }
    }

    pub fn with_related(mut self, lines: impl IntoIterator<Item = usize>) -> Self {
        self.related_lines.extend(lines);
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "line {}: {} [{}] {}",
            self.line, self.severity, self.code, self.message
        )
    }
}

/// Batch-scoped collector. Every diagnostic passes through the policy here,
/// so severities are final as soon as they are recorded.
#[derive(Debug, Default)]
pub struct Diagnostics {
    policy: Policy,
    items: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new(policy: Policy) -> Self {
        Diagnostics {
            policy,
            items: Vec::new(),
        }
    }

    /// Record a diagnostic and return the severity it ended up with.
    pub fn record(&mut self, mut diagnostic: Diagnostic) -> Severity {
        diagnostic.severity = self.policy.severity_for(diagnostic.code);
        let severity = diagnostic.severity;
        self.items.push(diagnostic);
        severity
    }

    /// Record several diagnostics, returning true if any of them is an error.
    pub fn record_all(&mut self, diagnostics: impl IntoIterator<Item = Diagnostic>) -> bool {
        diagnostics
            .into_iter()
            .fold(false, |fatal, d| (self.record(d) == Severity::Error) || fatal)
    }

    /// All diagnostics ordered by source line. Findings on the same line keep
    /// the order the stages produced them in.
    pub fn into_sorted(mut self) -> Vec<Diagnostic> {
        self.items.sort_by_key(|d| d.line);
        self.items
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advisory_codes_default_to_warning() {
        assert_eq!(DiagnosticCode::TimeOverlap.default_severity(), Severity::Warning);
        assert_eq!(DiagnosticCode::SuspiciousEmail.default_severity(), Severity::Warning);
        assert_eq!(DiagnosticCode::FieldCount.default_severity(), Severity::Error);
        assert_eq!(DiagnosticCode::CrossesMidnight.default_severity(), Severity::Error);
    }

    #[test]
    fn test_warnings_do_not_block() {
        let mut diagnostics = Diagnostics::new(Policy::default());
        let severity = diagnostics.record(Diagnostic::new(
            4,
            DiagnosticCode::WeekdayMismatch,
            "weekday 2 but date is a Monday",
        ));

        assert_eq!(severity, Severity::Warning);
        assert!(!diagnostics.into_sorted().iter().any(Diagnostic::is_error));
    }

    #[test]
    fn test_strict_policy_promotes_on_record() {
        let mut diagnostics = Diagnostics::new(Policy::strict());
        let fatal = diagnostics.record_all([
            Diagnostic::new(2, DiagnosticCode::SuspiciousEmail, "no domain"),
            Diagnostic::new(2, DiagnosticCode::OffGridMinute, "09:10"),
        ]);

        assert!(fatal);
        let items = diagnostics.into_sorted();
        assert_eq!(items.len(), 2);
        assert!(items.iter().all(Diagnostic::is_error));
    }

    #[test]
    fn test_sorted_by_line_keeps_stage_order() {
        let mut diagnostics = Diagnostics::new(Policy::default());
        diagnostics.record(Diagnostic::new(7, DiagnosticCode::TimeOverlap, "late"));
        diagnostics.record(Diagnostic::new(3, DiagnosticCode::EmptyRequiredField, "a"));
        diagnostics.record(Diagnostic::new(3, DiagnosticCode::InvalidDateTime, "b"));

        let codes: Vec<_> = diagnostics.into_sorted().into_iter().map(|d| d.code).collect();
        assert_eq!(
            codes,
            vec![
                DiagnosticCode::EmptyRequiredField,
                DiagnosticCode::InvalidDateTime,
                DiagnosticCode::TimeOverlap,
            ]
        );
    }
}
