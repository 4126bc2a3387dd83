//! Severity policy: which advisory findings block an import.

use serde::{Deserialize, Serialize};

use crate::diagnostics::{DiagnosticCode, Severity};

/// Single source of truth for advisory-to-fatal promotion.
///
/// Structural, semantic and temporal codes are always errors. Advisory codes
/// are warnings unless `strict` is set or the code is listed in `escalate`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Policy {
    #[serde(default)]
    pub strict: bool,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub escalate: Vec<DiagnosticCode>,

    /// When set, start and end minutes must fall on multiples of this step.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minute_step: Option<u32>,
}

impl Policy {
    pub fn strict() -> Self {
        Policy {
            strict: true,
            ..Policy::default()
        }
    }

    pub fn severity_for(&self, code: DiagnosticCode) -> Severity {
        if !code.is_advisory() {
            return code.default_severity();
        }
        if self.strict || self.escalate.contains(&code) {
            Severity::Error
        } else {
            Severity::Warning
        }
    }
}
