//! Terminal rendering for validation reports, colored with owo_colors.

use std::path::Path;

use owo_colors::OwoColorize;
use timetable_core::{Diagnostic, ImportReport, Severity};

pub trait Render {
    fn render(&self) -> String;
}

impl Render for Severity {
    fn render(&self) -> String {
        match self {
            Severity::Error => "error".red().bold().to_string(),
            Severity::Warning => "warning".yellow().bold().to_string(),
        }
    }
}

impl Render for Diagnostic {
    fn render(&self) -> String {
        let location = format!("line {:>4}", self.line);
        let mut text = format!(
            "   {} {} {} {}",
            location.dimmed(),
            self.severity.render(),
            format!("[{}]", self.code).dimmed(),
            self.message
        );
        // Multi-line field values would break the report layout
        if text.contains('\n') {
            text = text.replace('\n', "\\n");
        }
        text
    }
}

/// Full report for one file: header, every diagnostic, then a summary.
pub fn render_report(path: &Path, report: &ImportReport) -> String {
    let mut lines = vec![format!(
        "📄 {} {}",
        path.display().bold(),
        format!("({} schedule)", report.kind).dimmed()
    )];

    lines.extend(report.diagnostics.iter().map(Render::render));

    let summary = format!(
        "{} {}, {} {}, {} {}",
        report.events.len(),
        pluralize("event", report.events.len()),
        report.error_count(),
        pluralize("error", report.error_count()),
        report.warning_count(),
        pluralize("warning", report.warning_count()),
    );

    match report.batch() {
        Some(batch) => {
            lines.push(format!("   {} {}", "✓".green(), summary.green()));
            for (subject, events) in batch {
                lines.push(format!(
                    "     {} {}",
                    subject,
                    format!("({} {})", events.len(), pluralize("event", events.len())).dimmed()
                ));
            }
        }
        None => {
            lines.push(format!("   {} {}", "✗".red(), summary.red()));
            lines.push("   Not importable until the errors above are fixed".dimmed().to_string());
        }
    }

    lines.join("\n")
}

fn pluralize(word: &str, count: usize) -> String {
    if count == 1 {
        word.to_string()
    } else {
        format!("{}s", word)
    }
}
