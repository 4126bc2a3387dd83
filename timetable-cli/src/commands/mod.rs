pub mod check;
pub mod config;
pub mod export;
pub mod template;

use anyhow::Result;
use clap::Args;
use timetable_core::config::Config;
use timetable_core::record::RecordDecoder;
use timetable_core::{Pipeline, Policy, ScheduleKind};

/// Options shared by every command that runs the validation pipeline.
#[derive(Args, Clone, Debug, Default)]
pub struct ValidationArgs {
    /// Schedule kind ("student" or "professor"); detected from the header if omitted
    #[arg(short, long)]
    pub kind: Option<ScheduleKind>,

    /// Treat advisory findings (overlaps, weekday mismatches, ...) as errors
    #[arg(long)]
    pub strict: bool,

    /// Require start and end minutes on this grid (e.g. 30)
    #[arg(long)]
    pub minute_step: Option<u32>,

    /// Subject label for student files
    #[arg(long)]
    pub student: Option<String>,
}

impl ValidationArgs {
    /// Merge flags over the config file. Flags win.
    pub fn policy(&self, config: &Config) -> Policy {
        Policy {
            strict: self.strict || config.policy.strict,
            escalate: config.policy.escalate.clone(),
            minute_step: self.minute_step.or(config.policy.minute_step),
        }
    }

    pub fn pipeline(&self, text: &str, config: &Config) -> Result<Pipeline> {
        let kind = match self.kind {
            Some(kind) => kind,
            None => detect_kind(text)?,
        };
        let student = self.student.as_deref().unwrap_or(config.student());

        Ok(Pipeline::new(kind, self.policy(config)).with_student(student))
    }
}

/// Identify the schedule kind from a file's header line.
fn detect_kind(text: &str) -> Result<ScheduleKind> {
    let text = text.trim_start_matches('\u{feff}');
    let header = RecordDecoder::new(text).next().and_then(|r| r.ok());

    match header.and_then(|h| ScheduleKind::detect(&h.fields)) {
        Some(kind) => Ok(kind),
        None => anyhow::bail!(
            "Could not tell which schedule this is from its header.\n\
            Expected one of:\n  {}\n  {}\n\
            Or pass --kind student|professor",
            ScheduleKind::StudentEvent.header_line(),
            ScheduleKind::ProfessorOfficeHour.header_line()
        ),
    }
}
