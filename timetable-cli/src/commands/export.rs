use std::path::PathBuf;

use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use timetable_core::ImportReport;
use timetable_core::config::Config;
use timetable_core::export;
use tracing::info;

use super::ValidationArgs;
use crate::render::render_report;

pub async fn run(input: PathBuf, output: String, args: ValidationArgs) -> Result<()> {
    let config = Config::load()?;
    let text = tokio::fs::read_to_string(&input)
        .await
        .with_context(|| format!("Could not read {} as UTF-8 text", input.display()))?;

    let pipeline = args.pipeline(&text, &config)?;
    let report = pipeline.run(&text);
    println!("{}", render_report(&input, &report));

    if report.has_errors() {
        anyhow::bail!(
            "Not exporting {}: fix the errors above first",
            input.display()
        );
    }

    let path = write_report(&report, &output)?;
    println!(
        "\n{} {} events to {}",
        "Exported".green(),
        report.events.len(),
        path.display()
    );

    Ok(())
}

/// Write an error-free report's events to `output` and return the final path.
fn write_report(report: &ImportReport, output: &str) -> Result<PathBuf> {
    if report.has_errors() {
        anyhow::bail!("Report has errors; nothing was written");
    }

    let path = export::resolve_output_path(output, report.kind)?;
    export::write_events(&path, report.kind, &report.events)?;
    info!(path = %path.display(), events = report.events.len(), "exported schedule");

    Ok(path)
}
