use std::path::PathBuf;

use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use serde::Serialize;
use timetable_core::{Event, ImportReport, SubjectKey};
use timetable_core::config::Config;
use tracing::{debug, info};

use super::ValidationArgs;
use crate::render::render_report;

#[derive(Serialize)]
struct FileResult<'a> {
    path: String,
    importable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    report: Option<&'a ImportReport>,
    /// Accepted events per subject, only when the file is importable.
    #[serde(skip_serializing_if = "Option::is_none")]
    batch: Option<Vec<SubjectEvents<'a>>>,
}

#[derive(Serialize)]
struct SubjectEvents<'a> {
    subject: &'a SubjectKey,
    events: Vec<&'a Event>,
}

/// Validate every file on its own pipeline, in parallel, then report in
/// argument order.
pub async fn run(files: Vec<PathBuf>, args: ValidationArgs, json: bool) -> Result<()> {
    let config = Config::load()?;

    let tasks: Vec<_> = files
        .into_iter()
        .map(|path| {
            let args = args.clone();
            let config = config.clone();
            let task_path = path.clone();
            let handle = tokio::spawn(async move { check_file(task_path, args, config).await });
            (path, handle)
        })
        .collect();

    let mut results = Vec::with_capacity(tasks.len());
    for (path, handle) in tasks {
        let result = handle.await.context("Validation task panicked")?;
        results.push((path, result));
    }

    let failed = results
        .iter()
        .filter(|(_, r)| r.as_ref().map_or(true, ImportReport::has_errors))
        .count();

    if json {
        let output: Vec<_> = results
            .iter()
            .map(|(path, result)| match result {
                Ok(report) => FileResult {
                    path: path.display().to_string(),
                    importable: report.is_importable(),
                    error: None,
                    report: Some(report),
                    batch: report.batch().map(|batch| {
                        batch
                            .into_iter()
                            .map(|(subject, events)| SubjectEvents { subject, events })
                            .collect()
                    }),
                },
                Err(e) => FileResult {
                    path: path.display().to_string(),
                    importable: false,
                    error: Some(format!("{:#}", e)),
                    report: None,
                    batch: None,
                },
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        for (i, (path, result)) in results.iter().enumerate() {
            match result {
                Ok(report) => println!("{}", render_report(path, report)),
                Err(e) => {
                    println!("📄 {}", path.display().bold());
                    println!("   {}", format!("{:#}", e).red());
                }
            }

            if i < results.len() - 1 {
                println!();
            }
        }
    }

    if failed > 0 {
        anyhow::bail!(
            "{} of {} file(s) cannot be imported",
            failed,
            results.len()
        );
    }

    Ok(())
}

async fn check_file(path: PathBuf, args: ValidationArgs, config: Config) -> Result<ImportReport> {
    debug!(path = %path.display(), "reading schedule file");
    let text = tokio::fs::read_to_string(&path)
        .await
        .with_context(|| format!("Could not read {} as UTF-8 text", path.display()))?;

    let pipeline = args.pipeline(&text, &config)?;
    let kind = pipeline.kind();
    let report = tokio::task::spawn_blocking(move || pipeline.run(&text)).await?;

    info!(
        path = %path.display(),
        %kind,
        rows = report.rows,
        events = report.events.len(),
        errors = report.error_count(),
        warnings = report.warning_count(),
        "validated schedule file"
    );

    Ok(report)
}
