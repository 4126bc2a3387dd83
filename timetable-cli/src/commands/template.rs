use anyhow::Result;
use owo_colors::OwoColorize;
use timetable_core::ScheduleKind;
use timetable_core::export;
use tracing::info;

pub fn run(kind: ScheduleKind, output: &str) -> Result<()> {
    let path = export::resolve_output_path(output, kind)?;
    export::write_template(&path, kind)?;

    info!(path = %path.display(), %kind, "wrote template");
    println!("{} {} template: {}", "Created".green(), kind, path.display());
    println!("{}", kind.header_line().dimmed());

    Ok(())
}
