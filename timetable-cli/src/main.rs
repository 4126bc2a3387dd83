mod commands;
mod render;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use timetable_core::ScheduleKind;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use commands::ValidationArgs;

#[derive(Parser)]
#[command(name = "timetable")]
#[command(about = "Validate, export and template student and professor timetable CSV files")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate one or more schedule files and print a line-numbered report
    Check {
        /// CSV files to validate (each is checked independently)
        #[arg(required = true)]
        files: Vec<PathBuf>,

        #[command(flatten)]
        validation: ValidationArgs,

        /// Print reports as JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Validate a file and write its events back out as canonical CSV
    Export {
        input: PathBuf,

        /// Output file, or a directory to place the default file name in
        output: String,

        #[command(flatten)]
        validation: ValidationArgs,
    },
    /// Write an empty file with the header for a schedule kind
    Template {
        /// "student" or "professor"
        kind: ScheduleKind,

        /// Output file, or a directory to place the default file name in
        output: String,
    },
    /// Show the config file location and effective settings
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "timetable=warn".to_string()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Check {
            files,
            validation,
            json,
        } => commands::check::run(files, validation, json).await,
        Commands::Export {
            input,
            output,
            validation,
        } => commands::export::run(input, output, validation).await,
        Commands::Template { kind, output } => commands::template::run(kind, &output),
        Commands::Config => commands::config::run(),
    }
}
