//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - sets up logging
//! - builds the API client / sheet sink from the environment
//! - dispatches to the pipeline and prints reports

use std::time::Duration;

use clap::Parser;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::cli::{AnalyzeArgs, Command, SampleArgs, StreamArgs};
use crate::data::{RecordsClient, generate_records};
use crate::error::AppError;
use crate::io::{SheetConfig, read_records_json};

pub mod pipeline;

use pipeline::{StreamOptions, analyze_and_save, to_records};

/// Entry point for the `drivers` binary.
pub fn run() -> Result<(), AppError> {
    let cli = crate::cli::Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Ingest(args) => handle_ingest(args),
        Command::Analyze(args) => handle_analyze(args),
        Command::IngestAnalyze(args) => handle_ingest_analyze(args),
        Command::Sample(args) => handle_sample(args),
    }
}

/// `RUST_LOG` wins; otherwise info for this crate (debug with `-v`), warn elsewhere.
fn init_logging(verbose: bool) {
    let default = if verbose {
        "earnings_drivers=debug,warn"
    } else {
        "earnings_drivers=info,warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    // A second init (e.g. from tests) is harmless.
    let _ = tracing_subscriber::registry().with(fmt::layer()).with(filter).try_init();
}

fn stream_options(args: &StreamArgs) -> StreamOptions {
    StreamOptions {
        limit: args.limit,
        delay: Duration::from_secs(args.seconds),
        max: args.max,
    }
}

fn handle_ingest(args: StreamArgs) -> Result<(), AppError> {
    let client = RecordsClient::from_env()?;
    let sheet = SheetConfig::from_env();

    info!("Starting ingestion: {} records every {} seconds", args.limit, args.seconds);
    if let Some(max) = args.max {
        info!("Max records: {max}");
    }

    let total = pipeline::stream_ingest(&client, &sheet.path, &stream_options(&args))?;
    info!("Ingestion completed: {total} records appended to {}", sheet.path.display());
    Ok(())
}

fn handle_analyze(args: AnalyzeArgs) -> Result<(), AppError> {
    let raw = match &args.input {
        Some(path) => {
            info!("Reading records from {}", path.display());
            read_records_json(path)?
        }
        None => {
            let client = RecordsClient::from_env()?;
            let page_size = args.page_size.max(1);
            match args.max_pages {
                Some(max_pages) => {
                    info!("Fetching up to {max_pages} pages for analysis...");
                    pipeline::fetch_pages(&client, page_size, max_pages)?
                }
                None => {
                    info!("Fetching all data for analysis...");
                    client.fetch_all(page_size)?
                }
            }
        }
    };

    let mut records = to_records(&raw);
    if let Some(max) = args.max {
        records.truncate(max);
    }
    info!("Analyzing {} records", records.len());
    let snapshot = analyze_and_save(&records, &args.output)?;
    println!("{}", crate::report::format_snapshot(&snapshot));
    info!("Analysis completed, snapshot written to {}", args.output.display());
    Ok(())
}

fn handle_ingest_analyze(args: StreamArgs) -> Result<(), AppError> {
    let client = RecordsClient::from_env()?;
    let sheet = SheetConfig::from_env();

    info!(
        "Starting stream ingestion + analysis: {} records every {} seconds",
        args.limit, args.seconds
    );

    let last = pipeline::stream_ingest_and_analyze(&client, &sheet.path, &args.output, &stream_options(&args))?;
    match last {
        Some(snapshot) => {
            println!("{}", crate::report::format_snapshot(&snapshot));
            info!("Final insights saved to {}", args.output.display());
            Ok(())
        }
        None => Err(AppError::new(3, "No batch produced a successful analysis.")),
    }
}

fn handle_sample(args: SampleArgs) -> Result<(), AppError> {
    info!("Generating {} synthetic records (seed {})", args.count, args.seed);
    let records = to_records(&generate_records(args.count, args.seed)?);
    let snapshot = analyze_and_save(&records, &args.output)?;
    println!("{}", crate::report::format_snapshot(&snapshot));
    Ok(())
}
