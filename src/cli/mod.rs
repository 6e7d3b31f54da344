//! Command-line parsing for the earnings-drivers tool.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the analysis code.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "drivers", version, about = "What drives marketplace worker earnings")]
pub struct Cli {
    /// Debug-level logging.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Ingest records from the API and append them to the sheet.
    Ingest(StreamArgs),
    /// Fetch all records (or read a local file), analyze them, and write the snapshot.
    Analyze(AnalyzeArgs),
    /// Ingest in batches while re-running the analysis after every batch.
    IngestAnalyze(StreamArgs),
    /// Analyze a seeded synthetic record set (no network).
    Sample(SampleArgs),
}

/// Options for the batch loops.
#[derive(Debug, Args, Clone)]
pub struct StreamArgs {
    /// Records per batch.
    #[arg(short = 'l', long)]
    pub limit: usize,

    /// Delay between batches in seconds.
    #[arg(short = 's', long)]
    pub seconds: u64,

    /// Maximum records to process.
    #[arg(short = 'm', long)]
    pub max: Option<usize>,

    /// Snapshot JSON path.
    #[arg(short = 'o', long, default_value = "insights.json")]
    pub output: PathBuf,
}

/// Options for a one-shot analysis.
#[derive(Debug, Args, Clone)]
pub struct AnalyzeArgs {
    /// Maximum records to analyze.
    #[arg(short = 'm', long)]
    pub max: Option<usize>,

    /// Read records from a local JSON file instead of the API.
    #[arg(long, value_name = "JSON")]
    pub input: Option<PathBuf>,

    /// Page size used when fetching from the API.
    #[arg(long, default_value_t = 10)]
    pub page_size: usize,

    /// Fetch at most this many pages instead of the whole listing.
    #[arg(long)]
    pub max_pages: Option<usize>,

    /// Snapshot JSON path.
    #[arg(short = 'o', long, default_value = "insights.json")]
    pub output: PathBuf,
}

/// Options for the synthetic run.
#[derive(Debug, Args, Clone)]
pub struct SampleArgs {
    /// Number of synthetic records.
    #[arg(short = 'n', long, default_value_t = 200)]
    pub count: usize,

    /// Random seed.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Snapshot JSON path.
    #[arg(short = 'o', long, default_value = "insights.json")]
    pub output: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_ingest_analyze() {
        let cli = Cli::parse_from(["drivers", "ingest-analyze", "-l", "10", "-s", "5", "-m", "100"]);
        match cli.command {
            Command::IngestAnalyze(args) => {
                assert_eq!(args.limit, 10);
                assert_eq!(args.seconds, 5);
                assert_eq!(args.max, Some(100));
                assert_eq!(args.output, PathBuf::from("insights.json"));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn ingest_requires_limit_and_seconds() {
        assert!(Cli::try_parse_from(["drivers", "ingest", "-l", "10"]).is_err());
    }

    #[test]
    fn verbose_is_global() {
        let cli = Cli::parse_from(["drivers", "analyze", "-v", "--input", "records.json"]);
        assert!(cli.verbose);
        assert!(matches!(cli.command, Command::Analyze(ref a) if a.input.is_some()));
    }

    #[test]
    fn analyze_accepts_page_cap() {
        let cli = Cli::parse_from(["drivers", "analyze", "--max-pages", "3", "--page-size", "50"]);
        match cli.command {
            Command::Analyze(args) => {
                assert_eq!(args.max_pages, Some(3));
                assert_eq!(args.page_size, 50);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}
