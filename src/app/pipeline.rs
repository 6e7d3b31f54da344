//! Shared pipeline logic used by every command.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! records -> regression -> impact ranking + top earners -> snapshot
//!
//! and the two ingestion loops built on top of it. The loops own the growing
//! record list; every analysis call gets the full list and recomputes from
//! scratch.

use std::path::Path;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::data::{Page, RecordsClient};
use crate::domain::{InsightSnapshot, RawRecord, Record};
use crate::error::{AnalysisError, AppError};
use crate::fit::fit_log_earnings;
use crate::io::{append_records_csv, write_snapshot_json};
use crate::report::{format_earners, format_impacts, rank_impacts, top_earners};

/// Anything that can serve pages of raw records.
pub trait RecordSource {
    fn fetch_page(&self, page: usize, limit: usize) -> Result<Page, AppError>;
}

impl RecordSource for RecordsClient {
    fn fetch_page(&self, page: usize, limit: usize) -> Result<Page, AppError> {
        RecordsClient::fetch_page(self, page, limit)
    }
}

/// Batch loop settings.
#[derive(Debug, Clone)]
pub struct StreamOptions {
    /// Records per page.
    pub limit: usize,
    /// Pause after each full page.
    pub delay: Duration,
    /// Stop once this many records have been processed.
    pub max: Option<usize>,
}

/// Run the full analysis over `records`, stamped with the current time.
pub fn analyze_records(records: &[Record]) -> Result<InsightSnapshot, AnalysisError> {
    analyze_records_at(records, Utc::now())
}

/// Run the full analysis over `records` with an explicit timestamp.
pub fn analyze_records_at(records: &[Record], timestamp: DateTime<Utc>) -> Result<InsightSnapshot, AnalysisError> {
    let fit = fit_log_earnings(records)?;
    let top_features = rank_impacts(&fit.feature_names, fit.coefficients())?;

    Ok(InsightSnapshot {
        timestamp,
        total_records_analyzed: records.len(),
        top_features,
        top_earners: top_earners(records),
    })
}

/// Convert API records to the analysis schema.
pub fn to_records(raw: &[RawRecord]) -> Vec<Record> {
    raw.iter().map(Record::from_raw).collect()
}

/// Analyze, persist the snapshot, and log the headline results.
///
/// The snapshot file is only touched when the analysis succeeds.
pub fn analyze_and_save(records: &[Record], output: &Path) -> Result<InsightSnapshot, AppError> {
    let snapshot = analyze_records(records)?;
    write_snapshot_json(output, &snapshot)?;
    log_insights(&snapshot);
    Ok(snapshot)
}

/// Fetch at most `max_pages` pages, stopping early when the listing ends.
pub fn fetch_pages(source: &impl RecordSource, limit: usize, max_pages: usize) -> Result<Vec<RawRecord>, AppError> {
    let mut all = Vec::new();
    for page in 1..=max_pages {
        let data = source.fetch_page(page, limit)?;
        all.extend(data.items);
        info!("Fetched page {page}/{max_pages} ({} records)", all.len());
        if !data.has_next_page {
            break;
        }
    }
    Ok(all)
}

/// Page through the source and append every batch to the sheet.
///
/// Returns the number of records appended.
pub fn stream_ingest(source: &impl RecordSource, sheet: &Path, opts: &StreamOptions) -> Result<usize, AppError> {
    let mut total = 0usize;
    run_batches(source, opts, |batch| {
        append_records_csv(sheet, batch)?;
        total += batch.len();
        info!("Added {} records to sheet (Total: {total})", batch.len());
        Ok(total)
    })?;
    Ok(total)
}

/// Page through the source; after each batch append it to the sheet and re-run
/// the analysis over everything seen so far.
///
/// A failed analysis on one batch is logged and the loop carries on; the
/// previous snapshot file is left untouched. Returns the last successful
/// snapshot, if any.
pub fn stream_ingest_and_analyze(
    source: &impl RecordSource,
    sheet: &Path,
    output: &Path,
    opts: &StreamOptions,
) -> Result<Option<InsightSnapshot>, AppError> {
    let mut all: Vec<Record> = Vec::new();
    let mut last = None;

    run_batches(source, opts, |batch| {
        append_records_csv(sheet, batch)?;
        all.extend(to_records(batch));
        info!("Added {} records to sheet (Total: {})", batch.len(), all.len());

        match analyze_records(&all) {
            Ok(snapshot) => {
                write_snapshot_json(output, &snapshot)?;
                info!("RUNNING INSIGHTS (from {} records):", all.len());
                log_insights(&snapshot);
                last = Some(snapshot);
            }
            Err(e) => warn!("Skipping analysis for {} records: {e}", all.len()),
        }
        Ok(all.len())
    })?;

    Ok(last)
}

/// Shared batch loop.
///
/// `on_batch` returns the running record count. The loop stops on an empty page,
/// on a short page, or once `opts.max` is reached.
fn run_batches(
    source: &impl RecordSource,
    opts: &StreamOptions,
    mut on_batch: impl FnMut(&[RawRecord]) -> Result<usize, AppError>,
) -> Result<(), AppError> {
    if opts.limit == 0 {
        return Err(AppError::new(2, "Batch limit must be > 0."));
    }

    let mut page = 1;
    loop {
        info!("Fetching page {page}...");
        let batch = source.fetch_page(page, opts.limit)?.items;

        if batch.is_empty() {
            info!("No more data to fetch");
            return Ok(());
        }

        let processed = on_batch(&batch)?;

        if let Some(max) = opts.max {
            if processed >= max {
                info!("Reached max limit of {max} records");
                return Ok(());
            }
        }

        if batch.len() < opts.limit {
            return Ok(());
        }

        info!("Waiting {} seconds...", opts.delay.as_secs_f64());
        std::thread::sleep(opts.delay);
        page += 1;
    }
}

fn log_insights(snapshot: &InsightSnapshot) {
    info!("Top {} variables:\n{}", snapshot.top_features.len(), format_impacts(&snapshot.top_features).trim_end());
    info!("Top {} earners:\n{}", snapshot.top_earners.len(), format_earners(&snapshot.top_earners).trim_end());
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    use crate::data::generate_records;
    use crate::error::EncodingError;

    /// Serves fixed pages from memory and records which pages were asked for.
    struct FakeSource {
        records: Vec<RawRecord>,
        requested: RefCell<Vec<usize>>,
    }

    impl FakeSource {
        fn new(count: usize) -> Self {
            Self {
                records: generate_records(count, 11).unwrap(),
                requested: RefCell::new(Vec::new()),
            }
        }
    }

    impl RecordSource for FakeSource {
        fn fetch_page(&self, page: usize, limit: usize) -> Result<Page, AppError> {
            self.requested.borrow_mut().push(page);
            let start = ((page - 1) * limit).min(self.records.len());
            let end = (start + limit).min(self.records.len());
            Ok(Page {
                page,
                limit,
                total: self.records.len(),
                total_pages: self.records.len().div_ceil(limit),
                has_next_page: end < self.records.len(),
                items: self.records[start..end].to_vec(),
            })
        }
    }

    fn opts(limit: usize, max: Option<usize>) -> StreamOptions {
        StreamOptions {
            limit,
            delay: Duration::ZERO,
            max,
        }
    }

    #[test]
    fn empty_records_fail_instead_of_empty_snapshot() {
        assert_eq!(
            analyze_records(&[]).unwrap_err(),
            AnalysisError::Encoding(EncodingError::NoRecords)
        );
    }

    #[test]
    fn ingest_stops_on_short_page() {
        let dir = tempfile::tempdir().unwrap();
        let source = FakeSource::new(25);
        let total = stream_ingest(&source, &dir.path().join("sheet.csv"), &opts(10, None)).unwrap();
        assert_eq!(total, 25);
        assert_eq!(*source.requested.borrow(), vec![1, 2, 3]);
    }

    #[test]
    fn ingest_respects_max() {
        let dir = tempfile::tempdir().unwrap();
        let source = FakeSource::new(100);
        let total = stream_ingest(&source, &dir.path().join("sheet.csv"), &opts(10, Some(30))).unwrap();
        assert_eq!(total, 30);
        assert_eq!(source.requested.borrow().len(), 3);
    }

    #[test]
    fn streaming_analysis_survives_underdetermined_early_batches() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("insights.json");
        let source = FakeSource::new(120);

        // First batch of 10 has fewer records than features and cannot be fit.
        let last = stream_ingest_and_analyze(&source, &dir.path().join("sheet.csv"), &output, &opts(10, None))
            .unwrap()
            .expect("later batches should produce a snapshot");

        assert_eq!(last.total_records_analyzed, 120);
        let saved = crate::io::read_snapshot_json(&output).unwrap();
        assert_eq!(saved.total_records_analyzed, 120);
        assert_eq!(saved.top_earners.len(), 5);
        let names: Vec<&str> = saved.top_features.iter().map(|v| v.name.as_str()).collect();
        let expected: Vec<&str> = last.top_features.iter().map(|v| v.name.as_str()).collect();
        assert_eq!(names, expected);
    }

    #[test]
    fn fetch_pages_stops_when_listing_ends() {
        let source = FakeSource::new(25);
        let raw = fetch_pages(&source, 10, 10).unwrap();
        assert_eq!(raw.len(), 25);
        assert_eq!(*source.requested.borrow(), vec![1, 2, 3]);
    }

    #[test]
    fn fetch_pages_respects_page_cap() {
        let source = FakeSource::new(100);
        let raw = fetch_pages(&source, 10, 2).unwrap();
        assert_eq!(raw.len(), 20);
        assert_eq!(*source.requested.borrow(), vec![1, 2]);
    }

    #[test]
    fn failed_later_analysis_keeps_previous_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("insights.json");

        // The second page brings a new country and a new status on exactly the
        // same rows, so their indicator columns coincide and the fit is singular.
        let mut source = FakeSource::new(120);
        for r in &mut source.records[60..] {
            r.location = Some(crate::domain::Location {
                country: Some("Atlantis".to_string()),
                city: None,
            });
            r.top_rated_status = Some("legend".to_string());
        }

        let last = stream_ingest_and_analyze(&source, &dir.path().join("sheet.csv"), &output, &opts(60, None))
            .unwrap()
            .expect("first page should produce a snapshot");

        assert_eq!(last.total_records_analyzed, 60);
        assert_eq!(source.requested.borrow().len(), 3);
        let saved = crate::io::read_snapshot_json(&output).unwrap();
        assert_eq!(saved.total_records_analyzed, 60);
    }

    #[test]
    fn zero_limit_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let source = FakeSource::new(5);
        let err = stream_ingest(&source, &dir.path().join("sheet.csv"), &opts(0, None)).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
