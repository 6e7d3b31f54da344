//! Load raw records from a local JSON file.
//!
//! Accepts either a bare array of records or a saved API page (`{"items": [...]}`).

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::Deserialize;

use crate::domain::RawRecord;
use crate::error::AppError;

#[derive(Deserialize)]
#[serde(untagged)]
enum RecordsFile {
    List(Vec<RawRecord>),
    Page { items: Vec<RawRecord> },
}

pub fn read_records_json(path: &Path) -> Result<Vec<RawRecord>, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open records file '{}': {e}", path.display())))?;
    let parsed: RecordsFile = serde_json::from_reader(BufReader::new(file))
        .map_err(|e| AppError::new(2, format!("Invalid records JSON '{}': {e}", path.display())))?;

    Ok(match parsed {
        RecordsFile::List(items) | RecordsFile::Page { items } => items,
    })
}
