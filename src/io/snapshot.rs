//! Read/write the insight snapshot JSON.
//!
//! The snapshot is replaced wholesale on every analysis run. We write to a
//! sibling temp file and rename it over the target, so readers only ever see the
//! previous snapshot or the new one.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::domain::InsightSnapshot;
use crate::error::AppError;

/// Write a snapshot, replacing any existing file at `path`.
pub fn write_snapshot_json(path: &Path, snapshot: &InsightSnapshot) -> Result<(), AppError> {
    let tmp = temp_path(path);

    let result = write_pretty(&tmp, snapshot).and_then(|()| {
        std::fs::rename(&tmp, path).map_err(|e| {
            AppError::new(2, format!("Failed to replace snapshot '{}': {e}", path.display()))
        })
    });

    if result.is_err() {
        let _ = std::fs::remove_file(&tmp);
    } else {
        debug!(path = %path.display(), "snapshot written");
    }
    result
}

/// Read a snapshot file.
pub fn read_snapshot_json(path: &Path) -> Result<InsightSnapshot, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open snapshot '{}': {e}", path.display())))?;
    serde_json::from_reader(file).map_err(|e| AppError::new(2, format!("Invalid snapshot JSON: {e}")))
}

fn write_pretty(path: &Path, snapshot: &InsightSnapshot) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create snapshot '{}': {e}", path.display())))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, snapshot)
        .map_err(|e| AppError::new(2, format!("Failed to write snapshot JSON: {e}")))?;
    writer
        .flush()
        .map_err(|e| AppError::new(2, format!("Failed to flush snapshot JSON: {e}")))
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "insights.json".into());
    name.push(".tmp");
    path.with_file_name(name)
}
