//! Append raw worker records to a spreadsheet-style CSV file.
//!
//! The sheet is a flat projection of the API record meant for people to browse
//! and annotate in a spreadsheet. Its column order is independent of the
//! analysis feature order.

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

use chrono::Utc;
use tracing::debug;

use crate::domain::RawRecord;
use crate::error::AppError;
use crate::report::profile_url;

const DEFAULT_SHEET_PATH: &str = "freelancers.csv";

pub const SHEET_HEADER: [&str; 20] = [
    "ciphertext",
    "short_name",
    "agency",
    "profile_url",
    "date",
    "title",
    "country",
    "combined_total_revenue",
    "total_hourly_jobs",
    "combined_recent_earnings",
    "working_years",
    "avg_deadlines_score",
    "service_profile",
    "top_rated_status",
    "skill_1",
    "skill_2",
    "member_since",
    "description",
    "avg_feedback_score",
    "created",
];

/// Where the sheet lives.
#[derive(Debug, Clone)]
pub struct SheetConfig {
    pub path: PathBuf,
}

impl SheetConfig {
    /// `SHEET_PATH` from the environment (or `.env`), else `freelancers.csv`.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        let path = std::env::var("SHEET_PATH")
            .ok()
            .filter(|p| !p.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_SHEET_PATH.to_string());
        Self { path: PathBuf::from(path) }
    }
}

/// Append rows for `records`, writing the header first if the file is new or empty.
pub fn append_records_csv(path: &Path, records: &[RawRecord]) -> Result<(), AppError> {
    let needs_header = std::fs::metadata(path).map(|m| m.len() == 0).unwrap_or(true);

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open sheet '{}': {e}", path.display())))?;

    let mut writer = csv::WriterBuilder::new().has_headers(false).from_writer(file);

    if needs_header {
        writer
            .write_record(SHEET_HEADER)
            .map_err(|e| AppError::new(2, format!("Failed to write sheet header: {e}")))?;
    }

    let date = Utc::now().format("%d/%m/%Y").to_string();
    let created = Utc::now().to_rfc3339();
    for r in records {
        writer
            .write_record(sheet_row(r, &date, &created))
            .map_err(|e| AppError::new(2, format!("Failed to write sheet row: {e}")))?;
    }

    writer
        .flush()
        .map_err(|e| AppError::new(2, format!("Failed to flush sheet '{}': {e}", path.display())))?;

    debug!(rows = records.len(), path = %path.display(), "appended to sheet");
    Ok(())
}

/// Project one record onto the sheet columns.
pub fn sheet_row(r: &RawRecord, date: &str, created: &str) -> Vec<String> {
    let text = |v: &Option<String>| v.clone().unwrap_or_default();
    let whole = |v: Option<f64>| format!("{}", v.unwrap_or(0.0).round());
    let fixed2 = |v: Option<f64>| format!("{:.2}", v.unwrap_or(0.0));

    let identifier = text(&r.ciphertext);
    let agency = r
        .agencies
        .as_ref()
        .and_then(|a| a.first())
        .and_then(|a| a.name.clone())
        .unwrap_or_default();
    let service_profile = r
        .service_profile_names
        .as_ref()
        .and_then(|s| s.first().cloned())
        .unwrap_or_default();
    let (skill_1, skill_2) = top_skills(r);

    vec![
        identifier.clone(),
        text(&r.short_name),
        agency,
        profile_url(&identifier),
        date.to_string(),
        text(&r.title),
        r.location.as_ref().and_then(|l| l.country.clone()).unwrap_or_default(),
        whole(r.combined_total_revenue),
        whole(r.total_hourly_jobs),
        whole(r.combined_recent_earnings),
        fixed2(r.working_years),
        fixed2(r.avg_deadlines_score),
        service_profile,
        text(&r.top_rated_status),
        skill_1,
        skill_2,
        text(&r.member_since),
        text(&r.description),
        fixed2(r.avg_feedback_score),
        created.to_string(),
    ]
}

/// First two skills, formatted as `"<group> - <skill>"` when the first group has a name.
///
/// The second skill comes from the first group if it has one, else the second group.
fn top_skills(r: &RawRecord) -> (String, String) {
    let groups = r.attr_skills.as_deref().unwrap_or(&[]);
    let skill_name = |group: usize, idx: usize| -> Option<String> {
        groups
            .get(group)?
            .skills
            .as_ref()?
            .get(idx)?
            .skill
            .as_ref()?
            .pretty_name
            .clone()
            .filter(|s| !s.is_empty())
    };

    let first = skill_name(0, 0).unwrap_or_default();
    let second = skill_name(0, 1).or_else(|| skill_name(1, 0)).unwrap_or_default();

    let group = groups.first().and_then(|g| g.group_name.clone()).filter(|g| !g.is_empty());
    let label = |skill: String| match &group {
        Some(g) if !skill.is_empty() => format!("{g} - {skill}"),
        _ => skill,
    };

    (label(first), label(second))
}
