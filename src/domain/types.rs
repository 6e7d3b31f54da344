//! Shared domain types.
//!
//! There are two record shapes:
//!
//! - `RawRecord`: what the upstream API returns. Every field is optional and
//!   numeric fields tolerate junk (strings, nulls) so one odd record cannot fail a
//!   whole page.
//! - `Record`: the fixed analysis schema. Defaults are applied once, in
//!   `Record::from_raw`, so the encoder never has to reason about absence.
//!
//! Output types (`VariableImpact`, `EarningsEntry`, `InsightSnapshot`) are
//! serializable because they end up in the JSON snapshot artifact.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Sentinel used for a missing top-rated status.
pub const MISSING_STATUS: &str = "none";

/// Sentinel used for a missing country.
pub const MISSING_COUNTRY: &str = "unknown";

/// Worker profile as returned by the records API.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawRecord {
    pub ciphertext: Option<String>,
    pub short_name: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub member_since: Option<String>,
    pub location: Option<Location>,
    pub top_rated_status: Option<String>,

    #[serde(deserialize_with = "lenient_number")]
    pub total_hours_billed: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    pub total_feedbacks: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    pub avg_feedback_score: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    pub recent_avg_feedback_score: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    pub total_jobs: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    pub avg_quality_score: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    pub avg_skills_score: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    pub avg_cooperation_score: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    pub avg_availability_score: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    pub avg_communication_score: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    pub avg_deadlines_score: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    pub working_years: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    pub total_completed_jobs: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    pub opening_contracts: Option<f64>,

    #[serde(deserialize_with = "lenient_number")]
    pub combined_total_earnings: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    pub combined_total_revenue: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    pub combined_recent_earnings: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    pub total_hourly_jobs: Option<f64>,

    pub agencies: Option<Vec<Agency>>,
    pub service_profile_names: Option<Vec<String>>,
    pub attr_skills: Option<Vec<AttributeSkill>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Location {
    pub country: Option<String>,
    pub city: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Agency {
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AttributeSkill {
    pub group_name: Option<String>,
    pub skills: Option<Vec<SkillEntry>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SkillEntry {
    pub skill: Option<Skill>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Skill {
    pub pretty_name: Option<String>,
}

/// Accept any JSON value for a numeric field; anything that is not a finite
/// number becomes `None`.
fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| v.as_f64()).filter(|v| v.is_finite()))
}

/// Numeric attributes used as regression features, in column order.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct NumericAttributes {
    pub total_hours_billed: f64,
    pub total_feedbacks: f64,
    pub avg_feedback_score: f64,
    pub recent_avg_feedback_score: f64,
    pub total_jobs: f64,
    pub avg_quality_score: f64,
    pub avg_skills_score: f64,
    pub avg_cooperation_score: f64,
    pub avg_availability_score: f64,
    pub avg_communication_score: f64,
    pub avg_deadlines_score: f64,
    pub working_years: f64,
    pub total_completed_jobs: f64,
    pub opening_contracts: f64,
}

impl NumericAttributes {
    pub const COUNT: usize = 14;

    /// Feature names, aligned with `values()`.
    pub const NAMES: [&'static str; Self::COUNT] = [
        "totalHoursBilled",
        "totalFeedbacks",
        "avgFeedbackScore",
        "recentAvgFeedbackScore",
        "totalJobs",
        "avgQualityScore",
        "avgSkillsScore",
        "avgCooperationScore",
        "avgAvailabilityScore",
        "avgCommunicationScore",
        "avgDeadlinesScore",
        "workingYears",
        "totalCompletedJobs",
        "openingContracts",
    ];

    pub fn values(&self) -> [f64; Self::COUNT] {
        [
            self.total_hours_billed,
            self.total_feedbacks,
            self.avg_feedback_score,
            self.recent_avg_feedback_score,
            self.total_jobs,
            self.avg_quality_score,
            self.avg_skills_score,
            self.avg_cooperation_score,
            self.avg_availability_score,
            self.avg_communication_score,
            self.avg_deadlines_score,
            self.working_years,
            self.total_completed_jobs,
            self.opening_contracts,
        ]
    }
}

/// One worker, in the fixed analysis schema.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    /// Opaque profile identifier (the API's `ciphertext`).
    pub identifier: String,
    /// Display name, reporting only.
    pub name: String,
    pub numeric: NumericAttributes,
    pub top_rated_status: String,
    pub country: String,
    /// Regression target. Always finite and `>= 0`.
    pub earnings: f64,
}

impl Record {
    /// Apply the schema defaults to an API record.
    ///
    /// Missing numeric values become 0, missing categoricals become their
    /// sentinel, and earnings are clamped to be non-negative.
    pub fn from_raw(raw: &RawRecord) -> Self {
        let num = |v: Option<f64>| v.filter(|x| x.is_finite()).unwrap_or(0.0);

        let numeric = NumericAttributes {
            total_hours_billed: num(raw.total_hours_billed),
            total_feedbacks: num(raw.total_feedbacks),
            avg_feedback_score: num(raw.avg_feedback_score),
            recent_avg_feedback_score: num(raw.recent_avg_feedback_score),
            total_jobs: num(raw.total_jobs),
            avg_quality_score: num(raw.avg_quality_score),
            avg_skills_score: num(raw.avg_skills_score),
            avg_cooperation_score: num(raw.avg_cooperation_score),
            avg_availability_score: num(raw.avg_availability_score),
            avg_communication_score: num(raw.avg_communication_score),
            avg_deadlines_score: num(raw.avg_deadlines_score),
            working_years: num(raw.working_years),
            total_completed_jobs: num(raw.total_completed_jobs),
            opening_contracts: num(raw.opening_contracts),
        };

        Self {
            identifier: raw.ciphertext.clone().unwrap_or_default(),
            name: raw.short_name.clone().unwrap_or_default(),
            numeric,
            top_rated_status: non_empty(raw.top_rated_status.as_deref()).unwrap_or(MISSING_STATUS).to_string(),
            country: non_empty(raw.location.as_ref().and_then(|l| l.country.as_deref()))
                .unwrap_or(MISSING_COUNTRY)
                .to_string(),
            earnings: num(raw.combined_total_earnings).max(0.0),
        }
    }
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.filter(|v| !v.is_empty())
}

/// Categorical attributes that get one-hot encoded, in column order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Categorical {
    TopRatedStatus,
    Country,
}

impl Categorical {
    pub const ALL: [Categorical; 2] = [Categorical::TopRatedStatus, Categorical::Country];

    /// Prefix of the indicator column names (`<prefix>_<value>`).
    pub fn prefix(self) -> &'static str {
        match self {
            Categorical::TopRatedStatus => "topRated",
            Categorical::Country => "country",
        }
    }

    pub fn value(self, record: &Record) -> &str {
        match self {
            Categorical::TopRatedStatus => &record.top_rated_status,
            Categorical::Country => &record.country,
        }
    }
}

/// How much one attribute moves log-earnings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableImpact {
    pub name: String,
    /// Absolute coefficient magnitude; the ranking key.
    pub impact: f64,
    /// Signed coefficient; the direction of the effect.
    pub correlation: f64,
}

/// One of the top earners.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EarningsEntry {
    pub name: String,
    #[serde(rename = "ciphertext")]
    pub identifier: String,
    pub earnings: f64,
}

/// Result of one analysis run; what gets written to the snapshot file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightSnapshot {
    pub timestamp: DateTime<Utc>,
    pub total_records_analyzed: usize,
    #[serde(rename = "top3Features")]
    pub top_features: Vec<VariableImpact>,
    #[serde(rename = "top5Freelancers")]
    pub top_earners: Vec<EarningsEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_raw_applies_defaults() {
        let raw = RawRecord {
            ciphertext: Some("~01abc".to_string()),
            short_name: Some("Ada L.".to_string()),
            total_jobs: Some(12.0),
            combined_total_earnings: Some(-50.0),
            ..RawRecord::default()
        };

        let record = Record::from_raw(&raw);
        assert_eq!(record.identifier, "~01abc");
        assert_eq!(record.numeric.total_jobs, 12.0);
        assert_eq!(record.numeric.working_years, 0.0);
        assert_eq!(record.top_rated_status, MISSING_STATUS);
        assert_eq!(record.country, MISSING_COUNTRY);
        assert_eq!(record.earnings, 0.0);
    }

    #[test]
    fn raw_record_tolerates_junk_numbers() {
        let json = r#"{
            "ciphertext": "~02",
            "shortName": "Bo",
            "totalJobs": "many",
            "workingYears": null,
            "avgFeedbackScore": 4.9,
            "location": {"country": "Norway"},
            "combinedTotalEarnings": 1200.5
        }"#;
        let raw: RawRecord = serde_json::from_str(json).unwrap();
        assert_eq!(raw.total_jobs, None);
        assert_eq!(raw.working_years, None);

        let record = Record::from_raw(&raw);
        assert_eq!(record.numeric.avg_feedback_score, 4.9);
        assert_eq!(record.numeric.total_jobs, 0.0);
        assert_eq!(record.country, "Norway");
        assert_eq!(record.earnings, 1200.5);
    }

    #[test]
    fn numeric_names_align_with_values() {
        let attrs = NumericAttributes {
            working_years: 7.0,
            ..NumericAttributes::default()
        };
        let idx = NumericAttributes::NAMES.iter().position(|n| *n == "workingYears").unwrap();
        assert_eq!(attrs.values()[idx], 7.0);
    }

    #[test]
    fn snapshot_uses_artifact_field_names() {
        let snapshot = InsightSnapshot {
            timestamp: Utc::now(),
            total_records_analyzed: 2,
            top_features: vec![],
            top_earners: vec![EarningsEntry {
                name: "Ada".to_string(),
                identifier: "~01".to_string(),
                earnings: 10.0,
            }],
        };
        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["totalRecordsAnalyzed"], 2);
        assert!(json["top3Features"].is_array());
        assert_eq!(json["top5Freelancers"][0]["ciphertext"], "~01");
    }
}
