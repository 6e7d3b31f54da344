//! Reporting utilities: impact ranking, top earners, and terminal formatting.

use std::cmp::Ordering;

use crate::domain::{Categorical, EarningsEntry, Record, VariableImpact};
use crate::error::AggregationError;

pub mod format;

pub use format::*;

/// Number of variables kept in a ranking.
pub const TOP_IMPACTS: usize = 3;

/// Number of earners kept in a ranking.
pub const TOP_EARNERS: usize = 5;

/// Turn per-feature coefficients into the ranked list of top drivers.
///
/// Every feature is reported under its own name except the country indicator
/// columns, which are folded into a single `"country"` entry (sum of magnitudes,
/// sum of signed values). The result is sorted by impact, descending, and cut to
/// `TOP_IMPACTS`.
pub fn rank_impacts(feature_names: &[String], coefficients: &[f64]) -> Result<Vec<VariableImpact>, AggregationError> {
    if feature_names.len() != coefficients.len() {
        return Err(AggregationError::LengthMismatch {
            names: feature_names.len(),
            coefficients: coefficients.len(),
        });
    }

    let country = Categorical::Country.prefix();
    let country_prefix = format!("{country}_");

    let mut impacts = Vec::with_capacity(feature_names.len() + 1);
    let mut country_impact = 0.0;
    let mut country_signed = 0.0;

    for (name, &c) in feature_names.iter().zip(coefficients) {
        if name.starts_with(&country_prefix) {
            country_impact += c.abs();
            country_signed += c;
        } else {
            impacts.push(VariableImpact {
                name: name.clone(),
                impact: c.abs(),
                correlation: c,
            });
        }
    }

    if country_impact > 0.0 {
        impacts.push(VariableImpact {
            name: country.to_string(),
            impact: country_impact,
            correlation: country_signed,
        });
    }

    impacts.sort_by(|a, b| b.impact.partial_cmp(&a.impact).unwrap_or(Ordering::Equal));
    impacts.truncate(TOP_IMPACTS);
    Ok(impacts)
}

/// The `TOP_EARNERS` highest-earning records, descending.
pub fn top_earners(records: &[Record]) -> Vec<EarningsEntry> {
    let mut entries: Vec<EarningsEntry> = records
        .iter()
        .map(|r| EarningsEntry {
            name: r.name.clone(),
            identifier: r.identifier.clone(),
            earnings: r.earnings,
        })
        .collect();

    entries.sort_by(|a, b| b.earnings.partial_cmp(&a.earnings).unwrap_or(Ordering::Equal));
    entries.truncate(TOP_EARNERS);
    entries
}
