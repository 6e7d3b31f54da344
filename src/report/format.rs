//! Formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the math/fitting code stays clean and testable
//! - output changes are localized

use crate::domain::{EarningsEntry, InsightSnapshot, VariableImpact};

/// Public profile page prefix; identifiers are appended as-is.
pub const PROFILE_URL_BASE: &str = "https://www.upwork.com/freelancers/~";

pub fn profile_url(identifier: &str) -> String {
    format!("{PROFILE_URL_BASE}{}", identifier.trim_start_matches('~'))
}

/// Format a full snapshot: header, top drivers, top earners.
pub fn format_snapshot(snapshot: &InsightSnapshot) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "=== drivers - insights from {} records ({}) ===\n",
        snapshot.total_records_analyzed,
        snapshot.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
    ));
    out.push_str("\nTop variables:\n");
    out.push_str(&format_impacts(&snapshot.top_features));
    out.push_str("\nTop earners:\n");
    out.push_str(&format_earners(&snapshot.top_earners));

    out
}

/// Numbered list of drivers with impact and direction.
pub fn format_impacts(impacts: &[VariableImpact]) -> String {
    if impacts.is_empty() {
        return "  (none)\n".to_string();
    }

    let mut out = String::new();
    for (i, v) in impacts.iter().enumerate() {
        let direction = if v.correlation >= 0.0 { "+" } else { "-" };
        out.push_str(&format!(
            "  {}. {:<26} impact={:.2} ({direction})\n",
            i + 1,
            truncate(&v.name, 26),
            v.impact,
        ));
    }
    out
}

/// Numbered list of earners with profile URL and whole-dollar earnings.
pub fn format_earners(earners: &[EarningsEntry]) -> String {
    if earners.is_empty() {
        return "  (none)\n".to_string();
    }

    let mut out = String::new();
    for (i, e) in earners.iter().enumerate() {
        out.push_str(&format!(
            "  {}. {} ({}) - ${:.0}\n",
            i + 1,
            truncate(&e.name, 32),
            profile_url(&e.identifier),
            e.earnings,
        ));
    }
    out
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out = String::new();
    for (i, ch) in s.chars().enumerate() {
        if i + 1 >= max {
            break;
        }
        out.push(ch);
    }
    out.push('.');
    out
}
