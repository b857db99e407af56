//! Output formatting for CLI display.

use jiff::Timestamp;

use crate::model::{Conditions, Planting};
use crate::season::Season;
use crate::viability::Assessment;

/// First eight characters of an id, enough to type back as a prefix.
pub(super) fn short_id(id: &str) -> &str {
    match id.char_indices().nth(8) {
        Some((end, _)) => &id[..end],
        None => id,
    }
}

/// Date portion of a timestamp, e.g. `2024-03-15`.
pub(super) fn format_date(ts: Timestamp) -> String {
    ts.strftime("%Y-%m-%d").to_string()
}

pub(super) fn format_conditions(conditions: &Conditions) -> String {
    let parts: Vec<String> = [
        ("sun", &conditions.sunlight),
        ("temp", &conditions.temperature),
        ("soil", &conditions.soil),
        ("season", &conditions.current_season),
    ]
    .into_iter()
    .filter_map(|(label, value)| {
        value
            .as_deref()
            .filter(|v| !v.trim().is_empty())
            .map(|v| format!("{label}: {v}"))
    })
    .collect();

    if parts.is_empty() {
        "no conditions recorded".to_string()
    } else {
        parts.join("; ")
    }
}

pub(super) fn format_seasons(seasons: &[Season]) -> String {
    if seasons.is_empty() {
        return "none mentioned".to_string();
    }
    seasons
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// One-line verdict, e.g. `High (2): wants full sun and gets it, ...`.
pub(super) fn format_assessment(assessment: &Assessment) -> String {
    if assessment.factors.is_empty() {
        return format!("{} ({})", assessment.viability, assessment.score);
    }
    let reasons: Vec<&str> = assessment.factors.iter().map(|f| f.describe()).collect();
    format!(
        "{} ({}): {}",
        assessment.viability,
        assessment.score,
        reasons.join(", ")
    )
}

/// Current status and when it was set, e.g. `growing since 2024-05-01`.
pub(super) fn format_current_status(planting: &Planting) -> String {
    match planting.history.last() {
        Some(entry) => format!("{} since {}", entry.status, format_date(entry.date)),
        None => "no history".to_string(),
    }
}
