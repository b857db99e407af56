//! Season extraction from a plant's requirement text.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::model::{Conditions, Plant};
use crate::text::normalize_joined;

/// A growing season, ordered canonically from spring to winter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Season {
    Spring,
    Summer,
    Autumn,
    Winter,
}

impl Season {
    pub const ALL: [Self; 4] = [Self::Spring, Self::Summer, Self::Autumn, Self::Winter];

    /// Words that name this season in requirement text.
    fn keywords(self) -> &'static [&'static str] {
        match self {
            Self::Spring => &["spring"],
            Self::Summer => &["summer"],
            Self::Autumn => &["autumn", "fall"],
            Self::Winter => &["winter"],
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Spring => "Spring",
            Self::Summer => "Summer",
            Self::Autumn => "Autumn",
            Self::Winter => "Winter",
        })
    }
}

impl FromStr for Season {
    type Err = String;

    /// Parses a season name; "fall" is accepted for autumn.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|season| season.keywords().contains(&lowered.as_str()))
            .ok_or_else(|| format!("unknown season: {s}"))
    }
}

/// Seasons mentioned in the plant's germination needs or optimal conditions.
///
/// Always in canonical order, each at most once, regardless of how the text
/// orders or repeats them.
pub fn suitable_seasons(plant: &Plant) -> Vec<Season> {
    let text = normalize_joined(&[&plant.germination_needs, &plant.optimal_conditions]);
    Season::ALL
        .into_iter()
        .filter(|season| text.contains_any(season.keywords()))
        .collect()
}

/// Whether the garden's current season is one the plant names.
///
/// `None` when the conditions record no current season or it can't be read.
pub fn in_season(plant: &Plant, conditions: &Conditions) -> Option<bool> {
    let current: Season = conditions.current_season.as_deref()?.parse().ok()?;
    Some(suitable_seasons(plant).contains(&current))
}
