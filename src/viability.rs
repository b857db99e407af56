//! Viability scoring: how well a plant suits a garden's conditions.
//!
//! Purely syntactic. The plant's requirement text is matched against the
//! garden's condition text with a handful of keyword checks, each worth one
//! point, plus a single temperature threshold for warm/cool plants.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::model::{Conditions, GardenLocation, Plant, TemperatureUnit};
use crate::text::{NormalizedText, normalize, normalize_joined};

/// Readings above this are warm, below it cool.
pub const THRESHOLD_FAHRENHEIT: f64 = 65.0;

/// Tri-state suitability verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Viability {
    Low,
    Medium,
    High,
}

impl Viability {
    fn from_score(score: u8) -> Self {
        match score {
            0 => Self::Low,
            1 => Self::Medium,
            _ => Self::High,
        }
    }
}

impl fmt::Display for Viability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        })
    }
}

/// A check that contributed a point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Factor {
    FullSun,
    PartialShade,
    Warmth,
    Coolness,
    Drainage,
}

impl Factor {
    pub fn describe(self) -> &'static str {
        match self {
            Self::FullSun => "wants full sun and gets it",
            Self::PartialShade => "wants partial shade and gets it",
            Self::Warmth => "wants warmth and the garden is warm",
            Self::Coolness => "wants cool weather and the garden is cool",
            Self::Drainage => "wants well-drained soil and has it",
        }
    }
}

/// The verdict together with what earned it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assessment {
    pub viability: Viability,
    pub score: u8,
    pub factors: Vec<Factor>,
}

/// Scores a plant against conditions whose temperature is in Fahrenheit.
pub fn score_viability(plant: &Plant, conditions: &Conditions) -> Viability {
    assess(plant, conditions, TemperatureUnit::Fahrenheit).viability
}

/// Scores a plant against a garden, reading temperatures in the garden's unit.
pub fn score_for_garden(plant: &Plant, garden: &GardenLocation) -> Viability {
    assess(
        plant,
        &garden.conditions,
        garden.temperature_unit.unwrap_or_default(),
    )
    .viability
}

/// Runs every check and reports which ones matched.
///
/// Checks are independent: a plant whose text mentions both "warm" and
/// "cool" can score on both.
pub fn assess(plant: &Plant, conditions: &Conditions, unit: TemperatureUnit) -> Assessment {
    if conditions.is_blank() {
        return Assessment {
            viability: Viability::Low,
            score: 0,
            factors: Vec::new(),
        };
    }

    let needs = normalize_joined(&[&plant.optimal_conditions, &plant.germination_needs]);
    let sunlight = normalize(conditions.sunlight.as_deref());
    let temperature = normalize(conditions.temperature.as_deref());
    let soil = normalize(conditions.soil.as_deref());
    let reading = fahrenheit_reading(&temperature, unit);

    let mut factors = Vec::new();
    if needs.contains("full sun") && sunlight.contains_any(&["full sun", "6-8", "8+"]) {
        factors.push(Factor::FullSun);
    }
    if needs.contains("partial shade") && sunlight.contains("partial") {
        factors.push(Factor::PartialShade);
    }
    if needs.contains("warm")
        && (temperature.contains("warm") || reading.is_some_and(|f| f > THRESHOLD_FAHRENHEIT))
    {
        factors.push(Factor::Warmth);
    }
    if needs.contains("cool")
        && (temperature.contains("cool") || reading.is_some_and(|f| f < THRESHOLD_FAHRENHEIT))
    {
        factors.push(Factor::Coolness);
    }
    if needs.contains("well-drained") && soil.contains("well-drained") {
        factors.push(Factor::Drainage);
    }

    // At most five factors.
    let score = u8::try_from(factors.len()).unwrap_or(u8::MAX);
    Assessment {
        viability: Viability::from_score(score),
        score,
        factors,
    }
}

#[allow(clippy::cast_precision_loss)]
fn fahrenheit_reading(temperature: &NormalizedText, unit: TemperatureUnit) -> Option<f64> {
    temperature
        .first_integer()
        .map(|value| unit.to_fahrenheit(value as f64))
}

#[cfg(test)]
mod tests {
    use super::*;

    use proptest::prelude::*;

    fn plant(optimal: &str, germination: &str) -> Plant {
        Plant {
            id: "p1".into(),
            species: "Tomato".into(),
            germination_needs: germination.into(),
            optimal_conditions: optimal.into(),
        }
    }

    fn conditions(sunlight: &str, temperature: &str, soil: &str) -> Conditions {
        let field = |s: &str| (!s.is_empty()).then(|| s.to_string());
        Conditions {
            sunlight: field(sunlight),
            temperature: field(temperature),
            soil: field(soil),
            current_season: None,
        }
    }

    #[test]
    fn blank_conditions_are_low() {
        let p = plant("Full sun, warm, well-drained soil", "Warm soil");
        assert_eq!(score_viability(&p, &Conditions::default()), Viability::Low);
    }

    #[test]
    fn two_matches_are_high() {
        let p = plant("Full sun and well-drained soil", "");
        let c = conditions("Full sun all day", "", "Sandy, well-drained");
        let assessment = assess(&p, &c, TemperatureUnit::Fahrenheit);

        assert_eq!(assessment.viability, Viability::High);
        assert_eq!(assessment.factors, vec![Factor::FullSun, Factor::Drainage]);
    }

    #[test]
    fn one_match_is_medium() {
        let p = plant("Prefers partial shade", "");
        let c = conditions("Partial sun in the afternoon", "mild", "clay");
        assert_eq!(score_viability(&p, &c), Viability::Medium);
    }

    #[test]
    fn no_match_is_low() {
        let p = plant("Partial shade", "");
        let c = conditions("Full sun", "hot", "clay");
        assert_eq!(score_viability(&p, &c), Viability::Low);
    }

    #[test]
    fn sun_hours_count_as_full_sun() {
        let p = plant("Full sun", "");
        assert_eq!(
            score_viability(&p, &conditions("6-8 hours", "", "")),
            Viability::Medium
        );
        assert_eq!(
            score_viability(&p, &conditions("8+ hours daily", "", "")),
            Viability::Medium
        );
    }

    #[test]
    fn germination_needs_count_as_requirements() {
        let p = plant("", "Needs warm soil to sprout");
        let c = conditions("", "Warm summers", "");
        assert_eq!(score_viability(&p, &c), Viability::Medium);
    }

    #[test]
    fn fahrenheit_threshold_decides_warm_and_cool() {
        let warm = plant("Warm weather", "");
        let cool = plant("Cool weather", "");

        assert_eq!(score_viability(&warm, &conditions("", "70F", "")), Viability::Medium);
        assert_eq!(score_viability(&warm, &conditions("", "60F", "")), Viability::Low);
        assert_eq!(score_viability(&cool, &conditions("", "60F", "")), Viability::Medium);
        assert_eq!(score_viability(&cool, &conditions("", "70F", "")), Viability::Low);
        // Exactly at the threshold is neither.
        assert_eq!(score_viability(&warm, &conditions("", "65", "")), Viability::Low);
        assert_eq!(score_viability(&cool, &conditions("", "65", "")), Viability::Low);
    }

    #[test]
    fn celsius_readings_are_converted() {
        let warm = plant("Warm", "");
        let cool = plant("Cool", "");
        let mut garden = GardenLocation {
            id: "g1".into(),
            name: "Plot".into(),
            location: None,
            temperature_unit: Some(TemperatureUnit::Celsius),
            conditions: conditions("", "Around 25 C", ""),
        };
        assert_eq!(score_for_garden(&warm, &garden), Viability::Medium);
        assert_eq!(score_for_garden(&cool, &garden), Viability::Low);

        // 18 C is 64.4 F: just under the threshold.
        garden.conditions.temperature = Some("18".into());
        assert_eq!(score_for_garden(&warm, &garden), Viability::Low);
        assert_eq!(score_for_garden(&cool, &garden), Viability::Medium);
    }

    #[test]
    fn garden_without_unit_reads_fahrenheit() {
        let warm = plant("Warm", "");
        let garden = GardenLocation {
            id: "g1".into(),
            name: "Plot".into(),
            location: None,
            temperature_unit: None,
            conditions: conditions("", "25", ""),
        };
        assert_eq!(score_for_garden(&warm, &garden), Viability::Low);
    }

    #[test]
    fn warm_and_cool_can_both_score() {
        let p = plant("Tolerates cool nights and warm days", "");
        let c = conditions("", "warm days, cool nights", "");
        let assessment = assess(&p, &c, TemperatureUnit::Fahrenheit);

        assert_eq!(assessment.score, 2);
        assert_eq!(assessment.viability, Viability::High);
    }

    #[test]
    fn all_five_factors_score_five() {
        let p = plant(
            "Full sun or partial shade, warm or cool, well-drained",
            "",
        );
        let c = conditions("full sun to partial", "warm and cool", "well-drained loam");
        let assessment = assess(&p, &c, TemperatureUnit::Fahrenheit);
        assert_eq!(assessment.score, 5);
        assert_eq!(assessment.viability, Viability::High);
    }

    proptest! {
        #[test]
        fn prop_empty_conditions_always_low(optimal in ".*", germination in ".*") {
            let p = plant(&optimal, &germination);
            prop_assert_eq!(score_viability(&p, &Conditions::default()), Viability::Low);
        }

        #[test]
        fn prop_scoring_is_deterministic(
            optimal in "[a-z +-]{0,40}",
            sunlight in "[a-z0-9 +-]{0,20}",
            temperature in "[a-z0-9 ]{0,20}",
            soil in "[a-z -]{0,20}",
        ) {
            let p = plant(&optimal, "");
            let c = conditions(&sunlight, &temperature, &soil);
            prop_assert_eq!(
                assess(&p, &c, TemperatureUnit::Celsius),
                assess(&p, &c, TemperatureUnit::Celsius)
            );
        }
    }
}
