//! Garden locations and their free-text growing conditions.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A physical or logical garden site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GardenLocation {
    pub id: String,

    pub name: String,

    /// Free-text place description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature_unit: Option<TemperatureUnit>,

    #[serde(default)]
    pub conditions: Conditions,
}

/// Environmental conditions of a garden, all free text.
///
/// Any field may be missing; consumers degrade rather than fail.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conditions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sunlight: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub soil: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_season: Option<String>,
}

impl Conditions {
    /// True when sunlight, temperature and soil carry no text at all.
    pub fn is_blank(&self) -> bool {
        [&self.sunlight, &self.temperature, &self.soil]
            .iter()
            .all(|field| field.as_deref().is_none_or(|s| s.trim().is_empty()))
    }
}

/// Unit a garden's temperature readings are written in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TemperatureUnit {
    #[serde(rename = "C")]
    Celsius,

    #[default]
    #[serde(rename = "F")]
    Fahrenheit,
}

impl TemperatureUnit {
    /// Converts a reading in this unit to degrees Fahrenheit.
    pub fn to_fahrenheit(self, reading: f64) -> f64 {
        match self {
            Self::Celsius => reading * 9.0 / 5.0 + 32.0,
            Self::Fahrenheit => reading,
        }
    }
}

impl fmt::Display for TemperatureUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Celsius => f.write_str("C"),
            Self::Fahrenheit => f.write_str("F"),
        }
    }
}

impl FromStr for TemperatureUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "C" | "c" => Ok(Self::Celsius),
            "F" | "f" => Ok(Self::Fahrenheit),
            other => Err(format!("unknown temperature unit: {other} (expected C or F)")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_conditions_ignore_season() {
        let conditions = Conditions {
            current_season: Some("Spring".into()),
            sunlight: Some("   ".into()),
            ..Conditions::default()
        };
        assert!(conditions.is_blank());
    }

    #[test]
    fn conditions_with_soil_are_not_blank() {
        let conditions = Conditions {
            soil: Some("loam".into()),
            ..Conditions::default()
        };
        assert!(!conditions.is_blank());
    }

    #[test]
    fn garden_json_uses_unit_letters() {
        let json = r#"{"id":"g1","name":"Back yard","temperatureUnit":"C","conditions":{"sunlight":"Full sun"}}"#;
        let garden: GardenLocation = serde_json::from_str(json).unwrap();
        assert_eq!(garden.temperature_unit, Some(TemperatureUnit::Celsius));
        assert_eq!(garden.conditions.sunlight.as_deref(), Some("Full sun"));
        assert!(garden.location.is_none());
    }

    #[test]
    fn celsius_converts_to_fahrenheit() {
        assert!((TemperatureUnit::Celsius.to_fahrenheit(18.0) - 64.4).abs() < 1e-9);
        assert!((TemperatureUnit::Fahrenheit.to_fahrenheit(70.0) - 70.0).abs() < 1e-9);
    }
}
