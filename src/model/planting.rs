//! Plantings: a plant tracked in a garden, with its status history.

use std::fmt;
use std::str::FromStr;

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// A plant being tracked in a specific garden location.
///
/// References its plant and garden by id; it owns neither.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Planting {
    pub id: String,
    pub plant_id: String,
    pub garden_id: String,

    /// Ordered status changes. The last entry is the current status.
    #[serde(default)]
    pub history: Vec<StatusHistoryEntry>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seeds_on_hand: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub planned_qty: Option<u32>,
}

/// One status change in a planting's history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusHistoryEntry {
    pub id: String,
    pub status: Status,
    pub date: Timestamp,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Where a planting stands.
///
/// Transitions are free-form: any status may follow any other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    Wishlist,
    Planning,
    Planting,
    Growing,
    Harvest,
    Dormant,
}

impl Planting {
    /// Creates a planting seeded with its first history entry.
    pub fn new(
        id: impl Into<String>,
        plant_id: impl Into<String>,
        garden_id: impl Into<String>,
        status: Status,
        date: Timestamp,
    ) -> Self {
        Self {
            id: id.into(),
            plant_id: plant_id.into(),
            garden_id: garden_id.into(),
            history: vec![StatusHistoryEntry::new(status, date, None)],
            seeds_on_hand: None,
            planned_qty: None,
        }
    }

    /// The current status: the latest history entry's.
    pub fn current_status(&self) -> Option<Status> {
        self.history.last().map(|entry| entry.status)
    }

    /// The most recent date anywhere in the history.
    pub fn latest_activity(&self) -> Option<Timestamp> {
        self.history.iter().map(|entry| entry.date).max()
    }

    /// Appends a status change.
    pub fn record(&mut self, status: Status, date: Timestamp, notes: Option<String>) {
        self.history.push(StatusHistoryEntry::new(status, date, notes));
    }
}

impl StatusHistoryEntry {
    pub fn new(status: Status, date: Timestamp, notes: Option<String>) -> Self {
        Self {
            id: super::new_id(),
            status,
            date,
            notes,
        }
    }
}

impl Status {
    pub const ALL: [Self; 6] = [
        Self::Wishlist,
        Self::Planning,
        Self::Planting,
        Self::Growing,
        Self::Harvest,
        Self::Dormant,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Wishlist => "Wishlist",
            Self::Planning => "Planning",
            Self::Planting => "Planting",
            Self::Growing => "Growing",
            Self::Harvest => "Harvest",
            Self::Dormant => "Dormant",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown status: {s}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(s: &str) -> Timestamp {
        s.parse().unwrap()
    }

    #[test]
    fn new_planting_has_one_entry() {
        let planting = Planting::new("pl1", "p1", "g1", Status::Wishlist, at("2024-01-01T00:00:00Z"));
        assert_eq!(planting.history.len(), 1);
        assert_eq!(planting.current_status(), Some(Status::Wishlist));
    }

    #[test]
    fn current_status_is_last_entry_not_latest_date() {
        let mut planting =
            Planting::new("pl1", "p1", "g1", Status::Growing, at("2024-06-01T00:00:00Z"));
        // Backdated correction still becomes the current status.
        planting.record(Status::Planning, at("2024-03-01T00:00:00Z"), Some("oops".into()));

        assert_eq!(planting.current_status(), Some(Status::Planning));
        assert_eq!(planting.latest_activity(), Some(at("2024-06-01T00:00:00Z")));
    }

    #[test]
    fn empty_history_has_no_status() {
        let mut planting = Planting::new("pl1", "p1", "g1", Status::Wishlist, Timestamp::now());
        planting.history.clear();
        assert_eq!(planting.current_status(), None);
        assert_eq!(planting.latest_activity(), None);
    }

    #[test]
    fn status_parses_case_insensitively() {
        assert_eq!("growing".parse::<Status>().unwrap(), Status::Growing);
        assert!("sprouting".parse::<Status>().is_err());
    }

    #[test]
    fn planting_json_round_trips_camel_case() {
        let json = r#"{
            "id": "pl1",
            "plantId": "p1",
            "gardenId": "g1",
            "history": [{"id": "h1", "status": "Harvest", "date": "2024-08-01T12:00:00Z"}],
            "seedsOnHand": 12
        }"#;
        let planting: Planting = serde_json::from_str(json).unwrap();
        assert_eq!(planting.plant_id, "p1");
        assert_eq!(planting.seeds_on_hand, Some(12));
        assert_eq!(planting.planned_qty, None);
        assert_eq!(planting.current_status(), Some(Status::Harvest));
    }
}
