//! Collections of records: the persisted set and incoming datasets.

use serde::{Deserialize, Serialize};

use super::{GardenLocation, Plant, Planting};

/// A generated or canned dataset awaiting import.
///
/// Never persisted as-is: plantings reference dataset-local ids that the
/// reconciler remaps before anything is stored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiDataset {
    #[serde(default)]
    pub locations: Vec<GardenLocation>,

    #[serde(default)]
    pub plants: Vec<Plant>,

    #[serde(default)]
    pub plantings: Vec<Planting>,
}

/// Everything currently persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Collection {
    #[serde(default)]
    pub locations: Vec<GardenLocation>,

    #[serde(default)]
    pub plants: Vec<Plant>,

    #[serde(default)]
    pub plantings: Vec<Planting>,
}

impl Collection {
    pub fn plant(&self, id: &str) -> Option<&Plant> {
        self.plants.iter().find(|p| p.id == id)
    }

    pub fn location(&self, id: &str) -> Option<&GardenLocation> {
        self.locations.iter().find(|l| l.id == id)
    }

    /// The collection in import shape, as written by `export`.
    pub fn into_dataset(self) -> AiDataset {
        AiDataset {
            locations: self.locations,
            plants: self.plants,
            plantings: self.plantings,
        }
    }
}
