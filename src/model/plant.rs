//! Plant: a species record independent of any garden.

use serde::{Deserialize, Serialize};

/// A species record.
///
/// `species` is free text and not unique; the duplicate detector deals with
/// records that describe the same species.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Plant {
    pub id: String,

    /// Display name. May embed a common name and a parenthesized scientific name.
    pub species: String,

    #[serde(default)]
    pub germination_needs: String,

    #[serde(default)]
    pub optimal_conditions: String,
}

impl Plant {
    /// A plant with no requirement text yet.
    pub fn new(id: impl Into<String>, species: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            species: species.into(),
            germination_needs: String::new(),
            optimal_conditions: String::new(),
        }
    }

    /// Species lower-cased and trimmed, the identity used when importing.
    pub fn species_key(&self) -> String {
        self.species.trim().to_lowercase()
    }
}
