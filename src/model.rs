//! Core data model for Sprout.
//!
//! These types mirror the records the rest of the garden app hands us:
//! plants, garden locations, plantings with their status history, and the
//! transient datasets produced by generators or canned imports.

mod dataset;
mod garden;
mod plant;
mod planting;

pub use dataset::{AiDataset, Collection};
pub use garden::{Conditions, GardenLocation, TemperatureUnit};
pub use plant::Plant;
pub use planting::{Planting, Status, StatusHistoryEntry};

/// Mints a fresh opaque record id.
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
