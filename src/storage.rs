//! Local persistence for gardens, plants and plantings.
//!
//! Everything lives in one `SQLite` file:
//!
//! ```text
//! ~/.sprout/garden.sqlite
//!   gardens     # one row per garden location, conditions as JSON
//!   plants      # species records
//!   plantings   # plant-in-garden junction rows, status history as JSON
//!   settings    # key/value, holds the active garden
//! ```
//!
//! Listing returns rows in insertion order. Imports and duplicate removal
//! run inside a single transaction.

mod garden;
mod import;
mod plant;
mod planting;

use std::{fs, io, path::Path, path::PathBuf};

use rusqlite::Connection;

use crate::reconcile::ReconcileError;

/// Errors that can occur during storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("garden not found: {0}")]
    GardenNotFound(String),

    #[error("plant not found: {0}")]
    PlantNotFound(String),

    #[error("planting not found: {0}")]
    PlantingNotFound(String),

    #[error("record already exists: {0}")]
    AlreadyExists(String),

    #[error("corrupt data: {0}")]
    Corrupt(String),

    #[error("import rejected: {0}")]
    Reconcile(#[from] ReconcileError),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

pub type Result<T> = core::result::Result<T, StorageError>;

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS gardens (
        id TEXT PRIMARY KEY,
        name TEXT NOT NULL,
        location TEXT,
        temperature_unit TEXT,
        conditions TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS plants (
        id TEXT PRIMARY KEY,
        species TEXT NOT NULL,
        germination_needs TEXT NOT NULL,
        optimal_conditions TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS plantings (
        id TEXT PRIMARY KEY,
        plant_id TEXT NOT NULL REFERENCES plants(id),
        garden_id TEXT NOT NULL REFERENCES gardens(id),
        history TEXT NOT NULL,
        seeds_on_hand INTEGER,
        planned_qty INTEGER
    );

    CREATE INDEX IF NOT EXISTS idx_plantings_plant ON plantings(plant_id);
    CREATE INDEX IF NOT EXISTS idx_plantings_garden ON plantings(garden_id);

    CREATE TABLE IF NOT EXISTS settings (
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL
    );
";

/// `SQLite`-backed storage for the whole garden.
pub struct Storage {
    conn: Connection,
}

impl Storage {
    /// Opens (or creates) the database at `path`.
    ///
    /// The parent directory is created if it doesn't exist.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        conn.execute_batch(SCHEMA)?;
        tracing::debug!(path = %path.display(), "opened garden database");
        Ok(Self { conn })
    }

    /// Returns the default database path: `~/.sprout/garden.sqlite`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".sprout").join("garden.sqlite"))
    }
}

/// Converts a missing row into the given error.
fn not_found<T>(
    result: rusqlite::Result<T>,
    err: impl FnOnce() -> StorageError,
) -> Result<T> {
    match result {
        Ok(value) => Ok(value),
        Err(rusqlite::Error::QueryReturnedNoRows) => Err(err()),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use tempfile::TempDir;

    use super::Storage;
    use crate::model::{Conditions, GardenLocation, Plant};

    pub fn test_storage() -> (TempDir, Storage) {
        let dir = TempDir::new().unwrap();
        let storage = Storage::open(dir.path().join("garden.sqlite")).unwrap();
        (dir, storage)
    }

    pub fn sample_garden(id: &str) -> GardenLocation {
        GardenLocation {
            id: id.into(),
            name: "Back yard".into(),
            location: Some("South-facing slope".into()),
            temperature_unit: None,
            conditions: Conditions {
                temperature: Some("Warm, 70-85F".into()),
                sunlight: Some("Full sun".into()),
                soil: Some("Well-drained loam".into()),
                current_season: Some("Summer".into()),
            },
        }
    }

    pub fn sample_plant(id: &str, species: &str) -> Plant {
        Plant {
            id: id.into(),
            species: species.into(),
            germination_needs: "Warm soil".into(),
            optimal_conditions: "Full sun, well-drained".into(),
        }
    }
}
