//! Planting storage: create, load and list plantings, and append status changes.

use jiff::Timestamp;
use rusqlite::{Connection, OptionalExtension, Row};

use crate::model::{Planting, Status, StatusHistoryEntry};

use super::garden::garden_exists;
use super::plant::plant_exists;
use super::{Result, Storage, StorageError, not_found};

const SELECT_PLANTINGS: &str =
    "SELECT id, plant_id, garden_id, history, seeds_on_hand, planned_qty FROM plantings";

impl Storage {
    /// Adds a planting. Its plant and garden must already exist.
    pub fn add_planting(&self, planting: &Planting) -> Result<()> {
        if !plant_exists(&self.conn, &planting.plant_id)? {
            return Err(StorageError::PlantNotFound(planting.plant_id.clone()));
        }
        if !garden_exists(&self.conn, &planting.garden_id)? {
            return Err(StorageError::GardenNotFound(planting.garden_id.clone()));
        }
        if planting.history.is_empty() {
            return Err(StorageError::Corrupt(format!(
                "planting {} has no status history",
                planting.id
            )));
        }
        if planting_exists(&self.conn, &planting.id)? {
            return Err(StorageError::AlreadyExists(planting.id.clone()));
        }
        insert_planting(&self.conn, planting)
    }

    /// Loads a single planting.
    pub fn load_planting(&self, id: &str) -> Result<Planting> {
        load_planting(&self.conn, id)
    }

    /// Lists all plantings in the order they were added.
    pub fn list_plantings(&self) -> Result<Vec<Planting>> {
        list_plantings(&self.conn)
    }

    /// Appends a status change to a planting's history.
    pub fn record_status(
        &self,
        id: &str,
        status: Status,
        date: Timestamp,
        notes: Option<String>,
    ) -> Result<Planting> {
        let mut planting = load_planting(&self.conn, id)?;
        planting.history.push(StatusHistoryEntry::new(status, date, notes));
        self.conn.execute(
            "UPDATE plantings SET history = ?1 WHERE id = ?2",
            rusqlite::params![serde_json::to_string(&planting.history)?, id],
        )?;
        Ok(planting)
    }
}

fn load_planting(conn: &Connection, id: &str) -> Result<Planting> {
    let row = conn.query_row(
        &format!("{SELECT_PLANTINGS} WHERE id = ?1"),
        [id],
        read_planting_columns,
    );
    planting_from_columns(not_found(row, || {
        StorageError::PlantingNotFound(id.to_string())
    })?)
}

fn planting_exists(conn: &Connection, id: &str) -> Result<bool> {
    let found = conn
        .query_row("SELECT 1 FROM plantings WHERE id = ?1", [id], |_| Ok(()))
        .optional()?;
    Ok(found.is_some())
}

pub(super) fn insert_planting(conn: &Connection, planting: &Planting) -> Result<()> {
    conn.execute(
        "INSERT INTO plantings (id, plant_id, garden_id, history, seeds_on_hand, planned_qty)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        rusqlite::params![
            &planting.id,
            &planting.plant_id,
            &planting.garden_id,
            serde_json::to_string(&planting.history)?,
            planting.seeds_on_hand,
            planting.planned_qty,
        ],
    )?;
    Ok(())
}

pub(super) fn update_planting_row(conn: &Connection, planting: &Planting) -> Result<()> {
    let rows = conn.execute(
        "UPDATE plantings
         SET plant_id = ?1, garden_id = ?2, history = ?3, seeds_on_hand = ?4, planned_qty = ?5
         WHERE id = ?6",
        rusqlite::params![
            &planting.plant_id,
            &planting.garden_id,
            serde_json::to_string(&planting.history)?,
            planting.seeds_on_hand,
            planting.planned_qty,
            &planting.id,
        ],
    )?;
    if rows == 0 {
        return Err(StorageError::PlantingNotFound(planting.id.clone()));
    }
    Ok(())
}

pub(super) fn list_plantings(conn: &Connection) -> Result<Vec<Planting>> {
    let mut stmt = conn.prepare(&format!("{SELECT_PLANTINGS} ORDER BY rowid"))?;
    let rows = stmt.query_map([], read_planting_columns)?;
    let mut plantings = Vec::new();
    for row in rows {
        plantings.push(planting_from_columns(row?)?);
    }
    Ok(plantings)
}

type PlantingColumns = (String, String, String, String, Option<u32>, Option<u32>);

fn read_planting_columns(row: &Row<'_>) -> rusqlite::Result<PlantingColumns> {
    Ok((
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
        row.get(5)?,
    ))
}

fn planting_from_columns(
    (id, plant_id, garden_id, history, seeds_on_hand, planned_qty): PlantingColumns,
) -> Result<Planting> {
    let history = serde_json::from_str(&history)
        .map_err(|e| StorageError::Corrupt(format!("planting {id} history: {e}")))?;
    Ok(Planting {
        id,
        plant_id,
        garden_id,
        history,
        seeds_on_hand,
        planned_qty,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::storage::test_support::*;

    fn seeded(storage: &Storage) -> Planting {
        storage.add_garden(&sample_garden("g1")).unwrap();
        storage.add_plant(&sample_plant("p1", "Tomato")).unwrap();
        let mut planting = Planting::new(
            "pl1",
            "p1",
            "g1",
            Status::Wishlist,
            "2024-01-01T00:00:00Z".parse().unwrap(),
        );
        planting.seeds_on_hand = Some(20);
        storage.add_planting(&planting).unwrap();
        planting
    }

    #[test]
    fn add_and_load_planting() {
        let (_dir, storage) = test_storage();
        let planting = seeded(&storage);

        assert_eq!(storage.load_planting("pl1").unwrap(), planting);
    }

    #[test]
    fn add_planting_requires_plant_and_garden() {
        let (_dir, storage) = test_storage();
        storage.add_garden(&sample_garden("g1")).unwrap();
        let orphan = Planting::new("pl1", "ghost", "g1", Status::Wishlist, Timestamp::now());
        let err = storage.add_planting(&orphan).unwrap_err();
        assert!(matches!(err, StorageError::PlantNotFound(_)));

        storage.add_plant(&sample_plant("p1", "Tomato")).unwrap();
        let orphan = Planting::new("pl1", "p1", "ghost", Status::Wishlist, Timestamp::now());
        let err = storage.add_planting(&orphan).unwrap_err();
        assert!(matches!(err, StorageError::GardenNotFound(_)));
    }

    #[test]
    fn add_planting_without_history_fails() {
        let (_dir, storage) = test_storage();
        let mut planting = seeded(&storage);
        planting.id = "pl2".into();
        planting.history.clear();

        let err = storage.add_planting(&planting).unwrap_err();
        assert!(matches!(err, StorageError::Corrupt(_)));
    }

    #[test]
    fn add_duplicate_planting_fails() {
        let (_dir, storage) = test_storage();
        let planting = seeded(&storage);
        let err = storage.add_planting(&planting).unwrap_err();
        assert!(matches!(err, StorageError::AlreadyExists(_)));
    }

    #[test]
    fn add_over_unreadable_planting_reports_existing() {
        let (_dir, storage) = test_storage();
        let planting = seeded(&storage);
        storage
            .conn
            .execute("UPDATE plantings SET history = 'not json' WHERE id = ?1", ["pl1"])
            .unwrap();
        assert!(storage.load_planting("pl1").is_err());

        let err = storage.add_planting(&planting).unwrap_err();
        assert!(matches!(err, StorageError::AlreadyExists(id) if id == "pl1"));
    }

    #[test]
    fn record_status_appends() {
        let (_dir, storage) = test_storage();
        seeded(&storage);

        storage
            .record_status(
                "pl1",
                Status::Growing,
                "2024-04-01T00:00:00Z".parse().unwrap(),
                Some("First true leaves".into()),
            )
            .unwrap();

        let loaded = storage.load_planting("pl1").unwrap();
        assert_eq!(loaded.history.len(), 2);
        assert_eq!(loaded.current_status(), Some(Status::Growing));
        assert_eq!(loaded.history[1].notes.as_deref(), Some("First true leaves"));
    }

    #[test]
    fn record_status_on_missing_planting_fails() {
        let (_dir, storage) = test_storage();
        let err = storage
            .record_status("nope", Status::Growing, Timestamp::now(), None)
            .unwrap_err();
        assert!(matches!(err, StorageError::PlantingNotFound(_)));
    }
}
