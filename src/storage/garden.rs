//! Garden storage: create, load, update and list garden locations, and
//! track which one is active.

use rusqlite::{Connection, OptionalExtension, Row};

use crate::model::{Conditions, GardenLocation, TemperatureUnit};

use super::{Result, Storage, StorageError, not_found};

const ACTIVE_GARDEN: &str = "active_garden";

impl Storage {
    /// Adds a new garden location.
    pub fn add_garden(&self, garden: &GardenLocation) -> Result<()> {
        if garden_exists(&self.conn, &garden.id)? {
            return Err(StorageError::AlreadyExists(garden.id.clone()));
        }
        insert_garden(&self.conn, garden)
    }

    /// Updates a garden's name, description, unit and conditions.
    pub fn update_garden(&self, garden: &GardenLocation) -> Result<()> {
        update_garden_row(&self.conn, garden)
    }

    /// Loads a single garden.
    pub fn load_garden(&self, id: &str) -> Result<GardenLocation> {
        let row = self.conn.query_row(
            "SELECT id, name, location, temperature_unit, conditions FROM gardens WHERE id = ?1",
            [id],
            read_garden_columns,
        );
        garden_from_columns(not_found(row, || StorageError::GardenNotFound(id.to_string()))?)
    }

    /// Lists all gardens in the order they were added.
    pub fn list_gardens(&self) -> Result<Vec<GardenLocation>> {
        list_gardens(&self.conn)
    }

    /// Marks a garden as the active one.
    pub fn set_active_garden(&self, id: &str) -> Result<()> {
        if !garden_exists(&self.conn, id)? {
            return Err(StorageError::GardenNotFound(id.to_string()));
        }
        set_active(&self.conn, Some(id))
    }

    /// The active garden, if one is set and still exists.
    pub fn active_garden(&self) -> Result<Option<GardenLocation>> {
        match active_garden_id(&self.conn)? {
            Some(id) if garden_exists(&self.conn, &id)? => self.load_garden(&id).map(Some),
            _ => Ok(None),
        }
    }
}

pub(super) fn garden_exists(conn: &Connection, id: &str) -> Result<bool> {
    let found = conn
        .query_row("SELECT 1 FROM gardens WHERE id = ?1", [id], |_| Ok(()))
        .optional()?;
    Ok(found.is_some())
}

pub(super) fn insert_garden(conn: &Connection, garden: &GardenLocation) -> Result<()> {
    conn.execute(
        "INSERT INTO gardens (id, name, location, temperature_unit, conditions)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        rusqlite::params![
            &garden.id,
            &garden.name,
            &garden.location,
            garden.temperature_unit.map(|u| u.to_string()),
            serde_json::to_string(&garden.conditions)?,
        ],
    )?;
    Ok(())
}

pub(super) fn update_garden_row(conn: &Connection, garden: &GardenLocation) -> Result<()> {
    let rows = conn.execute(
        "UPDATE gardens
         SET name = ?1, location = ?2, temperature_unit = ?3, conditions = ?4
         WHERE id = ?5",
        rusqlite::params![
            &garden.name,
            &garden.location,
            garden.temperature_unit.map(|u| u.to_string()),
            serde_json::to_string(&garden.conditions)?,
            &garden.id,
        ],
    )?;
    if rows == 0 {
        return Err(StorageError::GardenNotFound(garden.id.clone()));
    }
    Ok(())
}

pub(super) fn list_gardens(conn: &Connection) -> Result<Vec<GardenLocation>> {
    let mut stmt = conn.prepare(
        "SELECT id, name, location, temperature_unit, conditions FROM gardens ORDER BY rowid",
    )?;
    let rows = stmt.query_map([], read_garden_columns)?;
    let mut gardens = Vec::new();
    for row in rows {
        gardens.push(garden_from_columns(row?)?);
    }
    Ok(gardens)
}

pub(super) fn active_garden_id(conn: &Connection) -> Result<Option<String>> {
    Ok(conn
        .query_row(
            "SELECT value FROM settings WHERE key = ?1",
            [ACTIVE_GARDEN],
            |row| row.get::<_, String>(0),
        )
        .optional()?)
}

pub(super) fn set_active(conn: &Connection, id: Option<&str>) -> Result<()> {
    match id {
        Some(id) => conn.execute(
            "INSERT INTO settings (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            [ACTIVE_GARDEN, id],
        )?,
        None => conn.execute("DELETE FROM settings WHERE key = ?1", [ACTIVE_GARDEN])?,
    };
    Ok(())
}

type GardenColumns = (String, String, Option<String>, Option<String>, String);

fn read_garden_columns(row: &Row<'_>) -> rusqlite::Result<GardenColumns> {
    Ok((
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
    ))
}

/// Reconstructs a garden from its table columns.
fn garden_from_columns(
    (id, name, location, unit, conditions): GardenColumns,
) -> Result<GardenLocation> {
    let temperature_unit = unit
        .map(|u| u.parse::<TemperatureUnit>())
        .transpose()
        .map_err(|e| StorageError::Corrupt(format!("garden {id}: {e}")))?;
    let conditions: Conditions = serde_json::from_str(&conditions)
        .map_err(|e| StorageError::Corrupt(format!("garden {id} conditions: {e}")))?;
    Ok(GardenLocation {
        id,
        name,
        location,
        temperature_unit,
        conditions,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::storage::test_support::*;

    #[test]
    fn add_and_load_garden() {
        let (_dir, storage) = test_storage();
        let mut garden = sample_garden("g1");
        garden.temperature_unit = Some(TemperatureUnit::Celsius);

        storage.add_garden(&garden).unwrap();
        let loaded = storage.load_garden("g1").unwrap();

        assert_eq!(loaded, garden);
    }

    #[test]
    fn add_duplicate_garden_fails() {
        let (_dir, storage) = test_storage();
        storage.add_garden(&sample_garden("g1")).unwrap();
        let err = storage.add_garden(&sample_garden("g1")).unwrap_err();

        assert!(matches!(err, StorageError::AlreadyExists(_)));
    }

    #[test]
    fn load_nonexistent_garden_fails() {
        let (_dir, storage) = test_storage();
        let err = storage.load_garden("nope").unwrap_err();

        assert!(matches!(err, StorageError::GardenNotFound(_)));
    }

    #[test]
    fn update_garden_conditions() {
        let (_dir, storage) = test_storage();
        let mut garden = sample_garden("g1");
        storage.add_garden(&garden).unwrap();

        garden.conditions.sunlight = Some("Partial shade".into());
        storage.update_garden(&garden).unwrap();

        let loaded = storage.load_garden("g1").unwrap();
        assert_eq!(loaded.conditions.sunlight.as_deref(), Some("Partial shade"));
    }

    #[test]
    fn update_nonexistent_garden_fails() {
        let (_dir, storage) = test_storage();
        let err = storage.update_garden(&sample_garden("g1")).unwrap_err();

        assert!(matches!(err, StorageError::GardenNotFound(_)));
    }

    #[test]
    fn list_gardens_keeps_insertion_order() {
        let (_dir, storage) = test_storage();
        // Ids deliberately out of lexical order.
        storage.add_garden(&sample_garden("zz")).unwrap();
        storage.add_garden(&sample_garden("aa")).unwrap();

        let ids: Vec<String> = storage
            .list_gardens()
            .unwrap()
            .into_iter()
            .map(|g| g.id)
            .collect();
        assert_eq!(ids, vec!["zz", "aa"]);
    }

    #[test]
    fn active_garden_round_trip() {
        let (_dir, storage) = test_storage();
        assert!(storage.active_garden().unwrap().is_none());

        storage.add_garden(&sample_garden("g1")).unwrap();
        storage.add_garden(&sample_garden("g2")).unwrap();
        storage.set_active_garden("g1").unwrap();
        storage.set_active_garden("g2").unwrap();

        assert_eq!(storage.active_garden().unwrap().unwrap().id, "g2");
    }

    #[test]
    fn activating_unknown_garden_fails() {
        let (_dir, storage) = test_storage();
        let err = storage.set_active_garden("nope").unwrap_err();
        assert!(matches!(err, StorageError::GardenNotFound(_)));
    }
}
