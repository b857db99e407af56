//! Plant storage: create, load, update and list species records.

use rusqlite::{Connection, OptionalExtension, Row};

use crate::model::Plant;

use super::{Result, Storage, StorageError, not_found};

impl Storage {
    /// Adds a new plant.
    pub fn add_plant(&self, plant: &Plant) -> Result<()> {
        if plant_exists(&self.conn, &plant.id)? {
            return Err(StorageError::AlreadyExists(plant.id.clone()));
        }
        insert_plant(&self.conn, plant)
    }

    /// Updates a plant's species and requirement text.
    pub fn update_plant(&self, plant: &Plant) -> Result<()> {
        update_plant_row(&self.conn, plant)
    }

    /// Loads a single plant.
    pub fn load_plant(&self, id: &str) -> Result<Plant> {
        let row = self.conn.query_row(
            "SELECT id, species, germination_needs, optimal_conditions FROM plants WHERE id = ?1",
            [id],
            read_plant,
        );
        not_found(row, || StorageError::PlantNotFound(id.to_string()))
    }

    /// Lists all plants in the order they were added.
    pub fn list_plants(&self) -> Result<Vec<Plant>> {
        list_plants(&self.conn)
    }
}

pub(super) fn plant_exists(conn: &Connection, id: &str) -> Result<bool> {
    let found = conn
        .query_row("SELECT 1 FROM plants WHERE id = ?1", [id], |_| Ok(()))
        .optional()?;
    Ok(found.is_some())
}

pub(super) fn insert_plant(conn: &Connection, plant: &Plant) -> Result<()> {
    conn.execute(
        "INSERT INTO plants (id, species, germination_needs, optimal_conditions)
         VALUES (?1, ?2, ?3, ?4)",
        rusqlite::params![
            &plant.id,
            &plant.species,
            &plant.germination_needs,
            &plant.optimal_conditions,
        ],
    )?;
    Ok(())
}

pub(super) fn update_plant_row(conn: &Connection, plant: &Plant) -> Result<()> {
    let rows = conn.execute(
        "UPDATE plants
         SET species = ?1, germination_needs = ?2, optimal_conditions = ?3
         WHERE id = ?4",
        rusqlite::params![
            &plant.species,
            &plant.germination_needs,
            &plant.optimal_conditions,
            &plant.id,
        ],
    )?;
    if rows == 0 {
        return Err(StorageError::PlantNotFound(plant.id.clone()));
    }
    Ok(())
}

pub(super) fn list_plants(conn: &Connection) -> Result<Vec<Plant>> {
    let mut stmt = conn.prepare(
        "SELECT id, species, germination_needs, optimal_conditions FROM plants ORDER BY rowid",
    )?;
    let plants = stmt
        .query_map([], read_plant)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(plants)
}

fn read_plant(row: &Row<'_>) -> rusqlite::Result<Plant> {
    Ok(Plant {
        id: row.get(0)?,
        species: row.get(1)?,
        germination_needs: row.get(2)?,
        optimal_conditions: row.get(3)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::storage::test_support::*;

    #[test]
    fn add_and_load_plant() {
        let (_dir, storage) = test_storage();
        let plant = sample_plant("p1", "Tomato (Solanum lycopersicum)");

        storage.add_plant(&plant).unwrap();

        assert_eq!(storage.load_plant("p1").unwrap(), plant);
    }

    #[test]
    fn add_duplicate_plant_id_fails() {
        let (_dir, storage) = test_storage();
        storage.add_plant(&sample_plant("p1", "Tomato")).unwrap();
        let err = storage.add_plant(&sample_plant("p1", "Basil")).unwrap_err();

        assert!(matches!(err, StorageError::AlreadyExists(_)));
    }

    #[test]
    fn same_species_twice_is_allowed() {
        let (_dir, storage) = test_storage();
        storage.add_plant(&sample_plant("p1", "Tomato")).unwrap();
        storage.add_plant(&sample_plant("p2", "Tomato")).unwrap();

        assert_eq!(storage.list_plants().unwrap().len(), 2);
    }

    #[test]
    fn update_plant_text() {
        let (_dir, storage) = test_storage();
        let mut plant = sample_plant("p1", "Tomato");
        storage.add_plant(&plant).unwrap();

        plant.optimal_conditions = "Partial shade".into();
        storage.update_plant(&plant).unwrap();

        assert_eq!(
            storage.load_plant("p1").unwrap().optimal_conditions,
            "Partial shade"
        );
    }

    #[test]
    fn load_and_update_nonexistent_plant_fail() {
        let (_dir, storage) = test_storage();

        let err = storage.load_plant("nope").unwrap_err();
        assert!(matches!(err, StorageError::PlantNotFound(_)));

        let err = storage.update_plant(&sample_plant("nope", "Kale")).unwrap_err();
        assert!(matches!(err, StorageError::PlantNotFound(_)));
    }
}
