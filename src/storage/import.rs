//! Whole-collection operations: snapshot, plan application, duplicate removal.
//!
//! Both writers run in one transaction. A failure part-way through rolls
//! everything back, so readers never see a half-applied import.

use std::collections::HashSet;

use rusqlite::Connection;

use crate::dedup::DuplicateGroup;
use crate::model::Collection;
use crate::reconcile::{MutationPlan, check_integrity};

use super::garden::{
    active_garden_id, insert_garden, list_gardens, set_active, update_garden_row,
};
use super::plant::{insert_plant, list_plants, update_plant_row};
use super::planting::{insert_planting, list_plantings, update_planting_row};
use super::{Result, Storage};

impl Storage {
    /// Loads every garden, plant and planting.
    pub fn load_collection(&self) -> Result<Collection> {
        load_collection(&self.conn)
    }

    /// Applies a mutation plan atomically.
    ///
    /// The plan is re-checked against the current contents first; a plan
    /// that would leave a planting dangling is rejected without writing.
    /// If the active garden is deleted, the first created garden (if any)
    /// becomes active.
    pub fn apply_plan(&mut self, plan: &MutationPlan) -> Result<()> {
        let tx = self.conn.transaction()?;
        let current = load_collection(&tx)?;
        let result = plan.apply_to(&current);
        check_integrity(&result)?;

        for id in &plan.deletes.plantings {
            tx.execute("DELETE FROM plantings WHERE id = ?1", [id])?;
        }
        for id in &plan.deletes.plants {
            tx.execute("DELETE FROM plants WHERE id = ?1", [id])?;
        }
        for id in &plan.deletes.locations {
            tx.execute("DELETE FROM gardens WHERE id = ?1", [id])?;
        }

        for garden in &plan.updates.locations {
            update_garden_row(&tx, garden)?;
        }
        for plant in &plan.updates.plants {
            update_plant_row(&tx, plant)?;
        }
        for planting in &plan.updates.plantings {
            update_planting_row(&tx, planting)?;
        }

        for garden in &plan.creates.locations {
            insert_garden(&tx, garden)?;
        }
        for plant in &plan.creates.plants {
            insert_plant(&tx, plant)?;
        }
        for planting in &plan.creates.plantings {
            insert_planting(&tx, planting)?;
        }

        let remaining: HashSet<&str> = result.locations.iter().map(|l| l.id.as_str()).collect();
        if let Some(active) = active_garden_id(&tx)?
            && !remaining.contains(active.as_str())
        {
            let next = plan.creates.locations.first().map(|l| l.id.as_str());
            set_active(&tx, next)?;
        }

        tx.commit()?;
        tracing::info!(
            created_plants = plan.creates.plants.len(),
            created_plantings = plan.creates.plantings.len(),
            deleted_plants = plan.deletes.plants.len(),
            "applied import"
        );
        Ok(())
    }

    /// Deletes each group's removal set atomically.
    ///
    /// Plantings of a deleted plant move to the group's survivor so their
    /// history is kept. Returns the number of plants deleted.
    pub fn remove_duplicates(&mut self, groups: &[DuplicateGroup]) -> Result<usize> {
        let tx = self.conn.transaction()?;
        let mut removed = 0;
        for group in groups {
            let survivor = &group.survivor().id;
            for id in group.to_delete.iter().filter(|id| *id != survivor) {
                let moved = tx.execute(
                    "UPDATE plantings SET plant_id = ?1 WHERE plant_id = ?2",
                    [survivor, id],
                )?;
                removed += tx.execute("DELETE FROM plants WHERE id = ?1", [id])?;
                tracing::debug!(%id, %survivor, moved, "removed duplicate plant");
            }
        }
        tx.commit()?;
        Ok(removed)
    }
}

fn load_collection(conn: &Connection) -> Result<Collection> {
    Ok(Collection {
        locations: list_gardens(conn)?,
        plants: list_plants(conn)?,
        plantings: list_plantings(conn)?,
    })
}
