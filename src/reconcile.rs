//! Dataset reconciliation: merging an incoming dataset into the collection.
//!
//! A reconciliation never touches storage. It returns a [`MutationPlan`]
//! describing creates, updates, deletes and id remaps, and storage applies
//! the plan in a single transaction.
//!
//! Three modes:
//!
//! - `replace`: drop everything, adopt the incoming records with their ids.
//! - `create-new`: keep everything, add the incoming records under fresh ids.
//! - `add-to-existing`: add the incoming plantings to an existing garden,
//!   reusing existing plants whose species matches.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;
use std::str::FromStr;

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use crate::model::{
    AiDataset, Collection, GardenLocation, Plant, Planting, Status, StatusHistoryEntry, new_id,
};

/// Errors raised while planning an import.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReconcileError {
    #[error("invalid record: {0}")]
    Validation(String),

    #[error("invalid import mode: {0}")]
    InvalidMode(String),

    #[error("planting {planting} references missing {kind} {id}")]
    ReferentialIntegrity {
        planting: String,
        kind: &'static str,
        id: String,
    },
}

pub type Result<T> = core::result::Result<T, ReconcileError>;

/// How an incoming dataset joins the existing collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ImportMode {
    Replace,
    AddToExisting,
    CreateNew,
}

impl fmt::Display for ImportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Replace => "replace",
            Self::AddToExisting => "add-to-existing",
            Self::CreateNew => "create-new",
        })
    }
}

impl FromStr for ImportMode {
    type Err = String;

    fn from_str(s: &str) -> core::result::Result<Self, Self::Err> {
        match s {
            "replace" => Ok(Self::Replace),
            "add-to-existing" => Ok(Self::AddToExisting),
            "create-new" => Ok(Self::CreateNew),
            other => Err(format!("unknown import mode: {other}")),
        }
    }
}

/// Ids to remove, per collection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deletions {
    pub locations: Vec<String>,
    pub plants: Vec<String>,
    pub plantings: Vec<String>,
}

impl Deletions {
    pub fn is_empty(&self) -> bool {
        self.locations.is_empty() && self.plants.is_empty() && self.plantings.is_empty()
    }
}

/// Incoming ids mapped to the ids they resolve to in the collection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdRemap {
    pub locations: BTreeMap<String, String>,
    pub plants: BTreeMap<String, String>,
}

/// A pure description of what an import changes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MutationPlan {
    pub creates: Collection,
    pub updates: Collection,
    pub deletes: Deletions,
    pub id_remap: IdRemap,
}

impl MutationPlan {
    pub fn is_empty(&self) -> bool {
        self.creates == Collection::default()
            && self.updates == Collection::default()
            && self.deletes.is_empty()
    }

    /// The collection that results from applying this plan to `existing`.
    ///
    /// Deletes first, then updates by id, then creates appended in order.
    pub fn apply_to(&self, existing: &Collection) -> Collection {
        Collection {
            locations: merge(
                &existing.locations,
                &self.deletes.locations,
                &self.updates.locations,
                &self.creates.locations,
                |l| &l.id,
            ),
            plants: merge(
                &existing.plants,
                &self.deletes.plants,
                &self.updates.plants,
                &self.creates.plants,
                |p| &p.id,
            ),
            plantings: merge(
                &existing.plantings,
                &self.deletes.plantings,
                &self.updates.plantings,
                &self.creates.plantings,
                |p| &p.id,
            ),
        }
    }
}

fn merge<T: Clone>(
    existing: &[T],
    deletes: &[String],
    updates: &[T],
    creates: &[T],
    id: impl Fn(&T) -> &String,
) -> Vec<T> {
    let deletes: HashSet<&String> = deletes.iter().collect();
    let updates: HashMap<&String, &T> = updates.iter().map(|u| (id(u), u)).collect();
    existing
        .iter()
        .filter(|record| !deletes.contains(id(record)))
        .map(|record| (*updates.get(id(record)).unwrap_or(&record)).clone())
        .chain(creates.iter().cloned())
        .collect()
}

/// Fails if any planting points at a plant or location not in `collection`.
pub fn check_integrity(collection: &Collection) -> Result<()> {
    let plants: HashSet<&str> = collection.plants.iter().map(|p| p.id.as_str()).collect();
    let locations: HashSet<&str> = collection.locations.iter().map(|l| l.id.as_str()).collect();
    for planting in &collection.plantings {
        if !plants.contains(planting.plant_id.as_str()) {
            return Err(ReconcileError::ReferentialIntegrity {
                planting: planting.id.clone(),
                kind: "plant",
                id: planting.plant_id.clone(),
            });
        }
        if !locations.contains(planting.garden_id.as_str()) {
            return Err(ReconcileError::ReferentialIntegrity {
                planting: planting.id.clone(),
                kind: "garden",
                id: planting.garden_id.clone(),
            });
        }
    }
    Ok(())
}

/// Plans imports. Holds the id source and the clock so plans are reproducible.
pub struct Reconciler<M> {
    mint: M,
    now: Timestamp,
}

impl Reconciler<fn() -> String> {
    /// A reconciler minting UUID v4 ids, dated now.
    pub fn new() -> Self {
        Self::with_minter(new_id as fn() -> String, Timestamp::now())
    }
}

impl Default for Reconciler<fn() -> String> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: FnMut() -> String> Reconciler<M> {
    pub fn with_minter(mint: M, now: Timestamp) -> Self {
        Self { mint, now }
    }

    /// Plans the import of `incoming` into `existing`.
    ///
    /// `target` names the existing garden for [`ImportMode::AddToExisting`]
    /// and is ignored otherwise. A dataset with no plants and no plantings
    /// yields an empty plan in every mode, whatever locations it carries.
    pub fn reconcile(
        &mut self,
        existing: &Collection,
        incoming: &AiDataset,
        mode: ImportMode,
        target: Option<&str>,
    ) -> Result<MutationPlan> {
        validate(incoming)?;
        // Checked before the empty shortcut: a bad target is an error even for no data.
        if mode == ImportMode::AddToExisting {
            require_target(existing, target)?;
        }

        if incoming.plants.is_empty() && incoming.plantings.is_empty() {
            return Ok(MutationPlan::default());
        }

        let plan = match mode {
            ImportMode::Replace => self.replace(existing, incoming)?,
            ImportMode::CreateNew => self.create_new(incoming)?,
            ImportMode::AddToExisting => {
                let garden = require_target(existing, target)?;
                self.add_to_existing(existing, incoming, &garden.id)?
            }
        };

        check_integrity(&plan.apply_to(existing))?;

        tracing::info!(
            %mode,
            locations = plan.creates.locations.len(),
            plants = plan.creates.plants.len(),
            plantings = plan.creates.plantings.len(),
            updated_plants = plan.updates.plants.len(),
            deleted_plants = plan.deletes.plants.len(),
            "planned import"
        );
        Ok(plan)
    }

    fn replace(&mut self, existing: &Collection, incoming: &AiDataset) -> Result<MutationPlan> {
        let garden_ids = identity_map(incoming.locations.iter().map(|l| &l.id));
        let sole_garden = sole_location(&incoming.locations);
        let plant_ids = identity_map(incoming.plants.iter().map(|p| &p.id));

        let mut plantings = Vec::with_capacity(incoming.plantings.len());
        for planting in &incoming.plantings {
            let mut planting = planting.clone();
            planting.plant_id = resolve(&plant_ids, &planting, "plant", &planting.plant_id)?;
            planting.garden_id = resolve_garden(&garden_ids, sole_garden, &planting)?;
            self.seed_history(&mut planting);
            plantings.push(planting);
        }

        Ok(MutationPlan {
            creates: Collection {
                locations: incoming.locations.clone(),
                plants: incoming.plants.clone(),
                plantings,
            },
            updates: Collection::default(),
            deletes: Deletions {
                locations: existing.locations.iter().map(|l| l.id.clone()).collect(),
                plants: existing.plants.iter().map(|p| p.id.clone()).collect(),
                plantings: existing.plantings.iter().map(|p| p.id.clone()).collect(),
            },
            id_remap: IdRemap::default(),
        })
    }

    fn create_new(&mut self, incoming: &AiDataset) -> Result<MutationPlan> {
        let mut plan = MutationPlan::default();

        for location in &incoming.locations {
            let id = (self.mint)();
            plan.id_remap
                .locations
                .insert(location.id.clone(), id.clone());
            plan.creates.locations.push(GardenLocation {
                id,
                ..location.clone()
            });
        }
        let sole_garden = sole_location(&plan.creates.locations);

        for plant in &incoming.plants {
            let id = (self.mint)();
            plan.id_remap.plants.insert(plant.id.clone(), id.clone());
            plan.creates.plants.push(Plant {
                id,
                ..plant.clone()
            });
        }

        for planting in &incoming.plantings {
            let plant_id = resolve(&plan.id_remap.plants, planting, "plant", &planting.plant_id)?;
            let garden_id = resolve_garden(&plan.id_remap.locations, sole_garden, planting)?;
            let planting = self.rebind(planting, plant_id, garden_id);
            plan.creates.plantings.push(planting);
        }

        Ok(plan)
    }

    fn add_to_existing(
        &mut self,
        existing: &Collection,
        incoming: &AiDataset,
        target: &str,
    ) -> Result<MutationPlan> {
        let mut plan = MutationPlan::default();

        // Species key to resolved id, seeded with what is already stored.
        let mut by_species: HashMap<String, String> = HashMap::new();
        for plant in &existing.plants {
            by_species
                .entry(plant.species_key())
                .or_insert_with(|| plant.id.clone());
        }

        for plant in &incoming.plants {
            let key = plant.species_key();
            if let Some(id) = by_species.get(&key) {
                plan.id_remap.plants.insert(plant.id.clone(), id.clone());
                // A plant already queued for update keeps collecting text.
                let queued = plan.updates.plants.iter().position(|p| &p.id == id);
                let current = match queued {
                    Some(i) => Some(&plan.updates.plants[i]),
                    None => existing.plant(id),
                };
                if let Some(current) = current
                    && let Some(filled) = fill_blanks(current, plant)
                {
                    match queued {
                        Some(i) => plan.updates.plants[i] = filled,
                        None => plan.updates.plants.push(filled),
                    }
                }
                continue;
            }
            let id = (self.mint)();
            by_species.insert(key, id.clone());
            plan.id_remap.plants.insert(plant.id.clone(), id.clone());
            plan.creates.plants.push(Plant {
                id,
                ..plant.clone()
            });
        }

        for planting in &incoming.plantings {
            let plant_id = resolve(&plan.id_remap.plants, planting, "plant", &planting.plant_id)?;
            let planting = self.rebind(planting, plant_id, target.to_string());
            plan.creates.plantings.push(planting);
        }

        Ok(plan)
    }

    /// A copy of `planting` under a fresh id, pointing at the resolved records.
    fn rebind(&mut self, planting: &Planting, plant_id: String, garden_id: String) -> Planting {
        let mut planting = Planting {
            id: (self.mint)(),
            plant_id,
            garden_id,
            ..planting.clone()
        };
        self.seed_history(&mut planting);
        planting
    }

    fn seed_history(&mut self, planting: &mut Planting) {
        if planting.history.is_empty() {
            planting.history.push(StatusHistoryEntry {
                id: (self.mint)(),
                status: Status::Planning,
                date: self.now,
                notes: None,
            });
        }
    }
}

/// Plans an import with UUID ids, dated now.
pub fn reconcile(
    existing: &Collection,
    incoming: &AiDataset,
    mode: ImportMode,
    target: Option<&str>,
) -> Result<MutationPlan> {
    Reconciler::new().reconcile(existing, incoming, mode, target)
}

fn require_target<'a>(existing: &'a Collection, target: Option<&str>) -> Result<&'a GardenLocation> {
    let Some(target) = target else {
        return Err(ReconcileError::InvalidMode(
            "add-to-existing requires a target garden".into(),
        ));
    };
    existing.location(target).ok_or_else(|| {
        ReconcileError::InvalidMode(format!("add-to-existing target garden not found: {target}"))
    })
}

fn validate(incoming: &AiDataset) -> Result<()> {
    let mut plant_ids = HashSet::new();
    for plant in &incoming.plants {
        if plant.id.trim().is_empty() {
            return Err(ReconcileError::Validation(format!(
                "plant '{}' has no id",
                plant.species
            )));
        }
        if !plant_ids.insert(plant.id.as_str()) {
            return Err(ReconcileError::Validation(format!(
                "plant id {} appears more than once",
                plant.id
            )));
        }
    }

    let mut location_ids = HashSet::new();
    for location in &incoming.locations {
        if location.id.trim().is_empty() {
            return Err(ReconcileError::Validation(format!(
                "garden '{}' has no id",
                location.name
            )));
        }
        if !location_ids.insert(location.id.as_str()) {
            return Err(ReconcileError::Validation(format!(
                "garden id {} appears more than once",
                location.id
            )));
        }
    }

    let mut planting_ids = HashSet::new();
    for planting in &incoming.plantings {
        if planting.id.trim().is_empty() {
            return Err(ReconcileError::Validation("planting has no id".into()));
        }
        if !planting_ids.insert(planting.id.as_str()) {
            return Err(ReconcileError::Validation(format!(
                "planting id {} appears more than once",
                planting.id
            )));
        }
        if planting.plant_id.trim().is_empty() {
            return Err(ReconcileError::Validation(format!(
                "planting {} has no plantId",
                planting.id
            )));
        }
    }
    Ok(())
}

fn identity_map<'a>(ids: impl Iterator<Item = &'a String>) -> BTreeMap<String, String> {
    ids.map(|id| (id.clone(), id.clone())).collect()
}

fn sole_location(locations: &[GardenLocation]) -> Option<&str> {
    match locations {
        [only] => Some(only.id.as_str()),
        _ => None,
    }
}

fn resolve(
    remap: &BTreeMap<String, String>,
    planting: &Planting,
    kind: &str,
    id: &str,
) -> Result<String> {
    remap.get(id).cloned().ok_or_else(|| {
        ReconcileError::Validation(format!(
            "planting {} references {kind} {id}, which is not in the dataset",
            planting.id
        ))
    })
}

/// Resolves a planting's garden; a dataset with one garden claims strays.
fn resolve_garden(
    remap: &BTreeMap<String, String>,
    sole: Option<&str>,
    planting: &Planting,
) -> Result<String> {
    match (remap.get(&planting.garden_id), sole) {
        (Some(id), _) => Ok(id.clone()),
        (None, Some(only)) => Ok(only.to_string()),
        (None, None) => Err(ReconcileError::Validation(format!(
            "planting {} references garden {}, which is not in the dataset",
            planting.id, planting.garden_id
        ))),
    }
}

/// `current` with blank requirement text filled from `incoming`, if any was blank.
fn fill_blanks(current: &Plant, incoming: &Plant) -> Option<Plant> {
    let mut filled = current.clone();
    if filled.germination_needs.trim().is_empty() {
        filled.germination_needs.clone_from(&incoming.germination_needs);
    }
    if filled.optimal_conditions.trim().is_empty() {
        filled.optimal_conditions.clone_from(&incoming.optimal_conditions);
    }
    (filled != *current).then_some(filled)
}
