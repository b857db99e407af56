//! Duplicate plant detection.
//!
//! Plants are grouped by their species with any parenthesized text removed
//! (usually a scientific name). Within a group the most recently active
//! record survives; the rest are proposed for removal. Nothing is deleted
//! here. Callers review the groups, adjust them, and commit the removal
//! set through storage.

use std::collections::{BTreeSet, HashMap};

use jiff::Timestamp;
use serde::Serialize;

use crate::model::{Plant, Planting};

/// Plants that share a species key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DuplicateGroup {
    /// Species text of the surviving record.
    pub canonical_species: String,

    /// Newest activity first. Index 0 is the proposed survivor.
    pub members: Vec<Plant>,

    /// Ids proposed for removal.
    pub to_delete: BTreeSet<String>,
}

impl DuplicateGroup {
    /// The proposed survivor.
    pub fn survivor(&self) -> &Plant {
        &self.members[0]
    }

    /// Withdraws a member from removal. Returns whether anything changed.
    pub fn keep(&mut self, id: &str) -> bool {
        self.to_delete.remove(id)
    }

    /// Marks a member for removal.
    ///
    /// The survivor can't be discarded; use [`DuplicateGroup::keep`] on the
    /// others instead. Returns whether anything changed.
    pub fn discard(&mut self, id: &str) -> bool {
        if self.survivor().id == id || !self.members.iter().any(|p| p.id == id) {
            return false;
        }
        self.to_delete.insert(id.to_string())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.members.iter().any(|p| p.id == id)
    }
}

/// Grouping key: parenthesized text removed, lower-cased, whitespace collapsed.
///
/// Every parenthesized substring goes, nested or not. An unmatched `)` is
/// dropped; text after an unmatched `(` is dropped.
pub fn species_key(species: &str) -> String {
    let mut depth = 0usize;
    let mut stripped = String::with_capacity(species.len());
    for c in species.chars() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            _ if depth == 0 => stripped.push(c),
            _ => {}
        }
    }
    stripped
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// The key a plant is grouped under, or `None` for a blank species.
///
/// A species that is all parenthesized text falls back to the whole name,
/// lower-cased, so unrelated bare scientific names stay apart.
fn grouping_key(species: &str) -> Option<String> {
    let key = species_key(species);
    if !key.is_empty() {
        return Some(key);
    }
    let whole = species
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();
    (!whole.is_empty()).then_some(whole)
}

/// Finds every group of two or more plants with the same species key.
///
/// Plants with a blank species are never grouped. Groups come back in the order their key first appears in `plants`.
/// Recency is the latest history date across all plantings of a plant;
/// a plant with no history sorts last. Equal recency keeps collection order.
pub fn find_duplicates(plants: &[Plant], plantings: &[Planting]) -> Vec<DuplicateGroup> {
    let recency = latest_activity_by_plant(plantings);

    let mut order: Vec<String> = Vec::new();
    let mut groups: HashMap<String, Vec<&Plant>> = HashMap::new();
    for plant in plants {
        let Some(key) = grouping_key(&plant.species) else {
            continue;
        };
        let members = groups.entry(key.clone()).or_default();
        if members.is_empty() {
            order.push(key);
        }
        members.push(plant);
    }

    let found: Vec<DuplicateGroup> = order
        .into_iter()
        .filter_map(|key| {
            let mut members = groups.remove(&key)?;
            if members.len() < 2 {
                return None;
            }
            // Stable: ties keep collection order. `None` sorts below any date.
            members.sort_by(|a, b| recency.get(b.id.as_str()).cmp(&recency.get(a.id.as_str())));
            let members: Vec<Plant> = members.into_iter().cloned().collect();
            Some(DuplicateGroup {
                canonical_species: members[0].species.clone(),
                to_delete: members[1..].iter().map(|p| p.id.clone()).collect(),
                members,
            })
        })
        .collect();

    tracing::debug!(
        plants = plants.len(),
        groups = found.len(),
        "duplicate scan finished"
    );
    found
}

/// Union of every group's removal set.
pub fn removal_set(groups: &[DuplicateGroup]) -> BTreeSet<String> {
    groups
        .iter()
        .flat_map(|g| g.to_delete.iter().cloned())
        .collect()
}

fn latest_activity_by_plant(plantings: &[Planting]) -> HashMap<&str, Timestamp> {
    let mut latest: HashMap<&str, Timestamp> = HashMap::new();
    for planting in plantings {
        let Some(at) = planting.latest_activity() else {
            continue;
        };
        latest
            .entry(planting.plant_id.as_str())
            .and_modify(|current| *current = (*current).max(at))
            .or_insert(at);
    }
    latest
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::HashSet;

    use crate::model::Status;

    fn plant(id: &str, species: &str) -> Plant {
        Plant::new(id, species)
    }

    fn planting(plant_id: &str, date: &str) -> Planting {
        Planting::new(
            format!("pl-{plant_id}-{date}"),
            plant_id,
            "g1",
            Status::Growing,
            date.parse().unwrap(),
        )
    }

    #[test]
    fn key_strips_all_parentheses() {
        assert_eq!(species_key("Tomato (Solanum lycopersicum)"), "tomato");
        assert_eq!(species_key("  TOMATO "), "tomato");
        assert_eq!(species_key("Basil (Genovese) (Ocimum)"), "basil");
        assert_eq!(species_key("Sweet (big (nested)) Pepper"), "sweet pepper");
        assert_eq!(species_key("Mint)"), "mint");
    }

    #[test]
    fn most_recent_record_survives() {
        let plants = vec![plant("a", "Tomato"), plant("b", "Tomato (Solanum)")];
        let plantings = vec![
            planting("a", "2024-01-01T00:00:00Z"),
            planting("b", "2024-06-01T00:00:00Z"),
        ];

        let groups = find_duplicates(&plants, &plantings);

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].survivor().id, "b");
        assert_eq!(groups[0].canonical_species, "Tomato (Solanum)");
        assert_eq!(groups[0].to_delete, BTreeSet::from(["a".to_string()]));
    }

    #[test]
    fn recency_uses_latest_entry_across_plantings() {
        let plants = vec![plant("a", "Kale"), plant("b", "kale")];
        let mut old = planting("a", "2023-01-01T00:00:00Z");
        old.record(Status::Harvest, "2024-09-01T00:00:00Z".parse().unwrap(), None);
        let plantings = vec![old, planting("b", "2024-05-01T00:00:00Z")];

        let groups = find_duplicates(&plants, &plantings);
        assert_eq!(groups[0].survivor().id, "a");
    }

    #[test]
    fn plants_without_history_sort_last() {
        let plants = vec![plant("a", "Leek"), plant("b", "Leek"), plant("c", "Leek")];
        let plantings = vec![planting("c", "2020-01-01T00:00:00Z")];

        let groups = find_duplicates(&plants, &plantings);
        let order: Vec<&str> = groups[0].members.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(order, vec!["c", "a", "b"]);
    }

    #[test]
    fn singletons_are_not_groups() {
        let plants = vec![plant("a", "Leek"), plant("b", "Onion")];
        assert!(find_duplicates(&plants, &[]).is_empty());
    }

    #[test]
    fn groups_follow_first_appearance() {
        let plants = vec![
            plant("a", "Pea"),
            plant("b", "Bean"),
            plant("c", "bean"),
            plant("d", "pea"),
        ];
        let groups = find_duplicates(&plants, &[]);
        let species: Vec<&str> = groups.iter().map(|g| g.canonical_species.as_str()).collect();
        assert_eq!(species, vec!["Pea", "Bean"]);
    }

    #[test]
    fn caller_can_adjust_removal() {
        let plants = vec![plant("a", "Leek"), plant("b", "Leek"), plant("c", "Leek")];
        let mut groups = find_duplicates(&plants, &[]);
        let group = &mut groups[0];

        assert!(group.keep("b"));
        assert!(!group.keep("b"));
        assert!(!group.discard("a"), "survivor cannot be discarded");
        assert!(!group.discard("zzz"));
        assert!(group.discard("b"));

        assert_eq!(removal_set(&groups), BTreeSet::from(["b".to_string(), "c".to_string()]));
    }

    #[test]
    fn bare_scientific_names_stay_apart() {
        let plants = vec![
            plant("a", "(Solanum lycopersicum)"),
            plant("b", "(Ocimum basilicum)"),
            plant("c", "(solanum  lycopersicum)"),
        ];
        let groups = find_duplicates(&plants, &[]);

        assert_eq!(groups.len(), 1);
        let ids: Vec<&str> = groups[0].members.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c"]);
        assert_eq!(removal_set(&groups), BTreeSet::from(["c".to_string()]));
    }

    #[test]
    fn blank_species_are_never_grouped() {
        let plants = vec![plant("a", ""), plant("b", "   "), plant("c", "()")];
        assert!(find_duplicates(&plants, &[]).is_empty());
    }

    #[test]
    fn removal_leaves_one_plant_per_key() {
        let plants = vec![
            plant("1", "Tomato"),
            plant("2", "Tomato (Solanum)"),
            plant("3", "Basil"),
            plant("4", "tomato"),
            plant("5", "Chive"),
            plant("6", "BASIL"),
        ];
        let plantings = vec![planting("4", "2024-02-02T00:00:00Z")];
        let groups = find_duplicates(&plants, &plantings);
        let removed = removal_set(&groups);

        let survivors: Vec<&Plant> = plants.iter().filter(|p| !removed.contains(&p.id)).collect();
        let keys: HashSet<String> = survivors.iter().map(|p| species_key(&p.species)).collect();
        assert_eq!(keys.len(), survivors.len());
        assert_eq!(keys.len(), 3);
        assert_eq!(survivors.len() + removed.len(), plants.len());
        assert!(survivors.iter().any(|p| p.id == "4"));
    }
}
