//! Duplicate plant review and removal.

use clap::Args;

use crate::dedup::{DuplicateGroup, find_duplicates, removal_set};
use crate::storage::Storage;

use super::format::short_id;
use super::resolve_id;

#[derive(Debug, Args)]
pub struct DedupArgs {
    /// Remove the marked duplicates. Without this, only report them.
    #[arg(long)]
    apply: bool,

    /// Keep a member that would otherwise be removed (repeatable).
    #[arg(long, value_name = "ID")]
    keep: Vec<String>,

    /// Also remove a member that would otherwise be kept (repeatable).
    #[arg(long, value_name = "ID")]
    discard: Vec<String>,
}

pub(super) fn cmd_dedup(storage: &mut Storage, args: &DedupArgs) -> Result<(), String> {
    let plants = storage
        .list_plants()
        .map_err(|e| format!("failed to list plants: {e}"))?;
    let plantings = storage
        .list_plantings()
        .map_err(|e| format!("failed to list plantings: {e}"))?;

    let mut groups = find_duplicates(&plants, &plantings);
    if groups.is_empty() {
        println!("No duplicates");
        return Ok(());
    }

    for reference in &args.keep {
        let (group, id) = locate(&mut groups, reference)?;
        group.keep(&id);
    }
    for reference in &args.discard {
        let (group, id) = locate(&mut groups, reference)?;
        if group.survivor().id == id {
            return Err(format!(
                "{} is the survivor of '{}'; --keep the others instead",
                short_id(&id),
                group.canonical_species
            ));
        }
        group.discard(&id);
    }

    for group in &groups {
        println!("{}", group.canonical_species);
        for (i, plant) in group.members.iter().enumerate() {
            let mark = if group.to_delete.contains(&plant.id) {
                "remove"
            } else if i == 0 {
                "keep*"
            } else {
                "keep"
            };
            println!("  {mark:<6}  {}  {}", short_id(&plant.id), plant.species);
        }
    }

    let removals = removal_set(&groups);
    if !args.apply {
        eprintln!(
            "{} plant(s) would be removed; rerun with --apply to commit",
            removals.len()
        );
        return Ok(());
    }

    let removed = storage
        .remove_duplicates(&groups)
        .map_err(|e| format!("failed to remove duplicates: {e}"))?;
    eprintln!("Removed {removed} duplicate plant(s)");
    Ok(())
}

/// Finds the group holding the referenced member.
fn locate<'a>(
    groups: &'a mut [DuplicateGroup],
    reference: &str,
) -> Result<(&'a mut DuplicateGroup, String), String> {
    let id = resolve_id(
        "duplicate",
        groups
            .iter()
            .flat_map(|g| g.members.iter().map(|p| p.id.as_str())),
        reference,
    )?;
    let group = groups
        .iter_mut()
        .find(|g| g.contains(&id))
        .ok_or_else(|| format!("{id} is not in any duplicate group"))?;
    Ok((group, id))
}
