//! Dataset import and export.

use std::fs;
use std::path::PathBuf;

use clap::Args;

use crate::model::AiDataset;
use crate::reconcile::{ImportMode, MutationPlan, Reconciler};
use crate::storage::Storage;

use super::ModeArg;
use super::resolve_id;

#[derive(Debug, Args)]
pub struct ImportArgs {
    /// Dataset JSON file: `{"locations": [...], "plants": [...], "plantings": [...]}`.
    file: PathBuf,

    /// How the dataset meets what is already stored.
    #[arg(long, value_enum)]
    mode: ModeArg,

    /// Target garden ID or prefix for add-to-existing. Defaults to the active garden.
    #[arg(long)]
    garden: Option<String>,

    /// Print the plan as JSON without applying it.
    #[arg(long)]
    dry_run: bool,
}

#[derive(Debug, Args)]
pub struct ExportArgs {
    /// Output file. Writes to stdout when omitted.
    file: Option<PathBuf>,
}

pub(super) fn cmd_import(storage: &mut Storage, args: &ImportArgs) -> Result<(), String> {
    let raw = fs::read_to_string(&args.file)
        .map_err(|e| format!("failed to read {}: {e}", args.file.display()))?;
    let dataset: AiDataset = serde_json::from_str(&raw)
        .map_err(|e| format!("failed to parse {}: {e}", args.file.display()))?;

    let existing = storage
        .load_collection()
        .map_err(|e| format!("failed to load garden data: {e}"))?;

    let mode = args.mode.to_domain();
    let target = match (mode, &args.garden) {
        (ImportMode::AddToExisting, Some(reference)) => Some(resolve_id(
            "garden",
            existing.locations.iter().map(|g| g.id.as_str()),
            reference,
        )?),
        (ImportMode::AddToExisting, None) => storage
            .active_garden()
            .map_err(|e| format!("failed to read active garden: {e}"))?
            .map(|g| g.id),
        _ => None,
    };

    let plan = Reconciler::new()
        .reconcile(&existing, &dataset, mode, target.as_deref())
        .map_err(|e| format!("cannot import {}: {e}", args.file.display()))?;

    if args.dry_run {
        let json = serde_json::to_string_pretty(&plan)
            .map_err(|e| format!("failed to serialize plan: {e}"))?;
        println!("{json}");
        return Ok(());
    }

    if plan.is_empty() {
        eprintln!("Nothing to import");
        return Ok(());
    }

    storage
        .apply_plan(&plan)
        .map_err(|e| format!("failed to apply import: {e}"))?;

    eprintln!("Imported ({mode}): {}", summarize(&plan));
    Ok(())
}

pub(super) fn cmd_export(storage: &Storage, args: &ExportArgs) -> Result<(), String> {
    let dataset = storage
        .load_collection()
        .map_err(|e| format!("failed to load garden data: {e}"))?
        .into_dataset();
    let json = serde_json::to_string_pretty(&dataset)
        .map_err(|e| format!("failed to serialize dataset: {e}"))?;

    match &args.file {
        Some(path) => {
            fs::write(path, json).map_err(|e| format!("failed to write {}: {e}", path.display()))?;
            eprintln!(
                "Exported {} garden(s), {} plant(s), {} planting(s) to {}",
                dataset.locations.len(),
                dataset.plants.len(),
                dataset.plantings.len(),
                path.display()
            );
        }
        None => println!("{json}"),
    }
    Ok(())
}

/// Counts per kind, e.g. `+1 garden, +3 plants, +5 plantings, ~1 plant`.
fn summarize(plan: &MutationPlan) -> String {
    let counts = [
        ('-', "garden", plan.deletes.locations.len()),
        ('-', "plant", plan.deletes.plants.len()),
        ('-', "planting", plan.deletes.plantings.len()),
        ('~', "garden", plan.updates.locations.len()),
        ('~', "plant", plan.updates.plants.len()),
        ('~', "planting", plan.updates.plantings.len()),
        ('+', "garden", plan.creates.locations.len()),
        ('+', "plant", plan.creates.plants.len()),
        ('+', "planting", plan.creates.plantings.len()),
    ];

    counts
        .into_iter()
        .filter(|(_, _, n)| *n > 0)
        .map(|(sign, kind, n)| {
            let plural = if n == 1 { "" } else { "s" };
            format!("{sign}{n} {kind}{plural}")
        })
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Plant;

    #[test]
    fn summary_lists_nonzero_counts() {
        let mut plan = MutationPlan::default();
        plan.creates.plants.push(Plant::new("p1", "Tomato"));
        plan.creates.plants.push(Plant::new("p2", "Basil"));
        plan.updates.plants.push(Plant::new("p0", "Mint"));
        plan.deletes.locations.push("g0".into());

        assert_eq!(summarize(&plan), "-1 garden, ~1 plant, +2 plants");
    }

    #[test]
    fn empty_summary_is_empty() {
        assert_eq!(summarize(&MutationPlan::default()), "");
    }
}
