//! Planting commands: add, status, list.

use clap::Subcommand;
use jiff::Timestamp;

use crate::model::{Planting, new_id};
use crate::storage::Storage;

use super::StatusArg;
use super::format::{format_current_status, format_date, short_id};
use super::resolve_id;

#[derive(Debug, Subcommand)]
pub enum PlantingCommand {
    /// Put a plant in a garden. Prints the planting ID.
    Add {
        /// Plant ID or prefix.
        #[arg(long)]
        plant: String,

        /// Garden ID or prefix. Defaults to the active garden.
        #[arg(long)]
        garden: Option<String>,

        /// Starting status.
        #[arg(long, value_enum, default_value = "planning")]
        status: StatusArg,

        /// Seeds on hand.
        #[arg(long)]
        seeds: Option<u32>,

        /// How many to grow.
        #[arg(long)]
        qty: Option<u32>,
    },

    /// Record a status change.
    Status {
        /// Planting ID or prefix.
        planting: String,

        /// New status.
        #[arg(value_enum)]
        status: StatusArg,

        /// Freeform note for this change.
        #[arg(long)]
        notes: Option<String>,
    },

    /// List plantings in a garden, or every garden with `--all`.
    List {
        /// Garden ID or prefix. Defaults to the active garden.
        #[arg(long, conflicts_with = "all")]
        garden: Option<String>,

        /// List plantings across all gardens.
        #[arg(long)]
        all: bool,

        /// Show every history entry, not just the current status.
        #[arg(long)]
        history: bool,
    },
}

pub(super) fn run(storage: &Storage, command: PlantingCommand) -> Result<(), String> {
    match command {
        PlantingCommand::Add {
            plant,
            garden,
            status,
            seeds,
            qty,
        } => {
            let plant_id = super::resolve_plant(storage, &plant)?;
            let garden = super::garden_or_active(storage, garden.as_deref())?;
            let planting = Planting {
                seeds_on_hand: seeds,
                planned_qty: qty,
                ..Planting::new(
                    new_id(),
                    plant_id,
                    garden.id,
                    status.to_domain(),
                    Timestamp::now(),
                )
            };
            cmd_add(storage, &planting)
        }
        PlantingCommand::Status {
            planting,
            status,
            notes,
        } => cmd_status(storage, &planting, status, notes),
        PlantingCommand::List {
            garden,
            all,
            history,
        } => cmd_list(storage, garden.as_deref(), all, history),
    }
}

fn cmd_add(storage: &Storage, planting: &Planting) -> Result<(), String> {
    storage
        .add_planting(planting)
        .map_err(|e| format!("failed to add planting: {e}"))?;

    println!("{}", planting.id);
    Ok(())
}

fn cmd_status(
    storage: &Storage,
    reference: &str,
    status: StatusArg,
    notes: Option<String>,
) -> Result<(), String> {
    let plantings = storage
        .list_plantings()
        .map_err(|e| format!("failed to list plantings: {e}"))?;
    let id = resolve_id(
        "planting",
        plantings.iter().map(|p| p.id.as_str()),
        reference,
    )?;

    let planting = storage
        .record_status(&id, status.to_domain(), Timestamp::now(), notes)
        .map_err(|e| format!("failed to record status: {e}"))?;

    eprintln!(
        "Planting {}: {}",
        short_id(&planting.id),
        format_current_status(&planting)
    );
    Ok(())
}

fn cmd_list(
    storage: &Storage,
    garden: Option<&str>,
    all: bool,
    history: bool,
) -> Result<(), String> {
    let garden_id = if all {
        None
    } else {
        Some(super::garden_or_active(storage, garden)?.id)
    };

    let plantings: Vec<Planting> = storage
        .list_plantings()
        .map_err(|e| format!("failed to list plantings: {e}"))?
        .into_iter()
        .filter(|p| garden_id.as_ref().is_none_or(|id| &p.garden_id == id))
        .collect();

    if plantings.is_empty() {
        println!("No plantings");
        return Ok(());
    }

    let plants = storage
        .list_plants()
        .map_err(|e| format!("failed to list plants: {e}"))?;

    for p in &plantings {
        let species = plants
            .iter()
            .find(|plant| plant.id == p.plant_id)
            .map_or("(unknown plant)", |plant| plant.species.as_str());
        println!(
            "{}  {species}  [{}]",
            short_id(&p.id),
            format_current_status(p)
        );

        if history {
            for entry in &p.history {
                match &entry.notes {
                    Some(notes) => {
                        println!("    {}  {}  {notes}", format_date(entry.date), entry.status);
                    }
                    None => println!("    {}  {}", format_date(entry.date), entry.status),
                }
            }
        }
    }

    Ok(())
}
