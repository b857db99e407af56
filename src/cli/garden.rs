//! Garden commands: add, list, use, show.

use clap::Subcommand;

use crate::model::{Conditions, GardenLocation, new_id};
use crate::storage::Storage;

use super::UnitArg;
use super::format::{format_conditions, short_id};
use super::resolve_id;

#[derive(Debug, Subcommand)]
pub enum GardenCommand {
    /// Add a garden location. Prints the garden ID.
    ///
    /// The first garden added becomes the active one.
    Add {
        /// Display name, e.g. "Back yard".
        name: String,

        /// Free-text place description.
        #[arg(long)]
        location: Option<String>,

        /// Unit the temperature text is written in.
        #[arg(long, value_enum)]
        unit: Option<UnitArg>,

        /// Temperature description, e.g. "Warm, 75F".
        #[arg(long)]
        temperature: Option<String>,

        /// Sunlight description, e.g. "Full sun, 6-8 hours".
        #[arg(long)]
        sunlight: Option<String>,

        /// Soil description, e.g. "Well-drained loam".
        #[arg(long)]
        soil: Option<String>,

        /// Current season, e.g. "Spring".
        #[arg(long)]
        season: Option<String>,
    },

    /// List gardens. The active one is marked with `*`.
    List,

    /// Make a garden the active one.
    Use {
        /// Garden ID or prefix.
        garden: String,
    },

    /// Show a garden's details. Defaults to the active garden.
    Show {
        /// Garden ID or prefix.
        garden: Option<String>,
    },
}

pub(super) fn run(storage: &Storage, command: GardenCommand) -> Result<(), String> {
    match command {
        GardenCommand::Add {
            name,
            location,
            unit,
            temperature,
            sunlight,
            soil,
            season,
        } => {
            let garden = GardenLocation {
                id: new_id(),
                name,
                location,
                temperature_unit: unit.map(UnitArg::to_domain),
                conditions: Conditions {
                    temperature,
                    sunlight,
                    soil,
                    current_season: season,
                },
            };
            cmd_add(storage, &garden)
        }
        GardenCommand::List => cmd_list(storage),
        GardenCommand::Use { garden } => cmd_use(storage, &garden),
        GardenCommand::Show { garden } => cmd_show(storage, garden.as_deref()),
    }
}

fn cmd_add(storage: &Storage, garden: &GardenLocation) -> Result<(), String> {
    storage
        .add_garden(garden)
        .map_err(|e| format!("failed to add garden: {e}"))?;

    let active = storage
        .active_garden()
        .map_err(|e| format!("failed to read active garden: {e}"))?;
    if active.is_none() {
        storage
            .set_active_garden(&garden.id)
            .map_err(|e| format!("failed to activate garden: {e}"))?;
        eprintln!("Active garden: {}", garden.name);
    }

    println!("{}", garden.id);
    Ok(())
}

fn cmd_list(storage: &Storage) -> Result<(), String> {
    let gardens = storage
        .list_gardens()
        .map_err(|e| format!("failed to list gardens: {e}"))?;

    if gardens.is_empty() {
        println!("No gardens");
        return Ok(());
    }

    let active = storage
        .active_garden()
        .map_err(|e| format!("failed to read active garden: {e}"))?
        .map(|g| g.id);

    for g in &gardens {
        let marker = if active.as_deref() == Some(g.id.as_str()) {
            "*"
        } else {
            " "
        };
        let unit = g
            .temperature_unit
            .map(|u| format!("  [°{u}]"))
            .unwrap_or_default();
        println!("{marker} {}  {}{unit}", short_id(&g.id), g.name);
    }

    Ok(())
}

fn cmd_use(storage: &Storage, reference: &str) -> Result<(), String> {
    let gardens = storage
        .list_gardens()
        .map_err(|e| format!("failed to list gardens: {e}"))?;
    let id = resolve_id("garden", gardens.iter().map(|g| g.id.as_str()), reference)?;

    storage
        .set_active_garden(&id)
        .map_err(|e| format!("failed to activate garden: {e}"))?;

    if let Some(g) = gardens.iter().find(|g| g.id == id) {
        eprintln!("Active garden: {}", g.name);
    }
    Ok(())
}

fn cmd_show(storage: &Storage, reference: Option<&str>) -> Result<(), String> {
    let garden = super::garden_or_active(storage, reference)?;

    println!("Garden: {}", garden.name);
    println!("ID: {}", garden.id);
    if let Some(location) = &garden.location {
        println!("Location: {location}");
    }
    if let Some(unit) = garden.temperature_unit {
        println!("Unit: °{unit}");
    }
    println!("Conditions: {}", format_conditions(&garden.conditions));

    let plantings = storage
        .list_plantings()
        .map_err(|e| format!("failed to list plantings: {e}"))?;
    let count = plantings.iter().filter(|p| p.garden_id == garden.id).count();
    println!("Plantings: {count}");

    Ok(())
}
