//! Plant commands: add, list, show.

use clap::Subcommand;

use crate::config::Config;
use crate::model::{Plant, new_id};
use crate::season::suitable_seasons;
use crate::storage::Storage;
use crate::viability::assess;

use super::format::{format_assessment, format_seasons, short_id};

#[derive(Debug, Subcommand)]
pub enum PlantCommand {
    /// Add a plant record. Prints the plant ID.
    Add {
        /// Species, e.g. "Tomato (Solanum lycopersicum)".
        species: String,

        /// What the seeds need to germinate.
        #[arg(long, default_value = "")]
        germination: String,

        /// Conditions the plant thrives in.
        #[arg(long, default_value = "")]
        optimal: String,
    },

    /// List plants.
    List,

    /// Show a plant's requirements, seasons and fit with the active garden.
    Show {
        /// Plant ID or prefix.
        plant: String,
    },
}

pub(super) fn run(config: &Config, storage: &Storage, command: PlantCommand) -> Result<(), String> {
    match command {
        PlantCommand::Add {
            species,
            germination,
            optimal,
        } => {
            let plant = Plant {
                germination_needs: germination,
                optimal_conditions: optimal,
                ..Plant::new(new_id(), species)
            };
            cmd_add(storage, &plant)
        }
        PlantCommand::List => cmd_list(storage),
        PlantCommand::Show { plant } => cmd_show(config, storage, &plant),
    }
}

fn cmd_add(storage: &Storage, plant: &Plant) -> Result<(), String> {
    let existing = storage
        .list_plants()
        .map_err(|e| format!("failed to list plants: {e}"))?;
    if let Some(same) = existing
        .iter()
        .find(|p| p.species_key() == plant.species_key())
    {
        eprintln!(
            "Warning: '{}' is already recorded as {}; `sprout dedup` can merge them",
            plant.species,
            short_id(&same.id)
        );
    }

    storage
        .add_plant(plant)
        .map_err(|e| format!("failed to add plant: {e}"))?;

    println!("{}", plant.id);
    Ok(())
}

fn cmd_list(storage: &Storage) -> Result<(), String> {
    let plants = storage
        .list_plants()
        .map_err(|e| format!("failed to list plants: {e}"))?;

    if plants.is_empty() {
        println!("No plants");
        return Ok(());
    }

    for p in &plants {
        println!("{}  {}", short_id(&p.id), p.species);
    }

    Ok(())
}

fn cmd_show(config: &Config, storage: &Storage, reference: &str) -> Result<(), String> {
    let id = super::resolve_plant(storage, reference)?;
    let plant = storage
        .load_plant(&id)
        .map_err(|e| format!("failed to load plant: {e}"))?;

    println!("Plant: {}", plant.species);
    println!("ID: {}", plant.id);
    if !plant.germination_needs.trim().is_empty() {
        println!("Germination: {}", plant.germination_needs);
    }
    if !plant.optimal_conditions.trim().is_empty() {
        println!("Optimal: {}", plant.optimal_conditions);
    }
    println!("Seasons: {}", format_seasons(&suitable_seasons(&plant)));

    let active = storage
        .active_garden()
        .map_err(|e| format!("failed to read active garden: {e}"))?;
    if let Some(garden) = active {
        let unit = config.unit_for(garden.temperature_unit);
        let assessment = assess(&plant, &garden.conditions, unit);
        println!("In {}: {}", garden.name, format_assessment(&assessment));
    }

    Ok(())
}
