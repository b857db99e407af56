//! Viability and season commands.

use clap::Args;

use crate::config::Config;
use crate::model::Plant;
use crate::season::{in_season, suitable_seasons};
use crate::storage::Storage;
use crate::viability::{Assessment, assess};

use super::format::{format_assessment, format_conditions, format_seasons, short_id};

#[derive(Debug, Args)]
pub struct ScoreArgs {
    /// Plant ID or prefix. Scores every plant when omitted.
    #[arg(long)]
    plant: Option<String>,

    /// Garden ID or prefix. Defaults to the active garden.
    #[arg(long)]
    garden: Option<String>,
}

pub(super) fn cmd_score(config: &Config, storage: &Storage, args: &ScoreArgs) -> Result<(), String> {
    let garden = super::garden_or_active(storage, args.garden.as_deref())?;
    let unit = config.unit_for(garden.temperature_unit);

    let plants = match &args.plant {
        Some(reference) => {
            let id = super::resolve_plant(storage, reference)?;
            vec![
                storage
                    .load_plant(&id)
                    .map_err(|e| format!("failed to load plant: {e}"))?,
            ]
        }
        None => storage
            .list_plants()
            .map_err(|e| format!("failed to list plants: {e}"))?,
    };

    if plants.is_empty() {
        println!("No plants");
        return Ok(());
    }

    println!("Garden: {} ({})", garden.name, format_conditions(&garden.conditions));

    let mut scored: Vec<(&Plant, Assessment)> = plants
        .iter()
        .map(|p| (p, assess(p, &garden.conditions, unit)))
        .collect();
    // Best fit first; ties keep the stored order.
    scored.sort_by(|a, b| b.1.viability.cmp(&a.1.viability));

    for (plant, assessment) in &scored {
        let season = match in_season(plant, &garden.conditions) {
            Some(true) => "  in season",
            Some(false) => "  out of season",
            None => "",
        };
        println!(
            "{}  {}  {}{season}",
            short_id(&plant.id),
            plant.species,
            format_assessment(assessment)
        );
    }

    Ok(())
}

pub(super) fn cmd_seasons(storage: &Storage, reference: &str) -> Result<(), String> {
    let id = super::resolve_plant(storage, reference)?;
    let plant = storage
        .load_plant(&id)
        .map_err(|e| format!("failed to load plant: {e}"))?;

    println!("{}", format_seasons(&suitable_seasons(&plant)));
    Ok(())
}
