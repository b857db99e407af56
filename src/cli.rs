//! CLI interface for Sprout.
//!
//! Each subcommand is non-interactive: arguments in, plain text out.
//! Data goes to stdout; confirmations and warnings go to stderr.
//!
//! Record ids can be given in full or as an unambiguous prefix.

mod dedup;
mod format;
mod garden;
mod import;
mod plant;
mod planting;
mod score;

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::config::Config;
use crate::model::{GardenLocation, Status, TemperatureUnit};
use crate::reconcile::ImportMode;
use crate::storage::Storage;

use dedup::DedupArgs;
use garden::GardenCommand;
use import::{ExportArgs, ImportArgs};
use plant::PlantCommand;
use planting::PlantingCommand;
use score::ScoreArgs;

/// Sprout: tend your digital garden.
#[derive(Debug, Parser)]
#[command(name = "sprout", after_long_help = WORKFLOW_HELP)]
pub struct Cli {
    /// Garden database file. Overrides `SPROUT_DB` and the config file.
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

const WORKFLOW_HELP: &str = r#"Workflow: starting a garden
  1. sprout garden add "Back yard" --sunlight "Full sun" --soil "Well-drained loam" --temperature "75F"
     → prints the garden ID and makes it active if it is the first
  2. sprout plant add "Tomato (Solanum lycopersicum)" --optimal "Full sun, warm"
  3. sprout planting add --plant <id> --status planning
  4. sprout score

Importing a generated dataset:
  sprout import desert.json --mode add-to-existing --dry-run
  sprout import desert.json --mode add-to-existing"#;

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage garden locations.
    Garden {
        #[command(subcommand)]
        command: GardenCommand,
    },

    /// Manage plant records.
    Plant {
        #[command(subcommand)]
        command: PlantCommand,
    },

    /// Track plants growing in a garden.
    Planting {
        #[command(subcommand)]
        command: PlantingCommand,
    },

    /// Score how well plants suit a garden's conditions.
    ///
    /// Pure keyword heuristics: High, Medium or Low.
    Score(ScoreArgs),

    /// List the seasons a plant's requirements mention.
    Seasons {
        /// Plant ID or prefix.
        plant: String,
    },

    /// Find plants recorded more than once and optionally remove the extras.
    Dedup(DedupArgs),

    /// Import a dataset file (locations, plants and plantings).
    Import(ImportArgs),

    /// Export everything as a dataset file.
    Export(ExportArgs),
}

/// CLI-facing planting status, mapped to the domain `Status`.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum StatusArg {
    Wishlist,
    Planning,
    Planting,
    Growing,
    Harvest,
    Dormant,
}

impl StatusArg {
    fn to_domain(self) -> Status {
        match self {
            Self::Wishlist => Status::Wishlist,
            Self::Planning => Status::Planning,
            Self::Planting => Status::Planting,
            Self::Growing => Status::Growing,
            Self::Harvest => Status::Harvest,
            Self::Dormant => Status::Dormant,
        }
    }
}

/// CLI-facing temperature unit, mapped to the domain `TemperatureUnit`.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum UnitArg {
    C,
    F,
}

impl UnitArg {
    fn to_domain(self) -> TemperatureUnit {
        match self {
            Self::C => TemperatureUnit::Celsius,
            Self::F => TemperatureUnit::Fahrenheit,
        }
    }
}

/// CLI-facing import mode, mapped to the domain `ImportMode`.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ModeArg {
    /// Discard everything stored and adopt the dataset.
    Replace,
    /// Add the dataset's plantings to an existing garden, reusing known plants.
    AddToExisting,
    /// Add the dataset as new records alongside what is stored.
    CreateNew,
}

impl ModeArg {
    fn to_domain(self) -> ImportMode {
        match self {
            Self::Replace => ImportMode::Replace,
            Self::AddToExisting => ImportMode::AddToExisting,
            Self::CreateNew => ImportMode::CreateNew,
        }
    }
}

/// Run the CLI, returning an error message on failure.
pub fn run(config: &Config) -> Result<(), String> {
    let cli = Cli::parse();

    let path = config.database_path(cli.db.as_deref())?;
    let mut storage =
        Storage::open(&path).map_err(|e| format!("failed to open {}: {e}", path.display()))?;

    match cli.command {
        Command::Garden { command } => garden::run(&storage, command),
        Command::Plant { command } => plant::run(config, &storage, command),
        Command::Planting { command } => planting::run(&storage, command),
        Command::Score(args) => score::cmd_score(config, &storage, &args),
        Command::Seasons { plant } => score::cmd_seasons(&storage, &plant),
        Command::Dedup(args) => dedup::cmd_dedup(&mut storage, &args),
        Command::Import(args) => import::cmd_import(&mut storage, &args),
        Command::Export(args) => import::cmd_export(&storage, &args),
    }
}

/// Resolve a reference (full id or unambiguous prefix) against known ids.
fn resolve_id<'a>(
    kind: &str,
    ids: impl IntoIterator<Item = &'a str>,
    reference: &str,
) -> Result<String, String> {
    let ids: Vec<&str> = ids.into_iter().collect();

    // Exact match first: short ids can be prefixes of longer ones.
    if ids.contains(&reference) {
        return Ok(reference.to_string());
    }

    let matches: Vec<&str> = ids
        .into_iter()
        .filter(|id| id.starts_with(reference))
        .collect();

    match matches.as_slice() {
        [] => Err(format!("no {kind} matching '{reference}'")),
        [only] => Ok((*only).to_string()),
        many => {
            let shown: Vec<&str> = many.iter().map(|id| format::short_id(id)).collect();
            Err(format!(
                "'{reference}' is ambiguous, matches {} {kind}s: {}",
                many.len(),
                shown.join(", ")
            ))
        }
    }
}

/// Resolve a garden reference, or fall back to the active garden.
fn garden_or_active(storage: &Storage, reference: Option<&str>) -> Result<GardenLocation, String> {
    let gardens = storage
        .list_gardens()
        .map_err(|e| format!("failed to list gardens: {e}"))?;

    if let Some(reference) = reference {
        let id = resolve_id("garden", gardens.iter().map(|g| g.id.as_str()), reference)?;
        return gardens
            .into_iter()
            .find(|g| g.id == id)
            .ok_or_else(|| format!("garden not found: {id}"));
    }

    storage
        .active_garden()
        .map_err(|e| format!("failed to read active garden: {e}"))?
        .ok_or_else(|| "no active garden: pass --garden <id> or run `sprout garden use <id>`".into())
}

/// Resolve a plant reference to a full id.
fn resolve_plant(storage: &Storage, reference: &str) -> Result<String, String> {
    let plants = storage
        .list_plants()
        .map_err(|e| format!("failed to list plants: {e}"))?;
    resolve_id("plant", plants.iter().map(|p| p.id.as_str()), reference)
}
