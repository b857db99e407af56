//! Sprout configuration.
//!
//! Loaded from `~/.sprout/config.toml`. A missing file means defaults.
//!
//! The database path is resolved through a chain:
//!
//! 1. `--db <path>`: explicit per-command override
//! 2. `SPROUT_DB` env var
//! 3. `database` in the config file
//! 4. `~/.sprout/garden.sqlite`

use std::path::{Path, PathBuf};
use std::{env, fs, io};

use serde::Deserialize;

use crate::model::TemperatureUnit;
use crate::storage::Storage;

/// Sprout configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct Config {
    /// Where the garden database lives.
    pub database: Option<PathBuf>,

    /// Unit assumed for gardens that don't record one.
    pub temperature_unit: Option<TemperatureUnit>,
}

impl Config {
    /// Load config from `~/.sprout/config.toml`, or defaults if absent.
    pub fn load() -> Result<Self, String> {
        match Self::path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load config from a specific file, or defaults if it doesn't exist.
    pub fn load_from(path: &Path) -> Result<Self, String> {
        let contents = match fs::read_to_string(path) {
            Ok(s) => s,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(format!("failed to read {}: {e}", path.display())),
        };

        toml::from_str(&contents).map_err(|e| format!("invalid config at {}: {e}", path.display()))
    }

    /// The config file path: `~/.sprout/config.toml`.
    pub fn path() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".sprout").join("config.toml"))
    }

    /// Resolve the database path from the chain described in the module docs.
    pub fn database_path(&self, explicit: Option<&Path>) -> Result<PathBuf, String> {
        let from_env = env::var_os("SPROUT_DB")
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);
        self.resolve_database(explicit, from_env)
    }

    fn resolve_database(
        &self,
        explicit: Option<&Path>,
        from_env: Option<PathBuf>,
    ) -> Result<PathBuf, String> {
        explicit
            .map(Path::to_path_buf)
            .or(from_env)
            .or_else(|| self.database.clone())
            .or_else(Storage::default_path)
            .ok_or_else(|| "could not determine home directory; pass --db <path>".to_string())
    }

    /// The unit to read a garden's temperatures in.
    pub fn unit_for(&self, garden: Option<TemperatureUnit>) -> TemperatureUnit {
        garden.or(self.temperature_unit).unwrap_or_default()
    }
}
