//! Simulation settings
//!
//! Loaded from a JSON file; every field falls back to its default.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::DEFAULT_SEED;
use crate::sim::{RosterSpec, WorldError, WorldParams};

/// Built-in roster sizes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum RosterPreset {
    Sparse,
    #[default]
    Classic,
    Dense,
}

impl RosterPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            RosterPreset::Sparse => "Sparse",
            RosterPreset::Classic => "Classic",
            RosterPreset::Dense => "Dense",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "sparse" | "small" => Some(RosterPreset::Sparse),
            "classic" | "default" => Some(RosterPreset::Classic),
            "dense" | "large" => Some(RosterPreset::Dense),
            _ => None,
        }
    }

    /// Starting roster for this preset
    pub fn roster(&self) -> RosterSpec {
        match self {
            RosterPreset::Sparse => RosterSpec::sparse(),
            RosterPreset::Classic => RosterSpec::classic(),
            RosterPreset::Dense => RosterSpec::dense(),
        }
    }
}

/// Errors from loading or validating settings
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed settings: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid roster: {0}")]
    InvalidRoster(&'static str),
    #[error(transparent)]
    World(#[from] WorldError),
}

/// Simulation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Roster RNG seed
    pub seed: u64,
    /// Roster used when `roster` is not given
    pub preset: RosterPreset,
    /// Explicit roster; overrides `preset`
    pub roster: Option<RosterSpec>,
    /// Steering and integration tunables
    pub world: WorldParams,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            preset: RosterPreset::Classic,
            roster: None,
            world: WorldParams::default(),
        }
    }
}

impl Settings {
    /// Create settings from a roster preset
    pub fn from_preset(preset: RosterPreset) -> Self {
        Self {
            preset,
            ..Self::default()
        }
    }

    /// Roster that will seed the world
    pub fn roster(&self) -> RosterSpec {
        self.roster.clone().unwrap_or_else(|| self.preset.roster())
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        self.world.validate()?;
        self.roster()
            .validate()
            .map_err(SettingsError::InvalidRoster)
    }

    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load and validate settings from a JSON file
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let json = fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Load from `path` if given, falling back to defaults on any error
    pub fn load_or_default(path: Option<&Path>) -> Self {
        match path.map(Self::load) {
            Some(Ok(settings)) => settings,
            Some(Err(e)) => {
                log::warn!("{e}; using default settings");
                Self::default()
            }
            None => {
                log::info!("Using default settings");
                Self::default()
            }
        }
    }

    /// Write settings as pretty JSON
    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }
}
