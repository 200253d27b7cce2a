//! Game settings and preferences
//!
//! Persisted separately from high scores in the per-user data directory.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::persistence::{self, PersistenceError};
use crate::tuning::{DifficultyScaling, Tuning};

/// Difficulty preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum DifficultyPreset {
    /// Constant speed, like the classic arcade cabinet
    #[default]
    Steady,
    /// Car speeds up as the score climbs
    Ramping,
}

impl DifficultyPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            DifficultyPreset::Steady => "Steady",
            DifficultyPreset::Ramping => "Ramping",
        }
    }

    /// Speed ramp for this preset
    pub fn scaling(&self) -> Option<DifficultyScaling> {
        match self {
            DifficultyPreset::Steady => None,
            DifficultyPreset::Ramping => Some(DifficultyScaling::default()),
        }
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
#[error("unknown difficulty preset '{0}' (expected steady or ramping)")]
pub struct UnknownPreset(pub String);

impl FromStr for DifficultyPreset {
    type Err = UnknownPreset;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "steady" | "classic" => Ok(DifficultyPreset::Steady),
            "ramping" | "ramp" => Ok(DifficultyPreset::Ramping),
            _ => Err(UnknownPreset(s.to_string())),
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub difficulty: DifficultyPreset,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    pub muted: bool,

    // === HUD ===
    /// Show the session high score next to the score
    pub show_high_score: bool,

    // === Accessibility ===
    /// Print the car and garage color names on top of the colors
    pub high_contrast: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            difficulty: DifficultyPreset::Steady,

            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,

            show_high_score: true,

            high_contrast: false,
        }
    }
}

impl Settings {
    const FILE_NAME: &'static str = "settings.json";

    /// Create settings from a difficulty preset
    pub fn from_preset(preset: DifficultyPreset) -> Self {
        Self {
            difficulty: preset,
            ..Self::default()
        }
    }

    /// Copy with a one-off preset override; `self` stays as saved
    pub fn for_run(&self, preset: Option<DifficultyPreset>) -> Self {
        Self {
            difficulty: preset.unwrap_or(self.difficulty),
            ..self.clone()
        }
    }

    /// Apply the difficulty preset to a tuning. Ramping keeps an explicit
    /// ramp from the tuning file if there is one.
    pub fn apply_to(&self, tuning: &mut Tuning) {
        match self.difficulty {
            DifficultyPreset::Steady => tuning.difficulty = None,
            DifficultyPreset::Ramping => {
                if tuning.difficulty.is_none() {
                    tuning.difficulty = self.difficulty.scaling();
                }
            }
        }
    }

    /// Default save location
    pub fn default_path() -> Result<PathBuf, PersistenceError> {
        Ok(persistence::data_dir()?.join(Self::FILE_NAME))
    }

    /// Load settings, falling back to defaults
    pub fn load(path: &Path) -> Self {
        match persistence::load::<Settings>(path) {
            Ok(Some(settings)) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Ok(None) => {
                log::info!("Using default settings");
                Self::default()
            }
            Err(err) => {
                log::warn!("Could not load settings ({}), using defaults", err);
                Self::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), PersistenceError> {
        persistence::save(path, self)?;
        log::info!("Settings saved");
        Ok(())
    }
}
