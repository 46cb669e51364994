//! Run configuration
//!
//! Persisted separately from the player profile as a JSON file.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::consts::{WORLD_HEIGHT, WORLD_WIDTH};
use crate::persistence::PersistError;

/// Runner settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Seed for stage layouts, AI and loot
    pub seed: u64,

    // === World ===
    pub world_width: f32,
    pub world_height: f32,
    /// Portal on this stage ends the run in victory
    pub max_stage: u32,

    // === Headless runner ===
    /// Ticks to simulate before the runner stops (60 per second)
    pub autoplay_ticks: u64,
    /// Player profile location
    pub save_path: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed: 0x5EED_CAFE,

            world_width: WORLD_WIDTH,
            world_height: WORLD_HEIGHT,
            max_stage: 10,

            autoplay_ticks: 3600,
            save_path: PathBuf::from("player_save.json"),
        }
    }
}

impl Settings {
    /// Load settings from a JSON file, falling back to defaults
    pub fn load(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(json) => match serde_json::from_str(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", path.display());
                    settings
                }
                Err(e) => {
                    log::warn!("Ignoring unreadable settings in {}: {e}", path.display());
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("Using default settings");
                Self::default()
            }
        }
    }

    /// Save settings as pretty JSON
    pub fn save(&self, path: &Path) -> Result<(), PersistError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }
}
