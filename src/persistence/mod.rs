//! Player profile save/load
//!
//! Features:
//! - JSON record of xp, coins, inventory and worn armor
//! - Atomic writes (tmp → save rename)
//! - Lenient loading: a damaged inventory or armor section falls back to
//!   empty instead of failing the whole profile

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::consts::INVENTORY_SLOTS;
use crate::sim::item::{ArmorSlot, Item};
use crate::sim::player::Player;

/// Errors surfaced by profile persistence
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("corrupted data: {0}")]
    Corrupt(String),
}

pub type Result<T> = std::result::Result<T, PersistError>;

/// Worn armor keyed by slot name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArmorRecord {
    #[serde(default)]
    pub helmet: Option<Item>,
    #[serde(default)]
    pub chest: Option<Item>,
    #[serde(default)]
    pub legs: Option<Item>,
    #[serde(default)]
    pub boots: Option<Item>,
}

impl ArmorRecord {
    pub fn from_slots(slots: &[Option<Item>; 4]) -> Self {
        let [helmet, chest, legs, boots] = slots.clone();
        Self {
            helmet,
            chest,
            legs,
            boots,
        }
    }

    pub fn into_slots(self) -> [Option<Item>; 4] {
        [self.helmet, self.chest, self.legs, self.boots]
    }

    /// Every piece sits in the slot matching its type
    pub fn is_consistent(&self) -> bool {
        let slots = [&self.helmet, &self.chest, &self.legs, &self.boots];
        ArmorSlot::ALL
            .iter()
            .zip(slots)
            .all(|(slot, item)| item.as_ref().is_none_or(|i| i.armor_slot() == Some(*slot)))
    }
}

/// Persisted player profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveData {
    pub xp: u32,
    pub coins: u32,
    pub inventory: Vec<Option<Item>>,
    pub armor: ArmorRecord,
    /// Equipped weapon; absent in older saves
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weapon: Option<Item>,
}

impl Default for SaveData {
    fn default() -> Self {
        Self {
            xp: 0,
            coins: 0,
            inventory: vec![None; INVENTORY_SLOTS],
            armor: ArmorRecord::default(),
            weapon: None,
        }
    }
}

impl SaveData {
    pub fn from_player(player: &Player) -> Self {
        Self {
            xp: player.xp,
            coins: player.coins,
            inventory: player.inventory.to_vec(),
            armor: ArmorRecord::from_slots(&player.armor),
            weapon: player.weapon.clone(),
        }
    }

    /// Copy the profile onto a player and recompute the set bonus
    pub fn apply_to(self, player: &mut Player) {
        player.xp = self.xp;
        player.coins = self.coins;
        player.inventory = Default::default();
        for (slot, item) in player.inventory.iter_mut().zip(self.inventory) {
            *slot = item;
        }
        player.armor = self.armor.into_slots();
        player.weapon = self.weapon;
        player.selected = 0;
        player.recompute_bonus();
    }

    /// Parse a profile, keeping whatever sections are readable
    pub fn from_json(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json)?;
        let Value::Object(map) = value else {
            return Err(PersistError::Corrupt("profile is not a JSON object".into()));
        };

        let count = |key: &str| {
            map.get(key)
                .and_then(Value::as_u64)
                .map_or(0, |n| n.min(u32::MAX as u64) as u32)
        };

        let mut inventory = section::<Vec<Option<Item>>>(&map, "inventory").unwrap_or_default();
        if inventory.len() > INVENTORY_SLOTS {
            log::warn!(
                "profile has {} inventory slots, keeping the first {}",
                inventory.len(),
                INVENTORY_SLOTS
            );
        }
        inventory.resize(INVENTORY_SLOTS, None);

        let armor = section::<ArmorRecord>(&map, "armor")
            .filter(|armor| {
                let ok = armor.is_consistent();
                if !ok {
                    log::warn!("discarding armor worn in the wrong slots");
                }
                ok
            })
            .unwrap_or_default();

        let weapon = section::<Option<Item>>(&map, "weapon")
            .flatten()
            .filter(|item| item.weapon_kind().is_some());

        Ok(Self {
            xp: count("xp"),
            coins: count("coins"),
            inventory,
            armor,
            weapon,
        })
    }
}

/// Deserialize one top-level section, logging and dropping it when unreadable
fn section<T: serde::de::DeserializeOwned>(
    map: &serde_json::Map<String, Value>,
    key: &str,
) -> Option<T> {
    let value = map.get(key)?;
    match serde_json::from_value(value.clone()) {
        Ok(parsed) => Some(parsed),
        Err(e) => {
            log::warn!("discarding unreadable {key} in profile: {e}");
            None
        }
    }
}

/// Load a profile from disk
pub fn load_profile(path: &Path) -> Result<SaveData> {
    let json = fs::read_to_string(path)?;
    let data = SaveData::from_json(&json)?;
    log::info!("Loaded profile from {}", path.display());
    Ok(data)
}

/// Load a profile, falling back to an empty one on any failure
pub fn load_or_default(path: &Path) -> SaveData {
    match load_profile(path) {
        Ok(data) => data,
        Err(PersistError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
            log::info!("No profile at {}, starting fresh", path.display());
            SaveData::default()
        }
        Err(e) => {
            log::warn!("Failed to load profile from {}: {e}", path.display());
            SaveData::default()
        }
    }
}

/// Write a profile atomically
pub fn save_profile(path: &Path, data: &SaveData) -> Result<()> {
    let json = serde_json::to_string(data)?;
    let temp_path = path.with_extension("json.tmp");
    fs::write(&temp_path, json)?;
    fs::rename(&temp_path, path)?;
    log::info!("Profile saved to {}", path.display());
    Ok(())
}
