//! Smeltery and tavern rules
//!
//! Both screens are external UI; these are the transactions they commit
//! against the player's inventory, xp and coins.

use rand::Rng;
use thiserror::Error;

use super::item::{ArmorSlot, Item, ItemKind, Rarity, WeaponKind};
use super::player::Player;

/// Why a smelt was refused. Nothing is consumed on error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SmeltError {
    #[error("inventory slot {0} is empty")]
    EmptySlot(usize),
    #[error("cannot smelt an item with itself")]
    SameSlot,
    #[error("items must share type and rarity")]
    Mismatch,
    #[error("Need {xp} XP, {coins} coins!")]
    Insufficient { xp: u32, coins: u32 },
}

/// Result of a successful smelt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Smelted {
    /// Inventory slot now holding the output
    pub slot: usize,
    pub upgraded: bool,
}

/// (xp, coins) charged to smelt two items of this rarity
pub fn smelt_cost(rarity: Rarity) -> (u32, u32) {
    match rarity {
        Rarity::Common | Rarity::Uncommon => (5, 10),
        Rarity::Rare => (10, 20),
        Rarity::Holy => (15, 40),
        Rarity::Godlike => (30, 100),
    }
}

/// Chance that smelting two items of this rarity yields the next tier
pub fn upgrade_chance(rarity: Rarity) -> f64 {
    match rarity {
        Rarity::Common => 0.5,
        Rarity::Uncommon => 0.3,
        Rarity::Rare => 0.15,
        Rarity::Holy => 0.05,
        Rarity::Godlike => 0.0,
    }
}

/// Combine the items in inventory slots `a` and `b` into one
///
/// Both inputs are consumed and the output lands in slot `a`. Godlike
/// inputs always yield a godlike copy. Panics on an out-of-range slot.
pub fn smelt(
    player: &mut Player,
    a: usize,
    b: usize,
    rng: &mut impl Rng,
) -> Result<Smelted, SmeltError> {
    if a == b {
        return Err(SmeltError::SameSlot);
    }
    let first = player.inventory[a].as_ref().ok_or(SmeltError::EmptySlot(a))?;
    let second = player.inventory[b].as_ref().ok_or(SmeltError::EmptySlot(b))?;
    if first.kind != second.kind || first.rarity != second.rarity {
        return Err(SmeltError::Mismatch);
    }

    let rarity = first.rarity;
    let (xp, coins) = smelt_cost(rarity);
    if player.xp < xp || player.coins < coins {
        return Err(SmeltError::Insufficient { xp, coins });
    }

    let mut output = Item::new(first.name.clone(), first.kind, rarity);
    player.xp -= xp;
    player.coins -= coins;

    let chance = upgrade_chance(rarity);
    let upgraded = chance > 0.0 && rng.random_bool(chance) && output.upgrade();

    player.inventory[b] = None;
    player.inventory[a] = Some(output);
    Ok(Smelted { slot: a, upgraded })
}

/// Coins the tavern pays for an item
pub fn sell_value(item: &Item) -> u32 {
    let base: u32 = match item.kind {
        ItemKind::Weapon(WeaponKind::Dagger) => 15,
        ItemKind::Weapon(WeaponKind::Sword) => 30,
        ItemKind::Weapon(WeaponKind::Rapier) => 45,
        ItemKind::Armor(ArmorSlot::Helmet) => 15,
        ItemKind::Armor(ArmorSlot::Chest) => 35,
        ItemKind::Armor(ArmorSlot::Legs) => 30,
        ItemKind::Armor(ArmorSlot::Boots) => 20,
    };
    let bonus = match item.rarity {
        Rarity::Common => 0.0,
        Rarity::Uncommon => 0.15,
        Rarity::Rare => 0.20,
        Rarity::Holy => 0.25,
        Rarity::Godlike => 0.30,
    };
    (base as f64 * (1.0 + bonus)).floor() as u32
}

/// Sell the item in inventory slot `index`. Returns the coins paid, or
/// `None` for an empty slot.
pub fn sell(player: &mut Player, index: usize) -> Option<u32> {
    let item = player.inventory[index].take()?;
    let coins = sell_value(&item);
    player.coins += coins;
    log::info!("sold {} for {} coins", item.name, coins);
    Some(coins)
}
