//! Weapons, armor and rarity tiers
//!
//! An item's combat stats are a pure function of its type and rarity, so a
//! saved `{name, type, rarity}` triple always reloads to the same stats.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Rarity tiers, ordered from worst to best
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Rarity {
    #[default]
    Common,
    Uncommon,
    Rare,
    Holy,
    Godlike,
}

impl Rarity {
    pub const ALL: [Rarity; 5] = [
        Rarity::Common,
        Rarity::Uncommon,
        Rarity::Rare,
        Rarity::Holy,
        Rarity::Godlike,
    ];

    /// Drop weights used for random loot (sum 100)
    pub const DROP_WEIGHTS: [u32; 5] = [50, 30, 15, 4, 1];

    /// Zero-based tier index
    pub fn tier(self) -> usize {
        self as usize
    }

    /// The next tier up, or `None` at godlike
    pub fn next(self) -> Option<Rarity> {
        Rarity::ALL.get(self.tier() + 1).copied()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Rarity::Common => "common",
            Rarity::Uncommon => "uncommon",
            Rarity::Rare => "rare",
            Rarity::Holy => "holy",
            Rarity::Godlike => "godlike",
        }
    }

    /// Roll a rarity using the loot weights
    pub fn roll(rng: &mut impl Rng) -> Rarity {
        let total: u32 = Self::DROP_WEIGHTS.iter().sum();
        let mut roll = rng.random_range(0..total);
        for (rarity, weight) in Self::ALL.iter().zip(Self::DROP_WEIGHTS) {
            if roll < weight {
                return *rarity;
            }
            roll -= weight;
        }
        Rarity::Common
    }
}

/// Melee weapon families
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WeaponKind {
    Dagger,
    Sword,
    Rapier,
}

impl WeaponKind {
    pub const ALL: [WeaponKind; 3] = [WeaponKind::Dagger, WeaponKind::Sword, WeaponKind::Rapier];

    /// Damage at common rarity
    pub fn base_damage(self) -> i32 {
        match self {
            WeaponKind::Dagger => 12,
            WeaponKind::Sword => 10,
            WeaponKind::Rapier => 14,
        }
    }

    /// Milliseconds between swings at common rarity
    pub fn base_attack_interval_ms(self) -> u64 {
        match self {
            WeaponKind::Dagger => 200,
            WeaponKind::Sword => 400,
            WeaponKind::Rapier => 500,
        }
    }

    /// Reach before the fixed extra radius is added
    pub fn range(self) -> f32 {
        use crate::consts::*;
        match self {
            WeaponKind::Dagger => DAGGER_RANGE,
            WeaponKind::Sword => SWORD_RANGE,
            WeaponKind::Rapier => RAPIER_RANGE,
        }
    }
}

/// The four armor slots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArmorSlot {
    Helmet,
    Chest,
    Legs,
    Boots,
}

impl ArmorSlot {
    pub const ALL: [ArmorSlot; 4] = [
        ArmorSlot::Helmet,
        ArmorSlot::Chest,
        ArmorSlot::Legs,
        ArmorSlot::Boots,
    ];

    /// Index into a `[Option<Item>; 4]` armor array
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ArmorSlot::Helmet => "helmet",
            ArmorSlot::Chest => "chest",
            ArmorSlot::Legs => "legs",
            ArmorSlot::Boots => "boots",
        }
    }
}

/// Named armor families; wearing all four pieces of one may grant a set bonus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArmorFamily {
    Ninja,
    Knight,
    Mage,
}

impl ArmorFamily {
    pub const ALL: [ArmorFamily; 3] = [ArmorFamily::Ninja, ArmorFamily::Knight, ArmorFamily::Mage];

    pub fn as_str(&self) -> &'static str {
        match self {
            ArmorFamily::Ninja => "ninja",
            ArmorFamily::Knight => "knight",
            ArmorFamily::Mage => "mage",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "ninja" => Some(ArmorFamily::Ninja),
            "knight" => Some(ArmorFamily::Knight),
            "mage" => Some(ArmorFamily::Mage),
            _ => None,
        }
    }
}

/// Item type: one of three weapons or four armor slots
///
/// Serialized as the bare lowercase name (`"dagger"`, `"boots"`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "&'static str")]
pub enum ItemKind {
    Weapon(WeaponKind),
    Armor(ArmorSlot),
}

impl ItemKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemKind::Weapon(WeaponKind::Dagger) => "dagger",
            ItemKind::Weapon(WeaponKind::Sword) => "sword",
            ItemKind::Weapon(WeaponKind::Rapier) => "rapier",
            ItemKind::Armor(slot) => slot.as_str(),
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "dagger" => Some(ItemKind::Weapon(WeaponKind::Dagger)),
            "sword" => Some(ItemKind::Weapon(WeaponKind::Sword)),
            "rapier" => Some(ItemKind::Weapon(WeaponKind::Rapier)),
            "helmet" => Some(ItemKind::Armor(ArmorSlot::Helmet)),
            "chest" => Some(ItemKind::Armor(ArmorSlot::Chest)),
            "legs" => Some(ItemKind::Armor(ArmorSlot::Legs)),
            "boots" => Some(ItemKind::Armor(ArmorSlot::Boots)),
            _ => None,
        }
    }
}

impl TryFrom<String> for ItemKind {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        ItemKind::from_str(&value).ok_or_else(|| format!("unknown item type: {value}"))
    }
}

impl From<ItemKind> for &'static str {
    fn from(kind: ItemKind) -> Self {
        kind.as_str()
    }
}

/// Damage multiplier applied per rarity tier
pub const UPGRADE_DAMAGE_FACTOR: f64 = 1.5;
/// Attack interval multiplier applied per rarity tier
pub const UPGRADE_INTERVAL_FACTOR: f64 = 0.9;

/// Apply `factor` once per tier, rounding down after every step
fn scale_per_tier(base: u64, tiers: usize, factor: f64) -> u64 {
    (0..tiers).fold(base, |value, _| (value as f64 * factor).floor() as u64)
}

/// A weapon or armor piece
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ItemKind,
    pub rarity: Rarity,
}

impl Item {
    pub fn new(name: impl Into<String>, kind: ItemKind, rarity: Rarity) -> Self {
        Self {
            name: name.into(),
            kind,
            rarity,
        }
    }

    /// A weapon named after its type
    pub fn weapon(kind: WeaponKind, rarity: Rarity) -> Self {
        let kind = ItemKind::Weapon(kind);
        Self::new(kind.as_str(), kind, rarity)
    }

    /// An armor piece named "<family> <slot>"
    pub fn armor(family: ArmorFamily, slot: ArmorSlot, rarity: Rarity) -> Self {
        Self::new(
            format!("{} {}", family.as_str(), slot.as_str()),
            ItemKind::Armor(slot),
            rarity,
        )
    }

    pub fn weapon_kind(&self) -> Option<WeaponKind> {
        match self.kind {
            ItemKind::Weapon(w) => Some(w),
            ItemKind::Armor(_) => None,
        }
    }

    pub fn armor_slot(&self) -> Option<ArmorSlot> {
        match self.kind {
            ItemKind::Armor(slot) => Some(slot),
            ItemKind::Weapon(_) => None,
        }
    }

    /// Armor family parsed from the first word of the name
    pub fn family(&self) -> Option<ArmorFamily> {
        self.armor_slot()?;
        self.name.split_whitespace().next().and_then(ArmorFamily::from_str)
    }

    /// Damage per hit (0 for armor)
    pub fn damage(&self) -> i32 {
        match self.weapon_kind() {
            Some(w) => scale_per_tier(
                w.base_damage() as u64,
                self.rarity.tier(),
                UPGRADE_DAMAGE_FACTOR,
            ) as i32,
            None => 0,
        }
    }

    /// Milliseconds between attacks (0 for armor)
    pub fn attack_interval_ms(&self) -> u64 {
        match self.weapon_kind() {
            Some(w) => scale_per_tier(
                w.base_attack_interval_ms(),
                self.rarity.tier(),
                UPGRADE_INTERVAL_FACTOR,
            ),
            None => 0,
        }
    }

    /// Raise rarity by one tier. Returns false (no-op) at godlike.
    pub fn upgrade(&mut self) -> bool {
        match self.rarity.next() {
            Some(next) => {
                self.rarity = next;
                true
            }
            None => false,
        }
    }

    /// Asset-cache key for icon lookup: `"<type>:<rarity>"` or `"<family>-<slot>:<rarity>"`
    pub fn icon_key(&self) -> String {
        match self.family() {
            Some(family) => format!(
                "{}-{}:{}",
                family.as_str(),
                self.kind.as_str(),
                self.rarity.as_str()
            ),
            None => format!("{}:{}", self.kind.as_str(), self.rarity.as_str()),
        }
    }
}

/// Random weapon of a random type, at `rarity` or a weighted roll
pub fn random_weapon(rng: &mut impl Rng, rarity: Option<Rarity>) -> Item {
    let rarity = rarity.unwrap_or_else(|| Rarity::roll(rng));
    let kind = WeaponKind::ALL[rng.random_range(0..WeaponKind::ALL.len())];
    Item::weapon(kind, rarity)
}

/// Random-family armor piece for `slot`, at `rarity` or a weighted roll
pub fn random_armor(rng: &mut impl Rng, slot: ArmorSlot, rarity: Option<Rarity>) -> Item {
    let rarity = rarity.unwrap_or_else(|| Rarity::roll(rng));
    let family = ArmorFamily::ALL[rng.random_range(0..ArmorFamily::ALL.len())];
    Item::armor(family, slot, rarity)
}
