//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (spawn order for mobs, y order for platforms)
//! - No rendering or platform dependencies

pub mod ai;
pub mod combat;
pub mod item;
pub mod physics;
pub mod player;
pub mod rect;
pub mod stage;
pub mod state;
pub mod tick;
pub mod trade;

pub use ai::{Awareness, Enemy, EnemyKind, has_line_of_sight};
pub use combat::{AttackProfile, MeleeHit, ThrownRapier, backstab_bonus, is_backstab};
pub use item::{ArmorFamily, ArmorSlot, Item, ItemKind, Rarity, WeaponKind};
pub use physics::Body;
pub use player::{Player, SetBonus};
pub use rect::Rect;
pub use stage::{Drop, Layout, Stage, generate_layout};
pub use state::{GameEvent, GamePhase, GameState};
pub use tick::{TickInput, tick};
pub use trade::{SmeltError, Smelted, sell, sell_value, smelt};
