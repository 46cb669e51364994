//! Inventory overlay interaction
//!
//! The overlay owns its drag state. The simulation only ever sees the final
//! equip or unequip applied to the player.

use glam::Vec2;

use crate::sim::item::{ArmorSlot, Item};
use crate::sim::player::Player;

/// A slot in the inventory overlay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotRef {
    Inventory(usize),
    Armor(ArmorSlot),
}

impl SlotRef {
    fn item<'a>(&self, player: &'a Player) -> Option<&'a Item> {
        match *self {
            SlotRef::Inventory(i) => player.inventory[i].as_ref(),
            SlotRef::Armor(slot) => player.armor[slot.index()].as_ref(),
        }
    }
}

/// Result of releasing a drag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropOutcome {
    Equipped(ArmorSlot),
    Unequipped(usize),
    /// The item stays where it was picked up
    Cancelled,
}

/// An item being dragged across the overlay
#[derive(Debug, Clone, PartialEq)]
pub struct DragSession {
    origin: SlotRef,
    /// Icon drawn under the cursor
    pub icon: String,
    pub cursor: Vec2,
}

impl DragSession {
    /// Start dragging from a non-empty slot
    pub fn begin(player: &Player, origin: SlotRef, cursor: Vec2) -> Option<Self> {
        let item = origin.item(player)?;
        Some(Self {
            origin,
            icon: item.icon_key(),
            cursor,
        })
    }

    pub fn origin(&self) -> SlotRef {
        self.origin
    }

    pub fn move_to(&mut self, cursor: Vec2) {
        self.cursor = cursor;
    }

    /// Release over `target` (or over nothing)
    pub fn release(self, player: &mut Player, target: Option<SlotRef>) -> DropOutcome {
        let outcome = match (self.origin, target) {
            (SlotRef::Inventory(from), Some(SlotRef::Armor(slot))) => {
                let fits = player.inventory[from]
                    .as_ref()
                    .is_some_and(|item| item.armor_slot() == Some(slot));
                if fits && player.equip_armor(from) {
                    DropOutcome::Equipped(slot)
                } else {
                    DropOutcome::Cancelled
                }
            }
            (SlotRef::Armor(slot), Some(SlotRef::Inventory(to))) => {
                if player.unequip_armor_into(slot, to) {
                    DropOutcome::Unequipped(to)
                } else {
                    DropOutcome::Cancelled
                }
            }
            _ => DropOutcome::Cancelled,
        };
        log::debug!("drag from {:?} to {:?}: {:?}", self.origin, target, outcome);
        outcome
    }
}
