//! Player controller: movement, attacks, inventory and armor
//!
//! The controller never reads devices. The tick loop hands it the intent
//! for this frame (move axis, edge-triggered jump, aim point) and it calls
//! into physics and combat.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::ai::Enemy;
use super::combat::{AttackProfile, MeleeHit, ThrownRapier, resolve_melee};
use super::item::{ArmorFamily, ArmorSlot, Item, WeaponKind};
use super::physics::Body;
use super::rect::Rect;
use super::stage::Drop;
use crate::consts::*;

/// Stat bundle granted by a full four-piece armor set
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SetBonus {
    pub speed_mult: f32,
    pub jump_mult: f32,
    /// Extra flat damage on dagger backstabs
    pub dagger_bonus: i32,
}

impl Default for SetBonus {
    fn default() -> Self {
        Self {
            speed_mult: 1.0,
            jump_mult: 1.0,
            dagger_bonus: 0,
        }
    }
}

impl SetBonus {
    /// Recompute from scratch for the given armor contents
    pub fn from_armor(armor: &[Option<Item>; 4]) -> Self {
        let mut counts = [0usize; ArmorFamily::ALL.len()];
        for item in armor.iter().flatten() {
            if let Some(family) = item.family() {
                counts[family as usize] += 1;
            }
        }

        if counts[ArmorFamily::Ninja as usize] == ArmorSlot::ALL.len() {
            Self {
                speed_mult: 1.4,
                jump_mult: 1.3,
                dagger_bonus: 5,
            }
        } else {
            Self::default()
        }
    }
}

/// The player-controlled entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub body: Body,
    pub xp: u32,
    pub coins: u32,
    pub inventory: [Option<Item>; INVENTORY_SLOTS],
    /// Indexed by `ArmorSlot::index()`
    pub armor: [Option<Item>; 4],
    pub weapon: Option<Item>,
    pub shield: Option<Item>,
    /// Highlighted inventory slot
    pub selected: usize,
    pub bonus: SetBonus,
    pub last_attack_ms: Option<u64>,
    pub last_block_ms: Option<u64>,
    pub last_hurt_ms: Option<u64>,
    /// At most one rapier in flight
    pub throwing: Option<ThrownRapier>,
    /// Contact damage is ignored while `now < invincible_until_ms`
    pub invincible_until_ms: u64,
    pub can_double_jump: bool,
}

impl Player {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            body: Body::new(x, y, PLAYER_WIDTH, PLAYER_HEIGHT, PLAYER_MAX_HP),
            xp: 0,
            coins: 0,
            inventory: Default::default(),
            armor: Default::default(),
            weapon: None,
            shield: None,
            selected: 0,
            bonus: SetBonus::default(),
            last_attack_ms: None,
            last_block_ms: None,
            last_hurt_ms: None,
            throwing: None,
            invincible_until_ms: 0,
            can_double_jump: true,
        }
    }

    /// Where the player appears at the start of every stage
    pub fn spawn_point(world_height: f32) -> Vec2 {
        Vec2::new(100.0, world_height - 200.0)
    }

    /// Put the player at `pos` with full health and a fresh invincibility window
    pub fn respawn(&mut self, pos: Vec2, now_ms: u64, invincibility_ms: u64) {
        self.body.rect.x = pos.x;
        self.body.rect.y = pos.y;
        self.body.vel = Vec2::ZERO;
        self.body.on_ground = false;
        self.body.heal_full();
        self.throwing = None;
        self.can_double_jump = true;
        self.invincible_until_ms = now_ms + invincibility_ms;
    }

    pub fn is_invincible(&self, now_ms: u64) -> bool {
        now_ms < self.invincible_until_ms
    }

    pub fn weapon_kind(&self) -> Option<WeaponKind> {
        self.weapon.as_ref().and_then(Item::weapon_kind)
    }

    pub fn attack_profile(&self) -> AttackProfile {
        AttackProfile::for_weapon(self.weapon.as_ref())
    }

    /// Swing at everything in reach. Returns `None` while on cooldown.
    pub fn attack(&mut self, aim: Vec2, enemies: &mut [Enemy], now_ms: u64) -> Option<Vec<MeleeHit>> {
        let profile = self.attack_profile();
        let cooling = self
            .last_attack_ms
            .is_some_and(|last| now_ms.saturating_sub(last) < profile.cooldown_ms);
        if cooling {
            return None;
        }
        self.last_attack_ms = Some(now_ms);
        Some(resolve_melee(
            self.body.center(),
            aim,
            &profile,
            self.bonus.dagger_bonus,
            enemies,
            now_ms,
        ))
    }

    /// Raise the sword. Returns true when the block was available.
    pub fn block(&mut self, now_ms: u64) -> bool {
        if self.weapon_kind() != Some(WeaponKind::Sword) {
            return false;
        }
        let cooling = self
            .last_block_ms
            .is_some_and(|last| now_ms.saturating_sub(last) < BLOCK_COOLDOWN_MS);
        if cooling {
            return false;
        }
        self.last_block_ms = Some(now_ms);
        true
    }

    /// Throw the equipped rapier toward `aim`
    pub fn throw_rapier(&mut self, aim: Vec2) -> bool {
        if self.throwing.is_some() {
            return false;
        }
        let Some(weapon) = self.weapon.as_ref() else {
            return false;
        };
        if weapon.weapon_kind() != Some(WeaponKind::Rapier) {
            return false;
        }
        self.throwing = Some(ThrownRapier::new(self.body.center(), aim, weapon.damage()));
        true
    }

    /// Advance the thrown rapier and apply it to the first enemy it overlaps
    ///
    /// Returns the id of the enemy struck this tick, if any.
    pub fn update_projectile(&mut self, enemies: &mut [Enemy], now_ms: u64) -> Option<u32> {
        let rapier = self.throwing.as_mut()?;
        if !rapier.advance() {
            self.throwing = None;
            return None;
        }
        let hit = rapier.strike(enemies, now_ms);
        if hit.is_some() {
            self.throwing = None;
        }
        hit
    }

    /// Gravity, lateral movement, jumps and world clamping for one tick
    ///
    /// `jump_pressed` is edge-triggered: holding the key does not spend the
    /// double jump.
    pub fn update_movement(
        &mut self,
        move_x: f32,
        jump_pressed: bool,
        platforms: &[Rect],
        world: Vec2,
    ) {
        self.body.apply_gravity();
        self.body.vel.x = move_x.clamp(-1.0, 1.0) * MOVE_SPEED * self.bonus.speed_mult;

        if jump_pressed {
            if self.body.on_ground {
                self.body.vel.y = JUMP_STRENGTH * self.bonus.jump_mult;
                self.body.on_ground = false;
            } else if self.can_double_jump {
                self.body.vel.y = JUMP_STRENGTH * self.bonus.jump_mult;
                self.can_double_jump = false;
            }
        }

        self.body.step(platforms);
        if self.body.on_ground {
            self.can_double_jump = true;
        }
        self.body.face_velocity();
        self.body.clamp_to(world.x, world.y);
    }

    pub fn first_free_slot(&self) -> Option<usize> {
        self.inventory.iter().position(Option::is_none)
    }

    /// Put an item into the first empty slot, handing it back when full
    pub fn stash(&mut self, item: Item) -> Result<usize, Item> {
        match self.first_free_slot() {
            Some(slot) => {
                self.inventory[slot] = Some(item);
                Ok(slot)
            }
            None => Err(item),
        }
    }

    /// Pick up the first drop within reach. The drop stays on the floor
    /// when the inventory is full.
    pub fn pickup(&mut self, drops: &mut Vec<Drop>) -> Option<usize> {
        let center = self.body.center();
        let index = drops
            .iter()
            .position(|d| center.distance(d.pos) < PICKUP_RANGE)?;
        let slot = self.first_free_slot()?;
        self.inventory[slot] = Some(drops.remove(index).item);
        Some(slot)
    }

    /// Move the selection by a wheel delta (wheel up selects the previous slot)
    pub fn scroll(&mut self, delta: i32) {
        let slots = INVENTORY_SLOTS as i32;
        self.selected = (self.selected as i32 - delta).rem_euclid(slots) as usize;
    }

    /// Swap the selected slot with the equipped weapon
    ///
    /// Only weapons (or an empty slot, which unequips) are accepted.
    pub fn equip_selected(&mut self) -> bool {
        let selected = self.selected;
        let accepts = match &self.inventory[selected] {
            Some(item) => item.weapon_kind().is_some(),
            None => self.weapon.is_some(),
        };
        if accepts {
            std::mem::swap(&mut self.inventory[selected], &mut self.weapon);
        }
        accepts
    }

    /// Wear the armor piece in inventory slot `index`
    ///
    /// Any piece already in that armor slot goes back into `index`.
    /// Panics when `index` is not a valid inventory slot.
    pub fn equip_armor(&mut self, index: usize) -> bool {
        let Some(slot) = self.inventory[index].as_ref().and_then(Item::armor_slot) else {
            return false;
        };
        std::mem::swap(&mut self.inventory[index], &mut self.armor[slot.index()]);
        self.recompute_bonus();
        true
    }

    /// Take off an armor piece into the first empty inventory slot
    pub fn unequip_armor(&mut self, slot: ArmorSlot) -> bool {
        match self.first_free_slot() {
            Some(free) => self.unequip_armor_into(slot, free),
            None => false,
        }
    }

    /// Take off an armor piece into inventory slot `index`, which must be empty
    pub fn unequip_armor_into(&mut self, slot: ArmorSlot, index: usize) -> bool {
        if self.armor[slot.index()].is_none() || self.inventory[index].is_some() {
            return false;
        }
        self.inventory[index] = self.armor[slot.index()].take();
        self.recompute_bonus();
        true
    }

    /// Strip every worn piece into free inventory slots (on death)
    pub fn move_armor_to_inventory(&mut self) {
        for slot in ArmorSlot::ALL {
            if self.armor[slot.index()].is_none() {
                continue;
            }
            match self.first_free_slot() {
                Some(free) => self.inventory[free] = self.armor[slot.index()].take(),
                None => break,
            }
        }
        self.recompute_bonus();
    }

    pub fn recompute_bonus(&mut self) {
        self.bonus = SetBonus::from_armor(&self.armor);
    }
}
