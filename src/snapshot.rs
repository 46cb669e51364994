//! Read-only view of the game state for the rendering collaborator
//!
//! The renderer never touches `GameState` directly. It receives a
//! `RenderSnapshot` each frame with positions, health, facing, icon keys and
//! the animation state of every entity.

use glam::Vec2;
use serde::Serialize;

use crate::sim::ai::{Awareness, Enemy};
use crate::sim::physics::Body;
use crate::sim::rect::Rect;
use crate::sim::state::{GamePhase, GameState};

/// Attack pose is held this long after a swing (ms)
pub const ATTACK_ANIM_MS: u64 = 150;
/// Hurt flash lasts this long after taking damage (ms)
pub const HURT_ANIM_MS: u64 = 300;
/// Horizontal speed below which an entity counts as standing still
const RUN_THRESHOLD: f32 = 0.1;

/// Sprite animation to play
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AnimState {
    Idle,
    Run,
    Jump,
    Attack,
    Hurt,
}

impl AnimState {
    /// Pick a state by priority: hurt, attack, airborne, moving, idle
    fn derive(body: &Body, last_attack_ms: Option<u64>, last_hurt_ms: Option<u64>, now_ms: u64) -> Self {
        let within = |at: Option<u64>, window: u64| at.is_some_and(|t| now_ms.saturating_sub(t) < window);

        if within(last_hurt_ms, HURT_ANIM_MS) {
            AnimState::Hurt
        } else if within(last_attack_ms, ATTACK_ANIM_MS) {
            AnimState::Attack
        } else if !body.on_ground {
            AnimState::Jump
        } else if body.vel.x.abs() > RUN_THRESHOLD {
            AnimState::Run
        } else {
            AnimState::Idle
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct EntityView {
    pub id: u32,
    pub rect: Rect,
    pub hp: i32,
    pub max_hp: i32,
    pub facing: f32,
    pub anim: AnimState,
}

#[derive(Debug, Clone, Serialize)]
pub struct EnemyView {
    pub entity: EntityView,
    pub boss: bool,
    pub awareness: Awareness,
    /// Alertness in [0, 1] for the detection meter
    pub alert: f32,
    /// Awareness rose this tick ("?" marker)
    pub noticing: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct DropView {
    pub pos: Vec2,
    pub icon: String,
}

/// One inventory or armor slot as drawn in the HUD
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SlotView {
    pub icon: Option<String>,
    pub selected: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct HudView {
    pub stage: u32,
    pub xp: u32,
    pub coins: u32,
    pub weapon: Option<String>,
    pub hotbar: Vec<SlotView>,
    pub armor: Vec<SlotView>,
    pub invincible: bool,
}

/// Everything needed to draw one frame
#[derive(Debug, Clone, Serialize)]
pub struct RenderSnapshot {
    pub phase: GamePhase,
    pub player: EntityView,
    /// In-flight rapier box
    pub projectile: Option<Rect>,
    pub enemies: Vec<EnemyView>,
    pub drops: Vec<DropView>,
    pub platforms: Vec<Rect>,
    pub portal: Option<Rect>,
    pub hud: HudView,
}

impl RenderSnapshot {
    pub fn capture(state: &GameState) -> Self {
        let now = state.now_ms();
        let player = &state.player;
        let stage = &state.stage;

        let icon = |slot: &Option<crate::sim::item::Item>| slot.as_ref().map(|item| item.icon_key());

        Self {
            phase: state.phase,
            player: EntityView {
                id: 0,
                rect: player.body.rect,
                hp: player.body.hp,
                max_hp: player.body.max_hp,
                facing: player.body.facing,
                anim: AnimState::derive(&player.body, player.last_attack_ms, player.last_hurt_ms, now),
            },
            projectile: player.throwing.as_ref().map(|r| r.rect()),
            enemies: stage
                .mobs
                .iter()
                .filter(|m| m.body.is_alive())
                .map(|m| enemy_view(m, now))
                .collect(),
            drops: stage
                .drops
                .iter()
                .map(|d| DropView {
                    pos: d.pos,
                    icon: d.item.icon_key(),
                })
                .collect(),
            platforms: stage.platforms.clone(),
            portal: stage.portal,
            hud: HudView {
                stage: stage.number,
                xp: player.xp,
                coins: player.coins,
                weapon: icon(&player.weapon),
                hotbar: player
                    .inventory
                    .iter()
                    .enumerate()
                    .map(|(i, slot)| SlotView {
                        icon: icon(slot),
                        selected: i == player.selected,
                    })
                    .collect(),
                armor: player
                    .armor
                    .iter()
                    .map(|slot| SlotView {
                        icon: icon(slot),
                        selected: false,
                    })
                    .collect(),
                invincible: player.is_invincible(now),
            },
        }
    }
}

fn enemy_view(enemy: &Enemy, now_ms: u64) -> EnemyView {
    // Enemies have no attack animation; contact damage is instant
    EnemyView {
        entity: EntityView {
            id: enemy.id,
            rect: enemy.body.rect,
            hp: enemy.body.hp,
            max_hp: enemy.body.max_hp,
            facing: enemy.body.facing,
            anim: AnimState::derive(&enemy.body, None, enemy.last_struck_ms, now_ms),
        },
        boss: enemy.is_boss(),
        awareness: enemy.state(),
        alert: enemy.awareness / crate::consts::AWARENESS_MAX,
        noticing: enemy.awareness_gain > 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::item::{ArmorFamily, ArmorSlot, Item, Rarity, WeaponKind};
    use crate::sim::stage::Drop;

    #[test]
    fn test_anim_priority() {
        let mut body = Body::new(0.0, 0.0, 40.0, 60.0, 100);
        body.on_ground = true;
        assert_eq!(AnimState::derive(&body, None, None, 1000), AnimState::Idle);

        body.vel.x = 5.0;
        assert_eq!(AnimState::derive(&body, None, None, 1000), AnimState::Run);

        body.on_ground = false;
        assert_eq!(AnimState::derive(&body, None, None, 1000), AnimState::Jump);
        assert_eq!(AnimState::derive(&body, Some(900), None, 1000), AnimState::Attack);
        assert_eq!(AnimState::derive(&body, Some(900), Some(800), 1000), AnimState::Hurt);

        // Windows close
        assert_eq!(
            AnimState::derive(&body, Some(1000 - ATTACK_ANIM_MS), Some(1000 - HURT_ANIM_MS), 1000),
            AnimState::Jump
        );
    }

    #[test]
    fn test_capture_mirrors_state() {
        let mut state = GameState::new(21);
        state.player.weapon = Some(Item::weapon(WeaponKind::Rapier, Rarity::Holy));
        state.player.inventory[2] = Some(Item::armor(ArmorFamily::Mage, ArmorSlot::Chest, Rarity::Rare));
        state.player.selected = 2;
        state.stage.drops.push(Drop {
            item: Item::weapon(WeaponKind::Dagger, Rarity::Common),
            pos: Vec2::new(300.0, 400.0),
        });
        state.stage.mobs[0].body.hp = 0;

        let snap = RenderSnapshot::capture(&state);
        assert_eq!(snap.phase, GamePhase::Playing);
        assert_eq!(snap.enemies.len(), state.stage.mobs.len() - 1);
        assert_eq!(snap.platforms, state.stage.platforms);
        assert_eq!(snap.drops[0].icon, "dagger:common");
        assert_eq!(snap.hud.weapon.as_deref(), Some("rapier:holy"));
        assert_eq!(snap.hud.hotbar.len(), 10);
        assert_eq!(
            snap.hud.hotbar[2],
            SlotView {
                icon: Some("mage-chest:rare".into()),
                selected: true,
            }
        );
        assert!(snap.hud.invincible);
        assert!(snap.portal.is_none());
    }

    #[test]
    fn test_struck_enemy_shows_hurt() {
        let mut state = GameState::new(3);
        state.time_ticks = 60;
        let now = state.now_ms();
        state.stage.mobs[1].mark_struck(now);

        let snap = RenderSnapshot::capture(&state);
        let struck = &snap.enemies[1];
        assert_eq!(struck.entity.anim, AnimState::Hurt);
        assert_eq!(struck.awareness, Awareness::Aware);
        assert_eq!(struck.alert, 1.0);
    }
}
