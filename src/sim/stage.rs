//! Stage generation and lifecycle
//!
//! A stage owns its platform layout, live mobs, floor drops and the exit
//! portal. Layouts are a reachable chain of platforms climbing from the
//! ground, plus a few extra platforms for density.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::ai::Enemy;
use super::item::{ArmorSlot, Item, Rarity, random_armor, random_weapon};
use super::rect::Rect;
use super::state::GameEvent;
use crate::consts::*;

/// An item lying on the floor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Drop {
    pub item: Item,
    pub pos: Vec2,
}

/// Generated platform layout
#[derive(Debug, Clone)]
pub struct Layout {
    /// Ground plus every platform, sorted by `y`
    pub platforms: Vec<Rect>,
    /// Placements accepted after the retry budget ran out
    pub forced_placements: u32,
}

/// True when two platforms sit too close to each other
pub fn too_close(a: &Rect, b: &Rect) -> bool {
    let dy = (a.y - b.y).abs();
    let stacked = dy < MIN_PLATFORM_DY / 2.0 && a.right() > b.x && a.x < b.right();
    let crowded = (a.x - b.x).abs() < MIN_PLATFORM_SPACING && dy < MIN_PLATFORM_SPACING;
    stacked || crowded
}

/// Place a platform, re-rolling until it respects spacing or retries run out
fn place(
    placed: &[Rect],
    forced: &mut u32,
    mut candidate: impl FnMut() -> Rect,
) -> Rect {
    let mut tries = 0;
    loop {
        let rect = candidate();
        if !placed.iter().any(|p| too_close(&rect, p)) {
            return rect;
        }
        if tries >= MAX_PLACEMENT_RETRIES {
            *forced += 1;
            log::debug!("accepting crowded platform at ({}, {})", rect.x, rect.y);
            return rect;
        }
        tries += 1;
    }
}

/// The reachable chain, in climbing order
///
/// Each platform moves toward the far side of the screen by a jumpable
/// horizontal step and rises by a jumpable vertical step.
fn place_chain(rng: &mut impl Rng, ground: Rect, width: f32, forced: &mut u32) -> Vec<Rect> {
    let mut chain: Vec<Rect> = Vec::with_capacity(MIN_PLATFORMS);
    let mut prev = ground;

    for _ in 0..MIN_PLATFORMS {
        let rect = place(&chain, forced, || {
            let w = rng.random_range(150..=300) as f32;
            let dx = rng.random_range(MIN_PLATFORM_DX as i32..=MAX_JUMP_DX as i32) as f32;
            let dy = rng.random_range(MIN_PLATFORM_DY as i32..=MAX_JUMP_HEIGHT as i32) as f32;
            let x = if prev.x < width / 2.0 {
                (prev.x + dx).min(width - w - SIDE_MARGIN)
            } else {
                (prev.x - dx).max(SIDE_MARGIN)
            };
            let y = (prev.y - dy).max(TOP_MARGIN);
            Rect::new(x, y, w, PLATFORM_HEIGHT)
        });
        chain.push(rect);
        prev = rect;
    }

    chain
}

/// Generate a full layout for a world of the given size
pub fn generate_layout(rng: &mut impl Rng, width: f32, height: f32) -> Layout {
    let ground = Rect::new(0.0, height - GROUND_HEIGHT, width, GROUND_HEIGHT);
    let mut forced = 0;
    let mut placed = place_chain(rng, ground, width, &mut forced);

    let max_x = (width as i32 - 340).max(40);
    let max_y = (height as i32 - 200).max(TOP_MARGIN as i32);
    let extra = rng.random_range(0..=MAX_EXTRA_PLATFORMS);
    for _ in 0..extra {
        let rect = place(&placed, &mut forced, || {
            let x = rng.random_range(40..=max_x) as f32;
            let y = rng.random_range(TOP_MARGIN as i32..=max_y) as f32;
            let w = rng.random_range(120..=260) as f32;
            Rect::new(x, y, w, PLATFORM_HEIGHT)
        });
        placed.push(rect);
    }

    let mut platforms = Vec::with_capacity(placed.len() + 1);
    platforms.push(ground);
    platforms.extend(placed);
    platforms.sort_by(|a, b| a.y.total_cmp(&b.y));

    Layout {
        platforms,
        forced_placements: forced,
    }
}

/// One level of the run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Stage {
    /// Stage index, also the difficulty scalar
    pub number: u32,
    pub width: f32,
    pub height: f32,
    pub platforms: Vec<Rect>,
    /// Live mobs in spawn order
    pub mobs: Vec<Enemy>,
    pub drops: Vec<Drop>,
    pub portal: Option<Rect>,
    pub boss_defeated: bool,
    next_id: u32,
}

impl Stage {
    /// Generate a fresh stage and populate its initial mobs
    pub fn new(number: u32, width: f32, height: f32, rng: &mut impl Rng) -> Self {
        let layout = generate_layout(rng, width, height);
        let mut stage = Self {
            number,
            width,
            height,
            platforms: layout.platforms,
            mobs: Vec::with_capacity(INITIAL_MOBS + 1),
            drops: Vec::new(),
            portal: None,
            boss_defeated: false,
            next_id: 1,
        };
        stage.spawn_initial_mobs(rng);
        log::info!(
            "stage {} ready: {} platforms, {} mobs",
            number,
            stage.platforms.len(),
            stage.mobs.len()
        );
        stage
    }

    fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn spawn_initial_mobs(&mut self, rng: &mut impl Rng) {
        let max_x = (self.width as i32 - 100).max(100);
        for _ in 0..INITIAL_MOBS {
            let x = rng.random_range(100..=max_x) as f32;
            let id = self.next_entity_id();
            self.mobs.push(Enemy::grunt(id, x, 100.0, self.number));
        }
    }

    fn spawn_boss(&mut self) -> u32 {
        let id = self.next_entity_id();
        self.mobs.push(Enemy::boss(id, self.width / 2.0, 150.0));
        id
    }

    pub fn boss(&self) -> Option<&Enemy> {
        self.mobs.iter().find(|m| m.is_boss())
    }

    /// Exit portal rectangle, resting on the ground at the right edge
    pub fn portal_rect(width: f32, height: f32) -> Rect {
        Rect::new(
            width - 100.0,
            height - GROUND_HEIGHT - PORTAL_SIZE,
            PORTAL_SIZE,
            PORTAL_SIZE,
        )
    }

    /// Turn deaths into xp and loot, then advance the boss/portal lifecycle
    ///
    /// Returns the xp earned this call.
    pub fn reconcile(&mut self, rng: &mut impl Rng, events: &mut Vec<GameEvent>) -> u32 {
        let xp_per_kill = 5 + 3 * self.number;
        let mut xp = 0;

        for mob in std::mem::take(&mut self.mobs) {
            if mob.body.is_alive() {
                self.mobs.push(mob);
                continue;
            }

            xp += xp_per_kill;
            events.push(GameEvent::EnemyKilled {
                enemy_id: mob.id,
                boss: mob.is_boss(),
                xp: xp_per_kill,
            });

            let loot = if mob.is_boss() {
                self.boss_defeated = true;
                Some(random_weapon(rng, Some(Rarity::Godlike)))
            } else if rng.random_bool(DROP_CHANCE) {
                if rng.random_bool(0.5) {
                    Some(random_weapon(rng, None))
                } else {
                    let slot = ArmorSlot::ALL[rng.random_range(0..ArmorSlot::ALL.len())];
                    Some(random_armor(rng, slot, None))
                }
            } else {
                None
            };

            if let Some(item) = loot {
                let pos = mob.body.center();
                log::debug!("mob {} dropped {}", mob.id, item.icon_key());
                events.push(GameEvent::LootDropped {
                    item: item.clone(),
                    pos,
                });
                self.drops.push(Drop { item, pos });
            }
        }

        let grunts_left = self.mobs.iter().any(|m| !m.is_boss());
        if !self.boss_defeated && !grunts_left && self.boss().is_none() {
            let id = self.spawn_boss();
            log::info!("stage {}: boss spawned", self.number);
            events.push(GameEvent::BossSpawned { enemy_id: id });
        }

        if self.boss_defeated && self.portal.is_none() {
            self.portal = Some(Self::portal_rect(self.width, self.height));
            log::info!("stage {}: portal open", self.number);
            events.push(GameEvent::PortalOpened);
        }

        xp
    }
}
