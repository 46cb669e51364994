//! Enemy awareness state machine and movement policy
//!
//! Enemies start `Dormant` and accumulate an awareness scalar in [0, 5]
//! while the player is close and visible. Reaching 5 flips them to `Aware`
//! for the rest of their lifetime. Being struck, or touching the player,
//! jumps straight to `Aware`.
//!
//! Dormant enemies stand still. Aware enemies drift, chase the player
//! horizontally, hop occasionally and refuse to walk off ledges.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::physics::Body;
use super::rect::Rect;
use super::state::GameEvent;
use crate::consts::*;
use crate::sign;

/// Stat tier of an AI-controlled entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyKind {
    /// Regular stage mob, stats scale with stage number
    Grunt,
    /// Stage boss, fixed stats and a larger hitbox
    Boss,
}

/// Coarse awareness state derived from the `aware` flag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Awareness {
    Dormant,
    Aware,
}

/// An AI-controlled entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    pub kind: EnemyKind,
    pub body: Body,
    /// Damage dealt to the player on contact
    pub damage: i32,
    /// Ticks since spawn
    pub ai_timer: u64,
    /// Continuous alertness in [0, AWARENESS_MAX]
    pub awareness: f32,
    /// Set once awareness reaches the maximum, never cleared
    pub aware: bool,
    /// Gain applied on the last awareness update (render hint for "?" marker)
    pub awareness_gain: f32,
    /// When the current no-gain streak began (decay starts after a grace period)
    decay_since_ms: Option<u64>,
    /// Last time the player's attack landed on this enemy
    pub last_struck_ms: Option<u64>,
}

impl Enemy {
    /// A regular mob scaled to `stage` difficulty
    pub fn grunt(id: u32, x: f32, y: f32, stage: u32) -> Self {
        let stage = stage as i32;
        Self::with_stats(
            id,
            EnemyKind::Grunt,
            Body::new(
                x,
                y,
                ENEMY_WIDTH,
                ENEMY_HEIGHT,
                ENEMY_BASE_HP + stage * ENEMY_HP_PER_STAGE,
            ),
            ENEMY_BASE_DAMAGE + stage * ENEMY_DAMAGE_PER_STAGE,
        )
    }

    /// The stage boss. Bosses skip the dormant phase.
    pub fn boss(id: u32, x: f32, y: f32) -> Self {
        let mut boss = Self::with_stats(
            id,
            EnemyKind::Boss,
            Body::new(x, y, BOSS_WIDTH, BOSS_HEIGHT, BOSS_HP),
            BOSS_DAMAGE,
        );
        boss.become_aware();
        boss
    }

    fn with_stats(id: u32, kind: EnemyKind, body: Body, damage: i32) -> Self {
        Self {
            id,
            kind,
            body,
            damage,
            ai_timer: 0,
            awareness: 0.0,
            aware: false,
            awareness_gain: 0.0,
            decay_since_ms: None,
            last_struck_ms: None,
        }
    }

    pub fn is_boss(&self) -> bool {
        self.kind == EnemyKind::Boss
    }

    pub fn state(&self) -> Awareness {
        if self.aware {
            Awareness::Aware
        } else {
            Awareness::Dormant
        }
    }

    /// Max out awareness permanently
    pub fn become_aware(&mut self) {
        self.awareness = AWARENESS_MAX;
        self.aware = true;
    }

    /// Record a hit from the player; being attacked always reveals the attacker
    pub fn mark_struck(&mut self, now_ms: u64) {
        self.last_struck_ms = Some(now_ms);
        self.become_aware();
    }

    /// One awareness step while dormant
    fn update_awareness(&mut self, player: &Body, platforms: &[Rect], now_ms: u64) {
        if self.aware {
            return;
        }

        let me = self.body.center();
        let target = player.center();
        let distance = me.distance(target);
        let player_dir = if target.x > me.x { 1.0 } else { -1.0 };
        let los = has_line_of_sight(me, target, platforms);

        if player_dir != self.body.facing && (distance > DETECTION_RADIUS || !los) {
            // Player is behind us and out of reach: no gain, decay after grace
            self.awareness_gain = 0.0;
            match self.decay_since_ms {
                None => self.decay_since_ms = Some(now_ms),
                Some(since) if now_ms.saturating_sub(since) > AWARENESS_DECAY_GRACE_MS => {
                    self.awareness = (self.awareness - AWARENESS_DECAY_PER_TICK).max(0.0);
                }
                Some(_) => {}
            }
        } else if los && distance < DETECTION_RADIUS {
            self.awareness_gain = AWARENESS_GAIN_PER_TICK;
            self.decay_since_ms = None;
        } else {
            self.awareness_gain = 0.0;
        }

        let struck_recently = self
            .last_struck_ms
            .is_some_and(|t| now_ms.saturating_sub(t) < STRUCK_RECENCY_MS);
        if struck_recently {
            self.awareness = AWARENESS_MAX;
        } else {
            self.awareness = (self.awareness + self.awareness_gain).min(AWARENESS_MAX);
        }

        if self.awareness >= AWARENESS_MAX {
            self.aware = true;
        }
    }

    /// Pick this tick's velocity from the awareness state
    fn steer(&mut self, player: &Body, rng: &mut impl Rng) {
        if !self.aware {
            self.body.vel.x = 0.0;
            return;
        }

        if self.ai_timer % AI_DRIFT_INTERVAL_TICKS == 0 {
            self.body.vel.x = rng.random_range(-1..=1) as f32;
        }
        if self.body.center().x < player.center().x {
            self.body.vel.x += AI_CHASE_NUDGE;
        } else {
            self.body.vel.x -= AI_CHASE_NUDGE;
        }
        self.body.vel.x = self.body.vel.x.clamp(-AI_MAX_SPEED, AI_MAX_SPEED);

        if self.body.on_ground && rng.random_bool(AI_HOP_CHANCE) {
            self.body.vel.y = AI_HOP_IMPULSE;
        }
    }

    /// Zero horizontal velocity if the next step would leave the platform
    fn avoid_ledge(&mut self, platforms: &[Rect]) {
        let step = sign(self.body.vel.x);
        if step == 0.0 || !self.body.on_ground {
            return;
        }
        let rect = self.body.rect;
        let probe = rect.translated(step * LEDGE_PROBE_STEP, LEDGE_PROBE_STEP + rect.h / 2.0);
        if !platforms.iter().any(|p| p.intersects(&probe)) {
            self.body.vel.x = 0.0;
        }
    }

    /// Decide this tick's intent: awareness, steering and ledge check
    pub fn think(
        &mut self,
        player: &Body,
        platforms: &[Rect],
        rng: &mut impl Rng,
        now_ms: u64,
    ) {
        self.ai_timer += 1;
        self.update_awareness(player, platforms, now_ms);
        self.steer(player, rng);
        self.avoid_ledge(platforms);
        self.body.face_velocity();
    }

    /// Full per-tick update: AI, physics, fall damage and contact damage
    ///
    /// `player_vulnerable` is false while the player's invincibility window
    /// is open.
    pub fn update(
        &mut self,
        player: &mut Body,
        player_vulnerable: bool,
        platforms: &[Rect],
        rng: &mut impl Rng,
        now_ms: u64,
        events: &mut Vec<GameEvent>,
    ) {
        self.think(player, platforms, rng, now_ms);

        self.body.apply_gravity();
        let prev_vy = self.body.vel.y;
        let was_grounded = self.body.on_ground;
        self.body.step(platforms);

        if !was_grounded && self.body.on_ground && prev_vy > FALL_DAMAGE_SPEED {
            let damage = ((prev_vy - FALL_DAMAGE_SPEED) * FALL_DAMAGE_SCALE) as i32;
            if damage > 0 {
                self.body.take_damage(damage);
                events.push(GameEvent::FallDamage {
                    enemy_id: self.id,
                    damage,
                });
            }
        }

        if self.body.is_alive()
            && player.is_alive()
            && player_vulnerable
            && self.body.rect.intersects(&player.rect)
        {
            self.become_aware();
            player.take_damage(self.damage);
            events.push(GameEvent::PlayerHit {
                enemy_id: self.id,
                damage: self.damage,
            });
            let away = sign(self.body.center().x - player.center().x);
            self.body.push_horizontal(away * CONTACT_KNOCKBACK, platforms);
        }
    }
}

/// True when no platform crosses the segment between two points
pub fn has_line_of_sight(from: Vec2, to: Vec2, platforms: &[Rect]) -> bool {
    !platforms.iter().any(|p| p.clips_segment(from, to))
}
