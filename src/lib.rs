//! Underground Platformer - simulation core for a 2D action platformer
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, combat, enemy AI, stages)
//! - `persistence`: Save/load of the player profile with safe fallbacks
//! - `settings`: Runtime configuration
//! - `snapshot`: Read-only state view for the rendering collaborator
//! - `ui`: Inventory overlay session state (owned by the UI, not the sim)

pub mod persistence;
pub mod settings;
pub mod sim;
pub mod snapshot;
pub mod ui;

pub use settings::Settings;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation rate (one logical tick per rendered frame)
    pub const SIM_HZ: u64 = 60;

    /// Default world dimensions (fullscreen 1080p)
    pub const WORLD_WIDTH: f32 = 1920.0;
    pub const WORLD_HEIGHT: f32 = 1080.0;

    /// Physics (per-tick units)
    pub const GRAVITY: f32 = 0.6;
    pub const JUMP_STRENGTH: f32 = -14.0;
    pub const MOVE_SPEED: f32 = 5.0;

    /// Player defaults
    pub const PLAYER_WIDTH: f32 = 40.0;
    pub const PLAYER_HEIGHT: f32 = 60.0;
    pub const PLAYER_MAX_HP: i32 = 100;
    pub const INVENTORY_SLOTS: usize = 10;
    /// Invincibility after spawning into a run (ms)
    pub const SPAWN_INVINCIBILITY_MS: u64 = 3000;
    /// Invincibility after walking through a portal (ms)
    pub const STAGE_INVINCIBILITY_MS: u64 = 2000;
    /// Max distance from player center to pick up a drop
    pub const PICKUP_RANGE: f32 = 60.0;

    /// Unarmed fallback
    pub const FIST_RANGE: f32 = 90.0;
    pub const FIST_DAMAGE: i32 = 4;
    pub const FIST_COOLDOWN_MS: u64 = 150;

    /// Weapon reach
    pub const DAGGER_RANGE: f32 = 90.0;
    pub const SWORD_RANGE: f32 = 120.0;
    pub const RAPIER_RANGE: f32 = 145.0;
    /// Added to weapon reach for every armed swing
    pub const MELEE_EXTRA_RADIUS: f32 = 50.0;

    /// Full backstab arc in degrees; bonus applies outside half of it
    pub const BACKSTAB_ARC_DEG: f32 = 120.0;
    /// Fraction of the target's current hp added on a backstab
    pub const BACKSTAB_HP_FRACTION: f32 = 0.25;
    pub const BLOCK_COOLDOWN_MS: u64 = 5000;

    /// Thrown rapier
    pub const THROWN_RAPIER_SPEED: f32 = 12.0;
    pub const THROWN_RAPIER_TTL: u32 = 90;
    pub const THROWN_RAPIER_SIZE: f32 = 30.0;

    /// Enemy defaults
    pub const ENEMY_WIDTH: f32 = 40.0;
    pub const ENEMY_HEIGHT: f32 = 50.0;
    pub const ENEMY_BASE_HP: i32 = 40;
    pub const ENEMY_HP_PER_STAGE: i32 = 10;
    pub const ENEMY_BASE_DAMAGE: i32 = 5;
    pub const ENEMY_DAMAGE_PER_STAGE: i32 = 2;

    /// Boss defaults
    pub const BOSS_WIDTH: f32 = 60.0;
    pub const BOSS_HEIGHT: f32 = 80.0;
    pub const BOSS_HP: i32 = 300;
    pub const BOSS_DAMAGE: i32 = 15;

    /// Awareness model
    pub const AWARENESS_MAX: f32 = 5.0;
    pub const DETECTION_RADIUS: f32 = 100.0;
    pub const AWARENESS_GAIN_PER_TICK: f32 = 1.0 / 60.0;
    pub const AWARENESS_DECAY_PER_TICK: f32 = 1.0 / 60.0;
    pub const AWARENESS_DECAY_GRACE_MS: u64 = 3000;
    pub const STRUCK_RECENCY_MS: u64 = 200;

    /// Aware movement
    pub const AI_DRIFT_INTERVAL_TICKS: u64 = 60;
    pub const AI_CHASE_NUDGE: f32 = 0.05;
    pub const AI_MAX_SPEED: f32 = 1.5;
    pub const AI_HOP_CHANCE: f64 = 0.005;
    pub const AI_HOP_IMPULSE: f32 = -8.0;
    pub const LEDGE_PROBE_STEP: f32 = 2.0;
    pub const CONTACT_KNOCKBACK: f32 = 30.0;
    pub const FALL_DAMAGE_SPEED: f32 = 10.0;
    pub const FALL_DAMAGE_SCALE: f32 = 2.0;

    /// Stage layout
    pub const GROUND_HEIGHT: f32 = 100.0;
    pub const PLATFORM_HEIGHT: f32 = 20.0;
    pub const MIN_PLATFORMS: usize = 6;
    pub const MAX_EXTRA_PLATFORMS: usize = 3;
    /// Max vertical rise between consecutive platforms (player jump apex ~163px)
    pub const MAX_JUMP_HEIGHT: f32 = 160.0;
    pub const MAX_JUMP_DX: f32 = 260.0;
    pub const MIN_PLATFORM_DX: f32 = 80.0;
    pub const MIN_PLATFORM_DY: f32 = 80.0;
    pub const MIN_PLATFORM_SPACING: f32 = 60.0;
    pub const MAX_PLACEMENT_RETRIES: u32 = 10;
    pub const TOP_MARGIN: f32 = 60.0;
    pub const SIDE_MARGIN: f32 = 20.0;
    pub const INITIAL_MOBS: usize = 10;
    pub const PORTAL_SIZE: f32 = 64.0;
    pub const DROP_CHANCE: f64 = 0.3;
}

/// Convert a tick count to elapsed milliseconds at the fixed sim rate
#[inline]
pub fn ticks_to_ms(ticks: u64) -> u64 {
    ticks * 1000 / consts::SIM_HZ
}

/// Sign of `x` as -1, 0 or 1
#[inline]
pub fn sign(x: f32) -> f32 {
    if x > 0.0 {
        1.0
    } else if x < 0.0 {
        -1.0
    } else {
        0.0
    }
}

/// Euclidean distance between two points
#[inline]
pub fn dist(a: Vec2, b: Vec2) -> f32 {
    a.distance(b)
}

/// Angle in degrees from `a` to `b` (screen coordinates, y down)
#[inline]
pub fn angle_deg(a: Vec2, b: Vec2) -> f32 {
    (b.y - a.y).atan2(b.x - a.x).to_degrees()
}

/// Wrap an angle in degrees to [-180, 180)
#[inline]
pub fn wrap_degrees(angle: f32) -> f32 {
    (angle + 180.0).rem_euclid(360.0) - 180.0
}
