//! Game state and core simulation types
//!
//! Everything a tick reads or writes lives in `GameState`, including the
//! seeded RNG, so a run can be replayed from its seed and input stream.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::item::Item;
use super::player::Player;
use super::stage::Stage;
use crate::Settings;
use crate::consts::*;
use crate::ticks_to_ms;

/// Current phase of the run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Inventory overlay open; the simulation is frozen
    Paused,
    /// Player died
    GameOver,
    /// Portal entered on the final stage
    Victory,
}

/// Something that happened during a tick, for logging, audio and effects
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    EnemyHit {
        enemy_id: u32,
        damage: i32,
        backstab: bool,
    },
    PlayerHit {
        enemy_id: u32,
        damage: i32,
    },
    FallDamage {
        enemy_id: u32,
        damage: i32,
    },
    EnemyKilled {
        enemy_id: u32,
        boss: bool,
        xp: u32,
    },
    LootDropped {
        item: Item,
        pos: Vec2,
    },
    ItemPickedUp {
        slot: usize,
    },
    BossSpawned {
        enemy_id: u32,
    },
    PortalOpened,
    StageEntered {
        stage: u32,
    },
    Blocked,
    RapierThrown,
    RapierHit {
        enemy_id: u32,
        damage: i32,
    },
    PlayerDied,
    Victory,
}

/// Complete game state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub width: f32,
    pub height: f32,
    /// Entering the portal on this stage wins the run
    pub max_stage: u32,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub phase: GamePhase,
    pub player: Player,
    pub stage: Stage,
    /// Events emitted since the last drain
    #[serde(skip)]
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Create a new run with default settings and the given seed
    pub fn new(seed: u64) -> Self {
        Self::with_settings(&Settings {
            seed,
            ..Settings::default()
        })
    }

    /// New run with a fresh profile
    pub fn with_settings(settings: &Settings) -> Self {
        Self::with_profile(settings, Player::new(0.0, 0.0))
    }

    /// New run carrying over a loaded profile (xp, coins, items)
    pub fn with_profile(settings: &Settings, mut player: Player) -> Self {
        let mut rng = Pcg32::seed_from_u64(settings.seed);
        let (width, height) = (settings.world_width, settings.world_height);
        let stage = Stage::new(1, width, height, &mut rng);

        player.recompute_bonus();
        player.respawn(Player::spawn_point(height), 0, SPAWN_INVINCIBILITY_MS);
        log::info!("run started with seed {}", settings.seed);

        Self {
            seed: settings.seed,
            rng,
            width,
            height,
            max_stage: settings.max_stage.max(1),
            time_ticks: 0,
            phase: GamePhase::Playing,
            player,
            stage,
            events: Vec::new(),
        }
    }

    /// Simulation clock in milliseconds
    pub fn now_ms(&self) -> u64 {
        ticks_to_ms(self.time_ticks)
    }

    pub fn world(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    /// Take the events accumulated so far
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Replace the stage with the next one, or end the run on the last stage
    pub fn enter_portal(&mut self) {
        if self.stage.number >= self.max_stage {
            log::info!("final portal entered on stage {}", self.stage.number);
            self.phase = GamePhase::Victory;
            self.events.push(GameEvent::Victory);
            return;
        }

        let number = self.stage.number + 1;
        self.stage = Stage::new(number, self.width, self.height, &mut self.rng);
        let now = self.now_ms();
        self.player
            .respawn(Player::spawn_point(self.height), now, STAGE_INVINCIBILITY_MS);
        log::info!("entered stage {number}");
        self.events.push(GameEvent::StageEntered { stage: number });
    }

    /// Toggle the inventory overlay (pauses and resumes play)
    pub fn toggle_inventory(&mut self) {
        self.phase = match self.phase {
            GamePhase::Playing => GamePhase::Paused,
            GamePhase::Paused => GamePhase::Playing,
            other => other,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_run() {
        let state = GameState::new(12345);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.stage.number, 1);
        assert_eq!(state.stage.mobs.len(), INITIAL_MOBS);
        assert_eq!(state.player.body.hp, PLAYER_MAX_HP);
        assert!(state.player.is_invincible(SPAWN_INVINCIBILITY_MS - 1));
        assert!(!state.player.is_invincible(SPAWN_INVINCIBILITY_MS));
        assert_eq!(state.player.body.rect.x, 100.0);
    }

    #[test]
    fn test_same_seed_same_stage() {
        let a = GameState::new(7);
        let b = GameState::new(7);
        assert_eq!(a.stage.platforms, b.stage.platforms);
        let xs_a: Vec<f32> = a.stage.mobs.iter().map(|m| m.body.rect.x).collect();
        let xs_b: Vec<f32> = b.stage.mobs.iter().map(|m| m.body.rect.x).collect();
        assert_eq!(xs_a, xs_b);
    }

    #[test]
    fn test_enter_portal_advances_and_wins() {
        let settings = Settings {
            seed: 3,
            max_stage: 2,
            ..Settings::default()
        };
        let mut state = GameState::with_settings(&settings);
        state.time_ticks = 600;
        state.player.body.hp = 10;

        state.enter_portal();
        assert_eq!(state.stage.number, 2);
        assert_eq!(state.player.body.hp, PLAYER_MAX_HP);
        assert!(state.player.is_invincible(state.now_ms() + STAGE_INVINCIBILITY_MS - 1));
        assert_eq!(state.phase, GamePhase::Playing);

        state.enter_portal();
        assert_eq!(state.phase, GamePhase::Victory);
        assert!(state.drain_events().contains(&GameEvent::Victory));
        assert!(state.events.is_empty());
    }

    #[test]
    fn test_toggle_inventory() {
        let mut state = GameState::new(1);
        state.toggle_inventory();
        assert_eq!(state.phase, GamePhase::Paused);
        state.toggle_inventory();
        assert_eq!(state.phase, GamePhase::Playing);

        state.phase = GamePhase::GameOver;
        state.toggle_inventory();
        assert_eq!(state.phase, GamePhase::GameOver);
    }

    #[test]
    fn test_state_serializes() {
        let state = GameState::new(5);
        let json = serde_json::to_string(&state).unwrap();
        let back: GameState = serde_json::from_str(&json).unwrap();
        assert_eq!(back.stage.platforms, state.stage.platforms);
        assert_eq!(back.time_ticks, state.time_ticks);
    }
}
