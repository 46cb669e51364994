//! Underground Platformer headless runner
//!
//! Loads settings and the player profile, plays an autoplay run for a fixed
//! number of ticks and saves the profile when the run ends.
//!
//! Usage: `underground-platformer [settings.json]`

#[cfg(not(target_arch = "wasm32"))]
mod runner {
    use std::path::PathBuf;

    use underground_platformer::Settings;
    use underground_platformer::persistence::{self, SaveData};
    use underground_platformer::sim::{GameEvent, GamePhase, GameState, Player, TickInput, tick};
    use underground_platformer::snapshot::RenderSnapshot;

    /// Runner instance holding all state
    struct Game {
        settings: Settings,
        state: GameState,
        input: TickInput,
        last_phase: GamePhase,
    }

    impl Game {
        fn new(settings: Settings) -> Self {
            let mut player = Player::new(0.0, 0.0);
            persistence::load_or_default(&settings.save_path).apply_to(&mut player);
            let state = GameState::with_profile(&settings, player);
            Self {
                last_phase: state.phase,
                settings,
                state,
                input: TickInput {
                    autoplay: true,
                    ..Default::default()
                },
            }
        }

        /// Run one simulation tick and report what happened
        fn update(&mut self) {
            tick(&mut self.state, &self.input);

            // Clear one-shot inputs after processing
            self.input.toggle_inventory = false;
            self.input.equip_selected = false;
            self.input.select_slot = None;

            for event in self.state.drain_events() {
                log_event(&event);
            }

            // Save whenever the run ends
            let phase = self.state.phase;
            if phase != self.last_phase {
                if matches!(phase, GamePhase::GameOver | GamePhase::Victory) {
                    self.save_profile();
                }
                self.last_phase = phase;
            }
        }

        fn finished(&self) -> bool {
            matches!(self.state.phase, GamePhase::GameOver | GamePhase::Victory)
        }

        fn save_profile(&self) {
            let data = SaveData::from_player(&self.state.player);
            if let Err(e) = persistence::save_profile(&self.settings.save_path, &data) {
                log::warn!("Could not save profile: {e}");
            }
        }

        fn run(&mut self) {
            for _ in 0..self.settings.autoplay_ticks {
                self.update();
                if self.finished() {
                    break;
                }
            }
            if !self.finished() {
                self.save_profile();
            }

            let snapshot = RenderSnapshot::capture(&self.state);
            log::info!(
                "Stopped after {} ticks: {:?} on stage {}, hp {}/{}, {} xp, {} coins, {} enemies left",
                self.state.time_ticks,
                snapshot.phase,
                snapshot.hud.stage,
                snapshot.player.hp,
                snapshot.player.max_hp,
                snapshot.hud.xp,
                snapshot.hud.coins,
                snapshot.enemies.len()
            );
        }
    }

    fn log_event(event: &GameEvent) {
        match event {
            GameEvent::EnemyHit { .. } | GameEvent::PlayerHit { .. } | GameEvent::FallDamage { .. } => {
                log::trace!("{event:?}")
            }
            GameEvent::StageEntered { .. } | GameEvent::PlayerDied | GameEvent::Victory => {
                log::info!("{event:?}")
            }
            _ => log::debug!("{event:?}"),
        }
    }

    pub fn main() {
        env_logger::init();
        log::info!("Underground Platformer (headless) starting...");

        let settings_path = std::env::args()
            .nth(1)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("settings.json"));
        let settings = Settings::load(&settings_path);
        log::info!("Game initialized with seed: {}", settings.seed);

        Game::new(settings).run();
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    runner::main();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // No browser front end; the library is driven by an embedding host
}
