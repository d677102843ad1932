//! Complete simulation state and its external API

use glam::Vec2;
use serde::Serialize;

use super::clock::{PauseReason, SimClock};
use super::combat::ContactDamage;
use super::events::{EventQueue, GameEvent};
use super::player::Player;
use super::progression::{Phase, Progression, ProgressionCtx, RelicReveal};
use super::spawner::Spawners;
use super::upgrades::Catalog;
use super::weapons::Arsenal;
use super::world::World;
use crate::config::{SimConfig, StressPreset};
use crate::error::SimResult;

/// Coarse run status for callers that do not care about prompt details
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GamePhase {
    Playing,
    Paused,
    LevelingUp,
    RelicSelection,
    GameOver,
}

/// Point-in-time counters, logged by the headless runner
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RunSummary {
    pub ticks: u64,
    pub sim_secs: f32,
    pub level: u32,
    pub health: f32,
    pub enemies: usize,
    pub projectiles: usize,
    pub orbs: usize,
    pub chests: usize,
    pub kills: u64,
}

#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Config as loaded, before any stress preset
    base_config: SimConfig,
    /// Effective config (base with the active preset applied)
    pub config: SimConfig,
    pub preset: StressPreset,
    pub clock: SimClock,
    pub player: Player,
    pub world: World,
    pub spawners: Spawners,
    pub arsenal: Arsenal,
    pub contact: ContactDamage,
    pub progression: Progression,
    pub kills: u64,
}

impl GameState {
    /// New run with the player in the middle of the world
    pub fn new(config: SimConfig, seed: u64) -> Self {
        Self::with_catalog(config, seed, Catalog::standard())
    }

    pub fn with_catalog(config: SimConfig, seed: u64, catalog: Catalog) -> Self {
        let mut world = World::new(&config, seed);
        let start = world.bounds.center();
        world.center_camera(start);
        let player = Player::new(&config.player, &config.progression, start);
        let clock = SimClock::new();
        Self {
            seed,
            spawners: Spawners::new(&config, player.level, clock.now()),
            arsenal: Arsenal::new(&config),
            contact: ContactDamage::default(),
            progression: Progression::new(catalog),
            base_config: config.clone(),
            config,
            preset: StressPreset::Off,
            clock,
            player,
            world,
            kills: 0,
        }
    }

    pub fn phase(&self) -> GamePhase {
        match self.progression.phase {
            Phase::GameOver => GamePhase::GameOver,
            Phase::LevelingUp { .. } => GamePhase::LevelingUp,
            Phase::RelicSelection(_) => GamePhase::RelicSelection,
            Phase::Active if self.clock.is_paused() => GamePhase::Paused,
            Phase::Active => GamePhase::Playing,
        }
    }

    #[inline]
    pub fn is_paused(&self) -> bool {
        self.clock.is_paused()
    }

    #[inline]
    pub fn is_game_over(&self) -> bool {
        self.progression.phase == Phase::GameOver
    }

    pub fn events(&self) -> &EventQueue {
        &self.world.events
    }

    /// Take the queued events, oldest first
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.world.events.drain().collect()
    }

    pub fn upgrade_choices(&self) -> Option<&[&'static str]> {
        self.progression.choices()
    }

    pub fn relic_reveal(&self) -> Option<&RelicReveal> {
        self.progression.reveal()
    }

    pub fn summary(&self) -> RunSummary {
        RunSummary {
            ticks: self.clock.ticks(),
            sim_secs: self.clock.now(),
            level: self.player.level,
            health: self.player.health,
            enemies: self.world.enemies.count_active(),
            projectiles: self.arsenal.blaster.projectiles.count_active(),
            orbs: self.world.orbs.count_active(),
            chests: self.world.chests.count_active(),
            kills: self.kills,
        }
    }

    /// Split borrows for progression operations
    pub(crate) fn progression_parts(&mut self) -> (&mut Progression, ProgressionCtx<'_>) {
        (
            &mut self.progression,
            ProgressionCtx {
                player: &mut self.player,
                world: &mut self.world,
                clock: &mut self.clock,
                config: &self.config,
            },
        )
    }

    /// Toggle the manual pause hold. Ignored once the run is over.
    pub fn toggle_pause(&mut self) {
        if self.is_game_over() {
            return;
        }
        let reason = PauseReason::Manual;
        if self.clock.is_held_by(reason) {
            self.clock.resume(reason);
            self.world.events.emit(GameEvent::Resumed { reason });
        } else {
            self.clock.pause(reason);
            self.world.events.emit(GameEvent::Paused { reason });
        }
    }

    /// Grant raw experience as if collected from orbs
    pub fn gain_experience(&mut self, raw: f32) {
        let (progression, mut ctx) = self.progression_parts();
        progression.gain_experience(&mut ctx, raw);
    }

    /// Apply an offered upgrade and resume if no more prompts are owed
    pub fn select_upgrade(&mut self, id: &str) -> SimResult<()> {
        let (progression, mut ctx) = self.progression_parts();
        progression.select_upgrade(&mut ctx, id)
    }

    /// Open a relic chest as if picked up at the player's position
    pub fn open_chest(&mut self) {
        let pos = self.player.pos;
        let (progression, mut ctx) = self.progression_parts();
        progression.open_chest(&mut ctx, pos);
    }

    pub fn skip_relic_reveal(&mut self) -> SimResult<()> {
        self.progression.skip_relic_reveal()
    }

    pub fn claim_relic(&mut self) -> SimResult<&'static str> {
        let (progression, mut ctx) = self.progression_parts();
        progression.claim_relic(&mut ctx)
    }

    /// Swap the stress preset. Pools grow, spawners pick up the new intervals
    /// from their next cycle, and active entities are kept.
    pub fn set_stress_preset(&mut self, preset: StressPreset) {
        self.config = self.base_config.with_preset(preset);
        self.preset = preset;
        self.world.reconfigure(&self.config);
        self.spawners.reconfigure(&self.config, self.player.level);
        self.arsenal.reconfigure(&self.config);
        self.player.stress_invulnerable = preset.invulnerable();
        log::info!(
            "Stress preset {} (population x{}, intervals x{})",
            preset.as_str(),
            preset.population_multiplier(),
            preset.interval_multiplier()
        );
        self.world.events.emit(GameEvent::PresetChanged { preset });
    }

    /// Player died this tick
    pub(crate) fn end_run(&mut self) {
        self.progression.end_run();
        let survived_secs = self.clock.now();
        log::info!(
            "Game over at level {} after {:.1}s ({} kills)",
            self.player.level,
            survived_secs,
            self.kills
        );
        self.world.events.emit(GameEvent::PlayerDied {
            pos: self.player.pos,
            level: self.player.level,
            survived_secs,
        });
    }

    /// Position the player (used by scenario setups)
    pub fn place_player(&mut self, pos: Vec2) {
        self.player.pos = self.world.bounds.clamp(pos);
        self.world.center_camera(self.player.pos);
    }
}
