//! Experience, level-ups, and the relic reveal
//!
//! ```text
//!            gain ≥ threshold                 upgrade selected, none owed
//!   Active ───────────────────▶ LevelingUp ─────────────────────────────▶ Active
//!     │                            │   ▲
//!     │ chest opened               └───┘ upgrade selected, more owed
//!     ▼
//!   RelicSelection ──claim──▶ Active
//! ```
//!
//! Crossing a threshold is resolved in a loop: every threshold one gain
//! crosses raises the level immediately and owes one upgrade prompt. Only the
//! first prompt pauses the clock; the rest are shown one after another as
//! each selection is made. Chests opened while any prompt is open wait in a
//! queue.

use glam::Vec2;
use rand::Rng;

use super::clock::{PauseReason, SimClock};
use super::events::GameEvent;
use super::player::Player;
use super::upgrades::Catalog;
use super::world::World;
use crate::config::SimConfig;
use crate::error::{SimError, SimResult};

/// Cosmetic reveal of a relic that is already applied
#[derive(Debug, Clone, PartialEq)]
pub struct RelicReveal {
    /// The awarded relic
    pub id: &'static str,
    /// Relics shown while the reveal cycles
    pub candidates: Vec<&'static str>,
    /// Real seconds since the reveal started
    pub elapsed: f32,
    pub duration: f32,
    pub cycle_secs: f32,
}

impl RelicReveal {
    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.duration
    }

    /// Relic currently on display. Derived from elapsed time only, so
    /// skipping never changes what was awarded.
    pub fn displayed(&self) -> &'static str {
        if self.is_finished() || self.candidates.is_empty() {
            return self.id;
        }
        let step = (self.elapsed / self.cycle_secs) as usize;
        self.candidates[step % self.candidates.len()]
    }

    pub fn skip(&mut self) {
        self.elapsed = self.duration;
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Phase {
    Active,
    LevelingUp { choices: Vec<&'static str> },
    RelicSelection(RelicReveal),
    GameOver,
}

/// Borrowed game state the progression operations act on
pub struct ProgressionCtx<'a> {
    pub player: &'a mut Player,
    pub world: &'a mut World,
    pub clock: &'a mut SimClock,
    pub config: &'a SimConfig,
}

#[derive(Debug, Clone)]
pub struct Progression {
    pub phase: Phase,
    pub catalog: Catalog,
    /// Upgrade prompts owed, including the one on screen
    pending_level_ups: u32,
    /// Chests opened while a prompt was open
    pending_chests: u32,
}

impl Default for Progression {
    fn default() -> Self {
        Self::new(Catalog::standard())
    }
}

impl Progression {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            phase: Phase::Active,
            catalog,
            pending_level_ups: 0,
            pending_chests: 0,
        }
    }

    pub fn pending_level_ups(&self) -> u32 {
        self.pending_level_ups
    }

    pub fn pending_chests(&self) -> u32 {
        self.pending_chests
    }

    pub fn is_active(&self) -> bool {
        self.phase == Phase::Active
    }

    /// Choices of the open upgrade prompt
    pub fn choices(&self) -> Option<&[&'static str]> {
        match &self.phase {
            Phase::LevelingUp { choices } => Some(choices),
            _ => None,
        }
    }

    pub fn reveal(&self) -> Option<&RelicReveal> {
        match &self.phase {
            Phase::RelicSelection(reveal) => Some(reveal),
            _ => None,
        }
    }

    /// Add raw experience (scaled by the player's gain modifier) and resolve
    /// any level-ups it causes
    pub fn gain_experience(&mut self, ctx: &mut ProgressionCtx<'_>, raw: f32) {
        if raw <= 0.0 || self.phase == Phase::GameOver {
            return;
        }
        let gained = raw * ctx.player.modifiers.experience_gain;
        ctx.player.experience += gained;
        ctx.world.events.emit(GameEvent::ExperienceCollected {
            value: gained,
            total: ctx.player.experience,
        });
        self.check_level_up(ctx);
    }

    /// Apply every threshold the current experience crosses, then open a
    /// prompt if one is owed and none is showing
    pub fn check_level_up(&mut self, ctx: &mut ProgressionCtx<'_>) {
        self.apply_thresholds(ctx);
        if self.pending_level_ups > 0 && !ctx.player.is_leveling_up && self.is_active() {
            self.open_prompt(ctx);
        }
    }

    fn apply_thresholds(&mut self, ctx: &mut ProgressionCtx<'_>) {
        let growth = ctx.config.progression.growth_factor;
        let player = &mut *ctx.player;
        while player.experience >= player.experience_to_next_level {
            player.experience -= player.experience_to_next_level;
            player.level += 1;
            player.experience_to_next_level *= growth;
            self.pending_level_ups += 1;
            log::info!("Level up: {}", player.level);
            ctx.world.events.emit(GameEvent::LevelUp {
                level: player.level,
            });
        }
    }

    fn open_prompt(&mut self, ctx: &mut ProgressionCtx<'_>) {
        let count = ctx.config.progression.choices_per_level;
        let choices = self
            .catalog
            .sample_choices(ctx.player, count, &mut ctx.world.rng);
        if choices.is_empty() {
            log::warn!(
                "Upgrade pool exhausted; dropping {} owed prompt(s)",
                self.pending_level_ups
            );
            self.pending_level_ups = 0;
            self.close_prompt(ctx);
            return;
        }
        ctx.world.events.emit(GameEvent::UpgradeOffered {
            choices: choices.iter().map(|id| id.to_string()).collect(),
        });
        self.phase = Phase::LevelingUp { choices };
        if !ctx.player.is_leveling_up {
            ctx.player.is_leveling_up = true;
            if ctx.clock.pause(PauseReason::LevelUp) {
                ctx.world.events.emit(GameEvent::Paused {
                    reason: PauseReason::LevelUp,
                });
            }
        }
    }

    fn close_prompt(&mut self, ctx: &mut ProgressionCtx<'_>) {
        if self.phase != Phase::GameOver {
            self.phase = Phase::Active;
        }
        if ctx.player.is_leveling_up {
            ctx.player.is_leveling_up = false;
            if ctx.clock.resume(PauseReason::LevelUp) {
                ctx.world.events.emit(GameEvent::Resumed {
                    reason: PauseReason::LevelUp,
                });
            }
        }
        self.resolve_backlog(ctx);
    }

    /// Apply one of the offered upgrades
    pub fn select_upgrade(&mut self, ctx: &mut ProgressionCtx<'_>, id: &str) -> SimResult<()> {
        let Phase::LevelingUp { choices } = &self.phase else {
            return Err(SimError::NoPendingSelection);
        };
        let Some(index) = self.catalog.find(id) else {
            log::warn!("Unknown upgrade id {id:?}; selection ignored");
            return Err(SimError::UnknownUpgrade(id.to_string()));
        };
        if !choices.iter().any(|&offered| offered == id) {
            log::warn!("Upgrade {id:?} was not offered; selection ignored");
            return Err(SimError::UpgradeNotOffered(id.to_string()));
        }

        let level = self.catalog.apply(index, ctx.player);
        log::info!("Upgrade {id} now level {level}");
        ctx.world.events.emit(GameEvent::UpgradeApplied {
            id: id.to_string(),
            level,
        });
        self.pending_level_ups = self.pending_level_ups.saturating_sub(1);

        // Re-run the threshold loop; the prompt (and pause) stays up while
        // more are owed
        self.phase = Phase::Active;
        self.apply_thresholds(ctx);
        if self.pending_level_ups > 0 {
            self.open_prompt(ctx);
        } else {
            self.close_prompt(ctx);
        }
        Ok(())
    }

    /// A chest was picked up. Awards a relic now, or later if a prompt is
    /// open; with no relic left it grants flat experience instead.
    pub fn open_chest(&mut self, ctx: &mut ProgressionCtx<'_>, pos: Vec2) {
        if !self.is_active() {
            if self.phase != Phase::GameOver {
                self.pending_chests += 1;
            }
            return;
        }
        let relics = self.catalog.available_relics(ctx.player);
        if relics.is_empty() {
            let bonus = ctx.config.pickups.empty_chest_experience as f32;
            log::warn!("No relic left for chest at {pos}; granting {bonus} experience");
            self.gain_experience(ctx, bonus);
            return;
        }

        let index = relics[ctx.world.rng.random_range(0..relics.len())];
        let candidates = relics.iter().map(|&i| self.catalog.def(i).id).collect();
        // Committed now; the reveal only replays it
        self.catalog.apply(index, ctx.player);
        let id = self.catalog.def(index).id;
        log::info!("Relic awarded: {id}");
        ctx.world.events.emit(GameEvent::RelicRevealed { id: id.to_string() });
        self.phase = Phase::RelicSelection(RelicReveal {
            id,
            candidates,
            elapsed: 0.0,
            duration: ctx.config.progression.relic_reveal_secs,
            cycle_secs: ctx.config.progression.relic_cycle_secs,
        });
        if ctx.clock.pause(PauseReason::RelicSelection) {
            ctx.world.events.emit(GameEvent::Paused {
                reason: PauseReason::RelicSelection,
            });
        }
    }

    /// Advance the reveal animation by real frame time
    pub fn advance_reveal(&mut self, real_dt: f32) {
        if let Phase::RelicSelection(reveal) = &mut self.phase {
            reveal.elapsed = (reveal.elapsed + real_dt).min(reveal.duration);
        }
    }

    /// Fast-forward the reveal to its end
    pub fn skip_relic_reveal(&mut self) -> SimResult<()> {
        match &mut self.phase {
            Phase::RelicSelection(reveal) => {
                reveal.skip();
                Ok(())
            }
            _ => Err(SimError::NoPendingSelection),
        }
    }

    /// Dismiss the reveal and resume. Returns the awarded relic.
    pub fn claim_relic(&mut self, ctx: &mut ProgressionCtx<'_>) -> SimResult<&'static str> {
        let Phase::RelicSelection(reveal) = &self.phase else {
            return Err(SimError::NoPendingSelection);
        };
        let id = reveal.id;
        ctx.world.events.emit(GameEvent::RelicClaimed { id: id.to_string() });
        self.phase = Phase::Active;
        if ctx.clock.resume(PauseReason::RelicSelection) {
            ctx.world.events.emit(GameEvent::Resumed {
                reason: PauseReason::RelicSelection,
            });
        }
        self.resolve_backlog(ctx);
        Ok(id)
    }

    /// Open whatever was queued while a prompt was showing
    fn resolve_backlog(&mut self, ctx: &mut ProgressionCtx<'_>) {
        if !self.is_active() {
            return;
        }
        if self.pending_level_ups > 0 {
            self.open_prompt(ctx);
        } else if self.pending_chests > 0 {
            self.pending_chests -= 1;
            let pos = ctx.player.pos;
            self.open_chest(ctx, pos);
        }
    }

    /// Terminal state after the player dies
    pub fn end_run(&mut self) {
        self.phase = Phase::GameOver;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixture {
        config: SimConfig,
        player: Player,
        world: World,
        clock: SimClock,
        progression: Progression,
    }

    impl Fixture {
        fn new() -> Self {
            let config = SimConfig::default();
            Self {
                player: Player::new(&config.player, &config.progression, Vec2::ZERO),
                world: World::new(&config, 7),
                clock: SimClock::new(),
                progression: Progression::default(),
                config,
            }
        }

        fn run<R>(&mut self, f: impl FnOnce(&mut Progression, &mut ProgressionCtx<'_>) -> R) -> R {
            let mut ctx = ProgressionCtx {
                player: &mut self.player,
                world: &mut self.world,
                clock: &mut self.clock,
                config: &self.config,
            };
            f(&mut self.progression, &mut ctx)
        }

        fn first_choice(&self) -> &'static str {
            self.progression.choices().unwrap()[0]
        }
    }

    #[test]
    fn threshold_crossing_pauses_and_offers_choices() {
        let mut fx = Fixture::new();
        fx.run(|p, ctx| p.gain_experience(ctx, 12.0));
        assert_eq!(fx.player.level, 2);
        assert!((fx.player.experience - 2.0).abs() < 1e-4);
        assert!((fx.player.experience_to_next_level - 18.0).abs() < 1e-4);
        assert!(fx.clock.is_paused());
        assert!(fx.player.is_leveling_up);
        assert_eq!(fx.progression.choices().unwrap().len(), 3);

        let id = fx.first_choice();
        fx.run(|p, ctx| p.select_upgrade(ctx, id)).unwrap();
        assert!(fx.progression.is_active());
        assert!(!fx.clock.is_paused());
        assert!(!fx.player.is_leveling_up);
        assert_eq!(fx.progression.catalog.level_of(id), Some(1));
    }

    #[test]
    fn double_threshold_owes_two_prompts() {
        let mut fx = Fixture::new();
        // 10 + 18 = 28 crosses two thresholds
        fx.run(|p, ctx| p.gain_experience(ctx, 30.0));
        assert_eq!(fx.player.level, 3);
        assert_eq!(
            fx.world.events.count(|e| matches!(e, GameEvent::LevelUp { .. })),
            2
        );
        assert_eq!(fx.progression.pending_level_ups(), 2);
        assert_eq!(
            fx.world.events.count(|e| matches!(e, GameEvent::Paused { .. })),
            1
        );

        let id = fx.first_choice();
        fx.run(|p, ctx| p.select_upgrade(ctx, id)).unwrap();
        assert!(fx.progression.choices().is_some());
        assert!(fx.clock.is_paused());

        let id = fx.first_choice();
        fx.run(|p, ctx| p.select_upgrade(ctx, id)).unwrap();
        assert!(fx.progression.is_active());
        assert!(!fx.clock.is_paused());
        assert_eq!(fx.progression.pending_level_ups(), 0);
    }

    #[test]
    fn bad_selections_are_rejected_without_effect() {
        let mut fx = Fixture::new();
        assert!(matches!(
            fx.run(|p, ctx| p.select_upgrade(ctx, "armor")),
            Err(SimError::NoPendingSelection)
        ));
        fx.run(|p, ctx| p.gain_experience(ctx, 10.0));
        assert!(matches!(
            fx.run(|p, ctx| p.select_upgrade(ctx, "no_such_upgrade")),
            Err(SimError::UnknownUpgrade(_))
        ));
        // A real id that is not in the offer
        let offered = fx.progression.choices().unwrap().to_vec();
        let other = (0..fx.progression.catalog.len())
            .map(|i| fx.progression.catalog.def(i).id)
            .find(|id| !offered.contains(id))
            .unwrap();
        assert!(matches!(
            fx.run(|p, ctx| p.select_upgrade(ctx, other)),
            Err(SimError::UpgradeNotOffered(_))
        ));
        assert!(fx.clock.is_paused());
        assert_eq!(fx.progression.catalog.level_of(other), Some(0));
    }

    #[test]
    fn relic_is_committed_when_reveal_starts() {
        let mut fx = Fixture::new();
        fx.run(|p, ctx| p.open_chest(ctx, Vec2::ZERO));
        let reveal = fx.progression.reveal().unwrap().clone();
        assert!(fx.clock.is_held_by(PauseReason::RelicSelection));
        assert_eq!(fx.progression.catalog.level_of(reveal.id), Some(1));

        fx.progression.skip_relic_reveal().unwrap();
        assert_eq!(fx.progression.reveal().unwrap().displayed(), reveal.id);
        let claimed = fx.run(|p, ctx| p.claim_relic(ctx)).unwrap();
        assert_eq!(claimed, reveal.id);
        assert!(!fx.clock.is_paused());
        assert!(fx.progression.is_active());
    }

    #[test]
    fn reveal_cycles_without_touching_outcome() {
        let mut reveal = RelicReveal {
            id: "b",
            candidates: vec!["a", "b", "c"],
            elapsed: 0.0,
            duration: 1.0,
            cycle_secs: 0.1,
        };
        assert_eq!(reveal.displayed(), "a");
        reveal.elapsed = 0.25;
        assert_eq!(reveal.displayed(), "c");
        reveal.skip();
        assert!(reveal.is_finished());
        assert_eq!(reveal.displayed(), "b");
    }

    #[test]
    fn chest_during_level_up_is_queued() {
        let mut fx = Fixture::new();
        fx.run(|p, ctx| p.gain_experience(ctx, 10.0));
        fx.run(|p, ctx| p.open_chest(ctx, Vec2::ZERO));
        assert_eq!(fx.progression.pending_chests(), 1);
        assert!(fx.progression.reveal().is_none());

        let id = fx.first_choice();
        fx.run(|p, ctx| p.select_upgrade(ctx, id)).unwrap();
        assert!(fx.progression.reveal().is_some());
        assert_eq!(fx.progression.pending_chests(), 0);
        assert!(fx.clock.is_held_by(PauseReason::RelicSelection));
        assert!(!fx.clock.is_held_by(PauseReason::LevelUp));
    }

    #[test]
    fn empty_relic_pool_grants_experience() {
        let mut fx = Fixture::new();
        fx.progression = Progression::new(Catalog::new(Vec::new()));
        fx.run(|p, ctx| p.open_chest(ctx, Vec2::ZERO));
        assert!(fx.progression.is_active());
        assert!(!fx.clock.is_paused());
        // 25 experience is one level-up, but the empty catalog offers nothing
        assert_eq!(fx.player.level, 2);
        assert_eq!(fx.progression.pending_level_ups(), 0);
    }

    #[test]
    fn level_up_does_not_clear_manual_pause() {
        let mut fx = Fixture::new();
        fx.clock.pause(PauseReason::Manual);
        fx.run(|p, ctx| p.gain_experience(ctx, 10.0));
        let id = fx.first_choice();
        fx.run(|p, ctx| p.select_upgrade(ctx, id)).unwrap();
        assert!(fx.clock.is_paused());
        assert!(fx.clock.is_held_by(PauseReason::Manual));
    }
}
