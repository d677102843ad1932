//! Per-frame simulation tick
//!
//! Order within one tick: spawn, move, fire and resolve weapons, contact
//! damage, pickups, progression. A level-up raised during the tick pauses the
//! clock from the next tick on.

use glam::Vec2;

use super::movement::update_enemies;
use super::pickups::update_pickups;
use super::player::DamageTaken;
use super::progression::ProgressionCtx;
use super::state::GameState;
use super::weapons::WeaponContext;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Desired movement direction; any length, zero to stand still
    pub movement: Vec2,
    /// Pause toggle
    pub pause: bool,
}

/// Advance the game state by one frame of `dt` seconds
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    state.world.events.clear();

    if input.pause {
        state.toggle_pause();
    }

    // The relic reveal plays on real time, paused or not
    state.progression.advance_reveal(dt);

    // Don't tick if paused or game over
    if state.is_game_over() || !state.clock.advance(dt) {
        return;
    }
    let now = state.clock.now();

    state.player.step(input.movement, dt, &state.world.bounds);
    state.world.center_camera(state.player.pos);

    let spawned = state.spawners.update(
        now,
        state.player.level,
        &state.config,
        state.player.pos,
        &mut state.world,
    );

    let despawned = update_enemies(
        &mut state.world,
        state.player.pos,
        &state.config.movement,
        state.config.viewport.offscreen_margin,
        dt,
    );

    let ctx = WeaponContext {
        now,
        dt,
        config: &state.config,
        player: &state.player,
    };
    let kills = state.arsenal.update(&ctx, &mut state.world);
    state.kills += kills as u64;

    let contact = state.contact.update(
        now,
        state.config.player.contact_interval_secs,
        &mut state.player,
        &mut state.world,
    );
    if let DamageTaken::Killed(_) = contact {
        state.end_run();
        return;
    }

    let collected = update_pickups(&mut state.world, &state.player, &state.config.pickups, dt);
    let mut ctx = ProgressionCtx {
        player: &mut state.player,
        world: &mut state.world,
        clock: &mut state.clock,
        config: &state.config,
    };
    if collected.experience > 0 {
        state
            .progression
            .gain_experience(&mut ctx, collected.experience as f32);
    }
    for pos in collected.chests {
        state.progression.open_chest(&mut ctx, pos);
    }

    log::trace!(
        "tick {} t={now:.2}s spawned={spawned} despawned={despawned} kills={kills} enemies={}",
        state.clock.ticks(),
        state.world.enemies.count_active()
    );
}
