//! Rolling companion
//!
//! `Idle` (trailing the player) → `Rolling` (toward the nearest enemy, or the
//! player's facing when none is in range) → `Returning` → `Idle`. A roll checks
//! collisions every tick along its path but damages each enemy at most once;
//! the hit set is cleared when the next roll starts.

use glam::Vec2;

use super::{WeaponContext, cadence_due, strike};
use crate::sim::clock::Cadence;
use crate::sim::combat::{DamageSource, EnemyOutcome};
use crate::sim::events::GameEvent;
use crate::sim::geom::{circles_overlap, direction_to};
use crate::sim::player::{Player, WeaponKind};
use crate::sim::pool::Handle;
use crate::sim::world::World;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum RollerState {
    #[default]
    Idle,
    Rolling {
        direction: Vec2,
        traveled: f32,
    },
    Returning,
}

#[derive(Debug, Clone, Default)]
pub struct Roller {
    pub state: RollerState,
    pub pos: Vec2,
    /// Rolls started so far
    pub rolls: u32,
    cadence: Option<Cadence>,
    hit_this_roll: Vec<Handle>,
    slots: Vec<usize>,
    placed: bool,
}

/// Resting spot behind the player
fn follow_point(player: &Player, distance: f32) -> Vec2 {
    player.pos - player.facing * distance
}

impl Roller {
    /// Nearest active enemy within `radius` of `from`
    fn nearest_enemy(world: &World, from: Vec2, radius: f32) -> Option<Vec2> {
        world
            .enemies
            .iter_active()
            .map(|(_, e)| e.pos)
            .filter(|pos| pos.distance_squared(from) <= radius * radius)
            .min_by(|a, b| a.distance_squared(from).total_cmp(&b.distance_squared(from)))
    }

    pub fn start_roll(&mut self, ctx: &WeaponContext<'_>, world: &mut World) {
        let cfg = &ctx.config.weapons.roller;
        let facing = ctx.player.facing;
        let direction = match Self::nearest_enemy(world, self.pos, cfg.seek_radius) {
            Some(target) => direction_to(self.pos, target, facing),
            None => facing,
        };
        self.hit_this_roll.clear();
        self.rolls += 1;
        self.state = RollerState::Rolling {
            direction,
            traveled: 0.0,
        };
        world.events.emit(GameEvent::WeaponFired {
            weapon: WeaponKind::Roller,
            pos: self.pos,
        });
    }

    pub fn update(&mut self, ctx: &WeaponContext<'_>, world: &mut World) -> usize {
        let cfg = &ctx.config.weapons.roller;
        let home = follow_point(ctx.player, cfg.follow_distance);
        if !self.placed {
            self.pos = home;
            self.placed = true;
        }

        match self.state {
            RollerState::Idle => {
                self.pos = home;
                let interval = ctx.interval(WeaponKind::Roller, cfg.interval_secs);
                if cadence_due(&mut self.cadence, ctx.now, interval) {
                    self.start_roll(ctx, world);
                }
                0
            }
            RollerState::Rolling {
                direction,
                traveled,
            } => {
                let step = (cfg.roll_speed * ctx.dt).min(cfg.travel_distance - traveled);
                self.pos += direction * step;
                let traveled = traveled + step;
                let kills = self.resolve_hits(ctx, world);
                self.state = if traveled >= cfg.travel_distance {
                    RollerState::Returning
                } else {
                    RollerState::Rolling {
                        direction,
                        traveled,
                    }
                };
                kills
            }
            RollerState::Returning => {
                let step = cfg.return_speed * ctx.dt;
                let to_home = home - self.pos;
                if to_home.length() <= step {
                    self.pos = home;
                    self.state = RollerState::Idle;
                } else {
                    self.pos += to_home.normalize_or_zero() * step;
                }
                0
            }
        }
    }

    fn resolve_hits(&mut self, ctx: &WeaponContext<'_>, world: &mut World) -> usize {
        let cfg = &ctx.config.weapons.roller;
        let damage = ctx.damage(WeaponKind::Roller, cfg.damage);
        let source = DamageSource {
            weapon: WeaponKind::Roller,
            origin: self.pos,
            knockback: 0.0,
        };
        world.enemies.active_slots_into(&mut self.slots);
        let mut kills = 0;
        for &slot in &self.slots {
            let Some(handle) = world.enemies.handle(slot) else {
                continue;
            };
            if self.hit_this_roll.contains(&handle) {
                continue;
            }
            let touching = world
                .enemies
                .get(slot)
                .is_some_and(|e| circles_overlap(self.pos, cfg.hit_radius, e.pos, e.radius));
            if !touching {
                continue;
            }
            self.hit_this_roll.push(handle);
            if strike(world, slot, damage, &source, ctx.config) == Some(EnemyOutcome::Killed) {
                kills += 1;
            }
        }
        kills
    }
}
