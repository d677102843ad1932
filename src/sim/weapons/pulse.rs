//! Area pulse: instant damage and outward knockback in a radius

use super::{WeaponContext, cadence_due, strike};
use crate::sim::clock::Cadence;
use crate::sim::combat::{DamageSource, EnemyOutcome};
use crate::sim::events::GameEvent;
use crate::sim::geom::circles_overlap;
use crate::sim::player::WeaponKind;
use crate::sim::world::World;

#[derive(Debug, Clone, Default)]
pub struct Pulse {
    cadence: Option<Cadence>,
    slots: Vec<usize>,
}

impl Pulse {
    /// Damage and push every enemy touching the pulse radius. Returns the
    /// number of kills.
    pub fn emit(&mut self, ctx: &WeaponContext<'_>, world: &mut World) -> usize {
        let cfg = &ctx.config.weapons.pulse;
        let player = ctx.player;
        let radius = cfg.radius * player.modifiers.area[WeaponKind::Pulse];
        let damage = ctx.damage(WeaponKind::Pulse, cfg.damage);
        let source = DamageSource {
            weapon: WeaponKind::Pulse,
            origin: player.pos,
            knockback: cfg.knockback,
        };
        world.events.emit(GameEvent::WeaponFired {
            weapon: WeaponKind::Pulse,
            pos: player.pos,
        });

        // Membership is decided before any damage is applied
        world.enemies.active_slots_into(&mut self.slots);
        let enemies = &world.enemies;
        self.slots.retain(|&slot| {
            enemies
                .get(slot)
                .is_some_and(|e| circles_overlap(player.pos, radius, e.pos, e.radius))
        });

        let mut kills = 0;
        for &slot in &self.slots {
            if strike(world, slot, damage, &source, ctx.config) == Some(EnemyOutcome::Killed) {
                kills += 1;
            }
        }
        kills
    }

    pub fn update(&mut self, ctx: &WeaponContext<'_>, world: &mut World) -> usize {
        let interval = ctx.interval(WeaponKind::Pulse, ctx.config.weapons.pulse.interval_secs);
        if cadence_due(&mut self.cadence, ctx.now, interval) {
            self.emit(ctx, world)
        } else {
            0
        }
    }
}
