//! Melee arc slash
//!
//! Each activation sweeps a sector in front of the player. Everything inside
//! the sector when it appears is hit once; the arc then lingers for its
//! duration without dealing further damage.

use super::{WeaponContext, cadence_due, strike};
use crate::angle_of;
use crate::config::SlashConfig;
use crate::sim::clock::Cadence;
use crate::sim::combat::{DamageSource, EnemyOutcome};
use crate::sim::entity::SlashArc;
use crate::sim::events::GameEvent;
use crate::sim::geom::circle_in_sector;
use crate::sim::player::WeaponKind;
use crate::sim::pool::Pool;
use crate::sim::world::World;

#[derive(Debug, Clone)]
pub struct Slash {
    pub arcs: Pool<SlashArc>,
    cadence: Option<Cadence>,
    slots: Vec<usize>,
}

impl Slash {
    pub fn new(config: &SlashConfig) -> Self {
        Self {
            arcs: Pool::with_capacity(config.capacity),
            cadence: None,
            slots: Vec::new(),
        }
    }

    pub fn reconfigure(&mut self, config: &SlashConfig) {
        self.arcs.grow_to(config.capacity);
    }

    /// Create an arc and resolve its hits. Returns the number of kills.
    pub fn activate(&mut self, ctx: &WeaponContext<'_>, world: &mut World) -> usize {
        let cfg = &ctx.config.weapons.slash;
        let player = ctx.player;
        let facing = angle_of(player.facing);
        let range = cfg.range * player.modifiers.area[WeaponKind::Slash];
        let Some(arc_slot) = self.arcs.spawn_with(|arc| {
            arc.origin = player.pos;
            arc.facing = facing;
            arc.range = range;
            arc.half_arc = cfg.half_arc_radians;
            arc.remaining = cfg.duration_secs;
        }) else {
            log::debug!("Slash pool exhausted; activation skipped");
            return 0;
        };
        world.events.emit(GameEvent::WeaponFired {
            weapon: WeaponKind::Slash,
            pos: player.pos,
        });

        let damage = ctx.damage(WeaponKind::Slash, cfg.damage);
        let source = DamageSource {
            weapon: WeaponKind::Slash,
            origin: player.pos,
            knockback: cfg.knockback,
        };
        world.enemies.active_slots_into(&mut self.slots);
        let mut struck = 0;
        let mut kills = 0;
        for &slot in &self.slots {
            let Some(enemy) = world.enemies.get(slot) else {
                continue;
            };
            if !circle_in_sector(
                player.pos,
                facing,
                cfg.half_arc_radians,
                range,
                enemy.pos,
                enemy.radius,
            ) {
                continue;
            }
            struck += 1;
            if strike(world, slot, damage, &source, ctx.config) == Some(EnemyOutcome::Killed) {
                kills += 1;
            }
        }
        if let Some(arc) = self.arcs.get_mut(arc_slot) {
            arc.struck = struck;
        }
        kills
    }

    pub fn update(&mut self, ctx: &WeaponContext<'_>, world: &mut World, armed: bool) -> usize {
        // Age existing arcs first so a fresh one lives its full duration
        self.arcs.active_slots_into(&mut self.slots);
        for &slot in &self.slots {
            let expired = match self.arcs.get_mut(slot) {
                Some(arc) => {
                    arc.remaining -= ctx.dt;
                    arc.remaining <= 0.0
                }
                None => false,
            };
            if expired {
                self.arcs.release(slot);
            }
        }

        if !armed {
            return 0;
        }
        let interval = ctx.interval(WeaponKind::Slash, ctx.config.weapons.slash.interval_secs);
        if cadence_due(&mut self.cadence, ctx.now, interval) {
            self.activate(ctx, world)
        } else {
            0
        }
    }
}
