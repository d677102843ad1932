//! Orbiting drone
//!
//! Revolves around the player continuously. The set of enemies hit is cleared
//! exactly when the orbit angle wraps past a full turn, so any one enemy is
//! damaged at most once per revolution.

use std::f32::consts::TAU;

use glam::Vec2;

use super::{WeaponContext, strike};
use crate::direction_from_angle;
use crate::sim::combat::{DamageSource, EnemyOutcome};
use crate::sim::geom::circles_overlap;
use crate::sim::player::WeaponKind;
use crate::sim::pool::Handle;
use crate::sim::world::World;

#[derive(Debug, Clone, Default)]
pub struct Drone {
    /// Orbit angle in `[0, TAU)`
    pub angle: f32,
    pub pos: Vec2,
    /// Completed revolutions
    pub revolutions: u32,
    hit_this_revolution: Vec<Handle>,
    slots: Vec<usize>,
}

impl Drone {
    pub fn update(&mut self, ctx: &WeaponContext<'_>, world: &mut World) -> usize {
        let cfg = &ctx.config.weapons.drone;
        let player = ctx.player;
        let speed = cfg.angular_speed * player.modifiers.attack_speed[WeaponKind::Drone];
        self.angle += speed * ctx.dt;
        while self.angle >= TAU {
            self.angle -= TAU;
            self.revolutions += 1;
            self.hit_this_revolution.clear();
        }
        self.pos = player.pos + direction_from_angle(self.angle) * cfg.orbit_radius;

        let damage = ctx.damage(WeaponKind::Drone, cfg.damage);
        let source = DamageSource {
            weapon: WeaponKind::Drone,
            origin: player.pos,
            knockback: 0.0,
        };
        world.enemies.active_slots_into(&mut self.slots);
        let mut kills = 0;
        for &slot in &self.slots {
            let Some(handle) = world.enemies.handle(slot) else {
                continue;
            };
            if self.hit_this_revolution.contains(&handle) {
                continue;
            }
            let touching = world
                .enemies
                .get(slot)
                .is_some_and(|e| circles_overlap(self.pos, cfg.hit_radius, e.pos, e.radius));
            if !touching {
                continue;
            }
            self.hit_this_revolution.push(handle);
            if strike(world, slot, damage, &source, ctx.config) == Some(EnemyOutcome::Killed) {
                kills += 1;
            }
        }
        kills
    }
}
