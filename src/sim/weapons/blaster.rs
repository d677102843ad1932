//! Ranged projectile weapon
//!
//! Fires a fan of `projectile_count` shots around the player's facing.
//! Projectiles fly straight until their lifespan ends, they leave the cull
//! area, or their pierce is used up. Each projectile damages a given enemy at
//! most once and spends one pierce per enemy hit.

use glam::Vec2;

use super::{WeaponContext, cadence_due, strike};
use crate::config::BlasterConfig;
use crate::sim::combat::{DamageSource, EnemyOutcome};
use crate::sim::entity::Projectile;
use crate::sim::events::GameEvent;
use crate::sim::geom::circles_overlap;
use crate::sim::player::WeaponKind;
use crate::sim::pool::Pool;
use crate::sim::world::World;
use crate::{angle_of, direction_from_angle};

#[derive(Debug, Clone)]
pub struct Blaster {
    pub projectiles: Pool<Projectile>,
    cadence: Option<crate::sim::clock::Cadence>,
    projectile_slots: Vec<usize>,
    enemy_slots: Vec<usize>,
}

/// Headings of a volley of `count` shots centered on `facing`
pub fn fan_directions(facing: Vec2, count: u32, spread: f32) -> impl Iterator<Item = Vec2> {
    let center = angle_of(facing);
    let half = (count.max(1) - 1) as f32 * 0.5;
    (0..count.max(1)).map(move |i| direction_from_angle(center + (i as f32 - half) * spread))
}

impl Blaster {
    pub fn new(config: &BlasterConfig) -> Self {
        Self {
            projectiles: Pool::with_capacity(config.capacity),
            cadence: None,
            projectile_slots: Vec::new(),
            enemy_slots: Vec::new(),
        }
    }

    pub fn reconfigure(&mut self, config: &BlasterConfig) {
        self.projectiles.grow_to(config.capacity);
    }

    /// Sim time of the next volley, once the cadence has started
    pub fn next_fire_at(&self) -> Option<f32> {
        self.cadence.as_ref().map(|c| c.next_at())
    }

    /// Spawn one volley. Shots that find no free slot are skipped.
    pub fn fire(&mut self, ctx: &WeaponContext<'_>, world: &mut World) -> usize {
        let cfg = &ctx.config.weapons.blaster;
        let player = ctx.player;
        let damage = ctx.damage(WeaponKind::Blaster, cfg.damage);
        let radius = cfg.radius * player.modifiers.projectile_size;
        let pierce = cfg.pierce + player.modifiers.pierce_bonus;

        let mut fired = 0;
        for dir in fan_directions(player.facing, player.modifiers.projectile_count, cfg.spread_radians)
        {
            let spawned = self.projectiles.spawn_with(|p| {
                p.pos = player.pos;
                p.vel = dir * cfg.speed;
                p.damage = damage;
                p.radius = radius;
                p.pierce_remaining = pierce;
                p.lifespan = cfg.lifespan_secs;
            });
            if spawned.is_some() {
                fired += 1;
            }
        }
        if fired > 0 {
            world.events.emit(GameEvent::WeaponFired {
                weapon: WeaponKind::Blaster,
                pos: player.pos,
            });
        } else {
            log::debug!("Projectile pool exhausted; volley skipped");
        }
        fired
    }

    /// Fire if due (and `armed`), then move and resolve every projectile.
    /// Returns the number of kills.
    pub fn update(&mut self, ctx: &WeaponContext<'_>, world: &mut World, armed: bool) -> usize {
        let cfg = &ctx.config.weapons.blaster;
        if armed {
            let interval = ctx.interval(WeaponKind::Blaster, cfg.interval_secs);
            if cadence_due(&mut self.cadence, ctx.now, interval) {
                self.fire(ctx, world);
            }
        }

        let cull = world.camera.expand(cfg.cull_margin);
        self.projectiles.active_slots_into(&mut self.projectile_slots);
        let mut kills = 0;
        for &slot in &self.projectile_slots {
            let Some(p) = self.projectiles.get_mut(slot) else {
                continue;
            };
            p.pos += p.vel * ctx.dt;
            p.lifespan -= ctx.dt;
            if p.lifespan <= 0.0 || !cull.contains(p.pos) {
                self.projectiles.release(slot);
                continue;
            }

            world.enemies.active_slots_into(&mut self.enemy_slots);
            for &enemy_slot in &self.enemy_slots {
                let Some(handle) = world.enemies.handle(enemy_slot) else {
                    continue;
                };
                if p.hit.contains(&handle) {
                    continue;
                }
                let Some(enemy) = world.enemies.get(enemy_slot) else {
                    continue;
                };
                if !circles_overlap(p.pos, p.radius, enemy.pos, enemy.radius) {
                    continue;
                }
                let source = DamageSource {
                    weapon: WeaponKind::Blaster,
                    origin: p.pos - p.vel,
                    knockback: 0.0,
                };
                if strike(world, enemy_slot, p.damage, &source, ctx.config)
                    == Some(EnemyOutcome::Killed)
                {
                    kills += 1;
                }
                p.hit.push(handle);
                p.pierce_remaining = p.pierce_remaining.saturating_sub(1);
                if p.pierce_remaining == 0 {
                    break;
                }
            }
            if p.pierce_remaining == 0 {
                self.projectiles.release(slot);
            }
        }
        kills
    }
}
