//! Autonomous weapon systems
//!
//! Each weapon owns its firing cadence and effect state. Damage is
//! `base * player damage multiplier` and the critical roll is made per target
//! at the moment of impact. Cadences are `base interval / attack speed`,
//! floored at `MIN_ATTACK_INTERVAL`.

pub mod blaster;
pub mod drone;
pub mod pulse;
pub mod roller;
pub mod slash;

pub use blaster::Blaster;
pub use drone::Drone;
pub use pulse::Pulse;
pub use roller::{Roller, RollerState};
pub use slash::Slash;

use super::clock::{Cadence, attack_interval};
use super::combat::{DamageSource, EnemyOutcome, damage_enemy, roll_hit};
use super::player::{Player, WeaponKind};
use super::world::World;
use crate::config::SimConfig;

/// Read-only inputs shared by every weapon for one tick
#[derive(Debug, Clone, Copy)]
pub struct WeaponContext<'a> {
    /// Simulated time
    pub now: f32,
    pub dt: f32,
    pub config: &'a SimConfig,
    pub player: &'a Player,
}

impl WeaponContext<'_> {
    /// Pre-crit damage of `weapon` given its configured base damage
    #[inline]
    pub fn damage(&self, weapon: WeaponKind, base: f32) -> f32 {
        base * self.player.modifiers.damage[weapon]
    }

    #[inline]
    pub fn interval(&self, weapon: WeaponKind, base: f32) -> f32 {
        attack_interval(base, self.player.modifiers.attack_speed[weapon])
    }
}

/// Roll and apply one weapon hit on the enemy in `slot`
pub(crate) fn strike(
    world: &mut World,
    slot: usize,
    damage: f32,
    source: &DamageSource,
    config: &SimConfig,
) -> Option<EnemyOutcome> {
    let hit = roll_hit(&mut world.rng, damage, &config.weapons.crit);
    damage_enemy(world, slot, hit, source, config)
}

/// Advance a weapon cadence, creating it on first use. The current interval
/// is stored each tick so a changed attack speed applies from the next cycle.
pub(crate) fn cadence_due(cadence: &mut Option<Cadence>, now: f32, interval: f32) -> bool {
    let cadence = cadence.get_or_insert_with(|| Cadence::starting_at(now, interval));
    cadence.set_interval(interval);
    cadence.fire(now)
}

/// Every weapon the player may own
#[derive(Debug, Clone)]
pub struct Arsenal {
    pub blaster: Blaster,
    pub slash: Slash,
    pub pulse: Pulse,
    pub drone: Drone,
    pub roller: Roller,
}

impl Arsenal {
    pub fn new(config: &SimConfig) -> Self {
        Self {
            blaster: Blaster::new(&config.weapons.blaster),
            slash: Slash::new(&config.weapons.slash),
            pulse: Pulse::default(),
            drone: Drone::default(),
            roller: Roller::default(),
        }
    }

    /// Grow effect pools after a config swap
    pub fn reconfigure(&mut self, config: &SimConfig) {
        self.blaster.reconfigure(&config.weapons.blaster);
        self.slash.reconfigure(&config.weapons.slash);
    }

    /// Fire and resolve every owned weapon. Returns the number of kills.
    pub fn update(&mut self, ctx: &WeaponContext<'_>, world: &mut World) -> usize {
        let player = ctx.player;
        let mut kills = 0;
        // Projectiles in flight resolve even if nothing new is fired
        kills += self.blaster.update(ctx, world, player.has(WeaponKind::Blaster));
        kills += self.slash.update(ctx, world, player.has(WeaponKind::Slash));
        if player.has(WeaponKind::Pulse) {
            kills += self.pulse.update(ctx, world);
        }
        if player.has(WeaponKind::Drone) {
            kills += self.drone.update(ctx, world);
        }
        if player.has(WeaponKind::Roller) {
            kills += self.roller.update(ctx, world);
        }
        kills
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use glam::Vec2;

    use crate::config::SimConfig;
    use crate::sim::entity::EnemyKind;
    use crate::sim::player::Player;
    use crate::sim::world::World;

    /// Config without crits, loot, or knockback so hits are exact
    pub fn quiet_config() -> SimConfig {
        let mut config = SimConfig::default();
        config.weapons.crit.chance = 0.0;
        for kind in EnemyKind::ALL {
            let archetype = match kind {
                EnemyKind::Grunt => &mut config.enemies.grunt,
                EnemyKind::Brute => &mut config.enemies.brute,
                EnemyKind::Swooper => &mut config.enemies.swooper,
            };
            archetype.orb_drop_chance = 0.0;
            archetype.relic_drop_chance = 0.0;
            archetype.knockback_resistance = 1.0;
        }
        config
    }

    pub fn player_at_origin(config: &SimConfig) -> Player {
        Player::new(&config.player, &config.progression, Vec2::ZERO)
    }

    /// Place a grunt with `health` at `pos`
    pub fn grunt(world: &mut World, config: &SimConfig, pos: Vec2, health: f32) -> usize {
        let mut archetype = config.enemies.grunt.clone();
        archetype.max_health = health;
        let slot = world
            .spawn_enemy(EnemyKind::Grunt, &archetype, pos, Vec2::ZERO)
            .expect("enemy slot");
        world.enemies.get_mut(slot).expect("active enemy").vel = Vec2::ZERO;
        slot
    }

    pub fn health(world: &World, slot: usize) -> Option<f32> {
        world.enemies.get(slot).map(|e| e.health)
    }
}
