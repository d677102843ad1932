//! Damage resolution: critical rolls, enemy damage and death, loot drops, and
//! contact damage to the player

use glam::Vec2;
use rand::Rng;

use super::clock::Cadence;
use super::events::GameEvent;
use super::entity::Knockback;
use super::geom::{circles_overlap, direction_to};
use super::player::{DamageTaken, Player, WeaponKind};
use super::world::World;
use crate::config::{CritConfig, SimConfig};

/// Damage of one hit after the critical roll
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    pub amount: f32,
    pub critical: bool,
}

/// Roll a critical for `base` damage and round to the nearest integer.
///
/// The roll happens at impact, so every projectile or sweep target rolls on
/// its own.
pub fn roll_hit(rng: &mut impl Rng, base: f32, crit: &CritConfig) -> Hit {
    let critical = rng.random::<f32>() < crit.chance;
    let scaled = if critical { base * crit.multiplier } else { base };
    Hit {
        amount: scaled.round(),
        critical,
    }
}

/// Where a hit came from
#[derive(Debug, Clone, Copy)]
pub struct DamageSource {
    pub weapon: WeaponKind,
    /// Knockback pushes away from this point
    pub origin: Vec2,
    /// Knockback impulse speed; zero for none
    pub knockback: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EnemyOutcome {
    Survived,
    Killed,
}

/// Apply `hit` to the enemy in `slot`.
///
/// Inactive slots are ignored and return `None`: another weapon may already
/// have killed this enemy earlier in the tick.
pub fn damage_enemy(
    world: &mut World,
    slot: usize,
    hit: Hit,
    source: &DamageSource,
    config: &SimConfig,
) -> Option<EnemyOutcome> {
    let enemy = world.enemies.get_mut(slot)?;
    enemy.health -= hit.amount;
    let pos = enemy.pos;
    world.events.emit(GameEvent::Hit {
        pos,
        damage: hit.amount,
        critical: hit.critical,
        weapon: source.weapon,
    });

    if enemy.health > 0.0 {
        let away = direction_to(source.origin, enemy.pos, (-enemy.vel).normalize_or(Vec2::X));
        let strength = source.knockback * (1.0 - enemy.knockback_resistance);
        if strength > 0.0 {
            enemy.knockback = Knockback {
                velocity: away * strength,
                remaining: config.movement.knockback_secs,
                duration: config.movement.knockback_secs,
            };
        }
        enemy.damage_flash = config.movement.damage_flash_secs;
        return Some(EnemyOutcome::Survived);
    }

    let (kind, pos) = world.release_enemy(slot)?;
    world.events.emit(GameEvent::EnemyDied { pos, kind });
    let archetype = config.enemies.get(kind);
    if world.rng.random_bool(f64::from(archetype.orb_drop_chance)) {
        let lifespan = config.pickups.orb_lifespan_secs;
        if world.drop_orb(pos, archetype.experience_value, lifespan).is_none() {
            log::debug!("Orb pool exhausted; drop skipped");
        }
    }
    if world.rng.random_bool(f64::from(archetype.relic_drop_chance))
        && world.drop_chest(pos).is_none()
    {
        log::debug!("Chest pool exhausted; drop skipped");
    }
    Some(EnemyOutcome::Killed)
}

/// Repeating damage while the player overlaps enemies.
///
/// The first tick lands when contact begins; further ticks follow every
/// `interval` while any enemy still overlaps. Breaking contact cancels it.
#[derive(Debug, Clone, Default)]
pub struct ContactDamage {
    cadence: Option<Cadence>,
}

impl ContactDamage {
    pub fn in_contact(&self) -> bool {
        self.cadence.is_some()
    }

    pub fn update(
        &mut self,
        now: f32,
        interval: f32,
        player: &mut Player,
        world: &mut World,
    ) -> DamageTaken {
        let strongest = world
            .enemies
            .iter_active()
            .filter(|(_, e)| circles_overlap(player.pos, player.radius, e.pos, e.radius))
            .map(|(_, e)| e.contact_damage)
            .fold(None, |acc: Option<f32>, d| Some(acc.map_or(d, |a| a.max(d))));

        let Some(amount) = strongest else {
            self.cadence = None;
            return DamageTaken::Ignored;
        };
        let cadence = self
            .cadence
            .get_or_insert_with(|| Cadence::immediate(now, interval));
        cadence.set_interval(interval);
        if !cadence.fire(now) {
            return DamageTaken::Ignored;
        }

        let taken = player.take_damage(amount);
        if let DamageTaken::Hurt(actual) | DamageTaken::Killed(actual) = taken {
            world.events.emit(GameEvent::PlayerDamaged {
                amount: actual,
                health: player.health,
            });
        }
        taken
    }
}
