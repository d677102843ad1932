//! Player character: stats, weapon ownership, and damage intake

use std::ops::{Index, IndexMut};

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geom::Rect;
use crate::config::{PlayerConfig, ProgressionConfig};
use crate::consts::MAX_DAMAGE_REDUCTION;

/// The five weapon archetypes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeaponKind {
    /// Ranged projectile fan
    Blaster,
    /// Melee arc
    Slash,
    /// Area pulse around the player
    Pulse,
    /// Orbiting drone
    Drone,
    /// Rolling companion
    Roller,
}

impl WeaponKind {
    pub const ALL: [WeaponKind; 5] = [
        WeaponKind::Blaster,
        WeaponKind::Slash,
        WeaponKind::Pulse,
        WeaponKind::Drone,
        WeaponKind::Roller,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            WeaponKind::Blaster => "blaster",
            WeaponKind::Slash => "slash",
            WeaponKind::Pulse => "pulse",
            WeaponKind::Drone => "drone",
            WeaponKind::Roller => "roller",
        }
    }

    #[inline]
    pub fn index(&self) -> usize {
        *self as usize
    }
}

/// One value per weapon archetype
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PerWeapon<T>([T; 5]);

impl<T: Copy> PerWeapon<T> {
    pub fn splat(value: T) -> Self {
        Self([value; 5])
    }
}

impl<T> Index<WeaponKind> for PerWeapon<T> {
    type Output = T;

    fn index(&self, weapon: WeaponKind) -> &T {
        &self.0[weapon.index()]
    }
}

impl<T> IndexMut<WeaponKind> for PerWeapon<T> {
    fn index_mut(&mut self, weapon: WeaponKind) -> &mut T {
        &mut self.0[weapon.index()]
    }
}

/// Stat modifiers mutated by upgrades and relics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Modifiers {
    pub move_speed: f32,
    pub damage: PerWeapon<f32>,
    /// Higher is faster: intervals are divided by this
    pub attack_speed: PerWeapon<f32>,
    pub projectile_count: u32,
    pub projectile_size: f32,
    pub pierce_bonus: u32,
    pub experience_gain: f32,
    /// Fraction of incoming damage ignored
    pub damage_reduction: f32,
    /// Reach of area weapons: pulse radius and slash range
    pub area: PerWeapon<f32>,
    pub pickup_radius: f32,
}

impl Default for Modifiers {
    fn default() -> Self {
        Self {
            move_speed: 1.0,
            damage: PerWeapon::splat(1.0),
            attack_speed: PerWeapon::splat(1.0),
            projectile_count: 1,
            projectile_size: 1.0,
            pierce_bonus: 0,
            experience_gain: 1.0,
            damage_reduction: 0.0,
            area: PerWeapon::splat(1.0),
            pickup_radius: 1.0,
        }
    }
}

impl Modifiers {
    /// Add damage reduction, capped so the player can always be hurt
    pub fn add_damage_reduction(&mut self, amount: f32) {
        self.damage_reduction = (self.damage_reduction + amount).clamp(0.0, MAX_DAMAGE_REDUCTION);
    }
}

/// Result of `Player::take_damage`
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DamageTaken {
    /// Invulnerable, stress mode, or already dead
    Ignored,
    Hurt(f32),
    /// This hit brought health to zero; reported once per run
    Killed(f32),
}

#[derive(Debug, Clone)]
pub struct Player {
    pub pos: Vec2,
    pub radius: f32,
    pub speed: f32,
    pub health: f32,
    pub max_health: f32,
    pub experience: f32,
    pub level: u32,
    pub experience_to_next_level: f32,
    /// Last nonzero movement direction (unit)
    pub facing: Vec2,
    pub abilities: PerWeapon<bool>,
    pub modifiers: Modifiers,
    pub invulnerable_secs: f32,
    invulnerability_window: f32,
    /// Stress presets make the player ignore all damage
    pub stress_invulnerable: bool,
    /// Suppresses re-entrant level-up checks while a prompt is open
    pub is_leveling_up: bool,
    pub dead: bool,
}

impl Player {
    pub fn new(config: &PlayerConfig, progression: &ProgressionConfig, pos: Vec2) -> Self {
        let mut abilities = PerWeapon::splat(false);
        abilities[WeaponKind::Blaster] = true;
        Self {
            pos,
            radius: config.radius,
            speed: config.speed,
            health: config.max_health,
            max_health: config.max_health,
            experience: 0.0,
            level: 1,
            experience_to_next_level: progression.initial_threshold,
            facing: Vec2::X,
            abilities,
            modifiers: Modifiers::default(),
            invulnerable_secs: 0.0,
            invulnerability_window: config.invulnerability_secs,
            stress_invulnerable: false,
            is_leveling_up: false,
            dead: false,
        }
    }

    #[inline]
    pub fn has(&self, weapon: WeaponKind) -> bool {
        self.abilities[weapon]
    }

    pub fn is_invulnerable(&self) -> bool {
        self.stress_invulnerable || self.invulnerable_secs > 0.0
    }

    /// Move by the input intent and tick down invulnerability
    pub fn step(&mut self, movement: Vec2, dt: f32, bounds: &Rect) {
        if self.dead {
            return;
        }
        let dir = movement.normalize_or_zero();
        if dir != Vec2::ZERO {
            self.facing = dir;
            self.pos = bounds.clamp(self.pos + dir * self.speed * self.modifiers.move_speed * dt);
        }
        self.invulnerable_secs = (self.invulnerable_secs - dt).max(0.0);
    }

    /// Apply incoming damage after reduction. Re-arms invulnerability.
    pub fn take_damage(&mut self, amount: f32) -> DamageTaken {
        if self.dead || self.is_invulnerable() || amount <= 0.0 {
            return DamageTaken::Ignored;
        }
        let actual = amount * (1.0 - self.modifiers.damage_reduction);
        self.health = (self.health - actual).clamp(0.0, self.max_health);
        self.invulnerable_secs = self.invulnerability_window;
        if self.health <= 0.0 {
            self.dead = true;
            DamageTaken::Killed(actual)
        } else {
            DamageTaken::Hurt(actual)
        }
    }

    pub fn heal(&mut self, amount: f32) {
        if !self.dead {
            self.health = (self.health + amount).clamp(0.0, self.max_health);
        }
    }

    pub fn raise_max_health(&mut self, amount: f32) {
        self.max_health += amount;
        self.heal(amount);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player() -> Player {
        Player::new(&PlayerConfig::default(), &ProgressionConfig::default(), Vec2::ZERO)
    }

    #[test]
    fn starts_with_blaster_facing_right() {
        let p = player();
        assert!(p.has(WeaponKind::Blaster));
        assert!(!p.has(WeaponKind::Drone));
        assert_eq!(p.facing, Vec2::X);
        assert_eq!(p.level, 1);
    }

    #[test]
    fn damage_reduction_scales_hits() {
        let mut p = player();
        p.modifiers.damage_reduction = 0.2;
        assert_eq!(p.take_damage(10.0), DamageTaken::Hurt(8.0));
        assert!((p.health - 92.0).abs() < 1e-4);
    }

    #[test]
    fn invulnerability_blocks_follow_up_hits() {
        let mut p = player();
        p.take_damage(10.0);
        assert_eq!(p.take_damage(10.0), DamageTaken::Ignored);
        let bounds = Rect::centered(Vec2::ZERO, Vec2::splat(100.0));
        p.step(Vec2::ZERO, 1.0, &bounds);
        assert!(matches!(p.take_damage(10.0), DamageTaken::Hurt(_)));
    }

    #[test]
    fn stress_mode_ignores_damage() {
        let mut p = player();
        p.stress_invulnerable = true;
        assert_eq!(p.take_damage(1000.0), DamageTaken::Ignored);
        assert!((p.health - p.max_health).abs() < 1e-6);
    }

    #[test]
    fn death_reported_once() {
        let mut p = player();
        p.health = 5.0;
        assert!(matches!(p.take_damage(10.0), DamageTaken::Killed(_)));
        assert_eq!(p.health, 0.0);
        p.invulnerable_secs = 0.0;
        assert_eq!(p.take_damage(10.0), DamageTaken::Ignored);
    }

    #[test]
    fn facing_keeps_last_direction_and_position_is_clamped() {
        let mut p = player();
        let bounds = Rect::centered(Vec2::ZERO, Vec2::splat(100.0));
        p.step(Vec2::new(0.0, -3.0), 10.0, &bounds);
        assert!((p.facing - Vec2::NEG_Y).length() < 1e-6);
        assert!((p.pos.y - -50.0).abs() < 1e-4);
        p.step(Vec2::ZERO, 0.1, &bounds);
        assert!((p.facing - Vec2::NEG_Y).length() < 1e-6);
    }

    #[test]
    fn max_health_upgrade_heals() {
        let mut p = player();
        p.health = 50.0;
        p.raise_max_health(20.0);
        assert!((p.max_health - 120.0).abs() < 1e-6);
        assert!((p.health - 70.0).abs() < 1e-6);
    }
}
