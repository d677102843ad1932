//! Per-archetype entity state stored in pool slots
//!
//! Simulation state only: display handles live in whatever presentation layer
//! consumes the event stream. `Default` is the blank state a slot is reset to.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::pool::{Handle, Recycle};
use crate::config::EnemyArchetype;

/// Enemy archetypes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnemyKind {
    /// Basic chaser
    #[default]
    Grunt,
    /// Slow, tough, hits hard
    Brute,
    /// Fast flyby that commits to one heading
    Swooper,
}

impl EnemyKind {
    pub const ALL: [EnemyKind; 3] = [EnemyKind::Grunt, EnemyKind::Brute, EnemyKind::Swooper];

    pub fn name(&self) -> &'static str {
        match self {
            EnemyKind::Grunt => "grunt",
            EnemyKind::Brute => "brute",
            EnemyKind::Swooper => "swooper",
        }
    }

    #[inline]
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// How this archetype picks its heading
    pub fn steering(&self) -> Steering {
        match self {
            EnemyKind::Grunt | EnemyKind::Brute => Steering::Chase,
            EnemyKind::Swooper => Steering::Charge,
        }
    }
}

/// Heading policy of an enemy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Steering {
    /// Re-aim at the player every tick (approximately, when off-screen)
    Chase,
    /// Keep the heading chosen at spawn
    Charge,
}

/// Decaying push away from a damage source
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Knockback {
    /// Initial velocity of the push
    pub velocity: Vec2,
    pub remaining: f32,
    pub duration: f32,
}

impl Knockback {
    pub fn is_active(&self) -> bool {
        self.remaining > 0.0
    }

    /// Current push velocity, decaying linearly to zero
    pub fn current(&self) -> Vec2 {
        if self.duration <= 0.0 || self.remaining <= 0.0 {
            return Vec2::ZERO;
        }
        self.velocity * (self.remaining / self.duration)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Enemy {
    pub kind: EnemyKind,
    pub pos: Vec2,
    pub vel: Vec2,
    /// Unit heading; zero until first aimed
    pub heading: Vec2,
    pub health: f32,
    pub max_health: f32,
    pub speed: f32,
    pub radius: f32,
    pub contact_damage: f32,
    pub knockback_resistance: f32,
    pub knockback: Knockback,
    /// Seconds spent continuously outside the camera margin
    pub offscreen_secs: f32,
    /// "Recently damaged" countdown
    pub damage_flash: f32,
}

impl Enemy {
    /// Fresh enemy of `kind` at `pos`
    pub fn spawn(kind: EnemyKind, archetype: &EnemyArchetype, pos: Vec2) -> Self {
        Self {
            kind,
            pos,
            health: archetype.max_health,
            max_health: archetype.max_health,
            speed: archetype.speed,
            radius: archetype.radius,
            contact_damage: archetype.contact_damage,
            knockback_resistance: archetype.knockback_resistance,
            ..Default::default()
        }
    }

    pub fn recently_damaged(&self) -> bool {
        self.damage_flash > 0.0
    }
}

impl Recycle for Enemy {}

/// Ranged weapon projectile
#[derive(Debug, Clone, Default)]
pub struct Projectile {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Damage before the critical roll made at impact
    pub damage: f32,
    pub radius: f32,
    pub pierce_remaining: u32,
    pub lifespan: f32,
    /// Enemies already damaged by this projectile
    pub hit: Vec<Handle>,
}

impl Recycle for Projectile {
    fn recycle(&mut self) {
        let mut hit = std::mem::take(&mut self.hit);
        hit.clear();
        *self = Self {
            hit,
            ..Self::default()
        };
    }
}

#[derive(Debug, Clone, Default)]
pub struct ExperienceOrb {
    pub pos: Vec2,
    pub value: u32,
    pub lifespan: f32,
}

impl Recycle for ExperienceOrb {}

#[derive(Debug, Clone, Default)]
pub struct RelicChest {
    pub pos: Vec2,
}

impl Recycle for RelicChest {}

/// Short-lived melee hitbox; it deals its damage when created and then only
/// waits out its duration
#[derive(Debug, Clone, Default)]
pub struct SlashArc {
    pub origin: Vec2,
    pub facing: f32,
    pub range: f32,
    pub half_arc: f32,
    pub remaining: f32,
    /// Number of enemies struck on activation
    pub struck: u32,
}

impl Recycle for SlashArc {}
