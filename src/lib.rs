//! Horde Sim - runtime core of a top-down horde survival game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (pools, spawning, weapons, progression)
//! - `config`: Data-driven tuning and stress-test presets
//! - `error`: Recoverable errors surfaced at API entry points

pub mod config;
pub mod error;
pub mod sim;

pub use config::{SimConfig, StressPreset};
pub use error::{SimError, SimResult};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep used by the headless runner (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;

    /// Default fraction of the base spawn interval that level scaling stops at
    pub const SPAWN_INTERVAL_FLOOR: f32 = 0.3;

    /// Lower bound for any weapon cadence, whatever the speed modifiers say
    pub const MIN_ATTACK_INTERVAL: f32 = 0.05;

    /// Upper bound on damage reduction so the player can always be hurt
    pub const MAX_DAMAGE_REDUCTION: f32 = 0.8;

    /// Default RNG seed for the headless runner
    pub const DEFAULT_SEED: u64 = 0x5eed_1e55;
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

/// Unit vector for an angle in radians
#[inline]
pub fn direction_from_angle(theta: f32) -> Vec2 {
    Vec2::new(theta.cos(), theta.sin())
}

/// Angle of a direction vector in radians
#[inline]
pub fn angle_of(dir: Vec2) -> f32 {
    dir.y.atan2(dir.x)
}
