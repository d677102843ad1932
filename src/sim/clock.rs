//! Simulation clock and cadence timers
//!
//! Simulated time only advances while no pause hold is present. Every
//! repeating action (spawning, firing, contact damage) stores the simulated
//! time of its next firing instead of owning a timer, so a pause of any length
//! resumes exactly where it stopped with no catch-up burst.

use serde::{Deserialize, Serialize};

/// Why the simulation is paused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PauseReason {
    /// Player pressed pause
    Manual,
    /// Upgrade prompt open
    LevelUp,
    /// Relic reveal in progress
    RelicSelection,
}

impl PauseReason {
    #[inline]
    fn bit(self) -> u8 {
        match self {
            PauseReason::Manual => 1 << 0,
            PauseReason::LevelUp => 1 << 1,
            PauseReason::RelicSelection => 1 << 2,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SimClock {
    /// Simulated seconds since the run started
    elapsed: f32,
    /// Simulation ticks actually run (paused frames excluded)
    ticks: u64,
    /// Bitset of `PauseReason`s
    holds: u8,
}

impl SimClock {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn now(&self) -> f32 {
        self.elapsed
    }

    #[inline]
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    #[inline]
    pub fn is_paused(&self) -> bool {
        self.holds != 0
    }

    pub fn is_held_by(&self, reason: PauseReason) -> bool {
        self.holds & reason.bit() != 0
    }

    /// Add a pause hold. Returns `true` if the clock was running before.
    pub fn pause(&mut self, reason: PauseReason) -> bool {
        let was_running = !self.is_paused();
        self.holds |= reason.bit();
        was_running
    }

    /// Remove a pause hold. Returns `true` if the clock is now running.
    pub fn resume(&mut self, reason: PauseReason) -> bool {
        let was_paused = self.is_paused();
        self.holds &= !reason.bit();
        was_paused && !self.is_paused()
    }

    /// Advance simulated time by `dt`; does nothing while paused.
    /// Returns whether time advanced.
    pub fn advance(&mut self, dt: f32) -> bool {
        if self.is_paused() || dt <= 0.0 {
            return false;
        }
        self.elapsed += dt;
        self.ticks += 1;
        true
    }
}

/// Repeating action scheduled on simulated time
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cadence {
    interval: f32,
    next_at: f32,
}

impl Cadence {
    /// First firing one full interval after `now`
    pub fn starting_at(now: f32, interval: f32) -> Self {
        Self {
            interval,
            next_at: now + interval,
        }
    }

    /// First firing at `now` itself
    pub fn immediate(now: f32, interval: f32) -> Self {
        Self {
            interval,
            next_at: now,
        }
    }

    #[inline]
    pub fn interval(&self) -> f32 {
        self.interval
    }

    #[inline]
    pub fn next_at(&self) -> f32 {
        self.next_at
    }

    /// Seconds of simulated time until the next firing
    pub fn remaining(&self, now: f32) -> f32 {
        (self.next_at - now).max(0.0)
    }

    /// Change the interval. The firing already scheduled is left alone; the
    /// new interval applies from the one after it.
    pub fn set_interval(&mut self, interval: f32) {
        self.interval = interval;
    }

    /// If due, schedule the next firing one interval from `now` and return
    /// `true`. At most one firing per call, so a long frame never bursts.
    pub fn fire(&mut self, now: f32) -> bool {
        if now + f32::EPSILON < self.next_at {
            return false;
        }
        self.next_at = now + self.interval;
        true
    }
}

/// Interval of an attack whose base cadence is sped up by `speed_multiplier`
pub fn attack_interval(base: f32, speed_multiplier: f32) -> f32 {
    (base / speed_multiplier.max(f32::EPSILON)).max(crate::consts::MIN_ATTACK_INTERVAL)
}
