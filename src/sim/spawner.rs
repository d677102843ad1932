//! Timed, level-scaled enemy spawning
//!
//! One `Spawner` per enemy archetype. Each fires on its own cadence; a
//! firing is a spawn *attempt* that quietly does nothing when the archetype is
//! level-gated, at its population cap, or out of pool slots. The cadence keeps
//! its schedule either way.

use glam::Vec2;
use rand::Rng;

use super::clock::Cadence;
use super::entity::EnemyKind;
use super::geom::Rect;
use super::world::World;
use crate::config::{EnemyArchetype, SimConfig};

/// `base * max(floor, 1 - (level - 1) * step)`
pub fn spawn_interval(archetype: &EnemyArchetype, level: u32) -> f32 {
    let levels_above_first = level.saturating_sub(1) as f32;
    let scale = (1.0 - levels_above_first * archetype.level_step).max(archetype.spawn_floor);
    archetype.base_spawn_interval_secs * scale
}

/// Uniform point on one of the four bands just outside `camera`
pub fn edge_spawn_point(rng: &mut impl Rng, camera: &Rect, padding: f32) -> Vec2 {
    let outer = camera.expand(padding);
    match rng.random_range(0..4) {
        // Top
        0 => Vec2::new(rng.random_range(outer.min.x..=outer.max.x), outer.min.y),
        // Right
        1 => Vec2::new(outer.max.x, rng.random_range(outer.min.y..=outer.max.y)),
        // Bottom
        2 => Vec2::new(rng.random_range(outer.min.x..=outer.max.x), outer.max.y),
        // Left
        _ => Vec2::new(outer.min.x, rng.random_range(outer.min.y..=outer.max.y)),
    }
}

#[derive(Debug, Clone)]
pub struct Spawner {
    pub kind: EnemyKind,
    cadence: Cadence,
    /// Player level the current interval was computed for
    level: u32,
}

impl Spawner {
    pub fn new(kind: EnemyKind, archetype: &EnemyArchetype, level: u32, now: f32) -> Self {
        Self {
            kind,
            cadence: Cadence::starting_at(now, spawn_interval(archetype, level)),
            level,
        }
    }

    #[inline]
    pub fn interval(&self) -> f32 {
        self.cadence.interval()
    }

    pub fn next_at(&self) -> f32 {
        self.cadence.next_at()
    }

    /// Recompute the interval. The attempt already scheduled keeps its time.
    pub fn reconfigure(&mut self, archetype: &EnemyArchetype, level: u32) {
        self.level = level;
        self.cadence.set_interval(spawn_interval(archetype, level));
    }

    /// Run one tick; returns the slot of the spawned enemy, if any
    pub fn update(
        &mut self,
        now: f32,
        level: u32,
        archetype: &EnemyArchetype,
        padding: f32,
        target: Vec2,
        world: &mut World,
    ) -> Option<usize> {
        if level != self.level {
            self.reconfigure(archetype, level);
            log::debug!(
                "{} spawn interval now {:.3}s (level {level})",
                self.kind.name(),
                self.interval()
            );
        }
        if !self.cadence.fire(now) || level < archetype.min_level {
            return None;
        }
        let pos = edge_spawn_point(&mut world.rng, &world.camera, padding);
        let slot = world.spawn_enemy(self.kind, archetype, pos, target);
        if slot.is_none() {
            log::debug!("{} spawn skipped: population cap or pool exhausted", self.kind.name());
        }
        slot
    }
}

/// Spawners for every archetype, in `EnemyKind::ALL` order
#[derive(Debug, Clone)]
pub struct Spawners {
    spawners: Vec<Spawner>,
}

impl Spawners {
    pub fn new(config: &SimConfig, level: u32, now: f32) -> Self {
        Self {
            spawners: EnemyKind::ALL
                .iter()
                .map(|&kind| Spawner::new(kind, config.enemies.get(kind), level, now))
                .collect(),
        }
    }

    pub fn get(&self, kind: EnemyKind) -> &Spawner {
        &self.spawners[kind.index()]
    }

    /// Apply a new config (e.g. after a preset swap)
    pub fn reconfigure(&mut self, config: &SimConfig, level: u32) {
        for spawner in &mut self.spawners {
            spawner.reconfigure(config.enemies.get(spawner.kind), level);
        }
    }

    pub fn update(
        &mut self,
        now: f32,
        level: u32,
        config: &SimConfig,
        target: Vec2,
        world: &mut World,
    ) -> usize {
        let padding = config.viewport.spawn_padding;
        self.spawners
            .iter_mut()
            .filter_map(|s| {
                s.update(now, level, config.enemies.get(s.kind), padding, target, world)
            })
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn interval_scales_with_level_and_floors() {
        let grunt = EnemyArchetype::grunt();
        assert!((spawn_interval(&grunt, 1) - 2.0).abs() < 1e-6);
        assert!((spawn_interval(&grunt, 2) - 1.7).abs() < 1e-5);
        // 1 - 5 * 0.15 = 0.25, floored to 0.3
        assert!((spawn_interval(&grunt, 6) - 0.6).abs() < 1e-5);
        assert!((spawn_interval(&grunt, 40) - 0.6).abs() < 1e-5);
    }

    #[test]
    fn each_archetype_has_its_own_floor() {
        let mut grunt = EnemyArchetype::grunt();
        grunt.spawn_floor = 0.5;
        // 1 - 4 * 0.15 = 0.4, floored to 0.5
        assert!((spawn_interval(&grunt, 5) - 1.0).abs() < 1e-5);
        assert!((spawn_interval(&grunt, 3) - 1.4).abs() < 1e-5);
        let brute = EnemyArchetype::brute();
        assert!((spawn_interval(&brute, 40) - 6.0 * brute.spawn_floor).abs() < 1e-5);
    }

    #[test]
    fn spawn_points_sit_outside_camera() {
        let mut rng = Pcg32::seed_from_u64(9);
        let camera = Rect::centered(Vec2::ZERO, Vec2::new(200.0, 100.0));
        for _ in 0..200 {
            let p = edge_spawn_point(&mut rng, &camera, 20.0);
            assert!(!camera.contains(p));
            assert!(camera.expand(20.0 + 1e-3).contains(p));
        }
    }

    #[test]
    fn level_gate_blocks_spawns() {
        let config = SimConfig::default();
        let mut world = World::new(&config, 3);
        let brute = config.enemies.get(EnemyKind::Brute);
        let mut spawner = Spawner::new(EnemyKind::Brute, brute, 1, 0.0);
        let t = spawner.next_at();
        assert!(spawner.update(t, 1, brute, 10.0, Vec2::ZERO, &mut world).is_none());
        let t = spawner.next_at();
        assert!(spawner.update(t, 3, brute, 10.0, Vec2::ZERO, &mut world).is_some());
    }

    #[test]
    fn level_change_applies_from_next_interval() {
        let config = SimConfig::default();
        let mut world = World::new(&config, 3);
        let grunt = config.enemies.get(EnemyKind::Grunt);
        let mut spawner = Spawner::new(EnemyKind::Grunt, grunt, 1, 0.0);
        // In flight: due at 2.0 regardless of the level change
        assert!(spawner.update(1.0, 6, grunt, 10.0, Vec2::ZERO, &mut world).is_none());
        assert!((spawner.next_at() - 2.0).abs() < 1e-6);
        assert!(spawner.update(2.0, 6, grunt, 10.0, Vec2::ZERO, &mut world).is_some());
        assert!((spawner.next_at() - 2.6).abs() < 1e-5);
    }

    #[test]
    fn capped_attempt_keeps_schedule() {
        let mut config = SimConfig::default();
        config.enemies.grunt.max_population = 1;
        let mut world = World::new(&config, 3);
        let grunt = config.enemies.get(EnemyKind::Grunt);
        let mut spawner = Spawner::new(EnemyKind::Grunt, grunt, 1, 0.0);
        assert!(spawner.update(2.0, 1, grunt, 10.0, Vec2::ZERO, &mut world).is_some());
        assert!(spawner.update(4.0, 1, grunt, 10.0, Vec2::ZERO, &mut world).is_none());
        assert!((spawner.next_at() - 6.0).abs() < 1e-5);
        assert_eq!(world.population(EnemyKind::Grunt), 1);
    }
}
