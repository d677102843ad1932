//! Entity pools, RNG, and the event queue shared by every system

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::entity::{Enemy, EnemyKind, ExperienceOrb, RelicChest};
use super::events::{EventQueue, GameEvent};
use super::geom::{Rect, direction_to};
use super::pool::Pool;
use crate::config::{EnemyArchetype, SimConfig};

/// Everything the systems of one tick read and mutate besides the player
#[derive(Debug, Clone)]
pub struct World {
    pub enemies: Pool<Enemy>,
    pub orbs: Pool<ExperienceOrb>,
    pub chests: Pool<RelicChest>,
    /// Active enemies per `EnemyKind`
    population: [usize; 3],
    pub rng: Pcg32,
    pub events: EventQueue,
    /// Camera rectangle, centered on the player
    pub camera: Rect,
    /// Playable area
    pub bounds: Rect,
    /// Reusable slot snapshot buffer
    pub scratch: Vec<usize>,
}

impl World {
    pub fn new(config: &SimConfig, seed: u64) -> Self {
        let bounds = Rect::new(
            Vec2::ZERO,
            Vec2::new(config.world.width, config.world.height),
        );
        let camera = Rect::centered(
            bounds.center(),
            Vec2::new(config.viewport.width, config.viewport.height),
        );
        Self {
            enemies: Pool::with_capacity(enemy_capacity(config)),
            orbs: Pool::with_capacity(config.pickups.orb_capacity),
            chests: Pool::with_capacity(config.pickups.chest_capacity),
            population: [0; 3],
            rng: Pcg32::seed_from_u64(seed),
            events: EventQueue::new(),
            camera,
            bounds,
            scratch: Vec::new(),
        }
    }

    /// Grow pools to fit `config`. Active entities are kept; pools never
    /// shrink.
    pub fn reconfigure(&mut self, config: &SimConfig) {
        let enemies = self.enemies.grow_to(enemy_capacity(config));
        let orbs = self.orbs.grow_to(config.pickups.orb_capacity);
        let chests = self.chests.grow_to(config.pickups.chest_capacity);
        log::debug!("Pool capacities: enemies={enemies} orbs={orbs} chests={chests}");
    }

    pub fn center_camera(&mut self, center: Vec2) {
        let size = Vec2::new(self.camera.width(), self.camera.height());
        self.camera = Rect::centered(center, size);
    }

    #[inline]
    pub fn population(&self, kind: EnemyKind) -> usize {
        self.population[kind.index()]
    }

    /// Activate an enemy at `pos` aimed at `target`, unless its archetype is at
    /// its population cap or the pool is exhausted.
    pub fn spawn_enemy(
        &mut self,
        kind: EnemyKind,
        archetype: &EnemyArchetype,
        pos: Vec2,
        target: Vec2,
    ) -> Option<usize> {
        if self.population(kind) >= archetype.max_population {
            return None;
        }
        let slot = self.enemies.spawn_with(|enemy| {
            *enemy = Enemy::spawn(kind, archetype, pos);
            enemy.heading = direction_to(pos, target, Vec2::X);
            enemy.vel = enemy.heading * enemy.speed;
        })?;
        self.population[kind.index()] += 1;
        self.events.emit(GameEvent::EnemySpawned { pos, kind });
        Some(slot)
    }

    /// Deactivate an enemy; inactive slots are ignored. Returns the kind and
    /// last position of the released enemy.
    pub fn release_enemy(&mut self, slot: usize) -> Option<(EnemyKind, Vec2)> {
        let (kind, pos) = self.enemies.get(slot).map(|e| (e.kind, e.pos))?;
        self.enemies.release(slot);
        self.population[kind.index()] -= 1;
        Some((kind, pos))
    }

    pub fn drop_orb(&mut self, pos: Vec2, value: u32, lifespan: f32) -> Option<usize> {
        self.orbs.spawn_with(|orb| {
            orb.pos = pos;
            orb.value = value;
            orb.lifespan = lifespan;
        })
    }

    pub fn drop_chest(&mut self, pos: Vec2) -> Option<usize> {
        let slot = self.chests.spawn_with(|chest| chest.pos = pos)?;
        self.events.emit(GameEvent::RelicDropped { pos });
        Some(slot)
    }

    /// Whether `pos` lies within the camera plus `margin`
    pub fn on_screen(&self, pos: Vec2, margin: f32) -> bool {
        self.camera.expand(margin).contains(pos)
    }
}

fn enemy_capacity(config: &SimConfig) -> usize {
    EnemyKind::ALL
        .iter()
        .map(|&kind| config.enemies.get(kind).max_population)
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn population_cap_is_per_archetype() {
        let mut config = SimConfig::default();
        config.enemies.brute.max_population = 2;
        let mut world = World::new(&config, 1);
        let brute = config.enemies.get(EnemyKind::Brute).clone();
        assert!(world.spawn_enemy(EnemyKind::Brute, &brute, Vec2::ZERO, Vec2::X).is_some());
        assert!(world.spawn_enemy(EnemyKind::Brute, &brute, Vec2::ZERO, Vec2::X).is_some());
        assert!(world.spawn_enemy(EnemyKind::Brute, &brute, Vec2::ZERO, Vec2::X).is_none());
        assert_eq!(world.population(EnemyKind::Brute), 2);
        assert_eq!(world.population(EnemyKind::Grunt), 0);

        let grunt = config.enemies.get(EnemyKind::Grunt).clone();
        assert!(world.spawn_enemy(EnemyKind::Grunt, &grunt, Vec2::ZERO, Vec2::X).is_some());
    }

    #[test]
    fn release_updates_population_once() {
        let config = SimConfig::default();
        let mut world = World::new(&config, 1);
        let grunt = config.enemies.grunt.clone();
        let slot = world
            .spawn_enemy(EnemyKind::Grunt, &grunt, Vec2::ZERO, Vec2::new(0.0, 10.0))
            .unwrap();
        let heading = world.enemies.get(slot).unwrap().heading;
        assert!((heading - Vec2::Y).length() < 1e-6);
        assert!(world.release_enemy(slot).is_some());
        assert!(world.release_enemy(slot).is_none());
        assert_eq!(world.population(EnemyKind::Grunt), 0);
    }

    #[test]
    fn reconfigure_keeps_active_entities() {
        let config = SimConfig::default();
        let mut world = World::new(&config, 1);
        let grunt = config.enemies.grunt.clone();
        let slot = world
            .spawn_enemy(EnemyKind::Grunt, &grunt, Vec2::splat(5.0), Vec2::ZERO)
            .unwrap();
        world.reconfigure(&config.with_preset(crate::StressPreset::Meltdown));
        assert!(world.enemies.capacity() > enemy_capacity(&config));
        assert_eq!(world.enemies.get(slot).unwrap().pos, Vec2::splat(5.0));
        assert_eq!(world.population(EnemyKind::Grunt), 1);
    }
}
