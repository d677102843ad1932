//! Enemy steering
//!
//! On-screen enemies re-aim at the player every tick. Off-screen ones re-aim
//! only occasionally and move slower, which still converges on the player; if
//! one stays off-screen past the timeout it is despawned regardless of health.

use glam::Vec2;
use rand::Rng;

use super::entity::{Enemy, Steering};
use super::events::GameEvent;
use super::geom::direction_to;
use super::world::World;
use crate::config::MovementConfig;

/// Steer and integrate every active enemy. Returns the number despawned by
/// the off-screen timeout.
pub fn update_enemies(
    world: &mut World,
    target: Vec2,
    config: &MovementConfig,
    offscreen_margin: f32,
    dt: f32,
) -> usize {
    let visible = world.camera.expand(offscreen_margin);
    let mut slots = std::mem::take(&mut world.scratch);
    world.enemies.active_slots_into(&mut slots);

    let mut despawned = 0;
    for &slot in &slots {
        let Some(enemy) = world.enemies.get_mut(slot) else {
            continue;
        };
        let on_screen = visible.contains(enemy.pos);
        if on_screen {
            enemy.offscreen_secs = 0.0;
        } else {
            enemy.offscreen_secs += dt;
            if enemy.offscreen_secs > config.despawn_timeout_secs {
                if let Some((kind, pos)) = world.release_enemy(slot) {
                    log::debug!("Despawned {} left off-screen at {pos}", kind.name());
                    world.events.emit(GameEvent::EnemyDespawned { pos, kind });
                    despawned += 1;
                }
                continue;
            }
        }
        steer(enemy, target, on_screen, config, &mut world.rng);
        enemy.pos += enemy.vel * dt;
        enemy.damage_flash = (enemy.damage_flash - dt).max(0.0);
        if enemy.knockback.is_active() {
            enemy.knockback.remaining = (enemy.knockback.remaining - dt).max(0.0);
        }
    }

    world.scratch = slots;
    despawned
}

/// Set `enemy.vel` for this tick
pub fn steer(
    enemy: &mut Enemy,
    target: Vec2,
    on_screen: bool,
    config: &MovementConfig,
    rng: &mut impl Rng,
) {
    if enemy.knockback.is_active() {
        enemy.vel = enemy.knockback.current();
        return;
    }

    let retarget = match enemy.kind.steering() {
        Steering::Chase => {
            on_screen
                || enemy.heading == Vec2::ZERO
                || rng.random_bool(f64::from(config.offscreen_retarget_chance))
        }
        Steering::Charge => enemy.heading == Vec2::ZERO,
    };
    if retarget {
        let fallback = if enemy.heading == Vec2::ZERO {
            Vec2::X
        } else {
            enemy.heading
        };
        enemy.heading = direction_to(enemy.pos, target, fallback);
    }

    let speed = if on_screen {
        enemy.speed
    } else {
        enemy.speed * config.offscreen_speed_factor
    };
    enemy.vel = enemy.heading * speed;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimConfig;
    use crate::sim::entity::{EnemyKind, Knockback};
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn chaser(pos: Vec2) -> Enemy {
        Enemy::spawn(EnemyKind::Grunt, &crate::config::EnemyArchetype::grunt(), pos)
    }

    #[test]
    fn on_screen_enemy_heads_for_target() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut e = chaser(Vec2::new(100.0, 0.0));
        steer(&mut e, Vec2::ZERO, true, &MovementConfig::default(), &mut rng);
        assert!((e.vel.normalize() - Vec2::NEG_X).length() < 1e-5);
        assert!((e.vel.length() - e.speed).abs() < 1e-4);
    }

    #[test]
    fn off_screen_enemy_is_slower_and_aims_when_unset() {
        let mut rng = Pcg32::seed_from_u64(1);
        let config = MovementConfig {
            offscreen_retarget_chance: 0.0,
            ..Default::default()
        };
        let mut e = chaser(Vec2::new(0.0, 500.0));
        steer(&mut e, Vec2::ZERO, false, &config, &mut rng);
        assert!((e.heading - Vec2::NEG_Y).length() < 1e-5);
        assert!((e.vel.length() - e.speed * config.offscreen_speed_factor).abs() < 1e-4);

        // With a zero retarget chance the stale heading is kept
        e.pos = Vec2::new(500.0, 0.0);
        steer(&mut e, Vec2::ZERO, false, &config, &mut rng);
        assert!((e.heading - Vec2::NEG_Y).length() < 1e-5);
    }

    #[test]
    fn charger_keeps_heading() {
        let mut rng = Pcg32::seed_from_u64(1);
        let archetype = crate::config::EnemyArchetype::swooper();
        let mut e = Enemy::spawn(EnemyKind::Swooper, &archetype, Vec2::ZERO);
        e.heading = Vec2::X;
        steer(&mut e, Vec2::new(0.0, 100.0), true, &MovementConfig::default(), &mut rng);
        assert_eq!(e.heading, Vec2::X);
    }

    #[test]
    fn knockback_overrides_steering() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut e = chaser(Vec2::new(10.0, 0.0));
        e.knockback = Knockback {
            velocity: Vec2::new(200.0, 0.0),
            remaining: 0.2,
            duration: 0.2,
        };
        steer(&mut e, Vec2::ZERO, true, &MovementConfig::default(), &mut rng);
        assert!((e.vel.x - 200.0).abs() < 1e-4);
    }

    #[test]
    fn lingering_off_screen_enemy_is_despawned() {
        let config = SimConfig::default();
        let mut world = World::new(&config, 5);
        world.center_camera(Vec2::ZERO);
        let far = Vec2::new(10_000.0, 0.0);
        let slot = world
            .spawn_enemy(EnemyKind::Grunt, &config.enemies.grunt, far, far + Vec2::X)
            .unwrap();
        // Aimed away from the player so it never comes back on screen
        let movement = MovementConfig {
            offscreen_retarget_chance: 0.0,
            ..config.movement.clone()
        };
        let dt = 0.5;
        let mut despawned = 0;
        for _ in 0..11 {
            despawned += update_enemies(&mut world, far * 2.0, &movement, 100.0, dt);
        }
        assert_eq!(despawned, 1);
        assert!(!world.enemies.is_active(slot));
        assert_eq!(world.population(EnemyKind::Grunt), 0);
    }

    #[test]
    fn returning_on_screen_resets_timer() {
        let config = SimConfig::default();
        let mut world = World::new(&config, 5);
        world.center_camera(Vec2::ZERO);
        let slot = world
            .spawn_enemy(EnemyKind::Grunt, &config.enemies.grunt, Vec2::new(2000.0, 0.0), Vec2::ZERO)
            .unwrap();
        update_enemies(&mut world, Vec2::ZERO, &config.movement, 100.0, 1.0);
        assert!(world.enemies.get(slot).unwrap().offscreen_secs > 0.0);
        world.enemies.get_mut(slot).unwrap().pos = Vec2::ZERO;
        update_enemies(&mut world, Vec2::ZERO, &config.movement, 100.0, 1.0 / 60.0);
        assert_eq!(world.enemies.get(slot).unwrap().offscreen_secs, 0.0);
    }
}
