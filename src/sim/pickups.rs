//! Experience orbs and relic chests on the ground

use glam::Vec2;

use super::events::GameEvent;
use super::player::Player;
use super::world::World;
use crate::config::PickupConfig;

/// What the player picked up this tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Collected {
    /// Raw orb value, before the experience-gain modifier
    pub experience: u32,
    pub orbs: u32,
    /// Positions of opened chests
    pub chests: Vec<Vec2>,
}

/// Age, attract and collect pickups around `player`
pub fn update_pickups(
    world: &mut World,
    player: &Player,
    config: &PickupConfig,
    dt: f32,
) -> Collected {
    let mut collected = Collected::default();
    let reach = config.pickup_radius * player.modifiers.pickup_radius;
    let magnet = config.magnet_radius * player.modifiers.pickup_radius;

    let mut slots = std::mem::take(&mut world.scratch);
    world.orbs.active_slots_into(&mut slots);
    for &slot in &slots {
        let Some(orb) = world.orbs.get_mut(slot) else {
            continue;
        };
        orb.lifespan -= dt;
        if orb.lifespan <= 0.0 {
            world.orbs.release(slot);
            continue;
        }
        let distance = orb.pos.distance(player.pos);
        if distance <= reach {
            collected.experience += orb.value;
            collected.orbs += 1;
            world.orbs.release(slot);
            continue;
        }
        if distance <= magnet {
            let step = (config.magnet_speed * dt).min(distance);
            orb.pos += (player.pos - orb.pos).normalize_or_zero() * step;
        }
    }

    world.chests.active_slots_into(&mut slots);
    for &slot in &slots {
        let Some(pos) = world.chests.get(slot).map(|c| c.pos) else {
            continue;
        };
        if pos.distance(player.pos) <= reach {
            world.chests.release(slot);
            world.events.emit(GameEvent::RelicCollected { pos });
            collected.chests.push(pos);
        }
    }

    world.scratch = slots;
    collected
}
