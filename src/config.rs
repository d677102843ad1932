//! Simulation tuning and stress-test presets
//!
//! `SimConfig` is one immutable value handed to every constructor that needs
//! tuning. Swapping a stress preset builds a new value from the base config
//! rather than mutating shared state.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::SPAWN_INTERVAL_FLOOR;
use crate::error::{SimError, SimResult};
use crate::sim::entity::EnemyKind;

/// Named load-testing bundles that multiply population caps and shrink spawn
/// intervals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum StressPreset {
    #[default]
    Off,
    Busy,
    Swarm,
    Meltdown,
}

impl StressPreset {
    pub const ALL: [StressPreset; 4] = [
        StressPreset::Off,
        StressPreset::Busy,
        StressPreset::Swarm,
        StressPreset::Meltdown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StressPreset::Off => "off",
            StressPreset::Busy => "busy",
            StressPreset::Swarm => "swarm",
            StressPreset::Meltdown => "meltdown",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "off" | "none" => Some(StressPreset::Off),
            "busy" => Some(StressPreset::Busy),
            "swarm" => Some(StressPreset::Swarm),
            "meltdown" => Some(StressPreset::Meltdown),
            _ => None,
        }
    }

    /// Like `from_str`, but reports the unknown name
    pub fn parse(s: &str) -> SimResult<Self> {
        Self::from_str(s).ok_or_else(|| SimError::UnknownPreset(s.to_string()))
    }

    /// Multiplier applied to every population cap and pool capacity
    pub fn population_multiplier(&self) -> f32 {
        match self {
            StressPreset::Off => 1.0,
            StressPreset::Busy => 3.0,
            StressPreset::Swarm => 6.0,
            StressPreset::Meltdown => 12.0,
        }
    }

    /// Multiplier applied to every base spawn interval
    pub fn interval_multiplier(&self) -> f32 {
        match self {
            StressPreset::Off => 1.0,
            StressPreset::Busy => 0.5,
            StressPreset::Swarm => 0.25,
            StressPreset::Meltdown => 0.1,
        }
    }

    /// Whether the player ignores all damage under this preset
    pub fn invulnerable(&self) -> bool {
        !matches!(self, StressPreset::Off)
    }
}

/// Camera viewport, used for on-screen tests and edge spawning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    pub width: f32,
    pub height: f32,
    /// Extra border around the camera still treated as visible
    pub offscreen_margin: f32,
    /// How far outside the camera edge new enemies appear
    pub spawn_padding: f32,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 720.0,
            offscreen_margin: 100.0,
            spawn_padding: 48.0,
        }
    }
}

/// Playable area the player is clamped to
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    pub width: f32,
    pub height: f32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: 4096.0,
            height: 4096.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub max_health: f32,
    pub speed: f32,
    pub radius: f32,
    /// Invulnerability window armed by every damaging hit
    pub invulnerability_secs: f32,
    /// Repeat interval of contact damage while overlapping enemies
    pub contact_interval_secs: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            max_health: 100.0,
            speed: 180.0,
            radius: 14.0,
            invulnerability_secs: 0.4,
            contact_interval_secs: 0.5,
        }
    }
}

/// Tuning for one enemy archetype
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyArchetype {
    pub max_health: f32,
    pub speed: f32,
    pub radius: f32,
    pub contact_damage: f32,
    pub base_spawn_interval_secs: f32,
    /// Fractional interval reduction per player level above 1
    pub level_step: f32,
    /// Smallest fraction of the base interval that level scaling can reach
    pub spawn_floor: f32,
    /// Player level below which this archetype never spawns
    pub min_level: u32,
    pub max_population: usize,
    pub orb_drop_chance: f32,
    pub experience_value: u32,
    pub relic_drop_chance: f32,
    /// 0 = full knockback, 1 = immovable
    pub knockback_resistance: f32,
}

impl Default for EnemyArchetype {
    fn default() -> Self {
        Self::grunt()
    }
}

impl EnemyArchetype {
    pub fn grunt() -> Self {
        Self {
            max_health: 24.0,
            speed: 70.0,
            radius: 14.0,
            contact_damage: 8.0,
            base_spawn_interval_secs: 2.0,
            level_step: 0.15,
            spawn_floor: SPAWN_INTERVAL_FLOOR,
            min_level: 1,
            max_population: 150,
            orb_drop_chance: 0.9,
            experience_value: 1,
            relic_drop_chance: 0.004,
            knockback_resistance: 0.0,
        }
    }

    pub fn brute() -> Self {
        Self {
            max_health: 140.0,
            speed: 45.0,
            radius: 26.0,
            contact_damage: 20.0,
            base_spawn_interval_secs: 6.0,
            level_step: 0.25,
            spawn_floor: SPAWN_INTERVAL_FLOOR,
            min_level: 3,
            max_population: 30,
            orb_drop_chance: 1.0,
            experience_value: 6,
            relic_drop_chance: 0.05,
            knockback_resistance: 0.7,
        }
    }

    pub fn swooper() -> Self {
        Self {
            max_health: 12.0,
            speed: 260.0,
            radius: 10.0,
            contact_damage: 6.0,
            base_spawn_interval_secs: 4.0,
            level_step: 0.25,
            spawn_floor: SPAWN_INTERVAL_FLOOR,
            min_level: 2,
            max_population: 40,
            orb_drop_chance: 0.6,
            experience_value: 2,
            relic_drop_chance: 0.01,
            knockback_resistance: 0.2,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyTable {
    pub grunt: EnemyArchetype,
    pub brute: EnemyArchetype,
    pub swooper: EnemyArchetype,
}

impl Default for EnemyTable {
    fn default() -> Self {
        Self {
            grunt: EnemyArchetype::grunt(),
            brute: EnemyArchetype::brute(),
            swooper: EnemyArchetype::swooper(),
        }
    }
}

impl EnemyTable {
    pub fn get(&self, kind: EnemyKind) -> &EnemyArchetype {
        match kind {
            EnemyKind::Grunt => &self.grunt,
            EnemyKind::Brute => &self.brute,
            EnemyKind::Swooper => &self.swooper,
        }
    }

    fn get_mut(&mut self, kind: EnemyKind) -> &mut EnemyArchetype {
        match kind {
            EnemyKind::Grunt => &mut self.grunt,
            EnemyKind::Brute => &mut self.brute,
            EnemyKind::Swooper => &mut self.swooper,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CritConfig {
    pub chance: f32,
    pub multiplier: f32,
}

impl Default for CritConfig {
    fn default() -> Self {
        Self {
            chance: 0.15,
            multiplier: 1.5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BlasterConfig {
    pub damage: f32,
    pub interval_secs: f32,
    pub speed: f32,
    pub lifespan_secs: f32,
    pub radius: f32,
    /// Enemies a projectile may hit before it is retired
    pub pierce: u32,
    /// Angle between neighbouring projectiles of one volley
    pub spread_radians: f32,
    /// Distance beyond the camera at which projectiles are culled
    pub cull_margin: f32,
    pub capacity: usize,
}

impl Default for BlasterConfig {
    fn default() -> Self {
        Self {
            damage: 10.0,
            interval_secs: 0.8,
            speed: 480.0,
            lifespan_secs: 1.6,
            radius: 5.0,
            pierce: 1,
            spread_radians: 0.2,
            cull_margin: 150.0,
            capacity: 256,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SlashConfig {
    pub damage: f32,
    pub interval_secs: f32,
    pub range: f32,
    /// Half of the swept angle either side of the facing direction
    pub half_arc_radians: f32,
    pub duration_secs: f32,
    pub knockback: f32,
    pub capacity: usize,
}

impl Default for SlashConfig {
    fn default() -> Self {
        Self {
            damage: 18.0,
            interval_secs: 1.4,
            range: 110.0,
            half_arc_radians: 1.0,
            duration_secs: 0.2,
            knockback: 160.0,
            capacity: 8,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PulseConfig {
    pub damage: f32,
    pub interval_secs: f32,
    pub radius: f32,
    pub knockback: f32,
}

impl Default for PulseConfig {
    fn default() -> Self {
        Self {
            damage: 8.0,
            interval_secs: 3.0,
            radius: 150.0,
            knockback: 320.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DroneConfig {
    pub damage: f32,
    pub orbit_radius: f32,
    /// Radians per second at attack-speed multiplier 1.0
    pub angular_speed: f32,
    pub hit_radius: f32,
}

impl Default for DroneConfig {
    fn default() -> Self {
        Self {
            damage: 12.0,
            orbit_radius: 80.0,
            angular_speed: 3.5,
            hit_radius: 18.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RollerConfig {
    pub damage: f32,
    pub interval_secs: f32,
    pub roll_speed: f32,
    pub travel_distance: f32,
    pub return_speed: f32,
    pub hit_radius: f32,
    /// Enemies farther than this are ignored when choosing a roll target
    pub seek_radius: f32,
    /// Distance behind the player the idle companion keeps
    pub follow_distance: f32,
}

impl Default for RollerConfig {
    fn default() -> Self {
        Self {
            damage: 15.0,
            interval_secs: 3.5,
            roll_speed: 420.0,
            travel_distance: 260.0,
            return_speed: 360.0,
            hit_radius: 22.0,
            seek_radius: 420.0,
            follow_distance: 36.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct WeaponsConfig {
    pub crit: CritConfig,
    pub blaster: BlasterConfig,
    pub slash: SlashConfig,
    pub pulse: PulseConfig,
    pub drone: DroneConfig,
    pub roller: RollerConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PickupConfig {
    pub orb_capacity: usize,
    pub orb_lifespan_secs: f32,
    pub pickup_radius: f32,
    pub magnet_radius: f32,
    pub magnet_speed: f32,
    pub chest_capacity: usize,
    /// Experience granted by a chest when no relic is left to award
    pub empty_chest_experience: u32,
}

impl Default for PickupConfig {
    fn default() -> Self {
        Self {
            orb_capacity: 400,
            orb_lifespan_secs: 30.0,
            pickup_radius: 32.0,
            magnet_radius: 120.0,
            magnet_speed: 260.0,
            chest_capacity: 8,
            empty_chest_experience: 25,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressionConfig {
    pub initial_threshold: f32,
    pub growth_factor: f32,
    pub choices_per_level: usize,
    pub relic_reveal_secs: f32,
    pub relic_cycle_secs: f32,
}

impl Default for ProgressionConfig {
    fn default() -> Self {
        Self {
            initial_threshold: 10.0,
            growth_factor: 1.8,
            choices_per_level: 3,
            relic_reveal_secs: 2.5,
            relic_cycle_secs: 0.12,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementConfig {
    /// Per-tick chance an off-screen enemy re-aims at the player
    pub offscreen_retarget_chance: f32,
    pub offscreen_speed_factor: f32,
    pub despawn_timeout_secs: f32,
    pub knockback_secs: f32,
    pub damage_flash_secs: f32,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            offscreen_retarget_chance: 0.1,
            offscreen_speed_factor: 0.8,
            despawn_timeout_secs: 5.0,
            knockback_secs: 0.2,
            damage_flash_secs: 0.15,
        }
    }
}

/// Complete simulation tuning
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SimConfig {
    pub viewport: ViewportConfig,
    pub world: WorldConfig,
    pub player: PlayerConfig,
    pub enemies: EnemyTable,
    pub weapons: WeaponsConfig,
    pub pickups: PickupConfig,
    pub progression: ProgressionConfig,
    pub movement: MovementConfig,
}

impl SimConfig {
    /// Parse a (possibly partial) JSON document; missing keys keep defaults
    ///
    /// The document is merged over the serialized defaults before decoding, so
    /// a partial `brute` section keeps the brute defaults for the keys it omits.
    pub fn from_json(json: &str) -> SimResult<Self> {
        let overlay: serde_json::Value = serde_json::from_str(json)?;
        let mut merged = serde_json::to_value(SimConfig::default())?;
        merge_json(&mut merged, overlay);
        let config: SimConfig = serde_json::from_value(merged)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a JSON config file
    pub fn load(path: impl AsRef<Path>) -> SimResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded simulation config from {}", path.display());
        Ok(config)
    }

    /// Derive the effective config for a stress preset from this base config
    pub fn with_preset(&self, preset: StressPreset) -> Self {
        let mut config = self.clone();
        if preset == StressPreset::Off {
            return config;
        }
        let pop = preset.population_multiplier();
        let interval = preset.interval_multiplier();
        for kind in EnemyKind::ALL {
            let archetype = config.enemies.get_mut(kind);
            archetype.max_population = scale_capacity(archetype.max_population, pop);
            archetype.base_spawn_interval_secs *= interval;
        }
        config.pickups.orb_capacity = scale_capacity(config.pickups.orb_capacity, pop);
        config.pickups.chest_capacity = scale_capacity(config.pickups.chest_capacity, pop);
        config
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> SimResult<()> {
        positive("viewport.width", self.viewport.width)?;
        positive("viewport.height", self.viewport.height)?;
        non_negative("viewport.offscreen_margin", self.viewport.offscreen_margin)?;
        non_negative("viewport.spawn_padding", self.viewport.spawn_padding)?;
        positive("world.width", self.world.width)?;
        positive("world.height", self.world.height)?;

        positive("player.max_health", self.player.max_health)?;
        positive("player.speed", self.player.speed)?;
        positive("player.radius", self.player.radius)?;
        non_negative("player.invulnerability_secs", self.player.invulnerability_secs)?;
        positive("player.contact_interval_secs", self.player.contact_interval_secs)?;

        for kind in EnemyKind::ALL {
            let a = self.enemies.get(kind);
            positive("enemies.max_health", a.max_health)?;
            positive("enemies.speed", a.speed)?;
            positive("enemies.radius", a.radius)?;
            non_negative("enemies.contact_damage", a.contact_damage)?;
            positive("enemies.base_spawn_interval_secs", a.base_spawn_interval_secs)?;
            non_negative("enemies.level_step", a.level_step)?;
            if !(a.spawn_floor > 0.0 && a.spawn_floor <= 1.0) {
                return Err(SimError::InvalidConfig {
                    field: "enemies.spawn_floor",
                    reason: "must be in (0, 1]",
                });
            }
            capacity("enemies.max_population", a.max_population)?;
            probability("enemies.orb_drop_chance", a.orb_drop_chance)?;
            probability("enemies.relic_drop_chance", a.relic_drop_chance)?;
            probability("enemies.knockback_resistance", a.knockback_resistance)?;
        }

        let w = &self.weapons;
        probability("weapons.crit.chance", w.crit.chance)?;
        if w.crit.multiplier < 1.0 {
            return Err(SimError::InvalidConfig {
                field: "weapons.crit.multiplier",
                reason: "must be at least 1.0",
            });
        }
        positive("weapons.blaster.interval_secs", w.blaster.interval_secs)?;
        positive("weapons.blaster.speed", w.blaster.speed)?;
        positive("weapons.blaster.lifespan_secs", w.blaster.lifespan_secs)?;
        capacity("weapons.blaster.capacity", w.blaster.capacity)?;
        if w.blaster.pierce == 0 {
            return Err(SimError::InvalidConfig {
                field: "weapons.blaster.pierce",
                reason: "must be at least 1",
            });
        }
        positive("weapons.slash.interval_secs", w.slash.interval_secs)?;
        positive("weapons.slash.range", w.slash.range)?;
        positive("weapons.slash.duration_secs", w.slash.duration_secs)?;
        capacity("weapons.slash.capacity", w.slash.capacity)?;
        positive("weapons.pulse.interval_secs", w.pulse.interval_secs)?;
        positive("weapons.pulse.radius", w.pulse.radius)?;
        positive("weapons.drone.angular_speed", w.drone.angular_speed)?;
        positive("weapons.drone.hit_radius", w.drone.hit_radius)?;
        positive("weapons.roller.interval_secs", w.roller.interval_secs)?;
        positive("weapons.roller.roll_speed", w.roller.roll_speed)?;
        positive("weapons.roller.return_speed", w.roller.return_speed)?;
        positive("weapons.roller.travel_distance", w.roller.travel_distance)?;

        capacity("pickups.orb_capacity", self.pickups.orb_capacity)?;
        capacity("pickups.chest_capacity", self.pickups.chest_capacity)?;
        positive("pickups.orb_lifespan_secs", self.pickups.orb_lifespan_secs)?;

        positive("progression.initial_threshold", self.progression.initial_threshold)?;
        if self.progression.growth_factor <= 1.0 {
            return Err(SimError::InvalidConfig {
                field: "progression.growth_factor",
                reason: "must be greater than 1.0",
            });
        }
        capacity("progression.choices_per_level", self.progression.choices_per_level)?;
        positive("progression.relic_cycle_secs", self.progression.relic_cycle_secs)?;

        probability(
            "movement.offscreen_retarget_chance",
            self.movement.offscreen_retarget_chance,
        )?;
        positive("movement.offscreen_speed_factor", self.movement.offscreen_speed_factor)?;
        positive("movement.despawn_timeout_secs", self.movement.despawn_timeout_secs)?;
        positive("movement.knockback_secs", self.movement.knockback_secs)?;
        Ok(())
    }
}

fn merge_json(base: &mut serde_json::Value, overlay: serde_json::Value) {
    use serde_json::Value;
    match (base, overlay) {
        (Value::Object(base), Value::Object(overlay)) => {
            for (key, value) in overlay {
                match base.get_mut(&key) {
                    Some(slot) => merge_json(slot, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (slot, value) => *slot = value,
    }
}

fn scale_capacity(base: usize, multiplier: f32) -> usize {
    ((base as f32) * multiplier).ceil() as usize
}

fn positive(field: &'static str, value: f32) -> SimResult<()> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(SimError::InvalidConfig {
            field,
            reason: "must be positive",
        })
    }
}

fn non_negative(field: &'static str, value: f32) -> SimResult<()> {
    if value >= 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(SimError::InvalidConfig {
            field,
            reason: "must not be negative",
        })
    }
}

fn probability(field: &'static str, value: f32) -> SimResult<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(SimError::InvalidConfig {
            field,
            reason: "must be between 0.0 and 1.0",
        })
    }
}

fn capacity(field: &'static str, value: usize) -> SimResult<()> {
    if value > 0 {
        Ok(())
    } else {
        Err(SimError::InvalidConfig {
            field,
            reason: "must be non-zero",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        SimConfig::default().validate().unwrap();
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config = SimConfig::from_json(r#"{ "enemies": { "grunt": { "max_population": 7 } } }"#)
            .unwrap();
        assert_eq!(config.enemies.grunt.max_population, 7);
        assert!((config.enemies.grunt.base_spawn_interval_secs - 2.0).abs() < 1e-6);
        assert_eq!(config.enemies.brute.min_level, 3);
    }

    #[test]
    fn partial_archetype_keeps_its_own_defaults() {
        let config = SimConfig::from_json(r#"{ "enemies": { "brute": { "speed": 50.0 } } }"#)
            .unwrap();
        assert!((config.enemies.brute.speed - 50.0).abs() < 1e-6);
        assert!((config.enemies.brute.max_health - 140.0).abs() < 1e-6);
        assert_eq!(config.enemies.brute.min_level, 3);
    }

    #[test]
    fn invalid_values_are_rejected() {
        let err = SimConfig::from_json(r#"{ "progression": { "growth_factor": 0.9 } }"#)
            .unwrap_err();
        assert!(matches!(
            err,
            SimError::InvalidConfig {
                field: "progression.growth_factor",
                ..
            }
        ));

        let mut config = SimConfig::default();
        config.weapons.crit.chance = 1.5;
        assert!(config.validate().is_err());

        let err = SimConfig::from_json(r#"{ "enemies": { "swooper": { "spawn_floor": 0.0 } } }"#)
            .unwrap_err();
        assert!(matches!(
            err,
            SimError::InvalidConfig {
                field: "enemies.spawn_floor",
                ..
            }
        ));
    }

    #[test]
    fn spawn_floor_is_read_per_archetype() {
        let config = SimConfig::from_json(r#"{ "enemies": { "brute": { "spawn_floor": 0.6 } } }"#)
            .unwrap();
        assert!((config.enemies.brute.spawn_floor - 0.6).abs() < 1e-6);
        assert!((config.enemies.grunt.spawn_floor - 0.3).abs() < 1e-6);
    }

    #[test]
    fn preset_names_round_trip() {
        for preset in StressPreset::ALL {
            assert_eq!(StressPreset::from_str(preset.as_str()), Some(preset));
        }
        assert_eq!(StressPreset::from_str("SWARM"), Some(StressPreset::Swarm));
        assert!(matches!(
            StressPreset::parse("apocalypse"),
            Err(SimError::UnknownPreset(_))
        ));
    }

    #[test]
    fn preset_scales_caps_and_intervals() {
        let base = SimConfig::default();
        let swarm = base.with_preset(StressPreset::Swarm);
        assert_eq!(swarm.enemies.grunt.max_population, 900);
        assert!((swarm.enemies.grunt.base_spawn_interval_secs - 0.5).abs() < 1e-6);
        assert_eq!(swarm.pickups.orb_capacity, 2400);
        // The base value is left untouched
        assert_eq!(base.enemies.grunt.max_population, 150);

        let off = base.with_preset(StressPreset::Off);
        assert_eq!(off.enemies.brute.max_population, base.enemies.brute.max_population);
    }
}
