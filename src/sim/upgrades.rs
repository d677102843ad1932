//! Upgrade and relic catalog
//!
//! The definitions are built once when a run starts and never change; only
//! each entry's acquired level is mutated. Relics are entries flagged
//! `relic`, awarded through chests instead of level-up prompts.

use rand::Rng;
use rand::seq::index::sample;

use super::player::{Player, WeaponKind};

/// How a multiplicative stat changes per level
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Stack {
    /// Add to the multiplier (+0.25 = +25 % of base)
    Add(f32),
    /// Multiply the current multiplier
    Scale(f32),
}

impl Stack {
    fn apply(self, value: &mut f32) {
        match self {
            Stack::Add(amount) => *value += amount,
            Stack::Scale(factor) => *value *= factor,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Effect {
    Unlock(WeaponKind),
    Damage(WeaponKind, Stack),
    AttackSpeed(WeaponKind, Stack),
    ProjectileCount(u32),
    Pierce(u32),
    ProjectileSize(Stack),
    MoveSpeed(Stack),
    ExperienceGain(Stack),
    Area(WeaponKind, Stack),
    PickupRadius(Stack),
    DamageReduction(f32),
    /// Raises max health and heals the same amount
    MaxHealth(f32),
}

impl Effect {
    pub fn apply(&self, player: &mut Player) {
        let m = &mut player.modifiers;
        match *self {
            Effect::Unlock(weapon) => player.abilities[weapon] = true,
            Effect::Damage(weapon, stack) => stack.apply(&mut m.damage[weapon]),
            Effect::AttackSpeed(weapon, stack) => stack.apply(&mut m.attack_speed[weapon]),
            Effect::ProjectileCount(n) => m.projectile_count += n,
            Effect::Pierce(n) => m.pierce_bonus += n,
            Effect::ProjectileSize(stack) => stack.apply(&mut m.projectile_size),
            Effect::MoveSpeed(stack) => stack.apply(&mut m.move_speed),
            Effect::ExperienceGain(stack) => stack.apply(&mut m.experience_gain),
            Effect::Area(weapon, stack) => stack.apply(&mut m.area[weapon]),
            Effect::PickupRadius(stack) => stack.apply(&mut m.pickup_radius),
            Effect::DamageReduction(amount) => m.add_damage_reduction(amount),
            Effect::MaxHealth(amount) => player.raise_max_health(amount),
        }
    }
}

/// Availability predicate over the player's weapons
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Requirement {
    None,
    Owns(WeaponKind),
    Lacks(WeaponKind),
}

impl Requirement {
    pub fn is_met(&self, player: &Player) -> bool {
        match *self {
            Requirement::None => true,
            Requirement::Owns(weapon) => player.has(weapon),
            Requirement::Lacks(weapon) => !player.has(weapon),
        }
    }
}

#[derive(Debug, Clone)]
pub struct UpgradeDef {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub max_level: u32,
    pub relic: bool,
    pub requires: Requirement,
    pub effects: Vec<Effect>,
}

impl UpgradeDef {
    fn upgrade(
        id: &'static str,
        name: &'static str,
        description: &'static str,
        max_level: u32,
        requires: Requirement,
        effects: Vec<Effect>,
    ) -> Self {
        Self {
            id,
            name,
            description,
            max_level,
            relic: false,
            requires,
            effects,
        }
    }

    fn relic(
        id: &'static str,
        name: &'static str,
        description: &'static str,
        requires: Requirement,
        effects: Vec<Effect>,
    ) -> Self {
        Self {
            id,
            name,
            description,
            max_level: 1,
            relic: true,
            requires,
            effects,
        }
    }
}

fn unlock(weapon: WeaponKind) -> UpgradeDef {
    let (id, name, description) = match weapon {
        WeaponKind::Blaster => ("unlock_blaster", "Blaster", "Fires projectiles where you face"),
        WeaponKind::Slash => ("unlock_slash", "Arc Slash", "Sweeps a blade arc in front of you"),
        WeaponKind::Pulse => ("unlock_pulse", "Shock Pulse", "Blasts nearby enemies away"),
        WeaponKind::Drone => ("unlock_drone", "Drone", "A drone orbits and strikes enemies"),
        WeaponKind::Roller => ("unlock_roller", "Roller", "A companion rolls through enemies"),
    };
    UpgradeDef::upgrade(
        id,
        name,
        description,
        1,
        Requirement::Lacks(weapon),
        vec![Effect::Unlock(weapon)],
    )
}

fn damage_up(weapon: WeaponKind) -> UpgradeDef {
    let (id, name) = match weapon {
        WeaponKind::Blaster => ("blaster_damage", "Blaster Damage"),
        WeaponKind::Slash => ("slash_damage", "Slash Damage"),
        WeaponKind::Pulse => ("pulse_damage", "Pulse Damage"),
        WeaponKind::Drone => ("drone_damage", "Drone Damage"),
        WeaponKind::Roller => ("roller_damage", "Roller Damage"),
    };
    UpgradeDef::upgrade(
        id,
        name,
        "+25% damage",
        5,
        Requirement::Owns(weapon),
        vec![Effect::Damage(weapon, Stack::Add(0.25))],
    )
}

fn speed_up(weapon: WeaponKind) -> UpgradeDef {
    let (id, name) = match weapon {
        WeaponKind::Blaster => ("blaster_speed", "Blaster Speed"),
        WeaponKind::Slash => ("slash_speed", "Slash Speed"),
        WeaponKind::Pulse => ("pulse_speed", "Pulse Speed"),
        WeaponKind::Drone => ("drone_speed", "Drone Speed"),
        WeaponKind::Roller => ("roller_speed", "Roller Speed"),
    };
    UpgradeDef::upgrade(
        id,
        name,
        "+15% attack speed",
        5,
        Requirement::Owns(weapon),
        vec![Effect::AttackSpeed(weapon, Stack::Add(0.15))],
    )
}

/// Upgrade definitions plus the acquired level of each
#[derive(Debug, Clone)]
pub struct Catalog {
    defs: Vec<UpgradeDef>,
    levels: Vec<u32>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::standard()
    }
}

impl Catalog {
    pub fn new(defs: Vec<UpgradeDef>) -> Self {
        let levels = vec![0; defs.len()];
        Self { defs, levels }
    }

    /// The stock catalog
    pub fn standard() -> Self {
        use Requirement::{None as Always, Owns};
        use WeaponKind::*;

        let mut defs = Vec::new();
        defs.extend([Slash, Pulse, Drone, Roller].into_iter().map(unlock));
        defs.extend(WeaponKind::ALL.into_iter().map(damage_up));
        defs.extend(WeaponKind::ALL.into_iter().map(speed_up));
        defs.extend([
            UpgradeDef::upgrade(
                "multishot",
                "Multishot",
                "+1 projectile per volley",
                3,
                Owns(Blaster),
                vec![Effect::ProjectileCount(1)],
            ),
            UpgradeDef::upgrade(
                "projectile_size",
                "Heavy Rounds",
                "+20% projectile size",
                3,
                Owns(Blaster),
                vec![Effect::ProjectileSize(Stack::Add(0.2))],
            ),
            UpgradeDef::upgrade(
                "pierce",
                "Piercing",
                "Projectiles pass through one more enemy",
                3,
                Owns(Blaster),
                vec![Effect::Pierce(1)],
            ),
            UpgradeDef::upgrade(
                "move_speed",
                "Swift Boots",
                "+10% movement speed",
                5,
                Always,
                vec![Effect::MoveSpeed(Stack::Add(0.1))],
            ),
            UpgradeDef::upgrade(
                "experience_gain",
                "Scholar",
                "+20% experience",
                5,
                Always,
                vec![Effect::ExperienceGain(Stack::Add(0.2))],
            ),
            UpgradeDef::upgrade(
                "armor",
                "Armor",
                "Take 5% less damage",
                5,
                Always,
                vec![Effect::DamageReduction(0.05)],
            ),
            UpgradeDef::upgrade(
                "vitality",
                "Vitality",
                "+20 max health",
                5,
                Always,
                vec![Effect::MaxHealth(20.0)],
            ),
        ]);
        defs.extend([
            UpgradeDef::relic(
                "phantom_rounds",
                "Phantom Rounds",
                "Projectiles pierce two more enemies and fire one extra shot",
                Owns(Blaster),
                vec![Effect::Pierce(2), Effect::ProjectileCount(1)],
            ),
            UpgradeDef::relic(
                "whetstone",
                "Whetstone",
                "Slash damage x1.5",
                Owns(Slash),
                vec![Effect::Damage(Slash, Stack::Scale(1.5))],
            ),
            UpgradeDef::relic(
                "resonator",
                "Resonator",
                "Pulse area x1.5",
                Owns(Pulse),
                vec![Effect::Area(Pulse, Stack::Scale(1.5))],
            ),
            UpgradeDef::relic(
                "gyroscope",
                "Gyroscope",
                "Drone spins 50% faster",
                Owns(Drone),
                vec![Effect::AttackSpeed(Drone, Stack::Scale(1.5))],
            ),
            UpgradeDef::relic(
                "iron_hide",
                "Iron Hide",
                "Take 15% less damage",
                Always,
                vec![Effect::DamageReduction(0.15)],
            ),
            UpgradeDef::relic(
                "lodestone",
                "Lodestone",
                "Pickup radius x2",
                Always,
                vec![Effect::PickupRadius(Stack::Scale(2.0))],
            ),
        ]);
        Self::new(defs)
    }

    pub fn len(&self) -> usize {
        self.defs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }

    pub fn find(&self, id: &str) -> Option<usize> {
        self.defs.iter().position(|d| d.id == id)
    }

    pub fn def(&self, index: usize) -> &UpgradeDef {
        &self.defs[index]
    }

    pub fn level_of(&self, id: &str) -> Option<u32> {
        self.find(id).map(|i| self.levels[i])
    }

    fn is_available(&self, index: usize, player: &Player) -> bool {
        let def = &self.defs[index];
        self.levels[index] < def.max_level && def.requires.is_met(player)
    }

    /// Regular upgrades the player could be offered right now
    pub fn available(&self, player: &Player) -> Vec<usize> {
        (0..self.defs.len())
            .filter(|&i| !self.defs[i].relic && self.is_available(i, player))
            .collect()
    }

    /// Relics the player could still receive
    pub fn available_relics(&self, player: &Player) -> Vec<usize> {
        (0..self.defs.len())
            .filter(|&i| self.defs[i].relic && self.is_available(i, player))
            .collect()
    }

    /// Up to `count` distinct available upgrades, uniformly sampled
    pub fn sample_choices(
        &self,
        player: &Player,
        count: usize,
        rng: &mut impl Rng,
    ) -> Vec<&'static str> {
        let available = self.available(player);
        let amount = count.min(available.len());
        sample(rng, available.len(), amount)
            .into_iter()
            .map(|i| self.defs[available[i]].id)
            .collect()
    }

    /// Apply one level of the upgrade at `index`. Returns the new level.
    pub fn apply(&mut self, index: usize, player: &mut Player) -> u32 {
        for effect in &self.defs[index].effects {
            effect.apply(player);
        }
        self.levels[index] += 1;
        self.levels[index]
    }
}
