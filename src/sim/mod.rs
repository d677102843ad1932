//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Seeded RNG only
//! - Stable iteration order (by pool slot)
//! - No rendering, audio, or platform dependencies

pub mod clock;
pub mod combat;
pub mod entity;
pub mod events;
pub mod geom;
pub mod movement;
pub mod pickups;
pub mod player;
pub mod pool;
pub mod progression;
pub mod spawner;
pub mod state;
pub mod tick;
pub mod upgrades;
pub mod weapons;
pub mod world;

pub use clock::{Cadence, PauseReason, SimClock};
pub use combat::{ContactDamage, DamageSource, EnemyOutcome, Hit, damage_enemy, roll_hit};
pub use entity::{Enemy, EnemyKind, ExperienceOrb, Projectile, RelicChest, SlashArc, Steering};
pub use events::{EventQueue, GameEvent};
pub use geom::Rect;
pub use player::{DamageTaken, Modifiers, PerWeapon, Player, WeaponKind};
pub use pool::{Handle, Pool, Recycle};
pub use progression::{Phase, Progression, RelicReveal};
pub use spawner::{Spawner, Spawners, spawn_interval};
pub use state::{GamePhase, GameState, RunSummary};
pub use tick::{TickInput, tick};
pub use upgrades::{Catalog, Effect, Requirement, UpgradeDef};
pub use weapons::{Arsenal, WeaponContext};
pub use world::World;
