//! Notifications for presentation subscribers
//!
//! The simulation never calls into audio or rendering; it pushes `GameEvent`s
//! onto a queue that the embedding layer drains after each tick. Nobody
//! draining the queue is fine: it is cleared at the start of the next tick.

use glam::Vec2;
use serde::Serialize;

use super::clock::PauseReason;
use super::entity::EnemyKind;
use super::player::WeaponKind;
use crate::config::StressPreset;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEvent {
    EnemySpawned {
        pos: Vec2,
        kind: EnemyKind,
    },
    EnemyDied {
        pos: Vec2,
        kind: EnemyKind,
    },
    /// Removed by the off-screen timeout rather than killed
    EnemyDespawned {
        pos: Vec2,
        kind: EnemyKind,
    },
    Hit {
        pos: Vec2,
        damage: f32,
        critical: bool,
        weapon: WeaponKind,
    },
    WeaponFired {
        weapon: WeaponKind,
        pos: Vec2,
    },
    PlayerDamaged {
        amount: f32,
        health: f32,
    },
    PlayerDied {
        pos: Vec2,
        level: u32,
        survived_secs: f32,
    },
    ExperienceCollected {
        value: f32,
        total: f32,
    },
    LevelUp {
        level: u32,
    },
    UpgradeOffered {
        choices: Vec<String>,
    },
    UpgradeApplied {
        id: String,
        level: u32,
    },
    RelicDropped {
        pos: Vec2,
    },
    RelicCollected {
        pos: Vec2,
    },
    /// Reveal animation started; the outcome is already applied
    RelicRevealed {
        id: String,
    },
    RelicClaimed {
        id: String,
    },
    Paused {
        reason: PauseReason,
    },
    Resumed {
        reason: PauseReason,
    },
    PresetChanged {
        preset: StressPreset,
    },
}

#[derive(Debug, Clone, Default)]
pub struct EventQueue {
    events: Vec<GameEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    /// Take every queued event, oldest first
    pub fn drain(&mut self) -> std::vec::Drain<'_, GameEvent> {
        self.events.drain(..)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, GameEvent> {
        self.events.iter()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Number of queued events matching `pred`
    pub fn count(&self, pred: impl Fn(&GameEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drain_empties_in_order() {
        let mut queue = EventQueue::new();
        queue.emit(GameEvent::LevelUp { level: 2 });
        queue.emit(GameEvent::LevelUp { level: 3 });
        let drained: Vec<_> = queue.drain().collect();
        assert_eq!(
            drained,
            vec![GameEvent::LevelUp { level: 2 }, GameEvent::LevelUp { level: 3 }]
        );
        assert!(queue.is_empty());
    }

    #[test]
    fn events_serialize_with_tag() {
        let json = serde_json::to_string(&GameEvent::RelicDropped {
            pos: Vec2::new(1.0, 2.0),
        })
        .unwrap();
        assert!(json.contains(r#""type":"relic_dropped""#));
    }
}
