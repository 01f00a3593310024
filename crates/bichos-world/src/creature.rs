//! Creature state and damage rules.

use bichos_core::{CreatureType, BULLET_DAMAGE, MUTATION_MULTIPLIER};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A cell occupant. Health never goes below zero and the type never changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "CreatureRecord")]
pub struct Creature {
    health: u32,
    #[serde(rename = "type")]
    kind: CreatureType,
}

/// On-disk shape; health may be negative in hand-edited files and is clamped on the way in.
#[derive(Deserialize)]
struct CreatureRecord {
    health: i64,
    #[serde(rename = "type")]
    kind: CreatureType,
}

impl From<CreatureRecord> for Creature {
    fn from(record: CreatureRecord) -> Self {
        Creature::new(record.health, record.kind)
    }
}

impl Default for Creature {
    fn default() -> Self {
        Self::empty()
    }
}

impl Creature {
    /// Create a creature, clamping negative health to zero
    pub fn new(health: i64, kind: CreatureType) -> Self {
        Self {
            health: clamp_health(health),
            kind,
        }
    }

    /// An empty cell
    pub fn empty() -> Self {
        Self {
            health: 0,
            kind: CreatureType::Empty,
        }
    }

    /// A creature of the given type at its default health
    pub fn spawn(kind: CreatureType) -> Self {
        Self::with_health(kind.default_health(), kind)
    }

    pub fn with_health(health: u32, kind: CreatureType) -> Self {
        Self { health, kind }
    }

    pub fn health(&self) -> u32 {
        self.health
    }

    pub fn kind(&self) -> CreatureType {
        self.kind
    }

    pub fn set_health(&mut self, health: i64) {
        self.health = clamp_health(health);
    }

    pub fn is_dead(&self) -> bool {
        self.health == 0
    }

    pub fn is_alive(&self) -> bool {
        !self.is_dead()
    }

    /// Apply a standard bullet. Returns false if the creature was already dead.
    pub fn damage_by_bullet(&mut self) -> bool {
        self.take_bullet(BULLET_DAMAGE)
    }

    /// Apply a bullet of the given damage. Returns false if the creature was already dead.
    pub fn take_bullet(&mut self, damage: u32) -> bool {
        if self.is_dead() {
            return false;
        }
        self.health = self.health.saturating_sub(damage);
        true
    }

    /// Kill outright. Returns false if the creature was already dead.
    pub fn damage_by_bomb(&mut self) -> bool {
        if self.is_dead() {
            return false;
        }
        self.health = 0;
        true
    }

    /// Double the health of a living creature
    pub fn mutate(&mut self) -> bool {
        self.mutate_by(MUTATION_MULTIPLIER)
    }

    pub fn mutate_by(&mut self, multiplier: u32) -> bool {
        if self.is_dead() {
            return false;
        }
        self.health = self.health.saturating_mul(multiplier);
        true
    }
}

fn clamp_health(health: i64) -> u32 {
    health.clamp(0, u32::MAX as i64) as u32
}

impl fmt::Display for Creature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_dead() {
            write!(f, "{}-X", self.kind)
        } else {
            write!(f, "{}-{}", self.kind, self.health)
        }
    }
}
