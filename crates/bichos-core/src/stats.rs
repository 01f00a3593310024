//! Session statistics tracking.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Counters for one game session. Only ever incremented.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statistics {
    /// Actions taken (shots and bombs)
    pub turns: u32,
    pub shots_fired: u32,
    /// Shots that landed on a living creature
    pub shots_hit: u32,
    pub bombs_used: u32,
    pub mutations_performed: u32,
    pub creatures_defeated: u32,
    pub total_points: u32,
}

impl Statistics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_turn(&mut self) {
        self.turns += 1;
    }

    pub fn record_shot(&mut self, hit: bool) {
        self.shots_fired += 1;
        if hit {
            self.shots_hit += 1;
        }
    }

    pub fn record_bomb(&mut self) {
        self.bombs_used += 1;
    }

    pub fn record_mutation(&mut self) {
        self.mutations_performed += 1;
    }

    /// Record a kill worth `points`
    pub fn record_defeat(&mut self, points: u32) {
        self.creatures_defeated += 1;
        self.total_points = self.total_points.saturating_add(points);
    }

    /// Percentage of shots that hit, 0 when nothing has been fired
    pub fn accuracy(&self) -> f64 {
        if self.shots_fired == 0 {
            0.0
        } else {
            (self.shots_hit as f64 * 100.0) / self.shots_fired as f64
        }
    }

    pub fn report(&self) -> StatisticsReport {
        StatisticsReport {
            turns: self.turns,
            shots_fired: self.shots_fired,
            shots_hit: self.shots_hit,
            accuracy: self.accuracy(),
            bombs_used: self.bombs_used,
            mutations_performed: self.mutations_performed,
            creatures_defeated: self.creatures_defeated,
            total_points: self.total_points,
        }
    }
}

/// Snapshot of the statistics with derived values filled in, for renderers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatisticsReport {
    pub turns: u32,
    pub shots_fired: u32,
    pub shots_hit: u32,
    pub accuracy: f64,
    pub bombs_used: u32,
    pub mutations_performed: u32,
    pub creatures_defeated: u32,
    pub total_points: u32,
}

impl fmt::Display for StatisticsReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Turns played:       {:>9}", self.turns)?;
        writeln!(f, "Shots fired:        {:>9}", self.shots_fired)?;
        writeln!(f, "Shots hit:          {:>9}", self.shots_hit)?;
        writeln!(f, "Accuracy:           {:>8.1}%", self.accuracy)?;
        writeln!(f, "Bombs used:         {:>9}", self.bombs_used)?;
        writeln!(f, "Mutations:          {:>9}", self.mutations_performed)?;
        writeln!(f, "Creatures defeated: {:>9}", self.creatures_defeated)?;
        write!(f, "Total points:       {:>9}", self.total_points)
    }
}
