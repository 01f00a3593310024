//! Configuration types for the game.

use crate::error::{Error, Result};
use crate::types::CreatureType;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;
use tracing::warn;

/// Health removed by a single bullet
pub const BULLET_DAMAGE: u32 = 5;
/// Factor applied to a creature's health when it mutates
pub const MUTATION_MULTIPLIER: u32 = 2;
pub const DEFAULT_ROWS: usize = 2;
pub const DEFAULT_COLS: usize = 2;
pub const MIN_BOARD_SIZE: usize = 2;
pub const MAX_BOARD_SIZE: usize = 10;
/// File the board is saved to when no other path is configured
pub const SAVE_FILE: &str = "partida.json";

/// Attack, mutation and scoring rules
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RulesConfig {
    /// Health removed by a bullet
    pub bullet_damage: u32,
    /// Health multiplier applied by a mutation
    pub mutation_multiplier: u32,
    /// Starting health of a NORMAL creature
    pub normal_health: u32,
    /// Starting health of an ALIEN creature
    pub alien_health: u32,
    /// Points for defeating a NORMAL creature
    pub normal_points: u32,
    /// Points for defeating an ALIEN creature
    pub alien_points: u32,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            bullet_damage: BULLET_DAMAGE,
            mutation_multiplier: MUTATION_MULTIPLIER,
            normal_health: CreatureType::Normal.default_health(),
            alien_health: CreatureType::Alien.default_health(),
            normal_points: CreatureType::Normal.points(),
            alien_points: CreatureType::Alien.points(),
        }
    }
}

impl RulesConfig {
    pub fn health_for(&self, kind: CreatureType) -> u32 {
        match kind {
            CreatureType::Normal => self.normal_health,
            CreatureType::Alien => self.alien_health,
            CreatureType::Empty => 0,
        }
    }

    pub fn points_for(&self, kind: CreatureType) -> u32 {
        match kind {
            CreatureType::Normal => self.normal_points,
            CreatureType::Alien => self.alien_points,
            CreatureType::Empty => 0,
        }
    }
}

/// Allowed board dimensions (inclusive)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardLimits {
    pub min_size: usize,
    pub max_size: usize,
}

impl Default for BoardLimits {
    fn default() -> Self {
        Self {
            min_size: MIN_BOARD_SIZE,
            max_size: MAX_BOARD_SIZE,
        }
    }
}

impl BoardLimits {
    pub fn contains(&self, size: usize) -> bool {
        (self.min_size..=self.max_size).contains(&size)
    }
}

/// Game session configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    /// Number of board rows
    pub rows: usize,
    /// Number of board columns
    pub cols: usize,
    /// Random seed; `None` seeds from OS entropy
    pub seed: Option<u64>,
    /// Where `save`/`load` read and write the board
    pub save_path: PathBuf,
    pub rules: RulesConfig,
    pub limits: BoardLimits,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            rows: DEFAULT_ROWS,
            cols: DEFAULT_COLS,
            seed: None,
            save_path: PathBuf::from(SAVE_FILE),
            rules: RulesConfig::default(),
            limits: BoardLimits::default(),
        }
    }
}

impl GameConfig {
    /// Default configuration with the given board size
    pub fn with_size(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        let limits = &self.limits;
        if limits.min_size == 0 || limits.min_size > limits.max_size {
            return Err(Error::InvalidConfiguration(format!(
                "board limits {}..={} are empty",
                limits.min_size, limits.max_size
            )));
        }

        if !limits.contains(self.rows) {
            return Err(Error::InvalidConfiguration(format!(
                "rows must be between {} and {}, got {}",
                limits.min_size, limits.max_size, self.rows
            )));
        }

        if !limits.contains(self.cols) {
            return Err(Error::InvalidConfiguration(format!(
                "columns must be between {} and {}, got {}",
                limits.min_size, limits.max_size, self.cols
            )));
        }

        let rules = &self.rules;
        if rules.bullet_damage == 0 {
            return Err(Error::InvalidConfiguration(
                "bullet damage must be positive".to_string(),
            ));
        }
        if rules.mutation_multiplier == 0 {
            return Err(Error::InvalidConfiguration(
                "mutation multiplier must be positive".to_string(),
            ));
        }
        if rules.normal_health == 0 || rules.alien_health == 0 {
            return Err(Error::InvalidConfiguration(
                "spawned creatures must start alive".to_string(),
            ));
        }

        Ok(())
    }
}

/// Headless session runner configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunnerConfig {
    pub game: GameConfig,
    /// Hard stop for the auto-play loop
    pub max_turns: u32,
    /// Drop a random bomb on every n-th turn (0 disables)
    pub bomb_every: u32,
    /// Mutate the weakest creature on every n-th turn (0 disables)
    pub mutate_every: u32,
    /// Write the final board to `game.save_path`
    pub save_on_exit: bool,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            game: GameConfig {
                rows: 5,
                cols: 5,
                ..Default::default()
            },
            max_turns: 500,
            bomb_every: 7,
            mutate_every: 11,
            save_on_exit: false,
        }
    }
}

impl RunnerConfig {
    /// Default configuration with `BICHOS_*` environment overrides applied
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_overrides(|key| std::env::var(key).ok());
        config
    }

    /// Apply overrides from a key lookup. Unparseable values are logged and ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(rows) = parse_override(&lookup, "BICHOS_ROWS") {
            self.game.rows = rows;
        }
        if let Some(cols) = parse_override(&lookup, "BICHOS_COLS") {
            self.game.cols = cols;
        }
        if let Some(seed) = parse_override(&lookup, "BICHOS_SEED") {
            self.game.seed = Some(seed);
        }
        if let Some(max_turns) = parse_override(&lookup, "BICHOS_MAX_TURNS") {
            self.max_turns = max_turns;
        }
        if let Some(path) = lookup("BICHOS_SAVE_PATH") {
            self.game.save_path = PathBuf::from(path);
            self.save_on_exit = true;
        }
    }
}

fn parse_override<T, F>(lookup: &F, key: &str) -> Option<T>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(key, value = %raw, "Ignoring unparseable override");
            None
        }
    }
}
