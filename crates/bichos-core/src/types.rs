//! Core type definitions for the game.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Cell coordinate on the board, row-major.
///
/// Signed so that callers can pass coordinates straight from user input;
/// anything outside the board is a miss rather than an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub row: i32,
    pub col: i32,
}

impl Position {
    pub fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// Whether the position falls inside a `rows x cols` board
    pub fn in_bounds(&self, rows: usize, cols: usize) -> bool {
        self.row >= 0 && self.col >= 0 && (self.row as usize) < rows && (self.col as usize) < cols
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{},{}]", self.row, self.col)
    }
}

/// Kind of creature occupying a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CreatureType {
    #[serde(rename = "NORMAL")]
    Normal,
    #[serde(rename = "ALIEN")]
    Alien,
    /// No creature present
    #[serde(rename = "VACIO")]
    Empty,
}

impl CreatureType {
    /// Health a freshly spawned creature of this type starts with
    pub fn default_health(&self) -> u32 {
        match self {
            CreatureType::Normal => 10,
            CreatureType::Alien => 20,
            CreatureType::Empty => 0,
        }
    }

    /// Points awarded for defeating a creature of this type
    pub fn points(&self) -> u32 {
        match self {
            CreatureType::Normal => 10,
            CreatureType::Alien => 20,
            CreatureType::Empty => 0,
        }
    }

    /// Name used in the save file and in the textual cell form
    pub fn as_str(&self) -> &'static str {
        match self {
            CreatureType::Normal => "NORMAL",
            CreatureType::Alien => "ALIEN",
            CreatureType::Empty => "VACIO",
        }
    }

    pub fn all() -> [CreatureType; 3] {
        [CreatureType::Empty, CreatureType::Normal, CreatureType::Alien]
    }
}

impl fmt::Display for CreatureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
