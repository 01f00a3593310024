//! Game-state engine.
//!
//! This module implements the creature board, the attack and mutation rules, and
//! persistence of the board to a JSON save file.

pub mod board;
pub mod creature;
pub mod engine;
pub mod persistence;

pub use board::Board;
pub use creature::Creature;
pub use engine::Engine;
