//! JSON save file codec.
//!
//! The save file is a 2D JSON array of `{"health": n, "type": "NORMAL"|"ALIEN"|"VACIO"}`
//! objects, one inner array per board row. Shape checks are left to the caller so that a
//! well-formed file for a different board size is not an error. A file holding a bare
//! `null` is treated as having no saved board.

use crate::board::Board;
use crate::creature::Creature;
use bichos_core::Result;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

/// Serialize a board to its save-file JSON
pub fn board_to_json(board: &Board) -> Result<String> {
    Ok(serde_json::to_string(board)?)
}

/// Parse save-file JSON into nested rows without checking their shape.
/// `Ok(None)` when the document is `null`.
pub fn rows_from_json(data: &str) -> Result<Option<Vec<Vec<Creature>>>> {
    Ok(serde_json::from_str(data)?)
}

/// Write a board to `path`, replacing any existing file
pub fn write_board(path: &Path, board: &Board) -> Result<()> {
    let json = board_to_json(board)?;
    fs::write(path, json)?;
    Ok(())
}

/// Read rows from `path`. `Ok(None)` when the file does not exist or holds `null`.
pub fn read_rows(path: &Path) -> Result<Option<Vec<Vec<Creature>>>> {
    let data = match fs::read_to_string(path) {
        Ok(data) => data,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };

    rows_from_json(&data)
}
