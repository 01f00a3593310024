//! Fixed-size 2D board of creatures.

use crate::creature::Creature;
use bichos_core::{CreatureType, Position};
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A rectangular, row-major grid of creatures
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "Vec<Vec<Creature>>", try_from = "Vec<Vec<Creature>>")]
pub struct Board {
    rows: usize,
    cols: usize,
    cells: Vec<Creature>,
}

impl Board {
    /// An all-empty board. A zero dimension yields a board with no cells (0x0).
    pub fn new(rows: usize, cols: usize) -> Self {
        let (rows, cols) = if rows == 0 || cols == 0 { (0, 0) } else { (rows, cols) };
        Self {
            rows,
            cols,
            cells: vec![Creature::empty(); rows * cols],
        }
    }

    /// Build a board from nested rows. Returns `None` for an empty or ragged array.
    pub fn from_rows(rows: Vec<Vec<Creature>>) -> Option<Self> {
        let cols = rows.first()?.len();
        if cols == 0 || rows.iter().any(|row| row.len() != cols) {
            return None;
        }

        Some(Self {
            rows: rows.len(),
            cols,
            cells: rows.into_iter().flatten().collect(),
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn dimensions(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Creature at `pos`, or `None` when out of bounds
    pub fn get(&self, pos: Position) -> Option<&Creature> {
        let index = self.pos_to_index(pos)?;
        Some(&self.cells[index])
    }

    pub fn get_mut(&mut self, pos: Position) -> Option<&mut Creature> {
        let index = self.pos_to_index(pos)?;
        Some(&mut self.cells[index])
    }

    /// Replace the creature at `pos`. Returns false when out of bounds.
    pub fn set(&mut self, pos: Position, creature: Creature) -> bool {
        match self.get_mut(pos) {
            Some(cell) => {
                *cell = creature;
                true
            }
            None => false,
        }
    }

    /// Empty every cell
    pub fn clear(&mut self) {
        self.cells.fill(Creature::empty());
    }

    /// Give every cell an independent, uniform pick of empty, normal or alien.
    /// `health_for` decides the starting health of each type.
    pub fn populate<F>(&mut self, rng: &mut ChaCha8Rng, health_for: F)
    where
        F: Fn(CreatureType) -> u32,
    {
        for cell in &mut self.cells {
            let kind = match rng.gen_range(0..3) {
                1 => CreatureType::Normal,
                2 => CreatureType::Alien,
                _ => CreatureType::Empty,
            };
            *cell = Creature::with_health(health_for(kind), kind);
        }
    }

    /// Whether any creature is still alive
    pub fn any_alive(&self) -> bool {
        self.cells.iter().any(Creature::is_alive)
    }

    pub fn alive_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_alive()).count()
    }

    /// Living creature with the strictly lowest health; the first in row-major order wins ties
    pub fn weakest_alive(&self) -> Option<Position> {
        let mut weakest: Option<(usize, u32)> = None;

        for (index, cell) in self.cells.iter().enumerate() {
            if cell.is_dead() {
                continue;
            }
            match weakest {
                Some((_, min)) if cell.health() >= min => {}
                _ => weakest = Some((index, cell.health())),
            }
        }

        weakest.map(|(index, _)| self.index_to_pos(index))
    }

    fn pos_to_index(&self, pos: Position) -> Option<usize> {
        if pos.in_bounds(self.rows, self.cols) {
            Some(pos.row as usize * self.cols + pos.col as usize)
        } else {
            None
        }
    }

    /// Get position from index
    pub fn index_to_pos(&self, index: usize) -> Position {
        Position::new((index / self.cols) as i32, (index % self.cols) as i32)
    }

    /// Iterator over all cells with positions, row-major
    pub fn iter(&self) -> impl Iterator<Item = (Position, &Creature)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, cell)| (self.index_to_pos(i), cell))
    }

    /// Iterator over rows as slices
    pub fn row_slices(&self) -> impl Iterator<Item = &[Creature]> + '_ {
        self.cells.chunks(self.cols.max(1))
    }

    /// Nested copy of the grid, one `Vec` per row
    pub fn to_rows(&self) -> Vec<Vec<Creature>> {
        self.row_slices().map(<[Creature]>::to_vec).collect()
    }
}

impl From<Board> for Vec<Vec<Creature>> {
    fn from(board: Board) -> Self {
        board.to_rows()
    }
}

impl TryFrom<Vec<Vec<Creature>>> for Board {
    type Error = String;

    fn try_from(rows: Vec<Vec<Creature>>) -> Result<Self, Self::Error> {
        Board::from_rows(rows).ok_or_else(|| "board must be a non-empty rectangular array".to_string())
    }
}

/// One line per row, each cell as `[r,c]=TYPE-H` followed by two spaces
impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (pos, cell) in self.iter() {
            write!(f, "{}={}  ", pos, cell)?;
            if pos.col as usize == self.cols - 1 {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}
