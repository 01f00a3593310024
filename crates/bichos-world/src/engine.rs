//! Game engine: owns the board, statistics and random source for one session.

use crate::board::Board;
use crate::creature::Creature;
use crate::persistence;
use bichos_core::{CreatureType, GameConfig, Position, Result, Statistics};
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::path::Path;
use tracing::{debug, info, instrument, warn};

/// One game session on a fixed-size board
pub struct Engine {
    board: Board,
    stats: Statistics,
    config: GameConfig,
    rng: ChaCha8Rng,
}

impl Engine {
    /// Engine with default rules on a `rows x cols` board
    pub fn new(rows: usize, cols: usize) -> Result<Self> {
        Self::from_config(GameConfig::with_size(rows, cols))
    }

    /// Engine seeded from `config.seed`, or from OS entropy when unset
    pub fn from_config(config: GameConfig) -> Result<Self> {
        let rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        Self::with_rng(config, rng)
    }

    /// Engine drawing from the given random source
    pub fn with_rng(config: GameConfig, rng: ChaCha8Rng) -> Result<Self> {
        config.validate()?;

        info!(rows = config.rows, cols = config.cols, "Creating game engine");

        Ok(Self {
            board: Board::new(config.rows, config.cols),
            stats: Statistics::new(),
            config,
            rng,
        })
    }

    /// Default 2x2 session
    pub fn with_defaults() -> Result<Self> {
        Self::from_config(GameConfig::default())
    }

    pub fn rows(&self) -> usize {
        self.config.rows
    }

    pub fn cols(&self) -> usize {
        self.config.cols
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn statistics(&self) -> &Statistics {
        &self.stats
    }

    pub fn cell(&self, row: i32, col: i32) -> Option<&Creature> {
        self.board.get(Position::new(row, col))
    }

    /// Place a creature. Returns false when out of bounds.
    pub fn set_cell(&mut self, row: i32, col: i32, creature: Creature) -> bool {
        self.board.set(Position::new(row, col), creature)
    }

    /// Empty every cell
    pub fn reset_board(&mut self) {
        self.board.clear();
        debug!("Board reset");
    }

    /// Fill every cell with an empty, normal or alien creature, each with probability 1/3
    pub fn populate_random(&mut self) {
        let rules = &self.config.rules;
        self.board.populate(&mut self.rng, |kind| rules.health_for(kind));

        info!(
            alive = self.board.alive_count(),
            cells = self.rows() * self.cols(),
            "Board populated"
        );
    }

    /// Start a new session on the same board size: empty board, fresh statistics
    pub fn new_game(&mut self) {
        self.board.clear();
        self.stats = Statistics::new();
        info!(rows = self.rows(), cols = self.cols(), "New game started");
    }

    /// Fire a bullet. Returns whether it landed on a living creature.
    pub fn shoot(&mut self, row: i32, col: i32) -> bool {
        self.stats.record_turn();

        let pos = Position::new(row, col);
        let damage = self.config.rules.bullet_damage;

        let Some(cell) = self.board.get_mut(pos) else {
            self.stats.record_shot(false);
            debug!(%pos, "Shot out of bounds");
            return false;
        };

        let was_alive = cell.is_alive();
        let hit = cell.take_bullet(damage);
        let kind = cell.kind();
        let health = cell.health();

        self.stats.record_shot(hit);
        debug!(%pos, hit, health, "Shot fired");

        if was_alive && health == 0 {
            self.record_defeat(pos, kind);
        }

        hit
    }

    /// Drop a bomb. Returns whether the target was alive.
    pub fn bomb_at(&mut self, row: i32, col: i32) -> bool {
        self.stats.record_turn();
        self.stats.record_bomb();

        let pos = Position::new(row, col);

        let Some(cell) = self.board.get_mut(pos) else {
            debug!(%pos, "Bomb out of bounds");
            return false;
        };

        let hit = cell.damage_by_bomb();
        let kind = cell.kind();

        debug!(%pos, hit, "Bomb dropped");

        if hit {
            self.record_defeat(pos, kind);
        }

        hit
    }

    /// Drop a bomb on a uniformly chosen cell
    pub fn bomb_random(&mut self) -> bool {
        let row = self.rng.gen_range(0..self.rows()) as i32;
        let col = self.rng.gen_range(0..self.cols()) as i32;
        self.bomb_at(row, col)
    }

    /// Mutate the living creature with the lowest health. Ties go to the first cell in
    /// row-major order. Returns false when nothing is alive.
    pub fn mutate_weakest(&mut self) -> bool {
        let Some(pos) = self.board.weakest_alive() else {
            debug!("No living creature to mutate");
            return false;
        };

        let multiplier = self.config.rules.mutation_multiplier;
        let Some(cell) = self.board.get_mut(pos) else {
            return false;
        };

        let mutated = cell.mutate_by(multiplier);
        if mutated {
            self.stats.record_mutation();
            debug!(%pos, health = cell.health(), "Creature mutated");
        }

        mutated
    }

    /// True once no creature on the board is alive
    pub fn is_game_over(&self) -> bool {
        !self.board.any_alive()
    }

    /// Replace the board if its dimensions match this session's
    pub fn set_board(&mut self, board: Board) -> bool {
        if board.dimensions() != (self.rows(), self.cols()) {
            debug!(
                expected_rows = self.rows(),
                expected_cols = self.cols(),
                rows = board.rows(),
                cols = board.cols(),
                "Rejected board with mismatched dimensions"
            );
            return false;
        }

        self.board = board;
        true
    }

    /// Save the board to the configured save path
    pub fn save(&self) -> Result<()> {
        self.save_to(&self.config.save_path)
    }

    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<()> {
        persistence::write_board(path.as_ref(), &self.board)?;
        info!("Game saved");
        Ok(())
    }

    /// Load the board from the configured save path.
    ///
    /// Returns `Ok(false)` without touching the board if the file is missing, holds `null`,
    /// or holds a board of a different size.
    pub fn load(&mut self) -> Result<bool> {
        let path = self.config.save_path.clone();
        self.load_from(path)
    }

    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn load_from(&mut self, path: impl AsRef<Path>) -> Result<bool> {
        let Some(rows) = persistence::read_rows(path.as_ref())? else {
            info!("No saved board found");
            return Ok(false);
        };

        let Some(board) = Board::from_rows(rows) else {
            warn!("Save file does not hold a rectangular board");
            return Ok(false);
        };

        if !self.set_board(board) {
            warn!(
                rows = self.rows(),
                cols = self.cols(),
                "Save file board size does not match this game"
            );
            return Ok(false);
        }

        info!(alive = self.board.alive_count(), "Game loaded");
        Ok(true)
    }

    fn record_defeat(&mut self, pos: Position, kind: CreatureType) {
        let points = self.config.rules.points_for(kind);
        self.stats.record_defeat(points);

        info!(
            %pos,
            kind = %kind,
            points,
            total_points = self.stats.total_points,
            "Creature defeated"
        );

        if self.is_game_over() {
            info!(turns = self.stats.turns, "All creatures defeated");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bichos_core::{Error, RulesConfig};
    use proptest::prelude::*;

    fn seeded(rows: usize, cols: usize, seed: u64) -> Engine {
        Engine::from_config(GameConfig {
            seed: Some(seed),
            ..GameConfig::with_size(rows, cols)
        })
        .unwrap()
    }

    #[test]
    fn test_engine_creation() {
        let engine = Engine::new(3, 4).unwrap();
        assert_eq!(engine.rows(), 3);
        assert_eq!(engine.cols(), 4);
        assert!(engine.board().iter().all(|(_, c)| *c == Creature::empty()));
        assert_eq!(engine.statistics(), &Statistics::new());

        let engine = Engine::with_defaults().unwrap();
        assert_eq!(engine.board().dimensions(), (2, 2));
    }

    #[test]
    fn test_invalid_dimensions() {
        for (rows, cols) in [(1, 2), (2, 11), (0, 5), (11, 11)] {
            assert!(matches!(
                Engine::new(rows, cols),
                Err(Error::InvalidConfiguration(_))
            ));
        }
    }

    #[test]
    fn test_shooting_scenario() {
        let mut engine = Engine::new(2, 2).unwrap();
        engine.set_cell(0, 0, Creature::new(10, CreatureType::Normal));

        assert!(engine.shoot(0, 0));
        assert_eq!(engine.cell(0, 0), Some(&Creature::new(5, CreatureType::Normal)));
        assert_eq!(engine.statistics().total_points, 0);

        assert!(engine.shoot(0, 0));
        assert!(engine.cell(0, 0).unwrap().is_dead());
        assert_eq!(engine.statistics().creatures_defeated, 1);
        assert_eq!(engine.statistics().total_points, 10);

        assert!(!engine.shoot(0, 0));
        let stats = engine.statistics();
        assert_eq!(stats.total_points, 10);
        assert_eq!(stats.creatures_defeated, 1);
        assert_eq!(stats.turns, 3);
        assert_eq!(stats.shots_fired, 3);
        assert_eq!(stats.shots_hit, 2);
    }

    #[test]
    fn test_shoot_out_of_bounds() {
        let mut engine = seeded(2, 2, 9);
        engine.populate_random();
        let before = engine.board().clone();

        for (row, col) in [(-1, 0), (0, -1), (2, 0), (0, 2), (i32::MAX, i32::MIN)] {
            assert!(!engine.shoot(row, col));
        }

        assert_eq!(engine.board(), &before);
        let stats = engine.statistics();
        assert_eq!(stats.turns, 5);
        assert_eq!(stats.shots_fired, 5);
        assert_eq!(stats.shots_hit, 0);
    }

    #[test]
    fn test_bomb_kills_and_scores_once() {
        let mut engine = Engine::new(2, 2).unwrap();
        engine.set_cell(0, 1, Creature::new(500, CreatureType::Alien));
        engine.set_cell(1, 0, Creature::new(1, CreatureType::Normal));

        assert!(engine.bomb_at(0, 1));
        assert!(engine.cell(0, 1).unwrap().is_dead());
        assert_eq!(engine.statistics().total_points, 20);

        assert!(!engine.bomb_at(0, 1));
        assert_eq!(engine.statistics().total_points, 20);

        assert!(engine.bomb_at(1, 0));
        assert_eq!(engine.statistics().total_points, 30);
        assert_eq!(engine.statistics().creatures_defeated, 2);

        assert!(!engine.bomb_at(5, 5));
        let stats = engine.statistics();
        assert_eq!(stats.turns, 4);
        assert_eq!(stats.bombs_used, 4);
        assert_eq!(stats.shots_fired, 0);
    }

    #[test]
    fn test_bomb_on_empty_cell() {
        let mut engine = Engine::new(2, 2).unwrap();
        assert!(!engine.bomb_at(1, 1));
        assert_eq!(engine.statistics().creatures_defeated, 0);
        assert_eq!(engine.statistics().bombs_used, 1);
    }

    #[test]
    fn test_bomb_random_is_seeded() {
        let run = |seed| {
            let mut engine = seeded(4, 4, seed);
            engine.populate_random();
            let hits: Vec<bool> = (0..10).map(|_| engine.bomb_random()).collect();
            (hits, engine.board().clone())
        };

        assert_eq!(run(3), run(3));

        let mut engine = seeded(3, 3, 11);
        for _ in 0..20 {
            engine.bomb_random();
        }
        assert_eq!(engine.statistics().bombs_used, 20);
        assert_eq!(engine.statistics().turns, 20);
    }

    #[test]
    fn test_mutation_scenario() {
        let mut engine = Engine::new(2, 2).unwrap();
        engine.set_cell(0, 0, Creature::new(5, CreatureType::Normal));
        engine.set_cell(0, 1, Creature::new(10, CreatureType::Normal));
        engine.set_cell(1, 0, Creature::new(0, CreatureType::Normal));
        engine.set_cell(1, 1, Creature::new(0, CreatureType::Normal));

        assert!(engine.mutate_weakest());
        assert_eq!(engine.cell(0, 0).unwrap().health(), 10);
        assert_eq!(engine.cell(0, 1).unwrap().health(), 10);

        // Both at 10: the first in row-major order is mutated
        assert!(engine.mutate_weakest());
        assert_eq!(engine.cell(0, 0).unwrap().health(), 20);
        assert_eq!(engine.cell(0, 1).unwrap().health(), 10);
        assert_eq!(engine.statistics().mutations_performed, 2);
    }

    #[test]
    fn test_mutate_with_nothing_alive() {
        let mut engine = Engine::new(2, 3).unwrap();
        assert!(!engine.mutate_weakest());
        assert_eq!(engine.statistics(), &Statistics::new());
    }

    #[test]
    fn test_game_over_tracks_living_cells() {
        let mut engine = seeded(2, 2, 0);
        engine.reset_board();
        assert!(engine.is_game_over());

        for seed in 0..50 {
            let mut engine = seeded(2, 2, seed);
            engine.populate_random();
            let any_alive = engine.board().iter().any(|(_, c)| c.health() > 0);
            assert_eq!(engine.is_game_over(), !any_alive);

            engine.reset_board();
            assert!(engine.is_game_over());
        }
    }

    #[test]
    fn test_game_over_after_clearing() {
        let mut engine = seeded(3, 3, 21);
        engine.populate_random();

        let living: Vec<Position> = engine
            .board()
            .iter()
            .filter(|(_, c)| c.is_alive())
            .map(|(pos, _)| pos)
            .collect();

        for pos in living {
            assert!(!engine.is_game_over());
            assert!(engine.bomb_at(pos.row, pos.col));
        }
        assert!(engine.is_game_over());
    }

    #[test]
    fn test_set_board() {
        let mut engine = Engine::new(2, 3).unwrap();

        assert!(!engine.set_board(Board::new(3, 2)));
        assert!(!engine.set_board(Board::new(2, 2)));
        assert!(engine.is_game_over());

        let mut board = Board::new(2, 3);
        board.set(Position::new(1, 2), Creature::spawn(CreatureType::Alien));
        assert!(engine.set_board(board.clone()));
        assert_eq!(engine.board(), &board);
    }

    #[test]
    fn test_custom_rules() {
        let config = GameConfig {
            rules: RulesConfig {
                bullet_damage: 3,
                mutation_multiplier: 3,
                normal_points: 1,
                ..Default::default()
            },
            ..GameConfig::with_size(2, 2)
        };
        let mut engine = Engine::from_config(config).unwrap();
        engine.set_cell(0, 0, Creature::new(4, CreatureType::Normal));

        assert!(engine.mutate_weakest());
        assert_eq!(engine.cell(0, 0).unwrap().health(), 12);

        for _ in 0..4 {
            assert!(engine.shoot(0, 0));
        }
        assert!(engine.cell(0, 0).unwrap().is_dead());
        assert_eq!(engine.statistics().total_points, 1);
    }

    #[test]
    fn test_new_game_resets_session() {
        let mut engine = seeded(3, 3, 5);
        engine.populate_random();
        engine.shoot(0, 0);
        engine.bomb_random();

        engine.new_game();
        assert!(engine.is_game_over());
        assert_eq!(engine.statistics(), &Statistics::new());
        assert_eq!(engine.board().dimensions(), (3, 3));
    }

    #[test]
    fn test_save_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("partida.json");

        let mut engine = seeded(3, 4, 77);
        engine.populate_random();
        engine.shoot(0, 0);
        engine.mutate_weakest();
        engine.save_to(&path).unwrap();
        let saved = engine.board().clone();

        let mut restored = seeded(3, 4, 1);
        assert!(restored.load_from(&path).unwrap());
        assert_eq!(restored.board(), &saved);
        for (pos, cell) in saved.iter() {
            let loaded = restored.cell(pos.row, pos.col).unwrap();
            assert_eq!(loaded.kind(), cell.kind());
            assert_eq!(loaded.health(), cell.health());
        }
    }

    #[test]
    fn test_save_and_load_use_configured_path() {
        let dir = tempfile::tempdir().unwrap();
        let config = GameConfig {
            save_path: dir.path().join("custom.json"),
            seed: Some(4),
            ..GameConfig::with_size(2, 2)
        };

        let mut engine = Engine::from_config(config.clone()).unwrap();
        engine.set_cell(1, 1, Creature::spawn(CreatureType::Alien));
        engine.save().unwrap();
        assert!(config.save_path.exists());

        let mut other = Engine::from_config(config).unwrap();
        assert!(other.load().unwrap());
        assert_eq!(other.cell(1, 1), Some(&Creature::spawn(CreatureType::Alien)));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut engine = Engine::new(2, 2).unwrap();
        engine.set_cell(0, 0, Creature::spawn(CreatureType::Normal));

        assert!(!engine.load_from(dir.path().join("missing.json")).unwrap());
        assert_eq!(engine.cell(0, 0), Some(&Creature::spawn(CreatureType::Normal)));
    }

    #[test]
    fn test_load_mismatched_dimensions() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("partida.json");

        let mut big = seeded(3, 3, 8);
        big.populate_random();
        big.save_to(&path).unwrap();

        let mut engine = Engine::new(2, 2).unwrap();
        engine.set_cell(0, 0, Creature::spawn(CreatureType::Alien));
        let before = engine.board().clone();
        assert!(!engine.load_from(&path).unwrap());
        assert_eq!(engine.board(), &before);

        // Right row count, ragged rows
        std::fs::write(
            &path,
            r#"[[{"health":1,"type":"NORMAL"},{"health":1,"type":"NORMAL"}],[{"health":1,"type":"NORMAL"}]]"#,
        )
        .unwrap();
        assert!(!engine.load_from(&path).unwrap());
        assert_eq!(engine.board(), &before);
    }

    #[test]
    fn test_load_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("partida.json");
        std::fs::write(&path, "{ definitely not a board").unwrap();

        let mut engine = Engine::new(2, 2).unwrap();
        engine.set_cell(1, 0, Creature::spawn(CreatureType::Normal));
        let before = engine.board().clone();

        let err = engine.load_from(&path).unwrap_err();
        assert!(matches!(err, Error::Serialization(_)));
        assert!(err.is_persistence());
        assert_eq!(engine.board(), &before);
    }

    #[test]
    fn test_save_failure_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let engine = Engine::new(2, 2).unwrap();
        assert!(matches!(engine.save_to(dir.path()), Err(Error::Io(_))));
    }

    #[test]
    fn test_load_unreadable_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut engine = Engine::new(2, 2).unwrap();
        engine.set_cell(0, 1, Creature::spawn(CreatureType::Alien));
        let before = engine.board().clone();

        // The path exists but is a directory, so reading it fails
        let err = engine.load_from(dir.path()).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
        assert!(err.is_persistence());
        assert_eq!(engine.board(), &before);
    }

    #[test]
    fn test_load_null_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("partida.json");
        std::fs::write(&path, "null").unwrap();

        let mut engine = Engine::new(2, 2).unwrap();
        engine.set_cell(1, 1, Creature::spawn(CreatureType::Normal));
        let before = engine.board().clone();

        assert!(!engine.load_from(&path).unwrap());
        assert_eq!(engine.board(), &before);
    }

    fn any_creature() -> impl Strategy<Value = Creature> {
        let kind = prop_oneof![
            Just(CreatureType::Normal),
            Just(CreatureType::Alien),
            Just(CreatureType::Empty),
        ];
        (0..u32::MAX, kind).prop_map(|(health, kind)| Creature::with_health(health, kind))
    }

    fn any_board() -> impl Strategy<Value = Board> {
        (2usize..=10, 2usize..=10).prop_flat_map(|(rows, cols)| {
            proptest::collection::vec(proptest::collection::vec(any_creature(), cols), rows)
                .prop_map(|rows| Board::from_rows(rows).unwrap())
        })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn prop_save_load_roundtrip(board in any_board()) {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("partida.json");

            let (rows, cols) = board.dimensions();
            let mut engine = Engine::new(rows, cols).unwrap();
            prop_assert!(engine.set_board(board.clone()));
            engine.save_to(&path).unwrap();

            let mut restored = Engine::new(rows, cols).unwrap();
            prop_assert!(restored.load_from(&path).unwrap());
            prop_assert_eq!(restored.board(), &board);
        }
    }
}
