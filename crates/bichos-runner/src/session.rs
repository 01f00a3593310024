//! Headless auto-play session.

use bichos_core::{Position, RunnerConfig, StatisticsReport};
use bichos_world::Engine;
use serde::Serialize;
use tracing::{info, instrument};

/// How a session ended
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionOutcome {
    /// Actions taken by the runner, mutations included
    pub actions: u32,
    /// Every creature was defeated before `max_turns`
    pub victory: bool,
    pub report: StatisticsReport,
}

/// Populate the board and play until every creature is dead or the turn limit is hit.
///
/// Each action is a random bomb on multiples of `bomb_every`, a mutation on multiples of
/// `mutate_every`, and otherwise a shot at the first living cell in row-major order.
#[instrument(skip_all, fields(max_turns = config.max_turns))]
pub fn run_session(engine: &mut Engine, config: &RunnerConfig) -> SessionOutcome {
    engine.populate_random();

    let mut actions = 0;
    while !engine.is_game_over() && actions < config.max_turns {
        actions += 1;

        if is_multiple(actions, config.bomb_every) {
            engine.bomb_random();
        } else if is_multiple(actions, config.mutate_every) {
            engine.mutate_weakest();
        } else if let Some(pos) = first_living(engine) {
            engine.shoot(pos.row, pos.col);
        }
    }

    let victory = engine.is_game_over();
    let report = engine.statistics().report();

    info!(
        actions,
        victory,
        total_points = report.total_points,
        accuracy = format!("{:.1}%", report.accuracy),
        "Session finished"
    );

    SessionOutcome {
        actions,
        victory,
        report,
    }
}

fn is_multiple(n: u32, every: u32) -> bool {
    every != 0 && n % every == 0
}

fn first_living(engine: &Engine) -> Option<Position> {
    engine
        .board()
        .iter()
        .find(|(_, cell)| cell.is_alive())
        .map(|(pos, _)| pos)
}
