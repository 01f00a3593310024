//! Headless runner: plays one seeded auto-play session and prints the outcome.

mod session;
mod telemetry;

use anyhow::{Context, Result};
use bichos_core::RunnerConfig;
use bichos_world::Engine;
use tracing::info;

fn main() -> Result<()> {
    telemetry::init_telemetry()?;

    let config = RunnerConfig::from_env();
    let json_output = std::env::args().skip(1).any(|arg| arg == "--json");

    info!(
        rows = config.game.rows,
        cols = config.game.cols,
        seed = ?config.game.seed,
        max_turns = config.max_turns,
        "Starting headless session"
    );

    let mut engine = Engine::from_config(config.game.clone())
        .context("invalid game configuration")?;

    let outcome = session::run_session(&mut engine, &config);

    if config.save_on_exit {
        engine
            .save()
            .with_context(|| format!("failed to save to {}", config.game.save_path.display()))?;
    }

    if json_output {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        print!("{}", engine.board());
        println!();
        println!("{}", outcome.report);
        if outcome.victory {
            println!("Victory after {} actions", outcome.actions);
        } else {
            println!("Stopped after {} actions", outcome.actions);
        }
    }

    Ok(())
}
