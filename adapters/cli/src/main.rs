#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that replays a scripted lane battle.

mod script;

use std::{fs, path::PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use lane_battle_core::{Outcome, Rules};
use lane_battle_simulation::Simulation;
use tracing::info;

use script::ActionScript;

/// Runs a lane battle on a map until the match ends.
#[derive(Debug, Parser)]
#[command(name = "lane-battle", version)]
struct Cli {
    /// JSON map description.
    map: PathBuf,
    /// TOML file overriding any subset of the default rules.
    #[arg(long, value_name = "FILE")]
    rules: Option<PathBuf>,
    /// JSON-lines file holding one `{"red": .., "blue": ..}` object per turn.
    #[arg(long, value_name = "FILE")]
    actions: Option<PathBuf>,
}

/// Entry point for the lane battle command-line interface.
fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let rules = match &cli.rules {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("failed to read rules file {}", path.display()))?;
            toml::from_str::<Rules>(&text)
                .with_context(|| format!("invalid rules file {}", path.display()))?
        }
        None => Rules::default(),
    };

    let script = match &cli.actions {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("failed to read actions file {}", path.display()))?;
            ActionScript::parse(&text)
                .with_context(|| format!("invalid actions file {}", path.display()))?
        }
        None => ActionScript::default(),
    };

    let map = fs::read_to_string(&cli.map)
        .with_context(|| format!("failed to read map {}", cli.map.display()))?;
    let mut simulation = Simulation::from_json(&map, rules)
        .with_context(|| format!("failed to load map {}", cli.map.display()))?;
    info!(map = %cli.map.display(), turns = script.len(), "match started");

    let mut turn = 0;
    while !simulation.is_game_over() {
        let (red, blue) = script.turn(turn);
        let _ = simulation.advance_raw(red, blue);
        turn += 1;
    }

    let snapshot = simulation.snapshot();
    println!("{}", serde_json::to_string_pretty(snapshot)?);
    match snapshot.victory {
        Some(victory) => match victory.outcome {
            Outcome::Winner(team) => {
                println!("winner: {} ({:?})", team.label(), victory.reason);
            }
            Outcome::Tie => println!("tie ({:?})", victory.reason),
        },
        None => println!("no winner after {} turns", snapshot.current_turn),
    }
    Ok(())
}
