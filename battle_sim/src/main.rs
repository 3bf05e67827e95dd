//! battle_sim - seeded battle simulator
//!
//! Runs a batch of battles with a fixed action policy and prints a JSON
//! report, for checking balance changes to the content files.

mod args;
mod simulation;

use args::SimArgs;
use battle_core::BattleEngine;
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use simulation::BattleSimulation;
use std::process::ExitCode;

fn main() -> ExitCode {
    let args = SimArgs::parse();

    let engine = match &args.config_dir {
        Some(dir) => match BattleEngine::from_dir(dir) {
            Ok(engine) => engine,
            Err(e) => {
                eprintln!("Error: {}", e);
                return ExitCode::FAILURE;
            }
        },
        None => BattleEngine::default(),
    };

    let zone = match &args.zone {
        Some(id) => engine.catalog().zone(id),
        None => engine.catalog().zone_for_level(args.level),
    };
    let Some(zone) = zone else {
        let message = match &args.zone {
            Some(id) => format!("no zone named {}", id),
            None => format!("no zone for level {}", args.level),
        };
        SimArgs::command().error(ErrorKind::InvalidValue, message).exit();
    };

    let mut rng = ChaCha8Rng::seed_from_u64(args.seed);
    let simulation = BattleSimulation::new(&engine, zone, args.level);
    let report = match simulation.run(args.battles, args.seed, &mut rng) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match serde_json::to_string_pretty(&report) {
        Ok(json) => {
            println!("{}", json);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
