#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that plays Sneaky Doctor levels headlessly.
//!
//! The binary loads the level directory, replays a scripted key sequence
//! through the full game loop and prints the final game stats as JSON.

mod headless;
mod script;
mod simulation;

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{ensure, Context, Result};
use clap::Parser;
use sneaky_doctor_core::{GameConfig, GameStats};
use sneaky_doctor_level::LevelLoader;
use sneaky_doctor_rendering::{FrameControl, Presentation, RenderingBackend, FLOOR_COLOR};
use sneaky_doctor_system_session::Transition;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::{headless::HeadlessBackend, script::KeyScript, simulation::Simulation};

/// Command-line arguments for the Sneaky Doctor runner.
#[derive(Debug, Parser)]
#[command(name = "sneaky-doctor", about = "Plays Sneaky Doctor levels from a key script.")]
struct CliArgs {
    /// Directory containing the `level_<n>` folders.
    #[arg(long, value_name = "DIR")]
    levels: PathBuf,
    /// Level to start from.
    #[arg(long, default_value_t = 1)]
    level: u32,
    /// Optional TOML file overriding the default tuning.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Number of ticks to simulate; defaults to the length of the key script.
    #[arg(long)]
    ticks: Option<u64>,
    /// Key script such as `wd*10,*5`.
    #[arg(long, default_value = "")]
    keys: String,
}

/// Entry point for the Sneaky Doctor command-line interface.
fn main() -> Result<()> {
    init_tracing();
    let args = CliArgs::parse();

    let config = load_config(args.config.as_deref())?;
    ensure!(
        (1..=config.level_count).contains(&args.level),
        "level {} is outside 1..={}",
        args.level,
        config.level_count
    );
    let script = KeyScript::parse(&args.keys).context("invalid key script")?;
    let frames = args.ticks.unwrap_or_else(|| script.total_ticks());

    let stats = GameStats {
        current_level: args.level,
        ..GameStats::new_game()
    };
    let loader = LevelLoader::new(&args.levels, &config);
    let mut simulation = Simulation::start(loader, config.clone(), stats)?;

    let presentation = Presentation::new(
        "Sneaky Doctor",
        FLOOR_COLOR,
        config.framerate,
        simulation.scene(),
    );
    let mut failure = None;
    HeadlessBackend::new(script, frames).run(presentation, |_, input, scene| {
        match simulation.step(&input.pressed_keys) {
            Ok(transition) => {
                *scene = simulation.scene();
                if transition == Transition::Completed {
                    FrameControl::Exit
                } else {
                    FrameControl::Continue
                }
            }
            Err(error) => {
                failure = Some(error);
                FrameControl::Exit
            }
        }
    })?;
    if let Some(error) = failure {
        return Err(error);
    }

    info!(
        ticks = simulation.ticks(),
        fingerprint = simulation.fingerprint(),
        "run_finished"
    );
    let summary =
        serde_json::to_string_pretty(simulation.stats()).context("failed to encode stats")?;
    println!("{summary}");
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn load_config(path: Option<&Path>) -> Result<GameConfig> {
    let config = match path {
        Some(path) => {
            let source = fs::read_to_string(path)
                .with_context(|| format!("failed to read config {}", path.display()))?;
            toml::from_str::<GameConfig>(&source)
                .with_context(|| format!("failed to parse config {}", path.display()))?
        }
        None => GameConfig::default(),
    };
    config.validate().context("invalid game configuration")?;
    Ok(config)
}
