//! `bastion`: run a session headless or on the real-time loop and report the result.

use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;

use bastion_app::autopilot::Autopilot;
use bastion_app::game_loop::{self, LoopConfig};
use bastion_app::sink::JsonLinesSink;
use bastion_core::commands::PlayerCommand;
use bastion_core::config::SimConfig;
use bastion_core::state::GameStateSnapshot;
use bastion_sim::SimulationEngine;

/// Fixed simulation step for headless runs.
const HEADLESS_DT_MS: f64 = 1000.0 / 60.0;

#[derive(Debug, Parser)]
#[command(name = "bastion", about = "Missile-defence arcade simulation")]
struct Cli {
    /// RNG seed; overrides the config file.
    #[arg(long)]
    seed: Option<u64>,
    /// TOML file with simulation overrides.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Number of frames to run.
    #[arg(long, default_value_t = 3600)]
    frames: u64,
    /// Let the built-in gunner play.
    #[arg(long)]
    autopilot: bool,
    /// Print snapshot JSON every n frames (0 disables).
    #[arg(long, default_value_t = 0)]
    json_every: u64,
    /// Run on the paced game-loop thread instead of a fixed-step loop.
    #[arg(long)]
    realtime: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => SimConfig::load(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => SimConfig::default(),
    };
    if let Some(seed) = cli.seed {
        config.seed = seed;
    }
    config.validate().context("invalid configuration")?;
    log::info!("seed {}", config.seed);

    let last = if cli.realtime {
        run_realtime(&cli, config)?
    } else {
        run_fixed_step(&cli, config)
    };

    match last {
        Some(snapshot) => println!(
            "phase={:?} wave={} score={} ticks={}",
            snapshot.phase, snapshot.wave, snapshot.score, snapshot.time.tick
        ),
        None => println!("no frames run"),
    }
    Ok(())
}

fn run_fixed_step(cli: &Cli, config: SimConfig) -> Option<GameStateSnapshot> {
    let mut engine = SimulationEngine::new(config);
    engine.queue_command(PlayerCommand::StartSession);

    let mut sink = JsonLinesSink::new(io::stdout().lock(), cli.json_every);
    let mut pilot = cli.autopilot.then(Autopilot::default);
    game_loop::run_headless(
        &mut engine,
        cli.frames,
        HEADLESS_DT_MS,
        &mut sink,
        pilot.as_mut(),
    )
}

fn run_realtime(cli: &Cli, config: SimConfig) -> Result<Option<GameStateSnapshot>> {
    let loop_config = LoopConfig::default();
    let handle = game_loop::spawn_game_loop(
        config,
        loop_config,
        Box::new(JsonLinesSink::new(io::stdout(), cli.json_every)),
        cli.autopilot.then(Autopilot::default),
    )
    .context("spawning game loop thread")?;
    if !handle.send(PlayerCommand::StartSession) {
        anyhow::bail!("game loop exited before the session started");
    }

    let run_for = loop_config.frame_duration() * u32::try_from(cli.frames).unwrap_or(u32::MAX);
    let deadline = Instant::now() + run_for;
    while Instant::now() < deadline {
        std::thread::sleep(Duration::from_millis(50));
        if handle
            .latest_snapshot()
            .is_some_and(|s| s.phase.is_terminal())
        {
            break;
        }
    }

    let last = handle.latest_snapshot();
    handle.shutdown();
    Ok(last)
}
