//! Game loop: runs the simulation engine at a fixed frame rate and hands
//! snapshots to a sink.
//!
//! The engine is created inside the loop thread because it's cleaner for
//! ownership. Commands arrive via `mpsc` channel and are drained at the top
//! of each frame. The latest snapshot is stored in shared state for polling.
//! `run_headless` drives the same engine with a fixed step and no thread.

use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use bastion_core::commands::PlayerCommand;
use bastion_core::config::SimConfig;
use bastion_core::state::GameStateSnapshot;
use bastion_sim::SimulationEngine;

use crate::autopilot::Autopilot;
use crate::sink::{present_or_log, SnapshotSink};

/// Pacing for the real-time loop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoopConfig {
    pub frame_rate: u32,
    /// Upper bound on a single frame's `dt`, so a stall does not turn into
    /// one giant simulation step.
    pub max_frame_dt_ms: f64,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            frame_rate: 60,
            max_frame_dt_ms: 100.0,
        }
    }
}

impl LoopConfig {
    /// Nominal duration of one frame.
    pub fn frame_duration(&self) -> Duration {
        Duration::from_nanos(1_000_000_000 / u64::from(self.frame_rate.max(1)))
    }
}

/// Commands sent to the game loop thread.
#[derive(Debug)]
pub enum LoopCommand {
    /// A player command to forward to the simulation engine.
    Player(PlayerCommand),
    /// Shut down the game loop thread gracefully.
    Shutdown,
}

/// Owner of a running game loop. Dropping it stops and joins the thread.
pub struct GameLoopHandle {
    command_tx: mpsc::Sender<LoopCommand>,
    latest_snapshot: Arc<Mutex<Option<GameStateSnapshot>>>,
    thread: Option<JoinHandle<()>>,
}

impl GameLoopHandle {
    /// Forward a player command. Returns false if the loop has exited.
    pub fn send(&self, command: PlayerCommand) -> bool {
        self.command_tx.send(LoopCommand::Player(command)).is_ok()
    }

    /// Most recent snapshot produced by the loop, if any.
    pub fn latest_snapshot(&self) -> Option<GameStateSnapshot> {
        self.latest_snapshot
            .lock()
            .ok()
            .and_then(|lock| lock.clone())
    }

    /// Stop the loop and wait for the thread to finish.
    pub fn shutdown(mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        let _ = self.command_tx.send(LoopCommand::Shutdown);
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                log::warn!("game loop thread panicked");
            }
        }
    }
}

impl Drop for GameLoopHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Spawns the game loop in a new thread.
pub fn spawn_game_loop(
    sim_config: SimConfig,
    loop_config: LoopConfig,
    sink: Box<dyn SnapshotSink + Send>,
    autopilot: Option<Autopilot>,
) -> std::io::Result<GameLoopHandle> {
    let (command_tx, command_rx) = mpsc::channel::<LoopCommand>();
    let latest_snapshot = Arc::new(Mutex::new(None));
    let shared = Arc::clone(&latest_snapshot);

    let thread = std::thread::Builder::new()
        .name("bastion-game-loop".into())
        .spawn(move || {
            run_game_loop(sim_config, loop_config, command_rx, sink, autopilot, &shared);
        })?;

    Ok(GameLoopHandle {
        command_tx,
        latest_snapshot,
        thread: Some(thread),
    })
}

/// The game loop. Runs until Shutdown command or channel disconnect.
fn run_game_loop(
    sim_config: SimConfig,
    loop_config: LoopConfig,
    command_rx: mpsc::Receiver<LoopCommand>,
    mut sink: Box<dyn SnapshotSink + Send>,
    mut autopilot: Option<Autopilot>,
    latest_snapshot: &Mutex<Option<GameStateSnapshot>>,
) {
    let mut engine = SimulationEngine::new(sim_config);
    let frame_duration = loop_config.frame_duration();
    let mut last_frame = Instant::now();
    let mut next_frame_time = last_frame;

    log::info!("game loop running at {} Hz", loop_config.frame_rate);

    loop {
        // 1. Drain all pending commands
        loop {
            match command_rx.try_recv() {
                Ok(LoopCommand::Player(command)) => engine.queue_command(command),
                Ok(LoopCommand::Shutdown) | Err(mpsc::TryRecvError::Disconnected) => {
                    log::info!("game loop stopped at tick {}", engine.time().tick);
                    return;
                }
                Err(mpsc::TryRecvError::Empty) => break,
            }
        }

        // 2. Advance by the real elapsed time, clamped
        let now = Instant::now();
        let dt_ms = clamp_frame_dt(now - last_frame, loop_config.max_frame_dt_ms);
        last_frame = now;
        let snapshot = engine.tick(dt_ms);

        // 3. Autopilot input lands at the next frame boundary
        if let Some(command) = autopilot
            .as_mut()
            .and_then(|pilot| pilot.next_command(&snapshot, dt_ms))
        {
            engine.queue_command(command);
        }

        // 4. Present, then store for polling
        present_or_log(sink.as_mut(), &snapshot);
        if let Ok(mut lock) = latest_snapshot.lock() {
            *lock = Some(snapshot);
        }

        // 5. Sleep until next frame
        next_frame_time += frame_duration;
        let now = Instant::now();
        if next_frame_time > now {
            std::thread::sleep(next_frame_time - now);
        } else if now - next_frame_time > frame_duration * 2 {
            // Too far behind; reset to avoid catch-up spiral
            next_frame_time = now;
        }
    }
}

/// Elapsed wall time in milliseconds, capped at `max_ms`.
pub fn clamp_frame_dt(elapsed: Duration, max_ms: f64) -> f64 {
    (elapsed.as_secs_f64() * 1000.0).min(max_ms)
}

/// Drive `engine` for up to `frames` fixed steps of `dt_ms`.
///
/// Stops early once the session reaches victory or defeat. Returns the last
/// snapshot produced.
pub fn run_headless(
    engine: &mut SimulationEngine,
    frames: u64,
    dt_ms: f64,
    sink: &mut dyn SnapshotSink,
    mut autopilot: Option<&mut Autopilot>,
) -> Option<GameStateSnapshot> {
    let mut last = None;
    for _ in 0..frames {
        let snapshot = engine.tick(dt_ms);
        if let Some(command) = autopilot
            .as_deref_mut()
            .and_then(|pilot| pilot.next_command(&snapshot, dt_ms))
        {
            engine.queue_command(command);
        }
        present_or_log(sink, &snapshot);

        let finished = snapshot.phase.is_terminal();
        last = Some(snapshot);
        if finished {
            break;
        }
    }
    last
}
