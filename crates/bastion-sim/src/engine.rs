//! Simulation engine, the core of the game.
//!
//! `SimulationEngine` owns the hecs ECS world and the session state,
//! processes player commands, runs all systems, and produces
//! `GameStateSnapshot`s. Completely headless, enabling deterministic testing.

use std::collections::VecDeque;

use hecs::World;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use bastion_core::commands::PlayerCommand;
use bastion_core::config::SimConfig;
use bastion_core::constants::VICTORY_SCORE;
use bastion_core::enums::GamePhase;
use bastion_core::events::GameEvent;
use bastion_core::state::GameStateSnapshot;
use bastion_core::types::{EntityId, IdAllocator, Position, SimTime};

use crate::query;
use crate::scheduler::{DeferredAction, Scheduler};
use crate::session::Session;
use crate::systems;
use crate::world_setup;

/// The simulation engine. Owns the ECS world and all sim state.
pub struct SimulationEngine {
    world: World,
    config: SimConfig,
    time: SimTime,
    phase: GamePhase,
    paused: bool,
    rng: ChaCha8Rng,
    ids: IdAllocator,
    session: Session,
    scheduler: Scheduler,
    command_queue: VecDeque<PlayerCommand>,
    despawn_buffer: Vec<hecs::Entity>,
    events: Vec<GameEvent>,
}

impl SimulationEngine {
    /// Create a new engine in the `Start` phase with an empty world.
    ///
    /// Out-of-range config values are clamped rather than rejected; see
    /// [`SimConfig::sanitized`].
    pub fn new(config: SimConfig) -> Self {
        let sanitized = config.clone().sanitized();
        if sanitized != config {
            log::warn!("config out of range, clamped: {config:?} -> {sanitized:?}");
        }
        let config = sanitized;
        Self {
            world: World::new(),
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            config,
            time: SimTime::default(),
            phase: GamePhase::default(),
            paused: false,
            ids: IdAllocator::new(),
            session: Session::default(),
            scheduler: Scheduler::new(),
            command_queue: VecDeque::new(),
            despawn_buffer: Vec::new(),
            events: Vec::new(),
        }
    }

    /// Queue a player command for processing at the next tick boundary.
    pub fn queue_command(&mut self, command: PlayerCommand) {
        self.command_queue.push_back(command);
    }

    /// Queue multiple commands.
    pub fn queue_commands(&mut self, commands: impl IntoIterator<Item = PlayerCommand>) {
        self.command_queue.extend(commands);
    }

    /// Advance the simulation by `dt_ms` and return the resulting snapshot.
    ///
    /// Queued commands are applied first. Entities only move while
    /// `Playing`; during `WaveComplete` only the pending transition counts
    /// down. Nothing advances while paused. A negative or non-finite
    /// `dt_ms` is treated as zero.
    pub fn tick(&mut self, dt_ms: f64) -> GameStateSnapshot {
        let dt_ms = if dt_ms.is_finite() && dt_ms >= 0.0 {
            dt_ms
        } else {
            log::debug!("tick with dt {dt_ms} treated as 0");
            0.0
        };
        self.process_commands();

        if !self.paused {
            match self.phase {
                GamePhase::Playing => {
                    self.run_systems(dt_ms);
                    self.time.advance(dt_ms);
                    self.update_phase();
                }
                GamePhase::WaveComplete => {
                    self.time.advance(dt_ms);
                    if let Some(action) = self.scheduler.advance(dt_ms, self.session.epoch) {
                        self.run_deferred(action);
                    }
                }
                GamePhase::Start | GamePhase::Victory | GamePhase::Defeat => {}
            }
        }

        self.build_snapshot()
    }

    /// Launch an interceptor at `(x, y)` in play-field coordinates.
    ///
    /// Returns the new missile's id, or `None` when the request is not
    /// allowed right now (wrong phase, paused, below the guard line, or no
    /// tower with ammo).
    pub fn fire(&mut self, x: f64, y: f64) -> Option<EntityId> {
        if self.phase != GamePhase::Playing || self.paused {
            log::debug!("fire at ({x:.0}, {y:.0}) ignored in {:?}", self.phase);
            return None;
        }
        match systems::fire_control::fire(
            &mut self.world,
            &mut self.ids,
            Position::new(x, y),
            &mut self.events,
            &mut self.session.wave_state.stats,
        ) {
            Ok(missile) => Some(missile),
            Err(reason) => {
                log::debug!("fire at ({x:.0}, {y:.0}) rejected: {reason:?}");
                None
            }
        }
    }

    /// Begin a new session. Only valid from the start screen.
    pub fn start_session(&mut self) {
        if self.phase != GamePhase::Start {
            log::debug!("start_session ignored in {:?}", self.phase);
            return;
        }
        self.reset(self.session.epoch + 1);
        world_setup::setup_session(&mut self.world, &mut self.ids);
        self.phase = GamePhase::Playing;

        log::info!(
            "session {} started: wave 1, {} enemies",
            self.session.epoch,
            self.session.wave_state.enemies_to_spawn
        );
        self.events.push(GameEvent::WaveStarted {
            wave: self.session.wave,
            enemies: self.session.wave_state.enemies_to_spawn,
        });
    }

    /// Skip the wave-complete pause and start the next wave now.
    pub fn advance_wave(&mut self) {
        if self.phase != GamePhase::WaveComplete {
            log::debug!("advance_wave ignored in {:?}", self.phase);
            return;
        }
        if self.scheduler.cancel() {
            log::debug!("cancelled pending wave resolution");
        }
        self.next_wave();
    }

    /// Abandon the session and return to the start screen with an empty world.
    pub fn restart(&mut self) {
        if self.scheduler.is_pending() {
            log::debug!("restart cancels pending wave resolution");
        }
        self.reset(self.session.epoch + 1);
        self.phase = GamePhase::Start;
        log::info!("restarted; session epoch {}", self.session.epoch);
    }

    pub fn pause(&mut self) {
        if matches!(self.phase, GamePhase::Playing | GamePhase::WaveComplete) {
            self.paused = true;
        }
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    /// Get the current game phase.
    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    /// Get the current simulation time.
    pub fn time(&self) -> SimTime {
        self.time
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn score(&self) -> u32 {
        self.session.score
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Get a read-only reference to the ECS world.
    pub fn world(&self) -> &World {
        &self.world
    }

    #[cfg(test)]
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    #[cfg(test)]
    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    #[cfg(test)]
    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    /// Spawn a tower outside the normal layout (for tests).
    #[cfg(test)]
    pub fn spawn_tower(&mut self, position: Position, ammo: u32, max_ammo: u32) -> EntityId {
        let id = world_setup::spawn_tower(&mut self.world, &mut self.ids, position, max_ammo);
        let entity = query::find(&self.world, id).unwrap();
        self.world
            .get::<&mut bastion_core::components::Tower>(entity)
            .unwrap()
            .ammo = ammo;
        id
    }

    #[cfg(test)]
    pub fn spawn_city(&mut self, position: Position) -> EntityId {
        world_setup::spawn_city(&mut self.world, &mut self.ids, position)
    }

    /// Spawn a missile already part-way through its flight (for tests).
    #[cfg(test)]
    pub fn spawn_missile(
        &mut self,
        side: bastion_core::enums::MissileSide,
        start: Position,
        target: Position,
        speed: f64,
        progress: f64,
    ) -> EntityId {
        let id = world_setup::spawn_missile(&mut self.world, &mut self.ids, side, start, target, speed);
        let entity = query::find(&self.world, id).unwrap();
        let (pos, missile) = self
            .world
            .query_one_mut::<(&mut Position, &mut bastion_core::components::Missile)>(entity)
            .unwrap();
        missile.progress = progress;
        *pos = missile.position();
        id
    }

    /// Spawn an explosion of a given age (for tests).
    #[cfg(test)]
    pub fn spawn_explosion(
        &mut self,
        cause: bastion_core::enums::ExplosionCause,
        at: Position,
        age: f64,
    ) -> EntityId {
        let id = world_setup::spawn_explosion(&mut self.world, &mut self.ids, cause, at);
        let entity = query::find(&self.world, id).unwrap();
        let mut explosion = self
            .world
            .get::<&mut bastion_core::components::Explosion>(entity)
            .unwrap();
        explosion.age = age;
        explosion.radius = systems::motion::envelope(age, explosion.duration, explosion.max_radius);
        id
    }

    /// Process all queued commands.
    fn process_commands(&mut self) {
        while let Some(command) = self.command_queue.pop_front() {
            self.handle_command(command);
        }
    }

    fn handle_command(&mut self, command: PlayerCommand) {
        match command {
            PlayerCommand::Fire { x, y } => {
                self.fire(x, y);
            }
            PlayerCommand::StartSession => self.start_session(),
            PlayerCommand::AdvanceWave => self.advance_wave(),
            PlayerCommand::Restart => self.restart(),
            PlayerCommand::Pause => self.pause(),
            PlayerCommand::Resume => self.resume(),
        }
    }

    /// Run all systems in order.
    fn run_systems(&mut self, dt_ms: f64) {
        // 1. Enemy spawning
        systems::spawner::run(
            &mut self.world,
            &mut self.ids,
            &mut self.rng,
            &mut self.session.wave_state,
            self.session.enemy_speed_multiplier,
            &mut self.events,
            dt_ms,
        );
        // 2. Missile flight and trails
        let impacts = systems::motion::advance_missiles(
            &mut self.world,
            &mut self.rng,
            &self.config.trail,
            dt_ms,
        );
        // 3. Impact damage and detonations
        systems::collision::resolve_impacts(
            &mut self.world,
            &mut self.ids,
            &impacts,
            &mut self.events,
            &mut self.session.wave_state.stats,
        );
        // 4. Explosion aging
        systems::motion::age_explosions(&mut self.world, dt_ms);
        // 5. Interception
        let points = systems::collision::intercept(
            &mut self.world,
            &mut self.ids,
            &mut self.events,
            &mut self.session.wave_state.stats,
        );
        self.session.add_score(points);
        // 6. Cleanup
        systems::cleanup::run(&mut self.world, &mut self.despawn_buffer);
    }

    /// Wave-complete check, then defeat, then victory. At most one fires.
    fn update_phase(&mut self) {
        if systems::wave::wave_cleared(&self.world, &self.session.wave_state) {
            self.complete_wave();
        } else if query::active_tower_count(&self.world) == 0 {
            self.phase = GamePhase::Defeat;
            log::info!(
                "defeat on wave {} with score {}",
                self.session.wave,
                self.session.score
            );
            self.events.push(GameEvent::Defeat {
                score: self.session.score,
                wave: self.session.wave,
            });
        } else if self.session.score >= VICTORY_SCORE {
            self.declare_victory();
        }
    }

    fn complete_wave(&mut self) {
        let bonus = systems::wave::ammo_bonus(&self.world);
        self.session.add_score(bonus);
        self.session.last_bonus = Some(bonus);
        self.phase = GamePhase::WaveComplete;
        self.scheduler.schedule(
            DeferredAction::ResolveWave,
            self.config.wave_complete_delay_ms,
            self.session.epoch,
        );

        log::info!(
            "wave {} complete: bonus {}, score {}",
            self.session.wave,
            bonus,
            self.session.score
        );
        self.events.push(GameEvent::WaveComplete {
            wave: self.session.wave,
            bonus,
            stats: self.session.wave_state.stats,
        });
    }

    fn run_deferred(&mut self, action: DeferredAction) {
        match action {
            DeferredAction::ResolveWave => {
                if self.session.score >= VICTORY_SCORE {
                    self.declare_victory();
                } else {
                    self.next_wave();
                }
            }
        }
    }

    fn next_wave(&mut self) {
        self.session.advance_wave();
        systems::wave::replenish_towers(&mut self.world);
        world_setup::clear_projectiles(&mut self.world);
        self.phase = GamePhase::Playing;

        log::info!(
            "wave {} started: {} enemies every {:.0} ms",
            self.session.wave,
            self.session.wave_state.enemies_to_spawn,
            self.session.wave_state.spawn_interval_ms
        );
        self.events.push(GameEvent::WaveStarted {
            wave: self.session.wave,
            enemies: self.session.wave_state.enemies_to_spawn,
        });
    }

    fn declare_victory(&mut self) {
        self.phase = GamePhase::Victory;
        log::info!(
            "victory on wave {} with score {}",
            self.session.wave,
            self.session.score
        );
        self.events.push(GameEvent::Victory {
            score: self.session.score,
            wave: self.session.wave,
        });
    }

    /// Fresh world and session under a new epoch; stale deferred work is dropped.
    fn reset(&mut self, epoch: u64) {
        self.scheduler.cancel();
        self.world.clear();
        self.despawn_buffer.clear();
        self.session = Session::new(epoch);
        self.time = SimTime::default();
        self.paused = false;
    }

    fn build_snapshot(&mut self) -> GameStateSnapshot {
        let events = std::mem::take(&mut self.events);
        systems::snapshot::build_snapshot(
            &self.world,
            &self.time,
            self.phase,
            self.paused,
            &self.session,
            self.scheduler.remaining_ms(),
            events,
        )
    }
}
