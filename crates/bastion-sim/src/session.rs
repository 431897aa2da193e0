//! Session and per-wave state.

use bastion_core::constants::*;
use bastion_core::events::WaveStats;

/// Spawn interval used when a fresh session enters its first wave.
pub fn session_spawn_interval(wave: u32) -> f64 {
    (SESSION_SPAWN_INTERVAL_BASE - wave as f64 * SESSION_SPAWN_INTERVAL_STEP)
        .max(SESSION_SPAWN_INTERVAL_MIN)
}

/// Spawn interval used for every wave after the first.
pub fn wave_spawn_interval(wave: u32) -> f64 {
    (WAVE_SPAWN_INTERVAL_BASE - wave as f64 * WAVE_SPAWN_INTERVAL_STEP).max(WAVE_SPAWN_INTERVAL_MIN)
}

/// Enemy budget for a wave after the first.
pub fn wave_enemy_budget(wave: u32) -> u32 {
    WAVE_BASE_ENEMIES + wave * WAVE_ENEMIES_PER_WAVE
}

/// Spawn budget, cadence and tallies for the wave in progress.
#[derive(Debug, Clone, PartialEq)]
pub struct WaveState {
    pub enemies_to_spawn: u32,
    pub enemies_spawned: u32,
    pub spawn_timer_ms: f64,
    pub spawn_interval_ms: f64,
    pub stats: WaveStats,
}

impl WaveState {
    /// First wave of a new session.
    pub fn session_start() -> Self {
        Self::new(FIRST_WAVE_ENEMIES, session_spawn_interval(1))
    }

    /// Any wave after the first.
    pub fn for_wave(wave: u32) -> Self {
        Self::new(wave_enemy_budget(wave), wave_spawn_interval(wave))
    }

    fn new(enemies_to_spawn: u32, spawn_interval_ms: f64) -> Self {
        Self {
            enemies_to_spawn,
            enemies_spawned: 0,
            spawn_timer_ms: 0.0,
            spawn_interval_ms,
            stats: WaveStats::default(),
        }
    }

    pub fn all_spawned(&self) -> bool {
        self.enemies_spawned >= self.enemies_to_spawn
    }

    pub fn remaining(&self) -> u32 {
        self.enemies_to_spawn.saturating_sub(self.enemies_spawned)
    }
}

/// Everything that persists across waves within one play-through.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    /// Never decreases within a session.
    pub score: u32,
    pub wave: u32,
    pub enemy_speed_multiplier: f64,
    pub wave_state: WaveState,
    /// Ammo bonus awarded at the most recent wave completion.
    pub last_bonus: Option<u32>,
    /// Generation counter; bumped on every start and restart so stale
    /// deferred transitions can be recognised.
    pub epoch: u64,
}

impl Session {
    pub fn new(epoch: u64) -> Self {
        Self {
            score: 0,
            wave: 1,
            enemy_speed_multiplier: 1.0,
            wave_state: WaveState::session_start(),
            last_bonus: None,
            epoch,
        }
    }

    /// Move to the next wave: harder, faster, bigger.
    pub fn advance_wave(&mut self) {
        self.wave += 1;
        self.enemy_speed_multiplier += SPEED_MULTIPLIER_STEP;
        self.wave_state = WaveState::for_wave(self.wave);
    }

    pub fn add_score(&mut self, points: u32) {
        self.score = self.score.saturating_add(points);
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(0)
    }
}
