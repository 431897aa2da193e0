//! Simulation constants and game rules.
//!
//! Distances are in logical play-field units, times in milliseconds.

// --- Play field ---

/// Logical play-field width.
pub const FIELD_WIDTH: f64 = 800.0;

/// Logical play-field height.
pub const FIELD_HEIGHT: f64 = 600.0;

/// Ground line. Structures sit on it and random enemy targets land on it.
pub const GROUND_Y: f64 = 560.0;

/// Fire targets below this line are rejected.
pub const FIRE_GUARD_Y: f64 = GROUND_Y - 40.0;

// --- Structures ---

/// Tower x positions and their maximum ammo, left to right.
pub const TOWER_LAYOUT: [(f64, u32); 3] = [(50.0, 20), (400.0, 40), (750.0, 20)];

/// City x positions, left to right.
pub const CITY_XS: [f64; 6] = [130.0, 200.0, 270.0, 530.0, 600.0, 670.0];

/// Player missiles launch this far above their tower.
pub const TOWER_LAUNCH_OFFSET: f64 = 30.0;

// --- Missiles ---

/// Player missile speed (progress per millisecond).
pub const PLAYER_MISSILE_SPEED: f64 = 0.02;

/// Base enemy missile speed before the random spread and wave multiplier.
pub const ENEMY_BASE_SPEED: f64 = 0.03;

/// Width of the uniform random spread added to the enemy base speed.
pub const ENEMY_SPEED_SPREAD: f64 = 0.02;

/// Extra time scaling applied to enemy missile progress.
pub const ENEMY_TIME_SCALE: f64 = 0.005;

/// Trail capacity for player missiles.
pub const PLAYER_TRAIL_CAP: usize = 10;

/// Trail capacity for enemy missiles.
pub const ENEMY_TRAIL_CAP: usize = 5;

/// Probability an enemy missile aims at an active structure rather than open ground.
pub const STRUCTURE_TARGET_PROBABILITY: f64 = 0.7;

// --- Explosions (max radius, duration ms) ---

pub const PLAYER_BURST_RADIUS: f64 = 70.0;
pub const PLAYER_BURST_DURATION: f64 = 1200.0;

pub const ENEMY_IMPACT_RADIUS: f64 = 40.0;
pub const ENEMY_IMPACT_DURATION: f64 = 800.0;

pub const DEBRIS_RADIUS: f64 = 50.0;
pub const DEBRIS_DURATION: f64 = 1000.0;

pub const INTERCEPTION_RADIUS: f64 = 30.0;
pub const INTERCEPTION_DURATION: f64 = 600.0;

// --- Damage and scoring ---

/// Structures closer than this to an enemy impact are destroyed.
pub const STRUCTURE_KILL_RADIUS: f64 = 35.0;

/// Points for each enemy missile destroyed in a blast.
pub const INTERCEPT_SCORE: u32 = 20;

/// Wave bonus points per unspent round in an active tower.
pub const AMMO_BONUS_PER_ROUND: u32 = 5;

/// Score at which the session is won.
pub const VICTORY_SCORE: u32 = 1000;

// --- Waves ---

/// Enemy budget of the first wave of a session.
pub const FIRST_WAVE_ENEMIES: u32 = 10;

/// Base enemy budget for later waves (plus `WAVE_ENEMIES_PER_WAVE * wave`).
pub const WAVE_BASE_ENEMIES: u32 = 10;
pub const WAVE_ENEMIES_PER_WAVE: u32 = 2;

/// Spawn interval curve entering wave 1 from a fresh session.
pub const SESSION_SPAWN_INTERVAL_BASE: f64 = 2500.0;
pub const SESSION_SPAWN_INTERVAL_STEP: f64 = 200.0;
pub const SESSION_SPAWN_INTERVAL_MIN: f64 = 500.0;

/// Spawn interval curve for every later wave.
pub const WAVE_SPAWN_INTERVAL_BASE: f64 = 2500.0;
pub const WAVE_SPAWN_INTERVAL_STEP: f64 = 150.0;
pub const WAVE_SPAWN_INTERVAL_MIN: f64 = 400.0;

/// Enemy speed multiplier gained per wave.
pub const SPEED_MULTIPLIER_STEP: f64 = 0.15;

/// Default pause between wave completion and the next wave (or victory).
pub const WAVE_COMPLETE_DELAY_MS: f64 = 3000.0;

// --- Trails ---

/// Default per-tick probability a player missile records a trail point.
pub const PLAYER_TRAIL_PROBABILITY: f64 = 0.5;

/// Default per-tick probability an enemy missile records a trail point.
pub const ENEMY_TRAIL_PROBABILITY: f64 = 0.3;

// --- Colors (0xRRGGBB, cosmetic) ---

pub const TOWER_COLOR: u32 = 0x3d_d6_5c;
pub const CITY_COLOR: u32 = 0x4f_a3_ff;
pub const PLAYER_MISSILE_COLOR: u32 = 0x7c_f5_ff;
pub const ENEMY_MISSILE_COLOR: u32 = 0xff_4d_4d;
