//! Enumeration types used throughout the simulation.

use serde::{Deserialize, Serialize};

use crate::constants::*;

/// Top-level session state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GamePhase {
    /// Idle, waiting for the player to begin.
    #[default]
    Start,
    Playing,
    /// Transient pause between waves; the next transition is scheduled.
    WaveComplete,
    Victory,
    Defeat,
}

impl GamePhase {
    /// Victory and defeat end the session until a restart.
    pub fn is_terminal(&self) -> bool {
        matches!(self, GamePhase::Victory | GamePhase::Defeat)
    }
}

/// Which side launched a missile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MissileSide {
    Player,
    Enemy,
}

impl MissileSide {
    /// Maximum number of trail points kept for this side.
    pub fn trail_cap(&self) -> usize {
        match self {
            MissileSide::Player => PLAYER_TRAIL_CAP,
            MissileSide::Enemy => ENEMY_TRAIL_CAP,
        }
    }

    /// Explosion produced when a missile of this side reaches its target.
    pub fn detonation(&self) -> ExplosionCause {
        match self {
            MissileSide::Player => ExplosionCause::PlayerBurst,
            MissileSide::Enemy => ExplosionCause::EnemyImpact,
        }
    }

    pub fn color(&self) -> u32 {
        match self {
            MissileSide::Player => PLAYER_MISSILE_COLOR,
            MissileSide::Enemy => ENEMY_MISSILE_COLOR,
        }
    }
}

/// What produced an explosion. Determines its size, lifetime and color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExplosionCause {
    /// Player missile reached its aim point.
    PlayerBurst,
    /// Enemy missile reached its target.
    EnemyImpact,
    /// A tower or city was destroyed.
    Debris,
    /// An enemy missile was caught in a blast.
    Interception,
}

impl ExplosionCause {
    /// Peak blast radius.
    pub fn max_radius(&self) -> f64 {
        match self {
            ExplosionCause::PlayerBurst => PLAYER_BURST_RADIUS,
            ExplosionCause::EnemyImpact => ENEMY_IMPACT_RADIUS,
            ExplosionCause::Debris => DEBRIS_RADIUS,
            ExplosionCause::Interception => INTERCEPTION_RADIUS,
        }
    }

    /// Lifetime in milliseconds.
    pub fn duration_ms(&self) -> f64 {
        match self {
            ExplosionCause::PlayerBurst => PLAYER_BURST_DURATION,
            ExplosionCause::EnemyImpact => ENEMY_IMPACT_DURATION,
            ExplosionCause::Debris => DEBRIS_DURATION,
            ExplosionCause::Interception => INTERCEPTION_DURATION,
        }
    }

    pub fn color(&self) -> u32 {
        match self {
            ExplosionCause::PlayerBurst => 0xff_f2_a8,
            ExplosionCause::EnemyImpact => 0xff_8a_3d,
            ExplosionCause::Debris => 0xc9_6b_3a,
            ExplosionCause::Interception => 0xff_d0_40,
        }
    }
}

/// Kind of destructible structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StructureKind {
    Tower,
    City,
}
