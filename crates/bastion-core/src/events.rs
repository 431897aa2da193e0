//! Events emitted by the simulation for UI and audio feedback.

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::types::{EntityId, Position};

/// Per-wave tallies reported when a wave completes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaveStats {
    pub shots_fired: u32,
    pub enemies_intercepted: u32,
    pub enemies_impacted: u32,
    pub structures_lost: u32,
}

/// Discrete things that happened during a tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GameEvent {
    /// Player interceptor launched.
    MissileLaunched {
        missile: EntityId,
        tower: EntityId,
        target: Position,
    },
    /// Enemy missile entered the field.
    EnemySpawned { missile: EntityId, target: Position },
    /// Enemy missile destroyed inside a blast.
    MissileIntercepted {
        missile: EntityId,
        position: Position,
        points: u32,
    },
    /// A tower or city was destroyed by an impact.
    StructureDestroyed {
        structure: EntityId,
        kind: StructureKind,
        position: Position,
    },
    /// A missile reached its target and exploded.
    Detonation {
        cause: ExplosionCause,
        position: Position,
    },
    WaveStarted { wave: u32, enemies: u32 },
    WaveComplete {
        wave: u32,
        bonus: u32,
        stats: WaveStats,
    },
    Victory { score: u32, wave: u32 },
    Defeat { score: u32, wave: u32 },
}
