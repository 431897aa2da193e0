//! Game state snapshot: the complete visible state handed to the renderer each tick.

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::events::GameEvent;
use crate::types::{EntityId, Position, SimTime};

/// Read-only view of the simulation after a tick.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GameStateSnapshot {
    pub time: SimTime,
    pub phase: GamePhase,
    pub paused: bool,
    pub score: u32,
    pub wave: u32,
    /// Ammo bonus awarded at the most recent wave completion.
    pub last_bonus: Option<u32>,
    /// Time left before the pending wave-complete transition fires.
    pub transition_remaining_ms: Option<f64>,
    /// Enemies still to be spawned this wave.
    pub enemies_remaining: u32,
    pub towers: Vec<TowerView>,
    pub cities: Vec<CityView>,
    pub player_missiles: Vec<MissileView>,
    pub enemy_missiles: Vec<MissileView>,
    pub explosions: Vec<ExplosionView>,
    /// Events produced since the previous snapshot.
    pub events: Vec<GameEvent>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TowerView {
    pub id: EntityId,
    pub position: Position,
    pub ammo: u32,
    pub max_ammo: u32,
    pub color: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityView {
    pub id: EntityId,
    pub position: Position,
    pub color: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissileView {
    pub id: EntityId,
    pub position: Position,
    pub target: Position,
    pub progress: f64,
    /// Trail points, oldest first.
    pub trail: Vec<Position>,
    pub color: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExplosionView {
    pub id: EntityId,
    pub position: Position,
    pub radius: f64,
    pub max_radius: f64,
    pub cause: ExplosionCause,
    pub color: u32,
}
