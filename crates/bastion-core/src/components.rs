//! ECS components for hecs entities.
//!
//! Components are plain data structs. Game logic lives in systems, not
//! components; the few methods here only maintain the component's own
//! invariants.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::types::Position;

/// Lifecycle flag. Inactive missiles and explosions are pruned at the end of
/// the tick; inactive structures stay in the world as rubble.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Active(pub bool);

/// Missile battery controlled by the player.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Tower {
    pub ammo: u32,
    pub max_ammo: u32,
    pub color: u32,
}

impl Tower {
    /// Spend one round. Returns false (and leaves ammo untouched) when empty.
    pub fn try_consume(&mut self) -> bool {
        if self.ammo == 0 {
            return false;
        }
        self.ammo -= 1;
        true
    }

    pub fn replenish(&mut self) {
        self.ammo = self.max_ammo;
    }
}

/// Defended city. Passive.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct City {
    pub color: u32,
}

/// A missile flying a straight line from `start` to `target`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Missile {
    pub side: MissileSide,
    pub start: Position,
    pub target: Position,
    /// Progress per millisecond (before any side-specific time scaling).
    pub speed: f64,
    /// Fraction of the flight completed, `0..=1` while active.
    pub progress: f64,
    pub color: u32,
}

impl Missile {
    /// Current position implied by `progress`.
    pub fn position(&self) -> Position {
        self.start.lerp(&self.target, self.progress)
    }
}

/// Recent positions for trail rendering (newest last).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Trail {
    pub points: VecDeque<Position>,
    pub cap: usize,
}

impl Trail {
    pub fn with_cap(cap: usize) -> Self {
        Self {
            points: VecDeque::with_capacity(cap + 1),
            cap,
        }
    }

    pub fn push(&mut self, point: Position) {
        self.points.push_back(point);
        while self.points.len() > self.cap {
            self.points.pop_front();
        }
    }
}

/// Expanding and collapsing blast.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Explosion {
    pub cause: ExplosionCause,
    /// Current radius; the live kill zone.
    pub radius: f64,
    pub max_radius: f64,
    /// Lifetime in milliseconds.
    pub duration: f64,
    /// Milliseconds since creation.
    pub age: f64,
}

impl Explosion {
    pub fn new(cause: ExplosionCause) -> Self {
        Self {
            cause,
            radius: 0.0,
            max_radius: cause.max_radius(),
            duration: cause.duration_ms(),
            age: 0.0,
        }
    }
}
