//! A simple automatic gunner for demos and soak runs.
//!
//! Each shot goes at the predicted position of the lowest enemy missile that
//! has not been engaged yet. Velocity is estimated from consecutive
//! snapshots, so the autopilot needs to see a missile twice before firing.

use std::collections::{HashMap, HashSet};

use glam::DVec2;

use bastion_core::commands::PlayerCommand;
use bastion_core::constants::{FIELD_WIDTH, FIRE_GUARD_Y, PLAYER_MISSILE_SPEED};
use bastion_core::enums::GamePhase;
use bastion_core::state::GameStateSnapshot;
use bastion_core::types::EntityId;

#[derive(Debug, Clone)]
pub struct Autopilot {
    /// Minimum time between shots.
    pub cooldown_ms: f64,
    since_last_shot_ms: f64,
    last_seen: HashMap<EntityId, DVec2>,
    engaged: HashSet<EntityId>,
}

impl Default for Autopilot {
    fn default() -> Self {
        Self::new(250.0)
    }
}

impl Autopilot {
    pub fn new(cooldown_ms: f64) -> Self {
        Self {
            cooldown_ms,
            since_last_shot_ms: cooldown_ms,
            last_seen: HashMap::new(),
            engaged: HashSet::new(),
        }
    }

    /// Look at the latest snapshot and maybe fire.
    pub fn next_command(
        &mut self,
        snapshot: &GameStateSnapshot,
        dt_ms: f64,
    ) -> Option<PlayerCommand> {
        if snapshot.phase != GamePhase::Playing || snapshot.paused {
            self.last_seen.clear();
            self.engaged.clear();
            return None;
        }
        self.since_last_shot_ms += dt_ms;

        let mut velocities: HashMap<EntityId, DVec2> = HashMap::new();
        for missile in &snapshot.enemy_missiles {
            let now = missile.position.as_vec();
            if let Some(prev) = self.last_seen.get(&missile.id) {
                if dt_ms > 0.0 {
                    velocities.insert(missile.id, (now - *prev) / dt_ms);
                }
            }
        }
        self.last_seen = snapshot
            .enemy_missiles
            .iter()
            .map(|m| (m.id, m.position.as_vec()))
            .collect();
        self.engaged.retain(|id| self.last_seen.contains_key(id));

        if self.since_last_shot_ms < self.cooldown_ms {
            return None;
        }
        if snapshot.towers.iter().all(|t| t.ammo == 0) {
            return None;
        }

        let (target, velocity) = snapshot
            .enemy_missiles
            .iter()
            .filter(|m| !self.engaged.contains(&m.id))
            .filter_map(|m| velocities.get(&m.id).map(|v| (m, *v)))
            .max_by(|(a, _), (b, _)| a.position.y.total_cmp(&b.position.y))?;

        let aim = predict(target.position.as_vec(), velocity);
        self.engaged.insert(target.id);
        self.since_last_shot_ms = 0.0;
        Some(PlayerCommand::Fire { x: aim.x, y: aim.y })
    }
}

/// Where a missile will be once an interceptor gets there, clamped into the
/// firable part of the field.
fn predict(position: DVec2, velocity: DVec2) -> DVec2 {
    // Interceptor flight time is independent of distance.
    let flight_ms = 1.0 / PLAYER_MISSILE_SPEED;
    let ahead = position + velocity * flight_ms;
    DVec2::new(ahead.x.clamp(0.0, FIELD_WIDTH), ahead.y.min(FIRE_GUARD_Y))
}
