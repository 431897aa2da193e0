//! Snapshot system: queries the ECS world and builds a GameStateSnapshot.
//!
//! This system is read-only. Only active entities appear, each list sorted by id.

use hecs::World;

use bastion_core::components::*;
use bastion_core::enums::*;
use bastion_core::events::GameEvent;
use bastion_core::state::*;
use bastion_core::types::{EntityId, Position, SimTime};

use crate::session::Session;

/// Build a complete GameStateSnapshot from the current world state.
pub fn build_snapshot(
    world: &World,
    time: &SimTime,
    phase: GamePhase,
    paused: bool,
    session: &Session,
    transition_remaining_ms: Option<f64>,
    events: Vec<GameEvent>,
) -> GameStateSnapshot {
    GameStateSnapshot {
        time: *time,
        phase,
        paused,
        score: session.score,
        wave: session.wave,
        last_bonus: session.last_bonus,
        transition_remaining_ms,
        enemies_remaining: session.wave_state.remaining(),
        towers: build_towers(world),
        cities: build_cities(world),
        player_missiles: build_missiles(world, MissileSide::Player),
        enemy_missiles: build_missiles(world, MissileSide::Enemy),
        explosions: build_explosions(world),
        events,
    }
}

fn build_towers(world: &World) -> Vec<TowerView> {
    let mut towers: Vec<TowerView> = world
        .query::<(&EntityId, &Position, &Active, &Tower)>()
        .iter()
        .filter(|(_, (_, _, active, _))| active.0)
        .map(|(_, (id, pos, _, tower))| TowerView {
            id: *id,
            position: *pos,
            ammo: tower.ammo,
            max_ammo: tower.max_ammo,
            color: tower.color,
        })
        .collect();

    towers.sort_by_key(|t| t.id);
    towers
}

fn build_cities(world: &World) -> Vec<CityView> {
    let mut cities: Vec<CityView> = world
        .query::<(&EntityId, &Position, &Active, &City)>()
        .iter()
        .filter(|(_, (_, _, active, _))| active.0)
        .map(|(_, (id, pos, _, city))| CityView {
            id: *id,
            position: *pos,
            color: city.color,
        })
        .collect();

    cities.sort_by_key(|c| c.id);
    cities
}

/// Build MissileView list for one side.
fn build_missiles(world: &World, side: MissileSide) -> Vec<MissileView> {
    let mut missiles: Vec<MissileView> = world
        .query::<(&EntityId, &Position, &Active, &Missile, &Trail)>()
        .iter()
        .filter(|(_, (_, _, active, missile, _))| active.0 && missile.side == side)
        .map(|(_, (id, pos, _, missile, trail))| MissileView {
            id: *id,
            position: *pos,
            target: missile.target,
            progress: missile.progress,
            trail: trail.points.iter().copied().collect(),
            color: missile.color,
        })
        .collect();

    missiles.sort_by_key(|m| m.id);
    missiles
}

fn build_explosions(world: &World) -> Vec<ExplosionView> {
    let mut explosions: Vec<ExplosionView> = world
        .query::<(&EntityId, &Position, &Active, &Explosion)>()
        .iter()
        .filter(|(_, (_, _, active, _))| active.0)
        .map(|(_, (id, pos, _, explosion))| ExplosionView {
            id: *id,
            position: *pos,
            radius: explosion.radius,
            max_radius: explosion.max_radius,
            cause: explosion.cause,
            color: explosion.cause.color(),
        })
        .collect();

    explosions.sort_by_key(|e| e.id);
    explosions
}
