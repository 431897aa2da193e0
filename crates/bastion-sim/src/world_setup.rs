//! Entity spawn factories for setting up the simulation world.
//!
//! Every entity gets an `EntityId`, a `Position` and an `Active` flag plus
//! its type-specific components.

use hecs::{Entity, World};

use bastion_core::components::*;
use bastion_core::constants::*;
use bastion_core::enums::*;
use bastion_core::types::{EntityId, IdAllocator, Position};

/// Populate a fresh session: three towers and six cities on the ground line.
pub fn setup_session(world: &mut World, ids: &mut IdAllocator) {
    for &(x, max_ammo) in TOWER_LAYOUT.iter() {
        spawn_tower(world, ids, Position::new(x, GROUND_Y), max_ammo);
    }
    for &x in CITY_XS.iter() {
        spawn_city(world, ids, Position::new(x, GROUND_Y));
    }
}

/// Spawn a fully stocked tower.
pub fn spawn_tower(
    world: &mut World,
    ids: &mut IdAllocator,
    position: Position,
    max_ammo: u32,
) -> EntityId {
    let id = ids.allocate();
    world.spawn((
        id,
        position,
        Active(true),
        Tower {
            ammo: max_ammo,
            max_ammo,
            color: TOWER_COLOR,
        },
    ));
    id
}

pub fn spawn_city(world: &mut World, ids: &mut IdAllocator, position: Position) -> EntityId {
    let id = ids.allocate();
    world.spawn((id, position, Active(true), City { color: CITY_COLOR }));
    id
}

/// Spawn a missile at `start`, flying straight to `target`.
pub fn spawn_missile(
    world: &mut World,
    ids: &mut IdAllocator,
    side: MissileSide,
    start: Position,
    target: Position,
    speed: f64,
) -> EntityId {
    let id = ids.allocate();
    world.spawn((
        id,
        start,
        Active(true),
        Missile {
            side,
            start,
            target,
            speed,
            progress: 0.0,
            color: side.color(),
        },
        Trail::with_cap(side.trail_cap()),
    ));
    id
}

/// Spawn a new (zero-radius) explosion.
pub fn spawn_explosion(
    world: &mut World,
    ids: &mut IdAllocator,
    cause: ExplosionCause,
    at: Position,
) -> EntityId {
    let id = ids.allocate();
    world.spawn((id, at, Active(true), Explosion::new(cause)));
    id
}

/// Remove every missile and explosion, leaving structures in place.
pub fn clear_projectiles(world: &mut World) {
    let doomed: Vec<Entity> = world
        .query::<&Missile>()
        .iter()
        .map(|(entity, _)| entity)
        .chain(world.query::<&Explosion>().iter().map(|(entity, _)| entity))
        .collect();
    for entity in doomed {
        let _ = world.despawn(entity);
    }
}
