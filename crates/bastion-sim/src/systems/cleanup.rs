//! Cleanup system: removes spent missiles and faded explosions.
//!
//! Destroyed towers and cities are not despawned. They stay in the world as
//! inactive rubble and are filtered out of queries and snapshots.

use hecs::{Entity, World};

use bastion_core::components::{Active, Explosion, Missile};

/// Despawn inactive missiles and explosions.
/// Uses a pre-allocated buffer to avoid per-tick allocation.
pub fn run(world: &mut World, despawn_buffer: &mut Vec<Entity>) {
    despawn_buffer.clear();

    for (entity, (active, _missile)) in world.query_mut::<(&Active, &Missile)>() {
        if !active.0 {
            despawn_buffer.push(entity);
        }
    }

    for (entity, (active, _explosion)) in world.query_mut::<(&Active, &Explosion)>() {
        if !active.0 {
            despawn_buffer.push(entity);
        }
    }

    for entity in despawn_buffer.drain(..) {
        let _ = world.despawn(entity);
    }
}
