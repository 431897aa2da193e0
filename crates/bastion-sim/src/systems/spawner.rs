//! Enemy spawning system. Emits enemy missiles on the wave's cadence.

use hecs::World;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use bastion_core::constants::*;
use bastion_core::enums::MissileSide;
use bastion_core::events::GameEvent;
use bastion_core::types::{EntityId, IdAllocator, Position};

use crate::query;
use crate::session::WaveState;
use crate::world_setup;

/// Advance the spawn timer and launch at most one enemy missile.
pub fn run(
    world: &mut World,
    ids: &mut IdAllocator,
    rng: &mut ChaCha8Rng,
    wave: &mut WaveState,
    speed_multiplier: f64,
    events: &mut Vec<GameEvent>,
    dt_ms: f64,
) -> Option<EntityId> {
    if wave.all_spawned() {
        return None;
    }

    wave.spawn_timer_ms += dt_ms;
    if wave.spawn_timer_ms <= wave.spawn_interval_ms {
        return None;
    }
    wave.spawn_timer_ms = 0.0;
    wave.enemies_spawned += 1;

    let start = Position::new(rng.gen_range(0.0..FIELD_WIDTH), 0.0);
    let target = pick_target(world, rng);
    let speed = enemy_speed(rng, speed_multiplier);

    let missile = world_setup::spawn_missile(world, ids, MissileSide::Enemy, start, target, speed);
    events.push(GameEvent::EnemySpawned { missile, target });
    Some(missile)
}

/// Aim at a random active structure most of the time, open ground otherwise.
pub fn pick_target(world: &World, rng: &mut ChaCha8Rng) -> Position {
    let structures = query::active_structures(world);
    if !structures.is_empty() && rng.gen_bool(STRUCTURE_TARGET_PROBABILITY) {
        structures[rng.gen_range(0..structures.len())].position
    } else {
        Position::new(rng.gen_range(0.0..FIELD_WIDTH), GROUND_Y)
    }
}

/// Individual speed with random spread, scaled by the wave multiplier.
pub fn enemy_speed(rng: &mut ChaCha8Rng, speed_multiplier: f64) -> f64 {
    (ENEMY_BASE_SPEED + rng.gen_range(0.0..ENEMY_SPEED_SPREAD)) * speed_multiplier
}
