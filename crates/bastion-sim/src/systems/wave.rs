//! Wave bookkeeping over the world: clear detection, ammo bonus, resupply.

use hecs::World;

use bastion_core::components::{Active, Tower};
use bastion_core::constants::AMMO_BONUS_PER_ROUND;
use bastion_core::enums::MissileSide;

use crate::query;
use crate::session::WaveState;

/// Everything spawned, no enemy still flying, and every blast has faded.
pub fn wave_cleared(world: &World, wave: &WaveState) -> bool {
    wave.all_spawned()
        && query::active_missile_count(world, MissileSide::Enemy) == 0
        && query::active_explosion_count(world) == 0
}

/// Bonus for unspent rounds in surviving towers.
pub fn ammo_bonus(world: &World) -> u32 {
    world
        .query::<(&Active, &Tower)>()
        .iter()
        .filter(|(_, (active, _))| active.0)
        .map(|(_, (_, tower))| tower.ammo * AMMO_BONUS_PER_ROUND)
        .sum()
}

/// Refill every surviving tower. Destroyed towers stay empty.
pub fn replenish_towers(world: &mut World) {
    for (_, (active, tower)) in world.query_mut::<(&Active, &mut Tower)>() {
        if active.0 {
            tower.replenish();
        }
    }
}
