//! Fire control: pick a battery and launch an interceptor at an aim point.

use hecs::{Entity, World};

use bastion_core::components::{Active, Tower};
use bastion_core::constants::{FIRE_GUARD_Y, PLAYER_MISSILE_SPEED, TOWER_LAUNCH_OFFSET};
use bastion_core::enums::MissileSide;
use bastion_core::events::{GameEvent, WaveStats};
use bastion_core::types::{EntityId, IdAllocator, Position};

use crate::world_setup;

/// Why a fire request produced no missile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FireRejection {
    /// Aim point is at or below the guard line above the ground.
    BelowGuardLine,
    /// Every surviving tower is out of ammo.
    NoAmmo,
}

/// The active tower with ammo closest to `target`, lowest id on ties.
pub fn select_tower(world: &World, target: Position) -> Option<(Entity, EntityId, Position)> {
    let mut best: Option<(f64, EntityId, Entity, Position)> = None;
    for (entity, (id, pos, active, tower)) in world
        .query::<(&EntityId, &Position, &Active, &Tower)>()
        .iter()
    {
        if !active.0 || tower.ammo == 0 {
            continue;
        }
        let distance = pos.distance_to(&target);
        let better = match best {
            None => true,
            Some((best_distance, best_id, _, _)) => {
                distance < best_distance || (distance == best_distance && *id < best_id)
            }
        };
        if better {
            best = Some((distance, *id, entity, *pos));
        }
    }
    best.map(|(_, id, entity, pos)| (entity, id, pos))
}

/// Launch one interceptor at `target`.
pub fn fire(
    world: &mut World,
    ids: &mut IdAllocator,
    target: Position,
    events: &mut Vec<GameEvent>,
    stats: &mut WaveStats,
) -> Result<EntityId, FireRejection> {
    if target.y > FIRE_GUARD_Y {
        return Err(FireRejection::BelowGuardLine);
    }

    let (entity, tower_id, tower_pos) =
        select_tower(world, target).ok_or(FireRejection::NoAmmo)?;
    let consumed = world
        .get::<&mut Tower>(entity)
        .map(|mut tower| tower.try_consume())
        .unwrap_or(false);
    if !consumed {
        return Err(FireRejection::NoAmmo);
    }

    let start = Position::new(tower_pos.x, tower_pos.y - TOWER_LAUNCH_OFFSET);
    let missile = world_setup::spawn_missile(
        world,
        ids,
        MissileSide::Player,
        start,
        target,
        PLAYER_MISSILE_SPEED,
    );
    stats.shots_fired += 1;
    events.push(GameEvent::MissileLaunched {
        missile,
        tower: tower_id,
        target,
    });
    Ok(missile)
}
