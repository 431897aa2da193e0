//! Collision and damage: impacts on structures, blasts catching enemy missiles.

use hecs::{Entity, World};

use bastion_core::components::{Active, Explosion, Missile};
use bastion_core::constants::{INTERCEPT_SCORE, STRUCTURE_KILL_RADIUS};
use bastion_core::enums::{ExplosionCause, MissileSide};
use bastion_core::events::{GameEvent, WaveStats};
use bastion_core::types::{EntityId, IdAllocator, Position};

use crate::query;
use crate::systems::motion::Impact;
use crate::world_setup;

/// Turn this tick's impacts into explosions and structure damage.
///
/// Enemy impacts destroy every active structure strictly within the kill
/// radius, each leaving a debris explosion. Every impact then detonates at
/// its target point.
pub fn resolve_impacts(
    world: &mut World,
    ids: &mut IdAllocator,
    impacts: &[Impact],
    events: &mut Vec<GameEvent>,
    stats: &mut WaveStats,
) {
    for impact in impacts {
        if impact.side == MissileSide::Enemy {
            stats.enemies_impacted += 1;

            let hit: Vec<_> = query::active_structures(world)
                .into_iter()
                .filter(|s| s.position.distance_to(&impact.at) < STRUCTURE_KILL_RADIUS)
                .collect();
            for structure in hit {
                if let Ok(mut active) = world.get::<&mut Active>(structure.entity) {
                    active.0 = false;
                }
                world_setup::spawn_explosion(
                    world,
                    ids,
                    ExplosionCause::Debris,
                    structure.position,
                );
                stats.structures_lost += 1;
                log::debug!("{:?} {} destroyed", structure.kind, structure.id);
                events.push(GameEvent::StructureDestroyed {
                    structure: structure.id,
                    kind: structure.kind,
                    position: structure.position,
                });
            }
        }

        let cause = impact.side.detonation();
        world_setup::spawn_explosion(world, ids, cause, impact.at);
        events.push(GameEvent::Detonation {
            cause,
            position: impact.at,
        });
    }
}

/// Sweep active blasts against active enemy missiles.
///
/// A caught missile is deactivated immediately so it is credited once.
/// Interception explosions are spawned after the sweep and only start
/// catching missiles on the next tick. Returns the points earned.
pub fn intercept(
    world: &mut World,
    ids: &mut IdAllocator,
    events: &mut Vec<GameEvent>,
    stats: &mut WaveStats,
) -> u32 {
    let mut blasts: Vec<(EntityId, Position, f64)> = world
        .query::<(&EntityId, &Position, &Active, &Explosion)>()
        .iter()
        .filter(|(_, (_, _, active, _))| active.0)
        .map(|(_, (id, pos, _, explosion))| (*id, *pos, explosion.radius))
        .collect();
    blasts.sort_by_key(|b| b.0);

    let mut enemies: Vec<(EntityId, Entity, Position)> = world
        .query::<(&EntityId, &Position, &Active, &Missile)>()
        .iter()
        .filter(|(_, (_, _, active, missile))| active.0 && missile.side == MissileSide::Enemy)
        .map(|(entity, (id, pos, _, _))| (*id, entity, *pos))
        .collect();
    enemies.sort_by_key(|e| e.0);

    let mut caught: Vec<(EntityId, Entity, Position)> = Vec::new();
    for (_, center, radius) in &blasts {
        enemies.retain(|&(id, entity, pos)| {
            if pos.distance_to(center) < *radius {
                caught.push((id, entity, pos));
                false
            } else {
                true
            }
        });
    }

    let mut points = 0;
    for (id, entity, pos) in caught {
        if let Ok(mut active) = world.get::<&mut Active>(entity) {
            active.0 = false;
        }
        world_setup::spawn_explosion(world, ids, ExplosionCause::Interception, pos);
        stats.enemies_intercepted += 1;
        points += INTERCEPT_SCORE;
        events.push(GameEvent::MissileIntercepted {
            missile: id,
            position: pos,
            points: INTERCEPT_SCORE,
        });
    }
    points
}
