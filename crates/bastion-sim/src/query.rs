//! Read-only world queries shared by several systems.
//!
//! Results are sorted by `EntityId` so callers iterate deterministically
//! regardless of archetype layout.

use hecs::{Entity, World};

use bastion_core::components::{Active, City, Explosion, Missile, Tower};
use bastion_core::enums::{MissileSide, StructureKind};
use bastion_core::types::{EntityId, Position};

/// An active tower or city.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StructureRef {
    pub entity: Entity,
    pub id: EntityId,
    pub kind: StructureKind,
    pub position: Position,
}

/// All active structures, towers first then cities, each sorted by id.
pub fn active_structures(world: &World) -> Vec<StructureRef> {
    let mut towers: Vec<StructureRef> = world
        .query::<(&EntityId, &Position, &Active, &Tower)>()
        .iter()
        .filter(|(_, (_, _, active, _))| active.0)
        .map(|(entity, (id, pos, _, _))| StructureRef {
            entity,
            id: *id,
            kind: StructureKind::Tower,
            position: *pos,
        })
        .collect();
    towers.sort_by_key(|s| s.id);

    let mut cities: Vec<StructureRef> = world
        .query::<(&EntityId, &Position, &Active, &City)>()
        .iter()
        .filter(|(_, (_, _, active, _))| active.0)
        .map(|(entity, (id, pos, _, _))| StructureRef {
            entity,
            id: *id,
            kind: StructureKind::City,
            position: *pos,
        })
        .collect();
    cities.sort_by_key(|s| s.id);

    towers.extend(cities);
    towers
}

pub fn active_tower_count(world: &World) -> usize {
    world
        .query::<(&Active, &Tower)>()
        .iter()
        .filter(|(_, (active, _))| active.0)
        .count()
}

pub fn active_missile_count(world: &World, side: MissileSide) -> usize {
    world
        .query::<(&Active, &Missile)>()
        .iter()
        .filter(|(_, (active, missile))| active.0 && missile.side == side)
        .count()
}

pub fn active_explosion_count(world: &World) -> usize {
    world
        .query::<(&Active, &Explosion)>()
        .iter()
        .filter(|(_, (active, _))| active.0)
        .count()
}

/// Look up the hecs entity carrying `id`.
pub fn find(world: &World, id: EntityId) -> Option<Entity> {
    world
        .query::<&EntityId>()
        .iter()
        .find(|(_, candidate)| **candidate == id)
        .map(|(entity, _)| entity)
}
