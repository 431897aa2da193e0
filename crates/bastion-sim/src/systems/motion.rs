//! Motion integrator: missile flight, trails and explosion aging.

use hecs::World;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use bastion_core::components::{Active, Explosion, Missile, Trail};
use bastion_core::config::TrailConfig;
use bastion_core::constants::ENEMY_TIME_SCALE;
use bastion_core::enums::MissileSide;
use bastion_core::types::{EntityId, Position};

/// A missile that reached its target this tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Impact {
    pub missile: EntityId,
    pub side: MissileSide,
    pub at: Position,
}

/// Advance every active missile by `dt_ms`.
///
/// Missiles that reach `progress >= 1` are deactivated here and reported as
/// impacts, in id order. The caller owns turning impacts into explosions.
pub fn advance_missiles(
    world: &mut World,
    rng: &mut ChaCha8Rng,
    trail: &TrailConfig,
    dt_ms: f64,
) -> Vec<Impact> {
    let mut impacts = Vec::new();

    // Sorted so trail rolls consume the RNG in a stable order.
    let mut flying: Vec<(EntityId, hecs::Entity)> = world
        .query::<(&EntityId, &Active, &Missile)>()
        .iter()
        .filter(|(_, (_, active, _))| active.0)
        .map(|(entity, (id, _, _))| (*id, entity))
        .collect();
    flying.sort_by_key(|(id, _)| *id);

    for (id, entity) in flying {
        let Ok(mut query) =
            world.query_one::<(&mut Position, &mut Active, &mut Missile, &mut Trail)>(entity)
        else {
            continue;
        };
        let Some((pos, active, missile, missile_trail)) = query.get() else {
            continue;
        };

        let step = match missile.side {
            MissileSide::Player => missile.speed * dt_ms,
            MissileSide::Enemy => missile.speed * dt_ms * ENEMY_TIME_SCALE,
        };
        missile.progress += step;
        *pos = missile.position();

        let probability = match missile.side {
            MissileSide::Player => trail.player_probability,
            MissileSide::Enemy => trail.enemy_probability,
        };
        if rng.gen_bool(probability) {
            missile_trail.push(*pos);
        }

        if missile.progress >= 1.0 {
            missile.progress = 1.0;
            active.0 = false;
            impacts.push(Impact {
                missile: id,
                side: missile.side,
                at: missile.target,
            });
        }
    }

    impacts
}

/// Symmetric triangular radius profile over `[0, duration]`.
pub fn envelope(age: f64, duration: f64, max_radius: f64) -> f64 {
    if duration <= 0.0 {
        return 0.0;
    }
    let half = duration / 2.0;
    let r = if age <= half {
        max_radius * age / half
    } else {
        max_radius * (duration - age) / half
    };
    r.max(0.0)
}

/// Age explosions and update their radius; expired ones go inactive.
pub fn age_explosions(world: &mut World, dt_ms: f64) {
    for (_, (active, explosion)) in world.query_mut::<(&mut Active, &mut Explosion)>() {
        if !active.0 {
            continue;
        }
        explosion.age += dt_ms;
        if explosion.age > explosion.duration {
            active.0 = false;
            explosion.radius = 0.0;
        } else {
            explosion.radius = envelope(explosion.age, explosion.duration, explosion.max_radius);
        }
    }
}
