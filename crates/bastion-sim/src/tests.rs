//! Scenario tests for the simulation engine: firing, damage, wave flow and determinism.

use bastion_core::commands::PlayerCommand;
use bastion_core::components::{Active, Explosion, Missile, Tower};
use bastion_core::config::{SimConfig, TrailConfig};
use bastion_core::constants::*;
use bastion_core::enums::*;
use bastion_core::events::GameEvent;
use bastion_core::types::{EntityId, Position};

use crate::engine::SimulationEngine;

const DT: f64 = 16.0;

fn playing_engine() -> SimulationEngine {
    let mut engine = SimulationEngine::new(SimConfig::default());
    engine.start_session();
    engine
}

/// Set tower ammo in id order (left, centre, right).
fn set_tower_ammo(engine: &mut SimulationEngine, ammo: [u32; 3]) {
    let mut towers: Vec<(EntityId, hecs::Entity)> = engine
        .world()
        .query::<(&EntityId, &Tower)>()
        .iter()
        .map(|(entity, (id, _))| (*id, entity))
        .collect();
    towers.sort_by_key(|t| t.0);
    for (i, (_, entity)) in towers.into_iter().enumerate() {
        engine.world_mut().get::<&mut Tower>(entity).unwrap().ammo = ammo[i];
    }
}

fn tower_ammo(engine: &SimulationEngine) -> Vec<u32> {
    let mut towers: Vec<(EntityId, u32)> = engine
        .world()
        .query::<(&EntityId, &Tower)>()
        .iter()
        .map(|(_, (id, t))| (*id, t.ammo))
        .collect();
    towers.sort_by_key(|t| t.0);
    towers.into_iter().map(|(_, a)| a).collect()
}

/// Put the session one tick away from clearing the current wave.
fn finish_spawning(engine: &mut SimulationEngine) {
    let wave = &mut engine.session_mut().wave_state;
    wave.enemies_spawned = wave.enemies_to_spawn;
}

// ---- Fire control ----

#[test]
fn test_fire_uses_closest_tower() {
    let mut engine = playing_engine();
    let missile = engine.fire(380.0, 300.0);
    assert!(missile.is_some());
    assert_eq!(tower_ammo(&engine), vec![20, 39, 20]);

    let snap = engine.tick(0.0);
    assert_eq!(snap.player_missiles.len(), 1);
    let (start, target) = engine
        .world()
        .query::<&Missile>()
        .iter()
        .map(|(_, m)| (m.start, m.target))
        .next()
        .unwrap();
    assert_eq!(start, Position::new(400.0, 530.0));
    assert_eq!(target, Position::new(380.0, 300.0));
    assert_eq!(engine.session().wave_state.stats.shots_fired, 1);
    assert!(snap
        .events
        .iter()
        .any(|e| matches!(e, GameEvent::MissileLaunched { .. })));
}

#[test]
fn test_fire_falls_back_when_closest_is_empty() {
    let mut engine = playing_engine();
    set_tower_ammo(&mut engine, [0, 0, 1]);
    assert!(engine.fire(60.0, 100.0).is_some());
    assert_eq!(tower_ammo(&engine), vec![0, 0, 0]);
    assert!(engine.fire(60.0, 100.0).is_none());
    assert_eq!(tower_ammo(&engine), vec![0, 0, 0]);
}

#[test]
fn test_fire_rejected_below_guard_line() {
    let mut engine = playing_engine();
    assert!(engine.fire(400.0, 521.0).is_none());
    assert!(engine.fire(400.0, 520.0).is_some());
    assert_eq!(tower_ammo(&engine), vec![20, 39, 20]);
}

#[test]
fn test_fire_ignored_outside_play() {
    let mut engine = SimulationEngine::new(SimConfig::default());
    assert!(engine.fire(400.0, 300.0).is_none());

    engine.start_session();
    engine.pause();
    assert!(engine.fire(400.0, 300.0).is_none());
    engine.resume();
    assert!(engine.fire(400.0, 300.0).is_some());
}

#[test]
fn test_commands_apply_at_tick_boundary() {
    let mut engine = SimulationEngine::new(SimConfig::default());
    engine.queue_commands([
        PlayerCommand::StartSession,
        PlayerCommand::Fire { x: 380.0, y: 300.0 },
    ]);
    assert_eq!(engine.phase(), GamePhase::Start);

    let snap = engine.tick(DT);
    assert_eq!(snap.phase, GamePhase::Playing);
    assert_eq!(snap.player_missiles.len(), 1);
    assert_eq!(snap.towers[1].ammo, 39);
}

// ---- Motion and damage ----

#[test]
fn test_player_missile_detonates_once() {
    let mut engine = playing_engine();
    engine.fire(400.0, 300.0);

    let mut detonations = 0;
    for _ in 0..20 {
        let snap = engine.tick(DT);
        detonations += snap
            .events
            .iter()
            .filter(|e| {
                matches!(
                    e,
                    GameEvent::Detonation {
                        cause: ExplosionCause::PlayerBurst,
                        ..
                    }
                )
            })
            .count();
    }
    assert_eq!(detonations, 1);
    assert_eq!(engine.world().query::<&Missile>().iter().count(), 0);
}

#[test]
fn test_enemy_impact_destroys_city() {
    let mut engine = playing_engine();
    engine.world_mut().clear();
    engine.spawn_tower(Position::new(750.0, GROUND_Y), 20, 20);
    let city = engine.spawn_city(Position::new(120.0, GROUND_Y));
    engine.spawn_missile(
        MissileSide::Enemy,
        Position::new(100.0, 0.0),
        Position::new(100.0, GROUND_Y),
        0.04,
        0.999,
    );

    let snap = engine.tick(DT);

    assert!(snap.cities.is_empty());
    assert!(snap.enemy_missiles.is_empty());
    let explosions: Vec<(ExplosionCause, Position, f64)> = snap
        .explosions
        .iter()
        .map(|e| (e.cause, e.position, e.max_radius))
        .collect();
    assert_eq!(
        explosions,
        vec![
            (ExplosionCause::Debris, Position::new(120.0, GROUND_Y), 50.0),
            (ExplosionCause::EnemyImpact, Position::new(100.0, GROUND_Y), 40.0),
        ]
    );
    assert!(snap.events.contains(&GameEvent::StructureDestroyed {
        structure: city,
        kind: StructureKind::City,
        position: Position::new(120.0, GROUND_Y),
    }));
    assert_eq!(snap.phase, GamePhase::Playing);
    assert_eq!(engine.session().wave_state.stats.structures_lost, 1);
}

#[test]
fn test_interception_scores_and_chains() {
    let mut engine = playing_engine();
    // Full-size blast with two enemies inside it.
    engine.spawn_explosion(ExplosionCause::PlayerBurst, Position::new(300.0, 200.0), 600.0);
    engine.spawn_missile(
        MissileSide::Enemy,
        Position::new(300.0, 0.0),
        Position::new(300.0, GROUND_Y),
        0.03,
        200.0 / GROUND_Y,
    );
    engine.spawn_missile(
        MissileSide::Enemy,
        Position::new(330.0, 0.0),
        Position::new(330.0, GROUND_Y),
        0.03,
        200.0 / GROUND_Y,
    );

    let snap = engine.tick(DT);
    assert_eq!(snap.score, 2 * INTERCEPT_SCORE);
    assert!(snap.enemy_missiles.is_empty());
    let interceptions = snap
        .explosions
        .iter()
        .filter(|e| e.cause == ExplosionCause::Interception)
        .count();
    assert_eq!(interceptions, 2);
    // New interception blasts start at zero radius.
    assert!(snap
        .explosions
        .iter()
        .filter(|e| e.cause == ExplosionCause::Interception)
        .all(|e| e.radius == 0.0));
    assert_eq!(engine.session().wave_state.stats.enemies_intercepted, 2);
}

#[test]
fn test_explosions_fade_and_are_pruned() {
    let mut engine = playing_engine();
    engine.spawn_explosion(ExplosionCause::Debris, Position::new(10.0, 10.0), 0.0);
    let mut ticks = 0;
    loop {
        let snap = engine.tick(DT);
        ticks += 1;
        if snap.explosions.is_empty() {
            break;
        }
        assert!(snap.explosions[0].radius <= DEBRIS_RADIUS);
        assert!(ticks < 100, "explosion never expired");
    }
    // 1000 ms lifetime at 16 ms per tick.
    assert_eq!(ticks, 63);
    assert_eq!(engine.world().query::<&Explosion>().iter().count(), 0);
}

// ---- Wave flow ----

#[test]
fn test_spawn_cadence_first_wave() {
    let mut engine = playing_engine();
    for _ in 0..23 {
        let snap = engine.tick(100.0);
        assert!(snap.enemy_missiles.is_empty());
    }
    let snap = engine.tick(100.0);
    assert_eq!(snap.enemy_missiles.len(), 1);
    assert_eq!(snap.enemies_remaining, FIRST_WAVE_ENEMIES - 1);
}

#[test]
fn test_wave_complete_awards_ammo_bonus() {
    let mut engine = playing_engine();
    finish_spawning(&mut engine);
    set_tower_ammo(&mut engine, [5, 10, 0]);

    let snap = engine.tick(DT);
    assert_eq!(snap.phase, GamePhase::WaveComplete);
    assert_eq!(snap.score, 75);
    assert_eq!(snap.last_bonus, Some(75));
    assert_eq!(snap.transition_remaining_ms, Some(3000.0));
    assert!(snap.events.iter().any(|e| matches!(
        e,
        GameEvent::WaveComplete {
            wave: 1,
            bonus: 75,
            ..
        }
    )));
}

#[test]
fn test_wave_advances_after_delay() {
    let mut engine = playing_engine();
    finish_spawning(&mut engine);
    set_tower_ammo(&mut engine, [5, 10, 0]);
    engine.tick(DT);

    assert_eq!(engine.tick(1000.0).phase, GamePhase::WaveComplete);
    assert_eq!(engine.tick(1000.0).phase, GamePhase::WaveComplete);
    let snap = engine.tick(1000.0);

    assert_eq!(snap.phase, GamePhase::Playing);
    assert_eq!(snap.wave, 2);
    assert_eq!(snap.transition_remaining_ms, None);
    assert_eq!(tower_ammo(&engine), vec![20, 40, 20]);

    let session = engine.session();
    assert_eq!(session.wave_state.enemies_to_spawn, 14);
    assert_eq!(session.wave_state.spawn_interval_ms, 2200.0);
    assert!((session.enemy_speed_multiplier - 1.15).abs() < 1e-12);
    assert!(snap
        .events
        .contains(&GameEvent::WaveStarted { wave: 2, enemies: 14 }));
}

#[test]
fn test_destroyed_tower_not_replenished() {
    let mut engine = playing_engine();
    finish_spawning(&mut engine);
    set_tower_ammo(&mut engine, [5, 10, 0]);
    let left = engine
        .world()
        .query::<(&EntityId, &Tower)>()
        .iter()
        .min_by_key(|(_, (id, _))| **id)
        .map(|(entity, _)| entity)
        .unwrap();
    engine.world_mut().get::<&mut Active>(left).unwrap().0 = false;

    let snap = engine.tick(DT);
    assert_eq!(snap.score, 50);
    assert_eq!(snap.towers.len(), 2);

    engine.advance_wave();
    assert_eq!(tower_ammo(&engine), vec![5, 40, 20]);
}

#[test]
fn test_advance_wave_skips_the_pause() {
    let mut engine = playing_engine();
    finish_spawning(&mut engine);
    engine.tick(DT);
    assert_eq!(engine.phase(), GamePhase::WaveComplete);

    engine.queue_command(PlayerCommand::AdvanceWave);
    let snap = engine.tick(DT);
    assert_eq!(snap.phase, GamePhase::Playing);
    assert_eq!(snap.wave, 2);
    assert!(!engine.scheduler().is_pending());

    // The cancelled timer must not fire a second advance.
    for _ in 0..5 {
        engine.tick(1000.0);
    }
    assert_eq!(engine.session().wave, 2);
}

#[test]
fn test_advance_wave_ignored_while_playing() {
    let mut engine = playing_engine();
    engine.advance_wave();
    assert_eq!(engine.session().wave, 1);
    assert_eq!(engine.phase(), GamePhase::Playing);
}

#[test]
fn test_restart_during_pause_drops_pending_transition() {
    let mut engine = playing_engine();
    finish_spawning(&mut engine);
    engine.tick(DT);
    assert_eq!(engine.phase(), GamePhase::WaveComplete);

    engine.restart();
    assert_eq!(engine.phase(), GamePhase::Start);
    assert_eq!(engine.score(), 0);
    assert_eq!(engine.world().len(), 0);

    let snap = engine.tick(5000.0);
    assert_eq!(snap.phase, GamePhase::Start);
    assert_eq!(snap.wave, 1);

    engine.start_session();
    for _ in 0..5 {
        let snap = engine.tick(1000.0);
        assert_eq!(snap.wave, 1);
        assert_eq!(snap.phase, GamePhase::Playing);
    }
}

#[test]
fn test_start_session_only_from_start() {
    let mut engine = playing_engine();
    engine.fire(400.0, 300.0);
    engine.start_session();
    assert_eq!(tower_ammo(&engine), vec![20, 39, 20]);
}

// ---- Terminal states ----

#[test]
fn test_victory_with_enemies_in_flight() {
    let mut engine = playing_engine();
    engine.session_mut().score = 990;
    engine.spawn_explosion(ExplosionCause::PlayerBurst, Position::new(200.0, 100.0), 600.0);
    engine.spawn_missile(
        MissileSide::Enemy,
        Position::new(200.0, 0.0),
        Position::new(200.0, GROUND_Y),
        0.03,
        100.0 / GROUND_Y,
    );
    engine.spawn_missile(
        MissileSide::Enemy,
        Position::new(700.0, 0.0),
        Position::new(700.0, GROUND_Y),
        0.03,
        0.1,
    );

    let snap = engine.tick(DT);
    assert_eq!(snap.phase, GamePhase::Victory);
    assert_eq!(snap.score, 1010);
    assert_eq!(snap.enemy_missiles.len(), 1);
    assert!(snap
        .events
        .contains(&GameEvent::Victory { score: 1010, wave: 1 }));
}

#[test]
fn test_victory_resolved_after_wave_complete() {
    let mut engine = playing_engine();
    finish_spawning(&mut engine);
    engine.session_mut().score = 950;
    engine.tick(DT);
    // 950 + full ammo bonus crosses the line but the pause still plays out.
    assert_eq!(engine.phase(), GamePhase::WaveComplete);
    assert_eq!(engine.score(), 950 + 80 * AMMO_BONUS_PER_ROUND);

    engine.tick(3000.0);
    assert_eq!(engine.phase(), GamePhase::Victory);
    assert_eq!(engine.session().wave, 1);
}

#[test]
fn test_defeat_when_all_towers_fall() {
    let mut engine = playing_engine();
    for (_, (active, _)) in engine.world_mut().query_mut::<(&mut Active, &Tower)>() {
        active.0 = false;
    }

    let snap = engine.tick(DT);
    assert_eq!(snap.phase, GamePhase::Defeat);
    assert!(snap
        .events
        .contains(&GameEvent::Defeat { score: 0, wave: 1 }));

    // Nothing moves once the session is over.
    let frozen = engine.tick(DT);
    engine.queue_command(PlayerCommand::Fire { x: 400.0, y: 300.0 });
    engine.queue_command(PlayerCommand::AdvanceWave);
    engine.queue_command(PlayerCommand::StartSession);
    for _ in 0..500 {
        assert_eq!(engine.tick(100.0), frozen);
    }

    engine.queue_command(PlayerCommand::Restart);
    assert_eq!(engine.tick(DT).phase, GamePhase::Start);
}

// ---- Pause ----

#[test]
fn test_pause_freezes_time_and_countdown() {
    let mut engine = playing_engine();
    engine.tick(DT);
    engine.queue_command(PlayerCommand::Pause);
    let paused = engine.tick(DT);
    assert!(paused.paused);
    for _ in 0..10 {
        assert_eq!(engine.tick(1000.0).time, paused.time);
    }

    engine.queue_command(PlayerCommand::Resume);
    let resumed = engine.tick(DT);
    assert!(!resumed.paused);
    assert_eq!(resumed.time.tick, paused.time.tick + 1);

    finish_spawning(&mut engine);
    engine.tick(DT);
    engine.pause();
    engine.tick(10_000.0);
    assert_eq!(engine.phase(), GamePhase::WaveComplete);
    engine.resume();
    engine.tick(3000.0);
    assert_eq!(engine.phase(), GamePhase::Playing);
}

// ---- Bad input ----

#[test]
fn test_out_of_range_trail_probability_is_clamped() {
    let mut engine = SimulationEngine::new(SimConfig {
        trail: TrailConfig {
            player_probability: 1.5,
            enemy_probability: -0.5,
        },
        ..Default::default()
    });
    assert_eq!(engine.config().trail.player_probability, 1.0);
    assert_eq!(engine.config().trail.enemy_probability, 0.0);

    engine.start_session();
    assert!(engine.fire(400.0, 300.0).is_some());
    let snap = engine.tick(DT);
    assert_eq!(snap.player_missiles.len(), 1);
    assert_eq!(snap.player_missiles[0].trail.len(), 1);
}

#[test]
fn test_negative_dt_is_ignored() {
    let mut engine = playing_engine();
    engine.fire(400.0, 300.0);
    let before = engine.tick(DT);

    let snap = engine.tick(-100.0);
    assert_eq!(snap.time.elapsed_ms, before.time.elapsed_ms);
    assert_eq!(snap.player_missiles.len(), 1);
    assert_eq!(snap.player_missiles[0].progress, before.player_missiles[0].progress);
    assert!(snap.player_missiles[0].progress >= 0.0);
}

#[test]
fn test_non_finite_dt_is_ignored() {
    let mut engine = playing_engine();
    engine.fire(400.0, 300.0);

    for dt in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
        let snap = engine.tick(dt);
        assert_eq!(snap.time.elapsed_ms, 0.0);
        assert!(snap.player_missiles.iter().all(|m| m.progress.is_finite()));
        assert!(snap.explosions.is_empty());
    }

    // Normal ticks still carry the missile to its target.
    let mut detonated = false;
    for _ in 0..20 {
        detonated |= !engine.tick(DT).explosions.is_empty();
    }
    assert!(detonated);
}

// ---- Invariants over long runs ----

#[test]
fn test_long_run_invariants() {
    let mut engine = playing_engine();
    let mut last_score = 0;

    for frame in 0..20_000 {
        let snap = engine.tick(DT);
        assert!(snap.score >= last_score, "score decreased at frame {frame}");
        last_score = snap.score;

        for tower in &snap.towers {
            assert!(tower.ammo <= tower.max_ammo);
        }
        for missile in &snap.player_missiles {
            assert!(missile.progress >= 0.0 && missile.progress < 1.0);
            assert!(missile.trail.len() <= PLAYER_TRAIL_CAP);
        }
        for missile in &snap.enemy_missiles {
            assert!(missile.progress >= 0.0 && missile.progress < 1.0);
            assert!(missile.trail.len() <= ENEMY_TRAIL_CAP);
        }
        for explosion in &snap.explosions {
            assert!(explosion.radius >= 0.0 && explosion.radius <= explosion.max_radius);
        }

        match snap.phase {
            GamePhase::Playing if frame % 20 == 0 => {
                if let Some(lowest) = snap
                    .enemy_missiles
                    .iter()
                    .max_by(|a, b| a.position.y.total_cmp(&b.position.y))
                {
                    engine.fire(lowest.position.x, lowest.position.y.min(FIRE_GUARD_Y));
                }
            }
            phase if phase.is_terminal() => break,
            _ => {}
        }
    }
}

// ---- Determinism ----

fn scripted_run(seed: u64, frames: usize) -> Vec<String> {
    let mut engine = SimulationEngine::new(SimConfig {
        seed,
        ..Default::default()
    });
    engine.queue_command(PlayerCommand::StartSession);

    let mut out = Vec::with_capacity(frames);
    for frame in 0..frames {
        if frame % 40 == 0 {
            engine.queue_command(PlayerCommand::Fire {
                x: (frame % 800) as f64,
                y: 250.0,
            });
        }
        let snap = engine.tick(DT);
        out.push(serde_json::to_string(&snap).unwrap());
    }
    out
}

#[test]
fn test_determinism_same_seed() {
    let a = scripted_run(12345, 1500);
    let b = scripted_run(12345, 1500);
    for (frame, (json_a, json_b)) in a.iter().zip(&b).enumerate() {
        assert_eq!(json_a, json_b, "snapshots diverged at frame {frame}");
    }
}

#[test]
fn test_determinism_different_seeds() {
    let a = scripted_run(111, 1500);
    let b = scripted_run(222, 1500);
    assert!(a != b, "different seeds should produce divergent output");
}

#[test]
fn test_snapshot_lists_sorted_by_id() {
    let mut engine = playing_engine();
    for _ in 0..2000 {
        let snap = engine.tick(DT);
        assert!(snap.towers.windows(2).all(|w| w[0].id < w[1].id));
        assert!(snap.cities.windows(2).all(|w| w[0].id < w[1].id));
        assert!(snap.enemy_missiles.windows(2).all(|w| w[0].id < w[1].id));
        assert!(snap.explosions.windows(2).all(|w| w[0].id < w[1].id));
        if snap.phase != GamePhase::Playing {
            break;
        }
    }
}
