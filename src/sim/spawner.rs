//! Enemy and energy-orb scheduling
//!
//! Difficulty ramps with game time: enemies arrive more often (interval
//! shrinks toward a floor) and faster (speed range rises per bracket).

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::state::{Enemy, EnergyOrb, OrbKind, SimulationState};
use crate::consts::*;
use crate::tuning::Tuning;

/// Countdowns until the next spawns
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnSchedule {
    pub next_enemy_in_ms: f64,
    pub next_orb_in_ms: f64,
}

impl SpawnSchedule {
    /// The opening schedule used on every (re)start
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            next_enemy_in_ms: tuning.initial_enemy_delay_ms,
            next_orb_in_ms: tuning.orb_first_spawn_ms,
        }
    }
}

/// Enemy base-speed sampling range at a given game time. Both bounds rise by
/// `enemy_speed_step` per completed bracket, so the floor never decreases.
pub fn enemy_speed_range(tuning: &Tuning, game_time: f32) -> (f32, f32) {
    let brackets = (game_time.max(0.0) / tuning.enemy_speed_bracket_secs).floor();
    let boost = brackets * tuning.enemy_speed_step;
    (tuning.enemy_speed_min + boost, tuning.enemy_speed_max + boost)
}

/// Nominal gap between enemy spawns: `max(floor, start - t * decay)`
pub fn enemy_spawn_interval(tuning: &Tuning, game_time: f32) -> f64 {
    (tuning.enemy_interval_start_ms - game_time as f64 * tuning.enemy_interval_decay_ms)
        .max(tuning.enemy_interval_floor_ms)
}

/// Map a uniform roll in [0, 1) to an orb kind by cumulative bands:
/// power, then freeze, then slow, remainder normal. Before the unlock time
/// every orb is normal.
pub fn orb_kind_for_roll(tuning: &Tuning, game_time: f32, roll: f32) -> OrbKind {
    if game_time < tuning.special_orb_unlock_secs {
        return OrbKind::Normal;
    }

    let power_band = tuning.power_orb_chance;
    let freeze_band = power_band + tuning.freeze_orb_chance;
    let slow_band = freeze_band + tuning.slow_orb_chance;

    if roll < power_band {
        OrbKind::Power
    } else if roll < freeze_band {
        OrbKind::Freeze
    } else if roll < slow_band {
        OrbKind::Slow
    } else {
        OrbKind::Normal
    }
}

/// Run the spawn countdowns for this tick
pub fn update(state: &mut SimulationState) {
    let dt = state.clock.dt_ms;

    state.spawner.next_orb_in_ms -= dt;
    if state.spawner.next_orb_in_ms <= 0.0 {
        spawn_energy_orb(state);
        let jitter = state.tuning.orb_interval_jitter_ms;
        let offset = if jitter > 0.0 {
            state.rng.random_range(-jitter..=jitter)
        } else {
            0.0
        };
        state.spawner.next_orb_in_ms = state.tuning.orb_interval_ms + offset;
    }

    state.spawner.next_enemy_in_ms -= dt;
    if state.spawner.next_enemy_in_ms <= 0.0 {
        spawn_enemy(state);
        let interval = enemy_spawn_interval(&state.tuning, state.clock.game_time);
        let low = interval * state.tuning.enemy_interval_jitter_min;
        state.spawner.next_enemy_in_ms = if low < interval {
            state.rng.random_range(low..=interval)
        } else {
            interval
        };
    }
}

/// Spawn one enemy just outside a random field edge
pub fn spawn_enemy(state: &mut SimulationState) {
    let offset = state.tuning.enemy_spawn_offset;
    let mut pos = Vec2::new(
        state.rng.random_range(0.0..=FIELD_WIDTH),
        state.rng.random_range(0.0..=FIELD_HEIGHT),
    );
    let horizontal_edge = state.rng.random_bool(0.5);
    let near_side = state.rng.random_bool(0.5);
    if horizontal_edge {
        pos.x = if near_side { -offset } else { FIELD_WIDTH + offset };
    } else {
        pos.y = if near_side { -offset } else { FIELD_HEIGHT + offset };
    }

    let (min_speed, max_speed) = enemy_speed_range(&state.tuning, state.clock.game_time);
    let speed = if min_speed < max_speed {
        state.rng.random_range(min_speed..=max_speed)
    } else {
        min_speed
    };

    let id = state.next_entity_id();
    state.enemies.push(Enemy {
        id,
        pos,
        radius: state.tuning.enemy_radius,
        vel: Vec2::ZERO,
        speed,
    });
    log::debug!("Enemy {} spawned at ({:.0}, {:.0}) speed {:.1}", id, pos.x, pos.y, speed);
}

/// Spawn one orb inside the safe rectangle, away from the player if possible
pub fn spawn_energy_orb(state: &mut SimulationState) {
    let tuning = &state.tuning;
    let attempts = tuning.orb_placement_attempts.max(1);
    let min_dist = tuning.orb_min_player_distance;
    let (min_x, max_x) = (tuning.orb_safe_min_x, tuning.orb_safe_max_x);
    let (min_y, max_y) = (tuning.orb_safe_min_y, tuning.orb_safe_max_y);
    let player_pos = state.player.pos;

    let mut pos = Vec2::ZERO;
    let mut placed = false;
    for _ in 0..attempts {
        pos = Vec2::new(
            state.rng.random_range(min_x..=max_x),
            state.rng.random_range(min_y..=max_y),
        );
        if pos.distance(player_pos) >= min_dist {
            placed = true;
            break;
        }
    }
    if !placed {
        log::warn!(
            "Orb placement fell back to ({:.0}, {:.0}), {:.0}px from the player",
            pos.x,
            pos.y,
            pos.distance(player_pos)
        );
    }

    let game_time = state.clock.game_time;
    let kind = if game_time >= state.tuning.special_orb_unlock_secs {
        let roll: f32 = state.rng.random();
        orb_kind_for_roll(&state.tuning, game_time, roll)
    } else {
        OrbKind::Normal
    };

    let id = state.next_entity_id();
    state.orbs.push(EnergyOrb {
        id,
        pos,
        kind,
        value: kind.value(&state.tuning),
        created_at: state.clock.now_ms,
    });
    log::debug!("{:?} orb {} spawned at ({:.0}, {:.0})", kind, id, pos.x, pos.y);
}
