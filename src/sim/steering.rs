//! Player movement and enemy steering
//!
//! Enemy precedence per tick: Freeze stops everything; otherwise enemies
//! chase (or flee at a boosted speed while Power is active); Slow then scales
//! whichever speed that produced.

use glam::Vec2;

use super::power::{PowerFlag, PowerState};
use super::state::{Enemy, Player};
use crate::consts::*;
use crate::rotate_toward;
use crate::tuning::Tuning;

/// Power-state effects on enemy steering for one tick
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SteeringModifiers {
    pub frozen: bool,
    pub fleeing: bool,
    pub slowed: bool,
}

impl SteeringModifiers {
    pub fn from_power(power: &PowerState) -> Self {
        Self {
            frozen: power.is_active(PowerFlag::Freeze),
            fleeing: power.is_active(PowerFlag::Power),
            slowed: power.is_active(PowerFlag::Slow),
        }
    }

    /// Combined speed factor (ignores Freeze, which zeroes velocity outright)
    pub fn speed_multiplier(&self, tuning: &Tuning) -> f32 {
        let mut mult = if self.fleeing {
            tuning.power_flee_multiplier
        } else {
            1.0
        };
        if self.slowed {
            mult *= tuning.slow_speed_multiplier;
        }
        mult
    }
}

/// Clamp a position to the field, keeping `margin` from every edge
#[inline]
pub fn clamp_to_field(pos: Vec2, margin: f32) -> Vec2 {
    pos.clamp(
        Vec2::splat(margin),
        Vec2::new(FIELD_WIDTH - margin, FIELD_HEIGHT - margin),
    )
}

/// Move the player along a normalized input direction. The heading turns
/// toward the input at the tuned rate rather than snapping.
pub fn move_player(player: &mut Player, direction: Vec2, dt: f32, tuning: &Tuning) {
    if direction != Vec2::ZERO {
        let target = direction.y.atan2(direction.x);
        player.angle = rotate_toward(player.angle, target, tuning.player_turn_rate * dt);
    }
    player.pos = clamp_to_field(player.pos + direction * player.speed * dt, tuning.player_margin);
}

/// Velocity an enemy steers with this tick
pub fn enemy_velocity(
    enemy: &Enemy,
    player_pos: Vec2,
    mods: SteeringModifiers,
    tuning: &Tuning,
) -> Vec2 {
    if mods.frozen {
        return Vec2::ZERO;
    }
    let to_player = (player_pos - enemy.pos).normalize_or_zero();
    let dir = if mods.fleeing { -to_player } else { to_player };
    dir * enemy.speed * mods.speed_multiplier(tuning)
}

/// Steer and integrate every enemy
pub fn steer_enemies(
    enemies: &mut [Enemy],
    player_pos: Vec2,
    mods: SteeringModifiers,
    dt: f32,
    tuning: &Tuning,
) {
    for enemy in enemies.iter_mut() {
        enemy.vel = enemy_velocity(enemy, player_pos, mods, tuning);
        if mods.frozen {
            continue;
        }
        enemy.pos = clamp_to_field(enemy.pos + enemy.vel * dt, tuning.enemy_margin);
    }
}
