//! Per-frame simulation tick
//!
//! One tick per rendered frame. `now` is sampled once by the host and reused
//! for every timer check in the tick.

use glam::Vec2;

use super::damage::{prune, resolve_damage};
use super::energy::{absorb_contact, collect_orbs, find_contact, smooth_visual_energy, try_pulse};
use super::power::PowerFlag;
use super::spawner;
use super::state::{GamePhase, PulseEvent, SimulationState};
use super::steering::{SteeringModifiers, move_player, steer_enemies};
use crate::feedback::FeedbackEvent;

/// Input for a single tick. `cast` and `restart` must already be
/// edge-triggered (true only on the press frame).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    /// Cast a pulse
    pub cast: bool,
    /// Start a new run (only honoured on the game-over screen)
    pub restart: bool,
}

impl TickInput {
    /// Normalized movement direction (+y is down the screen)
    pub fn direction(&self) -> Vec2 {
        let x = self.right as i32 - self.left as i32;
        let y = self.down as i32 - self.up as i32;
        Vec2::new(x as f32, y as f32).normalize_or_zero()
    }
}

/// Advance the simulation by one frame
pub fn tick(state: &mut SimulationState, input: &TickInput, now_ms: f64, dt_ms: f64) {
    if state.phase == GamePhase::GameOver {
        if input.restart {
            state.clock.now_ms = now_ms;
            state.restart();
        }
        return;
    }

    state.clock.advance(now_ms, dt_ms);
    let now = state.clock.now_ms;
    let dt = state.clock.dt_secs();

    smooth_visual_energy(state);

    // Timed states expire before anything moves
    for flag in state.power.expire(now) {
        if flag == PowerFlag::Power {
            state.power_waves.clear();
        }
        state.events.push(FeedbackEvent::StateExpired(flag));
        log::info!("{:?} expired", flag);
    }

    spawner::update(state);

    move_player(&mut state.player, input.direction(), dt, &state.tuning);
    collect_orbs(state);

    if input.cast {
        try_pulse(state);
    }

    let mods = SteeringModifiers::from_power(&state.power);
    steer_enemies(&mut state.enemies, state.player.pos, mods, dt, &state.tuning);

    if state.power.poll_wave(now, state.tuning.power_wave_period_ms) {
        state.power_waves.push(PulseEvent {
            origin: state.player.pos,
            cast_at: now,
            max_radius: state.tuning.power_wave_max_radius(),
        });
    }

    resolve_damage(state);
    prune(state);

    if find_contact(state).is_some() {
        if state.energy > 0 {
            absorb_contact(state);
        } else {
            game_over(state);
        }
    }
}

/// Running -> GameOver. Score and energy are left exactly as they were.
fn game_over(state: &mut SimulationState) {
    state.phase = GamePhase::GameOver;
    state.events.push(FeedbackEvent::GameOver {
        score: state.score,
        survival_secs: state.clock.game_time,
    });
    log::info!(
        "Game over: score {} after {:.1}s",
        state.score,
        state.clock.game_time
    );
}
