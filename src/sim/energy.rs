//! Energy economy: orb pickups, casting, and contact defense

use super::power::PowerFlag;
use super::ring::circles_touch;
use super::state::{OrbKind, PulseEvent, SimulationState};
use crate::feedback::{FeedbackEvent, KillSource};

/// Collect every orb the player is touching
pub fn collect_orbs(state: &mut SimulationState) {
    let player_pos = state.player.pos;
    let reach = state.tuning.orb_collect_radius;

    let (collected, remaining): (Vec<_>, Vec<_>) = state
        .orbs
        .drain(..)
        .partition(|orb| orb.pos.distance(player_pos) < reach);
    state.orbs = remaining;

    let now = state.clock.now_ms;
    for orb in collected {
        match orb.kind {
            OrbKind::Normal => {
                state.energy += orb.value;
            }
            OrbKind::Power => activate(state, PowerFlag::Power, now),
            OrbKind::Freeze => activate(state, PowerFlag::Freeze, now),
            OrbKind::Slow => activate(state, PowerFlag::Slow, now),
        }
        state.events.push(FeedbackEvent::OrbCollected { kind: orb.kind });
    }
}

fn activate(state: &mut SimulationState, flag: PowerFlag, now: f64) {
    state.power.activate(flag, now, &state.tuning);
    state.events.push(FeedbackEvent::StateActivated(flag));
    log::info!("{:?} activated until {:.0}ms", flag, now + flag.duration_ms(&state.tuning));
}

/// Spend all energy on a pulse centred on the player.
///
/// Fails without side effects beyond a `CastFailed` event when energy is
/// below the minimum. Returns whether a pulse was emitted.
pub fn try_pulse(state: &mut SimulationState) -> bool {
    if state.energy < state.tuning.min_energy_to_cast {
        state.events.push(FeedbackEvent::CastFailed);
        return false;
    }

    let energy_used = state.energy;
    let max_radius = state.tuning.pulse_max_radius(energy_used);
    state.max_energy_used = state.max_energy_used.max(energy_used);
    state.energy = 0;
    state.visual_energy = 0.0;

    let pulse = PulseEvent {
        origin: state.player.pos,
        cast_at: state.clock.now_ms,
        max_radius,
    };
    state.pulses.push(pulse);
    state.cast_log.push(pulse);

    state.events.push(FeedbackEvent::CastFired {
        energy_used,
        max_radius,
    });
    log::debug!("Pulse cast with {} energy, radius {:.0}", energy_used, max_radius);
    true
}

/// Absorb an enemy contact: force a cast and destroy every enemy within the
/// defense radius. Caller guarantees energy > 0.
pub fn absorb_contact(state: &mut SimulationState) {
    let energy_used = state.energy;
    try_pulse(state);
    state.energy = 0;
    state.visual_energy = 0.0;

    let player_pos = state.player.pos;
    let radius = state.tuning.defense_radius;
    let (killed, survivors): (Vec<_>, Vec<_>) = state
        .enemies
        .drain(..)
        .partition(|enemy| enemy.pos.distance(player_pos) < radius);
    state.enemies = survivors;

    for enemy in &killed {
        state.make_echo(enemy.pos);
        state.score += state.tuning.score_per_kill;
        state.events.push(FeedbackEvent::EnemyKilled {
            pos: enemy.pos,
            source: KillSource::Defense,
        });
    }

    state.events.push(FeedbackEvent::DefenseBurst {
        energy_used,
        kills: killed.len() as u32,
    });
    log::info!(
        "Contact absorbed with {} energy, {} enemies destroyed",
        energy_used,
        killed.len()
    );
}

/// Index of the first enemy touching the player, if any
pub fn find_contact(state: &SimulationState) -> Option<usize> {
    let player_pos = state.player.pos;
    let player_radius = state.tuning.player_contact_radius;
    state
        .enemies
        .iter()
        .position(|enemy| circles_touch(enemy.pos, enemy.radius, player_pos, player_radius))
}

/// Ease the render-only energy readout toward the real value
pub fn smooth_visual_energy(state: &mut SimulationState) {
    let smoothing = state.tuning.visual_energy_smoothing_ms;
    let lerp = if smoothing > 0.0 {
        (state.clock.dt_ms / smoothing).min(1.0) as f32
    } else {
        1.0
    };
    let target = state.energy as f32;
    state.visual_energy += (target - state.visual_energy) * lerp;
    if state.energy == 0 && state.visual_energy < 0.5 {
        state.visual_energy = 0.0;
    }
    state.visual_energy = state.visual_energy.max(0.0);
}
