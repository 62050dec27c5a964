//! Pulse/echo damage resolution
//!
//! Every tick, each active ring (pulses, power waves, and the virtual rings
//! echoes replay) is tested against the live enemies. An evaluation kills at
//! most one enemy: the first hit in collection order. Kills are marked during
//! the scan and compacted afterwards, so later rings in the same tick skip
//! enemies that are already dead but indices stay stable while scanning.

use glam::Vec2;

use super::ring::{ring_hit, ring_radius};
use super::state::{EchoSource, Enemy, PulseEvent, SimulationState};
use crate::feedback::{FeedbackEvent, KillSource};
use crate::tuning::Tuning;

/// Where a ring came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RingSource {
    Pulse,
    PowerWave,
    /// Replay anchored at the echo with this index in `state.echoes`
    Echo(usize),
}

impl RingSource {
    fn kill_source(self) -> KillSource {
        match self {
            RingSource::Pulse => KillSource::Pulse,
            RingSource::PowerWave => KillSource::PowerWave,
            RingSource::Echo(_) => KillSource::Echo,
        }
    }
}

/// A ring to evaluate this tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RingEvent {
    pub center: Vec2,
    pub start_at: f64,
    pub max_radius: f32,
    pub source: RingSource,
}

impl RingEvent {
    pub fn from_pulse(pulse: &PulseEvent, source: RingSource) -> Self {
        Self {
            center: pulse.origin,
            start_at: pulse.cast_at,
            max_radius: pulse.max_radius,
            source,
        }
    }

    /// Current radius, or None when the ring has not started or has expired
    pub fn radius_at(&self, now: f64, tuning: &Tuning) -> Option<f32> {
        let age = now - self.start_at;
        if age < 0.0 || age > tuning.pulse_lifetime_ms {
            return None;
        }
        Some(ring_radius(age, tuning.pulse_speed, self.max_radius))
    }
}

/// Virtual rings an echo replays: every logged cast, re-centred on the echo
/// and delayed by `echo_delay_ms`. Computed fresh each tick.
pub fn virtual_events_for(
    echo: &EchoSource,
    echo_index: usize,
    casts: &[PulseEvent],
    echo_delay_ms: f64,
) -> Vec<RingEvent> {
    casts
        .iter()
        .map(|cast| RingEvent {
            center: echo.pos,
            start_at: cast.cast_at + echo_delay_ms,
            max_radius: cast.max_radius,
            source: RingSource::Echo(echo_index),
        })
        .collect()
}

/// First live enemy the ring touches, in collection order
pub fn first_hit(
    ring: &RingEvent,
    now: f64,
    tuning: &Tuning,
    enemies: &[Enemy],
    alive: &[bool],
) -> Option<usize> {
    let radius = ring.radius_at(now, tuning)?;
    enemies
        .iter()
        .enumerate()
        .filter(|(i, _)| alive[*i])
        .find(|(_, enemy)| {
            ring_hit(ring.center, radius, tuning.pulse_thickness, enemy.pos, enemy.radius)
        })
        .map(|(i, _)| i)
}

/// A kill recorded during the scan
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Kill {
    pub enemy_index: usize,
    pub pos: Vec2,
    pub source: RingSource,
}

/// Resolve all ring damage for this tick. Returns the kills in the order
/// they happened.
pub fn resolve_damage(state: &mut SimulationState) -> Vec<Kill> {
    let now = state.clock.now_ms;
    let onset_window = state.clock.dt_ms.max(1.0) + 2.0;
    let mut alive = vec![true; state.enemies.len()];
    let mut kills = Vec::new();

    let live_rings = state
        .pulses
        .iter()
        .map(|p| RingEvent::from_pulse(p, RingSource::Pulse))
        .chain(
            state
                .power_waves
                .iter()
                .map(|w| RingEvent::from_pulse(w, RingSource::PowerWave)),
        );
    for ring in live_rings {
        if let Some(i) = first_hit(&ring, now, &state.tuning, &state.enemies, &alive) {
            alive[i] = false;
            kills.push(Kill {
                enemy_index: i,
                pos: state.enemies[i].pos,
                source: ring.source,
            });
        }
    }

    // Only echoes that existed when the scan began take part this tick
    let max_uses = state.tuning.echo_max_uses;
    let echo_life = state.tuning.echo_lifetime_ms;
    for (index, echo) in state.echoes.iter_mut().enumerate() {
        if state.clock.age_of(echo.created_at) > echo_life {
            continue;
        }
        let rings = virtual_events_for(echo, index, &state.cast_log, state.tuning.echo_delay_ms);
        for ring in rings {
            if echo.used >= max_uses {
                break;
            }
            let age = now - ring.start_at;
            if (0.0..onset_window).contains(&age) {
                state.events.push(FeedbackEvent::EchoReplay { index });
            }
            if let Some(i) = first_hit(&ring, now, &state.tuning, &state.enemies, &alive) {
                alive[i] = false;
                echo.used += 1;
                kills.push(Kill {
                    enemy_index: i,
                    pos: state.enemies[i].pos,
                    source: ring.source,
                });
            }
        }
    }

    if kills.is_empty() {
        return kills;
    }

    let mut index = 0;
    state.enemies.retain(|_| {
        let keep = alive[index];
        index += 1;
        keep
    });

    for kill in &kills {
        state.score += state.tuning.score_per_kill;
        state.events.push(FeedbackEvent::EnemyKilled {
            pos: kill.pos,
            source: kill.source.kill_source(),
        });
        state.make_echo(kill.pos);
        log::debug!("Enemy killed by {:?} at ({:.0}, {:.0})", kill.source, kill.pos.x, kill.pos.y);
    }
    kills
}

/// Drop expired rings, stale cast-log entries, and spent or aged echoes
pub fn prune(state: &mut SimulationState) {
    let life = state.tuning.pulse_lifetime_ms;
    let horizon = state.tuning.echo_replay_horizon_ms();
    let echo_life = state.tuning.echo_lifetime_ms;
    let max_uses = state.tuning.echo_max_uses;

    let clock = state.clock;
    state.pulses.retain(|p| clock.age_of(p.cast_at) <= life);
    state.power_waves.retain(|w| clock.age_of(w.cast_at) <= life);
    state.cast_log.retain(|p| clock.age_of(p.cast_at) <= horizon);

    let events = &mut state.events;
    state.echoes.retain(|echo| {
        if echo.used >= max_uses {
            return false;
        }
        if clock.age_of(echo.created_at) > echo_life {
            events.push(FeedbackEvent::EchoExpired { pos: echo.pos });
            return false;
        }
        true
    });
}
