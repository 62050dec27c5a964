//! Read-only view of the simulation for the renderer
//!
//! Captured once per tick after the sim has advanced. Ages and remaining
//! times are clamped to zero so the renderer never sees negative magnitudes.

use glam::Vec2;
use serde::Serialize;

use super::damage::virtual_events_for;
use super::power::PowerFlag;
use super::state::{EnemyBehaviorMode, GamePhase, OrbKind, PulseEvent, SimulationState};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerView {
    pub pos: Vec2,
    pub angle: f32,
    pub powered: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnemyView {
    pub pos: Vec2,
    pub vel: Vec2,
    pub mode: EnemyBehaviorMode,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrbView {
    pub pos: Vec2,
    pub kind: OrbKind,
    pub age_ms: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RingView {
    pub pos: Vec2,
    pub age_ms: f64,
    pub max_radius: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EchoView {
    pub pos: Vec2,
    pub age_ms: f64,
    pub uses_left: u8,
}

/// Remaining time on each timed state (ms)
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PowerTimers {
    pub power_ms: f64,
    pub freeze_ms: f64,
    pub slow_ms: f64,
}

/// Everything the renderer draws for one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderSnapshot {
    pub phase: GamePhase,
    pub score: u64,
    pub energy: u32,
    pub visual_energy: f32,
    pub max_energy_used: u32,
    /// Survival time in seconds
    pub game_time: f32,
    pub difficulty_level: u32,
    pub player: PlayerView,
    pub enemies: Vec<EnemyView>,
    pub orbs: Vec<OrbView>,
    pub pulses: Vec<RingView>,
    pub power_waves: Vec<RingView>,
    pub echoes: Vec<EchoView>,
    /// Replayed rings currently expanding around echoes
    pub echo_rings: Vec<RingView>,
    pub timers: PowerTimers,
}

impl RenderSnapshot {
    pub fn capture(state: &SimulationState) -> Self {
        let now = state.now();
        let mode = state.behavior_mode();
        let ring = |p: &PulseEvent| RingView {
            pos: p.origin,
            age_ms: state.clock.age_of(p.cast_at).max(0.0),
            max_radius: p.max_radius,
        };

        Self {
            phase: state.phase,
            score: state.score,
            energy: state.energy,
            visual_energy: state.visual_energy,
            max_energy_used: state.max_energy_used,
            game_time: state.clock.game_time,
            difficulty_level: state.difficulty_level(),
            player: PlayerView {
                pos: state.player.pos,
                angle: state.player.angle,
                powered: state.power.is_active(PowerFlag::Power),
            },
            enemies: state
                .enemies
                .iter()
                .map(|e| EnemyView {
                    pos: e.pos,
                    vel: e.vel,
                    mode,
                })
                .collect(),
            orbs: state
                .orbs
                .iter()
                .map(|o| OrbView {
                    pos: o.pos,
                    kind: o.kind,
                    age_ms: state.clock.age_of(o.created_at).max(0.0),
                })
                .collect(),
            pulses: state.pulses.iter().map(ring).collect(),
            power_waves: state.power_waves.iter().map(ring).collect(),
            echoes: state
                .echoes
                .iter()
                .map(|e| EchoView {
                    pos: e.pos,
                    age_ms: state.clock.age_of(e.created_at).max(0.0),
                    uses_left: state.tuning.echo_max_uses.saturating_sub(e.used),
                })
                .collect(),
            echo_rings: state
                .echoes
                .iter()
                .enumerate()
                .flat_map(|(i, echo)| {
                    virtual_events_for(echo, i, &state.cast_log, state.tuning.echo_delay_ms)
                })
                .filter(|ring| ring.radius_at(now, &state.tuning).is_some())
                .map(|ring| RingView {
                    pos: ring.center,
                    age_ms: state.clock.age_of(ring.start_at),
                    max_radius: ring.max_radius,
                })
                .collect(),
            timers: PowerTimers {
                power_ms: state.power.remaining_ms(PowerFlag::Power, now),
                freeze_ms: state.power.remaining_ms(PowerFlag::Freeze, now),
                slow_ms: state.power.remaining_ms(PowerFlag::Slow, now),
            },
        }
    }

    /// Serialize for hosts that bridge to a non-Rust renderer
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
