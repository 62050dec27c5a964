//! Discrete gameplay events for the audio/camera collaborator
//!
//! The simulation queues these during a tick; the host drains them after the
//! tick and turns them into tones, shakes and flashes. Nothing in the sim
//! depends on how (or whether) they are consumed.

use glam::Vec2;
use serde::Serialize;

use crate::sim::{OrbKind, PowerFlag};

/// What delivered a kill
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum KillSource {
    /// A player-cast pulse ring
    Pulse,
    /// An auto-emitted power wave (lightning effect)
    PowerWave,
    /// An echo replaying a pulse
    Echo,
    /// Collateral from an absorbed enemy contact
    Defense,
}

/// Feedback event types
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum FeedbackEvent {
    /// A run (re)started
    Started,
    /// Pulse cast; pitch rises with the energy spent
    CastFired { energy_used: u32, max_radius: f32 },
    /// Cast attempted without enough energy
    CastFailed,
    /// Orb picked up
    OrbCollected { kind: OrbKind },
    /// A timed state switched on (or was refreshed)
    StateActivated(PowerFlag),
    /// A timed state ran out
    StateExpired(PowerFlag),
    /// Enemy destroyed
    EnemyKilled { pos: Vec2, source: KillSource },
    /// New echo anchored at a kill; `index` picks the interval step
    EchoCreated { pos: Vec2, index: usize },
    /// An echo's replayed ring started expanding this tick
    EchoReplay { index: usize },
    /// Echo aged out without spending all of its uses
    EchoExpired { pos: Vec2 },
    /// Enemy contact absorbed by spending energy
    DefenseBurst { energy_used: u32, kills: u32 },
    /// Run ended
    GameOver { score: u64, survival_secs: f32 },
}

impl FeedbackEvent {
    /// Events that warrant a camera shake on the host side
    pub fn shakes_camera(&self) -> bool {
        matches!(
            self,
            FeedbackEvent::CastFired { .. }
                | FeedbackEvent::StateActivated(_)
                | FeedbackEvent::DefenseBurst { .. }
                | FeedbackEvent::GameOver { .. }
        )
    }
}
