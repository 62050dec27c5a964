//! Nebula Runner - A top-down pulse/echo arcade survival game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (steering, power states, pulses, echoes)
//! - `tuning`: Data-driven game balance
//! - `feedback`: Discrete events for the audio/camera collaborator
//! - `input`: Edge detection for one-shot buttons

pub mod feedback;
pub mod input;
pub mod sim;
pub mod tuning;

pub use feedback::FeedbackEvent;
pub use input::EdgeDetector;
pub use tuning::{Tuning, TuningError};

/// Game configuration constants
pub mod consts {
    /// Play field dimensions
    pub const FIELD_WIDTH: f32 = 800.0;
    pub const FIELD_HEIGHT: f32 = 600.0;

    /// Player start position (field center)
    pub const PLAYER_START_X: f32 = FIELD_WIDTH / 2.0;
    pub const PLAYER_START_Y: f32 = FIELD_HEIGHT / 2.0;

    /// Nominal frame length for hosts that drive the sim at 60 Hz
    pub const FRAME_MS: f64 = 1000.0 / 60.0;
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

/// Rotate `current` toward `target` by at most `max_step` radians along the
/// shorter arc. Snaps to the target once it is within reach.
#[inline]
pub fn rotate_toward(current: f32, target: f32, max_step: f32) -> f32 {
    let delta = normalize_angle(target - current);
    if delta.abs() <= max_step {
        normalize_angle(target)
    } else {
        normalize_angle(current + max_step.copysign(delta))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    #[test]
    fn test_rotate_toward_takes_short_way_round() {
        // From just below +π to just above -π is a tiny step across the seam
        let from = PI - 0.1;
        let to = -PI + 0.1;
        let out = rotate_toward(from, to, 0.05);
        assert!(normalize_angle(out - from) > 0.0);
        assert!((normalize_angle(out - from) - 0.05).abs() < 1e-5);
    }

    #[test]
    fn test_rotate_toward_snaps_when_close() {
        assert!((rotate_toward(0.0, 0.1, 0.5) - 0.1).abs() < 1e-6);
    }
}
