//! Game balance tuning
//!
//! Every gameplay constant lives here so a run can be re-balanced from a JSON
//! file without touching the simulation. Missing fields fall back to the
//! built-in defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading or validating a tuning file
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("failed to read tuning file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse tuning JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid tuning value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Gameplay balance values (distances in px, times in ms unless noted)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Player ===
    /// Movement speed (px/s)
    pub player_speed: f32,
    /// Heading turn rate (rad/s)
    pub player_turn_rate: f32,
    /// Distance the player is kept from the field edges
    pub player_margin: f32,
    /// Player body radius used for enemy contact
    pub player_contact_radius: f32,

    // === Enemies ===
    pub enemy_radius: f32,
    /// Distance the enemies are kept from the field edges
    pub enemy_margin: f32,
    /// How far outside the field new enemies appear
    pub enemy_spawn_offset: f32,
    pub enemy_speed_min: f32,
    pub enemy_speed_max: f32,
    /// Speed added to both bounds per elapsed bracket
    pub enemy_speed_step: f32,
    /// Bracket length in seconds of game time
    pub enemy_speed_bracket_secs: f32,
    pub enemy_interval_start_ms: f64,
    pub enemy_interval_floor_ms: f64,
    /// Interval shrink per second of game time
    pub enemy_interval_decay_ms: f64,
    /// Fraction of the interval used as the lower sampling bound
    pub enemy_interval_jitter_min: f64,
    pub initial_enemy_count: u32,
    pub initial_enemy_delay_ms: f64,

    // === Energy orbs ===
    pub orb_first_spawn_ms: f64,
    pub orb_interval_ms: f64,
    pub orb_interval_jitter_ms: f64,
    pub orb_value: u32,
    pub orb_collect_radius: f32,
    pub orb_safe_min_x: f32,
    pub orb_safe_max_x: f32,
    pub orb_safe_min_y: f32,
    pub orb_safe_max_y: f32,
    pub orb_min_player_distance: f32,
    pub orb_placement_attempts: u32,
    /// Game time (seconds) before special orbs can appear
    pub special_orb_unlock_secs: f32,
    pub power_orb_chance: f32,
    pub freeze_orb_chance: f32,
    pub slow_orb_chance: f32,

    // === Power states ===
    pub power_duration_ms: f64,
    pub power_wave_period_ms: f64,
    /// Added to the pulse base radius for power waves
    pub power_wave_radius_bonus: f32,
    pub power_flee_multiplier: f32,
    pub freeze_duration_ms: f64,
    pub slow_duration_ms: f64,
    pub slow_speed_multiplier: f32,

    // === Pulses & echoes ===
    /// Ring expansion speed (px/s)
    pub pulse_speed: f32,
    pub pulse_thickness: f32,
    pub pulse_base_radius: f32,
    pub pulse_radius_per_energy: f32,
    pub pulse_lifetime_ms: f64,
    pub min_energy_to_cast: u32,
    pub echo_delay_ms: f64,
    pub echo_lifetime_ms: f64,
    pub echo_max_uses: u8,

    // === Economy ===
    pub score_per_kill: u64,
    /// Enemies inside this radius die when a contact is absorbed
    pub defense_radius: f32,
    /// Time constant for the render-only energy readout
    pub visual_energy_smoothing_ms: f64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            player_speed: 240.0,
            player_turn_rate: 6.0,
            player_margin: 10.0,
            player_contact_radius: 5.0,

            enemy_radius: 5.0,
            enemy_margin: 15.0,
            enemy_spawn_offset: 20.0,
            enemy_speed_min: 90.0,
            enemy_speed_max: 130.0,
            enemy_speed_step: 10.0,
            enemy_speed_bracket_secs: 10.0,
            enemy_interval_start_ms: 1100.0,
            enemy_interval_floor_ms: 300.0,
            enemy_interval_decay_ms: 8.0,
            enemy_interval_jitter_min: 0.7,
            initial_enemy_count: 3,
            initial_enemy_delay_ms: 700.0,

            orb_first_spawn_ms: 2000.0,
            orb_interval_ms: 3000.0,
            orb_interval_jitter_ms: 500.0,
            orb_value: 1,
            orb_collect_radius: 15.0,
            orb_safe_min_x: 80.0,
            orb_safe_max_x: 720.0,
            orb_safe_min_y: 100.0,
            orb_safe_max_y: 500.0,
            orb_min_player_distance: 150.0,
            orb_placement_attempts: 10,
            special_orb_unlock_secs: 5.0,
            power_orb_chance: 0.10,
            freeze_orb_chance: 0.10,
            slow_orb_chance: 0.10,

            power_duration_ms: 7000.0,
            power_wave_period_ms: 300.0,
            power_wave_radius_bonus: 260.0,
            power_flee_multiplier: 1.3,
            freeze_duration_ms: 5000.0,
            slow_duration_ms: 6000.0,
            slow_speed_multiplier: 0.4,

            pulse_speed: 350.0,
            pulse_thickness: 4.0,
            pulse_base_radius: 80.0,
            pulse_radius_per_energy: 15.0,
            pulse_lifetime_ms: 400.0,
            min_energy_to_cast: 1,
            echo_delay_ms: 2000.0,
            echo_lifetime_ms: 6000.0,
            echo_max_uses: 3,

            score_per_kill: 10,
            defense_radius: 150.0,
            visual_energy_smoothing_ms: 220.0,
        }
    }
}

impl Tuning {
    /// Parse and validate a tuning document
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load a tuning file from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TuningError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded tuning from {}", path.as_ref().display());
        Ok(tuning)
    }

    /// Serialize to pretty JSON (for writing a starter file)
    pub fn to_json(&self) -> Result<String, TuningError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), TuningError> {
        positive("player_speed", self.player_speed as f64)?;
        positive("player_turn_rate", self.player_turn_rate as f64)?;
        positive("enemy_radius", self.enemy_radius as f64)?;
        positive("enemy_speed_bracket_secs", self.enemy_speed_bracket_secs as f64)?;
        positive("enemy_interval_floor_ms", self.enemy_interval_floor_ms)?;
        positive("orb_interval_ms", self.orb_interval_ms)?;
        positive("power_duration_ms", self.power_duration_ms)?;
        positive("power_wave_period_ms", self.power_wave_period_ms)?;
        positive("freeze_duration_ms", self.freeze_duration_ms)?;
        positive("slow_duration_ms", self.slow_duration_ms)?;
        positive("pulse_speed", self.pulse_speed as f64)?;
        positive("pulse_base_radius", self.pulse_base_radius as f64)?;
        positive("pulse_lifetime_ms", self.pulse_lifetime_ms)?;
        positive("echo_lifetime_ms", self.echo_lifetime_ms)?;

        for (field, value) in [
            ("player_margin", self.player_margin as f64),
            ("enemy_margin", self.enemy_margin as f64),
            ("enemy_spawn_offset", self.enemy_spawn_offset as f64),
            ("enemy_speed_min", self.enemy_speed_min as f64),
            ("enemy_speed_max", self.enemy_speed_max as f64),
            ("enemy_speed_step", self.enemy_speed_step as f64),
            ("enemy_interval_start_ms", self.enemy_interval_start_ms),
            ("enemy_interval_decay_ms", self.enemy_interval_decay_ms),
            ("orb_interval_jitter_ms", self.orb_interval_jitter_ms),
            ("orb_safe_min_x", self.orb_safe_min_x as f64),
            ("orb_safe_max_x", self.orb_safe_max_x as f64),
            ("orb_safe_min_y", self.orb_safe_min_y as f64),
            ("orb_safe_max_y", self.orb_safe_max_y as f64),
        ] {
            non_negative(field, value)?;
        }

        if self.enemy_speed_min > self.enemy_speed_max {
            return Err(TuningError::Invalid {
                field: "enemy_speed_min",
                reason: format!(
                    "{} exceeds enemy_speed_max {}",
                    self.enemy_speed_min, self.enemy_speed_max
                ),
            });
        }
        if self.enemy_interval_floor_ms > self.enemy_interval_start_ms {
            return Err(TuningError::Invalid {
                field: "enemy_interval_floor_ms",
                reason: "floor is above the starting interval".to_string(),
            });
        }
        if !(0.0..=1.0).contains(&self.enemy_interval_jitter_min) {
            return Err(TuningError::Invalid {
                field: "enemy_interval_jitter_min",
                reason: format!("{} is outside [0, 1]", self.enemy_interval_jitter_min),
            });
        }
        if self.orb_safe_min_x > self.orb_safe_max_x || self.orb_safe_min_y > self.orb_safe_max_y {
            return Err(TuningError::Invalid {
                field: "orb_safe_min_x",
                reason: "orb safe rectangle is inverted".to_string(),
            });
        }
        if self.orb_interval_jitter_ms >= self.orb_interval_ms {
            return Err(TuningError::Invalid {
                field: "orb_interval_jitter_ms",
                reason: "jitter must be smaller than the interval".to_string(),
            });
        }
        if self.orb_placement_attempts == 0 {
            return Err(TuningError::Invalid {
                field: "orb_placement_attempts",
                reason: "at least one attempt is required".to_string(),
            });
        }

        for (field, chance) in [
            ("power_orb_chance", self.power_orb_chance),
            ("freeze_orb_chance", self.freeze_orb_chance),
            ("slow_orb_chance", self.slow_orb_chance),
        ] {
            if !(0.0..=1.0).contains(&chance) {
                return Err(TuningError::Invalid {
                    field,
                    reason: format!("{chance} is outside [0, 1]"),
                });
            }
        }
        let total = self.power_orb_chance + self.freeze_orb_chance + self.slow_orb_chance;
        if total > 1.0 {
            return Err(TuningError::Invalid {
                field: "power_orb_chance",
                reason: format!("special orb chances sum to {total}, above 1"),
            });
        }

        if self.min_energy_to_cast == 0 {
            return Err(TuningError::Invalid {
                field: "min_energy_to_cast",
                reason: "a cast must cost at least one energy".to_string(),
            });
        }
        if self.echo_max_uses == 0 {
            return Err(TuningError::Invalid {
                field: "echo_max_uses",
                reason: "echoes need at least one use".to_string(),
            });
        }
        if !(0.0..=1.0).contains(&self.slow_speed_multiplier) {
            return Err(TuningError::Invalid {
                field: "slow_speed_multiplier",
                reason: format!("{} is outside [0, 1]", self.slow_speed_multiplier),
            });
        }
        Ok(())
    }

    /// Maximum radius of a pulse cast with `energy`
    pub fn pulse_max_radius(&self, energy: u32) -> f32 {
        self.pulse_base_radius + energy as f32 * self.pulse_radius_per_energy
    }

    /// Maximum radius of an auto-emitted power wave
    pub fn power_wave_max_radius(&self) -> f32 {
        self.pulse_base_radius + self.power_wave_radius_bonus
    }

    /// How long a cast stays in the log so echoes can replay it
    pub fn echo_replay_horizon_ms(&self) -> f64 {
        self.echo_delay_ms + self.pulse_lifetime_ms
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), TuningError> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(TuningError::Invalid {
            field,
            reason: format!("{value} must be a positive finite number"),
        })
    }
}

fn non_negative(field: &'static str, value: f64) -> Result<(), TuningError> {
    if value >= 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(TuningError::Invalid {
            field,
            reason: format!("{value} must be a non-negative finite number"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(Tuning::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_falls_back_to_defaults() {
        let tuning = Tuning::from_json(r#"{ "player_speed": 300.0 }"#).unwrap();
        assert_eq!(tuning.player_speed, 300.0);
        assert_eq!(tuning.pulse_base_radius, 80.0);
        assert_eq!(tuning.echo_max_uses, 3);
    }

    #[test]
    fn test_rejects_overcommitted_orb_chances() {
        let err = Tuning::from_json(
            r#"{ "power_orb_chance": 0.5, "freeze_orb_chance": 0.4, "slow_orb_chance": 0.3 }"#,
        )
        .unwrap_err();
        assert!(matches!(err, TuningError::Invalid { field: "power_orb_chance", .. }));
    }

    #[test]
    fn test_rejects_nan_and_inverted_ranges() {
        let mut tuning = Tuning::default();
        tuning.enemy_speed_min = f32::NAN;
        assert!(matches!(
            tuning.validate(),
            Err(TuningError::Invalid { field: "enemy_speed_min", .. })
        ));

        let mut tuning = Tuning::default();
        tuning.orb_safe_max_y = f32::INFINITY;
        assert!(tuning.validate().is_err());

        let mut tuning = Tuning::default();
        tuning.orb_safe_min_x = 700.0;
        tuning.orb_safe_max_x = 100.0;
        assert!(matches!(
            tuning.validate(),
            Err(TuningError::Invalid { field: "orb_safe_min_x", .. })
        ));
    }

    #[test]
    fn test_rejects_malformed_json() {
        let err = Tuning::from_json("{ not json").unwrap_err();
        assert!(matches!(err, TuningError::Parse(_)));
    }

    #[test]
    fn test_json_round_trip_preserves_values() {
        let mut tuning = Tuning::default();
        tuning.slow_speed_multiplier = 0.25;
        let json = tuning.to_json().unwrap();
        assert_eq!(Tuning::from_json(&json).unwrap(), tuning);
    }

    #[test]
    fn test_derived_radii() {
        let tuning = Tuning::default();
        assert_eq!(tuning.pulse_max_radius(3), 125.0);
        assert_eq!(tuning.power_wave_max_radius(), 340.0);
        assert_eq!(tuning.echo_replay_horizon_ms(), 2400.0);
    }
}
