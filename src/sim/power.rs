//! Timed power states
//!
//! Power, Freeze and Slow are three independent timers, not one exclusive
//! mode. Any combination can be active at once. Picking up the same kind
//! again refreshes the end time to `now + duration`; durations never stack.

use serde::{Deserialize, Serialize};

use super::state::EnemyBehaviorMode;
use crate::tuning::Tuning;

/// One of the three timed states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PowerFlag {
    Power,
    Freeze,
    Slow,
}

impl PowerFlag {
    pub const ALL: [PowerFlag; 3] = [PowerFlag::Power, PowerFlag::Freeze, PowerFlag::Slow];

    pub fn duration_ms(self, tuning: &Tuning) -> f64 {
        match self {
            PowerFlag::Power => tuning.power_duration_ms,
            PowerFlag::Freeze => tuning.freeze_duration_ms,
            PowerFlag::Slow => tuning.slow_duration_ms,
        }
    }
}

/// A boolean flag with an end timestamp
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PowerTimer {
    pub active: bool,
    pub end_at: f64,
}

impl PowerTimer {
    /// Switch on (or refresh) until `now + duration`
    pub fn activate(&mut self, now: f64, duration_ms: f64) {
        self.active = true;
        self.end_at = now + duration_ms;
    }

    /// Switch off once `now` reaches the end time. Returns true on the tick
    /// the timer actually transitions.
    pub fn expire(&mut self, now: f64) -> bool {
        if self.active && now >= self.end_at {
            self.active = false;
            true
        } else {
            false
        }
    }

    /// Time left, never negative
    pub fn remaining_ms(&self, now: f64) -> f64 {
        if self.active {
            (self.end_at - now).max(0.0)
        } else {
            0.0
        }
    }
}

/// The three timers plus the power-wave emission schedule
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PowerState {
    pub power: PowerTimer,
    pub freeze: PowerTimer,
    pub slow: PowerTimer,
    /// Next power-wave emission time (meaningful only while Power is active)
    pub next_wave_at: f64,
}

impl PowerState {
    fn timer(&self, flag: PowerFlag) -> &PowerTimer {
        match flag {
            PowerFlag::Power => &self.power,
            PowerFlag::Freeze => &self.freeze,
            PowerFlag::Slow => &self.slow,
        }
    }

    fn timer_mut(&mut self, flag: PowerFlag) -> &mut PowerTimer {
        match flag {
            PowerFlag::Power => &mut self.power,
            PowerFlag::Freeze => &mut self.freeze,
            PowerFlag::Slow => &mut self.slow,
        }
    }

    pub fn is_active(&self, flag: PowerFlag) -> bool {
        self.timer(flag).active
    }

    pub fn remaining_ms(&self, flag: PowerFlag, now: f64) -> f64 {
        self.timer(flag).remaining_ms(now)
    }

    /// Activate or refresh a state. Power also arms an immediate wave.
    pub fn activate(&mut self, flag: PowerFlag, now: f64, tuning: &Tuning) {
        self.timer_mut(flag).activate(now, flag.duration_ms(tuning));
        if flag == PowerFlag::Power {
            self.next_wave_at = now;
        }
    }

    /// Expire every timer whose end time has passed. At most one transition
    /// per flag per call.
    pub fn expire(&mut self, now: f64) -> Vec<PowerFlag> {
        PowerFlag::ALL
            .into_iter()
            .filter(|&flag| self.timer_mut(flag).expire(now))
            .collect()
    }

    /// True when a power wave is due; advances the schedule by one period
    pub fn poll_wave(&mut self, now: f64, period_ms: f64) -> bool {
        if self.power.active && now >= self.next_wave_at {
            self.next_wave_at = now + period_ms;
            true
        } else {
            false
        }
    }

    /// Steering label with Freeze > Power > Slow precedence
    pub fn behavior_mode(&self) -> EnemyBehaviorMode {
        if self.freeze.active {
            EnemyBehaviorMode::Frozen
        } else if self.power.active {
            EnemyBehaviorMode::Panic
        } else if self.slow.active {
            EnemyBehaviorMode::Slowed
        } else {
            EnemyBehaviorMode::Normal
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timer_active_until_end() {
        let tuning = Tuning::default();
        let mut power = PowerState::default();
        power.activate(PowerFlag::Freeze, 1000.0, &tuning);

        assert!(power.expire(5999.0).is_empty());
        assert!(power.is_active(PowerFlag::Freeze));
        assert_eq!(power.expire(6000.0), vec![PowerFlag::Freeze]);
        assert!(!power.is_active(PowerFlag::Freeze));
        // Already expired: no second transition
        assert!(power.expire(7000.0).is_empty());
    }

    #[test]
    fn test_refresh_does_not_stack() {
        let tuning = Tuning::default();
        let mut power = PowerState::default();
        power.activate(PowerFlag::Slow, 0.0, &tuning);
        power.activate(PowerFlag::Slow, 2000.0, &tuning);
        assert_eq!(power.slow.end_at, 2000.0 + tuning.slow_duration_ms);
    }

    #[test]
    fn test_flags_are_independent() {
        let tuning = Tuning::default();
        let mut power = PowerState::default();
        power.activate(PowerFlag::Power, 0.0, &tuning);
        power.activate(PowerFlag::Freeze, 0.0, &tuning);
        power.activate(PowerFlag::Slow, 0.0, &tuning);

        // Freeze (5s) ends first, the others keep running
        assert_eq!(power.expire(5000.0), vec![PowerFlag::Freeze]);
        assert!(power.is_active(PowerFlag::Power));
        assert!(power.is_active(PowerFlag::Slow));
        assert_eq!(power.expire(7000.0), vec![PowerFlag::Power, PowerFlag::Slow]);
    }

    #[test]
    fn test_wave_schedule() {
        let tuning = Tuning::default();
        let mut power = PowerState::default();
        assert!(!power.poll_wave(0.0, 300.0));

        power.activate(PowerFlag::Power, 100.0, &tuning);
        assert!(power.poll_wave(100.0, 300.0));
        assert!(!power.poll_wave(399.0, 300.0));
        assert!(power.poll_wave(400.0, 300.0));
        assert_eq!(power.next_wave_at, 700.0);
    }

    #[test]
    fn test_behavior_precedence() {
        let tuning = Tuning::default();
        let mut power = PowerState::default();
        assert_eq!(power.behavior_mode(), EnemyBehaviorMode::Normal);
        power.activate(PowerFlag::Slow, 0.0, &tuning);
        assert_eq!(power.behavior_mode(), EnemyBehaviorMode::Slowed);
        power.activate(PowerFlag::Power, 0.0, &tuning);
        assert_eq!(power.behavior_mode(), EnemyBehaviorMode::Panic);
        power.activate(PowerFlag::Freeze, 0.0, &tuning);
        assert_eq!(power.behavior_mode(), EnemyBehaviorMode::Frozen);
    }

    #[test]
    fn test_remaining_is_clamped() {
        let mut timer = PowerTimer::default();
        timer.activate(0.0, 100.0);
        assert_eq!(timer.remaining_ms(250.0), 0.0);
        assert_eq!(timer.remaining_ms(40.0), 60.0);
    }
}
