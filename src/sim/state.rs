//! Game state and core simulation types
//!
//! `SimulationState` is the single owner of everything that changes during a
//! run. Each subsystem receives it by `&mut` for its part of the tick and
//! keeps no state of its own.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::power::PowerState;
use super::spawner::{self, SpawnSchedule};
use crate::consts::*;
use crate::feedback::FeedbackEvent;
use crate::tuning::Tuning;

/// Top-level run state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Running,
    /// Player touched an enemy with no energy left; waiting for restart
    GameOver,
}

/// Energy orb variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrbKind {
    /// Adds castable energy
    Normal,
    /// Enemies flee and power waves fire from the player
    Power,
    /// Enemies stop moving
    Freeze,
    /// Enemies move at reduced speed
    Slow,
}

impl OrbKind {
    /// Energy granted on pickup
    pub fn value(self, tuning: &Tuning) -> u32 {
        match self {
            OrbKind::Normal => tuning.orb_value,
            OrbKind::Power | OrbKind::Freeze | OrbKind::Slow => 0,
        }
    }
}

/// How enemies are currently steering (renderer label)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyBehaviorMode {
    Normal,
    Slowed,
    /// Fleeing the powered-up player
    Panic,
    Frozen,
}

/// Simulation clock, sampled once per tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Clock {
    /// Host timestamp of the current tick (ms)
    pub now_ms: f64,
    /// Elapsed ms since the previous tick
    pub dt_ms: f64,
    /// Seconds of Running time since the last (re)start
    pub game_time: f32,
}

impl Clock {
    /// Advance to a new tick. Negative deltas are treated as zero.
    pub fn advance(&mut self, now_ms: f64, dt_ms: f64) {
        let dt_ms = dt_ms.max(0.0);
        self.now_ms = now_ms;
        self.dt_ms = dt_ms;
        self.game_time += (dt_ms / 1000.0) as f32;
    }

    /// Delta in seconds
    pub fn dt_secs(&self) -> f32 {
        (self.dt_ms / 1000.0) as f32
    }

    /// Age of a timestamp relative to now (may be negative)
    pub fn age_of(&self, timestamp_ms: f64) -> f64 {
        self.now_ms - timestamp_ms
    }
}

/// The player's ship
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    /// Heading (radians), turns toward the input direction
    pub angle: f32,
    /// Movement speed (px/s)
    pub speed: f32,
}

impl Player {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            pos: Vec2::new(PLAYER_START_X, PLAYER_START_Y),
            angle: 0.0,
            speed: tuning.player_speed,
        }
    }
}

/// A pursuing enemy
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    pub pos: Vec2,
    pub radius: f32,
    pub vel: Vec2,
    /// Base speed sampled at spawn time
    pub speed: f32,
}

/// A collectible energy orb
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnergyOrb {
    pub id: u32,
    pub pos: Vec2,
    pub kind: OrbKind,
    pub value: u32,
    pub created_at: f64,
}

/// An expanding ring anchored at a position and time. Never mutated after
/// creation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PulseEvent {
    pub origin: Vec2,
    pub cast_at: f64,
    pub max_radius: f32,
}

/// Power waves share the pulse shape; only their origin and radius differ
pub type PowerWaveEvent = PulseEvent;

/// A kill site that replays recent casts at its own position
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EchoSource {
    pub id: u32,
    pub pos: Vec2,
    pub created_at: f64,
    /// Kills delivered so far (never exceeds the tuning's max uses)
    pub used: u8,
}

/// Complete simulation state
#[derive(Debug, Clone)]
pub struct SimulationState {
    /// Run seed; restart reseeds from it
    pub seed: u64,
    pub tuning: Tuning,
    pub(crate) rng: Pcg32,
    pub phase: GamePhase,
    pub clock: Clock,

    pub score: u64,
    /// Castable energy (gameplay)
    pub energy: u32,
    /// Smoothed energy readout (render only)
    pub visual_energy: f32,
    /// Largest single cast so far
    pub max_energy_used: u32,

    pub player: Player,
    pub enemies: Vec<Enemy>,
    pub orbs: Vec<EnergyOrb>,
    /// Live pulse rings
    pub pulses: Vec<PulseEvent>,
    /// Recent casts kept around for echo replays
    pub cast_log: Vec<PulseEvent>,
    pub power_waves: Vec<PowerWaveEvent>,
    pub echoes: Vec<EchoSource>,

    pub power: PowerState,
    pub spawner: SpawnSchedule,

    /// Feedback queued this tick, drained by the host
    pub events: Vec<FeedbackEvent>,
    next_id: u32,
}

impl SimulationState {
    /// Create a new run with the given seed and balance. A tuning that fails
    /// validation is replaced by the defaults.
    pub fn new(seed: u64, tuning: Tuning) -> Self {
        let tuning = match tuning.validate() {
            Ok(()) => tuning,
            Err(err) => {
                log::warn!("Rejected tuning ({err}), using defaults");
                Tuning::default()
            }
        };
        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::Running,
            clock: Clock::default(),
            score: 0,
            energy: 0,
            visual_energy: 0.0,
            max_energy_used: 0,
            player: Player::new(&tuning),
            enemies: Vec::new(),
            orbs: Vec::new(),
            pulses: Vec::new(),
            cast_log: Vec::new(),
            power_waves: Vec::new(),
            echoes: Vec::new(),
            power: PowerState::default(),
            spawner: SpawnSchedule::new(&tuning),
            events: Vec::new(),
            next_id: 1,
            tuning,
        };
        state.restart();
        state
    }

    /// New run with the built-in balance
    pub fn with_seed(seed: u64) -> Self {
        Self::new(seed, Tuning::default())
    }

    /// Reset every collection, timer, flag and counter, then spawn the
    /// opening population. Completes within one call, so no tick or render
    /// can observe a half-reset state.
    pub fn restart(&mut self) {
        self.rng = Pcg32::seed_from_u64(self.seed);
        self.phase = GamePhase::Running;
        self.clock.game_time = 0.0;
        self.clock.dt_ms = 0.0;
        self.score = 0;
        self.energy = 0;
        self.visual_energy = 0.0;
        self.max_energy_used = 0;
        self.player = Player::new(&self.tuning);
        self.enemies.clear();
        self.orbs.clear();
        self.pulses.clear();
        self.cast_log.clear();
        self.power_waves.clear();
        self.echoes.clear();
        self.power = PowerState::default();
        self.spawner = SpawnSchedule::new(&self.tuning);
        self.events.clear();
        self.next_id = 1;

        for _ in 0..self.tuning.initial_enemy_count {
            spawner::spawn_enemy(self);
        }
        spawner::spawn_energy_orb(self);

        self.events.push(FeedbackEvent::Started);
        log::info!("Run started (seed {})", self.seed);
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn now(&self) -> f64 {
        self.clock.now_ms
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    /// Difficulty bracket shown on the HUD
    pub fn difficulty_level(&self) -> u32 {
        (self.clock.game_time / self.tuning.enemy_speed_bracket_secs).floor() as u32
    }

    /// Current enemy steering label
    pub fn behavior_mode(&self) -> EnemyBehaviorMode {
        self.power.behavior_mode()
    }

    /// Take the feedback queued since the last drain
    pub fn drain_events(&mut self) -> Vec<FeedbackEvent> {
        std::mem::take(&mut self.events)
    }

    /// Anchor a new echo at a kill site
    pub fn make_echo(&mut self, pos: Vec2) {
        let id = self.next_entity_id();
        self.echoes.push(EchoSource {
            id,
            pos,
            created_at: self.clock.now_ms,
            used: 0,
        });
        self.events.push(FeedbackEvent::EchoCreated {
            pos,
            index: self.echoes.len(),
        });
    }
}
