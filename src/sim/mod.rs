//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One tick per frame, one `now` per tick
//! - Seeded RNG only
//! - Stable iteration order (collection order)
//! - No rendering, audio or platform dependencies

pub mod damage;
pub mod energy;
pub mod power;
pub mod ring;
pub mod snapshot;
pub mod spawner;
pub mod state;
pub mod steering;
pub mod tick;

pub use damage::{RingEvent, RingSource, resolve_damage, virtual_events_for};
pub use energy::{absorb_contact, collect_orbs, try_pulse};
pub use power::{PowerFlag, PowerState, PowerTimer};
pub use ring::{circles_touch, ring_hit, ring_radius};
pub use snapshot::RenderSnapshot;
pub use spawner::{SpawnSchedule, enemy_spawn_interval, enemy_speed_range, orb_kind_for_roll};
pub use state::{
    Clock, EchoSource, Enemy, EnemyBehaviorMode, EnergyOrb, GamePhase, OrbKind, Player,
    PowerWaveEvent, PulseEvent, SimulationState,
};
pub use steering::{SteeringModifiers, enemy_velocity};
pub use tick::{TickInput, tick};
