//! Nebula Runner headless entry point
//!
//! Drives the simulation at 60 Hz with a simple autopilot and prints the
//! final snapshot as JSON. Rendering, audio and real input live in the host
//! front-end; this binary is a smoke driver for the core.
//!
//! Usage: `nebula-runner [seed] [tuning.json]`

use glam::Vec2;

use nebula_runner::consts::FRAME_MS;
use nebula_runner::sim::{RenderSnapshot, SimulationState, TickInput, tick};
use nebula_runner::{EdgeDetector, FeedbackEvent, Tuning};

/// Simulated seconds before the runner gives up waiting for a game over
const MAX_RUN_SECS: f64 = 180.0;

/// Hold the cast button while a threat is this close and energy is banked
const CAST_TRIGGER_DIST: f32 = 110.0;
const FLEE_DIST: f32 = 140.0;

fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let seed = args
        .next()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(0x5EED);
    let tuning = match args.next() {
        Some(path) => Tuning::load(&path).unwrap_or_else(|err| {
            log::warn!("Falling back to default tuning: {err}");
            Tuning::default()
        }),
        None => Tuning::default(),
    };

    log::info!("Nebula Runner (headless) starting, seed {seed}");
    let mut state = SimulationState::new(seed, tuning);
    let mut cast_button = EdgeDetector::new();

    let mut now = 0.0;
    let mut kills = 0u32;
    let mut casts = 0u32;
    let mut shakes = 0u32;
    while now < MAX_RUN_SECS * 1000.0 {
        now += FRAME_MS;
        let (mut input, want_cast) = autopilot(&state);
        input.cast = cast_button.update(want_cast);
        tick(&mut state, &input, now, FRAME_MS);

        for event in state.drain_events() {
            if event.shakes_camera() {
                shakes += 1;
            }
            match event {
                FeedbackEvent::EnemyKilled { .. } => kills += 1,
                FeedbackEvent::CastFired { .. } => casts += 1,
                _ => {}
            }
        }
        if state.is_game_over() {
            break;
        }
    }

    log::info!(
        "Run finished: score {}, {:.1}s survived, {} kills, {} casts, {} camera shakes",
        state.score,
        state.clock.game_time,
        kills,
        casts,
        shakes
    );
    match RenderSnapshot::capture(&state).to_json() {
        Ok(json) => println!("{json}"),
        Err(err) => log::error!("Failed to serialize snapshot: {err}"),
    }
}

/// Steer away from the nearest enemy when it gets close, otherwise head for
/// the nearest orb. Returns the movement input and whether to hold cast.
fn autopilot(state: &SimulationState) -> (TickInput, bool) {
    let player = state.player.pos;
    let nearest_enemy = state
        .enemies
        .iter()
        .map(|e| (e.pos, e.pos.distance(player)))
        .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));
    let nearest_orb = state
        .orbs
        .iter()
        .map(|o| o.pos)
        .min_by(|a, b| {
            a.distance(player)
                .partial_cmp(&b.distance(player))
                .unwrap_or(std::cmp::Ordering::Equal)
        });

    let heading = match (nearest_enemy, nearest_orb) {
        (Some((enemy, dist)), _) if dist < FLEE_DIST => player - enemy,
        (_, Some(orb)) => orb - player,
        _ => Vec2::ZERO,
    };

    let want_cast = state.energy >= 2
        && nearest_enemy.is_some_and(|(_, dist)| dist < CAST_TRIGGER_DIST);

    let input = TickInput {
        up: heading.y < -1.0,
        down: heading.y > 1.0,
        left: heading.x < -1.0,
        right: heading.x > 1.0,
        ..Default::default()
    };
    (input, want_cast)
}
