//! Dusk Runner entry point
//!
//! Headless demo run: advances the simulation on a fixed timestep with a
//! simple autopilot on the jump button, applies scene operations to a
//! recording sink, and reports the distance when the run ends.

use std::error::Error;

use dusk_runner::Tuning;
use dusk_runner::assets::StaticCatalog;
use dusk_runner::consts::{DEFAULT_SEED, MAX_SUBSTEPS, SIM_DT};
use dusk_runner::scene::{RecordingSink, SceneSink};
use dusk_runner::sim::{GameEvent, GamePhase, GameState, TickInput, tick};

/// Simulated frame length fed into the accumulator (60 fps host)
const FRAME_DT: f64 = 1.0 / 60.0;
/// Give up after this much simulated time
const MAX_RUN_SECONDS: f64 = 300.0;

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        log::error!("{err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let mut args = std::env::args().skip(1);
    let seed: u32 = match args.next() {
        Some(arg) => arg.parse()?,
        None => DEFAULT_SEED,
    };
    let tuning = match args.next() {
        Some(path) => Tuning::from_json(&std::fs::read_to_string(path)?)?,
        None => Tuning::default(),
    };

    log::info!("Dusk Runner starting, seed {seed}");
    let mut state = GameState::new(seed, &StaticCatalog, tuning)?;
    let mut sink = RecordingSink::default();
    let mut accumulator = 0.0;
    let mut elapsed = 0.0;

    while state.phase != GamePhase::GameOver && elapsed < MAX_RUN_SECONDS {
        accumulator += FRAME_DT;
        elapsed += FRAME_DT;

        let mut substeps = 0;
        while accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            let input = TickInput {
                jump: should_jump(&state),
                ..Default::default()
            };
            tick(&mut state, &input, SIM_DT)?;
            report_events(&state);
            accumulator -= SIM_DT;
            substeps += 1;
        }

        // Don't let wall time pile up while paused
        if state.phase == GamePhase::Paused {
            accumulator = 0.0;
        }

        let ops = state.world.drain_scene_ops();
        sink.apply(&ops);
    }

    let distance = state.distance_travelled();
    println!(
        "run over: {:.1} units in {:.1}s ({} scene ops, {} chunks)",
        distance,
        elapsed,
        sink.ops.len(),
        state.level.chunks.len()
    );
    Ok(())
}

/// Jump when the supporting platform's right edge is about to pass under
/// the player's feet.
fn should_jump(state: &GameState) -> bool {
    if !state.player.is_grounded() {
        return false;
    }
    let x = state.player.position.x;
    let y = state.player.position.y;
    let support = state
        .world
        .platforms
        .iter()
        .find(|p| p.bounds.min.x <= x && x <= p.bounds.max.x && (p.bounds.max.y - y).abs() < 0.3);

    match support {
        Some(platform) => platform.bounds.max.x - x < state.treadmill_speed * 0.4,
        None => false,
    }
}

fn report_events(state: &GameState) {
    for event in &state.events {
        match event {
            GameEvent::GameOver { distance } => {
                log::info!("game over event, distance {distance:.1}");
            }
            GameEvent::ChunkGenerated { platforms } => {
                log::debug!("chunk generated with {platforms} platforms");
            }
            GameEvent::Sound(cue) => log::trace!("sound cue {:?}", cue.key),
            other => log::debug!("{other:?}"),
        }
    }
}
