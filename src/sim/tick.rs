//! Fixed timestep game loop orchestrator
//!
//! Advances the whole game by one deterministic step. Per-tick order is a
//! contract: treadmill acceleration, world shift, jump input, physics
//! integration, the off-screen check, collision resolution, level
//! extension, then the cosmetic layer (birds, animation). Reordering any
//! of these changes the gameplay RNG stream and breaks replays.

use glam::DVec3;
use log::{debug, info};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use thiserror::Error;

use super::animation::AnimationDriver;
use super::collision::resolve_player_collisions;
use super::level::{Level, LevelError, Platform, PlatformChunk, generate_chunk};
use super::player::PlayerBody;
use super::rng::SeededRng;
use super::world::World;
use crate::assets::{
    AnimationKey, AssetCatalog, AssetError, JUMP_VARIANTS, LAND_VARIANTS, STEP_VARIANTS, SoundCue,
    SoundKey,
};
use crate::consts::PLAYER_HALF_EXTENTS;
use crate::tuning::Tuning;

/// Jump impulse the opening chunk is generated with. Deliberately half the
/// real impulse so the first gaps are trivial while the run spins up.
const OPENING_JUMP_BUDGET: f64 = 5.0;

/// Setup failures when constructing a new run
#[derive(Debug, Error)]
pub enum GameError {
    #[error(transparent)]
    Asset(#[from] AssetError),
    #[error(transparent)]
    Level(#[from] LevelError),
}

/// Top-level run phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    Running,
    Paused,
    GameOver,
}

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Jump (space/tap)
    pub jump: bool,
    /// Pause toggle
    pub pause: bool,
}

/// Things that happened during a tick, for the hosting layer to react to.
/// Cleared at the start of every tick.
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    Jumped,
    Landed,
    StartedFalling,
    /// Play a sound
    Sound(SoundCue),
    Paused,
    Resumed,
    /// The level grew by a chunk
    ChunkGenerated { platforms: usize },
    /// One-shot; the phase latches to [`GamePhase::GameOver`]
    GameOver { distance: f64 },
}

/// Complete game state for one run
#[derive(Debug, Clone)]
pub struct GameState {
    pub phase: GamePhase,
    pub tuning: Tuning,
    /// Gameplay stream; every draw shapes the level
    pub rng: SeededRng,
    /// Cosmetic stream (birds, sound variants); drawing from it never
    /// perturbs the level
    cosmetic: Pcg32,
    pub level: Level,
    pub world: World,
    pub player: PlayerBody,
    pub animation: AnimationDriver,
    pub treadmill_speed: f64,
    pub treadmill_travel: f64,
    pub time_ticks: u64,
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Build a fresh run: the fixed starting platform plus one gently
    /// generated opening chunk, player standing at the origin.
    pub fn new(seed: u32, catalog: &dyn AssetCatalog, tuning: Tuning) -> Result<Self, GameError> {
        let mut rng = SeededRng::new(seed);
        let cosmetic = Pcg32::seed_from_u64(u64::from(seed));

        let start = Platform {
            position: 3.0,
            width: 10.0,
            height: 0.0,
        };
        let mut level = Level::new();
        level.push_chunk(PlatformChunk {
            median_position: start.position,
            platforms: vec![start],
        });

        let mut world = World::new();
        world.spawn_platform(&start, 0.0);

        let opening = generate_chunk(
            &level,
            &mut rng,
            tuning.treadmill_start_speed,
            tuning.view_size,
            OPENING_JUMP_BUDGET,
            tuning.chunk_platform_count,
        )?;
        for platform in &opening.platforms {
            world.spawn_platform(platform, 0.0);
        }
        level.push_chunk(opening);

        let animation = AnimationDriver::new(catalog)?;

        Ok(Self {
            phase: GamePhase::Running,
            treadmill_speed: tuning.treadmill_start_speed,
            tuning,
            rng,
            cosmetic,
            level,
            world,
            player: PlayerBody::new(),
            animation,
            treadmill_travel: 0.0,
            time_ticks: 0,
            events: Vec::new(),
        })
    }

    /// How far the run has come, net of the player lagging behind origin
    pub fn distance_travelled(&self) -> f64 {
        self.treadmill_travel - self.player.position.x.abs()
    }
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f64) -> Result<(), LevelError> {
    state.events.clear();

    // Handle pause toggle
    if input.pause {
        match state.phase {
            GamePhase::Running => {
                state.phase = GamePhase::Paused;
                state.events.push(GameEvent::Paused);
                return Ok(());
            }
            GamePhase::Paused => {
                state.phase = GamePhase::Running;
                state.events.push(GameEvent::Resumed);
                // The background loop restarts with the run
                state
                    .events
                    .push(GameEvent::Sound(SoundCue::new(SoundKey::Ambience)));
            }
            GamePhase::GameOver => {}
        }
    }

    // Don't tick if paused or game over
    match state.phase {
        GamePhase::Paused | GamePhase::GameOver => return Ok(()),
        GamePhase::Running => {}
    }

    state.time_ticks += 1;

    // Background loop starts with the first running tick (a resume in the
    // same tick already queued it)
    if state.time_ticks == 1 && !state.events.contains(&GameEvent::Resumed) {
        state
            .events
            .push(GameEvent::Sound(SoundCue::new(SoundKey::Ambience)));
    }

    // Treadmill is always speeding up
    state.treadmill_speed += dt * state.tuning.treadmill_accel;
    let movement = state.treadmill_speed * dt;
    state.world.shift(movement, dt);
    state.treadmill_travel += movement;

    if input.jump && state.player.jump(state.tuning.jump_velocity) {
        state.events.push(GameEvent::Jumped);
        state.animation.play(AnimationKey::JumpStart);
        let variant = state.cosmetic.random_range(0..JUMP_VARIANTS);
        state
            .events
            .push(GameEvent::Sound(SoundCue::new(SoundKey::Jump(variant))));
    }

    let step = state.player.update(dt, state.treadmill_speed);
    if step.footstep {
        let variant = state.cosmetic.random_range(0..STEP_VARIANTS);
        state
            .events
            .push(GameEvent::Sound(SoundCue::new(SoundKey::Step(variant))));
    }

    // Fully below the bottom of the screen: the run is over. Latches the
    // phase so the side effects fire exactly once.
    if state.player.position.y + PLAYER_HALF_EXTENTS[1] * 2.0 < -state.tuning.view_size {
        let distance = state.distance_travelled();
        state.phase = GamePhase::GameOver;
        state
            .events
            .push(GameEvent::Sound(SoundCue::new(SoundKey::Splat)));
        state.events.push(GameEvent::GameOver { distance });
        info!("game over after {distance:.1} units");
        return Ok(());
    }

    let resolution = resolve_player_collisions(
        &mut state.player,
        state.world.platforms.iter().map(|p| &p.bounds),
    );
    if resolution.landed {
        state.events.push(GameEvent::Landed);
        state.animation.play(AnimationKey::JumpEnd);
        let variant = state.cosmetic.random_range(0..LAND_VARIANTS);
        state
            .events
            .push(GameEvent::Sound(SoundCue::new(SoundKey::Land(variant))));
    }
    if resolution.started_falling {
        state.events.push(GameEvent::StartedFalling);
        state.animation.play(AnimationKey::JumpLoop);
        state
            .events
            .push(GameEvent::Sound(SoundCue::new(SoundKey::Air)));
    }

    extend_level(state)?;

    let mut cues = Vec::new();
    state
        .world
        .update_birds(dt, state.tuning.view_size, &mut cues);
    for cue in cues {
        state.events.push(GameEvent::Sound(cue));
    }

    state.animation.update(dt, state.player.running_anim_speed());
    state.animation.finish_transitions(state.player.is_jumping());

    Ok(())
}

/// Grow the level once the treadmill has carried the player past the last
/// chunk's median position. New platforms spawn world colliders shifted by
/// the current travel, and some of them get a flock perched on top.
fn extend_level(state: &mut GameState) -> Result<(), LevelError> {
    let last_median = state
        .level
        .last_median()
        .ok_or(LevelError::MalformedLevel)?;
    if last_median > state.treadmill_travel {
        return Ok(());
    }

    let chunk = generate_chunk(
        &state.level,
        &mut state.rng,
        state.treadmill_speed,
        state.tuning.view_size,
        state.tuning.jump_velocity * state.tuning.jump_leeway_factor,
        state.tuning.chunk_platform_count,
    )?;

    for platform in &chunk.platforms {
        state.world.spawn_platform(platform, state.treadmill_travel);

        // A fall-budget overdraw in the solver leaves non-finite
        // positions; those platforms get no flock, since the placement
        // range is undefined. Finite platforms keep the cosmetic draw
        // order unchanged.
        if !platform.position.is_finite() {
            continue;
        }
        if state.cosmetic.random::<f64>() <= state.tuning.bird_chance {
            let amount: u32 = state.cosmetic.random_range(1..=3);
            let spread = platform.width * 0.45;
            for _ in 0..amount {
                let x = state
                    .cosmetic
                    .random_range(platform.position - spread..platform.position + spread)
                    - state.treadmill_travel;
                state
                    .world
                    .spawn_bird(DVec3::new(x, platform.height, 0.0), &mut state.cosmetic);
            }
        }
    }

    debug!(
        "level extended: {} platforms past travel {:.1}",
        chunk.platforms.len(),
        state.treadmill_travel
    );
    state.events.push(GameEvent::ChunkGenerated {
        platforms: chunk.platforms.len(),
    });
    state.level.push_chunk(chunk);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::StaticCatalog;
    use crate::consts::SIM_DT;

    fn new_state(seed: u32) -> GameState {
        GameState::new(seed, &StaticCatalog, Tuning::default()).unwrap()
    }

    fn has_game_over(events: &[GameEvent]) -> bool {
        events
            .iter()
            .any(|e| matches!(e, GameEvent::GameOver { .. }))
    }

    #[test]
    fn test_initial_layout() {
        let state = new_state(12_345_678);
        assert_eq!(state.phase, GamePhase::Running);
        // Starting platform plus one pre-generated chunk.
        assert_eq!(state.level.chunks.len(), 2);
        assert_eq!(state.world.platforms.len(), 6);
        assert_eq!(state.treadmill_speed, 8.0);
        assert!(state.player.is_grounded());
    }

    #[test]
    fn test_tick_pause() {
        let mut state = new_state(12345);
        let pause = TickInput {
            pause: true,
            ..Default::default()
        };

        tick(&mut state, &pause, SIM_DT).unwrap();
        assert_eq!(state.phase, GamePhase::Paused);
        assert!(state.events.contains(&GameEvent::Paused));

        // Paused ticks freeze the world.
        let travel = state.treadmill_travel;
        tick(&mut state, &TickInput::default(), SIM_DT).unwrap();
        assert_eq!(state.treadmill_travel, travel);

        // Unpause resumes in the same tick.
        tick(&mut state, &pause, SIM_DT).unwrap();
        assert_eq!(state.phase, GamePhase::Running);
        assert!(state.events.contains(&GameEvent::Resumed));
        assert!(state.treadmill_travel > travel);
    }

    #[test]
    fn test_first_grounded_tick_emits_footstep() {
        let mut state = new_state(1);
        tick(&mut state, &TickInput::default(), SIM_DT).unwrap();
        assert!(state.events.iter().any(|e| matches!(
            e,
            GameEvent::Sound(SoundCue {
                key: SoundKey::Step(_),
                ..
            })
        )));
    }

    #[test]
    fn test_jump_fires_cue_and_animation() {
        let mut state = new_state(1);
        let input = TickInput {
            jump: true,
            ..Default::default()
        };
        tick(&mut state, &input, SIM_DT).unwrap();

        assert!(state.events.contains(&GameEvent::Jumped));
        assert_eq!(state.animation.current(), AnimationKey::JumpStart);
        assert!(state.player.is_jumping());

        // Held jump does not re-trigger mid-air.
        tick(&mut state, &input, SIM_DT).unwrap();
        assert!(!state.events.contains(&GameEvent::Jumped));
    }

    #[test]
    fn test_landing_plays_jump_end() {
        let mut state = new_state(1);
        // Airborne just above the starting platform, moving down.
        state.player.jump(state.tuning.jump_velocity);
        state.player.velocity.y = 0.0;

        tick(&mut state, &TickInput::default(), SIM_DT).unwrap();

        assert!(state.events.contains(&GameEvent::Landed));
        assert!(state.player.is_grounded());
        assert_eq!(state.animation.current(), AnimationKey::JumpEnd);
        assert!(state.events.iter().any(|e| matches!(
            e,
            GameEvent::Sound(SoundCue {
                key: SoundKey::Land(_),
                ..
            })
        )));
    }

    #[test]
    fn test_game_over_latches_once() {
        let mut state = new_state(1);
        state.player.position.y = -30.0;

        tick(&mut state, &TickInput::default(), SIM_DT).unwrap();
        assert_eq!(state.phase, GamePhase::GameOver);
        assert!(has_game_over(&state.events));
        assert!(state.events.iter().any(|e| matches!(
            e,
            GameEvent::Sound(SoundCue {
                key: SoundKey::Splat,
                ..
            })
        )));

        // Every later tick is inert, and pause cannot revive the run.
        let travel = state.treadmill_travel;
        tick(&mut state, &TickInput::default(), SIM_DT).unwrap();
        assert!(state.events.is_empty());
        assert_eq!(state.treadmill_travel, travel);

        let pause = TickInput {
            pause: true,
            ..Default::default()
        };
        tick(&mut state, &pause, SIM_DT).unwrap();
        assert_eq!(state.phase, GamePhase::GameOver);
        assert!(state.events.is_empty());
    }

    #[test]
    fn test_level_extends_past_median() {
        let mut state = new_state(12_345_678);
        // Teleport the treadmill past the opening chunk's median.
        state.treadmill_travel = state.level.last_median().unwrap();

        tick(&mut state, &TickInput::default(), SIM_DT).unwrap();

        assert_eq!(state.level.chunks.len(), 3);
        assert!(state.events.iter().any(|e| matches!(
            e,
            GameEvent::ChunkGenerated { platforms: 5 }
        )));
        assert!(state.world.platforms.len() > 6);
    }

    #[test]
    fn test_extension_tolerates_non_finite_geometry() {
        // A fall-budget overdraw upstream can leave the level's last
        // platform with a NaN position. Extension must keep generating
        // without panicking, and non-finite platforms get no birds.
        let mut state = new_state(1);
        state.level.push_chunk(PlatformChunk {
            median_position: 0.0,
            platforms: vec![Platform {
                position: f64::NAN,
                width: 10.0,
                height: 0.0,
            }],
        });

        tick(&mut state, &TickInput::default(), SIM_DT).unwrap();

        let last = state.level.chunks.last().unwrap();
        assert!(last.platforms.iter().all(|p| p.position.is_nan()));
        assert!(state.world.birds.is_empty());
    }

    #[test]
    fn test_ambience_starts_and_restarts_on_resume() {
        let ambience = GameEvent::Sound(SoundCue::new(SoundKey::Ambience));
        let mut state = new_state(1);

        tick(&mut state, &TickInput::default(), SIM_DT).unwrap();
        assert!(state.events.contains(&ambience));
        tick(&mut state, &TickInput::default(), SIM_DT).unwrap();
        assert!(!state.events.contains(&ambience));

        let pause = TickInput {
            pause: true,
            ..Default::default()
        };
        tick(&mut state, &pause, SIM_DT).unwrap();
        assert!(!state.events.contains(&ambience));
        tick(&mut state, &pause, SIM_DT).unwrap();
        assert!(state.events.contains(&ambience));
    }

    #[test]
    fn test_determinism() {
        // Two runs with the same seed and inputs stay bit-identical.
        let mut a = new_state(99_999);
        let mut b = new_state(99_999);

        for i in 0..1200u32 {
            let input = TickInput {
                jump: i % 90 == 0,
                ..Default::default()
            };
            tick(&mut a, &input, SIM_DT).unwrap();
            tick(&mut b, &input, SIM_DT).unwrap();
        }

        assert_eq!(a.time_ticks, b.time_ticks);
        assert_eq!(a.phase, b.phase);
        assert_eq!(
            a.player.position.x.to_bits(),
            b.player.position.x.to_bits()
        );
        assert_eq!(
            a.player.position.y.to_bits(),
            b.player.position.y.to_bits()
        );
        assert_eq!(a.treadmill_travel.to_bits(), b.treadmill_travel.to_bits());
        assert_eq!(a.level.chunks.len(), b.level.chunks.len());
        assert_eq!(a.world.birds.len(), b.world.birds.len());
    }

    #[test]
    fn test_gameplay_stream_untouched_by_cosmetics() {
        // Bird-heavy and bird-free runs draw identical level geometry.
        let mut with_birds = new_state(777);
        let mut without = GameState::new(
            777,
            &StaticCatalog,
            Tuning {
                bird_chance: 0.0,
                ..Default::default()
            },
        )
        .unwrap();

        for state in [&mut with_birds, &mut without] {
            state.treadmill_travel = state.level.last_median().unwrap();
            tick(state, &TickInput::default(), SIM_DT).unwrap();
        }

        let a = &with_birds.level.chunks[2];
        let b = &without.level.chunks[2];
        // Bitwise: this seed's chunk contains non-finite positions, which
        // are deterministic but not equal to themselves.
        assert_eq!(a.platforms.len(), b.platforms.len());
        for (pa, pb) in a.platforms.iter().zip(&b.platforms) {
            assert_eq!(pa.position.to_bits(), pb.position.to_bits());
            assert_eq!(pa.height.to_bits(), pb.height.to_bits());
        }
    }
}
