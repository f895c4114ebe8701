//! Dusk Runner - an endless-runner game core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (procedural level, physics, collisions)
//! - `assets`: Asset/audio collaborator contract (animation clips, sound cues)
//! - `scene`: Render collaborator contract (add/remove objects at transforms)
//! - `tuning`: Data-driven game balance

pub mod assets;
pub mod scene;
pub mod sim;
pub mod tuning;

pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (120 Hz for smooth physics)
    pub const SIM_DT: f64 = 1.0 / 120.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Downward acceleration, world units per second squared
    pub const GRAVITY: f64 = 9.81 * 1.5;
    /// Vertical impulse added by a full-power jump
    pub const JUMP_VELOCITY: f64 = 10.0;

    /// Half of the vertical viewport extent, world units. Platforms are
    /// generated within this band and the player dies below it.
    pub const VIEW_SIZE: f64 = 10.0;

    /// Player bounding box: local center height and half-extents
    pub const PLAYER_BOUNDS_CENTER_Y: f64 = 0.9;
    pub const PLAYER_HALF_EXTENTS: [f64; 3] = [0.3, 0.9, 0.3];

    /// Treadmill starts at this speed and accelerates forever
    pub const TREADMILL_START_SPEED: f64 = 8.0;
    /// Treadmill acceleration, units per second squared
    pub const TREADMILL_ACCEL: f64 = 0.1;

    /// Overlaps smaller than this are ignored by the collision resolver
    pub const COLLISION_EPSILON: f64 = 0.01;

    /// Platforms per generated chunk
    pub const CHUNK_PLATFORM_COUNT: usize = 5;
    /// Platform width range
    pub const PLATFORM_WIDTH_MIN: f64 = 6.0;
    pub const PLATFORM_WIDTH_MAX: f64 = 15.0;
    /// How far below its top surface a platform's collision box extends
    pub const PLATFORM_DEPTH: f64 = 25.0;
    /// Platform collision box half-depth along z
    pub const PLATFORM_HALF_Z: f64 = 0.5;

    /// Fraction of the jump impulse the generator budgets for, leaving
    /// leeway so gaps stay clearable with an imperfect jump
    pub const JUMP_LEEWAY_FACTOR: f64 = 0.95;

    /// Default gameplay seed for reproducible runs
    pub const DEFAULT_SEED: u32 = 12_345_678;
}
