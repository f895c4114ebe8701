//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only (one stream for gameplay, one for cosmetics)
//! - Stable iteration order (insertion order everywhere)
//! - No rendering or platform dependencies

pub mod animation;
pub mod collision;
pub mod level;
pub mod player;
pub mod reach;
pub mod rng;
pub mod tick;
pub mod world;

pub use animation::AnimationDriver;
pub use collision::{Aabb, resolve_player_collisions};
pub use level::{Level, LevelError, Platform, PlatformChunk, generate_chunk};
pub use player::PlayerBody;
pub use reach::{JumpArc, horizontal_reach};
pub use rng::SeededRng;
pub use tick::{GameError, GameEvent, GamePhase, GameState, TickInput, tick};
pub use world::{Bird, Marker, PlatformCollider, World};
