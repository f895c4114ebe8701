//! Asset/audio collaborator contract
//!
//! The core never loads files. It looks clips up by logical key through
//! `AssetCatalog` and emits sound cues as events; the hosting layer owns
//! decoding, mixing and playback. A missing sound is tolerated - the cue is
//! simply skipped. A missing animation clip that the player state machine
//! requests is fatal, since the player can no longer represent its state.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Logical animation clip keys for the player avatar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnimationKey {
    /// Looping run cycle, the default state
    Sprint,
    /// One-shot takeoff
    JumpStart,
    /// Looping airborne cycle
    JumpLoop,
    /// One-shot landing
    JumpEnd,
}

/// Logical sound keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SoundKey {
    /// Footstep variants, one picked per step
    Step(u8),
    /// Jump grunt variants
    Jump(u8),
    /// Landing thud variants
    Land(u8),
    /// Wind loop while airborne
    Air,
    /// Game-over impact
    Splat,
    /// Background loop
    Ambience,
    /// Bird wing flap
    BirdFlap,
}

/// Number of recorded variants per repeating effect
pub const STEP_VARIANTS: u8 = 5;
pub const JUMP_VARIANTS: u8 = 4;
pub const LAND_VARIANTS: u8 = 4;

/// A sound request emitted by the core. `detune` is in cents; birds use it
/// to randomize their flap pitch by up to a semitone either way.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SoundCue {
    pub key: SoundKey,
    pub detune: f32,
}

impl SoundCue {
    pub fn new(key: SoundKey) -> Self {
        Self { key, detune: 0.0 }
    }

    pub fn detuned(key: SoundKey, detune: f32) -> Self {
        Self { key, detune }
    }
}

/// Opaque handle to a loaded animation clip. The core only needs the
/// duration to drive one-shot completion; everything else stays with the
/// collaborator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClipHandle {
    /// Clip length in seconds
    pub duration: f64,
}

/// Opaque handle to a decoded sound buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SoundHandle(pub u32);

/// Lookup by logical key. Absent sounds must not crash the core; absent
/// clips are surfaced as [`AssetError::MissingAnimation`] at the call site
/// that needs them.
pub trait AssetCatalog {
    fn clip(&self, key: AnimationKey) -> Option<ClipHandle>;
    fn sound(&self, key: SoundKey) -> Option<SoundHandle>;
}

/// Catalog backed by fixed clip durations; enough for headless runs and
/// tests. All four player clips are present, no sounds are.
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog;

impl AssetCatalog for StaticCatalog {
    fn clip(&self, key: AnimationKey) -> Option<ClipHandle> {
        let duration = match key {
            AnimationKey::Sprint => 0.7,
            AnimationKey::JumpStart => 0.25,
            AnimationKey::JumpLoop => 0.5,
            AnimationKey::JumpEnd => 0.3,
        };
        Some(ClipHandle { duration })
    }

    fn sound(&self, _key: SoundKey) -> Option<SoundHandle> {
        None
    }
}

/// Asset resolution failures
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AssetError {
    #[error("missing animation clip: {0:?}")]
    MissingAnimation(AnimationKey),
}
