//! Player physics body and movement state machine
//!
//! A plain data struct - no scene-graph base class. The renderer attaches
//! its own avatar to this body's transform; the physics core stays
//! engine-agnostic. Exactly one of {grounded, jumping, falling} holds at a
//! time, with grounded being the implicit state when both flags are false.

use glam::DVec3;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use crate::consts::{GRAVITY, PLAYER_BOUNDS_CENTER_Y, PLAYER_HALF_EXTENTS};

/// Interval between footstep cues while grounded, seconds
const STEP_INTERVAL: f64 = 1.0 / 3.0;

/// Per-tick integration results the orchestrator turns into cues
#[derive(Debug, Clone, Copy, Default)]
pub struct PlayerStep {
    /// A footstep landed this tick (grounded cadence)
    pub footstep: bool,
}

/// The player's physical state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerBody {
    pub position: DVec3,
    pub velocity: DVec3,
    jumping: bool,
    falling: bool,
    /// Monotone multiplier for the run cycle, coupled to treadmill speed.
    /// Cosmetic, but downstream animation sync depends on it.
    running_anim_speed: f64,
    step_timer: f64,
}

impl Default for PlayerBody {
    fn default() -> Self {
        Self::new()
    }
}

impl PlayerBody {
    pub fn new() -> Self {
        Self {
            position: DVec3::ZERO,
            velocity: DVec3::ZERO,
            jumping: false,
            falling: false,
            running_anim_speed: 1.0,
            // First footstep fires on the first grounded tick
            step_timer: 0.0,
        }
    }

    #[inline]
    pub fn is_jumping(&self) -> bool {
        self.jumping
    }

    #[inline]
    pub fn is_falling(&self) -> bool {
        self.falling
    }

    #[inline]
    pub fn is_grounded(&self) -> bool {
        !self.jumping && !self.falling
    }

    #[inline]
    pub fn running_anim_speed(&self) -> f64 {
        self.running_anim_speed
    }

    /// Apply the jump impulse. Only fires from the grounded state - a
    /// second press mid-air is a no-op. Returns whether it fired.
    pub fn jump(&mut self, impulse: f64) -> bool {
        if self.jumping || self.falling {
            return false;
        }
        self.velocity.y += impulse;
        self.jumping = true;
        true
    }

    /// Land on a surface. Vertical velocity is zeroed unconditionally so it
    /// does not accumulate while standing; the state flags only reset when
    /// the player was actually airborne. Returns whether a landing
    /// transition fired (idempotent from grounded).
    pub fn land(&mut self) -> bool {
        let was_airborne = self.jumping || self.falling;
        if was_airborne {
            self.jumping = false;
            self.falling = false;
        }
        self.velocity.y = 0.0;
        was_airborne
    }

    /// Walked off an edge. Only fires from the grounded state so mid-air
    /// cues do not double-trigger. Returns whether it fired.
    pub fn fall(&mut self) -> bool {
        if self.jumping || self.falling {
            return false;
        }
        self.falling = true;
        true
    }

    /// Integrate one tick. Gravity is applied in every state - including
    /// grounded, where collision resolution zeroes it again next frame.
    pub fn update(&mut self, dt: f64, treadmill_speed: f64) -> PlayerStep {
        self.velocity.y -= GRAVITY * dt;
        self.position += self.velocity * dt;

        self.running_anim_speed += treadmill_speed * dt * 0.0005;

        let mut step = PlayerStep::default();
        if self.is_grounded() {
            self.step_timer -= dt;
            if self.step_timer <= 0.0 {
                step.footstep = true;
                self.step_timer = STEP_INTERVAL;
            }
        }
        step
    }

    /// World-space bounding volume, recomputed from the fixed local box
    /// every query and never persisted
    pub fn world_bounds(&self) -> Aabb {
        let [hx, hy, hz] = PLAYER_HALF_EXTENTS;
        Aabb::from_center_half_extents(
            self.position + DVec3::new(0.0, PLAYER_BOUNDS_CENTER_Y, 0.0),
            DVec3::new(hx, hy, hz),
        )
    }
}
