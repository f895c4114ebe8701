//! Axis-aligned collision detection and response
//!
//! The resolver scans platform volumes in generation order and resolves the
//! first meaningful overlap along the axis of minimum penetration: a
//! shallower vertical overlap means the player ran onto a platform top and
//! lands; otherwise they clipped a platform side and get pushed back.
//! First match wins - scanning stops at the first hit, not the closest one.

use glam::DVec3;
use serde::{Deserialize, Serialize};

use super::player::PlayerBody;
use crate::consts::COLLISION_EPSILON;

/// Axis-aligned box, world space. Derived from positions every tick,
/// never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: DVec3,
    pub max: DVec3,
}

impl Aabb {
    pub fn new(min: DVec3, max: DVec3) -> Self {
        Self { min, max }
    }

    pub fn from_center_half_extents(center: DVec3, half: DVec3) -> Self {
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Shift the box by an offset (treadmill movement)
    pub fn translated(&self, offset: DVec3) -> Self {
        Self {
            min: self.min + offset,
            max: self.max + offset,
        }
    }

    /// Extent of the overlap region with another box. A box that is
    /// disjoint on any axis yields zero extent on every axis.
    pub fn overlap_size(&self, other: &Aabb) -> DVec3 {
        let min = self.min.max(other.min);
        let max = self.max.min(other.max);
        let size = max - min;
        if size.min_element() < 0.0 {
            DVec3::ZERO
        } else {
            size
        }
    }
}

/// What the resolver did to the player this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Resolution {
    /// A landing transition fired (was airborne, now grounded)
    pub landed: bool,
    /// Pushed sideways off a platform face; state unchanged
    pub blocked: bool,
    /// No support found and a falling transition fired
    pub started_falling: bool,
}

/// Resolve the player against all live platform volumes, in insertion
/// order. Applies positional correction and drives the land/fall
/// transitions on the body.
pub fn resolve_player_collisions<'a, I>(player: &mut PlayerBody, platforms: I) -> Resolution
where
    I: IntoIterator<Item = &'a Aabb>,
{
    let player_bounds = player.world_bounds();
    let mut result = Resolution::default();

    for platform in platforms {
        let overlap = player_bounds.overlap_size(platform);

        // Negligible contact - check the rest
        if overlap.length() < COLLISION_EPSILON {
            continue;
        }

        if overlap.y < overlap.x {
            // Shallow vertical overlap: standing on the platform top.
            // Push up and zero the accumulated gravity.
            player.position.y += overlap.y;
            result.landed = player.land();
        } else {
            // Ran into the platform side; pushed back, still airborne or
            // grounded as before.
            player.position.x -= overlap.x;
            result.blocked = true;
        }
        return result;
    }

    result.started_falling = player.fall();
    result
}
