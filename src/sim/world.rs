//! Treadmill-space world geometry and decorative actors
//!
//! The level records platforms in absolute (level-space) coordinates; this
//! module owns their world-space counterparts, which the treadmill drags
//! left every tick. Birds and markers are purely decorative: they draw from
//! the cosmetic RNG stream so spawning or skipping them never perturbs the
//! gameplay stream that shapes the level.

use glam::DVec3;
use rand::Rng;
use rand_pcg::Pcg32;

use super::collision::Aabb;
use super::level::Platform;
use crate::assets::{SoundCue, SoundKey};
use crate::consts::{PLATFORM_DEPTH, PLATFORM_HALF_Z};
use crate::scene::{ObjectId, ObjectKind, SceneOp};

/// World x below which a standing bird takes off
const BIRD_STARTLE_X: f64 = 8.0;

/// A platform's collision volume in world space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlatformCollider {
    pub id: ObjectId,
    pub bounds: Aabb,
}

/// Decorative marker that rides the treadmill and spins in place
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Marker {
    pub id: ObjectId,
    pub position: DVec3,
    /// Accumulated y rotation, radians
    pub spin: f64,
}

/// A crow perched on a platform. Stands until the treadmill carries it
/// close to the player, then flies up and away until it leaves the screen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bird {
    pub id: ObjectId,
    pub position: DVec3,
    direction: DVec3,
    speed: f64,
    flying: bool,
    detune: f32,
}

impl Bird {
    #[inline]
    pub fn is_flying(&self) -> bool {
        self.flying
    }
}

/// All world-space objects plus the queue of scene mutations produced
/// while mutating them. Insertion order is the iteration order everywhere.
#[derive(Debug, Clone, Default)]
pub struct World {
    next_id: u32,
    pub platforms: Vec<PlatformCollider>,
    pub markers: Vec<Marker>,
    pub birds: Vec<Bird>,
    scene_ops: Vec<SceneOp>,
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    fn alloc_id(&mut self) -> ObjectId {
        let id = ObjectId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Place a platform's collision volume, shifted by how far the
    /// treadmill has already travelled. The volume extends well below the
    /// top surface so the player cannot tunnel under a ledge.
    pub fn spawn_platform(&mut self, platform: &Platform, travel: f64) -> ObjectId {
        let id = self.alloc_id();
        let x = platform.position - travel;
        let half_w = platform.width * 0.5;

        self.platforms.push(PlatformCollider {
            id,
            bounds: Aabb::new(
                DVec3::new(x - half_w, platform.height - PLATFORM_DEPTH, -PLATFORM_HALF_Z),
                DVec3::new(x + half_w, platform.height, PLATFORM_HALF_Z),
            ),
        });

        // Renderable counterpart: a unit box stretched over the volume,
        // centered halfway down it.
        self.scene_ops.push(SceneOp::Add {
            id,
            kind: ObjectKind::Platform,
            position: DVec3::new(x, platform.height * 0.5 - PLATFORM_DEPTH * 0.5, 0.0),
            scale: DVec3::new(platform.width, platform.height + PLATFORM_DEPTH, 1.0),
        });
        id
    }

    pub fn spawn_marker(&mut self, position: DVec3) -> ObjectId {
        let id = self.alloc_id();
        self.markers.push(Marker {
            id,
            position,
            spin: 0.0,
        });
        self.scene_ops.push(SceneOp::Add {
            id,
            kind: ObjectKind::Marker,
            position,
            scale: DVec3::ONE,
        });
        id
    }

    /// Perch a bird at a world position. Flight direction, speed and flap
    /// pitch all come from the cosmetic stream.
    pub fn spawn_bird(&mut self, position: DVec3, cosmetic: &mut Pcg32) -> ObjectId {
        let id = self.alloc_id();

        let speed = cosmetic.random_range(10.0..14.0);
        let detune = (cosmetic.random::<f32>() * 2.0 - 1.0) * 100.0;
        let sign = (cosmetic.random::<f64>() * 2.0 - 1.0).signum();
        let x_dir = cosmetic.random_range(0.25..0.5) * sign;
        let direction = DVec3::new(x_dir, 0.5, 0.0).normalize();

        self.birds.push(Bird {
            id,
            position,
            direction,
            speed,
            flying: false,
            detune,
        });
        self.scene_ops.push(SceneOp::Add {
            id,
            kind: ObjectKind::Bird,
            position,
            // Negative x scale mirrors the sprite to face flight direction
            scale: DVec3::new(sign, 1.0, 1.0),
        });
        id
    }

    /// Drag everything left with the treadmill. Markers also accrue spin.
    pub fn shift(&mut self, delta: f64, dt: f64) {
        let offset = DVec3::new(-delta, 0.0, 0.0);
        for platform in &mut self.platforms {
            platform.bounds = platform.bounds.translated(offset);
        }
        for marker in &mut self.markers {
            marker.position.x -= delta;
            marker.spin += dt;
        }
        for bird in &mut self.birds {
            bird.position.x -= delta;
        }
    }

    /// Advance bird behavior: startle perched birds near the player, move
    /// airborne ones, and drop any that flew off the top of the screen.
    /// Removal is a retain pass after movement, so indices stay stable
    /// while iterating.
    pub fn update_birds(&mut self, dt: f64, view_size: f64, cues: &mut Vec<SoundCue>) {
        for bird in &mut self.birds {
            if !bird.flying {
                if bird.position.x < BIRD_STARTLE_X {
                    bird.flying = true;
                    cues.push(SoundCue::detuned(SoundKey::BirdFlap, bird.detune));
                }
                // Takes off next tick; no movement on the startle frame
                continue;
            }
            bird.position += bird.direction * (bird.speed * dt);
        }

        let ops = &mut self.scene_ops;
        self.birds.retain(|bird| {
            let keep = bird.position.y < view_size;
            if !keep {
                ops.push(SceneOp::Remove { id: bird.id });
            }
            keep
        });
    }

    /// Take the scene mutations queued since the last drain, in order
    pub fn drain_scene_ops(&mut self) -> Vec<SceneOp> {
        std::mem::take(&mut self.scene_ops)
    }
}
