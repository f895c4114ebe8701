//! Render collaborator contract
//!
//! The core tells the scene what exists and where; it never queries the
//! scene back for logic decisions - collision uses the core's own
//! bounding-volume math, not renderer hit-testing. Operations are queued
//! during a tick and applied to a [`SceneSink`] afterwards, so the
//! renderer sees one consistent batch per frame.

use glam::DVec3;

/// Stable identifier for an object the core placed in the scene
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectId(pub u32);

/// What kind of object an id refers to, so the sink can pick a mesh
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
    Platform,
    Bird,
    Marker,
}

/// One scene mutation
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SceneOp {
    Add {
        id: ObjectId,
        kind: ObjectKind,
        position: DVec3,
        /// Per-axis scale; platforms stretch a unit box to their extent
        scale: DVec3,
    },
    Remove {
        id: ObjectId,
    },
}

/// Receiver for scene mutations
pub trait SceneSink {
    fn add_object(&mut self, id: ObjectId, kind: ObjectKind, position: DVec3, scale: DVec3);
    fn remove_object(&mut self, id: ObjectId);

    /// Apply a batch of queued operations in order
    fn apply(&mut self, ops: &[SceneOp]) {
        for op in ops {
            match *op {
                SceneOp::Add {
                    id,
                    kind,
                    position,
                    scale,
                } => self.add_object(id, kind, position, scale),
                SceneOp::Remove { id } => self.remove_object(id),
            }
        }
    }
}

/// Sink that records every operation; used by tests and the headless demo
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub ops: Vec<SceneOp>,
}

impl SceneSink for RecordingSink {
    fn add_object(&mut self, id: ObjectId, kind: ObjectKind, position: DVec3, scale: DVec3) {
        self.ops.push(SceneOp::Add {
            id,
            kind,
            position,
            scale,
        });
    }

    fn remove_object(&mut self, id: ObjectId) {
        self.ops.push(SceneOp::Remove { id });
    }
}
