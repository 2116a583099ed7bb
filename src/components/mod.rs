mod physics;

pub use physics::{Collider, Static};

use glam::Vec3;

/// World-space placement of a level entity. Level geometry never rotates, so
/// boxes stay axis-aligned.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocalTransform {
    pub position: Vec3,
}

impl LocalTransform {
    pub fn new(position: Vec3) -> Self {
        Self { position }
    }
}

/// Human-readable label for logs.
#[derive(Debug, Clone)]
pub struct Name(pub String);
