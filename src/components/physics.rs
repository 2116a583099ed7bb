use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Collision shape attached to a level entity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum Collider {
    Sphere { radius: f32 },
    /// Axis-aligned box centred on the entity position.
    Box { half_extents: Vec3 },
    /// Infinite plane `dot(p, normal) = offset`; position is ignored.
    Plane { normal: Vec3, offset: f32 },
}

/// Marker: entity is immovable solid geometry that ground probes can hit.
#[derive(Debug, Clone, Copy)]
pub struct Static;
