use glam::{Quat, Vec3};

use super::RigidBody;

/// Plain rigid body integrated by [`Level::step_body`](super::Level::step_body).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimBody {
    pub position: Vec3,
    pub velocity: Vec3,
    pub rotation: Quat,
    /// Kilograms. Non-positive mass is treated as 1.
    pub mass: f32,
}

impl SimBody {
    pub fn new(position: Vec3, mass: f32) -> Self {
        Self {
            position,
            velocity: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            mass,
        }
    }

    fn effective_mass(&self) -> f32 {
        if self.mass > 0.0 {
            self.mass
        } else {
            1.0
        }
    }
}

impl RigidBody for SimBody {
    fn position(&self) -> Vec3 {
        self.position
    }

    fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    fn velocity(&self) -> Vec3 {
        self.velocity
    }

    fn set_velocity(&mut self, velocity: Vec3) {
        self.velocity = velocity;
    }

    fn rotation(&self) -> Quat {
        self.rotation
    }

    fn set_rotation(&mut self, rotation: Quat) {
        self.rotation = rotation;
    }

    fn apply_impulse(&mut self, impulse: Vec3) {
        self.velocity += impulse / self.effective_mass();
    }
}
