//! Physics collaborators consumed by the controller.
//!
//! The controller only ever talks to [`PhysicsWorld`] (ground probe) and
//! [`RigidBody`] (velocity and facing). [`Level`] and [`SimBody`] are the
//! in-crate implementations used by the headless host and the tests.

mod body;
mod cast;
mod level;

pub use body::SimBody;
pub use cast::sphere_cast_collider;
pub use level::Level;

use glam::{Quat, Vec3};

/// Result of a successful shape cast.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CastHit {
    /// Distance travelled along the cast direction before contact.
    pub distance: f32,
    /// Contact point on the hit surface.
    pub point: Vec3,
    /// Surface normal at the contact, pointing away from the hit geometry.
    pub normal: Vec3,
}

/// Static/solid geometry the ground probe is cast against.
pub trait PhysicsWorld {
    /// Sweep a sphere of `radius` from `origin` along `direction` up to
    /// `max_distance`. Geometry already overlapping the sphere at `origin`
    /// counts as a hit at distance zero.
    fn sphere_cast(
        &self,
        origin: Vec3,
        radius: f32,
        direction: Vec3,
        max_distance: f32,
    ) -> Option<CastHit>;
}

/// Velocity-settable rigid body driven by the controller.
pub trait RigidBody {
    /// Feet position (bottom of the character collider).
    fn position(&self) -> Vec3;
    fn set_position(&mut self, position: Vec3);
    fn velocity(&self) -> Vec3;
    fn set_velocity(&mut self, velocity: Vec3);
    fn rotation(&self) -> Quat;
    fn set_rotation(&mut self, rotation: Quat);

    /// Instantaneous change of momentum.
    fn apply_impulse(&mut self, impulse: Vec3);

    /// Mass-independent acceleration integrated over `dt`.
    fn apply_acceleration(&mut self, acceleration: Vec3, dt: f32) {
        let velocity = self.velocity();
        self.set_velocity(velocity + acceleration * dt);
    }
}
