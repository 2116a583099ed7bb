use glam::Vec3;
use hecs::{Entity, World};
use tracing::trace;

use super::cast::{sphere_cast_collider, sphere_overlap};
use super::{CastHit, PhysicsWorld, RigidBody};
use crate::components::{Collider, LocalTransform, Name, Static};

/// Penetration resolution passes per physics step. A sphere wedged into a
/// floor corner touches up to three faces, one per pass.
const RESOLVE_PASSES: usize = 3;

/// Static level geometry stored as hecs entities, plus engine gravity.
pub struct Level {
    world: World,
    gravity: Vec3,
}

impl Level {
    pub fn new(gravity: Vec3) -> Self {
        Self {
            world: World::new(),
            gravity,
        }
    }

    pub fn gravity(&self) -> Vec3 {
        self.gravity
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    /// Spawn a piece of immovable geometry.
    pub fn spawn_static(&mut self, name: &str, position: Vec3, collider: Collider) -> Entity {
        self.world.spawn((
            Name(name.to_string()),
            LocalTransform::new(position),
            collider,
            Static,
        ))
    }

    /// Infinite floor at `height`.
    pub fn spawn_ground(&mut self, height: f32) -> Entity {
        self.spawn_static(
            "ground",
            Vec3::ZERO,
            Collider::Plane {
                normal: Vec3::Y,
                offset: height,
            },
        )
    }

    pub fn static_count(&self) -> usize {
        self.world.query::<&Static>().iter().count()
    }

    /// Advance a character body by one fixed step: engine gravity,
    /// semi-implicit Euler, then push the character sphere out of any static
    /// geometry and drop the velocity component pointing into it (no bounce).
    ///
    /// The character collider is a sphere of `radius` whose bottom sits at the
    /// body position.
    pub fn step_body<B: RigidBody + ?Sized>(&self, body: &mut B, radius: f32, dt: f32) {
        let mut velocity = body.velocity() + self.gravity * dt;
        let mut center = body.position() + velocity * dt + Vec3::Y * radius;

        for _ in 0..RESOLVE_PASSES {
            let mut clear = true;
            for (entity, (local, collider)) in self
                .world
                .query::<(&LocalTransform, &Collider)>()
                .with::<&Static>()
                .iter()
            {
                if let Some((normal, depth)) =
                    sphere_overlap(center, radius, local.position, collider)
                {
                    trace!(?entity, depth, "body_contact_resolved");
                    center += normal * depth;
                    let into = velocity.dot(normal);
                    if into < 0.0 {
                        velocity -= normal * into;
                    }
                    clear = false;
                }
            }
            if clear {
                break;
            }
        }

        body.set_velocity(velocity);
        body.set_position(center - Vec3::Y * radius);
    }
}

impl PhysicsWorld for Level {
    fn sphere_cast(
        &self,
        origin: Vec3,
        radius: f32,
        direction: Vec3,
        max_distance: f32,
    ) -> Option<CastHit> {
        let mut best: Option<CastHit> = None;

        for (_, (local, collider)) in self
            .world
            .query::<(&LocalTransform, &Collider)>()
            .with::<&Static>()
            .iter()
        {
            let hit = sphere_cast_collider(
                origin,
                radius,
                direction,
                max_distance,
                local.position,
                collider,
            );
            if let Some(hit) = hit {
                let is_closer = best.map_or(true, |b| hit.distance < b.distance);
                if is_closer {
                    best = Some(hit);
                }
            }
        }

        best
    }
}
