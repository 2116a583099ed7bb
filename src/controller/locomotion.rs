use glam::{Quat, Vec2, Vec3};
use tracing::warn;

use super::ground::GroundState;
use super::jump::JumpOutcome;
use crate::config::ControllerConfig;
use crate::engine::input::MovementIntent;
use crate::physics::RigidBody;

/// What locomotion wrote to the body this tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocomotionOutput {
    pub velocity: Vec3,
    pub rotation: Quat,
}

/// Turns movement intent and jump outcomes into body velocity and facing.
/// Runs inside the fixed physics tick, only in `Normal` mode.
#[derive(Debug, Clone)]
pub struct LocomotionController {
    move_speed: f32,
    rotation_speed: f32,
    air_control_factor: f32,
    rotation_deadzone: f32,
    jump_force: f32,
    extra_gravity: Vec3,
}

impl LocomotionController {
    pub fn new(config: &ControllerConfig) -> Self {
        Self {
            move_speed: config.move_speed,
            rotation_speed: config.rotation_speed,
            air_control_factor: config.air_control_factor,
            rotation_deadzone: config.rotation_deadzone,
            jump_force: config.jump_force,
            extra_gravity: config.gravity * config.gravity_multiplier,
        }
    }

    /// Target planar velocity for `intent`. Direction only: any non-zero
    /// intent moves at full speed, scaled down in the air.
    pub fn planar_velocity(&self, intent: MovementIntent, grounded: bool) -> Vec3 {
        let dir = intent.vector().normalize_or_zero();
        let mut planar = Vec3::new(dir.x, 0.0, dir.y) * self.move_speed;
        if !grounded {
            planar *= self.air_control_factor;
        }
        planar
    }

    pub fn tick<B>(
        &self,
        dt: f32,
        intent: MovementIntent,
        ground: GroundState,
        jump: JumpOutcome,
        body: &mut B,
    ) -> LocomotionOutput
    where
        B: RigidBody + ?Sized,
    {
        let fired = jump == JumpOutcome::Fired;
        let planar = self.planar_velocity(intent, ground.is_grounded);

        let mut velocity = body.velocity();
        velocity.x = planar.x;
        velocity.z = planar.z;
        if fired {
            velocity.y = 0.0;
        }
        if !velocity.is_finite() {
            warn!(?velocity, "locomotion_velocity_not_finite");
            velocity = Vec3::ZERO;
        }
        body.set_velocity(velocity);
        if fired {
            body.apply_impulse(Vec3::Y * self.jump_force);
        } else if !ground.is_grounded {
            body.apply_acceleration(self.extra_gravity, dt);
        }

        // Facing ignores air control: only translation is attenuated in the air.
        if intent.magnitude() > self.rotation_deadzone {
            let rotation = face_towards(body.rotation(), intent.vector(), self.rotation_speed, dt);
            body.set_rotation(rotation);
        }

        LocomotionOutput {
            velocity: body.velocity(),
            rotation: body.rotation(),
        }
    }
}

/// Yaw that makes +Z face along the planar direction `(x, z)`.
pub fn facing_yaw(direction: Vec2) -> Quat {
    Quat::from_rotation_y(direction.x.atan2(direction.y))
}

/// Slerp `current` toward the facing of `direction` by `speed * dt`.
pub fn face_towards(current: Quat, direction: Vec2, speed: f32, dt: f32) -> Quat {
    if direction.length_squared() <= f32::EPSILON {
        return current;
    }
    let t = (speed * dt).clamp(0.0, 1.0);
    current.slerp(facing_yaw(direction), t).normalize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::SimBody;

    const DT: f32 = 0.02;

    fn grounded() -> GroundState {
        GroundState {
            is_grounded: true,
            coyote_remaining: 0.1,
        }
    }

    fn airborne() -> GroundState {
        GroundState::default()
    }

    fn locomotion() -> LocomotionController {
        LocomotionController::new(&ControllerConfig::default())
    }

    #[test]
    fn zero_intent_gives_zero_planar_velocity() {
        let mut body = SimBody::new(Vec3::ZERO, 1.0);
        body.velocity = Vec3::new(3.0, 0.0, -2.0);
        let out = locomotion().tick(DT, MovementIntent::ZERO, grounded(), JumpOutcome::None, &mut body);
        assert_eq!(out.velocity, Vec3::ZERO);
        assert!(out.velocity.is_finite());
    }

    #[test]
    fn partial_intent_moves_at_full_speed() {
        let mut body = SimBody::new(Vec3::ZERO, 1.0);
        let intent = MovementIntent::new(Vec2::new(0.3, 0.0));
        let out = locomotion().tick(DT, intent, grounded(), JumpOutcome::None, &mut body);
        assert!((out.velocity.x - 5.0).abs() < 1e-5);
        assert_eq!(out.velocity.z, 0.0);
    }

    #[test]
    fn air_control_scales_planar_speed() {
        let loco = locomotion();
        let intent = MovementIntent::new(Vec2::new(0.6, 0.8));
        let ground_speed = loco.planar_velocity(intent, true).length();
        let air_speed = loco.planar_velocity(intent, false).length();
        assert!((air_speed - ground_speed * 0.5).abs() < 1e-5);
    }

    #[test]
    fn airborne_adds_extra_gravity_but_keeps_vertical_velocity() {
        let mut body = SimBody::new(Vec3::ZERO, 1.0);
        body.velocity = Vec3::new(0.0, 1.0, 0.0);
        let out = locomotion().tick(DT, MovementIntent::ZERO, airborne(), JumpOutcome::None, &mut body);
        let expected = 1.0 - 9.81 * 2.0 * DT;
        assert!((out.velocity.y - expected).abs() < 1e-5);
    }

    /// Body that records accelerations instead of folding them into velocity.
    #[derive(Default)]
    struct ForceBody {
        velocity: Vec3,
        rotation: Quat,
        accelerations: Vec<(Vec3, f32)>,
    }

    impl RigidBody for ForceBody {
        fn position(&self) -> Vec3 {
            Vec3::ZERO
        }
        fn set_position(&mut self, _position: Vec3) {}
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
            self.velocity += impulse;
        }
        fn apply_acceleration(&mut self, acceleration: Vec3, dt: f32) {
            self.accelerations.push((acceleration, dt));
        }
    }

    #[test]
    fn extra_gravity_goes_through_body_acceleration() {
        let loco = locomotion();
        let mut body = ForceBody::default();

        loco.tick(DT, MovementIntent::ZERO, airborne(), JumpOutcome::None, &mut body);
        assert_eq!(body.accelerations, vec![(Vec3::new(0.0, -9.81 * 2.0, 0.0), DT)]);
        assert_eq!(body.velocity.y, 0.0);

        loco.tick(DT, MovementIntent::ZERO, grounded(), JumpOutcome::None, &mut body);
        loco.tick(DT, MovementIntent::ZERO, airborne(), JumpOutcome::Fired, &mut body);
        assert_eq!(body.accelerations.len(), 1);
    }

    #[test]
    fn grounded_leaves_vertical_velocity_untouched() {
        let mut body = SimBody::new(Vec3::ZERO, 1.0);
        body.velocity = Vec3::new(0.0, -0.5, 0.0);
        let out = locomotion().tick(DT, MovementIntent::ZERO, grounded(), JumpOutcome::None, &mut body);
        assert_eq!(out.velocity.y, -0.5);
    }

    #[test]
    fn fired_jump_resets_fall_then_applies_impulse() {
        let mut body = SimBody::new(Vec3::ZERO, 1.0);
        body.velocity = Vec3::new(0.0, -4.0, 0.0);
        let out = locomotion().tick(DT, MovementIntent::ZERO, airborne(), JumpOutcome::Fired, &mut body);
        assert_eq!(out.velocity.y, 8.0);
    }

    #[test]
    fn facing_turns_toward_intent_and_respects_deadzone() {
        let loco = locomotion();
        let mut body = SimBody::new(Vec3::ZERO, 1.0);

        loco.tick(DT, MovementIntent::new(Vec2::new(0.05, 0.0)), grounded(), JumpOutcome::None, &mut body);
        assert_eq!(body.rotation, Quat::IDENTITY);

        for _ in 0..200 {
            loco.tick(DT, MovementIntent::new(Vec2::X), airborne(), JumpOutcome::None, &mut body);
        }
        let forward = body.rotation * Vec3::Z;
        assert!((forward - Vec3::X).length() < 1e-3);
    }

    #[test]
    fn facing_yaw_maps_forward_to_direction() {
        let forward = facing_yaw(Vec2::new(0.0, -1.0)) * Vec3::Z;
        assert!((forward - Vec3::NEG_Z).length() < 1e-5);
    }
}
