use glam::Vec3;

use super::count_down;
use crate::config::ControllerConfig;
use crate::physics::PhysicsWorld;

/// Ground contact as of the last physics tick.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GroundState {
    pub is_grounded: bool,
    /// Refilled to the coyote duration while grounded, drains to zero in the air.
    pub coyote_remaining: f32,
}

impl GroundState {
    /// Grounded, or recently left the ground and still inside the coyote window.
    pub fn allows_jump(&self) -> bool {
        self.is_grounded || self.coyote_remaining > 0.0
    }
}

/// Downward sphere probe plus the coyote countdown. Sole writer of
/// [`GroundState`].
#[derive(Debug, Clone)]
pub struct GroundSensor {
    sphere_radius: f32,
    check_distance: f32,
    coyote_time: f32,
    state: GroundState,
}

impl GroundSensor {
    pub fn new(config: &ControllerConfig) -> Self {
        Self {
            sphere_radius: config.sphere_radius,
            check_distance: config.ground_check_distance,
            coyote_time: config.coyote_time,
            state: GroundState::default(),
        }
    }

    pub fn state(&self) -> GroundState {
        self.state
    }

    /// Cast a sphere from `position + up * radius` straight down for
    /// `radius + check_distance`. No physics world means no hit.
    pub fn probe<W>(&mut self, world: Option<&W>, position: Vec3, dt: f32) -> GroundState
    where
        W: PhysicsWorld + ?Sized,
    {
        let origin = position + Vec3::Y * self.sphere_radius;
        let hit = world
            .and_then(|w| {
                w.sphere_cast(
                    origin,
                    self.sphere_radius,
                    Vec3::NEG_Y,
                    self.sphere_radius + self.check_distance,
                )
            })
            .is_some();
        self.record(hit, dt)
    }

    /// Fold one probe result into the state.
    pub fn record(&mut self, hit: bool, dt: f32) -> GroundState {
        self.state.is_grounded = hit;
        self.state.coyote_remaining = if hit {
            self.coyote_time
        } else {
            count_down(self.state.coyote_remaining, dt)
        };
        self.state
    }

    /// A jump spends whatever coyote time was left.
    pub fn consume_coyote(&mut self) {
        self.state.coyote_remaining = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::CastHit;

    struct Floor {
        height: f32,
    }

    impl PhysicsWorld for Floor {
        fn sphere_cast(
            &self,
            origin: Vec3,
            radius: f32,
            _direction: Vec3,
            max_distance: f32,
        ) -> Option<CastHit> {
            let distance = (origin.y - radius - self.height).max(0.0);
            (distance <= max_distance).then(|| CastHit {
                distance,
                point: Vec3::new(origin.x, self.height, origin.z),
                normal: Vec3::Y,
            })
        }
    }

    fn sensor() -> GroundSensor {
        GroundSensor::new(&ControllerConfig::default())
    }

    #[test]
    fn standing_on_floor_is_grounded_with_full_coyote() {
        let mut sensor = sensor();
        let state = sensor.probe(Some(&Floor { height: 0.0 }), Vec3::ZERO, 0.02);
        assert!(state.is_grounded);
        assert_eq!(state.coyote_remaining, 0.1);
    }

    #[test]
    fn probe_reaches_check_distance_below_feet() {
        let mut sensor = sensor();
        let floor = Floor { height: 0.0 };
        // radius 0.5 + check 0.2 below the sphere bottom
        assert!(sensor.probe(Some(&floor), Vec3::new(0.0, 0.65, 0.0), 0.02).is_grounded);
        assert!(!sensor.probe(Some(&floor), Vec3::new(0.0, 0.8, 0.0), 0.02).is_grounded);
    }

    #[test]
    fn coyote_drains_in_the_air_and_floors_at_zero() {
        let mut sensor = sensor();
        sensor.record(true, 0.02);
        let state = sensor.record(false, 0.04);
        assert!(!state.is_grounded);
        assert!((state.coyote_remaining - 0.06).abs() < 1e-6);
        for _ in 0..10 {
            sensor.record(false, 0.04);
        }
        assert_eq!(sensor.state().coyote_remaining, 0.0);
        assert!(!sensor.state().allows_jump());
    }

    #[test]
    fn missing_world_is_always_airborne() {
        let mut sensor = sensor();
        let state = sensor.probe(None::<&Floor>, Vec3::ZERO, 0.02);
        assert!(!state.is_grounded);
    }

    #[test]
    fn consume_coyote_keeps_grounded_flag() {
        let mut sensor = sensor();
        sensor.record(true, 0.02);
        sensor.consume_coyote();
        let state = sensor.state();
        assert!(state.is_grounded);
        assert_eq!(state.coyote_remaining, 0.0);
    }
}
