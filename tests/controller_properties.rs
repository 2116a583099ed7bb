use std::cell::Cell;
use std::rc::Rc;

use glam::{Vec2, Vec3};

use stride::config::ControllerConfig;
use stride::controller::{animation, LifecycleMode, MovePhase, PlayerController, RecordingAnimator};
use stride::engine::input::InputHandle;
use stride::physics::{CastHit, PhysicsWorld, SimBody};

const DT: f32 = 0.02;

/// Ground probe whose answer is flipped by the test.
#[derive(Clone, Default)]
struct SwitchableGround(Rc<Cell<bool>>);

impl PhysicsWorld for SwitchableGround {
    fn sphere_cast(
        &self,
        origin: Vec3,
        _radius: f32,
        _direction: Vec3,
        _max_distance: f32,
    ) -> Option<CastHit> {
        self.0.get().then_some(CastHit {
            distance: 0.0,
            point: origin,
            normal: Vec3::Y,
        })
    }
}

struct Rig {
    controller: PlayerController,
    input: InputHandle,
    ground: SwitchableGround,
    animator: RecordingAnimator,
}

impl Rig {
    fn new(config: ControllerConfig) -> Self {
        let input = InputHandle::new();
        let ground = SwitchableGround::default();
        let animator = RecordingAnimator::new();
        let controller = PlayerController::new(&config, Box::new(input.clone()))
            .with_body(Box::new(SimBody::new(Vec3::ZERO, config.mass)))
            .with_animation(Box::new(animator.clone()))
            .with_physics(Rc::new(ground.clone()));
        Self {
            controller,
            input,
            ground,
            animator,
        }
    }

    fn set_grounded(&self, grounded: bool) {
        self.ground.0.set(grounded);
    }

    /// One presentation frame and one physics step, both of `DT`.
    fn step(&mut self) {
        self.controller.tick_presentation(DT);
        self.controller.tick_physics(DT);
    }

    /// Physics step that also moves the body along its velocity.
    fn step_and_integrate(&mut self) {
        self.step();
        if let Some(body) = self.controller.body_mut() {
            let next = body.position() + body.velocity() * DT;
            body.set_position(next);
        }
    }

    fn velocity(&self) -> Vec3 {
        self.controller
            .body()
            .map_or(Vec3::ZERO, |body| body.velocity())
    }
}

#[test]
fn coyote_jump_fires_shortly_after_leaving_ground() {
    let mut rig = Rig::new(ControllerConfig::default());
    rig.set_grounded(true);
    rig.step();

    // Walked off the edge: airborne ticks at t = 0.02 and 0.04.
    rig.set_grounded(false);
    rig.step();
    rig.step();
    assert!(!rig.controller.ground_state().is_grounded);
    assert!(rig.controller.ground_state().coyote_remaining > 0.0);

    // Press at t = 0.05, resolved on the t = 0.06 physics tick.
    rig.input.press_jump();
    rig.step();

    assert_eq!(rig.controller.jumps_fired(), 1);
    assert_eq!(rig.animator.trigger_count(animation::JUMP), 1);
    assert_eq!(rig.controller.ground_state().coyote_remaining, 0.0);
    assert!(rig.velocity().y > 0.0);
}

#[test]
fn coyote_window_closes() {
    let mut rig = Rig::new(ControllerConfig::default());
    rig.set_grounded(true);
    rig.step();
    rig.set_grounded(false);
    for _ in 0..5 {
        rig.step();
    }
    assert_eq!(rig.controller.ground_state().coyote_remaining, 0.0);

    rig.input.press_jump();
    rig.step();
    assert_eq!(rig.controller.jumps_fired(), 0);
}

/// Airborne with no coyote time left, press at t = 0, land on the tick at
/// `landing`. Returns the number of jumps fired.
fn buffered_jump_with_landing_at(landing: f32) -> u32 {
    let mut rig = Rig::new(ControllerConfig::default());
    rig.set_grounded(false);
    rig.step();
    assert_eq!(rig.controller.ground_state().coyote_remaining, 0.0);

    rig.input.press_jump();
    rig.controller.tick_presentation(DT);

    let mut t = 0.0;
    for _ in 0..10 {
        t += DT;
        rig.set_grounded(t >= landing - 1e-4);
        rig.controller.tick_physics(DT);
        if rig.controller.jumps_fired() > 0 {
            assert!((t - landing).abs() < 1e-4, "jump fired at {t}, landed at {landing}");
            break;
        }
    }
    rig.controller.jumps_fired()
}

#[test]
fn buffered_jump_fires_on_landing_inside_window() {
    assert_eq!(buffered_jump_with_landing_at(0.08), 1);
}

#[test]
fn buffered_jump_expires_before_late_landing() {
    assert_eq!(buffered_jump_with_landing_at(0.12), 0);
}

#[test]
fn no_second_impulse_while_cooling_down() {
    let mut rig = Rig::new(ControllerConfig::default());
    rig.set_grounded(true);
    rig.input.press_jump();
    rig.step();
    assert_eq!(rig.controller.jumps_fired(), 1);
    assert!(rig.controller.is_jumping());
    let launch = rig.velocity().y;

    // Probe still reports ground right after take-off.
    rig.input.press_jump();
    rig.step();
    rig.input.press_jump();
    rig.step();

    assert_eq!(rig.controller.jumps_fired(), 1);
    assert_eq!(rig.animator.trigger_count(animation::JUMP), 1);
    assert!(rig.velocity().y <= launch);

    // Once the cooldown is over a fresh press jumps again.
    for _ in 0..10 {
        rig.step();
    }
    assert!(!rig.controller.is_jumping());
    rig.input.press_jump();
    rig.step();
    assert_eq!(rig.controller.jumps_fired(), 2);
}

#[test]
fn dying_cancels_a_pending_jump_buffer() {
    let mut rig = Rig::new(ControllerConfig::default());
    rig.set_grounded(false);
    rig.step();

    rig.input.press_jump();
    rig.step();
    assert!(rig.controller.jump_timers().buffer_remaining > 0.0);
    assert_eq!(rig.controller.jumps_fired(), 0);

    assert!(rig.controller.die());
    assert_eq!(rig.controller.jump_timers().buffer_remaining, 0.0);

    // Landing while dying must not spend the old press.
    rig.set_grounded(true);
    rig.step();
    assert_eq!(rig.controller.jumps_fired(), 0);
}

#[test]
fn cutscene_move_keeps_draining_the_jump_cooldown() {
    let config = ControllerConfig::default();
    let cooldown = config.jump_cooldown;
    let mut rig = Rig::new(config);
    rig.set_grounded(true);
    rig.input.press_jump();
    rig.step();
    assert_eq!(rig.controller.jumps_fired(), 1);
    assert_eq!(rig.controller.jump_timers().cooldown_remaining, cooldown);

    assert!(rig.controller.request_move_to_destination(Vec3::new(0.0, 0.0, 6.0)));
    assert_eq!(rig.controller.jump_timers().buffer_remaining, 0.0);
    rig.controller.tick_physics(DT);

    let remaining = rig.controller.jump_timers().cooldown_remaining;
    assert!(remaining > 0.0 && remaining < cooldown, "cooldown = {remaining}");
    assert!(rig.controller.is_jumping());
}

#[test]
fn die_twice_emits_one_signal_and_ends_dead() {
    let config = ControllerConfig::default();
    let death_delay = config.death_delay;
    let mut rig = Rig::new(config);
    rig.set_grounded(true);

    assert!(rig.controller.die());
    assert!(!rig.controller.die());
    rig.step();
    assert!(!rig.controller.die());

    let ticks = (death_delay / DT).ceil() as usize + 5;
    for _ in 0..ticks {
        rig.step();
    }

    assert_eq!(rig.controller.mode(), LifecycleMode::Dead);
    assert_eq!(rig.controller.events().died.emit_count(), 1);
    assert_eq!(rig.animator.trigger_count(animation::DIE_2), 1);

    // Dead is terminal.
    assert!(!rig.controller.die());
    assert!(!rig.controller.request_move_to_destination(Vec3::X));
    for _ in 0..10 {
        rig.step();
    }
    assert_eq!(rig.controller.mode(), LifecycleMode::Dead);
    assert_eq!(rig.controller.events().died.emit_count(), 1);
}

#[test]
fn repeated_move_request_leaves_state_untouched() {
    let mut rig = Rig::new(ControllerConfig::default());
    rig.set_grounded(true);
    let target = Vec3::new(0.0, 0.0, 4.0);

    assert!(rig.controller.request_move_to_destination(target));
    rig.step();
    let elapsed = rig.controller.lifecycle().elapsed();

    assert!(!rig
        .controller
        .request_move_to_destination(Vec3::new(9.0, 0.0, 9.0)));
    assert_eq!(rig.controller.mode(), LifecycleMode::MovingToDestination);
    assert_eq!(rig.controller.lifecycle().destination(), Some(target));
    assert_eq!(rig.controller.lifecycle().move_phase(), Some(MovePhase::Startup));
    assert_eq!(rig.controller.lifecycle().elapsed(), elapsed);
}

#[test]
fn move_to_destination_closes_in_and_stops_exactly() {
    let config = ControllerConfig::default();
    let epsilon = config.epsilon_distance;
    let mut rig = Rig::new(config);
    rig.set_grounded(true);
    let target = Vec3::new(3.0, 0.0, 4.0);

    assert!(rig.controller.request_move_to_destination(target));
    let mut ticks = 0;
    while rig.controller.lifecycle().move_phase() == Some(MovePhase::Startup) {
        rig.step_and_integrate();
        ticks += 1;
        assert!(ticks < 200, "startup never finished");
    }

    let distance_to_target = |rig: &Rig| {
        rig.controller
            .position()
            .map_or(f32::INFINITY, |p| p.distance(target))
    };
    let mut last = f32::INFINITY;
    while rig.controller.mode() == LifecycleMode::MovingToDestination {
        let distance = distance_to_target(&rig);
        assert!(distance < last, "distance went from {last} to {distance}");
        last = distance;
        rig.step_and_integrate();
        ticks += 1;
        assert!(ticks < 1000, "never arrived");
    }

    assert_eq!(rig.controller.mode(), LifecycleMode::Normal);
    assert!(distance_to_target(&rig) <= epsilon);
    assert_eq!(rig.velocity(), Vec3::ZERO);
    assert_eq!(rig.controller.events().reached_destination.emit_count(), 1);
}

#[test]
fn input_is_ignored_during_cutscene_move() {
    let mut rig = Rig::new(ControllerConfig::default());
    rig.set_grounded(true);
    rig.input.set_movement(Vec2::X);
    rig.step();
    assert!(rig.animator.is_running());

    assert!(rig.controller.request_move_to_destination(Vec3::new(0.0, 0.0, 5.0)));
    rig.input.press_jump();
    rig.step();

    assert!(rig.controller.intent().is_zero());
    assert_eq!(rig.controller.jumps_fired(), 0);
    assert_eq!(rig.velocity(), Vec3::ZERO);
    assert!(!rig.animator.is_running());
}

#[test]
fn airborne_planar_speed_is_scaled_by_air_control() {
    let config = ControllerConfig::default();
    let factor = config.air_control_factor;
    let mut rig = Rig::new(config);
    rig.input.set_movement(Vec2::new(0.6, 0.8));

    rig.set_grounded(true);
    rig.step();
    let grounded = rig.velocity();
    let grounded_speed = Vec2::new(grounded.x, grounded.z).length();

    rig.set_grounded(false);
    rig.step();
    let airborne = rig.velocity();
    let airborne_speed = Vec2::new(airborne.x, airborne.z).length();

    assert!((grounded_speed - 5.0).abs() < 1e-4);
    assert!((airborne_speed - grounded_speed * factor).abs() < 1e-4);
    assert!(airborne_speed < grounded_speed);
    // Extra gravity only applies in the air.
    assert!(airborne.y < grounded.y);
}

#[test]
fn controller_without_collaborators_does_not_panic() {
    let mut controller =
        PlayerController::new(&ControllerConfig::default(), Box::new(InputHandle::new()));
    controller.tick_presentation(DT);
    controller.tick_physics(DT);
    assert!(controller.request_move_to_destination(Vec3::X));
    controller.tick_physics(DT);
    assert!(controller.position().is_none());
    assert!(controller.die());
}
