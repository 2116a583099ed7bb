//! Locomotion and lifecycle controller for one player character.
//!
//! The host drives two entry points: [`PlayerController::tick_presentation`]
//! at frame rate (input sampling, animation) and
//! [`PlayerController::tick_physics`] at the fixed physics rate (ground probe,
//! jump resolution, velocity). All collaborators are injected at
//! construction; nothing is looked up globally.

pub mod animation;
mod bindings;
pub mod events;
pub mod ground;
pub mod jump;
pub mod lifecycle;
pub mod locomotion;

use std::rc::Rc;

use glam::Vec3;
use tracing::debug;

pub use animation::{AnimationBridge, AnimationCall, RecordingAnimator};
pub use bindings::Binding;
pub use events::{ControllerEvents, Signal};
pub use ground::{GroundSensor, GroundState};
pub use jump::{JumpOutcome, JumpScheduler, JumpTimers};
pub use lifecycle::{LifecycleController, LifecycleMode, MovePhase};
pub use locomotion::{LocomotionController, LocomotionOutput};

use bindings::Bindings;

use crate::config::ControllerConfig;
use crate::engine::input::{InputSource, MovementIntent};
use crate::physics::{PhysicsWorld, RigidBody};

/// Timers at or below this are treated as expired, so accumulated float error
/// never leaves a window open for one extra tick.
pub(crate) const TIMER_EPSILON: f32 = 1e-5;

pub(crate) fn count_down(remaining: f32, dt: f32) -> f32 {
    let next = remaining - dt.max(0.0);
    if next <= TIMER_EPSILON {
        0.0
    } else {
        next
    }
}

pub struct PlayerController {
    input: Box<dyn InputSource>,
    bindings: Bindings,
    ground: GroundSensor,
    jump: JumpScheduler,
    locomotion: LocomotionController,
    lifecycle: LifecycleController,
    intent: MovementIntent,
    last_locomotion: Option<LocomotionOutput>,
    jumps_fired: u32,
}

impl PlayerController {
    pub fn new(config: &ControllerConfig, input: Box<dyn InputSource>) -> Self {
        Self {
            input,
            bindings: Bindings::new(),
            ground: GroundSensor::new(config),
            jump: JumpScheduler::new(config),
            locomotion: LocomotionController::new(config),
            lifecycle: LifecycleController::new(config),
            intent: MovementIntent::ZERO,
            last_locomotion: None,
            jumps_fired: 0,
        }
    }

    pub fn with_body(mut self, body: Box<dyn RigidBody>) -> Self {
        self.bindings.body = Some(body);
        self
    }

    pub fn with_animation(mut self, animation: Box<dyn AnimationBridge>) -> Self {
        self.bindings.animation = Some(animation);
        self
    }

    pub fn with_physics(mut self, physics: Rc<dyn PhysicsWorld>) -> Self {
        self.bindings.physics = Some(physics);
        self
    }

    // -----------------------------------------------------------------------
    // Host entry points
    // -----------------------------------------------------------------------

    /// Frame-rate tick: sample input, buffer jump presses, drive the running
    /// animation flag. Input is read but discarded outside `Normal`.
    pub fn tick_presentation(&mut self, dt: f32) {
        if self.lifecycle.mode() == LifecycleMode::Dead {
            return;
        }
        let frame = self.input.poll(dt);
        if self.lifecycle.mode() != LifecycleMode::Normal {
            return;
        }

        self.intent = frame.intent();
        if frame.jump_pressed {
            self.jump.on_jump_intent();
        }
        let running = !self.intent.is_zero();
        self.bindings.set_running(running);
    }

    /// Fixed-rate tick. In `Normal`: probe ground, resolve the jump buffer,
    /// then write velocity and facing, in that order. Otherwise the active
    /// lifecycle sub-state advances and the jump cooldown keeps draining.
    pub fn tick_physics(&mut self, dt: f32) {
        match self.lifecycle.mode() {
            LifecycleMode::Dead => {}
            LifecycleMode::Normal => self.tick_locomotion(dt),
            LifecycleMode::MovingToDestination | LifecycleMode::Dying => {
                self.jump.tick_cooldown(dt);
                self.lifecycle.tick(dt, &mut self.bindings);
            }
        }
    }

    fn tick_locomotion(&mut self, dt: f32) {
        if !self.bindings.has_body() {
            self.jump.tick_cooldown(dt);
            return;
        }
        if self.bindings.physics.is_none() {
            self.bindings.report_missing(Binding::PhysicsWorld);
        }

        let position = self
            .bindings
            .body
            .as_deref()
            .map_or(Vec3::ZERO, |body| body.position());
        let ground = self
            .ground
            .probe(self.bindings.physics.as_deref(), position, dt);
        let outcome = self.jump.tick(dt, &mut self.ground);
        if outcome == JumpOutcome::Fired {
            self.jumps_fired += 1;
            self.bindings.trigger_jump();
        }

        if let Some(body) = self.bindings.body.as_deref_mut() {
            let output = self.locomotion.tick(dt, self.intent, ground, outcome, body);
            self.last_locomotion = Some(output);
        }
    }

    // -----------------------------------------------------------------------
    // Requests from collaborators (trigger volumes, level scripts)
    // -----------------------------------------------------------------------

    /// Start dying. Duplicate calls are ignored.
    pub fn die(&mut self) -> bool {
        let accepted = self.lifecycle.die(&mut self.bindings);
        if accepted {
            self.suspend_input();
        }
        accepted
    }

    /// Start a scripted walk to `target`. The caller is responsible for
    /// passing a reachable, valid target.
    pub fn request_move_to_destination(&mut self, target: Vec3) -> bool {
        let accepted = self
            .lifecycle
            .request_move_to_destination(target, &mut self.bindings);
        if accepted {
            self.suspend_input();
        }
        accepted
    }

    fn suspend_input(&mut self) {
        if self.jump.timers().buffer_remaining > 0.0 {
            debug!("jump_buffer_cancelled");
        }
        self.jump.cancel_buffer();
        self.intent = MovementIntent::ZERO;
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    pub fn mode(&self) -> LifecycleMode {
        self.lifecycle.mode()
    }

    pub fn lifecycle(&self) -> &LifecycleController {
        &self.lifecycle
    }

    pub fn ground_state(&self) -> GroundState {
        self.ground.state()
    }

    pub fn jump_timers(&self) -> JumpTimers {
        self.jump.timers()
    }

    pub fn is_jumping(&self) -> bool {
        self.jump.is_jumping()
    }

    pub fn jumps_fired(&self) -> u32 {
        self.jumps_fired
    }

    pub fn intent(&self) -> MovementIntent {
        self.intent
    }

    pub fn last_locomotion(&self) -> Option<LocomotionOutput> {
        self.last_locomotion
    }

    pub fn position(&self) -> Option<Vec3> {
        self.bindings.body.as_deref().map(|body| body.position())
    }

    pub fn body(&self) -> Option<&(dyn RigidBody + 'static)> {
        self.bindings.body.as_deref()
    }

    pub fn body_mut(&mut self) -> Option<&mut (dyn RigidBody + 'static)> {
        self.bindings.body.as_deref_mut()
    }

    pub fn events(&self) -> &ControllerEvents {
        &self.bindings.events
    }

    /// Subscribe here; the controller does not track who listens.
    pub fn events_mut(&mut self) -> &mut ControllerEvents {
        &mut self.bindings.events
    }
}
