use tracing::{debug, trace};

use super::count_down;
use super::ground::GroundSensor;
use crate::config::ControllerConfig;

/// Whether this tick converted a buffered intent into a jump.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JumpOutcome {
    #[default]
    None,
    Fired,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct JumpTimers {
    /// Time left for a pressed jump to find ground (or coyote time).
    pub buffer_remaining: f32,
    /// Time left before another jump may be buffered.
    pub cooldown_remaining: f32,
}

/// Owns the jump buffer and cooldown and decides on which physics tick a
/// pressed jump actually fires.
#[derive(Debug, Clone)]
pub struct JumpScheduler {
    buffer_time: f32,
    cooldown: f32,
    timers: JumpTimers,
}

impl JumpScheduler {
    pub fn new(config: &ControllerConfig) -> Self {
        Self {
            buffer_time: config.jump_buffer_time,
            cooldown: config.jump_cooldown,
            timers: JumpTimers::default(),
        }
    }

    pub fn timers(&self) -> JumpTimers {
        self.timers
    }

    /// True exactly while the cooldown of the last jump is running.
    pub fn is_jumping(&self) -> bool {
        self.timers.cooldown_remaining > 0.0
    }

    /// Edge-triggered jump press. Ignored while a jump is cooling down.
    /// Returns whether the press was buffered.
    pub fn on_jump_intent(&mut self) -> bool {
        if self.is_jumping() {
            trace!(
                cooldown_remaining = self.timers.cooldown_remaining,
                "jump_intent_ignored"
            );
            return false;
        }
        self.timers.buffer_remaining = self.buffer_time;
        trace!(buffer = self.buffer_time, "jump_buffered");
        true
    }

    /// Resolve the buffer against this tick's ground state. Must run after the
    /// ground probe and before velocity is applied.
    pub fn tick(&mut self, dt: f32, ground: &mut GroundSensor) -> JumpOutcome {
        self.tick_cooldown(dt);

        if self.timers.buffer_remaining <= 0.0 {
            return JumpOutcome::None;
        }

        if ground.state().allows_jump() {
            let coyote = !ground.state().is_grounded;
            self.timers.buffer_remaining = 0.0;
            self.timers.cooldown_remaining = self.cooldown;
            ground.consume_coyote();
            debug!(coyote, "jump_fired");
            return JumpOutcome::Fired;
        }

        self.timers.buffer_remaining = count_down(self.timers.buffer_remaining, dt);
        if self.timers.buffer_remaining == 0.0 {
            debug!("jump_buffer_expired");
        }
        JumpOutcome::None
    }

    /// Cooldown keeps draining even while locomotion is suspended.
    pub fn tick_cooldown(&mut self, dt: f32) {
        self.timers.cooldown_remaining = count_down(self.timers.cooldown_remaining, dt);
    }

    /// Drop a pending press (input was disabled). Cooldown is untouched.
    pub fn cancel_buffer(&mut self) {
        self.timers.buffer_remaining = 0.0;
    }
}
