use std::cell::RefCell;
use std::rc::Rc;

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Planar movement intent for the current frame, magnitude clamped to [0, 1].
/// `x` maps to world X, `y` maps to world Z.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MovementIntent(Vec2);

impl MovementIntent {
    pub const ZERO: Self = Self(Vec2::ZERO);

    pub fn new(raw: Vec2) -> Self {
        if !raw.is_finite() {
            return Self::ZERO;
        }
        Self(raw.clamp_length_max(1.0))
    }

    pub fn vector(&self) -> Vec2 {
        self.0
    }

    pub fn magnitude(&self) -> f32 {
        self.0.length()
    }

    pub fn is_zero(&self) -> bool {
        self.0 == Vec2::ZERO
    }
}

/// One presentation-tick sample of the input devices.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct InputFrame {
    /// Primary device (keyboard / gamepad action map).
    pub movement: Vec2,
    /// Secondary on-screen joystick. Overrides `movement` whenever non-zero.
    pub joystick: Vec2,
    /// Edge-triggered: true only on the tick the button went down.
    pub jump_pressed: bool,
}

impl InputFrame {
    pub fn intent(&self) -> MovementIntent {
        if self.joystick != Vec2::ZERO {
            MovementIntent::new(self.joystick)
        } else {
            MovementIntent::new(self.movement)
        }
    }
}

/// Polled once per presentation tick by the controller that owns it.
pub trait InputSource {
    fn poll(&mut self, dt: f32) -> InputFrame;
}

/// Input source that never moves and never jumps.
pub struct NoInput;

impl InputSource for NoInput {
    fn poll(&mut self, _dt: f32) -> InputFrame {
        InputFrame::default()
    }
}

// ---------------------------------------------------------------------------
// Shared handle (host- or test-driven input)
// ---------------------------------------------------------------------------

#[derive(Default)]
struct HandleState {
    movement: Vec2,
    joystick: Vec2,
    jump_pending: bool,
}

/// Cloneable input source whose state is written by the host.
///
/// The controller keeps one clone as its `InputSource`; the host keeps another
/// to feed it. A jump press is latched until the next poll, so it is seen
/// exactly once.
#[derive(Clone, Default)]
pub struct InputHandle {
    state: Rc<RefCell<HandleState>>,
}

impl InputHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_movement(&self, movement: Vec2) {
        self.state.borrow_mut().movement = movement;
    }

    pub fn set_joystick(&self, joystick: Vec2) {
        self.state.borrow_mut().joystick = joystick;
    }

    pub fn press_jump(&self) {
        self.state.borrow_mut().jump_pending = true;
    }
}

impl InputSource for InputHandle {
    fn poll(&mut self, _dt: f32) -> InputFrame {
        let mut state = self.state.borrow_mut();
        let frame = InputFrame {
            movement: state.movement,
            joystick: state.joystick,
            jump_pressed: state.jump_pending,
        };
        state.jump_pending = false;
        frame
    }
}

// ---------------------------------------------------------------------------
// Scripted timeline
// ---------------------------------------------------------------------------

/// Movement held over `[start, end)` seconds of scenario time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MoveSegment {
    pub start: f32,
    pub end: f32,
    #[serde(default)]
    pub movement: Vec2,
    #[serde(default)]
    pub joystick: Vec2,
}

/// Timeline of movement segments and jump presses for headless runs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InputScript {
    #[serde(default)]
    pub segments: Vec<MoveSegment>,
    /// Scenario times at which the jump button goes down.
    #[serde(default)]
    pub jumps: Vec<f32>,
}

/// Plays an [`InputScript`] back against its own clock.
pub struct ScriptedInput {
    script: InputScript,
    clock: f32,
    next_jump: usize,
}

impl ScriptedInput {
    pub fn new(mut script: InputScript) -> Self {
        script.jumps.sort_by(f32::total_cmp);
        Self {
            script,
            clock: 0.0,
            next_jump: 0,
        }
    }

    pub fn clock(&self) -> f32 {
        self.clock
    }
}

impl InputSource for ScriptedInput {
    fn poll(&mut self, dt: f32) -> InputFrame {
        self.clock += dt;
        let now = self.clock;

        let mut frame = InputFrame::default();
        if let Some(segment) = self
            .script
            .segments
            .iter()
            .find(|s| now >= s.start && now < s.end)
        {
            frame.movement = segment.movement;
            frame.joystick = segment.joystick;
        }

        // Several presses inside one frame still count as a single edge.
        while self
            .script
            .jumps
            .get(self.next_jump)
            .is_some_and(|&t| t <= now)
        {
            frame.jump_pressed = true;
            self.next_jump += 1;
        }

        frame
    }
}
