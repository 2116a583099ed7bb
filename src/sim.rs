//! Headless host: owns the level, the trigger field and one controller, and
//! drives them with a frame clock and a fixed physics accumulator.

use std::cell::Cell;
use std::rc::Rc;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::ControllerConfig;
use crate::controller::{animation, LifecycleMode, PlayerController, RecordingAnimator};
use crate::engine::input::{InputSource, ScriptedInput};
use crate::engine::time::FixedStep;
use crate::physics::{Level, SimBody};
use crate::scene::Scenario;
use crate::trigger::{TargetKind, TriggerField};

/// End-of-run report, printed by the binary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimSummary {
    pub scenario: String,
    pub elapsed: f32,
    pub frames: u32,
    pub physics_steps: u32,
    pub final_mode: LifecycleMode,
    pub final_position: Option<[f32; 3]>,
    pub jumps_fired: u32,
    pub died_events: u32,
    pub reached_destination_events: u32,
    pub death_animations: usize,
}

pub struct Simulation {
    name: String,
    level: Rc<Level>,
    triggers: TriggerField,
    controller: PlayerController,
    animator: RecordingAnimator,
    fixed: FixedStep,
    radius: f32,
    died: Rc<Cell<u32>>,
    reached: Rc<Cell<u32>>,
    elapsed: f32,
    frames: u32,
    physics_steps: u32,
    last_mode: LifecycleMode,
}

impl Simulation {
    /// Build a run of `scenario` with its own scripted input.
    pub fn new(config: &ControllerConfig, scenario: &Scenario, physics_dt: f32) -> Self {
        let input = ScriptedInput::new(scenario.input.clone());
        Self::with_input(config, scenario, physics_dt, Box::new(input))
    }

    pub fn with_input(
        config: &ControllerConfig,
        scenario: &Scenario,
        physics_dt: f32,
        input: Box<dyn InputSource>,
    ) -> Self {
        let level = Rc::new(scenario.build_level(config.gravity));
        let animator = RecordingAnimator::new();

        let mut controller = PlayerController::new(config, input)
            .with_body(Box::new(SimBody::new(scenario.spawn, config.mass)))
            .with_animation(Box::new(animator.clone()))
            .with_physics(level.clone());

        let died = Rc::new(Cell::new(0));
        let reached = Rc::new(Cell::new(0));
        {
            let died = died.clone();
            controller
                .events_mut()
                .died
                .subscribe(move || died.set(died.get() + 1));
        }
        {
            let reached = reached.clone();
            controller
                .events_mut()
                .reached_destination
                .subscribe(move || reached.set(reached.get() + 1));
        }

        info!(
            scenario = %scenario.name,
            statics = level.static_count(),
            triggers = scenario.triggers.len(),
            physics_dt,
            "simulation_ready"
        );

        Self {
            name: scenario.name.clone(),
            level,
            triggers: scenario.build_triggers(),
            controller,
            animator,
            fixed: FixedStep::new(physics_dt),
            radius: config.sphere_radius,
            died,
            reached,
            elapsed: 0.0,
            frames: 0,
            physics_steps: 0,
            last_mode: LifecycleMode::Normal,
        }
    }

    /// One presentation frame followed by however many physics steps the
    /// accumulator owes.
    pub fn frame(&mut self, frame_dt: f32) {
        self.frames += 1;
        self.elapsed += frame_dt;
        self.controller.tick_presentation(frame_dt);

        let steps = self.fixed.advance(frame_dt);
        let dt = self.fixed.step();
        for _ in 0..steps {
            self.physics_step(dt);
        }

        let mode = self.controller.mode();
        if mode != self.last_mode {
            debug!(from = ?self.last_mode, to = ?mode, elapsed = self.elapsed, "sim_mode_observed");
            self.last_mode = mode;
        }
    }

    fn physics_step(&mut self, dt: f32) {
        self.physics_steps += 1;
        self.controller.tick_physics(dt);
        if let Some(body) = self.controller.body_mut() {
            self.level.step_body(body, self.radius, dt);
        }
        self.triggers
            .update(dt, TargetKind::Player, &mut self.controller);
    }

    /// Run fixed-size frames until `seconds` of scenario time have passed.
    /// A non-finite length or a non-positive frame step runs nothing.
    pub fn run_for(&mut self, seconds: f32, frame_dt: f32) -> SimSummary {
        if !(seconds.is_finite() && frame_dt.is_finite() && frame_dt > 0.0) {
            warn!(seconds, frame_dt, "run_for_rejected");
            return self.summary();
        }
        let frames = (seconds / frame_dt).ceil().max(0.0) as u32;
        for _ in 0..frames {
            self.frame(frame_dt);
        }
        self.summary()
    }

    pub fn summary(&self) -> SimSummary {
        SimSummary {
            scenario: self.name.clone(),
            elapsed: self.elapsed,
            frames: self.frames,
            physics_steps: self.physics_steps,
            final_mode: self.controller.mode(),
            final_position: self.controller.position().map(|p| p.to_array()),
            jumps_fired: self.controller.jumps_fired(),
            died_events: self.died.get(),
            reached_destination_events: self.reached.get(),
            death_animations: self.animator.trigger_count(animation::DIE_2),
        }
    }

    pub fn controller(&self) -> &PlayerController {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut PlayerController {
        &mut self.controller
    }

    pub fn animator(&self) -> &RecordingAnimator {
        &self.animator
    }

    pub fn level(&self) -> &Level {
        &self.level
    }

    pub fn is_dead(&self) -> bool {
        self.controller.mode() == LifecycleMode::Dead
    }
}
