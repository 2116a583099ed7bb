use glam::{Vec2, Vec3};
use serde::Serialize;
use tracing::{debug, info, warn};

use super::bindings::Bindings;
use super::locomotion::face_towards;
use crate::config::ControllerConfig;
use crate::fsm::StateMachine;

/// Top-level mode of one character. Mutually exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleMode {
    Normal,
    MovingToDestination,
    Dying,
    Dead,
}

/// Sub-state of a cutscene move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MovePhase {
    /// Standing still for the startup delay.
    Startup,
    /// Walking straight at the destination.
    Travelling,
}

#[derive(Debug, Clone, PartialEq)]
enum LifecycleState {
    Normal,
    MovingToDestination { destination: Vec3, phase: MovePhase },
    Dying,
    Dead,
}

/// Arbitrates Normal / cutscene move / death and runs the two timed mini
/// state machines. Each sub-state keeps its own elapsed time in the
/// [`StateMachine`] and is advanced by [`tick`](Self::tick).
#[derive(Debug, Clone)]
pub struct LifecycleController {
    fsm: StateMachine<LifecycleState>,
    move_speed: f32,
    rotation_speed: f32,
    startup_delay: f32,
    death_delay: f32,
    epsilon_distance: f32,
}

impl LifecycleController {
    pub fn new(config: &ControllerConfig) -> Self {
        Self {
            fsm: StateMachine::new(LifecycleState::Normal),
            move_speed: config.move_speed,
            rotation_speed: config.rotation_speed,
            startup_delay: config.startup_delay,
            death_delay: config.death_delay,
            epsilon_distance: config.epsilon_distance,
        }
    }

    pub fn mode(&self) -> LifecycleMode {
        match self.fsm.state {
            LifecycleState::Normal => LifecycleMode::Normal,
            LifecycleState::MovingToDestination { .. } => LifecycleMode::MovingToDestination,
            LifecycleState::Dying => LifecycleMode::Dying,
            LifecycleState::Dead => LifecycleMode::Dead,
        }
    }

    /// Snapshot of the accepted destination while a cutscene move is active.
    pub fn destination(&self) -> Option<Vec3> {
        match self.fsm.state {
            LifecycleState::MovingToDestination { destination, .. } => Some(destination),
            _ => None,
        }
    }

    pub fn move_phase(&self) -> Option<MovePhase> {
        match self.fsm.state {
            LifecycleState::MovingToDestination { phase, .. } => Some(phase),
            _ => None,
        }
    }

    /// Seconds spent in the current mode (or move phase).
    pub fn elapsed(&self) -> f32 {
        self.fsm.elapsed
    }

    /// Start a scripted walk to `target`. Returns `false` when the request is
    /// redundant (already moving) or the character is dying or dead.
    pub fn request_move_to_destination(&mut self, target: Vec3, bindings: &mut Bindings) -> bool {
        match self.mode() {
            LifecycleMode::MovingToDestination => {
                debug!(?target, "move_to_destination_ignored_already_moving");
                return false;
            }
            LifecycleMode::Dying | LifecycleMode::Dead => {
                debug!(?target, "move_to_destination_ignored_not_alive");
                return false;
            }
            LifecycleMode::Normal => {}
        }

        self.fsm.go(LifecycleState::MovingToDestination {
            destination: target,
            phase: MovePhase::Startup,
        });
        if let Some(body) = bindings.body.as_deref_mut() {
            body.set_velocity(Vec3::ZERO);
        }
        bindings.set_running(false);
        bindings.reset_triggers();
        info!(?target, "move_to_destination_started");
        true
    }

    /// Begin dying. Idempotent: returns `false` if already dying or dead.
    /// Preempts an active cutscene move.
    pub fn die(&mut self, bindings: &mut Bindings) -> bool {
        match self.mode() {
            LifecycleMode::Dying | LifecycleMode::Dead => {
                debug!("die_ignored_already_dying");
                return false;
            }
            LifecycleMode::MovingToDestination => {
                info!(destination = ?self.destination(), "move_to_destination_cancelled");
            }
            LifecycleMode::Normal => {}
        }

        self.fsm.go(LifecycleState::Dying);
        if let Some(body) = bindings.body.as_deref_mut() {
            let velocity = body.velocity();
            body.set_velocity(Vec3::new(0.0, velocity.y, 0.0));
        }
        bindings.trigger_death();
        info!("dying");
        true
    }

    /// Advance whichever mini state machine is active. No-op in `Normal` and
    /// `Dead`.
    pub fn tick(&mut self, dt: f32, bindings: &mut Bindings) {
        self.fsm.tick(dt);

        match self.fsm.state {
            LifecycleState::Normal | LifecycleState::Dead => {}

            LifecycleState::Dying => {
                if self.fsm.elapsed >= self.death_delay {
                    self.fsm.go(LifecycleState::Dead);
                    info!("died");
                    bindings.events.died.emit();
                }
            }

            LifecycleState::MovingToDestination {
                destination,
                phase: MovePhase::Startup,
            } => {
                if self.fsm.elapsed >= self.startup_delay {
                    self.fsm.force_go(LifecycleState::MovingToDestination {
                        destination,
                        phase: MovePhase::Travelling,
                    });
                    self.travel(destination, dt, bindings);
                }
            }

            LifecycleState::MovingToDestination {
                destination,
                phase: MovePhase::Travelling,
            } => self.travel(destination, dt, bindings),
        }
    }

    /// One tick of the straight-line walk. The step is clamped to the
    /// remaining distance so the character never overshoots.
    fn travel(&mut self, destination: Vec3, dt: f32, bindings: &mut Bindings) {
        if !bindings.has_body() {
            warn!(?destination, "move_to_destination_without_body");
            self.arrive(bindings);
            return;
        }
        let Some(body) = bindings.body.as_deref_mut() else {
            return;
        };

        let offset = destination - body.position();
        let distance = offset.length();
        if distance <= self.epsilon_distance {
            body.set_velocity(Vec3::ZERO);
            self.arrive(bindings);
            return;
        }

        let direction = offset / distance;
        let speed = if dt > 0.0 {
            self.move_speed.min(distance / dt)
        } else {
            self.move_speed
        };
        body.set_velocity(direction * speed);
        let facing = face_towards(
            body.rotation(),
            Vec2::new(direction.x, direction.z),
            self.rotation_speed,
            dt,
        );
        body.set_rotation(facing);
        bindings.set_running(true);
    }

    fn arrive(&mut self, bindings: &mut Bindings) {
        self.fsm.go(LifecycleState::Normal);
        info!("move_to_destination_reached");
        bindings.events.reached_destination.emit();
    }
}
