use std::rc::Rc;

use tracing::warn;

use super::animation::AnimationBridge;
use super::events::ControllerEvents;
use crate::physics::{PhysicsWorld, RigidBody};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Binding {
    RigidBody,
    Animation,
    PhysicsWorld,
}

/// Collaborators injected into one controller at construction.
///
/// Any of them may be absent. The affected capability then becomes a no-op
/// and the gap is logged once, the first time it is hit.
pub struct Bindings {
    pub(crate) body: Option<Box<dyn RigidBody>>,
    pub(crate) animation: Option<Box<dyn AnimationBridge>>,
    pub(crate) physics: Option<Rc<dyn PhysicsWorld>>,
    pub(crate) events: ControllerEvents,
    reported: Vec<Binding>,
}

impl Bindings {
    pub(crate) fn new() -> Self {
        Self {
            body: None,
            animation: None,
            physics: None,
            events: ControllerEvents::default(),
            reported: Vec::new(),
        }
    }

    pub(crate) fn report_missing(&mut self, binding: Binding) {
        if !self.reported.contains(&binding) {
            warn!(?binding, "controller_binding_missing");
            self.reported.push(binding);
        }
    }

    pub(crate) fn has_body(&mut self) -> bool {
        if self.body.is_none() {
            self.report_missing(Binding::RigidBody);
            return false;
        }
        true
    }

    pub(crate) fn set_running(&mut self, running: bool) {
        match self.animation.as_mut() {
            Some(animation) => animation.set_running(running),
            None => self.report_missing(Binding::Animation),
        }
    }

    pub(crate) fn trigger_jump(&mut self) {
        match self.animation.as_mut() {
            Some(animation) => animation.trigger_jump(),
            None => self.report_missing(Binding::Animation),
        }
    }

    pub(crate) fn trigger_death(&mut self) {
        match self.animation.as_mut() {
            Some(animation) => animation.trigger_death(),
            None => self.report_missing(Binding::Animation),
        }
    }

    pub(crate) fn reset_triggers(&mut self) {
        match self.animation.as_mut() {
            Some(animation) => animation.reset_triggers(),
            None => self.report_missing(Binding::Animation),
        }
    }
}
