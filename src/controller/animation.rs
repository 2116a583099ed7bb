use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Animator parameter names used by the character graph.
pub const IS_RUNNING: &str = "IsRunning";
pub const JUMP: &str = "Jump";
pub const DIE_1: &str = "Die1";
pub const DIE_2: &str = "Die2";

/// Fire-and-forget animation signals. Implemented outside the controller;
/// nothing is reported back.
pub trait AnimationBridge {
    fn set_running(&mut self, running: bool);
    fn trigger_jump(&mut self);
    fn trigger_death(&mut self);
    fn reset_triggers(&mut self);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnimationCall {
    SetBool { param: &'static str, value: bool },
    SetTrigger(&'static str),
    ResetTrigger(&'static str),
}

/// Animation bridge that records parameter writes instead of driving a graph.
///
/// Clones share the same log, so a host can keep one clone for inspection
/// after handing another to the controller. `IsRunning` is only recorded when
/// it changes.
#[derive(Debug, Clone, Default)]
pub struct RecordingAnimator {
    calls: Rc<RefCell<Vec<AnimationCall>>>,
    running: Rc<Cell<bool>>,
}

impl RecordingAnimator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<AnimationCall> {
        self.calls.borrow().clone()
    }

    pub fn is_running(&self) -> bool {
        self.running.get()
    }

    pub fn trigger_count(&self, param: &str) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|call| matches!(call, AnimationCall::SetTrigger(p) if *p == param))
            .count()
    }
}

impl AnimationBridge for RecordingAnimator {
    fn set_running(&mut self, running: bool) {
        if self.running.get() != running {
            self.running.set(running);
            self.calls.borrow_mut().push(AnimationCall::SetBool {
                param: IS_RUNNING,
                value: running,
            });
        }
    }

    fn trigger_jump(&mut self) {
        self.calls.borrow_mut().push(AnimationCall::SetTrigger(JUMP));
    }

    fn trigger_death(&mut self) {
        self.calls.borrow_mut().push(AnimationCall::SetTrigger(DIE_2));
    }

    fn reset_triggers(&mut self) {
        let mut calls = self.calls.borrow_mut();
        for param in [JUMP, DIE_1, DIE_2] {
            calls.push(AnimationCall::ResetTrigger(param));
        }
    }
}
