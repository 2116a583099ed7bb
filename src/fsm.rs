/// Minimal finite-state-machine container.
///
/// `S` is the state type (usually an enum). The machine tracks the current
/// state, the previous state, and how long the machine has been in its current
/// state. **Transition logic is kept out of the machine itself**: it lives in
/// the controller that drives it (see `controller::lifecycle`).
///
/// # Usage
/// ```
/// use stride::fsm::StateMachine;
///
/// #[derive(Clone, Debug, PartialEq)]
/// enum Door { Closed, Opening }
///
/// let mut fsm = StateMachine::new(Door::Closed);
/// fsm.go(Door::Opening);
/// assert!(fsm.just_entered());
/// fsm.tick(0.5);
/// assert_eq!(fsm.elapsed, 0.5);
/// assert_eq!(fsm.previous, Door::Closed);
/// ```
#[derive(Debug, Clone)]
pub struct StateMachine<S: Clone> {
    pub state: S,
    pub previous: S,
    /// Seconds spent in the current state. Reset to 0.0 on each transition.
    pub elapsed: f32,
    entered_this_frame: bool,
}

impl<S: Clone> StateMachine<S> {
    /// Create a new machine starting in `initial`.
    /// `just_entered()` returns `true` until the first tick.
    pub fn new(initial: S) -> Self {
        Self {
            previous: initial.clone(),
            state: initial,
            elapsed: 0.0,
            entered_this_frame: true,
        }
    }

    /// Transition to `next` only if it is a **different variant** from the
    /// current state (compared by discriminant, no `PartialEq` required).
    /// Resets `elapsed` to 0.0 and sets `just_entered()` until the next tick.
    pub fn go(&mut self, next: S) {
        if std::mem::discriminant(&self.state) != std::mem::discriminant(&next) {
            self.force_go(next);
        }
    }

    /// Like [`go`](Self::go), but **always** transitions even if the variant is the same.
    /// Used when the variant carries a sub-state that changes (cutscene startup
    /// to travelling) and the elapsed timer has to restart with it.
    pub fn force_go(&mut self, next: S) {
        self.previous = std::mem::replace(&mut self.state, next);
        self.elapsed = 0.0;
        self.entered_this_frame = true;
    }

    /// Advance the elapsed-in-state timer by `dt` seconds and clear the
    /// `just_entered` flag.
    pub fn tick(&mut self, dt: f32) {
        self.elapsed += dt;
        self.entered_this_frame = false;
    }

    /// Returns `true` from a transition until the following tick.
    pub fn just_entered(&self) -> bool {
        self.entered_this_frame
    }
}
