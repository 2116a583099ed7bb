use std::fmt;

use tracing::debug;

/// Zero-argument broadcast signal. Subscribers are called in subscription
/// order each time the signal is emitted.
pub struct Signal {
    name: &'static str,
    subscribers: Vec<Box<dyn FnMut()>>,
    emitted: u32,
}

impl Signal {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            subscribers: Vec::new(),
            emitted: 0,
        }
    }

    pub fn subscribe(&mut self, subscriber: impl FnMut() + 'static) {
        self.subscribers.push(Box::new(subscriber));
    }

    pub fn emit(&mut self) {
        self.emitted += 1;
        debug!(
            signal = self.name,
            subscribers = self.subscribers.len(),
            count = self.emitted,
            "signal_emitted"
        );
        for subscriber in &mut self.subscribers {
            subscriber();
        }
    }

    /// Times this signal has fired over the controller's lifetime.
    pub fn emit_count(&self) -> u32 {
        self.emitted
    }
}

impl fmt::Debug for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signal")
            .field("name", &self.name)
            .field("subscribers", &self.subscribers.len())
            .field("emitted", &self.emitted)
            .finish()
    }
}

/// Event sinks exposed to scene/level managers and UI.
#[derive(Debug)]
pub struct ControllerEvents {
    pub died: Signal,
    pub reached_destination: Signal,
}

impl Default for ControllerEvents {
    fn default() -> Self {
        Self {
            died: Signal::new("died"),
            reached_destination: Signal::new("reached_destination"),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;

    #[test]
    fn every_subscriber_sees_each_emit() {
        let mut signal = Signal::new("died");
        let a = Rc::new(Cell::new(0));
        let b = Rc::new(Cell::new(0));
        let (a2, b2) = (a.clone(), b.clone());
        signal.subscribe(move || a2.set(a2.get() + 1));
        signal.subscribe(move || b2.set(b2.get() + 1));

        signal.emit();
        assert_eq!((a.get(), b.get()), (1, 1));
        assert_eq!(signal.emit_count(), 1);
    }

    #[test]
    fn emit_without_subscribers_still_counts() {
        let mut events = ControllerEvents::default();
        events.reached_destination.emit();
        assert_eq!(events.reached_destination.emit_count(), 1);
        assert_eq!(events.died.emit_count(), 0);
        assert!(format!("{:?}", events.died).contains("\"died\""));
    }
}
