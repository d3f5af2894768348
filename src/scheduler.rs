//! Trailing-edge debounce for relayout requests.

use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

pub trait Clock {
    fn now(&self) -> Instant;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Clock that only moves when told to.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Cell<Instant>,
}

impl Default for ManualClock {
    fn default() -> Self {
        Self {
            now: Cell::new(Instant::now()),
        }
    }
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.now.get()
    }
}

impl<C: Clock + ?Sized> Clock for Rc<C> {
    fn now(&self) -> Instant {
        (**self).now()
    }
}

/// Holds at most one pending deadline. Scheduling again replaces it, so
/// only the last request inside the window fires.
#[derive(Debug, Clone)]
pub struct Debouncer {
    window: Duration,
    deadline: Option<Instant>,
}

impl Debouncer {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            deadline: None,
        }
    }

    pub fn schedule(&mut self, now: Instant) {
        self.cancel();
        self.deadline = Some(now + self.window);
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Time left until the pending deadline, if any.
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.deadline
            .map(|deadline| deadline.saturating_duration_since(now))
    }

    /// Returns `true` once, when the pending deadline has passed.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOW: Duration = Duration::from_millis(100);

    #[test]
    fn fires_once_after_quiet_window() {
        let clock = ManualClock::new();
        let mut debouncer = Debouncer::new(WINDOW);
        debouncer.schedule(clock.now());

        clock.advance(Duration::from_millis(99));
        assert!(!debouncer.poll(clock.now()));

        clock.advance(Duration::from_millis(1));
        assert!(debouncer.poll(clock.now()));
        assert!(!debouncer.poll(clock.now()));
    }

    #[test]
    fn rescheduling_pushes_the_deadline() {
        let clock = ManualClock::new();
        let mut debouncer = Debouncer::new(WINDOW);
        debouncer.schedule(clock.now());
        clock.advance(Duration::from_millis(80));
        debouncer.schedule(clock.now());

        clock.advance(Duration::from_millis(80));
        assert!(!debouncer.poll(clock.now()));
        assert_eq!(
            debouncer.remaining(clock.now()),
            Some(Duration::from_millis(20))
        );

        clock.advance(Duration::from_millis(20));
        assert!(debouncer.poll(clock.now()));
    }

    #[test]
    fn cancel_drops_pending_deadline() {
        let clock = ManualClock::new();
        let mut debouncer = Debouncer::new(WINDOW);
        debouncer.schedule(clock.now());
        debouncer.cancel();
        clock.advance(WINDOW * 2);
        assert!(!debouncer.is_pending());
        assert!(!debouncer.poll(clock.now()));
    }
}
