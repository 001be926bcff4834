use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use crate::clock::{Clock, TaskId};

struct Inner<T> {
    clock: Rc<dyn Clock>,
    window_ms: u32,
    handler: Box<dyn Fn(T)>,
    last_run: Cell<Option<f64>>,
    pending: RefCell<Option<T>>,
    trailing: Cell<Option<TaskId>>,
}

/// Trailing-edge throttle: runs at most once per window, and the last value
/// of a burst always gets a run once the window closes.
pub struct Throttle<T: 'static> {
    inner: Rc<Inner<T>>,
}

impl<T: 'static> Throttle<T> {
    pub fn new(clock: Rc<dyn Clock>, window_ms: u32, handler: impl Fn(T) + 'static) -> Self {
        Self {
            inner: Rc::new(Inner {
                clock,
                window_ms,
                handler: Box::new(handler),
                last_run: Cell::new(None),
                pending: RefCell::new(None),
                trailing: Cell::new(None),
            }),
        }
    }

    pub fn call(&self, value: T) {
        let inner = &self.inner;
        let now = inner.clock.now_ms();
        let window = f64::from(inner.window_ms);
        let elapsed = inner.last_run.get().map(|t| now - t);

        if elapsed.map_or(true, |e| e >= window) {
            if let Some(id) = inner.trailing.take() {
                inner.clock.cancel(id);
            }
            inner.pending.borrow_mut().take();
            Self::run(inner, value);
            return;
        }

        *inner.pending.borrow_mut() = Some(value);
        if inner.trailing.get().is_none() {
            let wait = (window - elapsed.unwrap_or(0.0)).ceil().max(0.0) as u32;
            let weak: Weak<Inner<T>> = Rc::downgrade(inner);
            let id = inner.clock.schedule(
                wait,
                Box::new(move || {
                    if let Some(inner) = weak.upgrade() {
                        inner.trailing.set(None);
                        let value = inner.pending.borrow_mut().take();
                        if let Some(value) = value {
                            Self::run(&inner, value);
                        }
                    }
                }),
            );
            inner.trailing.set(Some(id));
        }
    }

    fn run(inner: &Inner<T>, value: T) {
        inner.last_run.set(Some(inner.clock.now_ms()));
        (inner.handler)(value);
    }
}

impl<T: 'static> Drop for Throttle<T> {
    fn drop(&mut self) {
        if let Some(id) = self.inner.trailing.take() {
            self.inner.clock.cancel(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;

    fn recorder(clock: &Rc<ManualClock>) -> (Throttle<u32>, Rc<RefCell<Vec<(f64, u32)>>>) {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let throttle = {
            let seen = seen.clone();
            let clock_for_handler = clock.clone();
            Throttle::new(clock.clone(), 120, move |v| {
                seen.borrow_mut().push((clock_for_handler.now_ms(), v))
            })
        };
        (throttle, seen)
    }

    #[test]
    fn burst_runs_leading_and_one_trailing_with_last_value() {
        let clock = ManualClock::new();
        let (throttle, seen) = recorder(&clock);

        throttle.call(1);
        for v in 2..=6 {
            clock.advance(10);
            throttle.call(v);
        }
        assert_eq!(*seen.borrow(), vec![(0.0, 1)]);

        clock.advance(500);
        assert_eq!(*seen.borrow(), vec![(0.0, 1), (120.0, 6)]);
    }

    #[test]
    fn calls_spaced_beyond_window_all_run_immediately() {
        let clock = ManualClock::new();
        let (throttle, seen) = recorder(&clock);
        for v in 0..3 {
            throttle.call(v);
            clock.advance(150);
        }
        assert_eq!(*seen.borrow(), vec![(0.0, 0), (150.0, 1), (300.0, 2)]);
        assert_eq!(clock.pending(), 0);
    }

    #[test]
    fn call_after_trailing_waits_for_next_window() {
        let clock = ManualClock::new();
        let (throttle, seen) = recorder(&clock);
        throttle.call(1);
        clock.advance(50);
        throttle.call(2);
        clock.advance(70); // trailing fires at 120
        clock.advance(30);
        throttle.call(3); // 30ms after the trailing run
        clock.advance(200);
        assert_eq!(*seen.borrow(), vec![(0.0, 1), (120.0, 2), (240.0, 3)]);
    }

    #[test]
    fn dropping_cancels_pending_trailing_call() {
        let clock = ManualClock::new();
        let (throttle, seen) = recorder(&clock);
        throttle.call(1);
        throttle.call(2);
        drop(throttle);
        clock.advance(500);
        assert_eq!(*seen.borrow(), vec![(0.0, 1)]);
    }
}
