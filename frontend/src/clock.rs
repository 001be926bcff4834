use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use gloo_timers::callback::Timeout;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TaskId(u64);

/// Time source and one-shot scheduler used by the timed parts of the page.
pub trait Clock {
    fn now_ms(&self) -> f64;
    fn schedule(&self, delay_ms: u32, task: Box<dyn FnOnce()>) -> TaskId;
    /// Cancelling a task that already ran (or was never scheduled) does nothing.
    fn cancel(&self, id: TaskId);
}

/// Live handles keyed by task id. Taking a handle out is how a task is
/// claimed, either by the task itself when it fires or by `cancel`.
pub struct TaskSlots<H> {
    next_id: Cell<u64>,
    live: RefCell<HashMap<TaskId, H>>,
}

impl<H> Default for TaskSlots<H> {
    fn default() -> Self {
        Self {
            next_id: Cell::new(0),
            live: RefCell::new(HashMap::new()),
        }
    }
}

impl<H> TaskSlots<H> {
    pub fn reserve(&self) -> TaskId {
        let id = TaskId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        id
    }

    pub fn insert(&self, id: TaskId, handle: H) {
        self.live.borrow_mut().insert(id, handle);
    }

    pub fn take(&self, id: TaskId) -> Option<H> {
        self.live.borrow_mut().remove(&id)
    }

    pub fn len(&self) -> usize {
        self.live.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// `setTimeout` backed clock. Dropping a pending `Timeout` clears it, so
/// cancelled tasks release their closures right away.
#[derive(Default)]
pub struct BrowserClock {
    slots: Rc<TaskSlots<Timeout>>,
}

impl BrowserClock {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Clock for BrowserClock {
    fn now_ms(&self) -> f64 {
        web_sys::js_sys::Date::now()
    }

    fn schedule(&self, delay_ms: u32, task: Box<dyn FnOnce()>) -> TaskId {
        let id = self.slots.reserve();
        let slots = Rc::downgrade(&self.slots);
        let timeout = Timeout::new(delay_ms, move || {
            let Some(own) = slots.upgrade().and_then(|slots| slots.take(id)) else {
                return;
            };
            // Still running inside this callback; must not be dropped here.
            own.forget();
            task();
        });
        self.slots.insert(id, timeout);
        id
    }

    fn cancel(&self, id: TaskId) {
        drop(self.slots.take(id));
    }
}

#[cfg(test)]
pub use manual::ManualClock;

#[cfg(test)]
mod manual {
    use super::*;

    struct Scheduled {
        id: TaskId,
        due: f64,
        task: Box<dyn FnOnce()>,
    }

    /// Virtual clock: time only moves when `advance` is called.
    #[derive(Default)]
    pub struct ManualClock {
        now: Cell<f64>,
        next_id: Cell<u64>,
        queue: RefCell<Vec<Scheduled>>,
    }

    impl ManualClock {
        pub fn new() -> Rc<Self> {
            Rc::new(Self::default())
        }

        pub fn pending(&self) -> usize {
            self.queue.borrow().len()
        }

        /// Moves time forward by `ms`, running every task that falls due in
        /// order of due time, then scheduling order.
        pub fn advance(&self, ms: u32) {
            let target = self.now.get() + f64::from(ms);
            loop {
                let next = {
                    let mut queue = self.queue.borrow_mut();
                    let idx = queue
                        .iter()
                        .enumerate()
                        .filter(|(_, s)| s.due <= target)
                        .min_by(|(_, a), (_, b)| {
                            a.due.total_cmp(&b.due).then(a.id.0.cmp(&b.id.0))
                        })
                        .map(|(i, _)| i);
                    idx.map(|i| queue.remove(i))
                };
                match next {
                    Some(s) => {
                        self.now.set(s.due.max(self.now.get()));
                        (s.task)();
                    }
                    None => break,
                }
            }
            self.now.set(target);
        }
    }

    impl Clock for ManualClock {
        fn now_ms(&self) -> f64 {
            self.now.get()
        }

        fn schedule(&self, delay_ms: u32, task: Box<dyn FnOnce()>) -> TaskId {
            let id = TaskId(self.next_id.get());
            self.next_id.set(id.0 + 1);
            self.queue.borrow_mut().push(Scheduled {
                id,
                due: self.now.get() + f64::from(delay_ms),
                task,
            });
            id
        }

        fn cancel(&self, id: TaskId) {
            self.queue.borrow_mut().retain(|s| s.id != id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn runs_tasks_in_due_order() {
        let clock = ManualClock::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        for (delay, tag) in [(300, "c"), (100, "a"), (200, "b")] {
            let log = log.clone();
            clock.schedule(delay, Box::new(move || log.borrow_mut().push(tag)));
        }
        clock.advance(250);
        assert_eq!(*log.borrow(), vec!["a", "b"]);
        clock.advance(50);
        assert_eq!(*log.borrow(), vec!["a", "b", "c"]);
    }

    #[test]
    fn cancelled_task_never_runs() {
        let clock = ManualClock::new();
        let ran = Rc::new(Cell::new(false));
        let id = {
            let ran = ran.clone();
            clock.schedule(10, Box::new(move || ran.set(true)))
        };
        clock.cancel(id);
        clock.advance(100);
        assert!(!ran.get());
        assert_eq!(clock.pending(), 0);
    }

    #[test]
    fn task_can_schedule_follow_up() {
        let clock = ManualClock::new();
        let hits = Rc::new(Cell::new(0));
        {
            let inner_clock = clock.clone();
            let hits = hits.clone();
            clock.schedule(
                10,
                Box::new(move || {
                    hits.set(hits.get() + 1);
                    let hits = hits.clone();
                    inner_clock.schedule(10, Box::new(move || hits.set(hits.get() + 1)));
                }),
            );
        }
        clock.advance(15);
        assert_eq!(hits.get(), 1);
        clock.advance(5);
        assert_eq!(hits.get(), 2);
        assert_eq!(clock.now_ms(), 20.0);
    }

    struct Tracked(Rc<Cell<bool>>);

    impl Drop for Tracked {
        fn drop(&mut self) {
            self.0.set(true);
        }
    }

    #[test]
    fn cancel_releases_the_handle() {
        let slots = TaskSlots::default();
        let dropped = Rc::new(Cell::new(false));
        let id = slots.reserve();
        slots.insert(id, Tracked(dropped.clone()));
        assert_eq!(slots.len(), 1);

        drop(slots.take(id));
        assert!(dropped.get());
        assert!(slots.is_empty());
        // A second claim finds nothing.
        assert!(slots.take(id).is_none());
    }

    #[test]
    fn slots_hand_out_distinct_ids() {
        let slots: TaskSlots<Tracked> = TaskSlots::default();
        let first = slots.reserve();
        let second = slots.reserve();
        assert_ne!(first, second);
        let kept = Rc::new(Cell::new(false));
        slots.insert(second, Tracked(kept.clone()));
        assert!(slots.take(first).is_none());
        assert!(!kept.get());
        assert_eq!(slots.len(), 1);
    }
}
