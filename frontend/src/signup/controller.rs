use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use chrono::Utc;

use super::machine::{Command, DismissReason, ModalSnapshot, SignupMachine, Timer};
use super::validation::FormInput;
use crate::clock::{Clock, TaskId};
use crate::storage::SessionStore;

/// Rendering surface for the signup dialog.
pub trait ModalView {
    fn render(&self, snapshot: &ModalSnapshot);
    fn set_scroll_locked(&self, locked: bool);
}

struct Shared {
    machine: RefCell<SignupMachine>,
    clock: Rc<dyn Clock>,
    view: Rc<dyn ModalView>,
    timers: RefCell<HashMap<Timer, TaskId>>,
    last: RefCell<Option<ModalSnapshot>>,
}

/// Runs a [`SignupMachine`] against a clock and a view.
#[derive(Clone)]
pub struct SignupController {
    shared: Rc<Shared>,
}

impl SignupController {
    pub fn new(store: Rc<dyn SessionStore>, clock: Rc<dyn Clock>, view: Rc<dyn ModalView>) -> Self {
        Self {
            shared: Rc::new(Shared {
                machine: RefCell::new(SignupMachine::new(store)),
                clock,
                view,
                timers: RefCell::new(HashMap::new()),
                last: RefCell::new(None),
            }),
        }
    }

    pub fn snapshot(&self) -> ModalSnapshot {
        self.shared.machine.borrow().snapshot()
    }

    pub fn start(&self) {
        let commands = self.shared.machine.borrow_mut().start();
        self.apply(commands);
    }

    pub fn on_scroll(&self, scroll_y: f64, viewport_height: f64) {
        let commands = self.shared.machine.borrow_mut().on_scroll(scroll_y, viewport_height);
        self.apply(commands);
    }

    pub fn submit(&self, input: &FormInput) {
        let commands = self.shared.machine.borrow_mut().submit(input);
        self.apply(commands);
    }

    pub fn dismiss(&self, reason: DismissReason) {
        let commands = self.shared.machine.borrow_mut().dismiss(reason);
        self.apply(commands);
    }

    fn fire(&self, timer: Timer) {
        self.shared.timers.borrow_mut().remove(&timer);
        let commands = self.shared.machine.borrow_mut().on_timer(timer, Utc::now());
        self.apply(commands);
    }

    fn apply(&self, commands: Vec<Command>) {
        let shared = &self.shared;
        for command in commands {
            match command {
                Command::Schedule(timer, delay_ms) => {
                    let this = self.clone();
                    let id = shared.clock.schedule(delay_ms, Box::new(move || this.fire(timer)));
                    if let Some(old) = shared.timers.borrow_mut().insert(timer, id) {
                        shared.clock.cancel(old);
                    }
                }
                Command::Cancel(timer) => {
                    let id = shared.timers.borrow_mut().remove(&timer);
                    if let Some(id) = id {
                        shared.clock.cancel(id);
                    }
                }
                Command::LockScroll => shared.view.set_scroll_locked(true),
                Command::UnlockScroll => shared.view.set_scroll_locked(false),
            }
        }

        let snapshot = self.snapshot();
        let changed = shared.last.borrow().as_ref() != Some(&snapshot);
        if changed {
            shared.view.render(&snapshot);
            *shared.last.borrow_mut() = Some(snapshot);
        }
    }
}
