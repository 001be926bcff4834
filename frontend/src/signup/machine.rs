use std::rc::Rc;

use chrono::{DateTime, Utc};
use log::{debug, info, warn};

use super::validation::{validate, FormInput, ValidForm};
use crate::config;
use crate::storage::{JoinRecord, SessionStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalState {
    /// A join record already exists; the prompt is never built.
    Suppressed,
    Hidden,
    Visible,
    Submitting,
    Completed,
    Dismissed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Timer {
    ShowDelay,
    Acceptance,
    Close,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DismissReason {
    CloseButton,
    Overlay,
    Escape,
    MaybeLater,
}

/// Side effects requested by a transition. The driver executes them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    Schedule(Timer, u32),
    Cancel(Timer),
    LockScroll,
    UnlockScroll,
}

/// What the view needs to draw the dialog.
#[derive(Debug, Clone, PartialEq)]
pub struct ModalSnapshot {
    pub state: ModalState,
    pub open: bool,
    pub error: Option<String>,
    pub confirmation: Option<String>,
}

impl Default for ModalSnapshot {
    fn default() -> Self {
        Self {
            state: ModalState::Hidden,
            open: false,
            error: None,
            confirmation: None,
        }
    }
}

pub struct SignupMachine {
    store: Rc<dyn SessionStore>,
    state: ModalState,
    // Set by whichever show trigger wins; the other one checks it and bails.
    shown: bool,
    closed: bool,
    error: Option<String>,
    confirmation: Option<String>,
    pending: Option<ValidForm>,
}

impl SignupMachine {
    pub fn new(store: Rc<dyn SessionStore>) -> Self {
        Self {
            store,
            state: ModalState::Hidden,
            shown: false,
            closed: false,
            error: None,
            confirmation: None,
            pending: None,
        }
    }

    pub fn state(&self) -> ModalState {
        self.state
    }

    pub fn snapshot(&self) -> ModalSnapshot {
        let open = !self.closed
            && matches!(
                self.state,
                ModalState::Visible | ModalState::Submitting | ModalState::Completed
            );
        ModalSnapshot {
            state: self.state,
            open,
            error: self.error.clone(),
            confirmation: self.confirmation.clone(),
        }
    }

    pub fn start(&mut self) -> Vec<Command> {
        let joined = match JoinRecord::exists(self.store.as_ref()) {
            Ok(joined) => joined,
            Err(e) => {
                warn!("Could not read join record, showing prompt: {}", e);
                false
            }
        };
        if joined {
            if let Ok(Some(record)) = JoinRecord::load(self.store.as_ref()) {
                debug!("{} joined at {}", record.name, record.joined_at);
            }
            info!("Join record present, signup prompt suppressed");
            self.state = ModalState::Suppressed;
            return Vec::new();
        }
        vec![Command::Schedule(Timer::ShowDelay, config::SHOW_DELAY_MS)]
    }

    /// Scroll trigger: shows the prompt once the page is scrolled past
    /// `SHOW_SCROLL_RATIO` of the viewport height.
    pub fn on_scroll(&mut self, scroll_y: f64, viewport_height: f64) -> Vec<Command> {
        if scroll_y <= viewport_height * config::SHOW_SCROLL_RATIO {
            return Vec::new();
        }
        let mut commands = self.show("scroll");
        if !commands.is_empty() {
            commands.insert(0, Command::Cancel(Timer::ShowDelay));
        }
        commands
    }

    pub fn on_timer(&mut self, timer: Timer, now: DateTime<Utc>) -> Vec<Command> {
        match timer {
            Timer::ShowDelay => self.show("delay"),
            Timer::Acceptance => self.accept(now),
            Timer::Close => {
                if self.state != ModalState::Completed || self.closed {
                    return Vec::new();
                }
                self.closed = true;
                vec![Command::UnlockScroll]
            }
        }
    }

    pub fn submit(&mut self, input: &FormInput) -> Vec<Command> {
        if self.state != ModalState::Visible {
            return Vec::new();
        }
        match validate(input) {
            Ok(form) => {
                self.error = None;
                self.pending = Some(form);
                self.state = ModalState::Submitting;
                vec![Command::Schedule(Timer::Acceptance, config::ACCEPT_DELAY_MS)]
            }
            Err(errors) => {
                debug!("Signup form rejected: {}", errors);
                self.error = Some(errors.to_string());
                Vec::new()
            }
        }
    }

    pub fn dismiss(&mut self, reason: DismissReason) -> Vec<Command> {
        if self.state != ModalState::Visible {
            return Vec::new();
        }
        info!("Signup prompt dismissed ({:?})", reason);
        self.state = ModalState::Dismissed;
        self.error = None;
        vec![Command::UnlockScroll]
    }

    fn show(&mut self, trigger: &str) -> Vec<Command> {
        if self.state != ModalState::Hidden || self.shown {
            return Vec::new();
        }
        info!("Showing signup prompt ({} trigger)", trigger);
        self.shown = true;
        self.state = ModalState::Visible;
        vec![Command::LockScroll]
    }

    fn accept(&mut self, now: DateTime<Utc>) -> Vec<Command> {
        if self.state != ModalState::Submitting {
            return Vec::new();
        }
        let Some(form) = self.pending.take() else {
            return Vec::new();
        };
        if let Err(e) = JoinRecord::new(form.name.clone(), now).save(self.store.as_ref()) {
            warn!("Failed to persist join record: {}", e);
        }
        info!("Signup completed for {}", form.name);
        debug!("age {}, email given: {}", form.age, form.email.is_some());
        self.state = ModalState::Completed;
        self.confirmation = Some(format!("Thanks, {}! You're on the list.", form.name));
        vec![Command::Schedule(Timer::Close, config::CLOSE_DELAY_MS)]
    }
}
