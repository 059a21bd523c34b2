//! Lifecycle gate: the once-per-session "page is ready" signal.
//!
//! The gate has exactly one writer, [`LifecycleGate`], owned by whoever runs
//! the loading sequence. Everyone else holds a read-only [`GateSignal`]
//! passed in at construction. Reveals never arm before the gate opens, so they
//! always measure a settled layout.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use tracing::{debug, info};

use crate::scheduler::{CancelHandle, Scheduler, When};

type Listener = Box<dyn FnOnce()>;

#[derive(Default)]
struct GateState {
    ready: Cell<bool>,
    listeners: RefCell<Vec<(u64, Listener)>>,
    next_listener: Cell<u64>,
}

impl GateState {
    fn open(&self) {
        if self.ready.replace(true) {
            return;
        }
        let listeners = std::mem::take(&mut *self.listeners.borrow_mut());
        info!(listeners = listeners.len(), "lifecycle gate open");
        for (_, listener) in listeners {
            listener();
        }
    }
}

/// Writer side of the gate.
pub struct LifecycleGate {
    state: Rc<GateState>,
    timer: RefCell<Option<CancelHandle>>,
}

impl std::fmt::Debug for LifecycleGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LifecycleGate")
            .field("ready", &self.state.ready.get())
            .field("timer_pending", &self.timer_pending())
            .finish()
    }
}

impl Default for LifecycleGate {
    fn default() -> Self {
        Self::new()
    }
}

impl LifecycleGate {
    /// A closed gate with no timer running.
    pub fn new() -> Self {
        Self {
            state: Rc::new(GateState::default()),
            timer: RefCell::new(None),
        }
    }

    /// Read-only view for controllers.
    pub fn signal(&self) -> GateSignal {
        GateSignal {
            state: self.state.clone(),
        }
    }

    pub fn is_ready(&self) -> bool {
        self.state.ready.get()
    }

    /// Start the loading timer. The gate opens `delay_ms` from now.
    ///
    /// Calling this again while the timer runs, or after the gate opened,
    /// does nothing.
    pub fn start(&self, scheduler: &Scheduler, delay_ms: f64) {
        if self.is_ready() || self.timer_pending() {
            return;
        }
        let state = Rc::downgrade(&self.state);
        let handle = scheduler.schedule(When::After(delay_ms), move |_| {
            if let Some(state) = Weak::upgrade(&state) {
                state.open();
            }
        });
        debug!(delay_ms, "lifecycle gate timer started");
        *self.timer.borrow_mut() = Some(handle);
    }

    /// Open immediately, running every listener once.
    pub fn open(&self) {
        if let Some(timer) = self.timer.borrow_mut().take() {
            timer.cancel();
        }
        self.state.open();
    }

    /// Stop the loading timer. A cancelled gate stays closed for the session
    /// and reveals waiting on it never play.
    pub fn cancel(&self) {
        if let Some(timer) = self.timer.borrow_mut().take() {
            if timer.cancel() {
                debug!("lifecycle gate timer cancelled");
            }
        }
    }

    fn timer_pending(&self) -> bool {
        self.timer
            .borrow()
            .as_ref()
            .is_some_and(CancelHandle::is_pending)
    }
}

/// Read-only handle to the gate.
#[derive(Clone)]
pub struct GateSignal {
    state: Rc<GateState>,
}

impl std::fmt::Debug for GateSignal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GateSignal")
            .field("ready", &self.is_ready())
            .finish()
    }
}

impl GateSignal {
    pub fn is_ready(&self) -> bool {
        self.state.ready.get()
    }

    /// Run `listener` once when the gate opens.
    ///
    /// If the gate is already open the listener runs immediately and the
    /// returned subscription is inert.
    pub fn subscribe(&self, listener: impl FnOnce() + 'static) -> GateSubscription {
        if self.is_ready() {
            listener();
            return GateSubscription {
                id: 0,
                state: Weak::new(),
            };
        }

        let id = self.state.next_listener.get() + 1;
        self.state.next_listener.set(id);
        self.state
            .listeners
            .borrow_mut()
            .push((id, Box::new(listener)));
        GateSubscription {
            id,
            state: Rc::downgrade(&self.state),
        }
    }

    /// Number of listeners still waiting for the gate.
    pub fn waiting(&self) -> usize {
        self.state.listeners.borrow().len()
    }
}

/// A pending gate listener.
#[derive(Debug, Clone)]
pub struct GateSubscription {
    id: u64,
    state: Weak<GateState>,
}

impl GateSubscription {
    /// Drop the listener without running it. Returns `true` if it was waiting.
    pub fn cancel(&self) -> bool {
        let Some(state) = self.state.upgrade() else {
            return false;
        };
        let mut listeners = state.listeners.borrow_mut();
        let before = listeners.len();
        listeners.retain(|(id, _)| *id != self.id);
        listeners.len() != before
    }
}
