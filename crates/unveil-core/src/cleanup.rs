//! Teardown bookkeeping for a reveal controller.
//!
//! Everything a controller registers outside itself (scheduler tasks, gate
//! listeners, surface wrappers) is recorded in a [`Teardown`] so one call
//! releases all of it. Releasing twice, or releasing a controller that never
//! got past mount, is a no-op.

use crate::gate::GateSubscription;
use crate::scheduler::CancelHandle;
use crate::surface::Surface;
use crate::types::ContainerId;

/// What a release actually undid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Released {
    /// Scheduler tasks and gate listeners removed before they ran.
    pub cancelled: usize,
    /// Whether surface wrappers were removed.
    pub reverted: bool,
}

impl Released {
    pub fn is_noop(&self) -> bool {
        self.cancelled == 0 && !self.reverted
    }
}

#[derive(Debug, Default)]
pub struct Teardown {
    tasks: Vec<CancelHandle>,
    gate: Option<GateSubscription>,
    decomposed: Option<ContainerId>,
}

impl Teardown {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn track_task(&mut self, handle: CancelHandle) {
        self.tasks.retain(CancelHandle::is_pending);
        self.tasks.push(handle);
    }

    pub fn track_gate(&mut self, subscription: GateSubscription) {
        if let Some(previous) = self.gate.replace(subscription) {
            previous.cancel();
        }
    }

    pub fn is_waiting_on_gate(&self) -> bool {
        self.gate.is_some()
    }

    pub fn mark_decomposed(&mut self, container: ContainerId) {
        self.decomposed = Some(container);
    }

    pub fn is_decomposed(&self) -> bool {
        self.decomposed.is_some()
    }

    /// Cancel every pending task and listener, then revert the surface.
    pub fn release(&mut self, surface: &mut dyn Surface) -> Released {
        let mut released = Released::default();

        for task in self.tasks.drain(..) {
            if task.cancel() {
                released.cancelled += 1;
            }
        }
        if let Some(subscription) = self.gate.take() {
            if subscription.cancel() {
                released.cancelled += 1;
            }
        }
        if let Some(container) = self.decomposed.take() {
            surface.revert(container);
            released.reverted = true;
        }

        released
    }
}
