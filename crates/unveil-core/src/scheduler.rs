//! Cancellable deferred work.
//!
//! Both reveal triggers go through one entry point:
//!
//! ```text
//! schedule(When::After(ms), f)            -> CancelHandle   // mount delay, gate timer
//! schedule(When::Crossed { .. }, f)       -> CancelHandle   // one-shot viewport watch
//! ```
//!
//! Nothing runs until [`Scheduler::poll`], which the runtime calls once per
//! frame. Every task fires at most once and is removed before its callback
//! runs, so a watch can never fire twice no matter how often the viewport
//! oscillates across its line.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use tracing::{trace, warn};

use crate::clock::Clock;
use crate::observer::{ElementBounds, ScrollThreshold, Viewport};

/// Upper bound on poll passes; callbacks that keep scheduling zero-delay
/// work are cut off here and resume on the next poll.
const MAX_POLL_PASSES: usize = 32;

/// Condition under which a scheduled task fires.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum When {
    /// Fire once `delay_ms` has elapsed from the moment of scheduling.
    After(f64),
    /// Fire once the element crosses the threshold line.
    Crossed {
        bounds: ElementBounds,
        threshold: ScrollThreshold,
    },
}

#[derive(Debug, Clone, Copy)]
enum Due {
    At(f64),
    Crossed {
        bounds: ElementBounds,
        threshold: ScrollThreshold,
    },
}

struct Task {
    id: u64,
    due: Due,
    callback: Box<dyn FnOnce(f64)>,
}

impl Task {
    /// Time to hand to the callback if the task is ready.
    ///
    /// Timers report their due time rather than the poll time, so delays stay
    /// exact regardless of frame boundaries.
    fn fire_time(&self, now: f64, viewport: &Viewport) -> Option<f64> {
        match self.due {
            Due::At(at) => (at <= now).then_some(at),
            Due::Crossed { bounds, threshold } => {
                threshold.is_crossed(bounds, viewport).then_some(now)
            }
        }
    }
}

#[derive(Default)]
struct Queue {
    tasks: Vec<Task>,
    next_id: u64,
    viewport: Viewport,
}

/// Single-threaded task scheduler driven by a [`Clock`] and the current
/// viewport. Clones share the same queue.
#[derive(Clone)]
pub struct Scheduler {
    queue: Rc<RefCell<Queue>>,
    clock: Rc<dyn Clock>,
}

impl std::fmt::Debug for Scheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scheduler")
            .field("now_ms", &self.now_ms())
            .field("pending", &self.pending())
            .finish()
    }
}

impl Scheduler {
    pub fn new(clock: Rc<dyn Clock>, viewport: Viewport) -> Self {
        Self {
            queue: Rc::new(RefCell::new(Queue {
                viewport,
                ..Queue::default()
            })),
            clock,
        }
    }

    pub fn now_ms(&self) -> f64 {
        self.clock.now_ms()
    }

    pub fn viewport(&self) -> Viewport {
        self.queue.borrow().viewport
    }

    /// Record a new viewport. Watches are evaluated on the next poll.
    pub fn set_viewport(&self, viewport: Viewport) {
        self.queue.borrow_mut().viewport = viewport;
    }

    /// Queue `callback` to run once `when` holds.
    pub fn schedule(&self, when: When, callback: impl FnOnce(f64) + 'static) -> CancelHandle {
        let due = match when {
            When::After(delay_ms) => Due::At(self.now_ms() + delay_ms.max(0.0)),
            When::Crossed { bounds, threshold } => Due::Crossed { bounds, threshold },
        };

        let mut queue = self.queue.borrow_mut();
        queue.next_id += 1;
        let id = queue.next_id;
        queue.tasks.push(Task {
            id,
            due,
            callback: Box::new(callback),
        });
        trace!(task = id, ?due, "scheduled");

        CancelHandle {
            id,
            queue: Rc::downgrade(&self.queue),
        }
    }

    /// Run every task whose condition holds. Returns how many fired.
    ///
    /// Callbacks run with the queue unborrowed, so they may schedule or
    /// cancel other tasks; newly ready work runs in the same poll.
    pub fn poll(&self) -> usize {
        let mut fired = 0;

        for _ in 0..MAX_POLL_PASSES {
            let now = self.now_ms();
            let mut ready = {
                let mut queue = self.queue.borrow_mut();
                let viewport = queue.viewport;
                let mut ready = Vec::new();
                let mut waiting = Vec::with_capacity(queue.tasks.len());
                for task in queue.tasks.drain(..) {
                    match task.fire_time(now, &viewport) {
                        Some(at) => ready.push((at, task)),
                        None => waiting.push(task),
                    }
                }
                queue.tasks = waiting;
                ready
            };

            if ready.is_empty() {
                return fired;
            }

            ready.sort_by(|(a, ta), (b, tb)| a.total_cmp(b).then(ta.id.cmp(&tb.id)));
            for (at, task) in ready {
                trace!(task = task.id, at, "firing");
                (task.callback)(at);
                fired += 1;
            }
        }

        warn!(fired, "scheduler poll pass limit reached; deferring remaining work");
        fired
    }

    /// Number of tasks still waiting.
    pub fn pending(&self) -> usize {
        self.queue.borrow().tasks.len()
    }

    /// Number of viewport watches still registered.
    pub fn active_watches(&self) -> usize {
        self.queue
            .borrow()
            .tasks
            .iter()
            .filter(|task| matches!(task.due, Due::Crossed { .. }))
            .count()
    }
}

/// Handle to a scheduled task.
///
/// Dropping the handle does not cancel the task; call [`CancelHandle::cancel`].
#[derive(Debug, Clone)]
pub struct CancelHandle {
    id: u64,
    queue: Weak<RefCell<Queue>>,
}

impl CancelHandle {
    /// Remove the task if it has not fired. Returns `true` if it was removed.
    pub fn cancel(&self) -> bool {
        let Some(queue) = self.queue.upgrade() else {
            return false;
        };
        let mut queue = queue.borrow_mut();
        let before = queue.tasks.len();
        queue.tasks.retain(|task| task.id != self.id);
        let removed = queue.tasks.len() != before;
        if removed {
            trace!(task = self.id, "cancelled");
        }
        removed
    }

    /// True while the task is queued (not fired, not cancelled).
    pub fn is_pending(&self) -> bool {
        self.queue
            .upgrade()
            .is_some_and(|queue| queue.borrow().tasks.iter().any(|task| task.id == self.id))
    }
}
