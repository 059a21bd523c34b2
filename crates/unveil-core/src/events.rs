//! Reveal lifecycle events.
//!
//! Controllers push events into a shared [`EventQueue`]; the runtime drains it
//! after each frame.
//!
//! ```ignore
//! runtime.frame();
//! for event in runtime.drain_events() {
//!     if let RevealEvent::Completed { controller, .. } = event {
//!         println!("{controller:?} finished");
//!     }
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use crate::types::{ContainerId, ControllerId};

/// Something that happened to a reveal controller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RevealEvent {
    /// Units were created and set to their hidden state.
    Prepared {
        controller: ControllerId,
        container: ContainerId,
        units: usize,
    },
    /// The trigger is armed (timer or viewport watch registered).
    Armed { controller: ControllerId },
    /// Playback started.
    Started { controller: ControllerId, at_ms: f64 },
    /// Every unit reached its visible state.
    Completed { controller: ControllerId, at_ms: f64 },
    /// In-flight playback was halted by teardown.
    Cancelled { controller: ControllerId },
    /// Setup failed and the content was shown without animation.
    FailedOpen {
        controller: ControllerId,
        reason: String,
    },
    /// Wrappers were removed and pending work released.
    Released {
        controller: ControllerId,
        cancelled_tasks: usize,
    },
}

impl RevealEvent {
    pub fn controller(&self) -> ControllerId {
        match self {
            Self::Prepared { controller, .. }
            | Self::Armed { controller }
            | Self::Started { controller, .. }
            | Self::Completed { controller, .. }
            | Self::Cancelled { controller }
            | Self::FailedOpen { controller, .. }
            | Self::Released { controller, .. } => *controller,
        }
    }

    pub fn is_started(&self) -> bool {
        matches!(self, Self::Started { .. })
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed { .. })
    }
}

/// FIFO of pending events.
#[derive(Debug, Default)]
pub struct EventQueue {
    events: VecDeque<RevealEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: RevealEvent) {
        self.events.push_back(event);
    }

    pub fn drain(&mut self) -> impl Iterator<Item = RevealEvent> + '_ {
        self.events.drain(..)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Events for one controller, oldest first, without removing them.
    pub fn for_controller(&self, controller: ControllerId) -> Vec<&RevealEvent> {
        self.events
            .iter()
            .filter(|event| event.controller() == controller)
            .collect()
    }
}
