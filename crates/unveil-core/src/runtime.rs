//! Page-level driver for reveal controllers.
//!
//! [`RevealRuntime`] owns the lifecycle gate, the scheduler, the event queue,
//! and every mounted controller. A host calls [`RevealRuntime::frame`] once
//! per display frame. Each frame runs the layout pass, then due timers and
//! viewport watches, then advances playback.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use tracing::{debug, trace};

use crate::clock::Clock;
use crate::config::RevealConfig;
use crate::controller::{RevealContext, RevealController, SharedSurface};
use crate::events::{EventQueue, RevealEvent};
use crate::gate::LifecycleGate;
use crate::observer::Viewport;
use crate::scheduler::Scheduler;
use crate::types::{ContainerId, ControllerId};

/// What one frame did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameStats {
    /// Timers and watches that fired.
    pub fired: usize,
    /// Controllers still animating after the frame.
    pub animating: usize,
}

pub struct RevealRuntime {
    gate: LifecycleGate,
    context: RevealContext,
    controllers: BTreeMap<ControllerId, RevealController>,
}

impl std::fmt::Debug for RevealRuntime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RevealRuntime")
            .field("gate", &self.gate)
            .field("controllers", &self.controllers.len())
            .finish()
    }
}

impl RevealRuntime {
    pub fn new(clock: Rc<dyn Clock>, surface: SharedSurface, viewport: Viewport) -> Self {
        let gate = LifecycleGate::new();
        let context = RevealContext {
            gate: gate.signal(),
            scheduler: Scheduler::new(clock, viewport),
            surface,
            events: Rc::new(RefCell::new(EventQueue::new())),
        };
        Self {
            gate,
            context,
            controllers: BTreeMap::new(),
        }
    }

    /// Begin the loading sequence; the gate opens `gate_delay_ms` from now.
    pub fn start(&self, gate_delay_ms: f64) {
        self.gate.start(&self.context.scheduler, gate_delay_ms);
    }

    pub fn gate(&self) -> &LifecycleGate {
        &self.gate
    }

    pub fn is_ready(&self) -> bool {
        self.gate.is_ready()
    }

    pub fn context(&self) -> &RevealContext {
        &self.context
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.context.scheduler
    }

    pub fn now_ms(&self) -> f64 {
        self.context.scheduler.now_ms()
    }

    pub fn mount(&mut self, container: ContainerId, config: RevealConfig) -> ControllerId {
        let controller = RevealController::mount(self.context.clone(), container, config);
        let id = controller.id();
        self.controllers.insert(id, controller);
        id
    }

    pub fn controller(&self, id: ControllerId) -> Option<&RevealController> {
        self.controllers.get(&id)
    }

    pub fn controllers(&self) -> impl Iterator<Item = &RevealController> {
        self.controllers.values()
    }

    pub fn len(&self) -> usize {
        self.controllers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.controllers.is_empty()
    }

    pub fn reconfigure(&self, id: ControllerId, config: RevealConfig) -> bool {
        self.controllers
            .get(&id)
            .is_some_and(|controller| controller.reconfigure(config))
    }

    /// Tear a controller down and forget it.
    pub fn unmount(&mut self, id: ControllerId) -> bool {
        match self.controllers.remove(&id) {
            Some(controller) => {
                controller.unmount();
                true
            }
            None => false,
        }
    }

    /// Tear every controller down, as on navigation. Returns how many.
    pub fn unmount_all(&mut self) -> usize {
        let count = self.controllers.len();
        for controller in std::mem::take(&mut self.controllers).into_values() {
            controller.unmount();
        }
        if count > 0 {
            debug!(count, "all reveals unmounted");
        }
        count
    }

    pub fn viewport(&self) -> Viewport {
        self.context.scheduler.viewport()
    }

    /// Scroll the document. Scrolling is locked until the gate opens; returns
    /// `false` when the request was refused.
    pub fn scroll_to(&self, scroll_y: f64) -> bool {
        if !self.gate.is_ready() {
            trace!(scroll_y, "scroll locked while loading");
            return false;
        }
        let viewport = self.viewport().scrolled_to(scroll_y);
        self.context.scheduler.set_viewport(viewport);
        true
    }

    pub fn scroll_by(&self, delta: f64) -> bool {
        self.scroll_to(self.viewport().scroll_y + delta)
    }

    /// Change the viewport size. Every controller re-segments on the next
    /// frame.
    pub fn resize(&self, width: f64, height: f64) {
        let mut viewport = self.viewport();
        viewport.width = width;
        viewport.height = height;
        self.context.scheduler.set_viewport(viewport);
        self.invalidate_layout();
    }

    /// Schedule re-segmentation of every controller (fonts loaded, content
    /// reflowed).
    pub fn invalidate_layout(&self) {
        for controller in self.controllers.values() {
            controller.invalidate_layout();
        }
    }

    pub fn frame(&self) -> FrameStats {
        for controller in self.controllers.values() {
            controller.layout();
        }

        let fired = self.context.scheduler.poll();

        let now = self.now_ms();
        let mut animating = 0;
        for controller in self.controllers.values() {
            controller.tick(now);
            if controller.is_playing() {
                animating += 1;
            }
        }

        FrameStats { fired, animating }
    }

    /// True once nothing can happen without outside input: the gate is open,
    /// no timers are queued and nothing is animating. Scroll watches may
    /// still be waiting.
    pub fn is_settled(&self) -> bool {
        self.gate.is_ready()
            && self.context.scheduler.pending() == self.context.scheduler.active_watches()
            && self.controllers.values().all(|c| !c.is_playing() && !c.needs_layout())
    }

    pub fn drain_events(&self) -> Vec<RevealEvent> {
        self.context.events.borrow_mut().drain().collect()
    }
}

impl Drop for RevealRuntime {
    fn drop(&mut self) {
        self.unmount_all();
        self.gate.cancel();
    }
}
