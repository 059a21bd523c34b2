//! Reveal controller: one per revealed element.
//!
//! ```text
//!   mount ──► Idle ──(gate open)──► Armed ──(timer / watch fires)──► playing ──► Played
//!               │                     │                                  │
//!               └──────── unmount / reconfigure: release everything ◄────┘
//! ```
//!
//! The controller never touches the surface during mount. Segmentation runs
//! in [`RevealController::layout`], which the runtime calls after layout, and
//! the trigger arms only once the lifecycle gate is open. Triggers that fire
//! again after playback began are ignored. Setup failures never propagate:
//! the content is shown without animation instead.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace, warn};

use crate::cleanup::{Released, Teardown};
use crate::config::{RevealConfig, Trigger};
use crate::error::{RevealError, Result};
use crate::events::{EventQueue, RevealEvent};
use crate::gate::GateSignal;
use crate::observer::ElementBounds;
use crate::playback::{Playback, RevealUnit};
use crate::scheduler::{CancelHandle, Scheduler, When};
use crate::segment::decompose;
use crate::surface::Surface;
use crate::types::{ContainerId, ControllerId};

pub type SharedSurface = Rc<RefCell<dyn Surface>>;
pub type SharedEvents = Rc<RefCell<EventQueue>>;

/// Everything a controller depends on, injected at construction.
#[derive(Clone)]
pub struct RevealContext {
    pub gate: GateSignal,
    pub scheduler: Scheduler,
    pub surface: SharedSurface,
    pub events: SharedEvents,
}

impl std::fmt::Debug for RevealContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RevealContext")
            .field("gate", &self.gate)
            .field("scheduler", &self.scheduler)
            .finish_non_exhaustive()
    }
}

/// Trigger state of a controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RevealPhase {
    /// Waiting for layout or for the lifecycle gate.
    Idle,
    /// Timer or viewport watch registered; playback may be running.
    Armed,
    /// Content is fully shown. Terminal for this mount.
    Played,
}

struct ControllerState {
    config: RevealConfig,
    phase: RevealPhase,
    needs_layout: bool,
    bounds: ElementBounds,
    units: Vec<RevealUnit>,
    playback: Option<Playback>,
    trigger_task: Option<CancelHandle>,
    teardown: Teardown,
    unmounted: bool,
}

impl ControllerState {
    fn new(config: RevealConfig) -> Self {
        Self {
            config,
            phase: RevealPhase::Idle,
            needs_layout: true,
            bounds: ElementBounds::default(),
            units: Vec::new(),
            playback: None,
            trigger_task: None,
            teardown: Teardown::new(),
            unmounted: false,
        }
    }
}

struct Inner {
    id: ControllerId,
    container: ContainerId,
    ctx: RevealContext,
    state: RefCell<ControllerState>,
}

/// Owns one element's reveal from mount to teardown.
///
/// Dropping the controller unmounts it.
pub struct RevealController {
    inner: Rc<Inner>,
}

impl std::fmt::Debug for RevealController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RevealController")
            .field("id", &self.inner.id)
            .field("container", &self.inner.container)
            .field("phase", &self.phase())
            .finish()
    }
}

impl RevealController {
    /// Create a controller for `container`. Nothing is measured or scheduled
    /// until the first [`layout`](Self::layout).
    pub fn mount(ctx: RevealContext, container: ContainerId, config: RevealConfig) -> Self {
        let id = ControllerId::next();
        debug!(controller = id.0, container = container.0, trigger = ?config.trigger, "reveal mounted");
        Self {
            inner: Rc::new(Inner {
                id,
                container,
                ctx,
                state: RefCell::new(ControllerState::new(config)),
            }),
        }
    }

    pub fn id(&self) -> ControllerId {
        self.inner.id
    }

    pub fn container(&self) -> ContainerId {
        self.inner.container
    }

    pub fn phase(&self) -> RevealPhase {
        self.inner.state.borrow().phase
    }

    pub fn has_played(&self) -> bool {
        self.phase() == RevealPhase::Played
    }

    pub fn is_playing(&self) -> bool {
        self.inner
            .state
            .borrow()
            .playback
            .as_ref()
            .is_some_and(Playback::is_active)
    }

    /// Start time of this mount's playback, if one began.
    pub fn started_at(&self) -> Option<f64> {
        self.inner
            .state
            .borrow()
            .playback
            .as_ref()
            .map(Playback::started_at)
    }

    pub fn unit_count(&self) -> usize {
        self.inner.state.borrow().units.len()
    }

    pub fn config(&self) -> RevealConfig {
        self.inner.state.borrow().config.clone()
    }

    pub fn needs_layout(&self) -> bool {
        self.inner.state.borrow().needs_layout
    }

    pub fn is_mounted(&self) -> bool {
        !self.inner.state.borrow().unmounted
    }

    /// Segment the container and arm the trigger if the gate is open.
    /// Does nothing unless a layout is pending.
    pub fn layout(&self) {
        Inner::layout(&self.inner);
    }

    /// Force segmentation to run again on the next layout pass (resize,
    /// font load). Armed and played state are kept.
    pub fn invalidate_layout(&self) {
        let mut state = self.inner.state.borrow_mut();
        if !state.unmounted {
            state.needs_layout = true;
        }
    }

    /// Fire the trigger now. Ignored unless the controller is armed and has
    /// not started playing.
    pub fn fire(&self) {
        let now = self.inner.ctx.scheduler.now_ms();
        self.inner.begin(now);
    }

    /// Advance playback to `now` and push unit states to the surface.
    pub fn tick(&self, now: f64) {
        self.inner.tick(now);
    }

    /// Replace the configuration. A different configuration is treated as a
    /// new controller: full release, then setup from `Idle` on the next
    /// layout pass. Returns `false` if nothing changed.
    pub fn reconfigure(&self, config: RevealConfig) -> bool {
        {
            let state = self.inner.state.borrow();
            if state.unmounted || state.config == config {
                return false;
            }
        }
        self.inner.release();
        debug!(controller = self.inner.id.0, "reveal reconfigured");
        *self.inner.state.borrow_mut() = ControllerState::new(config);
        true
    }

    /// Release everything and stop reacting to triggers. Idempotent.
    pub fn unmount(&self) {
        if self.inner.state.borrow().unmounted {
            return;
        }
        self.inner.release();
        let mut state = self.inner.state.borrow_mut();
        state.unmounted = true;
        state.needs_layout = false;
        debug!(controller = self.inner.id.0, "reveal unmounted");
    }
}

impl Drop for RevealController {
    fn drop(&mut self) {
        self.unmount();
    }
}

impl Inner {
    fn emit(&self, event: RevealEvent) {
        self.ctx.events.borrow_mut().push(event);
    }

    fn layout(self: &Rc<Self>) {
        {
            let state = self.state.borrow();
            if state.unmounted || !state.needs_layout {
                return;
            }
        }

        match self.prepare() {
            Ok(()) => {
                self.rearm_watch();
                self.arm_when_ready();
            }
            Err(err) => self.fail_open(err),
        }
    }

    /// Split the container into units and put them in their starting state.
    fn prepare(&self) -> Result<()> {
        let mut guard = self.state.borrow_mut();
        let state = &mut *guard;
        state.config.validate()?;

        let units = {
            let mut surface = self.ctx.surface.borrow_mut();
            if state.teardown.is_decomposed() {
                surface.revert(self.container);
            }
            let layout = surface.measure(self.container)?;
            let specs = decompose(&layout, surface.text_measure());
            let segments = surface.split(self.container, &specs)?;
            state.teardown.mark_decomposed(self.container);
            state.bounds = layout.bounds;

            let units: Vec<RevealUnit> = segments
                .into_iter()
                .enumerate()
                .map(|(order, segment)| RevealUnit {
                    segment,
                    order,
                    hidden: state.config.hidden,
                    visible: state.config.visible,
                })
                .collect();

            let settled = state.phase == RevealPhase::Played;
            for unit in &units {
                let start = if settled { unit.visible } else { unit.hidden };
                surface.apply(unit.segment, start);
            }
            // Units are hidden before the container shows, so the assembled
            // content never flashes.
            surface.set_container_visible(self.container, true);
            units
        };

        if let Some(playback) = state.playback.as_mut().filter(|p| p.is_active()) {
            playback.replace_units(units.clone());
        }
        let count = units.len();
        state.units = units;
        state.needs_layout = false;
        drop(guard);

        trace!(controller = self.id.0, units = count, "reveal prepared");
        self.emit(RevealEvent::Prepared {
            controller: self.id,
            container: self.container,
            units: count,
        });
        Ok(())
    }

    fn arm_when_ready(self: &Rc<Self>) {
        {
            let state = self.state.borrow();
            if state.phase != RevealPhase::Idle || state.teardown.is_waiting_on_gate() {
                return;
            }
        }

        if self.ctx.gate.is_ready() {
            self.arm();
            return;
        }

        let weak = Rc::downgrade(self);
        let subscription = self.ctx.gate.subscribe(move || {
            if let Some(inner) = Weak::upgrade(&weak) {
                inner.arm();
            }
        });
        self.state.borrow_mut().teardown.track_gate(subscription);
        trace!(controller = self.id.0, "waiting for lifecycle gate");
    }

    fn arm(self: &Rc<Self>) {
        let when = {
            let mut state = self.state.borrow_mut();
            if state.unmounted || state.phase != RevealPhase::Idle {
                return;
            }
            state.phase = RevealPhase::Armed;
            trigger_condition(&state)
        };
        self.schedule_trigger(when);
        self.emit(RevealEvent::Armed {
            controller: self.id,
        });
        debug!(controller = self.id.0, ?when, "reveal armed");
    }

    /// Re-register a scroll watch after relayout moved the element.
    fn rearm_watch(self: &Rc<Self>) {
        let when = {
            let mut state = self.state.borrow_mut();
            let waiting = state.phase == RevealPhase::Armed
                && state.playback.is_none()
                && state.config.trigger == Trigger::Scroll;
            if !waiting {
                return;
            }
            if let Some(task) = state.trigger_task.take() {
                task.cancel();
            }
            trigger_condition(&state)
        };
        self.schedule_trigger(when);
    }

    fn schedule_trigger(self: &Rc<Self>, when: When) {
        let weak = Rc::downgrade(self);
        let handle = self.ctx.scheduler.schedule(when, move |at| {
            if let Some(inner) = Weak::upgrade(&weak) {
                inner.begin(at);
            }
        });
        let mut state = self.state.borrow_mut();
        state.teardown.track_task(handle.clone());
        state.trigger_task = Some(handle);
    }

    fn begin(&self, at: f64) {
        let mut state = self.state.borrow_mut();
        if state.unmounted || state.phase != RevealPhase::Armed || state.playback.is_some() {
            trace!(controller = self.id.0, "trigger ignored");
            return;
        }
        if !self.ctx.gate.is_ready() {
            return;
        }
        if let Some(task) = state.trigger_task.take() {
            task.cancel();
        }

        let playback = Playback::new(state.units.clone(), &state.config, at);
        let units = playback.unit_count();
        state.playback = Some(playback);
        drop(state);

        info!(controller = self.id.0, units, at_ms = at, "reveal started");
        self.emit(RevealEvent::Started {
            controller: self.id,
            at_ms: at,
        });
    }

    fn tick(&self, now: f64) {
        let mut state = self.state.borrow_mut();
        let Some(playback) = state.playback.as_mut() else {
            return;
        };

        if playback.is_active() {
            let frames = playback.sample(now);
            let mut surface = self.ctx.surface.borrow_mut();
            for frame in &frames {
                surface.apply(frame.segment, frame.state);
            }
        }

        if playback.has_played() && state.phase != RevealPhase::Played {
            state.phase = RevealPhase::Played;
            drop(state);
            info!(controller = self.id.0, at_ms = now, "reveal completed");
            self.emit(RevealEvent::Completed {
                controller: self.id,
                at_ms: now,
            });
        }
    }

    fn release(&self) -> Released {
        let mut state = self.state.borrow_mut();
        let halted = match state.playback.as_mut() {
            Some(playback) if playback.is_active() => {
                playback.cancel();
                true
            }
            _ => false,
        };
        state.trigger_task = None;
        state.units.clear();
        let released = state
            .teardown
            .release(&mut *self.ctx.surface.borrow_mut());
        drop(state);

        if halted {
            self.emit(RevealEvent::Cancelled {
                controller: self.id,
            });
        }
        if !released.is_noop() {
            trace!(controller = self.id.0, ?released, "reveal released");
            self.emit(RevealEvent::Released {
                controller: self.id,
                cancelled_tasks: released.cancelled,
            });
        }
        released
    }

    fn fail_open(&self, err: RevealError) {
        warn!(
            controller = self.id.0,
            container = self.container.0,
            error = %err,
            "reveal setup failed; showing content without animation"
        );
        self.release();
        self.ctx
            .surface
            .borrow_mut()
            .reveal_immediately(self.container);

        let mut state = self.state.borrow_mut();
        state.phase = RevealPhase::Played;
        state.needs_layout = false;
        drop(state);

        self.emit(RevealEvent::FailedOpen {
            controller: self.id,
            reason: err.to_string(),
        });
    }
}

fn trigger_condition(state: &ControllerState) -> When {
    match state.config.trigger {
        Trigger::Mount => When::After(state.config.delay_ms),
        Trigger::Scroll => When::Crossed {
            bounds: state.bounds,
            threshold: state.config.scroll_threshold,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::gate::LifecycleGate;
    use crate::observer::Viewport;
    use crate::surface::MemorySurface;
    use crate::types::VisualState;

    struct Harness {
        clock: ManualClock,
        gate: LifecycleGate,
        surface: Rc<RefCell<MemorySurface>>,
        ctx: RevealContext,
    }

    impl Harness {
        fn new() -> Self {
            let clock = ManualClock::new();
            let gate = LifecycleGate::new();
            let surface = Rc::new(RefCell::new(MemorySurface::default()));
            let ctx = RevealContext {
                gate: gate.signal(),
                scheduler: Scheduler::new(Rc::new(clock.clone()), Viewport::new(1000.0, 800.0)),
                surface: surface.clone(),
                events: Rc::new(RefCell::new(EventQueue::new())),
            };
            Self {
                clock,
                gate,
                surface,
                ctx,
            }
        }

        fn text(&self, top: f64, text: &str) -> ContainerId {
            self.surface
                .borrow_mut()
                .insert_text(ElementBounds::new(top, 40.0), 60.0, text)
        }

        fn step(&self, controller: &RevealController, ms: f64) {
            self.clock.advance(ms);
            controller.layout();
            self.ctx.scheduler.poll();
            controller.tick(self.ctx.scheduler.now_ms());
        }
    }

    #[test]
    fn closed_gate_blocks_playback() {
        let h = Harness::new();
        let container = h.text(0.0, "Hello World");
        let controller = RevealController::mount(h.ctx.clone(), container, RevealConfig::mount());

        h.step(&controller, 0.0);
        assert_eq!(controller.unit_count(), 2);
        controller.fire();
        h.step(&controller, 10_000.0);

        assert_eq!(controller.phase(), RevealPhase::Idle);
        assert!(controller.started_at().is_none());
        let surface = h.surface.borrow();
        for segment in surface.segments(container) {
            assert_eq!(surface.segment_state(segment), Some(VisualState::HIDDEN));
        }
    }

    #[test]
    fn mount_path_arms_on_gate_open_and_plays_once() {
        let h = Harness::new();
        let container = h.text(0.0, "Hello World");
        let controller = RevealController::mount(
            h.ctx.clone(),
            container,
            RevealConfig::mount().with_duration(100.0).with_stagger(0.0),
        );

        h.step(&controller, 0.0);
        h.gate.open();
        assert_eq!(controller.phase(), RevealPhase::Armed);

        h.step(&controller, 50.0);
        controller.fire();
        controller.fire();
        h.step(&controller, 100.0);

        assert!(controller.has_played());
        assert_eq!(controller.started_at(), Some(0.0));
        assert!(h.surface.borrow().is_fully_shown(container));
    }

    #[test]
    fn detached_container_fails_open() {
        let h = Harness::new();
        let container = h.text(0.0, "Hello");
        h.surface.borrow_mut().detach(container);
        let controller = RevealController::mount(h.ctx.clone(), container, RevealConfig::mount());

        h.step(&controller, 0.0);
        assert!(controller.has_played());
        let failed = h
            .ctx
            .events
            .borrow()
            .for_controller(controller.id())
            .iter()
            .any(|event| matches!(event, RevealEvent::FailedOpen { .. }));
        assert!(failed);
    }

    #[test]
    fn invalid_config_fails_open_with_content_visible() {
        let h = Harness::new();
        let container = h.text(0.0, "Hello");
        let controller = RevealController::mount(
            h.ctx.clone(),
            container,
            RevealConfig::mount().with_duration(-5.0),
        );

        h.step(&controller, 0.0);
        assert!(controller.has_played());
        assert!(h.surface.borrow().is_fully_shown(container));
    }

    #[test]
    fn unmount_is_idempotent_and_stops_triggers() {
        let h = Harness::new();
        h.gate.open();
        let container = h.text(0.0, "Hello");
        let controller = RevealController::mount(
            h.ctx.clone(),
            container,
            RevealConfig::mount().with_delay(500.0),
        );
        h.step(&controller, 0.0);
        assert_eq!(h.ctx.scheduler.pending(), 1);

        controller.unmount();
        controller.unmount();
        assert_eq!(h.ctx.scheduler.pending(), 0);

        h.step(&controller, 1000.0);
        assert_eq!(controller.phase(), RevealPhase::Armed);
        assert!(controller.started_at().is_none());
        assert!(!controller.is_mounted());
    }

    #[test]
    fn reconfigure_resets_to_idle() {
        let h = Harness::new();
        h.gate.open();
        let container = h.text(0.0, "Hello");
        let config = RevealConfig::mount().with_duration(10.0);
        let controller = RevealController::mount(h.ctx.clone(), container, config.clone());
        h.step(&controller, 0.0);
        h.step(&controller, 10.0);
        assert!(controller.has_played());

        assert!(!controller.reconfigure(config));
        assert!(controller.reconfigure(RevealConfig::mount().with_duration(20.0)));
        assert_eq!(controller.phase(), RevealPhase::Idle);
        assert!(controller.needs_layout());
        assert!(h.surface.borrow().segments(container).is_empty());
    }
}
