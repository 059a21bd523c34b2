//! Load- and scroll-triggered content reveals.
//!
//! This crate provides:
//! - **Lifecycle gate**: a once-per-session "page ready" signal that holds every reveal back
//! - **Segmentation**: splitting text into rendered lines and containers into child blocks
//! - **Triggers**: mount timers and scroll-threshold watches on a deterministic scheduler
//! - **Playback**: staggered, eased hidden-to-visible animation of each unit
//! - **Teardown**: one-call release of timers, watches, listeners and surface wrappers
//!
//! # Architecture
//!
//! ```text
//! RevealRuntime
//!   ├── LifecycleGate ──signal──► GateSignal (read-only, one per controller)
//!   ├── Scheduler (Clock + Viewport)
//!   │     ├── When::After(ms)        mount trigger, gate timer
//!   │     └── When::Crossed{..}      scroll trigger
//!   └── RevealController (per element)
//!         ├── decompose ──► Surface::split ──► RevealUnit[]
//!         ├── Playback (stagger + easing) ──► Surface::apply
//!         └── Teardown
//! ```
//!
//! Nothing here depends on a real renderer or wall clock: hosts implement
//! [`Surface`] and [`Clock`], and tests drive [`ManualClock`] with
//! [`MemorySurface`].

pub mod cleanup;
pub mod clock;
pub mod config;
pub mod controller;
pub mod easing;
pub mod error;
pub mod events;
pub mod gate;
pub mod observer;
pub mod playback;
pub mod runtime;
pub mod scheduler;
pub mod segment;
pub mod surface;
pub mod types;

pub use cleanup::{Released, Teardown};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{RevealConfig, Trigger};
pub use controller::{RevealContext, RevealController, RevealPhase, SharedEvents, SharedSurface};
pub use easing::Easing;
pub use error::{Result, RevealError};
pub use events::{EventQueue, RevealEvent};
pub use gate::{GateSignal, GateSubscription, LifecycleGate};
pub use observer::{ElementBounds, ScrollEdge, ScrollThreshold, Viewport};
pub use playback::{Playback, PlaybackState, RevealUnit, UnitFrame};
pub use runtime::{FrameStats, RevealRuntime};
pub use scheduler::{CancelHandle, Scheduler, When};
pub use segment::{
    break_lines, decompose, Content, ContainerLayout, MonospaceMeasure, SegmentSpec, TextMeasure,
};
pub use surface::{MemorySurface, Surface};
pub use types::{ContainerId, ControllerId, Interpolate, SegmentId, VisualState};
