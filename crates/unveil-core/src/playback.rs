//! Staggered playback of reveal units.
//!
//! A [`Playback`] is created when a trigger fires and sampled once per frame.
//! Unit *i* starts `stagger × i` after the playback's start and runs for
//! `duration`, so the whole run spans `duration + stagger × (n − 1)`.
//!
//! ```text
//! unit 0  |==========|
//! unit 1     |==========|
//! unit 2        |==========|
//!         ^ start          ^ start + total_duration_ms()
//! ```

use crate::config::RevealConfig;
use crate::easing::Easing;
use crate::types::{Interpolate, SegmentId, VisualState};

/// One independently animated piece of content.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RevealUnit {
    pub segment: SegmentId,
    /// Position in the stagger sequence.
    pub order: usize,
    pub hidden: VisualState,
    pub visible: VisualState,
}

/// Lifecycle of a playback run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    Running,
    /// Every unit reached progress 1.
    Finished,
    /// Halted before finishing; units keep whatever state they last had.
    Cancelled,
}

/// Sampled state of one unit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitFrame {
    pub segment: SegmentId,
    /// Linear progress in [0, 1].
    pub progress: f32,
    pub state: VisualState,
}

/// A single run of a controller's units from hidden to visible.
#[derive(Debug, Clone)]
pub struct Playback {
    units: Vec<RevealUnit>,
    progress: Vec<f32>,
    started_at: f64,
    duration_ms: f64,
    stagger_ms: f64,
    easing: Easing,
    state: PlaybackState,
}

impl Playback {
    /// Start a run at `started_at`. Units are sorted by `order`.
    pub fn new(mut units: Vec<RevealUnit>, config: &RevealConfig, started_at: f64) -> Self {
        units.sort_by_key(|unit| unit.order);
        let state = if units.is_empty() {
            PlaybackState::Finished
        } else {
            PlaybackState::Running
        };
        Self {
            progress: vec![0.0; units.len()],
            units,
            started_at,
            duration_ms: config.duration_ms.max(0.0),
            stagger_ms: config.stagger_ms.max(0.0),
            easing: config.easing,
            state,
        }
    }

    pub fn started_at(&self) -> f64 {
        self.started_at
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn unit_count(&self) -> usize {
        self.units.len()
    }

    /// Start offset of the unit at position `index`.
    pub fn unit_offset_ms(&self, index: usize) -> f64 {
        self.stagger_ms * index as f64
    }

    /// Time from start until the last unit finishes.
    pub fn total_duration_ms(&self) -> f64 {
        match self.units.len() {
            0 => 0.0,
            n => self.duration_ms + self.stagger_ms * (n - 1) as f64,
        }
    }

    /// Progress of the unit at position `index`.
    pub fn progress(&self, index: usize) -> Option<f32> {
        self.progress.get(index).copied()
    }

    pub fn is_active(&self) -> bool {
        self.state == PlaybackState::Running
    }

    /// True only once every unit reached progress 1.
    pub fn has_played(&self) -> bool {
        self.state == PlaybackState::Finished
    }

    /// Halt in place. Has no effect on a finished run.
    pub fn cancel(&mut self) {
        if self.state == PlaybackState::Running {
            self.state = PlaybackState::Cancelled;
        }
    }

    /// Swap in re-segmented units (after a relayout) keeping the run's timing.
    pub fn replace_units(&mut self, mut units: Vec<RevealUnit>) {
        units.sort_by_key(|unit| unit.order);
        self.progress = vec![0.0; units.len()];
        self.units = units;
    }

    /// Advance to `now` and return every unit's state.
    ///
    /// Progress never moves backwards, even if `now` does. A cancelled or
    /// finished run returns its last frame unchanged.
    pub fn sample(&mut self, now: f64) -> Vec<UnitFrame> {
        if self.state == PlaybackState::Running {
            let elapsed = now - self.started_at;
            for (index, progress) in self.progress.iter_mut().enumerate() {
                let local = elapsed - self.stagger_ms * index as f64;
                let linear = if self.duration_ms > 0.0 {
                    (local / self.duration_ms).clamp(0.0, 1.0) as f32
                } else if local >= 0.0 {
                    1.0
                } else {
                    0.0
                };
                *progress = progress.max(linear);
            }
            if self.progress.iter().all(|p| *p >= 1.0) {
                self.state = PlaybackState::Finished;
            }
        }

        self.units
            .iter()
            .zip(&self.progress)
            .map(|(unit, &progress)| UnitFrame {
                segment: unit.segment,
                progress,
                state: unit
                    .hidden
                    .interpolate(&unit.visible, self.easing.evaluate(progress)),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn units(count: usize) -> Vec<RevealUnit> {
        (0..count)
            .map(|order| RevealUnit {
                segment: SegmentId(order as u64 + 1),
                order,
                hidden: VisualState::HIDDEN,
                visible: VisualState::VISIBLE,
            })
            .collect()
    }

    fn linear(duration_ms: f64, stagger_ms: f64) -> RevealConfig {
        RevealConfig::mount()
            .with_duration(duration_ms)
            .with_stagger(stagger_ms)
            .with_easing(Easing::Linear)
    }

    #[test]
    fn stagger_offsets_and_total_span() {
        let playback = Playback::new(units(3), &linear(1000.0, 100.0), 0.0);
        assert_eq!(playback.unit_offset_ms(0), 0.0);
        assert_eq!(playback.unit_offset_ms(1), 100.0);
        assert_eq!(playback.unit_offset_ms(2), 200.0);
        assert_eq!(playback.total_duration_ms(), 1200.0);
    }

    #[test]
    fn units_start_in_order() {
        let mut playback = Playback::new(units(3), &linear(1000.0, 100.0), 0.0);

        let frames = playback.sample(150.0);
        assert!((frames[0].progress - 0.15).abs() < 1e-6);
        assert!((frames[1].progress - 0.05).abs() < 1e-6);
        assert_eq!(frames[2].progress, 0.0);
        assert_eq!(frames[2].state, VisualState::HIDDEN);

        playback.sample(1199.0);
        assert!(playback.is_active(), "last unit still short of 1");

        let frames = playback.sample(1200.0);
        assert!(playback.has_played());
        assert!(frames.iter().all(|f| f.state.is_visible()));
    }

    #[test]
    fn progress_is_monotonic() {
        let mut playback = Playback::new(units(1), &linear(100.0, 0.0), 0.0);
        playback.sample(60.0);
        let frames = playback.sample(20.0);
        assert!((frames[0].progress - 0.6).abs() < 1e-6);
    }

    #[test]
    fn cancel_halts_in_place() {
        let mut playback = Playback::new(units(2), &linear(100.0, 50.0), 0.0);
        let before = playback.sample(50.0);
        playback.cancel();
        let after = playback.sample(500.0);

        assert_eq!(playback.state(), PlaybackState::Cancelled);
        assert!(!playback.has_played());
        assert_eq!(before, after);
    }

    #[test]
    fn finished_run_ignores_cancel() {
        let mut playback = Playback::new(units(1), &linear(10.0, 0.0), 0.0);
        playback.sample(10.0);
        playback.cancel();
        assert!(playback.has_played());
    }

    #[test]
    fn empty_run_is_already_finished() {
        let mut playback = Playback::new(Vec::new(), &linear(1000.0, 100.0), 0.0);
        assert!(playback.has_played());
        assert_eq!(playback.total_duration_ms(), 0.0);
        assert!(playback.sample(0.0).is_empty());
    }

    #[test]
    fn zero_duration_snaps_at_offset() {
        let mut playback = Playback::new(units(2), &linear(0.0, 100.0), 0.0);
        let frames = playback.sample(0.0);
        assert_eq!(frames[0].progress, 1.0);
        assert_eq!(frames[1].progress, 0.0);
        playback.sample(100.0);
        assert!(playback.has_played());
    }
}
