//! Core identifiers and visual state.
//!
//! - `ControllerId`: unique per mounted reveal controller
//! - `ContainerId` / `SegmentId`: handles issued by a [`Surface`](crate::surface::Surface)
//! - `VisualState`: the opacity/offset pair a reveal unit animates between

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// Unique identifier for a reveal controller instance.
///
/// A remount always gets a fresh id, so nothing keyed by id survives across
/// mounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ControllerId(pub u64);

impl ControllerId {
    /// Allocate the next controller id.
    pub fn next() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(1);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

/// Handle to a content container on a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ContainerId(pub u64);

/// Handle to one segment (line or block) produced by splitting a container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SegmentId(pub u64);

/// Opacity and vertical offset of a reveal unit.
///
/// `translate_y` is a percentage of the unit's own height. Lines sit inside a
/// clipping wrapper, so `translate_y = 100` is fully below the clip edge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VisualState {
    pub opacity: f32,
    pub translate_y: f32,
}

impl VisualState {
    /// Hidden below the clip edge.
    pub const HIDDEN: Self = Self {
        opacity: 0.0,
        translate_y: 100.0,
    };

    /// Resting, fully visible.
    pub const VISIBLE: Self = Self {
        opacity: 1.0,
        translate_y: 0.0,
    };

    pub fn new(opacity: f32, translate_y: f32) -> Self {
        Self {
            opacity,
            translate_y,
        }
    }

    /// True when the state is indistinguishable from [`VisualState::VISIBLE`].
    pub fn is_visible(&self) -> bool {
        (self.opacity - 1.0).abs() < f32::EPSILON && self.translate_y.abs() < f32::EPSILON
    }
}

impl Default for VisualState {
    fn default() -> Self {
        Self::VISIBLE
    }
}

/// Types that can be blended between two values.
pub trait Interpolate: Sized {
    /// Blend from `self` towards `to`; `t = 0` is `self`, `t = 1` is `to`.
    fn interpolate(&self, to: &Self, t: f32) -> Self;
}

impl Interpolate for f32 {
    #[inline]
    fn interpolate(&self, to: &Self, t: f32) -> Self {
        self + (to - self) * t
    }
}

impl Interpolate for VisualState {
    fn interpolate(&self, to: &Self, t: f32) -> Self {
        Self {
            opacity: self.opacity.interpolate(&to.opacity, t),
            translate_y: self.translate_y.interpolate(&to.translate_y, t),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn controller_ids_are_unique() {
        let a = ControllerId::next();
        let b = ControllerId::next();
        assert_ne!(a, b);
        assert!(b > a);
    }

    #[test]
    fn visual_state_interpolates_both_channels() {
        let mid = VisualState::HIDDEN.interpolate(&VisualState::VISIBLE, 0.5);
        assert!((mid.opacity - 0.5).abs() < 1e-6);
        assert!((mid.translate_y - 50.0).abs() < 1e-6);

        let end = VisualState::HIDDEN.interpolate(&VisualState::VISIBLE, 1.0);
        assert!(end.is_visible());
        assert!(!VisualState::HIDDEN.is_visible());
    }
}
