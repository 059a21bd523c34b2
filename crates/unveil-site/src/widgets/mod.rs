//! Interactive page widgets.
//!
//! Each widget is a small state machine driven by pointer, keyboard and time
//! inputs. Time is always passed in as milliseconds so widgets share the
//! reveal runtime's clock.

pub mod accordion;
pub mod dropdown;
pub mod magnetic;
pub mod modal;
pub mod orbit;

pub use accordion::{Accordion, FaqItem};
pub use dropdown::{Dropdown, MenuBar, MenuItem};
pub use magnetic::MagneticButton;
pub use modal::{Modal, ScrollLock, ScrollLockGuard};
pub use orbit::Orbit;

/// Keys widgets react to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Escape,
    Enter,
    Other,
}

/// A position in page coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn length(self) -> f32 {
        self.x.hypot(self.y)
    }

    pub fn scale(self, factor: f32) -> Self {
        Self::new(self.x * factor, self.y * factor)
    }
}

impl std::ops::Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl std::ops::Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}
