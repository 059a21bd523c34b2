//! Icons circling a centre point.

use std::f64::consts::TAU;

use super::Point;

/// `count` icons spaced evenly on a circle, completing one turn every
/// `period_ms`. Positions depend only on time.
#[derive(Debug, Clone, PartialEq)]
pub struct Orbit {
    pub centre: Point,
    pub radius: f32,
    pub count: usize,
    pub period_ms: f64,
}

impl Orbit {
    pub fn new(centre: Point, radius: f32, count: usize, period_ms: f64) -> Self {
        Self {
            centre,
            radius,
            count,
            period_ms,
        }
    }

    /// Angle of icon `index` at `now_ms`, in radians.
    pub fn angle(&self, index: usize, now_ms: f64) -> f64 {
        let spacing = TAU * index as f64 / self.count.max(1) as f64;
        let turn = if self.period_ms > 0.0 {
            TAU * (now_ms / self.period_ms).fract()
        } else {
            0.0
        };
        (spacing + turn) % TAU
    }

    pub fn position(&self, index: usize, now_ms: f64) -> Point {
        let angle = self.angle(index, now_ms);
        self.centre
            + Point::new(
                (angle.cos() * self.radius as f64) as f32,
                (angle.sin() * self.radius as f64) as f32,
            )
    }

    pub fn positions(&self, now_ms: f64) -> Vec<Point> {
        (0..self.count).map(|i| self.position(i, now_ms)).collect()
    }
}
