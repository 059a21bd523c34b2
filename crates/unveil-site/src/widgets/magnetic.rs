//! Button that leans toward the pointer.
//!
//! Inside the hover radius the button is offset by
//! `(pointer - centre) * strength`, clamped to `max_offset`. When the pointer
//! leaves, the offset eases back to rest over `return_ms`.

use unveil_core::Easing;

use super::Point;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Release {
    from: Point,
    started_at: f64,
}

#[derive(Debug, Clone)]
pub struct MagneticButton {
    centre: Point,
    radius: f32,
    strength: f32,
    max_offset: f32,
    return_ms: f64,
    easing: Easing,
    offset: Point,
    release: Option<Release>,
}

impl MagneticButton {
    pub fn new(centre: Point, radius: f32) -> Self {
        Self {
            centre,
            radius: radius.max(0.0),
            strength: 0.3,
            max_offset: 12.0,
            return_ms: 400.0,
            easing: Easing::CubicOut,
            offset: Point::ZERO,
            release: None,
        }
    }

    pub fn with_strength(mut self, strength: f32) -> Self {
        self.strength = strength;
        self
    }

    pub fn with_max_offset(mut self, max_offset: f32) -> Self {
        self.max_offset = max_offset.max(0.0);
        self
    }

    pub fn with_return(mut self, return_ms: f64, easing: Easing) -> Self {
        self.return_ms = return_ms.max(0.0);
        self.easing = easing;
        self
    }

    pub fn is_engaged(&self) -> bool {
        self.release.is_none() && self.offset != Point::ZERO
    }

    /// Pointer moved to `pointer` at `now_ms`.
    pub fn pointer_move(&mut self, pointer: Point, now_ms: f64) {
        let delta = pointer - self.centre;
        if delta.length() > self.radius {
            self.pointer_leave(now_ms);
            return;
        }

        let pull = delta.scale(self.strength);
        let length = pull.length();
        self.offset = if length > self.max_offset && length > 0.0 {
            pull.scale(self.max_offset / length)
        } else {
            pull
        };
        self.release = None;
    }

    pub fn pointer_leave(&mut self, now_ms: f64) {
        if self.release.is_some() {
            return;
        }
        let from = self.offset;
        self.release = Some(Release {
            from,
            started_at: now_ms,
        });
    }

    /// Offset to render at `now_ms`.
    pub fn offset_at(&mut self, now_ms: f64) -> Point {
        let Some(release) = self.release else {
            return self.offset;
        };
        let t = if self.return_ms > 0.0 {
            ((now_ms - release.started_at) / self.return_ms).clamp(0.0, 1.0) as f32
        } else {
            1.0
        };
        self.offset = release.from.scale(1.0 - self.easing.evaluate(t));
        if t >= 1.0 {
            self.offset = Point::ZERO;
            self.release = None;
        }
        self.offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn button() -> MagneticButton {
        MagneticButton::new(Point::new(100.0, 100.0), 80.0)
            .with_strength(0.5)
            .with_max_offset(10.0)
            .with_return(400.0, Easing::Linear)
    }

    #[test]
    fn pulls_toward_pointer() {
        let mut b = button();
        b.pointer_move(Point::new(110.0, 104.0), 0.0);
        assert_eq!(b.offset_at(0.0), Point::new(5.0, 2.0));
        assert!(b.is_engaged());
    }

    #[test]
    fn offset_is_clamped() {
        let mut b = button();
        b.pointer_move(Point::new(160.0, 100.0), 0.0);
        let offset = b.offset_at(0.0);
        assert!((offset.length() - 10.0).abs() < 1e-4);
        assert!(offset.x > 0.0);
    }

    #[test]
    fn eases_back_after_leaving() {
        let mut b = button();
        b.pointer_move(Point::new(110.0, 100.0), 0.0);
        b.pointer_move(Point::new(400.0, 400.0), 1000.0);

        let halfway = b.offset_at(1200.0);
        assert!((halfway.x - 2.5).abs() < 1e-4);
        assert_eq!(b.offset_at(1400.0), Point::ZERO);
        assert!(!b.is_engaged());
    }
}
