//! Easing curves for reveal playback.
//!
//! Reveals decelerate into place, so the defaults are "out" curves:
//! - `CubicOut` (default) and `QuartOut` in closed form
//! - `EaseInOut` for symmetric motion (widgets)
//! - `CubicBezier` for custom CSS-style curves
//!
//! ```
//! use unveil_core::easing::Easing;
//!
//! let eased = Easing::CubicOut.evaluate(0.5);
//! assert!(eased > 0.5);
//! ```

use serde::{Deserialize, Serialize};

/// Maps linear progress in [0, 1] to eased progress in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Easing {
    /// No easing.
    Linear,
    /// `1 - (1 - t)^3`.
    CubicOut,
    /// `1 - (1 - t)^4`, a stronger settle for headline text.
    QuartOut,
    /// Cubic ease-in-out, symmetric around `t = 0.5`.
    EaseInOut,
    /// Custom curve through control points `(x1, y1)` and `(x2, y2)`.
    /// x values must lie in [0, 1].
    CubicBezier { x1: f32, y1: f32, x2: f32, y2: f32 },
}

impl Default for Easing {
    fn default() -> Self {
        Self::CubicOut
    }
}

impl Easing {
    /// Evaluate the curve. Input outside [0, 1] is clamped and the endpoints
    /// are exact, so a finished unit always reports progress 1.
    pub fn evaluate(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        if t == 0.0 || t == 1.0 {
            return t;
        }

        match *self {
            Self::Linear => t,
            Self::CubicOut => 1.0 - (1.0 - t).powi(3),
            Self::QuartOut => 1.0 - (1.0 - t).powi(4),
            Self::EaseInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
            Self::CubicBezier { x1, y1, x2, y2 } => {
                let s = solve_for_x(x1, x2, t);
                bezier_component(y1, y2, s)
            }
        }
    }

    /// Build a custom bezier curve, rejecting x control points outside [0, 1]
    /// (the curve would not be a function of time).
    pub fn cubic_bezier(x1: f32, y1: f32, x2: f32, y2: f32) -> Option<Self> {
        let valid = (0.0..=1.0).contains(&x1) && (0.0..=1.0).contains(&x2);
        valid.then_some(Self::CubicBezier { x1, y1, x2, y2 })
    }
}

/// One coordinate of a cubic bezier anchored at 0 and 1.
#[inline]
fn bezier_component(p1: f32, p2: f32, s: f32) -> f32 {
    let inv = 1.0 - s;
    3.0 * inv * inv * s * p1 + 3.0 * inv * s * s * p2 + s * s * s
}

#[inline]
fn bezier_slope(p1: f32, p2: f32, s: f32) -> f32 {
    let inv = 1.0 - s;
    3.0 * inv * inv * p1 + 6.0 * inv * s * (p2 - p1) + 3.0 * s * s * (1.0 - p2)
}

/// Find the curve parameter whose x equals `x`: a few Newton steps, then
/// bisection if the slope flattens out.
fn solve_for_x(x1: f32, x2: f32, x: f32) -> f32 {
    let mut s = x;
    for _ in 0..6 {
        let err = bezier_component(x1, x2, s) - x;
        if err.abs() < 1e-6 {
            return s;
        }
        let slope = bezier_slope(x1, x2, s);
        if slope.abs() < 1e-6 {
            break;
        }
        s = (s - err / slope).clamp(0.0, 1.0);
    }

    let (mut lo, mut hi) = (0.0_f32, 1.0_f32);
    s = x;
    for _ in 0..32 {
        let value = bezier_component(x1, x2, s);
        if (value - x).abs() < 1e-6 {
            break;
        }
        if value < x {
            lo = s;
        } else {
            hi = s;
        }
        s = (lo + hi) * 0.5;
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 0.001;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    #[test]
    fn endpoints_are_exact_for_every_curve() {
        let curves = [
            Easing::Linear,
            Easing::CubicOut,
            Easing::QuartOut,
            Easing::EaseInOut,
            Easing::CubicBezier {
                x1: 0.16,
                y1: 1.0,
                x2: 0.3,
                y2: 1.0,
            },
        ];
        for curve in curves {
            assert_eq!(curve.evaluate(0.0), 0.0, "{curve:?} at 0");
            assert_eq!(curve.evaluate(1.0), 1.0, "{curve:?} at 1");
        }
    }

    #[test]
    fn out_curves_decelerate() {
        let cubic = Easing::CubicOut.evaluate(0.5);
        let quart = Easing::QuartOut.evaluate(0.5);
        assert!(approx_eq(cubic, 0.875));
        assert!(approx_eq(quart, 0.9375));
        assert!(quart > cubic);
    }

    #[test]
    fn ease_in_out_is_symmetric() {
        let ease = Easing::EaseInOut;
        assert!(approx_eq(ease.evaluate(0.5), 0.5));
        assert!(approx_eq(ease.evaluate(0.25) + ease.evaluate(0.75), 1.0));
    }

    #[test]
    fn linear_bezier_matches_linear() {
        let curve = Easing::cubic_bezier(0.0, 0.0, 1.0, 1.0).unwrap();
        for t in [0.1, 0.3, 0.5, 0.7, 0.9] {
            assert!(approx_eq(curve.evaluate(t), t), "t = {t}");
        }
    }

    #[test]
    fn bezier_is_monotonic() {
        let curve = Easing::cubic_bezier(0.4, 0.0, 0.2, 1.0).unwrap();
        let mut last = 0.0;
        for step in 1..=20 {
            let value = curve.evaluate(step as f32 / 20.0);
            assert!(value >= last, "curve dipped at step {step}");
            last = value;
        }
    }

    #[test]
    fn clamps_out_of_range_input() {
        assert_eq!(Easing::CubicOut.evaluate(-1.0), 0.0);
        assert_eq!(Easing::CubicOut.evaluate(2.0), 1.0);
    }

    #[test]
    fn rejects_invalid_bezier() {
        assert!(Easing::cubic_bezier(-0.1, 0.0, 0.5, 1.0).is_none());
        assert!(Easing::cubic_bezier(0.5, 0.0, 1.5, 1.0).is_none());
    }

    #[test]
    fn default_is_cubic_out() {
        assert_eq!(Easing::default(), Easing::CubicOut);
    }
}
