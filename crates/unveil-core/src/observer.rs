//! Viewport geometry and scroll thresholds.
//!
//! A threshold reads like a scroll-trigger start rule: `"top 85%"` means
//! "the element's top edge has scrolled up to 85% of the viewport height".
//! Keywords are accepted for the viewport position too (`"top bottom"`,
//! `"center center"`).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::RevealError;

/// The visible window onto the document.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Document offset of the viewport's top edge.
    pub scroll_y: f64,
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            scroll_y: 0.0,
            width,
            height,
        }
    }

    pub fn scrolled_to(mut self, scroll_y: f64) -> Self {
        self.scroll_y = scroll_y.max(0.0);
        self
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1280.0, 800.0)
    }
}

/// Vertical extent of an element in document coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ElementBounds {
    pub top: f64,
    pub height: f64,
}

impl ElementBounds {
    pub fn new(top: f64, height: f64) -> Self {
        Self { top, height }
    }
}

/// Which edge of the element is watched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScrollEdge {
    Top,
    Center,
    Bottom,
}

impl ScrollEdge {
    fn factor(self) -> f64 {
        match self {
            Self::Top => 0.0,
            Self::Center => 0.5,
            Self::Bottom => 1.0,
        }
    }

    fn keyword(self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::Center => "center",
            Self::Bottom => "bottom",
        }
    }
}

/// Rule deciding when a scroll-triggered reveal fires.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ScrollThreshold {
    pub edge: ScrollEdge,
    /// Fraction of the viewport height measured from its top, in [0, 1].
    pub viewport_fraction: f64,
}

impl ScrollThreshold {
    pub fn new(edge: ScrollEdge, viewport_fraction: f64) -> Self {
        Self {
            edge,
            viewport_fraction: viewport_fraction.clamp(0.0, 1.0),
        }
    }

    /// True once the watched edge is at or above the threshold line.
    ///
    /// This holds for every scroll position past the line, so an element
    /// that is already in view when the watch is registered fires on the
    /// first evaluation.
    pub fn is_crossed(&self, bounds: ElementBounds, viewport: &Viewport) -> bool {
        let edge_y = bounds.top + bounds.height * self.edge.factor();
        let line_y = viewport.scroll_y + viewport.height * self.viewport_fraction;
        edge_y <= line_y
    }
}

impl Default for ScrollThreshold {
    fn default() -> Self {
        Self::new(ScrollEdge::Top, 0.85)
    }
}

impl FromStr for ScrollThreshold {
    type Err = RevealError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let invalid = || RevealError::InvalidThreshold(input.to_string());
        let mut parts = input.split_whitespace();
        let (Some(edge), Some(position), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(invalid());
        };

        let edge = match edge.to_ascii_lowercase().as_str() {
            "top" => ScrollEdge::Top,
            "center" => ScrollEdge::Center,
            "bottom" => ScrollEdge::Bottom,
            _ => return Err(invalid()),
        };

        let fraction = match position.to_ascii_lowercase().as_str() {
            "top" => 0.0,
            "center" => 0.5,
            "bottom" => 1.0,
            pct => {
                let value: f64 = pct
                    .strip_suffix('%')
                    .and_then(|n| n.parse().ok())
                    .ok_or_else(invalid)?;
                if !(0.0..=100.0).contains(&value) {
                    return Err(invalid());
                }
                value / 100.0
            }
        };

        Ok(Self::new(edge, fraction))
    }
}

impl fmt::Display for ScrollThreshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let percent = (self.viewport_fraction * 100_000.0).round() / 1000.0;
        write!(f, "{} {}%", self.edge.keyword(), percent)
    }
}

impl TryFrom<String> for ScrollThreshold {
    type Error = RevealError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ScrollThreshold> for String {
    fn from(value: ScrollThreshold) -> Self {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_percent_and_keywords() {
        let t: ScrollThreshold = "top 85%".parse().unwrap();
        assert_eq!(t.edge, ScrollEdge::Top);
        assert!((t.viewport_fraction - 0.85).abs() < 1e-9);

        let t: ScrollThreshold = "center bottom".parse().unwrap();
        assert_eq!(t.edge, ScrollEdge::Center);
        assert_eq!(t.viewport_fraction, 1.0);

        let t: ScrollThreshold = "Bottom Top".parse().unwrap();
        assert_eq!(t.edge, ScrollEdge::Bottom);
        assert_eq!(t.viewport_fraction, 0.0);
    }

    #[test]
    fn rejects_malformed_thresholds() {
        for bad in ["", "top", "top 85", "middle 50%", "top 120%", "top 50% extra"] {
            assert!(
                bad.parse::<ScrollThreshold>().is_err(),
                "`{bad}` should not parse"
            );
        }
    }

    #[test]
    fn display_round_trips_through_serde() {
        let threshold = ScrollThreshold::default();
        assert_eq!(threshold.to_string(), "top 85%");

        let json = serde_json::to_string(&threshold).unwrap();
        assert_eq!(json, "\"top 85%\"");
        let back: ScrollThreshold = serde_json::from_str(&json).unwrap();
        assert_eq!(back, threshold);
    }

    #[test]
    fn crossing_follows_scroll_position() {
        let threshold = ScrollThreshold::default();
        let bounds = ElementBounds::new(1000.0, 40.0);
        let viewport = Viewport::new(1280.0, 800.0);

        // Line sits at 680 with no scroll.
        assert!(!threshold.is_crossed(bounds, &viewport));
        assert!(!threshold.is_crossed(bounds, &viewport.scrolled_to(319.0)));
        assert!(threshold.is_crossed(bounds, &viewport.scrolled_to(321.0)));
        assert!(threshold.is_crossed(bounds, &viewport.scrolled_to(2000.0)));
    }

    #[test]
    fn center_edge_uses_element_midpoint() {
        let threshold: ScrollThreshold = "center 50%".parse().unwrap();
        let bounds = ElementBounds::new(500.0, 200.0);
        let viewport = Viewport::new(1000.0, 800.0);
        // Midpoint 600 vs line 400 + scroll.
        assert!(!threshold.is_crossed(bounds, &viewport.scrolled_to(199.0)));
        assert!(threshold.is_crossed(bounds, &viewport.scrolled_to(200.0)));
    }
}
