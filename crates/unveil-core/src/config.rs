//! Per-controller reveal configuration.

use serde::{Deserialize, Serialize};

use crate::easing::Easing;
use crate::error::{RevealError, Result};
use crate::observer::ScrollThreshold;
use crate::types::VisualState;

/// What starts a reveal once the lifecycle gate is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trigger {
    /// Play `delay_ms` after arming.
    Mount,
    /// Play when the element crosses `scroll_threshold`.
    Scroll,
}

impl Default for Trigger {
    fn default() -> Self {
        Self::Mount
    }
}

/// Settings for one reveal controller, fixed for the controller's lifetime.
/// Changing any of them goes through a full teardown and setup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RevealConfig {
    pub trigger: Trigger,
    /// Wait after arming before a mount-triggered reveal plays.
    pub delay_ms: f64,
    /// Duration of each unit's animation.
    pub duration_ms: f64,
    /// Offset between the starts of consecutive units.
    pub stagger_ms: f64,
    pub scroll_threshold: ScrollThreshold,
    /// Reveals play at most once per mount; `false` is rejected by
    /// [`RevealConfig::validate`].
    pub play_once: bool,
    pub easing: Easing,
    pub hidden: VisualState,
    pub visible: VisualState,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            trigger: Trigger::Mount,
            delay_ms: 0.0,
            duration_ms: 1200.0,
            stagger_ms: 100.0,
            scroll_threshold: ScrollThreshold::default(),
            play_once: true,
            easing: Easing::CubicOut,
            hidden: VisualState::HIDDEN,
            visible: VisualState::VISIBLE,
        }
    }
}

impl RevealConfig {
    /// A reveal that plays on mount.
    pub fn mount() -> Self {
        Self::default()
    }

    /// A reveal that plays when scrolled into view.
    pub fn scroll() -> Self {
        Self {
            trigger: Trigger::Scroll,
            ..Self::default()
        }
    }

    pub fn with_delay(mut self, delay_ms: f64) -> Self {
        self.delay_ms = delay_ms;
        self
    }

    pub fn with_duration(mut self, duration_ms: f64) -> Self {
        self.duration_ms = duration_ms;
        self
    }

    pub fn with_stagger(mut self, stagger_ms: f64) -> Self {
        self.stagger_ms = stagger_ms;
        self
    }

    pub fn with_threshold(mut self, threshold: ScrollThreshold) -> Self {
        self.scroll_threshold = threshold;
        self
    }

    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    pub fn with_states(mut self, hidden: VisualState, visible: VisualState) -> Self {
        self.hidden = hidden;
        self.visible = visible;
        self
    }

    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("delay_ms", self.delay_ms),
            ("duration_ms", self.duration_ms),
            ("stagger_ms", self.stagger_ms),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(RevealError::InvalidConfig(format!(
                    "{name} must be a finite, non-negative number of milliseconds (got {value})"
                )));
            }
        }
        if !self.play_once {
            return Err(RevealError::InvalidConfig(
                "reveals play once per mount; play_once cannot be disabled".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        let config = RevealConfig::default();
        assert_eq!(config.trigger, Trigger::Mount);
        assert!(config.play_once);
        assert!(config.validate().is_ok());
        assert!(RevealConfig::scroll().validate().is_ok());
    }

    #[test]
    fn rejects_negative_or_nan_timing() {
        assert!(RevealConfig::mount().with_delay(-1.0).validate().is_err());
        assert!(RevealConfig::mount().with_duration(f64::NAN).validate().is_err());
        assert!(RevealConfig::mount().with_stagger(f64::INFINITY).validate().is_err());
    }

    #[test]
    fn rejects_replaying_reveals() {
        let config = RevealConfig {
            play_once: false,
            ..RevealConfig::default()
        };
        assert!(matches!(config.validate(), Err(RevealError::InvalidConfig(_))));
    }

    #[test]
    fn deserializes_partial_json() {
        let config: RevealConfig = serde_json::from_str(
            r#"{ "trigger": "scroll", "duration_ms": 800, "scroll_threshold": "top 70%" }"#,
        )
        .unwrap();
        assert_eq!(config.trigger, Trigger::Scroll);
        assert_eq!(config.duration_ms, 800.0);
        assert_eq!(config.stagger_ms, 100.0);
        assert!((config.scroll_threshold.viewport_fraction - 0.7).abs() < 1e-9);
    }
}
