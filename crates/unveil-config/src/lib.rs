//! Unveil configuration system
//!
//! Settings are read from `unveil.toml`, then overridden by `UNVEIL_*`
//! environment variables. Every section is optional; missing fields take
//! their defaults.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use thiserror::Error;
use tracing::{debug, warn};
use unveil_core::{RevealConfig, ScrollThreshold, Viewport};

/// Default file name, looked up in the current directory.
pub const CONFIG_FILE: &str = "unveil.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct UnveilConfig {
    /// Loading sequence
    pub gate: GateConfig,
    /// Defaults for reveals that don't set their own timing
    pub reveal: RevealDefaults,
    /// Initial viewport of the headless driver
    pub viewport: ViewportConfig,
    /// Contact form endpoint and behaviour
    pub form: FormConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GateConfig {
    /// Time from start until the page counts as loaded
    pub delay_ms: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RevealDefaults {
    pub delay_ms: f64,
    pub duration_ms: f64,
    pub stagger_ms: f64,
    /// Threshold rule such as `"top 85%"`
    pub scroll_threshold: ScrollThreshold,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormConfig {
    /// URL the contact form posts to
    pub endpoint: String,
    /// Named in the generic failure alert
    pub support_email: String,
    /// How long the confirmation stays up before the form resets
    pub confirmation_ms: f64,
    /// Request timeout
    pub timeout_ms: u64,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self { delay_ms: 1700.0 }
    }
}

impl Default for RevealDefaults {
    fn default() -> Self {
        let base = RevealConfig::default();
        Self {
            delay_ms: base.delay_ms,
            duration_ms: base.duration_ms,
            stagger_ms: base.stagger_ms,
            scroll_threshold: base.scroll_threshold,
        }
    }
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 800.0,
        }
    }
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.example.com/contact".to_string(),
            support_email: "support@example.com".to_string(),
            confirmation_ms: 5000.0,
            timeout_ms: 10_000,
        }
    }
}

impl RevealDefaults {
    /// Mount-triggered reveal with these timings.
    pub fn mount(&self) -> RevealConfig {
        RevealConfig::mount()
            .with_delay(self.delay_ms)
            .with_duration(self.duration_ms)
            .with_stagger(self.stagger_ms)
            .with_threshold(self.scroll_threshold)
    }

    /// Scroll-triggered reveal with these timings.
    pub fn scroll(&self) -> RevealConfig {
        RevealConfig::scroll()
            .with_delay(self.delay_ms)
            .with_duration(self.duration_ms)
            .with_stagger(self.stagger_ms)
            .with_threshold(self.scroll_threshold)
    }
}

impl ViewportConfig {
    pub fn to_viewport(&self) -> Viewport {
        Viewport::new(self.width, self.height)
    }
}

impl UnveilConfig {
    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load `unveil.toml` from the current directory, or defaults if it is
    /// missing or broken
    pub fn load_or_default() -> Self {
        match Self::load_from_file(CONFIG_FILE) {
            Ok(config) => {
                debug!(path = CONFIG_FILE, "loaded configuration");
                config
            }
            Err(ConfigError::Read { source, .. })
                if source.kind() == std::io::ErrorKind::NotFound =>
            {
                Self::default()
            }
            Err(error) => {
                warn!(%error, "using default configuration");
                Self::default()
            }
        }
    }

    /// Merge configuration with environment variables
    ///
    /// Environment variables take precedence over configuration file values.
    /// Values that fail to parse are ignored with a warning.
    pub fn merge_with_env(&mut self) {
        // Gate
        if let Some(delay) = env_parse("UNVEIL_GATE_DELAY_MS") {
            self.gate.delay_ms = delay;
        }

        // Reveal defaults
        if let Some(delay) = env_parse("UNVEIL_REVEAL_DELAY_MS") {
            self.reveal.delay_ms = delay;
        }
        if let Some(duration) = env_parse("UNVEIL_REVEAL_DURATION_MS") {
            self.reveal.duration_ms = duration;
        }
        if let Some(stagger) = env_parse("UNVEIL_REVEAL_STAGGER_MS") {
            self.reveal.stagger_ms = stagger;
        }
        if let Some(threshold) = env_parse::<ScrollThreshold>("UNVEIL_SCROLL_THRESHOLD") {
            self.reveal.scroll_threshold = threshold;
        }

        // Viewport
        if let Some(width) = env_parse("UNVEIL_VIEWPORT_WIDTH") {
            self.viewport.width = width;
        }
        if let Some(height) = env_parse("UNVEIL_VIEWPORT_HEIGHT") {
            self.viewport.height = height;
        }

        // Form
        if let Ok(endpoint) = std::env::var("UNVEIL_FORM_ENDPOINT") {
            self.form.endpoint = endpoint;
        }
        if let Ok(email) = std::env::var("UNVEIL_SUPPORT_EMAIL") {
            self.form.support_email = email;
        }
        if let Some(ms) = env_parse("UNVEIL_FORM_CONFIRMATION_MS") {
            self.form.confirmation_ms = ms;
        }
        if let Some(ms) = env_parse("UNVEIL_FORM_TIMEOUT_MS") {
            self.form.timeout_ms = ms;
        }
    }

    /// Load configuration with environment variable overrides
    ///
    /// 1. Load from unveil.toml (or use defaults if not found)
    /// 2. Override with environment variables if present
    pub fn load() -> Self {
        let mut config = Self::load_or_default();
        config.merge_with_env();
        config
    }
}

fn env_parse<T: FromStr>(key: &str) -> Option<T> {
    let raw = std::env::var(key).ok()?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(key, value = %raw, "ignoring unparsable environment override");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use unveil_core::{ScrollEdge, Trigger};

    #[test]
    fn test_default_config() {
        let config = UnveilConfig::default();
        assert_eq!(config.gate.delay_ms, 1700.0);
        assert_eq!(config.reveal.duration_ms, 1200.0);
        assert_eq!(config.reveal.stagger_ms, 100.0);
        assert_eq!(config.reveal.scroll_threshold.to_string(), "top 85%");
        assert_eq!(config.form.confirmation_ms, 5000.0);
    }

    #[test]
    fn test_toml_serialization() {
        let config = UnveilConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: UnveilConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_partial_file() {
        let parsed: UnveilConfig = toml::from_str(
            r#"
            [gate]
            delay_ms = 900

            [reveal]
            scroll_threshold = "center 50%"
            "#,
        )
        .unwrap();
        assert_eq!(parsed.gate.delay_ms, 900.0);
        assert_eq!(parsed.reveal.scroll_threshold.edge, ScrollEdge::Center);
        assert_eq!(parsed.reveal.duration_ms, 1200.0);
        assert_eq!(parsed.viewport, ViewportConfig::default());
    }

    #[test]
    fn test_bad_threshold_is_a_parse_error() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "[reveal]\nscroll_threshold = \"sideways\"\n")?;

        let err = UnveilConfig::load_from_file(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        Ok(())
    }

    #[test]
    fn test_config_file_in_directory_is_loaded() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "[gate]\ndelay_ms = 900.0\n")?;

        let config = UnveilConfig::load_from_file(&path)?;
        assert_eq!(config.gate.delay_ms, 900.0);
        assert_eq!(config.reveal, RevealDefaults::default());
        Ok(())
    }

    #[test]
    fn test_missing_file_is_a_read_error() {
        let err = UnveilConfig::load_from_file("/nonexistent/unveil.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn test_reveal_defaults_build_configs() {
        let reveal = RevealDefaults {
            delay_ms: 500.0,
            ..RevealDefaults::default()
        };
        let mount = reveal.mount();
        assert_eq!(mount.trigger, Trigger::Mount);
        assert_eq!(mount.delay_ms, 500.0);
        assert!(mount.validate().is_ok());
        assert_eq!(reveal.scroll().trigger, Trigger::Scroll);
    }

    #[test]
    fn test_merge_with_env() {
        unsafe {
            std::env::set_var("UNVEIL_GATE_DELAY_MS", "250");
            std::env::set_var("UNVEIL_SCROLL_THRESHOLD", "bottom 100%");
            std::env::set_var("UNVEIL_REVEAL_STAGGER_MS", "not-a-number");
            std::env::set_var("UNVEIL_SUPPORT_EMAIL", "help@example.org");
        }

        let mut config = UnveilConfig::default();
        config.merge_with_env();

        assert_eq!(config.gate.delay_ms, 250.0);
        assert_eq!(config.reveal.scroll_threshold.edge, ScrollEdge::Bottom);
        assert_eq!(config.reveal.stagger_ms, 100.0);
        assert_eq!(config.form.support_email, "help@example.org");

        unsafe {
            std::env::remove_var("UNVEIL_GATE_DELAY_MS");
            std::env::remove_var("UNVEIL_SCROLL_THRESHOLD");
            std::env::remove_var("UNVEIL_REVEAL_STAGGER_MS");
            std::env::remove_var("UNVEIL_SUPPORT_EMAIL");
        }
    }
}
