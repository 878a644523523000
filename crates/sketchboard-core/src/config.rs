//! Tunable canvas parameters.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Canvas configuration. Every field has a default, so a partial JSON
/// document is enough.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    pub min_zoom: f64,
    pub max_zoom: f64,
    /// Zoom factor of one mouse-wheel notch.
    pub wheel_zoom_step: f64,
    /// Scale change per pixel of trackpad pinch delta.
    pub pinch_sensitivity: f64,
    /// Fraction of the raw two-finger distance ratio applied per frame.
    pub touch_damping: f64,
    /// Amount the virtual bounds grow by on each side that is approached.
    pub bounds_buffer: f64,
    /// How close (in world units) the visible region may come to the bounds
    /// before they grow.
    pub bounds_margin: f64,
    /// Resize handle edge length in screen pixels.
    pub handle_size: f64,
    pub caret_blink_ms: u64,
    pub viewport_width: f64,
    pub viewport_height: f64,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            min_zoom: 0.05,
            max_zoom: 20.0,
            wheel_zoom_step: 1.1,
            pinch_sensitivity: 0.01,
            touch_damping: 0.3,
            bounds_buffer: 5000.0,
            bounds_margin: 1000.0,
            handle_size: 8.0,
            caret_blink_ms: 500,
            viewport_width: 1280.0,
            viewport_height: 800.0,
        }
    }
}

impl CanvasConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded canvas config from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.min_zoom > 0.0 && self.min_zoom <= self.max_zoom) {
            return Err(ConfigError::Invalid(format!(
                "zoom range [{}, {}]",
                self.min_zoom, self.max_zoom
            )));
        }
        if self.wheel_zoom_step <= 1.0 {
            return Err(ConfigError::Invalid(format!(
                "wheel_zoom_step must exceed 1, got {}",
                self.wheel_zoom_step
            )));
        }
        if !(0.0..=1.0).contains(&self.touch_damping) {
            return Err(ConfigError::Invalid(format!(
                "touch_damping must be within [0, 1], got {}",
                self.touch_damping
            )));
        }
        if self.handle_size <= 0.0 || self.viewport_width <= 0.0 || self.viewport_height <= 0.0 {
            return Err(ConfigError::Invalid("sizes must be positive".to_string()));
        }
        Ok(())
    }

    pub fn caret_blink(&self) -> Duration {
        Duration::from_millis(self.caret_blink_ms)
    }
}
