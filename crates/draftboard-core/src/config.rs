//! Editor configuration.

use crate::error::{EditorError, EditorResult};
use kurbo::Size;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default canvas width in pixels.
pub const DEFAULT_CANVAS_WIDTH: f64 = 960.0;
/// Default canvas height in pixels.
pub const DEFAULT_CANVAS_HEIGHT: f64 = 540.0;
/// Distance (in canvas pixels) under which a guide captures the dragged widget.
pub const DEFAULT_SNAP_THRESHOLD: f64 = 10.0;
/// Minimum time between two live guide recomputations.
pub const DEFAULT_SNAP_INTERVAL_MS: u64 = 8;
/// Upper bound (exclusive) of the random offset added to new widgets.
pub const DEFAULT_SPAWN_JITTER: f64 = 100.0;

/// Alignment guide settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapConfig {
    /// Whether guides are computed at all.
    pub enabled: bool,
    /// Capture distance in canvas pixels (strict: a match needs `distance < threshold`).
    pub threshold: f64,
    /// Throttle interval for live guide recomputation, in milliseconds.
    pub min_interval_ms: u64,
}

impl Default for SnapConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            threshold: DEFAULT_SNAP_THRESHOLD,
            min_interval_ms: DEFAULT_SNAP_INTERVAL_MS,
        }
    }
}

impl SnapConfig {
    /// Throttle interval as a [`Duration`].
    pub fn min_interval(&self) -> Duration {
        Duration::from_millis(self.min_interval_ms)
    }
}

/// Configuration for an editor instance.
///
/// Every field has a default, so a partial JSON object is a valid config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub canvas_width: f64,
    pub canvas_height: f64,
    pub snap: SnapConfig,
    /// Widgets created from defaults get an offset in `[0, spawn_jitter)` on each axis.
    pub spawn_jitter: f64,
    /// Clamp locked-aspect resizes at top/left handles to bounds as well.
    ///
    /// Off by default: those resizes skip clamping so the anchor correction and
    /// the bounds correction do not fight each other. The price is that such a
    /// resize may leave a canvas-clamped widget overhanging the canvas edge.
    pub clamp_locked_anchor_resizes: bool,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            canvas_width: DEFAULT_CANVAS_WIDTH,
            canvas_height: DEFAULT_CANVAS_HEIGHT,
            snap: SnapConfig::default(),
            spawn_jitter: DEFAULT_SPAWN_JITTER,
            clamp_locked_anchor_resizes: false,
        }
    }
}

impl EditorConfig {
    /// Parse a configuration from JSON and validate it.
    pub fn from_json(json: &str) -> EditorResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the configuration to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Set the canvas extent.
    pub fn with_canvas_size(mut self, width: f64, height: f64) -> Self {
        self.canvas_width = width;
        self.canvas_height = height;
        self
    }

    /// Set the spawn jitter range (0 disables jitter).
    pub fn with_spawn_jitter(mut self, jitter: f64) -> Self {
        self.spawn_jitter = jitter;
        self
    }

    /// Canvas extent as a size.
    pub fn canvas_size(&self) -> Size {
        Size::new(self.canvas_width, self.canvas_height)
    }

    /// Check that all values are usable.
    pub fn validate(&self) -> EditorResult<()> {
        let positive = |v: f64| v.is_finite() && v > 0.0;
        if !positive(self.canvas_width) || !positive(self.canvas_height) {
            return Err(EditorError::InvalidConfig(format!(
                "canvas extent must be positive, got {}x{}",
                self.canvas_width, self.canvas_height
            )));
        }
        if !self.snap.threshold.is_finite() || self.snap.threshold < 0.0 {
            return Err(EditorError::InvalidConfig(format!(
                "snap threshold must be non-negative, got {}",
                self.snap.threshold
            )));
        }
        if !self.spawn_jitter.is_finite() || self.spawn_jitter < 0.0 {
            return Err(EditorError::InvalidConfig(format!(
                "spawn jitter must be non-negative, got {}",
                self.spawn_jitter
            )));
        }
        Ok(())
    }
}
