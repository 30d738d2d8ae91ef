//! Live detector tunables.

use crate::validation::{ValidationResult, validate_detector_config};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default pause between analysis ticks (ms).
pub const DEFAULT_ANALYSIS_INTERVAL_MS: u64 = 500;

/// Default minimum similarity for a detection.
pub const DEFAULT_THRESHOLD: f64 = 0.65;

/// Default minimum time between two detections of the same sound (ms).
pub const DEFAULT_COOLDOWN_MS: u64 = 3000;

/// Default RMS floor below which a chunk counts as silence.
pub const DEFAULT_SILENCE_GATE: f64 = 0.008;

/// Tunables exposed to the caller of the live analyzer.
///
/// Missing keys in a TOML table fall back to the defaults.
///
/// ```toml
/// analysis_interval_ms = 500
/// threshold = 0.65
/// cooldown_ms = 3000
/// silence_gate = 0.008
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// Pause between analysis ticks in milliseconds.
    pub analysis_interval_ms: u64,
    /// Minimum score in `[0, 1]` for a match to count.
    pub threshold: f64,
    /// Per-sound cooldown in milliseconds.
    pub cooldown_ms: u64,
    /// RMS level below which a chunk is skipped.
    pub silence_gate: f64,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            analysis_interval_ms: DEFAULT_ANALYSIS_INTERVAL_MS,
            threshold: DEFAULT_THRESHOLD,
            cooldown_ms: DEFAULT_COOLDOWN_MS,
            silence_gate: DEFAULT_SILENCE_GATE,
        }
    }
}

impl DetectorConfig {
    /// Replace the match threshold.
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    /// Replace the cooldown.
    pub fn with_cooldown_ms(mut self, cooldown_ms: u64) -> Self {
        self.cooldown_ms = cooldown_ms;
        self
    }

    /// Analysis interval as a [`Duration`].
    pub fn analysis_interval(&self) -> Duration {
        Duration::from_millis(self.analysis_interval_ms)
    }

    /// Cooldown as a [`Duration`].
    pub fn cooldown(&self) -> Duration {
        Duration::from_millis(self.cooldown_ms)
    }

    /// Check every field against its allowed range.
    pub fn validate(&self) -> ValidationResult<()> {
        validate_detector_config(self)
    }
}
