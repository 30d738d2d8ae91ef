//! Range checks for detector tunables and settings.
//!
//! # Example
//!
//! ```rust
//! use sonic_sight_config::{DetectorConfig, validate_detector_config};
//!
//! let config = DetectorConfig::default();
//! validate_detector_config(&config).expect("defaults are valid");
//!
//! let broken = DetectorConfig { threshold: 1.5, ..DetectorConfig::default() };
//! assert!(validate_detector_config(&broken).is_err());
//! ```

use crate::detector::DetectorConfig;
use crate::sensitivity::Sensitivity;
use crate::settings::Settings;
use thiserror::Error;

/// Validation error types.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    /// Parameter value out of range.
    #[error("parameter '{param}' value {value} out of range [{min}, {max}]")]
    OutOfRange {
        /// Name of the parameter.
        param: String,
        /// The value that was out of range.
        value: f64,
        /// Minimum allowed value.
        min: f64,
        /// Maximum allowed value.
        max: f64,
    },

    /// The analysis tick would never fire.
    #[error("analysis interval must be non-zero")]
    ZeroInterval,

    /// Sensitivity outside 0..=100.
    #[error("sensitivity {0} out of range [0, {max}]", max = Sensitivity::MAX)]
    SensitivityOutOfRange(u8),

    /// Multiple validation errors.
    #[error("multiple validation errors: {}", .0.iter().map(|e| e.to_string()).collect::<Vec<_>>().join("; "))]
    Multiple(Vec<ValidationError>),
}

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

fn check_range(param: &str, value: f64, min: f64, max: f64) -> ValidationResult<()> {
    // NaN fails both comparisons and lands here too
    if value >= min && value <= max {
        Ok(())
    } else {
        Err(ValidationError::OutOfRange {
            param: param.to_string(),
            value,
            min,
            max,
        })
    }
}

fn collect(mut errors: Vec<ValidationError>) -> ValidationResult<()> {
    match errors.len() {
        0 => Ok(()),
        1 => Err(errors.remove(0)),
        _ => Err(ValidationError::Multiple(errors)),
    }
}

/// Validate detector tunables.
///
/// Checks that the interval is non-zero, the threshold lies in `[0, 1]`, and
/// the silence gate is a finite, non-negative RMS level.
pub fn validate_detector_config(config: &DetectorConfig) -> ValidationResult<()> {
    let mut errors = Vec::new();

    if config.analysis_interval_ms == 0 {
        errors.push(ValidationError::ZeroInterval);
    }
    if let Err(e) = check_range("threshold", config.threshold, 0.0, 1.0) {
        errors.push(e);
    }
    if let Err(e) = check_range("silence_gate", config.silence_gate, 0.0, f64::MAX) {
        errors.push(e);
    }

    collect(errors)
}

/// Validate a whole settings file.
///
/// Sensitivity is range-checked when it is parsed, so only the detector
/// block is checked here.
pub fn validate_settings(settings: &Settings) -> ValidationResult<()> {
    validate_detector_config(&settings.detector)
}
