//! User-facing sensitivity control.
//!
//! Sensitivity runs 0 to 100 and maps linearly onto the match threshold:
//! 0 is the strictest (0.80), 100 the most permissive (0.50), and the
//! default of 50 lands on 0.65.

use crate::validation::{ValidationError, ValidationResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Threshold at sensitivity 0.
pub const STRICTEST_THRESHOLD: f64 = 0.80;

/// Threshold at sensitivity 100.
pub const LOOSEST_THRESHOLD: f64 = 0.50;

/// Sensitivity level in `0..=100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Sensitivity(u8);

impl Sensitivity {
    /// Highest sensitivity.
    pub const MAX: u8 = 100;

    /// Factory default.
    pub const DEFAULT: Sensitivity = Sensitivity(50);

    /// Create a sensitivity level.
    ///
    /// # Errors
    ///
    /// [`ValidationError::SensitivityOutOfRange`] above 100.
    pub fn new(value: u8) -> ValidationResult<Self> {
        if value > Self::MAX {
            Err(ValidationError::SensitivityOutOfRange(value))
        } else {
            Ok(Self(value))
        }
    }

    /// Raw level.
    pub fn value(self) -> u8 {
        self.0
    }

    /// Match threshold for this level: `0.80 - 0.30 * s / 100`.
    pub fn threshold(self) -> f64 {
        STRICTEST_THRESHOLD
            - (STRICTEST_THRESHOLD - LOOSEST_THRESHOLD) * f64::from(self.0) / f64::from(Self::MAX)
    }
}

impl Default for Sensitivity {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<u8> for Sensitivity {
    type Error = ValidationError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Sensitivity> for u8 {
    fn from(s: Sensitivity) -> u8 {
        s.0
    }
}

impl fmt::Display for Sensitivity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
