//! Configuration for the sonic-sight sound detector.
//!
//! This crate owns every tunable the live analyzer exposes and the files
//! they are persisted in.
//!
//! # Features
//!
//! - **Detector tunables**: analysis interval, match threshold, cooldown, silence gate
//! - **Sensitivity**: the 0–100 slider and its mapping onto the threshold
//! - **Settings file**: TOML load/save with validation
//! - **Paths**: platform config directory and the calibrated sound library
//!
//! # Example
//!
//! ```rust,no_run
//! use sonic_sight_config::{Sensitivity, Settings, paths};
//!
//! let settings = Settings::load_or_default(paths::settings_path()).unwrap();
//! let config = settings
//!     .with_sensitivity(Sensitivity::new(70).unwrap())
//!     .detector_config();
//! println!("threshold {:.2}", config.threshold);
//! ```

mod detector;
mod error;
mod sensitivity;
mod settings;

/// Platform-specific paths for settings and the sound library.
pub mod paths;

/// Range checks for detector tunables.
pub mod validation;

pub use detector::{
    DEFAULT_ANALYSIS_INTERVAL_MS, DEFAULT_COOLDOWN_MS, DEFAULT_SILENCE_GATE, DEFAULT_THRESHOLD,
    DetectorConfig,
};
pub use error::ConfigError;
pub use sensitivity::{LOOSEST_THRESHOLD, STRICTEST_THRESHOLD, Sensitivity};
pub use settings::Settings;
pub use validation::{
    ValidationError, ValidationResult, validate_detector_config, validate_settings,
};

// Re-export path utilities at crate root for convenience
pub use paths::{
    ensure_dir, list_library_files, settings_path, sound_id_from_path,
    user_config_dir, user_library_dir,
};
