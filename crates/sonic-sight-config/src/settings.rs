//! The user settings file.

use crate::detector::DetectorConfig;
use crate::error::ConfigError;
use crate::sensitivity::Sensitivity;
use crate::validation::validate_settings;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Persisted user settings.
///
/// When `sensitivity` is present it overrides `detector.threshold`.
///
/// ```toml
/// sensitivity = 50
///
/// [detector]
/// analysis_interval_ms = 500
/// cooldown_ms = 3000
/// silence_gate = 0.008
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Sensitivity slider position.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sensitivity: Option<Sensitivity>,
    /// Detector tunables.
    pub detector: DetectorConfig,
}

impl Settings {
    /// Load and validate settings from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
        Self::from_toml(&content)
    }

    /// Load settings, or the defaults when the file does not exist yet.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse and validate settings from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let settings: Settings = toml::from_str(toml_str)?;
        validate_settings(&settings)?;
        Ok(settings)
    }

    /// Save the settings to a TOML file, creating parent directories.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::create_dir(parent, e))?;
        }

        let content = self.to_toml()?;
        std::fs::write(path, content).map_err(|e| ConfigError::write_file(path, e))?;
        Ok(())
    }

    /// Serialize to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Replace the sensitivity.
    pub fn with_sensitivity(mut self, sensitivity: Sensitivity) -> Self {
        self.sensitivity = Some(sensitivity);
        self
    }

    /// Effective detector configuration, with the sensitivity mapping applied.
    pub fn detector_config(&self) -> DetectorConfig {
        match self.sensitivity {
            Some(sensitivity) => self.detector.with_threshold(sensitivity.threshold()),
            None => self.detector,
        }
    }
}
