//! Calibrated reference sounds and the on-disk library.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use sonic_sight_analysis::Signature;
use sonic_sight_analysis::compare::MIN_DTW_FRAMES;
use sonic_sight_config::paths;
use std::path::Path;

/// A user-calibrated sound.
///
/// `signature` is absent until calibration completes; such sounds are kept
/// in the library but never matched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalibratedSound {
    /// Stable identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Display color, e.g. `#ff6b6b`.
    pub color: String,
    /// Fingerprint of the calibration recording.
    #[serde(default)]
    pub signature: Option<Signature>,
}

impl CalibratedSound {
    /// Create an uncalibrated sound.
    pub fn new(id: impl Into<String>, name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            color: color.into(),
            signature: None,
        }
    }

    /// Attach a calibration signature.
    pub fn with_signature(mut self, signature: Signature) -> Self {
        self.signature = Some(signature);
        self
    }

    /// Signature usable for live matching (at least three frames).
    pub fn matchable_signature(&self) -> Option<&Signature> {
        self.signature
            .as_ref()
            .filter(|s| s.frame_count() >= MIN_DTW_FRAMES)
    }

    /// True when the live analyzer will consider this sound.
    pub fn is_matchable(&self) -> bool {
        self.matchable_signature().is_some()
    }

    /// Load a sound from its JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| Error::ReadSound {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| Error::InvalidSound {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Write the sound as `<dir>/<id>.json`, returning the path.
    pub fn save_to_dir(&self, dir: impl AsRef<Path>) -> Result<std::path::PathBuf> {
        let path = paths::sound_path(dir.as_ref(), &self.id);
        let json = serde_json::to_string_pretty(self).map_err(|source| Error::InvalidSound {
            path: path.clone(),
            source,
        })?;
        std::fs::write(&path, json).map_err(|source| Error::WriteSound {
            path: path.clone(),
            source,
        })?;
        Ok(path)
    }
}

/// Load every sound in a library directory, sorted by file name.
///
/// Unreadable or malformed files are logged and skipped so one bad file
/// cannot take the whole library down.
pub fn load_library(dir: impl AsRef<Path>) -> Vec<CalibratedSound> {
    paths::list_library_files(dir.as_ref())
        .into_iter()
        .filter_map(|path| match CalibratedSound::load(&path) {
            Ok(sound) => Some(sound),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "skipping sound file");
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use sonic_sight_analysis::NUM_MFCC;
    use tempfile::TempDir;

    fn signature(frames: usize) -> Signature {
        Signature::from_frames(vec![[0.5; NUM_MFCC]; frames], &[0.1, -0.1])
    }

    #[test]
    fn test_matchable_requires_three_frames() {
        let sound = CalibratedSound::new("bell", "Doorbell", "#4ecdc4");
        assert!(!sound.is_matchable());
        assert!(!sound.clone().with_signature(signature(2)).is_matchable());
        assert!(sound.with_signature(signature(3)).is_matchable());
    }

    #[test]
    fn test_json_shape() {
        let sound = CalibratedSound::new("bell", "Doorbell", "#4ecdc4").with_signature(signature(3));
        let json: serde_json::Value = serde_json::to_value(&sound).unwrap();

        assert_eq!(json["id"], "bell");
        assert_eq!(json["color"], "#4ecdc4");
        assert!(json["signature"]["mfccFrames"].is_array());
    }

    #[test]
    fn test_missing_signature_parses() {
        let sound: CalibratedSound =
            serde_json::from_str(r##"{"id":"a","name":"A","color":"#fff"}"##).unwrap();
        assert!(sound.signature.is_none());
    }

    #[test]
    fn test_library_round_trip_skips_bad_files() {
        let temp_dir = TempDir::new().unwrap();
        let bell = CalibratedSound::new("bell", "Doorbell", "#4ecdc4").with_signature(signature(5));
        let alarm = CalibratedSound::new("alarm", "Smoke alarm", "#ff6b6b");

        bell.save_to_dir(temp_dir.path()).unwrap();
        alarm.save_to_dir(temp_dir.path()).unwrap();
        std::fs::write(temp_dir.path().join("broken.json"), "{not json").unwrap();

        let library = load_library(temp_dir.path());
        let ids: Vec<&str> = library.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["alarm", "bell"]);
        assert!(library[1].is_matchable());
        assert_eq!(library[1].matchable_signature().unwrap().frame_count(), 5);
    }

    #[test]
    fn test_load_missing_file() {
        let err = CalibratedSound::load("/nonexistent/sound.json").unwrap_err();
        assert!(matches!(err, Error::ReadSound { .. }));
    }
}
