//! Detection events emitted by the live analyzer.

use crate::sound::CalibratedSound;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A calibrated sound was heard.
///
/// Serialized with the field names `soundId`, `name`, `color`, `score` and
/// `timestamp` (Unix milliseconds).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectionEvent {
    /// Identifier of the matched sound.
    pub sound_id: String,
    /// Display name of the matched sound.
    pub name: String,
    /// Display color of the matched sound.
    pub color: String,
    /// Similarity in `[0, 1]`.
    pub score: f64,
    /// Emission time in milliseconds.
    pub timestamp: i64,
}

impl DetectionEvent {
    /// Event for `sound` scored at `score`, stamped `timestamp`.
    pub fn new(sound: &CalibratedSound, score: f64, timestamp: i64) -> Self {
        Self {
            sound_id: sound.id.clone(),
            name: sound.name.clone(),
            color: sound.color.clone(),
            score,
            timestamp,
        }
    }
}

impl fmt::Display for DetectionEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}) detected, score {:.0}%",
            self.name,
            self.sound_id,
            self.score * 100.0
        )
    }
}
