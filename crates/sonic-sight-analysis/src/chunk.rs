//! Materialized audio buffers handed to the analysis core.

use crate::dynamics;
use serde::{Deserialize, Serialize};

/// A mono block of normalized `f32` samples at a known sample rate.
///
/// This is the unit of exchange between an audio source and the live
/// analyzer; capture and decoding happen elsewhere.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioChunk {
    /// Samples in `[-1.0, 1.0]`.
    pub samples: Vec<f32>,
    /// Sample rate in Hz.
    pub sample_rate: u32,
}

impl AudioChunk {
    /// Wrap a sample buffer.
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// True when the chunk carries no samples.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Duration in seconds (0 when the sample rate is unknown).
    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            0.0
        } else {
            self.samples.len() as f64 / f64::from(self.sample_rate)
        }
    }

    /// RMS level of the whole chunk.
    pub fn rms(&self) -> f64 {
        dynamics::rms(&self.samples)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duration() {
        let chunk = AudioChunk::new(vec![0.0; 22050], 44100);
        assert_eq!(chunk.len(), 22050);
        assert!((chunk.duration_secs() - 0.5).abs() < 1e-12);
        assert_eq!(AudioChunk::new(vec![0.0; 10], 0).duration_secs(), 0.0);
    }

    #[test]
    fn test_empty_chunk() {
        let chunk = AudioChunk::default();
        assert!(chunk.is_empty());
        assert_eq!(chunk.rms(), 0.0);
    }
}
