//! Immutable sound fingerprints.
//!
//! A [`Signature`] bundles the per-frame MFCC sequence with its per-coefficient
//! mean and population variance, plus whole-buffer RMS and zero-crossing rate.
//! The JSON form uses the field names `mfccMean`, `mfccVariance`,
//! `mfccFrames`, `rms` and `zcr`.

use crate::dynamics;
use crate::error::{Error, Result};
use crate::mfcc::{MfccExtractor, MfccVector, NUM_MFCC};
use serde::{Deserialize, Serialize};

/// Fingerprint of one recording.
///
/// Built once and never mutated; every frame vector has [`NUM_MFCC`]
/// coefficients and the frame order is the recording's temporal order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Signature {
    mfcc_mean: MfccVector,
    mfcc_variance: MfccVector,
    mfcc_frames: Vec<MfccVector>,
    rms: f64,
    zcr: f64,
}

impl Signature {
    /// Fingerprint a raw sample buffer using default MFCC parameters.
    ///
    /// A buffer too short for one analysis frame still produces a signature,
    /// with no frames and zero-filled mean and variance.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidInput`] for an empty buffer or a zero sample rate.
    pub fn from_samples(samples: &[f32], sample_rate: u32) -> Result<Self> {
        if samples.is_empty() {
            return Err(Error::InvalidInput("empty sample buffer".into()));
        }
        let extractor = MfccExtractor::new(sample_rate)?;
        Self::with_extractor(&extractor, samples)
    }

    /// Fingerprint a raw sample buffer with a prepared extractor.
    pub fn with_extractor(extractor: &MfccExtractor, samples: &[f32]) -> Result<Self> {
        if samples.is_empty() {
            return Err(Error::InvalidInput("empty sample buffer".into()));
        }
        Ok(Self::from_frames(extractor.extract(samples), samples))
    }

    /// Assemble a signature from an already-extracted frame sequence.
    ///
    /// `samples` only feeds the RMS and zero-crossing statistics; the live
    /// analyzer passes the current chunk here while `frames` comes from its
    /// rolling buffer.
    pub fn from_frames(frames: Vec<MfccVector>, samples: &[f32]) -> Self {
        let (mfcc_mean, mfcc_variance) = mean_and_variance(&frames);
        Self {
            mfcc_mean,
            mfcc_variance,
            mfcc_frames: frames,
            rms: dynamics::rms(samples),
            zcr: dynamics::zero_crossing_rate(samples),
        }
    }

    /// Per-coefficient mean across frames.
    pub fn mfcc_mean(&self) -> &MfccVector {
        &self.mfcc_mean
    }

    /// Per-coefficient population variance across frames.
    pub fn mfcc_variance(&self) -> &MfccVector {
        &self.mfcc_variance
    }

    /// Per-frame MFCC vectors in temporal order.
    pub fn mfcc_frames(&self) -> &[MfccVector] {
        &self.mfcc_frames
    }

    /// Whole-buffer RMS.
    pub fn rms(&self) -> f64 {
        self.rms
    }

    /// Whole-buffer zero-crossing rate.
    pub fn zcr(&self) -> f64 {
        self.zcr
    }

    /// Number of analysis frames.
    pub fn frame_count(&self) -> usize {
        self.mfcc_frames.len()
    }

    /// True when the source was too short for a single frame.
    pub fn is_empty(&self) -> bool {
        self.mfcc_frames.is_empty()
    }

    /// Serialize to compact JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Serialize to indented JSON.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse from JSON. Frames with the wrong dimensionality are rejected.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Fingerprint a raw sample buffer (see [`Signature::from_samples`]).
pub fn extract_signature(samples: &[f32], sample_rate: u32) -> Result<Signature> {
    Signature::from_samples(samples, sample_rate)
}

/// Per-coefficient mean and population variance; zeros for no frames.
fn mean_and_variance(frames: &[MfccVector]) -> (MfccVector, MfccVector) {
    let mut mean = [0.0; NUM_MFCC];
    let mut variance = [0.0; NUM_MFCC];
    if frames.is_empty() {
        return (mean, variance);
    }

    let count = frames.len() as f64;
    for frame in frames {
        for (m, &c) in mean.iter_mut().zip(frame.iter()) {
            *m += c;
        }
    }
    for m in &mut mean {
        *m /= count;
    }

    for frame in frames {
        for ((v, &c), &m) in variance.iter_mut().zip(frame.iter()).zip(mean.iter()) {
            *v += (c - m) * (c - m);
        }
    }
    for v in &mut variance {
        *v /= count;
    }

    (mean, variance)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_and_variance() {
        let mut a = [0.0; NUM_MFCC];
        let mut b = [0.0; NUM_MFCC];
        a[0] = 1.0;
        b[0] = 3.0;
        a[1] = 5.0;
        b[1] = 5.0;

        let sig = Signature::from_frames(vec![a, b], &[0.5, -0.5]);
        assert_eq!(sig.mfcc_mean()[0], 2.0);
        assert_eq!(sig.mfcc_variance()[0], 1.0);
        assert_eq!(sig.mfcc_mean()[1], 5.0);
        assert_eq!(sig.mfcc_variance()[1], 0.0);
        assert_eq!(sig.frame_count(), 2);
    }

    #[test]
    fn test_empty_buffer_is_rejected() {
        assert!(matches!(
            Signature::from_samples(&[], 44100),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_short_buffer_has_no_frames() {
        let sig = Signature::from_samples(&[0.25; 1000], 44100).unwrap();
        assert!(sig.is_empty());
        assert_eq!(sig.mfcc_mean(), &[0.0; NUM_MFCC]);
        assert_eq!(sig.mfcc_variance(), &[0.0; NUM_MFCC]);
        assert!((sig.rms() - 0.25).abs() < 1e-9);
    }

    #[test]
    fn test_from_frames_without_samples() {
        let sig = Signature::from_frames(vec![[1.0; NUM_MFCC]; 4], &[]);
        assert_eq!(sig.rms(), 0.0);
        assert_eq!(sig.zcr(), 0.0);
    }

    #[test]
    fn test_json_field_names() {
        let sig = Signature::from_frames(vec![[0.5; NUM_MFCC]; 3], &[0.1, -0.1]);
        let json = sig.to_json().unwrap();

        for key in ["mfccMean", "mfccVariance", "mfccFrames", "rms", "zcr"] {
            assert!(json.contains(&format!("\"{key}\"")), "missing {key}: {json}");
        }
        let restored = Signature::from_json(&json).unwrap();
        assert_eq!(restored.frame_count(), 3);
        assert!((restored.rms() - sig.rms()).abs() < 1e-12);
    }

    #[test]
    fn test_json_rejects_wrong_dimension() {
        let json = r#"{"mfccMean":[0.0],"mfccVariance":[0.0],"mfccFrames":[],"rms":0.0,"zcr":0.0}"#;
        assert!(matches!(Signature::from_json(json), Err(Error::Json(_))));
    }
}
