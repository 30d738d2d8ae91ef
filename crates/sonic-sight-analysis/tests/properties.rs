//! Property-based tests for the fingerprint and matching invariants.
//!
//! Random sample buffers and random frame sequences check that scores stay
//! in range, self-similarity holds, and nothing produces NaN.

use proptest::prelude::*;
use sonic_sight_analysis::{
    MfccVector, NUM_MFCC, Signature, band_width, compare, dtw_distance, extract_mfcc_frames,
    normalize_frames,
};

/// Random MFCC-like frame sequences of 0..60 frames.
fn frame_sequence() -> impl Strategy<Value = Vec<MfccVector>> {
    prop::collection::vec(prop::array::uniform13(-50.0f64..50.0), 0..60)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// Any buffer of 4096..12000 samples compares to itself at >= 0.99.
    #[test]
    fn self_comparison_holds(
        samples in prop::collection::vec(-1.0f32..=1.0f32, 4096..12000),
    ) {
        let sig = Signature::from_samples(&samples, 44100).unwrap();
        let score = compare(&sig, &sig);
        prop_assert!(score >= 0.99, "self score {}", score);
    }

    /// Extraction on the same input twice is bit-identical and finite.
    #[test]
    fn extraction_is_pure_and_finite(
        samples in prop::collection::vec(-1.0f32..=1.0f32, 0..8000),
        sample_rate in prop::sample::select(vec![16000u32, 22050, 44100, 48000]),
    ) {
        let first = extract_mfcc_frames(&samples, sample_rate).unwrap();
        let second = extract_mfcc_frames(&samples, sample_rate).unwrap();
        prop_assert_eq!(&first, &second);
        prop_assert!(first.iter().flatten().all(|c| c.is_finite()));
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// The band always contains the diagonal, so self distance is zero.
    #[test]
    fn dtw_self_distance_is_zero(frames in frame_sequence()) {
        prop_assume!(!frames.is_empty());
        let normalized = normalize_frames(&frames);
        prop_assert_eq!(dtw_distance(&normalized, &normalized), 0.0);
    }

    /// Scores stay in [0, 1] for arbitrary frame sequences of either method.
    #[test]
    fn scores_are_bounded(a in frame_sequence(), b in frame_sequence()) {
        let live = Signature::from_frames(a, &[]);
        let reference = Signature::from_frames(b, &[]);
        let score = compare(&live, &reference);
        prop_assert!((0.0..=1.0).contains(&score), "score {}", score);
    }

    /// Normalized frames are unit length or (near-)zero.
    #[test]
    fn normalized_frames_have_bounded_norm(frames in frame_sequence()) {
        for frame in normalize_frames(&frames) {
            let norm = frame.iter().map(|c| c * c).sum::<f64>().sqrt();
            prop_assert!(norm <= 1.0 + 1e-9);
            prop_assert_eq!(frame.len(), NUM_MFCC);
        }
    }

    /// The band never drops below the minimum width.
    #[test]
    fn band_has_floor(n in 0usize..2000, m in 0usize..2000) {
        let band = band_width(n, m);
        prop_assert!(band >= 10);
        prop_assert!(band as f64 >= n.max(m) as f64 * 0.25);
    }
}
