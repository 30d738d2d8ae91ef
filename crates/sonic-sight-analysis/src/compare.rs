//! Similarity scoring between two signatures.
//!
//! Frame sequences long enough for alignment are compared with banded DTW on
//! normalized frames; anything shorter falls back to a variance-weighted
//! distance between the mean MFCC vectors. Loudness and zero-crossing rate
//! never enter the score, so microphone distance and gain do not matter.

use crate::dtw;
use crate::mfcc::NUM_MFCC;
use crate::signature::Signature;
use serde::Serialize;

/// Both sides need at least this many frames for the DTW path.
pub const MIN_DTW_FRAMES: usize = 3;

/// Gaussian kernel width applied to the DTW distance.
pub const DTW_SIGMA: f64 = 0.8;

/// Gaussian kernel width applied to the aggregate distance.
pub const AGGREGATE_SIGMA: f64 = 2.0;

/// Added to the reference variance before inverse weighting.
pub const VARIANCE_EPSILON: f64 = 0.5;

/// Which comparator produced a score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "method", rename_all = "lowercase")]
pub enum MatchMethod {
    /// Banded DTW over normalized frames.
    Dtw {
        /// Average per-step alignment cost.
        distance: f64,
    },
    /// Mean-MFCC fallback for short sequences.
    Aggregate {
        /// Variance-weighted RMS difference of the mean vectors.
        distance: f64,
    },
}

impl MatchMethod {
    /// Underlying distance before the kernel is applied.
    pub fn distance(&self) -> f64 {
        match self {
            MatchMethod::Dtw { distance } | MatchMethod::Aggregate { distance } => *distance,
        }
    }

    /// Short label for reports.
    pub fn name(&self) -> &'static str {
        match self {
            MatchMethod::Dtw { .. } => "dtw",
            MatchMethod::Aggregate { .. } => "aggregate",
        }
    }
}

/// Score plus the path that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Comparison {
    /// Similarity in `[0, 1]`, higher is closer.
    pub score: f64,
    /// Comparator details.
    #[serde(flatten)]
    pub method: MatchMethod,
}

/// `exp(-d² / 2σ²)`; NaN distances map to 0.
pub fn gaussian_similarity(distance: f64, sigma: f64) -> f64 {
    let score = (-(distance * distance) / (2.0 * sigma * sigma)).exp();
    if score.is_nan() { 0.0 } else { score }
}

/// DTW distance between the normalized frame sequences of two signatures.
pub fn dtw_similarity_distance(live: &Signature, reference: &Signature) -> f64 {
    let query = dtw::normalize_frames(live.mfcc_frames());
    let target = dtw::normalize_frames(reference.mfcc_frames());
    dtw::dtw_distance(&query, &target)
}

/// Mean-vector distance, each coefficient weighted by
/// `1 / (reference variance + ε)`.
pub fn aggregate_distance(live: &Signature, reference: &Signature) -> f64 {
    let weighted: f64 = live
        .mfcc_mean()
        .iter()
        .zip(reference.mfcc_mean().iter())
        .zip(reference.mfcc_variance().iter())
        .map(|((a, b), var)| {
            let diff = a - b;
            diff * diff / (var + VARIANCE_EPSILON)
        })
        .sum();
    (weighted / NUM_MFCC as f64).sqrt()
}

/// Compare `live` against `reference`, reporting which comparator ran.
///
/// The live/query signature is always the first argument; DTW rows follow
/// it and the aggregate fallback weights by the reference's variance.
pub fn compare_detailed(live: &Signature, reference: &Signature) -> Comparison {
    if live.frame_count() >= MIN_DTW_FRAMES && reference.frame_count() >= MIN_DTW_FRAMES {
        let distance = dtw_similarity_distance(live, reference);
        Comparison {
            score: gaussian_similarity(distance, DTW_SIGMA),
            method: MatchMethod::Dtw { distance },
        }
    } else {
        let distance = aggregate_distance(live, reference);
        Comparison {
            score: gaussian_similarity(distance, AGGREGATE_SIGMA),
            method: MatchMethod::Aggregate { distance },
        }
    }
}

/// Similarity in `[0, 1]` between `live` and `reference`.
pub fn compare(live: &Signature, reference: &Signature) -> f64 {
    compare_detailed(live, reference).score
}

/// Highest-scoring library entry at or above `threshold`.
///
/// Ties keep the earlier entry.
pub fn find_best_match<'a, K>(
    live: &Signature,
    library: impl IntoIterator<Item = (K, &'a Signature)>,
    threshold: f64,
) -> Option<(K, f64)> {
    let mut best: Option<(K, f64)> = None;
    for (key, reference) in library {
        let score = compare(live, reference);
        if score >= threshold && best.as_ref().is_none_or(|(_, s)| score > *s) {
            best = Some((key, score));
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frames(len: usize, offset: f64) -> Vec<crate::MfccVector> {
        (0..len)
            .map(|t| {
                let mut v = [0.0; NUM_MFCC];
                for (k, c) in v.iter_mut().enumerate() {
                    *c = (t as f64 * 0.2 + k as f64 * 0.9).cos() + offset;
                }
                v
            })
            .collect()
    }

    #[test]
    fn test_gaussian_similarity() {
        assert_eq!(gaussian_similarity(0.0, DTW_SIGMA), 1.0);
        assert_eq!(gaussian_similarity(f64::INFINITY, DTW_SIGMA), 0.0);
        assert_eq!(gaussian_similarity(f64::NAN, DTW_SIGMA), 0.0);
        let half = gaussian_similarity(DTW_SIGMA, DTW_SIGMA);
        assert!((half - (-0.5f64).exp()).abs() < 1e-12);
    }

    #[test]
    fn test_self_comparison_dtw() {
        let sig = Signature::from_frames(frames(20, 0.0), &[0.1, -0.1]);
        let result = compare_detailed(&sig, &sig);
        assert!(matches!(result.method, MatchMethod::Dtw { .. }));
        assert!((result.score - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_short_sequences_use_aggregate() {
        let short = Signature::from_frames(frames(2, 0.0), &[0.1]);
        let long = Signature::from_frames(frames(20, 0.0), &[0.1]);

        let result = compare_detailed(&short, &long);
        assert!(matches!(result.method, MatchMethod::Aggregate { .. }));
        assert_eq!(compare_detailed(&short, &short).score, 1.0);
    }

    #[test]
    fn test_empty_signatures_compare_equal() {
        let empty = Signature::from_frames(Vec::new(), &[]);
        assert_eq!(compare(&empty, &empty), 1.0);
    }

    #[test]
    fn test_dtw_ignores_offset() {
        let a = Signature::from_frames(frames(20, 0.0), &[0.1]);
        let b = Signature::from_frames(frames(20, 7.0), &[0.9]);
        assert!(compare(&a, &b) > 0.99);
    }

    #[test]
    fn test_aggregate_weights_by_reference_variance() {
        let mut lo = [0.0; NUM_MFCC];
        lo[0] = 1.0;
        let live = Signature::from_frames(vec![lo], &[]);
        let quiet = Signature::from_frames(vec![[0.0; NUM_MFCC]], &[]);
        // Same mean but wide spread on every coefficient
        let spread = Signature::from_frames(vec![[-3.0; NUM_MFCC], [3.0; NUM_MFCC]], &[]);

        assert!(aggregate_distance(&live, &spread) < aggregate_distance(&live, &quiet));
    }

    #[test]
    fn test_find_best_match() {
        let live = Signature::from_frames(frames(20, 0.0), &[]);
        let same = live.clone();
        let other = Signature::from_frames(
            (0..20)
                .map(|t| {
                    let mut v = [0.0; NUM_MFCC];
                    v[t % NUM_MFCC] = 5.0;
                    v
                })
                .collect(),
            &[],
        );

        let library = [("other", &other), ("same", &same)];
        let (key, score) = find_best_match(&live, library, 0.65).unwrap();
        assert_eq!(key, "same");
        assert!(score > 0.99);

        assert!(find_best_match(&live, [("other", &other)], 1.01).is_none());
    }

    #[test]
    fn test_comparison_json() {
        let sig = Signature::from_frames(frames(5, 0.0), &[]);
        let json = serde_json::to_value(compare_detailed(&sig, &sig)).unwrap();
        assert_eq!(json["method"], "dtw");
        assert_eq!(json["distance"], 0.0);
        assert_eq!(json["score"], 1.0);
    }
}
