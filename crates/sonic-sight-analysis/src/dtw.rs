//! Banded dynamic time warping over MFCC frame sequences.
//!
//! The grid is constrained by a Sakoe–Chiba band whose center follows the
//! diagonal `round(i·m/n)`. Only two rows are kept, so memory is O(m) in the
//! length of the second (reference) sequence, not O(min(n, m)). Rows are
//! never transposed onto the shorter side because the band center is tied to
//! the row index; swapping roles would change which cells the band admits.
//! The live window is at most 1.3 times the reference length, so the
//! reference is the shorter side or close to it in practice.
//!
//! The band center is computed from the row index, which makes the distance
//! only approximately symmetric when the lengths differ. Callers pass the
//! live/query sequence first and the library sequence second.

use crate::mfcc::{MfccVector, NUM_MFCC};

/// Fraction of the longer sequence allowed as warping slack.
pub const BAND_FRACTION: f64 = 0.25;

/// Minimum band half-width in frames.
pub const MIN_BAND: usize = 10;

/// Frames whose centered norm falls below this are left unscaled.
pub const NORM_EPSILON: f64 = 1e-8;

/// Sakoe–Chiba half-width for sequences of length `n` and `m`.
pub fn band_width(n: usize, m: usize) -> usize {
    let longest = n.max(m) as f64;
    ((longest * BAND_FRACTION).ceil() as usize).max(MIN_BAND)
}

/// Euclidean distance between two MFCC vectors.
fn frame_distance(a: &MfccVector, b: &MfccVector) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f64>()
        .sqrt()
}

/// Center each coefficient on the sequence mean, then scale every frame to
/// unit length.
///
/// Removes microphone gain and DC bias so only the shape of the spectral
/// trajectory remains. Near-silent frames stay centered but unscaled.
pub fn normalize_frames(frames: &[MfccVector]) -> Vec<MfccVector> {
    if frames.is_empty() {
        return Vec::new();
    }

    let count = frames.len() as f64;
    let mut mean = [0.0; NUM_MFCC];
    for frame in frames {
        for (m, &c) in mean.iter_mut().zip(frame.iter()) {
            *m += c;
        }
    }
    for m in &mut mean {
        *m /= count;
    }

    frames
        .iter()
        .map(|frame| {
            let mut centered = [0.0; NUM_MFCC];
            for ((out, &c), &m) in centered.iter_mut().zip(frame.iter()).zip(mean.iter()) {
                *out = c - m;
            }

            let norm = centered.iter().map(|c| c * c).sum::<f64>().sqrt();
            if norm >= NORM_EPSILON {
                for c in &mut centered {
                    *c /= norm;
                }
            }
            centered
        })
        .collect()
}

/// Average per-step cost of the best banded alignment of `query` onto
/// `reference`.
///
/// Returns `f64::INFINITY` when either side is empty, or when the band
/// cannot connect the two corners (extreme length ratios).
pub fn dtw_distance(query: &[MfccVector], reference: &[MfccVector]) -> f64 {
    let n = query.len();
    let m = reference.len();
    if n == 0 || m == 0 {
        return f64::INFINITY;
    }

    let band = band_width(n, m);
    let mut prev = vec![f64::INFINITY; m + 1];
    let mut curr = vec![f64::INFINITY; m + 1];
    prev[0] = 0.0;

    for (i, q) in query.iter().enumerate().map(|(i, q)| (i + 1, q)) {
        curr.fill(f64::INFINITY);

        let center = (i as f64 * m as f64 / n as f64).round() as usize;
        let j_min = center.saturating_sub(band).max(1);
        let j_max = (center + band).min(m);

        for j in j_min..=j_max {
            let cost = frame_distance(q, &reference[j - 1]);
            let best = prev[j].min(curr[j - 1]).min(prev[j - 1]);
            curr[j] = cost + best;
        }

        std::mem::swap(&mut prev, &mut curr);
    }

    prev[m] / n.max(m) as f64
}
