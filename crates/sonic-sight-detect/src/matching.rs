//! Scoring the rolling buffer against the calibrated library.
//!
//! Each sound is compared against only the most recent stretch of buffered
//! frames, sized from that sound's own calibration length, so short and
//! long sounds are judged on comparable windows.

use crate::buffer::FrameBuffer;
use crate::sound::CalibratedSound;
use sonic_sight_analysis::{Signature, compare};

/// Never compare on fewer buffered frames than this.
pub const MIN_WINDOW_FRAMES: usize = 8;

/// Fraction of a sound's calibration frames that must be buffered.
pub const MIN_COVERAGE: f64 = 0.4;

/// Window length as a multiple of the calibration length.
pub const WINDOW_SLACK: f64 = 1.3;

/// One sound's score for the current buffer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SoundScore<'a> {
    /// The scored sound.
    pub sound: &'a CalibratedSound,
    /// Similarity in `[0, 1]`.
    pub score: f64,
}

/// Buffered frames needed before a sound of `calibrated_frames` is scored.
pub fn required_frames(calibrated_frames: usize) -> usize {
    let coverage = (calibrated_frames as f64 * MIN_COVERAGE).ceil() as usize;
    coverage.max(MIN_WINDOW_FRAMES)
}

/// Number of recent frames compared against a sound of `calibrated_frames`.
pub fn window_size(buffered: usize, calibrated_frames: usize) -> usize {
    let slack = (calibrated_frames as f64 * WINDOW_SLACK).ceil() as usize;
    buffered.min(slack)
}

/// Score every matchable sound that has enough buffered context.
///
/// `samples` is the current raw chunk; it only feeds the window signature's
/// loudness statistics. Non-finite scores are logged and dropped without
/// affecting the other sounds.
pub fn score_buffer<'a>(
    buffer: &FrameBuffer,
    samples: &[f32],
    library: &'a [CalibratedSound],
) -> Vec<SoundScore<'a>> {
    let mut scores = Vec::with_capacity(library.len());

    for sound in library {
        let Some(reference) = sound.matchable_signature() else {
            continue;
        };
        let calibrated = reference.frame_count();
        if buffer.len() < required_frames(calibrated) {
            continue;
        }

        let window = buffer.recent(window_size(buffer.len(), calibrated));
        let live = Signature::from_frames(window, samples);
        let score = compare(&live, reference);

        if !score.is_finite() {
            tracing::warn!(sound = %sound.id, score, "non-finite score, skipping sound");
            continue;
        }
        tracing::trace!(sound = %sound.id, score, "scored");
        scores.push(SoundScore { sound, score });
    }

    scores
}

/// Highest score in `scores`, ties going to the earlier entry.
pub fn highest<'a>(scores: &[SoundScore<'a>]) -> Option<SoundScore<'a>> {
    scores
        .iter()
        .copied()
        .fold(None, |best: Option<SoundScore<'a>>, candidate| match best {
            Some(b) if b.score >= candidate.score => Some(b),
            _ => Some(candidate),
        })
}

/// Best-scoring sound at or above `threshold`, if any.
pub fn best_match_from_buffer<'a>(
    buffer: &FrameBuffer,
    samples: &[f32],
    library: &'a [CalibratedSound],
    threshold: f64,
) -> Option<SoundScore<'a>> {
    highest(&score_buffer(buffer, samples, library)).filter(|best| best.score >= threshold)
}
