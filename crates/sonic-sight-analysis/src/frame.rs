//! Slicing a sample buffer into overlapping analysis frames.

use std::iter::FusedIterator;

/// Default analysis frame length in samples.
pub const DEFAULT_FRAME_SIZE: usize = 2048;

/// Default hop between consecutive frames (4:1 overlap).
pub const DEFAULT_HOP_SIZE: usize = 512;

/// Number of whole frames that fit in `len` samples.
///
/// A buffer shorter than one frame yields zero frames.
pub fn frame_count(len: usize, frame_size: usize, hop_size: usize) -> usize {
    if frame_size == 0 || hop_size == 0 || len < frame_size {
        0
    } else {
        (len - frame_size) / hop_size + 1
    }
}

/// Lazily slice `samples` into frames of `frame_size` starting every
/// `hop_size` samples.
///
/// Only frames that fit entirely inside the buffer are produced; the tail
/// is dropped rather than zero-padded.
///
/// # Panics
///
/// Panics if `frame_size` or `hop_size` is zero.
pub fn frames(samples: &[f32], frame_size: usize, hop_size: usize) -> Frames<'_> {
    assert!(frame_size > 0, "frame size must be non-zero");
    assert!(hop_size > 0, "hop size must be non-zero");
    Frames {
        samples,
        frame_size,
        hop_size,
        offset: 0,
    }
}

/// Iterator returned by [`frames`].
#[derive(Debug, Clone)]
pub struct Frames<'a> {
    samples: &'a [f32],
    frame_size: usize,
    hop_size: usize,
    offset: usize,
}

impl<'a> Iterator for Frames<'a> {
    type Item = &'a [f32];

    fn next(&mut self) -> Option<Self::Item> {
        let end = self.offset + self.frame_size;
        if end > self.samples.len() {
            return None;
        }
        let frame = &self.samples[self.offset..end];
        self.offset += self.hop_size;
        Some(frame)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = frame_count(
            self.samples.len().saturating_sub(self.offset),
            self.frame_size,
            self.hop_size,
        );
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Frames<'_> {}

impl FusedIterator for Frames<'_> {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_offsets() {
        let samples: Vec<f32> = (0..20).map(|i| i as f32).collect();
        let starts: Vec<f32> = frames(&samples, 8, 4).map(|f| f[0]).collect();

        assert_eq!(starts, vec![0.0, 4.0, 8.0, 12.0]);
        assert!(frames(&samples, 8, 4).all(|f| f.len() == 8));
    }

    #[test]
    fn test_short_buffer_yields_nothing() {
        let samples = vec![0.5; 2047];
        assert_eq!(frames(&samples, 2048, 512).count(), 0);
        assert_eq!(frame_count(samples.len(), 2048, 512), 0);
    }

    #[test]
    fn test_exact_size_matches_count() {
        let samples = vec![0.0; 44100];
        let iter = frames(&samples, DEFAULT_FRAME_SIZE, DEFAULT_HOP_SIZE);

        // (44100 - 2048) / 512 + 1
        assert_eq!(iter.len(), 83);
        assert_eq!(iter.count(), 83);
    }

    #[test]
    fn test_size_hint_shrinks() {
        let samples = vec![0.0; 16];
        let mut iter = frames(&samples, 8, 4);
        assert_eq!(iter.len(), 3);
        iter.next();
        assert_eq!(iter.len(), 2);
    }
}
