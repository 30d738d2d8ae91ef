//! Bounded rolling buffer of recent MFCC frames.

use sonic_sight_analysis::MfccVector;
use std::collections::VecDeque;

/// Default capacity, about four seconds of audio at hop 512.
pub const FRAME_BUFFER_CAPACITY: usize = 400;

/// Append-only frame history that drops its oldest frames past capacity.
///
/// Frame order is always the order frames were pushed.
#[derive(Debug, Clone)]
pub struct FrameBuffer {
    frames: VecDeque<MfccVector>,
    capacity: usize,
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new(FRAME_BUFFER_CAPACITY)
    }
}

impl FrameBuffer {
    /// Create an empty buffer holding at most `capacity` frames.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "frame buffer capacity must be non-zero");
        Self {
            frames: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append frames, evicting the oldest to stay within capacity.
    ///
    /// Returns how many frames were evicted.
    pub fn extend(&mut self, frames: impl IntoIterator<Item = MfccVector>) -> usize {
        self.frames.extend(frames);
        let excess = self.frames.len().saturating_sub(self.capacity);
        self.frames.drain(..excess);
        excess
    }

    /// The most recent `count` frames, oldest first.
    pub fn recent(&self, count: usize) -> Vec<MfccVector> {
        let skip = self.frames.len().saturating_sub(count);
        self.frames.iter().skip(skip).copied().collect()
    }

    /// Iterate frames oldest first.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &MfccVector> {
        self.frames.iter()
    }

    /// Number of buffered frames.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// True when nothing is buffered.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Maximum number of frames kept.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Discard every frame.
    pub fn clear(&mut self) {
        self.frames.clear();
    }
}
