//! The live analyzer: rolling buffer, match attempts, and cooldown.
//!
//! All mutable detection state lives in [`LiveAnalyzerState`], owned by a
//! single [`LiveAnalyzer`]. The caller owns the audio source and calls
//! [`LiveAnalyzer::tick`] on its own schedule; each tick runs to completion
//! before the next.

use crate::buffer::FrameBuffer;
use crate::clock::{Clock, SystemClock};
use crate::error::Result;
use crate::event::DetectionEvent;
use crate::matching::{highest, score_buffer};
use crate::sound::CalibratedSound;
use sonic_sight_analysis::{AudioChunk, MfccExtractor};
use sonic_sight_config::DetectorConfig;
use std::collections::HashMap;

/// Buffered frames needed before any match is attempted.
pub const MIN_BUFFERED_FRAMES: usize = 20;

/// What a single tick did.
#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    /// The analyzer is not running; nothing was touched.
    Stopped,
    /// The chunk fell under the silence gate; the buffer was left as is.
    Silent {
        /// RMS of the skipped chunk.
        rms: f64,
    },
    /// Not enough context buffered yet.
    Buffering {
        /// Frames currently buffered.
        frames: usize,
    },
    /// No sound reached the threshold.
    NoMatch {
        /// Highest score seen this tick, if any sound was scored.
        best: Option<f64>,
    },
    /// A sound matched but is still cooling down; the buffer was kept.
    Suppressed {
        /// Identifier of the matched sound.
        sound_id: String,
        /// Its score.
        score: f64,
        /// Milliseconds until it may fire again.
        remaining_ms: i64,
    },
    /// A sound was detected; the buffer was cleared.
    Detected(DetectionEvent),
}

impl TickOutcome {
    /// The emitted event, if any.
    pub fn event(&self) -> Option<&DetectionEvent> {
        match self {
            TickOutcome::Detected(event) => Some(event),
            _ => None,
        }
    }
}

/// Mutable state that exists only while the analyzer runs.
#[derive(Debug, Default)]
pub struct LiveAnalyzerState {
    buffer: FrameBuffer,
    last_detection: HashMap<String, i64>,
    extractor: Option<MfccExtractor>,
}

impl LiveAnalyzerState {
    /// Rolling frame buffer.
    pub fn buffer(&self) -> &FrameBuffer {
        &self.buffer
    }

    /// Time of the last accepted detection of `sound_id`.
    pub fn last_detection(&self, sound_id: &str) -> Option<i64> {
        self.last_detection.get(sound_id).copied()
    }

    /// Extractor for `sample_rate`, rebuilt when the rate changes.
    ///
    /// A failed rebuild keeps the previously cached extractor.
    fn extractor(&mut self, sample_rate: u32) -> Result<&MfccExtractor> {
        let extractor = match self.extractor.take() {
            Some(cached) if cached.sample_rate() == sample_rate => cached,
            cached => {
                tracing::debug!(sample_rate, "building MFCC extractor");
                match MfccExtractor::new(sample_rate) {
                    Ok(built) => built,
                    Err(e) => {
                        self.extractor = cached;
                        return Err(e.into());
                    }
                }
            }
        };
        Ok(self.extractor.insert(extractor))
    }
}

/// Continuous detector over a stream of audio chunks.
///
/// ```rust
/// use sonic_sight_analysis::AudioChunk;
/// use sonic_sight_config::DetectorConfig;
/// use sonic_sight_detect::{LiveAnalyzer, ManualClock, TickOutcome};
///
/// let mut analyzer =
///     LiveAnalyzer::with_clock(DetectorConfig::default(), ManualClock::new(0)).unwrap();
/// analyzer.start();
///
/// let quiet = AudioChunk::new(vec![0.0; 22050], 44100);
/// let outcome = analyzer.tick(&quiet, &[]).unwrap();
/// assert!(matches!(outcome, TickOutcome::Silent { .. }));
/// ```
#[derive(Debug)]
pub struct LiveAnalyzer<C: Clock = SystemClock> {
    config: DetectorConfig,
    clock: C,
    state: Option<LiveAnalyzerState>,
}

impl LiveAnalyzer<SystemClock> {
    /// Analyzer stamped with wall-clock time.
    pub fn new(config: DetectorConfig) -> Result<Self> {
        Self::with_clock(config, SystemClock)
    }
}

impl<C: Clock> LiveAnalyzer<C> {
    /// Analyzer with an explicit time source.
    ///
    /// Rejects configs that fail [`DetectorConfig::validate`], so a NaN
    /// threshold never reaches matching.
    pub fn with_clock(config: DetectorConfig, clock: C) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            clock,
            state: None,
        })
    }

    /// Begin a session with an empty buffer and cooldown map.
    ///
    /// Starting an already running analyzer keeps its state.
    pub fn start(&mut self) {
        if self.state.is_none() {
            tracing::info!(
                threshold = self.config.threshold,
                cooldown_ms = self.config.cooldown_ms,
                "live analyzer started"
            );
            self.state = Some(LiveAnalyzerState::default());
        }
    }

    /// End the session, discarding the buffer and cooldown map.
    pub fn stop(&mut self) {
        if self.state.take().is_some() {
            tracing::info!("live analyzer stopped");
        }
    }

    /// True between [`start`](Self::start) and [`stop`](Self::stop).
    pub fn is_running(&self) -> bool {
        self.state.is_some()
    }

    /// Replace the match threshold, e.g. after a sensitivity change.
    ///
    /// An out-of-range threshold leaves the current one in place.
    pub fn set_threshold(&mut self, threshold: f64) -> Result<()> {
        let config = self.config.with_threshold(threshold);
        config.validate()?;
        self.config = config;
        Ok(())
    }

    /// Active tunables.
    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// Time source.
    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Session state while running.
    pub fn state(&self) -> Option<&LiveAnalyzerState> {
        self.state.as_ref()
    }

    /// Frames currently buffered (0 when stopped).
    pub fn buffered_frames(&self) -> usize {
        self.state.as_ref().map_or(0, |s| s.buffer.len())
    }

    /// Analyze one chunk against `library`.
    ///
    /// # Errors
    ///
    /// Fails only when no extractor can be built for the chunk's sample
    /// rate; the session state is left untouched in that case.
    pub fn tick(
        &mut self,
        chunk: &AudioChunk,
        library: &[CalibratedSound],
    ) -> Result<TickOutcome> {
        let Some(state) = self.state.as_mut() else {
            return Ok(TickOutcome::Stopped);
        };

        let rms = chunk.rms();
        if chunk.is_empty() || rms < self.config.silence_gate {
            tracing::trace!(rms, "below silence gate");
            return Ok(TickOutcome::Silent { rms });
        }

        let frames = state.extractor(chunk.sample_rate)?.extract(&chunk.samples);
        let added = frames.len();
        state.buffer.extend(frames);
        let buffered = state.buffer.len();
        tracing::debug!(rms, added, buffered, "chunk ingested");

        if buffered < MIN_BUFFERED_FRAMES {
            return Ok(TickOutcome::Buffering { frames: buffered });
        }

        let scores = score_buffer(&state.buffer, &chunk.samples, library);
        let best = highest(&scores);
        let Some(best) = best.filter(|b| b.score >= self.config.threshold) else {
            return Ok(TickOutcome::NoMatch {
                best: best.map(|b| b.score),
            });
        };

        let now = self.clock.now_ms();
        let cooldown = i64::try_from(self.config.cooldown_ms).unwrap_or(i64::MAX);
        let since = state
            .last_detection
            .get(&best.sound.id)
            .map(|&last| now.saturating_sub(last));

        match since {
            Some(elapsed) if elapsed <= cooldown => {
                tracing::debug!(sound = %best.sound.id, score = best.score, elapsed, "within cooldown");
                Ok(TickOutcome::Suppressed {
                    sound_id: best.sound.id.clone(),
                    score: best.score,
                    remaining_ms: cooldown - elapsed,
                })
            }
            _ => {
                state.last_detection.insert(best.sound.id.clone(), now);
                state.buffer.clear();
                let event = DetectionEvent::new(best.sound, best.score, now);
                tracing::info!(sound = %event.sound_id, score = event.score, "sound detected");
                Ok(TickOutcome::Detected(event))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::error::Error;
    use sonic_sight_analysis::Signature;
    use std::f32::consts::PI;

    const SAMPLE_RATE: u32 = 44100;

    fn tone(freq: f32, len: usize) -> Vec<f32> {
        (0..len)
            .map(|i| 0.5 * (2.0 * PI * freq * i as f32 / SAMPLE_RATE as f32).sin())
            .collect()
    }

    fn beep_library() -> Vec<CalibratedSound> {
        let signature = Signature::from_samples(&tone(1000.0, 44100), SAMPLE_RATE).unwrap();
        vec![CalibratedSound::new("beep", "Beep", "#ffcc00").with_signature(signature)]
    }

    fn analyzer() -> LiveAnalyzer<ManualClock> {
        let mut analyzer =
            LiveAnalyzer::with_clock(DetectorConfig::default(), ManualClock::new(0)).unwrap();
        analyzer.start();
        analyzer
    }

    #[test]
    fn test_stopped_tick_is_noop() {
        let mut analyzer =
            LiveAnalyzer::with_clock(DetectorConfig::default(), ManualClock::new(0)).unwrap();
        let chunk = AudioChunk::new(tone(1000.0, 44100), SAMPLE_RATE);

        assert_eq!(analyzer.tick(&chunk, &beep_library()).unwrap(), TickOutcome::Stopped);
        assert_eq!(analyzer.buffered_frames(), 0);
    }

    #[test]
    fn test_silence_leaves_buffer() {
        let mut analyzer = analyzer();
        let library = beep_library();

        // 10 000 samples -> 16 frames, not enough to match
        let partial = AudioChunk::new(tone(1000.0, 10_000), SAMPLE_RATE);
        assert_eq!(
            analyzer.tick(&partial, &library).unwrap(),
            TickOutcome::Buffering { frames: 16 }
        );

        let quiet = AudioChunk::new(vec![0.001; 22050], SAMPLE_RATE);
        let outcome = analyzer.tick(&quiet, &library).unwrap();
        assert!(matches!(outcome, TickOutcome::Silent { rms } if rms < 0.008));
        assert_eq!(analyzer.buffered_frames(), 16);
    }

    #[test]
    fn test_identical_audio_is_detected() {
        let mut analyzer = analyzer();
        analyzer.clock().set(1000);
        let chunk = AudioChunk::new(tone(1000.0, 44100), SAMPLE_RATE);

        let outcome = analyzer.tick(&chunk, &beep_library()).unwrap();
        let event = outcome.event().expect("detection");
        assert_eq!(event.sound_id, "beep");
        assert!(event.score >= 0.9, "score {}", event.score);
        assert_eq!(event.timestamp, 1000);
        assert_eq!(analyzer.buffered_frames(), 0);
    }

    #[test]
    fn test_cooldown_suppresses_then_releases() {
        let mut analyzer = analyzer();
        let clock = analyzer.clock().clone();
        let library = beep_library();
        let chunk = AudioChunk::new(tone(1000.0, 44100), SAMPLE_RATE);

        clock.set(1000);
        assert!(analyzer.tick(&chunk, &library).unwrap().event().is_some());

        clock.set(2000);
        match analyzer.tick(&chunk, &library).unwrap() {
            TickOutcome::Suppressed {
                sound_id,
                remaining_ms,
                ..
            } => {
                assert_eq!(sound_id, "beep");
                assert_eq!(remaining_ms, 2000);
            }
            other => panic!("expected suppression, got {other:?}"),
        }
        // Suppression keeps the accumulated frames
        assert_eq!(analyzer.buffered_frames(), 83);

        clock.set(5000);
        let outcome = analyzer.tick(&chunk, &library).unwrap();
        assert_eq!(outcome.event().map(|e| e.timestamp), Some(5000));
    }

    #[test]
    fn test_unrelated_audio_does_not_match() {
        let mut analyzer = analyzer();
        let chunk = AudioChunk::new(tone(3000.0, 44100), SAMPLE_RATE);

        match analyzer.tick(&chunk, &beep_library()).unwrap() {
            TickOutcome::NoMatch { best } => assert!(best.unwrap() < 0.65),
            other => panic!("expected no match, got {other:?}"),
        }
    }

    #[test]
    fn test_stop_discards_state() {
        let mut analyzer = analyzer();
        let chunk = AudioChunk::new(tone(1000.0, 20_000), SAMPLE_RATE);
        analyzer.tick(&chunk, &[]).unwrap();
        assert!(analyzer.buffered_frames() > 0);

        analyzer.stop();
        assert!(!analyzer.is_running());
        analyzer.start();
        assert_eq!(analyzer.buffered_frames(), 0);
    }

    #[test]
    fn test_zero_sample_rate_is_error() {
        let mut analyzer = analyzer();
        let chunk = AudioChunk::new(tone(1000.0, 4096), 0);
        assert!(analyzer.tick(&chunk, &[]).is_err());
        assert_eq!(analyzer.buffered_frames(), 0);
    }

    #[test]
    fn test_failed_tick_keeps_cached_extractor() {
        let mut analyzer = analyzer();
        analyzer
            .tick(&AudioChunk::new(tone(500.0, 4096), SAMPLE_RATE), &[])
            .unwrap();
        assert!(
            analyzer
                .tick(&AudioChunk::new(tone(500.0, 4096), 0), &[])
                .is_err()
        );

        let state = analyzer.state().unwrap();
        let cached = state.extractor.as_ref().expect("extractor kept after error");
        assert_eq!(cached.sample_rate(), SAMPLE_RATE);
        assert_eq!(state.buffer().len(), 5);
    }

    #[test]
    fn test_extractor_follows_sample_rate() {
        let mut analyzer = analyzer();
        analyzer
            .tick(&AudioChunk::new(tone(500.0, 4096), 44100), &[])
            .unwrap();
        analyzer
            .tick(&AudioChunk::new(tone(500.0, 4096), 48000), &[])
            .unwrap();

        let state = analyzer.state().unwrap();
        assert_eq!(state.extractor.as_ref().unwrap().sample_rate(), 48000);
        assert_eq!(state.buffer().len(), 10);
    }

    #[test]
    fn test_nan_threshold_rejected_at_construction() {
        let config = DetectorConfig::default().with_threshold(f64::NAN);
        let err = LiveAnalyzer::with_clock(config, ManualClock::new(0)).unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
    }

    #[test]
    fn test_invalid_threshold_keeps_previous() {
        let mut analyzer = analyzer();
        assert!(analyzer.set_threshold(f64::NAN).is_err());
        assert!(analyzer.set_threshold(1.5).is_err());
        assert!((analyzer.config().threshold - DetectorConfig::default().threshold).abs() < 1e-12);

        analyzer.set_threshold(0.6).unwrap();
        assert!((analyzer.config().threshold - 0.6).abs() < 1e-12);
    }
}
