//! Integration tests for sonic-sight-detect.
//!
//! Drives the live analyzer end to end with synthetic tones on a manual
//! clock, plus property checks on the rolling buffer.

use proptest::prelude::*;
use sonic_sight_analysis::{AudioChunk, NUM_MFCC, Signature};
use sonic_sight_config::{DetectorConfig, Sensitivity, Settings};
use sonic_sight_detect::{
    CalibratedSound, FRAME_BUFFER_CAPACITY, FrameBuffer, LiveAnalyzer, ManualClock, TickOutcome,
    load_library,
};
use std::f32::consts::PI;
use tempfile::TempDir;

const SAMPLE_RATE: u32 = 44100;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn sine(freq_hz: f32, num_samples: usize) -> Vec<f32> {
    (0..num_samples)
        .map(|i| 0.5 * (2.0 * PI * freq_hz * i as f32 / SAMPLE_RATE as f32).sin())
        .collect()
}

/// Deterministic white noise in [-0.5, 0.5).
fn noise(num_samples: usize, seed: u32) -> Vec<f32> {
    let mut state = seed.wrapping_mul(2_654_435_761).max(1);
    (0..num_samples)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            state as f32 / u32::MAX as f32 - 0.5
        })
        .collect()
}

fn calibrate(id: &str, samples: &[f32]) -> CalibratedSound {
    let signature = Signature::from_samples(samples, SAMPLE_RATE).unwrap();
    CalibratedSound::new(id, id.to_uppercase(), "#ff6b6b").with_signature(signature)
}

// ===========================================================================
// 1. Live path
// ===========================================================================

#[test]
fn calibrated_sine_is_detected_on_replay() {
    let tone = sine(1000.0, 44100);
    let library = vec![calibrate("tone", &tone)];
    let mut analyzer =
        LiveAnalyzer::with_clock(DetectorConfig::default(), ManualClock::new(0)).unwrap();
    analyzer.start();

    let outcome = analyzer
        .tick(&AudioChunk::new(tone, SAMPLE_RATE), &library)
        .unwrap();
    let event = outcome.event().expect("tone should be detected");
    assert!(event.score >= 0.9);
}

#[test]
fn two_matches_within_cooldown_emit_once() {
    let tone = sine(1000.0, 44100);
    let library = vec![calibrate("tone", &tone)];
    let clock = ManualClock::new(0);
    let mut analyzer = LiveAnalyzer::with_clock(DetectorConfig::default(), clock.clone()).unwrap();
    analyzer.start();
    let chunk = AudioChunk::new(tone, SAMPLE_RATE);

    let mut events = Vec::new();
    for at in [1000, 2000, 5000] {
        clock.set(at);
        if let Some(event) = analyzer.tick(&chunk, &library).unwrap().event() {
            events.push(event.timestamp);
        }
    }

    assert_eq!(events, vec![1000, 5000]);
}

#[test]
fn half_second_ticks_accumulate_context() {
    // A 1 s tone streamed as two 0.5 s chunks
    let tone = sine(1000.0, 44100);
    let library = vec![calibrate("tone", &tone)];
    let mut analyzer =
        LiveAnalyzer::with_clock(DetectorConfig::default(), ManualClock::new(0)).unwrap();
    analyzer.start();

    let mut outcomes = Vec::new();
    for half in tone.chunks(22050) {
        outcomes.push(
            analyzer
                .tick(&AudioChunk::new(half.to_vec(), SAMPLE_RATE), &library)
                .unwrap(),
        );
    }

    assert!(outcomes.iter().all(|o| !matches!(o, TickOutcome::Stopped)));
    assert!(outcomes.iter().any(|o| o.event().is_some()));
}

#[test]
fn best_of_several_sounds_wins() {
    let beep = sine(1000.0, 44100);
    let whistle = sine(3000.0, 44100);
    let library = vec![calibrate("whistle", &whistle), calibrate("beep", &beep)];

    let mut analyzer =
        LiveAnalyzer::with_clock(DetectorConfig::default(), ManualClock::new(0)).unwrap();
    analyzer.start();
    let outcome = analyzer
        .tick(&AudioChunk::new(whistle, SAMPLE_RATE), &library)
        .unwrap();
    assert_eq!(outcome.event().map(|e| e.sound_id.as_str()), Some("whistle"));
}

#[test]
fn sensitivity_setting_feeds_threshold() {
    let settings = Settings::default().with_sensitivity(Sensitivity::new(0).unwrap());
    let mut analyzer =
        LiveAnalyzer::with_clock(settings.detector_config(), ManualClock::new(0)).unwrap();
    assert!((analyzer.config().threshold - 0.80).abs() < 1e-12);

    analyzer
        .set_threshold(Sensitivity::new(100).unwrap().threshold())
        .unwrap();
    assert!((analyzer.config().threshold - 0.50).abs() < 1e-12);
}

#[test]
fn library_on_disk_drives_detection() {
    let temp_dir = TempDir::new().unwrap();
    let tone = sine(1000.0, 44100);
    calibrate("kettle", &tone).save_to_dir(temp_dir.path()).unwrap();

    let library = load_library(temp_dir.path());
    let mut analyzer =
        LiveAnalyzer::with_clock(DetectorConfig::default(), ManualClock::new(0)).unwrap();
    analyzer.start();

    let outcome = analyzer
        .tick(&AudioChunk::new(tone, SAMPLE_RATE), &library)
        .unwrap();
    assert_eq!(outcome.event().map(|e| e.sound_id.as_str()), Some("kettle"));
}

// ===========================================================================
// 2. Rolling buffer
// ===========================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Pushing past capacity leaves exactly the newest 400 frames, in order.
    #[test]
    fn buffer_keeps_most_recent_frames(ticks in prop::collection::vec(1usize..90, 1..20)) {
        let mut buffer = FrameBuffer::default();
        let mut pushed = 0usize;

        for count in ticks {
            let frames: Vec<_> = (pushed..pushed + count)
                .map(|tag| [tag as f64; NUM_MFCC])
                .collect();
            buffer.extend(frames);
            pushed += count;

            let expected_len = pushed.min(FRAME_BUFFER_CAPACITY);
            prop_assert_eq!(buffer.len(), expected_len);

            let first = pushed - expected_len;
            for (offset, frame) in buffer.iter().enumerate() {
                prop_assert_eq!(frame[0], (first + offset) as f64);
            }
        }
    }
}

/// Half-second chunks of noise through the analyzer fill the buffer to
/// capacity and no further.
#[test]
fn analyzer_buffer_stays_capped_across_ticks() {
    let mut analyzer =
        LiveAnalyzer::with_clock(DetectorConfig::default(), ManualClock::new(0)).unwrap();
    analyzer.start();

    for tick in 1..=15u32 {
        let chunk = AudioChunk::new(noise(22050, tick), SAMPLE_RATE);
        let outcome = analyzer.tick(&chunk, &[]).unwrap();
        assert!(matches!(outcome, TickOutcome::NoMatch { .. }), "tick {tick}: {outcome:?}");
        assert_eq!(
            analyzer.buffered_frames(),
            (tick as usize * 40).min(FRAME_BUFFER_CAPACITY)
        );
    }
    assert_eq!(analyzer.buffered_frames(), 400);
}
