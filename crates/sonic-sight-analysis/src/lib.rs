//! Sonic Sight Analysis - MFCC fingerprints and DTW matching for household sounds
//!
//! This crate turns raw PCM into compact spectral-temporal fingerprints and
//! scores how alike two fingerprints are:
//!
//! - [`frame`] - Overlapping analysis frames (2048 samples, hop 512)
//! - [`fft`] - Radix-2 FFT and the Hann window
//! - [`mel`] - Triangular mel filterbank
//! - [`mfcc`] - Log-mel energies and the DCT-II cepstral transform
//! - [`dynamics`] - RMS and zero-crossing rate
//! - [`signature`] - Immutable [`Signature`] fingerprints with JSON I/O
//! - [`dtw`] - Banded dynamic time warping on normalized frames
//! - [`compare`] - Similarity scores in `[0, 1]`
//! - [`chunk`] - [`AudioChunk`], the unit of live audio delivery
//!
//! Everything here is a pure function of its inputs; the only mutable state
//! in the system lives in the live analyzer one layer up.
//!
//! ## Calibrate and match
//!
//! ```rust
//! use sonic_sight_analysis::{Signature, compare};
//!
//! let sample_rate = 44100;
//! let tone: Vec<f32> = (0..sample_rate)
//!     .map(|i| (2.0 * std::f32::consts::PI * 1000.0 * i as f32 / sample_rate as f32).sin())
//!     .collect();
//!
//! let reference = Signature::from_samples(&tone, sample_rate as u32)?;
//! let live = Signature::from_samples(&tone, sample_rate as u32)?;
//! assert!(compare(&live, &reference) > 0.99);
//! # Ok::<(), sonic_sight_analysis::Error>(())
//! ```
//!
//! ## Reusing an extractor
//!
//! ```rust,ignore
//! use sonic_sight_analysis::MfccExtractor;
//!
//! let extractor = MfccExtractor::new(48000)?;
//! let frames = extractor.extract(&samples);
//! println!("{} frames of {} coefficients", frames.len(), frames[0].len());
//! ```

pub mod chunk;
pub mod compare;
pub mod dtw;
pub mod dynamics;
pub mod error;
pub mod fft;
pub mod frame;
pub mod mel;
pub mod mfcc;
pub mod signature;

// Re-export main types
pub use chunk::AudioChunk;
pub use compare::{Comparison, MatchMethod, compare, compare_detailed, find_best_match};
pub use dtw::{band_width, dtw_distance, normalize_frames};
pub use dynamics::{rms, zero_crossing_rate};
pub use error::{Error, Result};
pub use fft::{Fft, Window};
pub use frame::{DEFAULT_FRAME_SIZE, DEFAULT_HOP_SIZE, Frames, frame_count, frames};
pub use mel::{MelFilterbank, hz_to_mel, mel_to_hz};
pub use mfcc::{MfccExtractor, MfccParams, MfccVector, NUM_MFCC, extract_mfcc_frames};
pub use signature::{Signature, extract_signature};
