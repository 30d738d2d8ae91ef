//! MFCC extraction: frame → Hann window → FFT → mel filterbank → log → DCT-II.

use crate::error::{Error, Result};
use crate::fft::{Fft, Window};
use crate::frame::{self, DEFAULT_FRAME_SIZE, DEFAULT_HOP_SIZE};
use crate::mel::{DEFAULT_MAX_FREQ, DEFAULT_MIN_FREQ, DEFAULT_NUM_FILTERS, MelFilterbank};
use std::f64::consts::PI;

/// Number of cepstral coefficients kept per frame.
pub const NUM_MFCC: usize = 13;

/// Floor applied to mel energies before the log, so silent frames stay finite.
pub const LOG_FLOOR: f64 = 1e-10;

/// One frame's cepstral feature vector.
pub type MfccVector = [f64; NUM_MFCC];

/// Framing and filterbank parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MfccParams {
    /// Frame length in samples; must be a power of two.
    pub frame_size: usize,
    /// Hop between frame starts in samples.
    pub hop_size: usize,
    /// Number of mel filters.
    pub num_filters: usize,
    /// Filterbank floor (Hz).
    pub min_freq: f64,
    /// Filterbank ceiling (Hz).
    pub max_freq: f64,
}

impl Default for MfccParams {
    fn default() -> Self {
        Self {
            frame_size: DEFAULT_FRAME_SIZE,
            hop_size: DEFAULT_HOP_SIZE,
            num_filters: DEFAULT_NUM_FILTERS,
            min_freq: DEFAULT_MIN_FREQ,
            max_freq: DEFAULT_MAX_FREQ,
        }
    }
}

/// Unnormalized DCT-II: `c[k] = Σ_n cos(π·k·(n+0.5)/N) · x[n]`.
///
/// No `1/√N` scaling is applied; calibration and live matching use the same
/// transform, and the matcher's per-frame normalization absorbs the scale.
#[derive(Debug, Clone)]
pub struct Dct {
    matrix: Vec<[f64; NUM_MFCC]>,
}

impl Dct {
    /// Build the cosine table for `num_inputs` log-mel energies.
    pub fn new(num_inputs: usize) -> Self {
        let matrix = (0..num_inputs)
            .map(|n| {
                let mut column = [0.0; NUM_MFCC];
                for (k, c) in column.iter_mut().enumerate() {
                    *c = (PI * k as f64 * (n as f64 + 0.5) / num_inputs as f64).cos();
                }
                column
            })
            .collect();
        Self { matrix }
    }

    /// Number of inputs the transform expects.
    pub fn num_inputs(&self) -> usize {
        self.matrix.len()
    }

    /// Transform one vector of log-mel energies.
    pub fn apply(&self, log_mel: &[f64]) -> MfccVector {
        let mut out = [0.0; NUM_MFCC];
        for (column, &x) in self.matrix.iter().zip(log_mel.iter()) {
            for (o, &c) in out.iter_mut().zip(column.iter()) {
                *o += c * x;
            }
        }
        out
    }
}

/// Natural log with [`LOG_FLOOR`].
pub fn log_energies(energies: &[f64]) -> Vec<f64> {
    energies.iter().map(|&e| e.max(LOG_FLOOR).ln()).collect()
}

/// Per-frame MFCC extractor for one sample rate.
///
/// Construction precomputes the window table, FFT plan, mel filterbank and
/// DCT matrix; extraction is then a pure function of the input samples.
#[derive(Debug, Clone)]
pub struct MfccExtractor {
    params: MfccParams,
    sample_rate: u32,
    window: Vec<f64>,
    fft: Fft,
    filterbank: MelFilterbank,
    dct: Dct,
}

impl MfccExtractor {
    /// Create an extractor with default parameters.
    pub fn new(sample_rate: u32) -> Result<Self> {
        Self::with_params(sample_rate, MfccParams::default())
    }

    /// Create an extractor with explicit parameters.
    pub fn with_params(sample_rate: u32, params: MfccParams) -> Result<Self> {
        if sample_rate == 0 {
            return Err(Error::InvalidInput("sample rate must be non-zero".into()));
        }
        if params.hop_size == 0 {
            return Err(Error::InvalidInput("hop size must be non-zero".into()));
        }
        if params.num_filters == 0 {
            return Err(Error::InvalidInput(
                "filterbank needs at least one filter".into(),
            ));
        }
        if !(params.min_freq >= 0.0 && params.max_freq > params.min_freq) {
            return Err(Error::InvalidInput(format!(
                "invalid filterbank range {}..{} Hz",
                params.min_freq, params.max_freq
            )));
        }

        let fft = Fft::new(params.frame_size)?;
        let filterbank = MelFilterbank::new(
            params.frame_size,
            f64::from(sample_rate),
            params.num_filters,
            params.min_freq,
            params.max_freq,
        );

        Ok(Self {
            params,
            sample_rate,
            window: Window::Hann.coefficients(params.frame_size),
            fft,
            filterbank,
            dct: Dct::new(params.num_filters),
        })
    }

    /// Sample rate this extractor was built for.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Framing and filterbank parameters.
    pub fn params(&self) -> &MfccParams {
        &self.params
    }

    /// Number of frames [`extract`](Self::extract) yields for `len` samples.
    pub fn frame_count(&self, len: usize) -> usize {
        frame::frame_count(len, self.params.frame_size, self.params.hop_size)
    }

    /// MFCC vector for a single frame of exactly `frame_size` samples.
    pub fn frame_mfcc(&self, frame: &[f32]) -> MfccVector {
        let windowed: Vec<f64> = frame
            .iter()
            .zip(self.window.iter())
            .map(|(&s, &w)| f64::from(s) * w)
            .collect();
        let spectrum = self.fft.magnitude_spectrum(&windowed);
        let mel = self.filterbank.apply(&spectrum);
        self.dct.apply(&log_energies(&mel))
    }

    /// MFCC vectors for every whole frame in `samples`, in temporal order.
    pub fn extract(&self, samples: &[f32]) -> Vec<MfccVector> {
        frame::frames(samples, self.params.frame_size, self.params.hop_size)
            .map(|f| self.frame_mfcc(f))
            .collect()
    }
}

/// Extract the per-frame MFCC sequence with default parameters.
///
/// A buffer shorter than one frame yields an empty sequence.
pub fn extract_mfcc_frames(samples: &[f32], sample_rate: u32) -> Result<Vec<MfccVector>> {
    Ok(MfccExtractor::new(sample_rate)?.extract(samples))
}
