//! Radix-2 FFT with windowing functions
//!
//! The transform is a plain iterative Cooley–Tukey: bit-reversal permutation
//! followed by butterfly stages with twiddle factors `e^{-2πi·k/len}`. The
//! matcher's constants were tuned against exactly this pipeline, so the
//! fingerprint path does not delegate to a planner.

use crate::error::{Error, Result};
use rustfft::num_complex::Complex;
use std::f64::consts::PI;

/// Window function types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Window {
    /// Rectangular (no windowing)
    Rectangular,
    /// Symmetric Hann window, `0.5 * (1 - cos(2π·i/(N-1)))`
    Hann,
}

impl Window {
    /// Apply window to a buffer
    pub fn apply(&self, buffer: &mut [f64]) {
        let n = buffer.len();
        match self {
            Window::Rectangular => {}
            Window::Hann => {
                if n < 2 {
                    return;
                }
                let denom = (n - 1) as f64;
                for (i, sample) in buffer.iter_mut().enumerate() {
                    let w = 0.5 * (1.0 - (2.0 * PI * i as f64 / denom).cos());
                    *sample *= w;
                }
            }
        }
    }

    /// Get window coefficients
    pub fn coefficients(&self, size: usize) -> Vec<f64> {
        let mut coeffs = vec![1.0; size];
        self.apply(&mut coeffs);
        coeffs
    }
}

/// In-place radix-2 FFT for a fixed power-of-two size.
///
/// Bit-reversal indices and twiddle factors are computed once at
/// construction; [`Fft::process`] only reads them, so one instance can be
/// shared across threads.
#[derive(Debug, Clone)]
pub struct Fft {
    size: usize,
    bit_reverse: Vec<usize>,
    twiddles: Vec<Complex<f64>>,
}

impl Fft {
    /// Create a new FFT processor for the given size.
    ///
    /// Fails with [`Error::InvalidInput`] unless `size` is a non-zero power
    /// of two.
    pub fn new(size: usize) -> Result<Self> {
        if size == 0 || !size.is_power_of_two() {
            return Err(Error::InvalidInput(format!(
                "FFT size must be a power of two, got {size}"
            )));
        }

        let bits = size.trailing_zeros();
        let bit_reverse = (0..size)
            .map(|i| {
                if bits == 0 {
                    0
                } else {
                    i.reverse_bits() >> (usize::BITS - bits)
                }
            })
            .collect();

        // e^{-2πi·k/N}; stage `len` reads every (N/len)-th entry.
        let twiddles = (0..size / 2)
            .map(|k| {
                let angle = -2.0 * PI * k as f64 / size as f64;
                Complex::new(angle.cos(), angle.sin())
            })
            .collect();

        Ok(Self {
            size,
            bit_reverse,
            twiddles,
        })
    }

    /// Get FFT size
    pub fn size(&self) -> usize {
        self.size
    }

    /// Transform `buffer` in place.
    ///
    /// # Panics
    ///
    /// Panics if `buffer.len()` differs from the planned size.
    pub fn process(&self, buffer: &mut [Complex<f64>]) {
        assert_eq!(
            buffer.len(),
            self.size,
            "FFT buffer length must match the planned size"
        );

        for (i, &j) in self.bit_reverse.iter().enumerate() {
            if i < j {
                buffer.swap(i, j);
            }
        }

        let n = self.size;
        let mut len = 2;
        while len <= n {
            let half = len / 2;
            let stride = n / len;
            for start in (0..n).step_by(len) {
                for k in 0..half {
                    let w = self.twiddles[k * stride];
                    let even = buffer[start + k];
                    let odd = buffer[start + k + half] * w;
                    buffer[start + k] = even + odd;
                    buffer[start + k + half] = even - odd;
                }
            }
            len <<= 1;
        }
    }

    /// Magnitude of bins `0..=N/2` for a real input frame.
    ///
    /// Shorter input is zero-padded, longer input truncated.
    pub fn magnitude_spectrum(&self, frame: &[f64]) -> Vec<f64> {
        let mut buffer: Vec<Complex<f64>> = frame
            .iter()
            .take(self.size)
            .map(|&x| Complex::new(x, 0.0))
            .collect();
        buffer.resize(self.size, Complex::new(0.0, 0.0));

        self.process(&mut buffer);

        buffer[..=self.size / 2].iter().map(|c| c.norm()).collect()
    }
}
