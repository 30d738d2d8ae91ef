//! Mel filterbank for projecting a magnitude spectrum onto a perceptual scale

/// Default number of triangular filters.
pub const DEFAULT_NUM_FILTERS: usize = 26;

/// Default lower edge of the filterbank (Hz).
pub const DEFAULT_MIN_FREQ: f64 = 0.0;

/// Default upper edge of the filterbank (Hz).
///
/// Enough for speech and common household sounds.
pub const DEFAULT_MAX_FREQ: f64 = 8000.0;

/// Convert Hz to Mel scale
pub fn hz_to_mel(hz: f64) -> f64 {
    2595.0 * (1.0 + hz / 700.0).log10()
}

/// Convert Mel to Hz
pub fn mel_to_hz(mel: f64) -> f64 {
    700.0 * (10.0_f64.powf(mel / 2595.0) - 1.0)
}

/// One triangular filter, stored as its first non-zero bin and weights.
#[derive(Debug, Clone)]
struct TriangularFilter {
    start: usize,
    weights: Vec<f64>,
}

/// Mel filterbank for converting a linear magnitude spectrum to mel energies
#[derive(Debug, Clone)]
pub struct MelFilterbank {
    filters: Vec<TriangularFilter>,
    num_fft_bins: usize,
}

impl MelFilterbank {
    /// Create a mel filterbank
    ///
    /// # Arguments
    /// * `fft_size` - FFT size (the spectrum has `fft_size / 2 + 1` bins)
    /// * `sample_rate` - Sample rate in Hz
    /// * `num_filters` - Number of triangular filters
    /// * `min_freq` - Lower edge (Hz)
    /// * `max_freq` - Upper edge (Hz)
    pub fn new(
        fft_size: usize,
        sample_rate: f64,
        num_filters: usize,
        min_freq: f64,
        max_freq: f64,
    ) -> Self {
        let num_fft_bins = fft_size / 2 + 1;

        let mel_min = hz_to_mel(min_freq);
        let mel_max = hz_to_mel(max_freq);

        // num_filters + 2 equally spaced mel points, edges included
        let bin_points: Vec<usize> = (0..=num_filters + 1)
            .map(|i| mel_min + (mel_max - mel_min) * i as f64 / (num_filters + 1) as f64)
            .map(|mel| ((fft_size as f64 + 1.0) * mel_to_hz(mel) / sample_rate).floor() as usize)
            .collect();

        let filters = (0..num_filters)
            .map(|m| {
                let left = bin_points[m];
                let center = bin_points[m + 1];
                let right = bin_points[m + 2];

                let mut weights = vec![0.0; right + 1 - left];

                // Rising edge
                for k in left..center {
                    weights[k - left] = (k - left) as f64 / (center - left) as f64;
                }

                // Falling edge, center included
                if right > center {
                    for k in center..=right {
                        weights[k - left] = (right - k) as f64 / (right - center) as f64;
                    }
                } else {
                    weights[center - left] = 1.0;
                }

                // Bins past Nyquist do not exist in the spectrum
                weights.truncate(num_fft_bins.saturating_sub(left));

                TriangularFilter {
                    start: left,
                    weights,
                }
            })
            .collect();

        Self {
            filters,
            num_fft_bins,
        }
    }

    /// Apply filterbank to a magnitude spectrum, one energy per filter
    pub fn apply(&self, spectrum: &[f64]) -> Vec<f64> {
        self.filters
            .iter()
            .map(|filter| {
                spectrum
                    .iter()
                    .skip(filter.start)
                    .zip(filter.weights.iter())
                    .map(|(&s, &w)| s * w)
                    .sum()
            })
            .collect()
    }

    /// Get number of filters
    pub fn num_filters(&self) -> usize {
        self.filters.len()
    }

    /// Get number of FFT bins
    pub fn num_fft_bins(&self) -> usize {
        self.num_fft_bins
    }

    /// Dense weights of filter `index` over all FFT bins.
    pub fn filter_weights(&self, index: usize) -> Option<Vec<f64>> {
        let filter = self.filters.get(index)?;
        let mut dense = vec![0.0; self.num_fft_bins];
        for (offset, &w) in filter.weights.iter().enumerate() {
            if let Some(slot) = dense.get_mut(filter.start + offset) {
                *slot = w;
            }
        }
        Some(dense)
    }
}
