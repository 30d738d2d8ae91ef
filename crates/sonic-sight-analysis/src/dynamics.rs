//! Whole-buffer loudness and noisiness statistics
//!
//! - RMS level
//! - Zero-crossing rate

/// Compute RMS (Root Mean Square) level of a signal
///
/// Returns RMS value in linear scale (not dB). Empty input returns 0.
pub fn rms(signal: &[f32]) -> f64 {
    if signal.is_empty() {
        return 0.0;
    }

    let sum_sq: f64 = signal.iter().map(|&x| f64::from(x) * f64::from(x)).sum();
    (sum_sq / signal.len() as f64).sqrt()
}

/// Zero-crossing rate: sign changes between consecutive samples divided by
/// the sample count.
///
/// Zero counts as non-negative, so an all-zero buffer has a rate of 0.
pub fn zero_crossing_rate(signal: &[f32]) -> f64 {
    if signal.is_empty() {
        return 0.0;
    }

    let crossings = signal
        .windows(2)
        .filter(|pair| (pair[0] < 0.0) != (pair[1] < 0.0))
        .count();
    crossings as f64 / signal.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    fn sine(freq: f32) -> Vec<f32> {
        (0..44100)
            .map(|i| (2.0 * PI * freq * i as f32 / 44100.0).sin())
            .collect()
    }

    #[test]
    fn test_rms_sine_wave() {
        // RMS of unit sine wave should be 1/sqrt(2) ≈ 0.707
        let rms_val = rms(&sine(440.0));
        let expected = 1.0 / 2.0_f64.sqrt();

        assert!(
            (rms_val - expected).abs() < 0.01,
            "RMS {} should be near {}",
            rms_val,
            expected
        );
    }

    #[test]
    fn test_zcr_sine() {
        // A 1 kHz tone crosses zero twice per period
        let zcr = zero_crossing_rate(&sine(1000.0));
        let expected = 2.0 * 1000.0 / 44100.0;
        assert!((zcr - expected).abs() < 0.001, "ZCR {} vs {}", zcr, expected);
    }

    #[test]
    fn test_zcr_alternating() {
        let signal = [1.0, -1.0, 1.0, -1.0];
        assert_eq!(zero_crossing_rate(&signal), 0.75);
    }

    #[test]
    fn test_zero_counts_as_positive() {
        assert_eq!(zero_crossing_rate(&[0.0, 0.5, 0.0, 0.25]), 0.0);
        assert_eq!(zero_crossing_rate(&[-0.5, 0.0]), 0.5);
    }

    #[test]
    fn test_empty_signal() {
        let empty: Vec<f32> = vec![];

        assert_eq!(rms(&empty), 0.0);
        assert_eq!(zero_crossing_rate(&empty), 0.0);
    }
}
