//! Mel filterbank
//!
//! Triangular filters on the Slaney mel scale (linear below 1 kHz, logarithmic
//! above), each normalized to unit area so that band energies stay comparable
//! across bandwidths.
//!
//! # Reference
//!
//! Slaney, M. (1998). Auditory Toolbox, Version 2. Interval Research Corporation
//! Technical Report #1998-010.

use crate::error::AnalysisError;

/// Width of one mel in the linear region, in Hz
const F_SP: f64 = 200.0 / 3.0;

/// Start of the logarithmic region, in Hz
const MIN_LOG_HZ: f64 = 1000.0;

/// Start of the logarithmic region, in mels
const MIN_LOG_MEL: f64 = MIN_LOG_HZ / F_SP;

/// Step size of the logarithmic region
fn log_step() -> f64 {
    6.4f64.ln() / 27.0
}

/// Convert Hz to Slaney mels
pub fn hz_to_mel(hz: f64) -> f64 {
    if hz >= MIN_LOG_HZ {
        MIN_LOG_MEL + (hz / MIN_LOG_HZ).ln() / log_step()
    } else {
        hz / F_SP
    }
}

/// Convert Slaney mels to Hz
pub fn mel_to_hz(mel: f64) -> f64 {
    if mel >= MIN_LOG_MEL {
        MIN_LOG_HZ * (log_step() * (mel - MIN_LOG_MEL)).exp()
    } else {
        F_SP * mel
    }
}

/// `n` center frequencies evenly spaced on the mel scale between `fmin` and `fmax`
pub fn mel_frequencies(n: usize, fmin: f64, fmax: f64) -> Vec<f64> {
    if n == 0 {
        return Vec::new();
    }
    if n == 1 {
        return vec![fmin];
    }
    let min_mel = hz_to_mel(fmin);
    let max_mel = hz_to_mel(fmax);
    let step = (max_mel - min_mel) / (n - 1) as f64;
    (0..n).map(|i| mel_to_hz(min_mel + step * i as f64)).collect()
}

/// Mel filterbank weights
#[derive(Debug, Clone)]
pub struct MelFilterbank {
    /// `n_mels × n_bins` weights
    weights: Vec<Vec<f32>>,
}

impl MelFilterbank {
    /// Build a filterbank spanning 0 Hz to Nyquist
    ///
    /// # Arguments
    ///
    /// * `sample_rate` - Sample rate in Hz
    /// * `frame_size` - FFT size the spectrogram was computed with
    /// * `n_mels` - Number of mel bands
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::InvalidInput` for a zero sample rate, FFT size or band count
    pub fn new(sample_rate: u32, frame_size: usize, n_mels: usize) -> Result<Self, AnalysisError> {
        if sample_rate == 0 || frame_size == 0 || n_mels == 0 {
            return Err(AnalysisError::InvalidInput(format!(
                "Invalid mel filterbank parameters: sr={}, n_fft={}, n_mels={}",
                sample_rate, frame_size, n_mels
            )));
        }

        let n_bins = frame_size / 2 + 1;
        let sr = sample_rate as f64;
        let fft_freqs: Vec<f64> = (0..n_bins)
            .map(|k| k as f64 * sr / frame_size as f64)
            .collect();

        let mel_f = mel_frequencies(n_mels + 2, 0.0, sr / 2.0);
        let fdiff: Vec<f64> = mel_f.windows(2).map(|w| w[1] - w[0]).collect();

        let mut weights = Vec::with_capacity(n_mels);
        for i in 0..n_mels {
            let enorm = 2.0 / (mel_f[i + 2] - mel_f[i]);
            let row: Vec<f32> = fft_freqs
                .iter()
                .map(|&f| {
                    let lower = (f - mel_f[i]) / fdiff[i];
                    let upper = (mel_f[i + 2] - f) / fdiff[i + 1];
                    (lower.min(upper).max(0.0) * enorm) as f32
                })
                .collect();
            weights.push(row);
        }

        let empty = weights
            .iter()
            .filter(|row| row.iter().all(|&w| w == 0.0))
            .count();
        if empty > 0 {
            log::debug!(
                "{} of {} mel bands have no FFT bins (n_fft={} too small for n_mels)",
                empty,
                n_mels,
                frame_size
            );
        }

        Ok(Self { weights })
    }

    /// Number of mel bands
    pub fn n_mels(&self) -> usize {
        self.weights.len()
    }

    /// Number of FFT bins each band expects
    pub fn n_bins(&self) -> usize {
        self.weights.first().map_or(0, Vec::len)
    }

    /// Weights of one band
    pub fn band(&self, index: usize) -> &[f32] {
        &self.weights[index]
    }

    /// Project one power spectrum frame onto the mel bands
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::ProcessingError` if the frame length does not match
    pub fn apply(&self, power: &[f32]) -> Result<Vec<f32>, AnalysisError> {
        if power.len() != self.n_bins() {
            return Err(AnalysisError::ProcessingError(format!(
                "Spectrum has {} bins, filterbank expects {}",
                power.len(),
                self.n_bins()
            )));
        }
        Ok(self
            .weights
            .iter()
            .map(|row| row.iter().zip(power.iter()).map(|(&w, &p)| w * p).sum())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mel_scale_round_trip_points() {
        assert!((hz_to_mel(1000.0) - 15.0).abs() < 1e-9);
        assert!((mel_to_hz(15.0) - 1000.0).abs() < 1e-9);
        // Linear region
        assert!((hz_to_mel(200.0) - 3.0).abs() < 1e-9);
        // Log region: 6.4 kHz is 27 mels above 1 kHz
        assert!((hz_to_mel(6400.0) - 42.0).abs() < 1e-9);
    }

    #[test]
    fn test_mel_frequencies_span() {
        let freqs = mel_frequencies(130, 0.0, 11025.0);
        assert_eq!(freqs.len(), 130);
        assert!(freqs[0].abs() < 1e-9);
        assert!((freqs[129] - 11025.0).abs() < 1e-6);
        assert!(freqs.windows(2).all(|w| w[1] > w[0]));
    }

    #[test]
    fn test_filterbank_shape_and_nonnegative() {
        let fb = MelFilterbank::new(22050, 2048, 128).unwrap();
        assert_eq!(fb.n_mels(), 128);
        assert_eq!(fb.n_bins(), 1025);
        for i in 0..fb.n_mels() {
            assert!(fb.band(i).iter().all(|&w| w >= 0.0));
        }
        // Upper bands are wide enough to always cover some bins
        assert!(fb.band(127).iter().any(|&w| w > 0.0));
    }

    #[test]
    fn test_apply_rejects_wrong_length() {
        let fb = MelFilterbank::new(22050, 512, 40).unwrap();
        assert!(fb.apply(&[1.0; 10]).is_err());
        let bands = fb.apply(&vec![1.0; 257]).unwrap();
        assert_eq!(bands.len(), 40);
    }

    #[test]
    fn test_invalid_parameters() {
        assert!(MelFilterbank::new(0, 2048, 128).is_err());
        assert!(MelFilterbank::new(22050, 0, 128).is_err());
        assert!(MelFilterbank::new(22050, 2048, 0).is_err());
    }
}
