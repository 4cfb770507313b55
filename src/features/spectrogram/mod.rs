//! Spectrogram computation
//!
//! - Centered STFT power spectrogram
//! - Mel projection
//! - Power to decibel conversion

pub mod mel;
pub mod stft;

use crate::error::AnalysisError;

pub use mel::MelFilterbank;
pub use stft::power_spectrogram;

/// Floor applied to power values before taking the logarithm
const AMIN: f32 = 1e-10;

/// Compute a mel power spectrogram (`n_frames × n_mels`)
///
/// # Arguments
///
/// * `samples` - Mono audio samples
/// * `sample_rate` - Sample rate in Hz
/// * `frame_size` - FFT size
/// * `hop_size` - Hop size in samples
/// * `n_mels` - Number of mel bands
///
/// # Errors
///
/// Returns `AnalysisError` if any parameter is invalid
pub fn mel_spectrogram(
    samples: &[f32],
    sample_rate: u32,
    frame_size: usize,
    hop_size: usize,
    n_mels: usize,
) -> Result<Vec<Vec<f32>>, AnalysisError> {
    let filterbank = MelFilterbank::new(sample_rate, frame_size, n_mels)?;
    let power = power_spectrogram(samples, frame_size, hop_size)?;
    power.iter().map(|frame| filterbank.apply(frame)).collect()
}

/// Convert a power spectrogram to decibels in place
///
/// Each cell becomes `10 * log10(max(AMIN, S))`. When `top_db` is given, cells
/// are then floored at `max_db - top_db`, where `max_db` is the loudest cell of
/// the whole spectrogram.
pub fn power_to_db(spectrogram: &mut [Vec<f32>], top_db: Option<f32>) {
    let mut max_db = f32::NEG_INFINITY;
    for frame in spectrogram.iter_mut() {
        for cell in frame.iter_mut() {
            *cell = 10.0 * cell.max(AMIN).log10();
            max_db = max_db.max(*cell);
        }
    }

    if let Some(top_db) = top_db {
        if max_db.is_finite() {
            let floor = max_db - top_db;
            for cell in spectrogram.iter_mut().flat_map(|frame| frame.iter_mut()) {
                *cell = cell.max(floor);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_power_to_db_values() {
        let mut spec = vec![vec![1.0, 0.1, 0.0]];
        power_to_db(&mut spec, None);
        assert!((spec[0][0] - 0.0).abs() < 1e-6);
        assert!((spec[0][1] + 10.0).abs() < 1e-5);
        assert!((spec[0][2] + 100.0).abs() < 1e-4);
    }

    #[test]
    fn test_power_to_db_top_db_floor() {
        let mut spec = vec![vec![1.0, 1e-6], vec![1e-12, 0.5]];
        power_to_db(&mut spec, Some(30.0));
        // Max is 0 dB, so everything is floored at -30 dB
        assert!((spec[0][1] + 30.0).abs() < 1e-4);
        assert!((spec[1][0] + 30.0).abs() < 1e-4);
        assert!(spec[1][1] > -30.0);
    }

    #[test]
    fn test_mel_spectrogram_shape() {
        let samples = vec![0.1f32; 22050];
        let mel = mel_spectrogram(&samples, 22050, 2048, 512, 64).unwrap();
        assert_eq!(mel.len(), 1 + 22050 / 512);
        assert!(mel.iter().all(|frame| frame.len() == 64));
    }
}
