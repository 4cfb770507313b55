//! Short-time Fourier transform
//!
//! Centered, Hann-windowed power spectrogram. Frame `k` is centered on sample
//! `k * hop_size`, so its time is `k * hop_size / sample_rate`.

use rustfft::num_complex::Complex;
use rustfft::FftPlanner;

use crate::error::AnalysisError;
use crate::io::sample_buffer::SampleBuffer;

/// Periodic Hann window of length `n`
///
/// Uses the DFT-even form `0.5 - 0.5 cos(2πi / n)`, which tiles exactly at
/// 75% overlap.
pub fn hann_window(n: usize) -> Vec<f32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| 0.5 - 0.5 * (2.0 * std::f32::consts::PI * i as f32 / n as f32).cos())
        .collect()
}

/// Compute the power spectrogram `|X|²` of a mono signal
///
/// # Arguments
///
/// * `samples` - Mono audio samples
/// * `frame_size` - FFT size (any size; powers of two are fastest)
/// * `hop_size` - Hop between frames in samples
///
/// # Returns
///
/// `n_frames × (frame_size / 2 + 1)` power spectrogram, with
/// `n_frames = 1 + samples.len() / hop_size` (empty for empty input)
///
/// # Errors
///
/// Returns `AnalysisError::InvalidInput` if `frame_size` or `hop_size` is zero
pub fn power_spectrogram(
    samples: &[f32],
    frame_size: usize,
    hop_size: usize,
) -> Result<Vec<Vec<f32>>, AnalysisError> {
    if frame_size == 0 {
        return Err(AnalysisError::InvalidInput(
            "Frame size must be > 0".to_string(),
        ));
    }
    if hop_size == 0 {
        return Err(AnalysisError::InvalidInput(
            "Hop size must be > 0".to_string(),
        ));
    }
    if samples.is_empty() {
        return Ok(Vec::new());
    }

    let window = hann_window(frame_size);
    let n_bins = frame_size / 2 + 1;

    let mut planner = FftPlanner::<f32>::new();
    let fft = planner.plan_fft_forward(frame_size);

    let mut buffer = SampleBuffer::centered(samples, frame_size, hop_size);
    let mut frames = Vec::with_capacity(buffer.frame_count());
    let mut fft_buf = vec![Complex::new(0.0f32, 0.0); frame_size];

    while let Some(frame) = buffer.next_window() {
        for ((slot, &x), &w) in fft_buf.iter_mut().zip(frame.iter()).zip(window.iter()) {
            *slot = Complex::new(x * w, 0.0);
        }
        fft.process(&mut fft_buf);

        let power: Vec<f32> = fft_buf[..n_bins].iter().map(|c| c.norm_sqr()).collect();
        frames.push(power);
    }

    log::debug!(
        "Power spectrogram: {} frames × {} bins (frame={}, hop={})",
        frames.len(),
        n_bins,
        frame_size,
        hop_size
    );

    Ok(frames)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hann_window_shape() {
        let w = hann_window(100);
        assert_eq!(w.len(), 100);
        assert!(w[0].abs() < 1e-6);
        assert!((w[50] - 1.0).abs() < 1e-6);
        // Periodic window: symmetric around n/2, last sample is not zero
        assert!((w[25] - w[75]).abs() < 1e-5);
        assert!(w[99] > 0.0);
    }

    #[test]
    fn test_spectrogram_dimensions() {
        let samples = vec![0.0f32; 44100];
        let spec = power_spectrogram(&samples, 2048, 512).unwrap();
        assert_eq!(spec.len(), 1 + 44100 / 512);
        assert!(spec.iter().all(|frame| frame.len() == 1025));
    }

    #[test]
    fn test_sine_peaks_in_expected_bin() {
        let sample_rate = 8000.0;
        let freq = 1000.0;
        let samples: Vec<f32> = (0..8000)
            .map(|i| (2.0 * std::f32::consts::PI * freq * i as f32 / sample_rate).sin())
            .collect();

        let spec = power_spectrogram(&samples, 256, 128).unwrap();
        let middle = &spec[spec.len() / 2];
        let peak_bin = middle
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.partial_cmp(b.1).unwrap())
            .map(|(i, _)| i)
            .unwrap();

        // 1000 Hz at 8 kHz with 256-point FFT → bin 32
        assert_eq!(peak_bin, 32);
    }

    #[test]
    fn test_empty_and_invalid() {
        assert!(power_spectrogram(&[], 2048, 512).unwrap().is_empty());
        assert!(power_spectrogram(&[0.0; 10], 0, 512).is_err());
        assert!(power_spectrogram(&[0.0; 10], 2048, 0).is_err());
    }
}
