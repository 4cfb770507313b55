//! Candidate onset detection
//!
//! Normalizes a copy of the onset-strength envelope to [0, 1] and peak-picks
//! it. The envelope itself is left untouched so that callers can score
//! candidates against raw magnitudes.

use super::peak_picking::{peak_pick, PeakPickWindows};
use super::{OnsetCandidate, OnsetEnvelope};
use crate::config::PeakPickParams;
use crate::error::AnalysisError;

/// Detect candidate onsets in an envelope
///
/// # Arguments
///
/// * `envelope` - Raw onset-strength envelope
/// * `params` - Peak picking parameters in seconds
///
/// # Returns
///
/// Candidates in ascending time order. An all-zero or non-finite envelope
/// yields no candidates.
///
/// # Errors
///
/// Returns `AnalysisError` if the peak picking windows are invalid
pub fn detect_onsets(
    envelope: &OnsetEnvelope,
    params: &PeakPickParams,
) -> Result<Vec<OnsetCandidate>, AnalysisError> {
    if envelope.is_empty() {
        return Ok(Vec::new());
    }

    if envelope.values.iter().any(|v| !v.is_finite()) {
        log::warn!("Onset envelope contains non-finite values, skipping detection");
        return Ok(Vec::new());
    }

    let normalized = normalize_envelope(&envelope.values);
    if normalized.iter().all(|&v| v == 0.0) {
        log::debug!("Onset envelope is flat, no onsets detected");
        return Ok(Vec::new());
    }

    let windows = PeakPickWindows::from_params(params, envelope.sample_rate, envelope.hop_size);
    let frames = peak_pick(&normalized, &windows)?;

    let candidates: Vec<OnsetCandidate> = frames
        .into_iter()
        .map(|frame| OnsetCandidate {
            frame,
            time_seconds: envelope.frame_to_time(frame),
        })
        .collect();

    log::debug!("Detected {} candidate onsets", candidates.len());

    Ok(candidates)
}

/// Shift to a zero minimum and scale to a unit maximum
fn normalize_envelope(values: &[f32]) -> Vec<f32> {
    let min = values.iter().copied().fold(f32::INFINITY, f32::min);
    let shifted: Vec<f32> = values.iter().map(|&v| v - min).collect();
    let max = shifted.iter().copied().fold(0.0f32, f32::max);
    let scale = max + f32::MIN_POSITIVE;
    shifted.into_iter().map(|v| v / scale).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_envelope_range() {
        let normalized = normalize_envelope(&[2.0, 4.0, 6.0]);
        assert_eq!(normalized[0], 0.0);
        assert!((normalized[1] - 0.5).abs() < 1e-6);
        assert!((normalized[2] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_flat_envelope_has_no_onsets() {
        let envelope = OnsetEnvelope::new(vec![3.0; 50], 22050, 512);
        let onsets = detect_onsets(&envelope, &PeakPickParams::default()).unwrap();
        assert!(onsets.is_empty());
    }

    #[test]
    fn test_non_finite_envelope_has_no_onsets() {
        let mut values = vec![0.0; 20];
        values[5] = f32::NAN;
        let envelope = OnsetEnvelope::new(values, 22050, 512);
        assert!(detect_onsets(&envelope, &PeakPickParams::default()).unwrap().is_empty());
    }

    #[test]
    fn test_isolated_spikes_detected_with_times() {
        let mut values = vec![0.0f32; 100];
        values[10] = 5.0;
        values[40] = 3.0;
        values[70] = 4.0;
        let envelope = OnsetEnvelope::new(values, 22050, 512);

        let onsets = detect_onsets(&envelope, &PeakPickParams::default()).unwrap();
        let frames: Vec<usize> = onsets.iter().map(|o| o.frame).collect();
        assert_eq!(frames, vec![10, 40, 70]);

        let expected = 10.0 * 512.0 / 22050.0;
        assert!((onsets[0].time_seconds - expected).abs() < 1e-6);
        assert!(onsets.windows(2).all(|w| w[0].time_seconds < w[1].time_seconds));
    }

    #[test]
    fn test_empty_envelope() {
        let envelope = OnsetEnvelope::new(vec![], 22050, 512);
        assert!(detect_onsets(&envelope, &PeakPickParams::default()).unwrap().is_empty());
    }
}
