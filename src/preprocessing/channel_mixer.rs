//! Channel mixing utilities (multi-channel to mono conversion)

use crate::error::AnalysisError;

/// Downmix interleaved multi-channel samples to mono by averaging channels
///
/// # Arguments
///
/// * `interleaved` - Interleaved samples (`[L, R, L, R, ...]` for stereo)
/// * `channels` - Number of interleaved channels
///
/// # Returns
///
/// Mono samples, one per frame. A trailing partial frame is dropped.
///
/// # Errors
///
/// Returns `AnalysisError::InvalidInput` if `channels` is zero
pub fn interleaved_to_mono(interleaved: &[f32], channels: usize) -> Result<Vec<f32>, AnalysisError> {
    if channels == 0 {
        return Err(AnalysisError::InvalidInput(
            "Channel count must be > 0".to_string(),
        ));
    }

    if channels == 1 {
        return Ok(interleaved.to_vec());
    }

    let scale = 1.0 / channels as f32;
    Ok(interleaved
        .chunks_exact(channels)
        .map(|frame| frame.iter().sum::<f32>() * scale)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stereo_average() {
        let stereo = vec![0.1, 0.2, 0.3, 0.4, 0.5, 0.6];
        let mono = interleaved_to_mono(&stereo, 2).unwrap();

        assert_eq!(mono.len(), 3);
        assert!((mono[0] - 0.15).abs() < 1e-6);
        assert!((mono[1] - 0.35).abs() < 1e-6);
        assert!((mono[2] - 0.55).abs() < 1e-6);
    }

    #[test]
    fn test_mono_passthrough() {
        let samples = vec![0.25, -0.5, 1.0];
        assert_eq!(interleaved_to_mono(&samples, 1).unwrap(), samples);
    }

    #[test]
    fn test_partial_frame_dropped() {
        let samples = vec![1.0, 1.0, 1.0, 0.5, 0.5];
        let mono = interleaved_to_mono(&samples, 3).unwrap();
        assert_eq!(mono.len(), 1);
        assert!((mono[0] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_zero_channels_rejected() {
        assert!(interleaved_to_mono(&[0.0; 4], 0).is_err());
    }
}
