//! Spectral flux onset-strength envelope
//!
//! Computes a log-mel spectral flux curve whose value at each frame estimates
//! how strong a new attack is at that instant.
//!
//! Algorithm:
//! 1. Centered STFT power spectrogram, projected onto mel bands
//! 2. Convert to dB, flooring at `max - top_db`
//! 3. Per band, half-wave rectified difference against the frame `lag` steps back
//! 4. Average across bands
//! 5. Shift right by `lag + frame_size / (2 * hop_size)` frames so each value
//!    lines up with the center of the frame that produced it
//!
//! # Example
//!
//! ```no_run
//! use stratum_onsets::features::onset::spectral_flux::onset_strength;
//! use stratum_onsets::AnalysisConfig;
//!
//! let samples = vec![0.0f32; 22050 * 5];
//! let envelope = onset_strength(&samples, 22050, &AnalysisConfig::default())?;
//! println!("{} frames", envelope.len());
//! # Ok::<(), stratum_onsets::AnalysisError>(())
//! ```

use super::OnsetEnvelope;
use crate::config::AnalysisConfig;
use crate::error::AnalysisError;
use crate::features::spectrogram::{mel_spectrogram, power_to_db};

/// Compute the onset-strength envelope of a mono signal
///
/// # Reference
///
/// Böck, S., & Widmer, G. (2013). Maximum Filter Vibrato Suppression for Onset Detection.
/// *Proceedings of the 16th International Conference on Digital Audio Effects (DAFx)*.
///
/// # Arguments
///
/// * `samples` - Mono audio samples
/// * `sample_rate` - Sample rate in Hz
/// * `config` - STFT, mel and lag parameters
///
/// # Returns
///
/// Envelope with one value per STFT frame (`1 + len / hop_size` frames), all
/// values `>= 0`. Empty input yields an empty envelope.
///
/// # Errors
///
/// Returns `AnalysisError::InvalidInput` if the configuration or sample rate is invalid
pub fn onset_strength(
    samples: &[f32],
    sample_rate: u32,
    config: &AnalysisConfig,
) -> Result<OnsetEnvelope, AnalysisError> {
    config.validate()?;
    if sample_rate == 0 {
        return Err(AnalysisError::InvalidInput("Invalid sample rate".to_string()));
    }

    let hop_size = config.hop_size;
    if samples.is_empty() {
        return Ok(OnsetEnvelope::new(Vec::new(), sample_rate, hop_size));
    }

    let mut mel = mel_spectrogram(
        samples,
        sample_rate,
        config.frame_size,
        hop_size,
        config.n_mels,
    )?;
    power_to_db(&mut mel, Some(config.top_db));

    let n_frames = mel.len();
    let lag = config.lag;
    let pad = lag + config.frame_size / (2 * hop_size);

    let mut values = Vec::with_capacity(pad + n_frames);
    values.resize(pad, 0.0f32);

    for t in lag..n_frames {
        let current = &mel[t];
        let reference = &mel[t - lag];
        let rectified: f32 = current
            .iter()
            .zip(reference.iter())
            .map(|(&c, &r)| (c - r).max(0.0))
            .sum();
        values.push(rectified / current.len() as f32);
    }

    values.truncate(n_frames);
    values.resize(n_frames, 0.0);

    let envelope = OnsetEnvelope::new(values, sample_rate, hop_size);
    log::debug!(
        "Onset strength envelope: {} frames, max={:.4}",
        envelope.len(),
        envelope.max_value()
    );

    Ok(envelope)
}
