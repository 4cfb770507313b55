//! Sample rate conversion
//!
//! FFT-based resampling of mono signals with `rubato`. The resampler's
//! output delay is trimmed so that sample `n` of the output lines up with
//! time `n / target_rate` of the input.

use rubato::{FftFixedInOut, Resampler};

use crate::error::AnalysisError;

/// Input chunk size handed to the resampler
const CHUNK_SIZE: usize = 1024;

/// Resample a mono signal from `source_rate` to `target_rate`
///
/// # Arguments
///
/// * `samples` - Mono audio samples
/// * `source_rate` - Rate of `samples` in Hz
/// * `target_rate` - Desired rate in Hz
///
/// # Returns
///
/// `ceil(len * target_rate / source_rate)` samples. Equal rates and empty
/// input are returned unchanged.
///
/// # Errors
///
/// Returns `AnalysisError::InvalidInput` for a zero rate, or
/// `AnalysisError::ProcessingError` if the resampler fails
pub fn resample_mono(
    samples: &[f32],
    source_rate: u32,
    target_rate: u32,
) -> Result<Vec<f32>, AnalysisError> {
    if source_rate == 0 || target_rate == 0 {
        return Err(AnalysisError::InvalidInput(format!(
            "Invalid sample rates for resampling: {} Hz -> {} Hz",
            source_rate, target_rate
        )));
    }
    if source_rate == target_rate || samples.is_empty() {
        return Ok(samples.to_vec());
    }

    let mut resampler = FftFixedInOut::<f32>::new(
        source_rate as usize,
        target_rate as usize,
        CHUNK_SIZE,
        1,
    )
    .map_err(|e| AnalysisError::ProcessingError(format!("Failed to create resampler: {}", e)))?;

    let expected = (samples.len() as u64 * target_rate as u64).div_ceil(source_rate as u64) as usize;
    let delay = resampler.output_delay();
    let needed = delay + expected;

    let chunk_size = resampler.input_frames_next();
    let mut chunk = vec![0.0f32; chunk_size];
    let mut output: Vec<f32> = Vec::with_capacity(needed + resampler.output_frames_max());
    let mut pos = 0;

    // Past the end of the input the resampler is fed silence to flush its delay line
    while output.len() < needed {
        chunk.fill(0.0);
        if pos < samples.len() {
            let end = (pos + chunk_size).min(samples.len());
            chunk[..end - pos].copy_from_slice(&samples[pos..end]);
        }

        let input_refs: Vec<&[f32]> = vec![chunk.as_slice()];
        let resampled = resampler
            .process(&input_refs, None)
            .map_err(|e| AnalysisError::ProcessingError(format!("Resampling failed: {}", e)))?;
        if let Some(channel) = resampled.first() {
            output.extend_from_slice(channel);
        }

        pos += chunk_size;
    }

    output.truncate(needed);
    output.drain(..delay);

    log::debug!(
        "Resampled {} samples at {} Hz to {} samples at {} Hz (delay {} frames)",
        samples.len(),
        source_rate,
        output.len(),
        target_rate,
        delay
    );

    Ok(output)
}
