//! Onset detection modules
//!
//! - Spectral flux onset-strength envelope
//! - Peak picking on the envelope
//! - Candidate onset detection (frames and times)

pub mod detect;
pub mod peak_picking;
pub mod spectral_flux;

pub use detect::detect_onsets;
pub use spectral_flux::onset_strength;

/// Onset candidate picked from the envelope
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OnsetCandidate {
    /// Envelope frame index
    pub frame: usize,

    /// Onset time in seconds
    pub time_seconds: f64,
}

/// Onset-strength envelope sampled on a regular frame grid
#[derive(Debug, Clone, PartialEq)]
pub struct OnsetEnvelope {
    /// Envelope value per frame (non-negative)
    pub values: Vec<f32>,

    /// Sample rate of the analyzed audio in Hz
    pub sample_rate: u32,

    /// Hop size between frames in samples
    pub hop_size: usize,
}

impl OnsetEnvelope {
    /// Wrap raw envelope values
    pub fn new(values: Vec<f32>, sample_rate: u32, hop_size: usize) -> Self {
        Self {
            values,
            sample_rate,
            hop_size,
        }
    }

    /// Number of frames
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the envelope has no frames
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Largest envelope value (0.0 for an empty envelope)
    pub fn max_value(&self) -> f32 {
        self.values.iter().copied().fold(0.0f32, f32::max)
    }

    /// Time of a frame in seconds
    pub fn frame_to_time(&self, frame: usize) -> f64 {
        frames_to_time(frame, self.sample_rate, self.hop_size)
    }

    /// Time grid of the envelope, one entry per frame, ascending
    pub fn times(&self) -> Vec<f64> {
        (0..self.values.len()).map(|k| self.frame_to_time(k)).collect()
    }
}

/// Convert a frame index to seconds: `frame * hop_size / sample_rate`
pub fn frames_to_time(frame: usize, sample_rate: u32, hop_size: usize) -> f64 {
    if sample_rate == 0 {
        return 0.0;
    }
    frame as f64 * hop_size as f64 / sample_rate as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frames_to_time() {
        assert_eq!(frames_to_time(0, 22050, 512), 0.0);
        assert!((frames_to_time(43, 22050, 512) - 0.998_458).abs() < 1e-5);
        // Full double precision, as written to the data file
        assert_eq!(frames_to_time(11, 22050, 512), 0.2554195011337868);
        assert_eq!(frames_to_time(10, 0, 512), 0.0);
    }

    #[test]
    fn test_envelope_times_grid() {
        let envelope = OnsetEnvelope::new(vec![0.0, 1.0, 0.5, 0.2], 1000, 250);
        assert_eq!(envelope.times(), vec![0.0, 0.25, 0.5, 0.75]);
        assert_eq!(envelope.max_value(), 1.0);
        assert_eq!(envelope.len(), 4);
    }
}
