//! Configuration parameters for onset analysis

/// Strength scoring and filtering parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringConfig {
    /// Minimum final strength an onset needs to survive filtering (default: 0.15)
    ///
    /// Lower values keep more subtle onsets, higher values keep only the strongest hits.
    pub strength_threshold: f32,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            strength_threshold: 0.15,
        }
    }
}

/// Peak picking parameters, expressed in seconds and converted to frames
/// against the envelope's sample rate and hop size
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PeakPickParams {
    /// Look-back for the local maximum test (default: 0.03 s)
    pub pre_max_seconds: f32,

    /// Look-ahead for the local maximum test (default: 0.0 s, plus one frame)
    pub post_max_seconds: f32,

    /// Look-back for the moving average (default: 0.10 s)
    pub pre_avg_seconds: f32,

    /// Look-ahead for the moving average (default: 0.10 s, plus one frame)
    pub post_avg_seconds: f32,

    /// Minimum spacing between consecutive onsets (default: 0.03 s)
    pub wait_seconds: f32,

    /// Margin a peak must exceed the moving average by, on the normalized envelope (default: 0.07)
    pub delta: f32,
}

impl Default for PeakPickParams {
    fn default() -> Self {
        Self {
            pre_max_seconds: 0.03,
            post_max_seconds: 0.0,
            pre_avg_seconds: 0.10,
            post_avg_seconds: 0.10,
            wait_seconds: 0.03,
            delta: 0.07,
        }
    }
}

/// Analysis configuration parameters
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    // Input
    /// Rate the audio is resampled to before analysis (default: 22050 Hz)
    ///
    /// `None` analyzes at the source rate.
    pub target_sample_rate: Option<u32>,

    // STFT parameters
    /// Frame size for STFT (default: 2048)
    pub frame_size: usize,

    /// Hop size for STFT (default: 512)
    pub hop_size: usize,

    // Envelope
    /// Number of mel bands (default: 128)
    pub n_mels: usize,

    /// Dynamic range kept below the loudest spectrogram cell, in dB (default: 80.0)
    pub top_db: f32,

    /// Frame lag used for the spectral difference (default: 1)
    pub lag: usize,

    // Detection
    /// Peak picking windows
    pub peak_pick: PeakPickParams,

    // Scoring
    /// Strength threshold used after scoring
    pub scoring: ScoringConfig,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            target_sample_rate: Some(22050),
            frame_size: 2048,
            hop_size: 512,
            n_mels: 128,
            top_db: 80.0,
            lag: 1,
            peak_pick: PeakPickParams::default(),
            scoring: ScoringConfig::default(),
        }
    }
}

impl AnalysisConfig {
    /// Validate parameter ranges
    pub fn validate(&self) -> Result<(), crate::error::AnalysisError> {
        use crate::error::AnalysisError;

        if self.target_sample_rate == Some(0) {
            return Err(AnalysisError::InvalidInput(
                "Target sample rate must be > 0".to_string(),
            ));
        }
        if self.frame_size < 2 {
            return Err(AnalysisError::InvalidInput(format!(
                "Frame size must be >= 2, got {}",
                self.frame_size
            )));
        }
        if self.hop_size == 0 {
            return Err(AnalysisError::InvalidInput("Hop size must be > 0".to_string()));
        }
        if self.n_mels == 0 {
            return Err(AnalysisError::InvalidInput("Mel band count must be > 0".to_string()));
        }
        if self.lag == 0 {
            return Err(AnalysisError::InvalidInput("Lag must be > 0".to_string()));
        }
        if self.top_db.is_nan() || self.top_db < 0.0 {
            return Err(AnalysisError::InvalidInput(format!(
                "top_db must be non-negative, got {}",
                self.top_db
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_threshold() {
        let config = AnalysisConfig::default();
        assert_eq!(config.scoring.strength_threshold, 0.15);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_hop() {
        let config = AnalysisConfig {
            hop_size: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_target_rate() {
        assert_eq!(AnalysisConfig::default().target_sample_rate, Some(22050));

        let native = AnalysisConfig {
            target_sample_rate: None,
            ..Default::default()
        };
        assert!(native.validate().is_ok());

        let zero = AnalysisConfig {
            target_sample_rate: Some(0),
            ..Default::default()
        };
        assert!(zero.validate().is_err());
    }
}
