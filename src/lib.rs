//! # Stratum Onsets
//!
//! Offline onset analysis for audio recordings: detects percussive onsets,
//! scores each one by perceptual strength, drops weak ones, and writes a
//! timestamped onset list plus a diagnostic plot.
//!
//! ## Features
//!
//! - **Decoding**: MP3, WAV, FLAC, OGG/Vorbis and AAC through Symphonia, downmixed to mono
//! - **Resampling**: Analysis runs at 22050 Hz regardless of the source rate
//! - **Onset envelope**: Log-mel spectral flux on a centered STFT grid
//! - **Peak picking**: Moving maximum, moving average and refractory period tests
//! - **Strength scoring**: Peak-normalized strengths shaped by a 1.5 power curve
//! - **Outputs**: Indented JSON onset list and a PNG plot of envelope and onsets
//!
//! ## Quick Start
//!
//! ```no_run
//! use stratum_onsets::{analyze_file, AnalysisConfig, OutputPaths};
//!
//! let paths = OutputPaths::for_base("assets/audio", "IKYHWM");
//! let analysis = analyze_file(&paths, &AnalysisConfig::default())?;
//!
//! println!("Kept {} of {} onsets", analysis.onsets.filtered.len(), analysis.onsets.all.len());
//! # Ok::<(), stratum_onsets::AnalysisError>(())
//! ```
//!
//! ## Architecture
//!
//! ```text
//! Decode → Resample → Onset envelope → Peak picking → Scoring → Threshold → JSON + PNG
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod analysis;
pub mod config;
pub mod error;
pub mod features;
pub mod io;
pub mod output;
pub mod preprocessing;

// Re-export main types
pub use analysis::result::{Onset, OnsetAnalysis, OnsetReport, ScoredOnsets};
pub use config::{AnalysisConfig, PeakPickParams, ScoringConfig};
pub use error::AnalysisError;
pub use features::onset::{OnsetCandidate, OnsetEnvelope};
pub use io::{AudioClip, OutputPaths};

use std::borrow::Cow;

use analysis::filter::apply_threshold;
use analysis::scoring::score_onsets;
use features::onset::{detect_onsets, onset_strength};
use preprocessing::resample::resample_mono;

/// Score candidate onsets against an envelope and apply the strength threshold
///
/// Each candidate takes the envelope value of the frame nearest its time,
/// strengths are normalized against the loudest candidate and curved, and
/// onsets below `config.strength_threshold` are dropped from the filtered view.
///
/// # Arguments
///
/// * `candidates` - Candidate onsets in ascending time order
/// * `envelope` - Raw onset-strength envelope
/// * `config` - Scoring parameters
///
/// # Example
///
/// ```
/// use stratum_onsets::{score_candidates, OnsetCandidate, OnsetEnvelope, ScoringConfig};
///
/// let envelope = OnsetEnvelope::new(vec![0.0, 0.1, 0.8, 0.05, 0.8], 4, 1);
/// let candidates: Vec<OnsetCandidate> = (1..5)
///     .map(|frame| OnsetCandidate { frame, time_seconds: frame as f64 / 4.0 })
///     .collect();
///
/// let scored = score_candidates(&candidates, &envelope, &ScoringConfig::default());
/// assert_eq!(scored.filtered.len(), 2);
/// assert!(scored.filtered.iter().all(|o| o.strength == 1.0));
/// ```
pub fn score_candidates(
    candidates: &[OnsetCandidate],
    envelope: &OnsetEnvelope,
    config: &ScoringConfig,
) -> ScoredOnsets {
    let times: Vec<f64> = candidates.iter().map(|c| c.time_seconds).collect();
    let scored = score_onsets(&times, &envelope.times(), &envelope.values);
    apply_threshold(scored, config)
}

/// Detect, score and filter onsets in mono samples without touching the filesystem
///
/// Samples are first resampled to `config.target_sample_rate` (if set), so the
/// same recording gives the same onsets whatever rate it was stored at. The
/// returned envelope is on the analysis rate's frame grid.
///
/// # Arguments
///
/// * `samples` - Mono audio samples, normalized to [-1.0, 1.0]
/// * `sample_rate` - Sample rate in Hz
/// * `config` - Analysis configuration parameters
///
/// # Returns
///
/// The raw envelope and the scored onsets
///
/// # Errors
///
/// Returns `AnalysisError::NoOnsetsDetected` if peak picking finds no
/// candidates, `AnalysisError::InvalidInput` for invalid parameters, or
/// `AnalysisError::ProcessingError` if resampling fails
pub fn analyze_samples(
    samples: &[f32],
    sample_rate: u32,
    config: &AnalysisConfig,
) -> Result<(OnsetEnvelope, ScoredOnsets), AnalysisError> {
    log::debug!(
        "Starting onset analysis: {} samples at {} Hz",
        samples.len(),
        sample_rate
    );

    config.validate()?;
    if sample_rate == 0 {
        return Err(AnalysisError::InvalidInput("Invalid sample rate".to_string()));
    }

    let (samples, sample_rate) = match config.target_sample_rate {
        Some(target) if target != sample_rate => {
            log::debug!("Resampling from {} Hz to {} Hz", sample_rate, target);
            (Cow::Owned(resample_mono(samples, sample_rate, target)?), target)
        }
        _ => (Cow::Borrowed(samples), sample_rate),
    };

    let envelope = onset_strength(&samples, sample_rate, config)?;
    let candidates = detect_onsets(&envelope, &config.peak_pick)?;

    if candidates.is_empty() {
        return Err(AnalysisError::NoOnsetsDetected);
    }

    log::info!(
        "Filtering onsets with a strength threshold of {}...",
        config.scoring.strength_threshold
    );
    let scored = score_candidates(&candidates, &envelope, &config.scoring);

    Ok((envelope, scored))
}

/// Analyze one audio file and write the onset data file and plot
///
/// Nothing is written unless decoding succeeds and at least one candidate
/// onset is found. If every candidate falls below the threshold, an empty
/// onset list and a plot without markers are still written.
///
/// # Arguments
///
/// * `paths` - Input file and the two output paths
/// * `config` - Analysis configuration parameters
///
/// # Errors
///
/// - `AnalysisError::DecodingError` if the input cannot be loaded
/// - `AnalysisError::NoOnsetsDetected` if detection finds nothing
/// - `AnalysisError::OutputError` if either output cannot be written
pub fn analyze_file(
    paths: &OutputPaths,
    config: &AnalysisConfig,
) -> Result<OnsetAnalysis, AnalysisError> {
    use std::time::Instant;
    let start_time = Instant::now();

    config.validate()?;

    log::info!("Loading audio file: {}...", paths.input.display());
    let clip = io::decode_audio(&paths.input)?;

    log::info!("Detecting onsets and measuring strength...");
    let (envelope, onsets) = analyze_samples(&clip.samples, clip.sample_rate, config)?;

    log::info!("Saving analysis data to: {}...", paths.data.display());
    output::write_onset_report(&paths.data, &onsets.filtered)?;

    log::info!("Generating plot and saving to: {}...", paths.plot.display());
    output::save_plot(&paths.plot, &envelope, &onsets.filtered, onsets.threshold)?;
    log::info!("Plot saved successfully.");

    let processing_time_ms = start_time.elapsed().as_secs_f32() * 1000.0;

    Ok(OnsetAnalysis {
        envelope,
        onsets,
        duration_seconds: clip.duration_seconds(),
        data_path: paths.data.clone(),
        plot_path: paths.plot.clone(),
        processing_time_ms,
    })
}
