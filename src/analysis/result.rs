//! Analysis result types

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::features::onset::OnsetEnvelope;

/// A detected onset
///
/// Serializes as `{"time": .., "strength": ..}`; the raw envelope magnitude is
/// kept in memory only.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Onset {
    /// Position in the recording, in seconds
    pub time: f64,

    /// Final strength after normalization and the perceptual curve
    ///
    /// In [0, 1] whenever at least one candidate had a positive raw strength.
    pub strength: f32,

    /// Envelope magnitude at the onset's nearest frame
    #[serde(skip)]
    pub raw_strength: f32,
}

impl Onset {
    /// Onset that has not been scored yet (`strength == raw_strength`)
    pub fn raw(time: f64, raw_strength: f32) -> Self {
        Self {
            time,
            strength: raw_strength,
            raw_strength,
        }
    }

    /// Copy of this onset with a new final strength
    pub fn with_strength(self, strength: f32) -> Self {
        Self { strength, ..self }
    }
}

/// Onset data file contents
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OnsetReport {
    /// Surviving onsets in ascending time order
    pub onsets: Vec<Onset>,
}

/// Outcome of scoring and filtering a candidate set
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredOnsets {
    /// Every scored candidate, ascending time
    pub all: Vec<Onset>,

    /// Candidates at or above the threshold, same order
    pub filtered: Vec<Onset>,

    /// Threshold that produced `filtered`
    pub threshold: f32,
}

impl ScoredOnsets {
    /// Number of candidates removed by the threshold
    pub fn dropped(&self) -> usize {
        self.all.len() - self.filtered.len()
    }
}

/// Complete result of analyzing one file
#[derive(Debug, Clone)]
pub struct OnsetAnalysis {
    /// Raw onset-strength envelope
    pub envelope: OnsetEnvelope,

    /// Scored and filtered onsets
    pub onsets: ScoredOnsets,

    /// Duration of the decoded audio in seconds
    pub duration_seconds: f32,

    /// Onset data file that was written
    pub data_path: PathBuf,

    /// Plot image that was written
    pub plot_path: PathBuf,

    /// Wall-clock processing time in milliseconds
    pub processing_time_ms: f32,
}
