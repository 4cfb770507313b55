//! Strength threshold filtering

use super::result::{Onset, ScoredOnsets};
use crate::config::ScoringConfig;

/// Keep onsets whose final strength is at least `threshold`
///
/// Order is preserved. An empty result is valid.
pub fn filter_by_strength(onsets: &[Onset], threshold: f32) -> Vec<Onset> {
    onsets
        .iter()
        .filter(|onset| onset.strength >= threshold)
        .copied()
        .collect()
}

/// Split scored onsets into the full set and the survivors of `config`'s threshold
pub fn apply_threshold(scored: Vec<Onset>, config: &ScoringConfig) -> ScoredOnsets {
    let filtered = filter_by_strength(&scored, config.strength_threshold);
    log::info!(
        "Kept {} of the original {} onsets.",
        filtered.len(),
        scored.len()
    );

    ScoredOnsets {
        all: scored,
        filtered,
        threshold: config.strength_threshold,
    }
}
