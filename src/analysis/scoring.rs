//! Onset strength scoring
//!
//! Maps each candidate onset onto the envelope sample nearest in time, then
//! normalizes raw magnitudes against the loudest candidate and applies a
//! 1.5 power curve. The curve keeps the loudest onset at exactly 1.0 while
//! pushing subtle onsets further down than linear scaling would.

use super::result::Onset;

/// Exponent of the perceptual strength curve
pub const STRENGTH_CURVE_EXPONENT: f32 = 1.5;

/// Index of the grid point closest to `time`
///
/// `grid` must be sorted ascending. On an exact midpoint between two grid
/// points the earlier one wins. Times before the grid map to the first point,
/// times after it to the last. Returns `None` for an empty grid.
pub fn nearest_frame(grid: &[f64], time: f64) -> Option<usize> {
    if grid.is_empty() {
        return None;
    }

    // First index with grid[i] >= time
    let upper = grid.partition_point(|&t| t < time);
    if upper == 0 {
        return Some(0);
    }
    if upper == grid.len() {
        return Some(grid.len() - 1);
    }

    let lower = upper - 1;
    let below = (time - grid[lower]).abs();
    let above = (grid[upper] - time).abs();
    if above < below {
        Some(upper)
    } else {
        Some(lower)
    }
}

/// Look up the raw strength of each onset time on the envelope
///
/// # Arguments
///
/// * `times` - Onset times in seconds, ascending
/// * `grid` - Envelope time grid, ascending
/// * `envelope` - Envelope values, same length as `grid`
///
/// # Returns
///
/// Onsets carrying their raw strength; `strength` equals `raw_strength`
/// until [`normalize_strengths`] runs. Empty if the envelope is empty.
pub fn assign_raw_strengths(times: &[f64], grid: &[f64], envelope: &[f32]) -> Vec<Onset> {
    debug_assert_eq!(grid.len(), envelope.len());

    times
        .iter()
        .filter_map(|&time| {
            nearest_frame(grid, time).map(|frame| Onset::raw(time, envelope[frame]))
        })
        .collect()
}

/// Normalize raw strengths and apply the perceptual curve
///
/// Each final strength becomes `(raw / max_raw) ^ 1.5`. If the largest raw
/// strength is not positive, strengths are left at their raw values.
pub fn normalize_strengths(onsets: Vec<Onset>) -> Vec<Onset> {
    let max_strength = onsets
        .iter()
        .map(|o| o.raw_strength)
        .fold(0.0f32, f32::max);

    if max_strength <= 0.0 {
        log::debug!("All raw strengths are zero, skipping normalization");
        return onsets;
    }

    log::debug!(
        "Normalizing {} onset strengths against max={:.4}",
        onsets.len(),
        max_strength
    );

    onsets
        .into_iter()
        .map(|onset| {
            let ratio = (onset.raw_strength / max_strength).max(0.0);
            onset.with_strength(ratio.powf(STRENGTH_CURVE_EXPONENT))
        })
        .collect()
}

/// Score candidate onsets against an envelope
///
/// Combines [`assign_raw_strengths`] and [`normalize_strengths`].
pub fn score_onsets(times: &[f64], grid: &[f64], envelope: &[f32]) -> Vec<Onset> {
    normalize_strengths(assign_raw_strengths(times, grid, envelope))
}
