//! Onset peak picking
//!
//! Picks onset frames from a normalized onset-strength envelope using three
//! local tests and a refractory period.
//!
//! A frame `n` is an onset when:
//! 1. `x[n] > 0`
//! 2. `x[n] == max(x[n - pre_max .. n + post_max])`
//! 3. `x[n] >= mean(x[n - pre_avg .. n + post_avg]) + delta`
//! 4. `n > previous_onset + wait`
//!
//! Window bounds are half-open and clipped to the signal.
//!
//! # Reference
//!
//! Böck, S., Krebs, F., & Schedl, M. (2012). Evaluating the Online Capabilities of Onset
//! Detection Methods. *Proceedings of the 13th International Society for Music Information
//! Retrieval Conference (ISMIR)*.

use crate::config::PeakPickParams;
use crate::error::AnalysisError;

/// Peak picking windows in frames
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PeakPickWindows {
    /// Frames before `n` in the maximum window
    pub pre_max: usize,
    /// Frames from `n` (inclusive) in the maximum window, must be >= 1
    pub post_max: usize,
    /// Frames before `n` in the average window
    pub pre_avg: usize,
    /// Frames from `n` (inclusive) in the average window, must be >= 1
    pub post_avg: usize,
    /// Minimum frames between onsets
    pub wait: usize,
    /// Threshold offset above the moving average
    pub delta: f32,
}

impl PeakPickWindows {
    /// Convert second-based parameters to frame counts
    ///
    /// Durations are floored to whole frames; the look-ahead windows get one
    /// extra frame so that they always include the frame under test.
    pub fn from_params(params: &PeakPickParams, sample_rate: u32, hop_size: usize) -> Self {
        let frames = |seconds: f32| -> usize {
            if hop_size == 0 || seconds <= 0.0 {
                return 0;
            }
            (seconds as f64 * sample_rate as f64 / hop_size as f64).floor() as usize
        };

        Self {
            pre_max: frames(params.pre_max_seconds),
            post_max: frames(params.post_max_seconds) + 1,
            pre_avg: frames(params.pre_avg_seconds),
            post_avg: frames(params.post_avg_seconds) + 1,
            wait: frames(params.wait_seconds),
            delta: params.delta,
        }
    }
}

/// Pick onset frames from an envelope
///
/// # Arguments
///
/// * `signal` - Envelope values (normally scaled to [0, 1])
/// * `windows` - Window sizes and threshold offset
///
/// # Returns
///
/// Ascending frame indices of detected peaks
///
/// # Errors
///
/// Returns `AnalysisError::InvalidInput` if `post_max` or `post_avg` is zero
///
/// # Example
///
/// ```
/// use stratum_onsets::features::onset::peak_picking::{peak_pick, PeakPickWindows};
///
/// let signal = vec![0.0, 0.1, 1.0, 0.1, 0.0, 0.0, 0.8, 0.0];
/// let windows = PeakPickWindows { pre_max: 1, post_max: 2, pre_avg: 2, post_avg: 3, wait: 1, delta: 0.1 };
/// let peaks = peak_pick(&signal, &windows)?;
/// assert_eq!(peaks, vec![2, 6]);
/// # Ok::<(), stratum_onsets::AnalysisError>(())
/// ```
pub fn peak_pick(signal: &[f32], windows: &PeakPickWindows) -> Result<Vec<usize>, AnalysisError> {
    if windows.post_max == 0 {
        return Err(AnalysisError::InvalidInput(
            "post_max must be >= 1".to_string(),
        ));
    }
    if windows.post_avg == 0 {
        return Err(AnalysisError::InvalidInput(
            "post_avg must be >= 1".to_string(),
        ));
    }

    log::debug!(
        "Peak picking {} frames: pre_max={}, post_max={}, pre_avg={}, post_avg={}, wait={}, delta={:.3}",
        signal.len(),
        windows.pre_max,
        windows.post_max,
        windows.pre_avg,
        windows.post_avg,
        windows.wait,
        windows.delta
    );

    let len = signal.len();
    let mut peaks = Vec::new();
    let mut last_peak: Option<usize> = None;

    for (n, &value) in signal.iter().enumerate() {
        if value <= 0.0 {
            continue;
        }

        let max_start = n.saturating_sub(windows.pre_max);
        let max_end = (n + windows.post_max).min(len);
        let local_max = signal[max_start..max_end]
            .iter()
            .copied()
            .fold(f32::NEG_INFINITY, f32::max);
        if value != local_max {
            continue;
        }

        let avg_start = n.saturating_sub(windows.pre_avg);
        let avg_end = (n + windows.post_avg).min(len);
        let avg_window = &signal[avg_start..avg_end];
        let local_avg = avg_window.iter().sum::<f32>() / avg_window.len() as f32;
        if value < local_avg + windows.delta {
            continue;
        }

        if let Some(last) = last_peak {
            if n <= last + windows.wait {
                continue;
            }
        }

        peaks.push(n);
        last_peak = Some(n);
    }

    log::debug!("Picked {} peaks", peaks.len());

    Ok(peaks)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn windows(pre_max: usize, post_max: usize, pre_avg: usize, post_avg: usize, wait: usize, delta: f32) -> PeakPickWindows {
        PeakPickWindows {
            pre_max,
            post_max,
            pre_avg,
            post_avg,
            wait,
            delta,
        }
    }

    #[test]
    fn test_from_params_default_at_22050() {
        let w = PeakPickWindows::from_params(&PeakPickParams::default(), 22050, 512);
        assert_eq!(w.pre_max, 1);
        assert_eq!(w.post_max, 1);
        assert_eq!(w.pre_avg, 4);
        assert_eq!(w.post_avg, 5);
        assert_eq!(w.wait, 1);
        assert!((w.delta - 0.07).abs() < 1e-6);
    }

    #[test]
    fn test_from_params_default_at_44100() {
        let w = PeakPickWindows::from_params(&PeakPickParams::default(), 44100, 512);
        assert_eq!(w.pre_max, 2);
        assert_eq!(w.pre_avg, 8);
        assert_eq!(w.post_avg, 9);
        assert_eq!(w.wait, 2);
    }

    #[test]
    fn test_basic_peaks() {
        let signal = vec![0.0, 0.1, 1.0, 0.1, 0.0, 0.0, 0.8, 0.0];
        let peaks = peak_pick(&signal, &windows(1, 2, 2, 3, 1, 0.1)).unwrap();
        assert_eq!(peaks, vec![2, 6]);
    }

    #[test]
    fn test_delta_rejects_small_bumps() {
        let signal = vec![0.5, 0.52, 0.5, 0.51, 0.5];
        let peaks = peak_pick(&signal, &windows(1, 2, 2, 3, 0, 0.07)).unwrap();
        assert!(peaks.is_empty(), "Flat signal should not produce peaks: {:?}", peaks);
    }

    #[test]
    fn test_wait_suppresses_close_peaks() {
        // Peaks at 1 and 3 are two frames apart
        let signal = vec![0.0, 1.0, 0.0, 0.9, 0.0, 0.0, 0.0, 0.7, 0.0];
        let no_wait = peak_pick(&signal, &windows(1, 2, 1, 2, 0, 0.05)).unwrap();
        assert_eq!(no_wait, vec![1, 3, 7]);

        let with_wait = peak_pick(&signal, &windows(1, 2, 1, 2, 2, 0.05)).unwrap();
        assert_eq!(with_wait, vec![1, 7]);
    }

    #[test]
    fn test_plateau_first_frame_wins_with_wait() {
        // Both plateau frames equal the local max; the refractory period keeps the first
        let signal = vec![0.0, 0.0, 1.0, 1.0, 0.0, 0.0];
        let peaks = peak_pick(&signal, &windows(1, 1, 2, 3, 1, 0.1)).unwrap();
        assert_eq!(peaks, vec![2]);
    }

    #[test]
    fn test_zero_signal_has_no_peaks() {
        let peaks = peak_pick(&[0.0; 16], &windows(1, 1, 4, 5, 1, 0.07)).unwrap();
        assert!(peaks.is_empty());
        assert!(peak_pick(&[], &windows(1, 1, 4, 5, 1, 0.07)).unwrap().is_empty());
    }

    #[test]
    fn test_invalid_windows() {
        assert!(peak_pick(&[1.0], &windows(1, 0, 1, 1, 0, 0.0)).is_err());
        assert!(peak_pick(&[1.0], &windows(1, 1, 1, 0, 0, 0.0)).is_err());
    }
}
