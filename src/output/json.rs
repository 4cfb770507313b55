//! Onset data file
//!
//! Writes `{"onsets": [{"time": .., "strength": ..}, ...]}` as indented JSON.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::analysis::result::{Onset, OnsetReport};
use crate::error::AnalysisError;

/// Write the onset data file, replacing any existing file at `path`
///
/// # Errors
///
/// Returns `AnalysisError::OutputError` if the file cannot be created or written
pub fn write_onset_report<P: AsRef<Path>>(path: P, onsets: &[Onset]) -> Result<(), AnalysisError> {
    let path = path.as_ref();
    log::debug!("Writing {} onsets to {}", onsets.len(), path.display());

    let file = File::create(path)
        .map_err(|e| AnalysisError::OutputError(format!("{}: {}", path.display(), e)))?;
    let mut writer = BufWriter::new(file);

    let report = OnsetReport {
        onsets: onsets.to_vec(),
    };
    serde_json::to_writer_pretty(&mut writer, &report)?;
    writer
        .flush()
        .map_err(|e| AnalysisError::OutputError(format!("{}: {}", path.display(), e)))?;

    Ok(())
}
