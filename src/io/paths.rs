//! Input and output file layout
//!
//! A run reads `<dir>/<base>.mp3` and writes `<dir>/<base>_data.json` and
//! `<dir>/<base>_plot.png`.

use std::path::{Path, PathBuf};

/// Directory the command-line tool reads from and writes to
pub const DEFAULT_AUDIO_DIR: &str = "assets/audio";

/// Base name of the recording analyzed by the command-line tool
pub const DEFAULT_BASE_NAME: &str = "IKYHWM";

/// Paths for one analysis run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    /// Audio file to analyze
    pub input: PathBuf,
    /// Onset data file (JSON)
    pub data: PathBuf,
    /// Diagnostic plot (PNG)
    pub plot: PathBuf,
}

impl OutputPaths {
    /// Derive the three paths from a directory and a base name
    pub fn for_base<P: AsRef<Path>>(dir: P, base: &str) -> Self {
        let dir = dir.as_ref();
        Self {
            input: dir.join(format!("{}.mp3", base)),
            data: dir.join(format!("{}_data.json", base)),
            plot: dir.join(format!("{}_plot.png", base)),
        }
    }
}

impl Default for OutputPaths {
    fn default() -> Self {
        Self::for_base(DEFAULT_AUDIO_DIR, DEFAULT_BASE_NAME)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_layout() {
        let paths = OutputPaths::default();
        assert_eq!(paths.input, Path::new("assets").join("audio").join("IKYHWM.mp3"));
        assert_eq!(paths.data, Path::new("assets").join("audio").join("IKYHWM_data.json"));
        assert_eq!(paths.plot, Path::new("assets").join("audio").join("IKYHWM_plot.png"));
    }

    #[test]
    fn test_custom_base() {
        let paths = OutputPaths::for_base("/tmp/run", "take2");
        assert_eq!(paths.input, PathBuf::from("/tmp/run/take2.mp3"));
        assert_eq!(paths.data, PathBuf::from("/tmp/run/take2_data.json"));
        assert_eq!(paths.plot, PathBuf::from("/tmp/run/take2_plot.png"));
    }
}
