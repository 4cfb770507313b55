//! Analyze the bundled recording and write its onset data and plot
//!
//! Reads `assets/audio/IKYHWM.mp3` and writes `IKYHWM_data.json` and
//! `IKYHWM_plot.png` next to it. Progress is logged at `info` level; set
//! `RUST_LOG` to change verbosity.

use std::process::ExitCode;

use stratum_onsets::{analyze_file, AnalysisConfig, OutputPaths};

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let paths = OutputPaths::default();
    let config = AnalysisConfig::default();

    match analyze_file(&paths, &config) {
        Ok(analysis) => {
            log::debug!(
                "Analyzed {:.2}s of audio in {:.2} ms",
                analysis.duration_seconds,
                analysis.processing_time_ms
            );
            log::info!("Analysis complete!");
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
