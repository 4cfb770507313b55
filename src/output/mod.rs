//! Output artifacts
//!
//! - Onset data file (JSON)
//! - Diagnostic plot (PNG)

mod glyphs;
pub mod json;
pub mod plot;

pub use json::write_onset_report;
pub use plot::save_plot;
