//! Audio I/O modules
//!
//! Audio decoding via Symphonia, frame buffering, and the fixed file layout
//! used by the command-line tool.

pub mod decoder;
pub mod paths;
pub mod sample_buffer;

pub use decoder::{decode_audio, AudioClip};
pub use paths::OutputPaths;
