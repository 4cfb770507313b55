//! Audio preprocessing modules
//!
//! - Channel mixing (multi-channel to mono)
//! - Sample rate conversion

pub mod channel_mixer;
pub mod resample;
