//! Feature extraction modules
//!
//! This module contains the signal analysis stages:
//! - Spectrogram computation (STFT, mel projection, dB scaling)
//! - Onset-strength envelope and onset peak picking

pub mod onset;
pub mod spectrogram;
