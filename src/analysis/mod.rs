//! Onset scoring and result types
//!
//! - Nearest-frame strength lookup and perceptual normalization
//! - Strength threshold filtering
//! - Result types

pub mod filter;
pub mod result;
pub mod scoring;
