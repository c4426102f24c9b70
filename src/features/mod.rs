//! Feature extraction modules
//!
//! - Tuning reference shared by every stage
//! - Chroma extraction
//! - Chord templates, classification and smoothing
//! - Monophonic pitch detection
//! - Onset detection
//! - Tempo estimation from onsets

pub mod chord;
pub mod chroma;
pub mod onset;
pub mod period;
pub mod pitch;
pub mod tuning;
