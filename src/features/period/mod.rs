//! Tempo estimation from onset lists

pub mod ioi_histogram;

pub use ioi_histogram::{TempoConfig, TempoEstimator};

use serde::{Deserialize, Serialize};

/// Tempo estimate with its supporting evidence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BpmEstimate {
    /// Tempo in beats per minute, within the configured range
    pub bpm: f32,

    /// Fraction of in-range inter-onset intervals in the modal bin
    pub confidence: f32,

    /// Representative beat interval in seconds
    pub interval_secs: f64,
}
