//! Monophonic pitch detection
//!
//! - [`estimator`]: the frequency-estimation interface and the default
//!   autocorrelation implementation
//! - [`quantize`]: frequency to nearest equal-tempered note with cents
//! - [`detector`]: amplitude gate + estimator chain + quantization
//! - [`tracker`]: merges per-frame readings into timed note events

pub mod detector;
pub mod estimator;
pub mod quantize;
pub mod tracker;

pub use detector::{PitchConfig, PitchDetector};
pub use estimator::{AutocorrelationEstimator, PitchEstimator};
pub use quantize::quantize_frequency;
pub use tracker::NoteTracker;

use serde::{Deserialize, Serialize};

/// Pitch detected in one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PitchReading {
    /// Estimated fundamental in Hz
    pub frequency: f32,

    /// Nearest note name, e.g. "A4"
    pub note: String,

    /// MIDI number of the nearest note
    pub midi: u8,

    /// Deviation from the nearest note in cents
    pub cents: f32,

    /// `max(0, 1 - |cents| / 50)`
    pub confidence: f32,
}

/// A timed note, as shown to a live consumer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoteEvent {
    /// Onset of the note in seconds since stream start
    pub timestamp: f64,

    /// Note name, e.g. "A4"
    pub note: String,

    /// Frequency in Hz
    pub frequency: f32,

    /// Duration in seconds
    pub duration: f64,

    /// Loudness in [0, 1]
    pub velocity: f32,

    /// Detection confidence in [0, 1]
    pub confidence: f32,
}

impl NoteEvent {
    /// Build an event from a single reading
    pub fn from_reading(reading: &PitchReading, timestamp: f64, duration: f64, velocity: f32) -> Self {
        Self {
            timestamp,
            note: reading.note.clone(),
            frequency: reading.frequency,
            duration,
            velocity: velocity.clamp(0.0, 1.0),
            confidence: reading.confidence,
        }
    }
}
