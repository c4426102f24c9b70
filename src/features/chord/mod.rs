//! Chord recognition modules
//!
//! - Chord-quality templates over 12 pitch classes
//! - Template-matching classifier for single chroma vectors
//! - Temporal smoothing of the resulting chord-frame stream

pub mod classifier;
pub mod smoother;
pub mod templates;

pub use classifier::{ChordClassifier, ClassifierConfig};
pub use smoother::{smooth_chords, SmoothingConfig};
pub use templates::{ChordQuality, ChordTemplate, CHORD_TEMPLATES};

use serde::{Deserialize, Serialize};

/// Best template match for one chroma vector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChordResult {
    /// Root name plus quality suffix, e.g. "C", "F#m", "G7"
    pub label: String,

    /// Root pitch class (0 = C)
    pub root: usize,

    /// Chord quality
    pub quality: ChordQuality,

    /// Match score clamped to [0, 1]
    pub confidence: f32,

    /// Member pitch-class names in template order, e.g. ["C", "E", "G"]
    pub notes: Vec<String>,
}

/// One timed chord observation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChordFrame {
    /// Seconds since stream start
    pub time: f64,

    /// Chord label
    pub chord: String,

    /// Confidence in [0, 1]
    pub confidence: f32,
}

impl ChordFrame {
    /// Create a chord frame
    pub fn new(time: f64, chord: impl Into<String>, confidence: f32) -> Self {
        Self {
            time,
            chord: chord.into(),
            confidence,
        }
    }

    /// Frame for a classifier result observed at `time`
    pub fn from_result(time: f64, result: &ChordResult) -> Self {
        Self::new(time, result.label.clone(), result.confidence)
    }
}
