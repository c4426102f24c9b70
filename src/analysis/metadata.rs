//! Analysis metadata structures

use serde::{Deserialize, Serialize};

/// Conditions worth surfacing alongside a result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnalysisFlag {
    /// No window produced a chord above the confidence floor
    NoChordsDetected,
    /// Too few onsets for a tempo estimate
    InsufficientOnsets,
    /// A tempo was found but less than half of the intervals support it
    AmbiguousTempo,
    /// Some analysis windows failed and were skipped
    SkippedWindows,
}

/// Analysis metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisMetadata {
    /// Audio duration in seconds
    pub duration_seconds: f64,

    /// Sample rate in Hz
    pub sample_rate: u32,

    /// Wall-clock processing time in milliseconds
    pub processing_time_ms: f32,

    /// Crate version that produced the result
    pub algorithm_version: String,

    /// Chord windows examined
    pub chord_windows: usize,

    /// Chord windows skipped after an error
    pub failed_windows: usize,

    /// Analysis flags
    pub flags: Vec<AnalysisFlag>,

    /// Human-readable notes on weak or missing results
    pub warnings: Vec<String>,
}

impl AnalysisMetadata {
    /// Metadata for `duration_seconds` of audio at `sample_rate`
    pub fn new(duration_seconds: f64, sample_rate: u32) -> Self {
        Self {
            duration_seconds,
            sample_rate,
            processing_time_ms: 0.0,
            algorithm_version: env!("CARGO_PKG_VERSION").to_string(),
            chord_windows: 0,
            failed_windows: 0,
            flags: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Record a flag with an explanation
    pub fn flag(&mut self, flag: AnalysisFlag, warning: impl Into<String>) {
        if !self.flags.contains(&flag) {
            self.flags.push(flag);
        }
        self.warnings.push(warning.into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_is_recorded_once() {
        let mut metadata = AnalysisMetadata::new(1.0, 44100);
        metadata.flag(AnalysisFlag::InsufficientOnsets, "2 onsets");
        metadata.flag(AnalysisFlag::InsufficientOnsets, "again");
        assert_eq!(metadata.flags, vec![AnalysisFlag::InsufficientOnsets]);
        assert_eq!(metadata.warnings.len(), 2);
        assert_eq!(metadata.algorithm_version, env!("CARGO_PKG_VERSION"));
    }
}
