//! Analysis result types

use serde::{Deserialize, Serialize};

use super::metadata::AnalysisMetadata;
use crate::features::chord::ChordFrame;

/// Complete analysis result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Smoothed chord sequence
    pub chords: Vec<ChordFrame>,

    /// Chord detections before smoothing
    pub raw_chord_count: usize,

    /// Onset times in seconds
    pub onsets: Vec<f64>,

    /// Estimated tempo, absent without enough evidence
    pub bpm: Option<f32>,

    /// Share of inter-onset intervals supporting the tempo (0.0-1.0)
    pub bpm_confidence: f32,

    /// Analysis metadata
    pub metadata: AnalysisMetadata,
}

impl AnalysisResult {
    /// Chord sounding at `time` seconds, if any
    pub fn chord_at(&self, time: f64) -> Option<&ChordFrame> {
        self.chords.iter().take_while(|frame| frame.time <= time).last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chord_at() {
        let result = AnalysisResult {
            chords: vec![ChordFrame::new(0.0, "C", 0.9), ChordFrame::new(2.0, "G", 0.8)],
            raw_chord_count: 2,
            onsets: vec![],
            bpm: None,
            bpm_confidence: 0.0,
            metadata: AnalysisMetadata::new(4.0, 44100),
        };
        assert_eq!(result.chord_at(1.0).unwrap().chord, "C");
        assert_eq!(result.chord_at(2.5).unwrap().chord, "G");
        assert!(result.chord_at(-1.0).is_none());
    }

    #[test]
    fn test_serializes_to_json() {
        let result = AnalysisResult {
            chords: vec![ChordFrame::new(0.0, "Am", 0.7)],
            raw_chord_count: 1,
            onsets: vec![0.5],
            bpm: Some(120.0),
            bpm_confidence: 0.9,
            metadata: AnalysisMetadata::new(1.0, 22050),
        };
        let json = serde_json::to_string(&result).unwrap();
        assert!(json.contains("\"chord\":\"Am\""));
        let back: AnalysisResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back, result);
    }
}
