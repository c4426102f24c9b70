//! Chord-quality templates
//!
//! Binary presence masks over 12 pitch classes, root at index 0. The table
//! order is part of the classifier's tie-break contract: on an exact score
//! tie the earlier entry wins, so do not reorder it.

use serde::{Deserialize, Serialize};

/// Supported chord qualities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChordQuality {
    /// Major triad (C-E-G)
    Major,
    /// Minor triad (C-Eb-G)
    Minor,
    /// Diminished triad (C-Eb-Gb)
    Diminished,
    /// Augmented triad (C-E-G#)
    Augmented,
    /// Suspended second (C-D-G)
    Sus2,
    /// Suspended fourth (C-F-G)
    Sus4,
    /// Dominant seventh (C-E-G-Bb)
    Dominant7,
    /// Major seventh (C-E-G-B)
    Major7,
    /// Minor seventh (C-Eb-G-Bb)
    Minor7,
}

/// A chord quality with its label suffix and pitch-class mask
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChordTemplate {
    /// Quality
    pub quality: ChordQuality,
    /// Label suffix appended to the root name ("" for major)
    pub suffix: &'static str,
    /// Presence mask relative to the root at index 0
    pub mask: [bool; 12],
}

const fn mask(intervals: &[usize]) -> [bool; 12] {
    let mut m = [false; 12];
    let mut i = 0;
    while i < intervals.len() {
        m[intervals[i]] = true;
        i += 1;
    }
    m
}

/// Template bank in fixed evaluation order
pub static CHORD_TEMPLATES: [ChordTemplate; 9] = [
    ChordTemplate { quality: ChordQuality::Major, suffix: "", mask: mask(&[0, 4, 7]) },
    ChordTemplate { quality: ChordQuality::Minor, suffix: "m", mask: mask(&[0, 3, 7]) },
    ChordTemplate { quality: ChordQuality::Diminished, suffix: "dim", mask: mask(&[0, 3, 6]) },
    ChordTemplate { quality: ChordQuality::Augmented, suffix: "aug", mask: mask(&[0, 4, 8]) },
    ChordTemplate { quality: ChordQuality::Sus2, suffix: "sus2", mask: mask(&[0, 2, 7]) },
    ChordTemplate { quality: ChordQuality::Sus4, suffix: "sus4", mask: mask(&[0, 5, 7]) },
    ChordTemplate { quality: ChordQuality::Dominant7, suffix: "7", mask: mask(&[0, 4, 7, 10]) },
    ChordTemplate { quality: ChordQuality::Major7, suffix: "maj7", mask: mask(&[0, 4, 7, 11]) },
    ChordTemplate { quality: ChordQuality::Minor7, suffix: "m7", mask: mask(&[0, 3, 7, 10]) },
];

impl ChordTemplate {
    /// Number of chord tones
    pub fn note_count(&self) -> usize {
        self.mask.iter().filter(|&&present| present).count()
    }

    /// Intervals (semitones above the root) of the chord tones, ascending
    pub fn intervals(&self) -> Vec<usize> {
        (0..12).filter(|&i| self.mask[i]).collect()
    }

    /// Whether absolute pitch class `pitch_class` is a chord tone at `root`
    pub fn contains(&self, root: usize, pitch_class: usize) -> bool {
        self.mask[(pitch_class + 12 - root % 12) % 12]
    }

    /// Absolute pitch classes of the chord at `root`, in interval order
    pub fn pitch_classes(&self, root: usize) -> Vec<usize> {
        self.intervals()
            .into_iter()
            .map(|interval| (root + interval) % 12)
            .collect()
    }
}

impl ChordQuality {
    /// Template for this quality
    pub fn template(&self) -> &'static ChordTemplate {
        CHORD_TEMPLATES
            .iter()
            .find(|t| t.quality == *self)
            .unwrap_or(&CHORD_TEMPLATES[0])
    }
}
