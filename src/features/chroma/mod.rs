//! Chroma extraction modules
//!
//! Extract the pitch-class distribution (12 semitones) of one analysis window:
//! - Hann windowing
//! - Narrowband projection at each equal-tempered target frequency
//! - Max normalization

pub mod extractor;
pub mod normalization;
pub mod window;

pub use extractor::{ChromaConfig, ChromaExtractor, MIN_CHROMA_SAMPLES};

use serde::{Deserialize, Serialize};

/// 12-bin pitch-class energy vector, index 0 = C ... 11 = B
///
/// After extraction every value lies in [0, 1] and the strongest bin is 1.0
/// (or everything is zero for silence).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Chromagram(pub [f32; 12]);

impl Chromagram {
    /// All-zero chromagram
    pub fn zeros() -> Self {
        Self([0.0; 12])
    }

    /// Build a chromagram with `value` at each listed pitch class
    pub fn from_pitch_classes(pitch_classes: &[usize], value: f32) -> Self {
        let mut bins = [0.0f32; 12];
        for &pc in pitch_classes {
            bins[pc % 12] = value;
        }
        Self(bins)
    }

    /// Bin values
    pub fn bins(&self) -> &[f32; 12] {
        &self.0
    }

    /// Sum of all bins
    pub fn total_energy(&self) -> f32 {
        self.0.iter().sum()
    }

    /// Number of bins strictly above `threshold`
    pub fn active_count(&self, threshold: f32) -> usize {
        self.0.iter().filter(|&&v| v > threshold).count()
    }
}

impl std::ops::Index<usize> for Chromagram {
    type Output = f32;

    fn index(&self, pitch_class: usize) -> &f32 {
        &self.0[pitch_class]
    }
}
