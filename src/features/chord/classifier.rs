//! Chord classification by template matching
//!
//! Scores a chroma vector against every (root, quality) pair:
//!
//! ```text
//! score = (sum of chroma over chord tones - 0.2 * sum over non-chord tones) / note_count
//! ```
//!
//! # Tie-break
//!
//! Roots are enumerated 0..12 in the outer loop and qualities in
//! [`CHORD_TEMPLATES`] order in the inner loop. A candidate replaces the
//! current best only when its score is strictly greater, so on an exact tie
//! the first enumerated pair wins. Symmetric chords depend on this: an
//! augmented triad on E scores the same as on C and G#, and is reported as
//! "Caug".

use serde::{Deserialize, Serialize};

use super::templates::{ChordTemplate, CHORD_TEMPLATES};
use super::ChordResult;
use crate::features::chroma::Chromagram;
use crate::features::tuning::pitch_class_name;

/// Classifier thresholds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Minimum summed chroma energy (default: 0.3)
    pub min_total_energy: f32,

    /// A bin counts as active above this value (default: 0.1)
    pub active_threshold: f32,

    /// Fewest active pitch classes accepted (default: 2)
    pub min_active: usize,

    /// Most active pitch classes accepted (default: 8)
    pub max_active: usize,

    /// Penalty weight for energy outside the template (default: 0.2)
    pub absent_penalty: f32,

    /// Best scores below this are rejected (default: 0.25)
    pub min_score: f32,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            min_total_energy: 0.3,
            active_threshold: 0.1,
            min_active: 2,
            max_active: 8,
            absent_penalty: 0.2,
            min_score: 0.25,
        }
    }
}

/// Template-matching chord classifier
#[derive(Debug, Clone, Default)]
pub struct ChordClassifier {
    config: ClassifierConfig,
}

impl ChordClassifier {
    /// Create a classifier with the given thresholds
    pub fn new(config: ClassifierConfig) -> Self {
        Self { config }
    }

    /// Classifier thresholds
    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// Classify one chroma vector
    ///
    /// Returns `None` for silence, for too few or too many active pitch
    /// classes, and when no template reaches the score floor.
    pub fn classify(&self, chroma: &Chromagram) -> Option<ChordResult> {
        let total = chroma.total_energy();
        if total < self.config.min_total_energy {
            log::debug!("Chroma energy {:.3} below gate, no chord", total);
            return None;
        }

        let active = chroma.active_count(self.config.active_threshold);
        if active < self.config.min_active || active > self.config.max_active {
            log::debug!("{} active pitch classes outside [{}, {}], no chord",
                active, self.config.min_active, self.config.max_active);
            return None;
        }

        let mut best: Option<(usize, &ChordTemplate, f32)> = None;
        for root in 0..12 {
            for template in CHORD_TEMPLATES.iter() {
                let score = self.score(chroma, root, template);
                let better = match best {
                    None => true,
                    Some((_, _, best_score)) => score > best_score,
                };
                if better {
                    best = Some((root, template, score));
                }
            }
        }

        let (root, template, score) = best?;
        if score < self.config.min_score {
            log::debug!("Best chord score {:.3} below floor, no chord", score);
            return None;
        }

        Some(ChordResult {
            label: format!("{}{}", pitch_class_name(root), template.suffix),
            root,
            quality: template.quality,
            confidence: score.clamp(0.0, 1.0),
            notes: template
                .pitch_classes(root)
                .into_iter()
                .map(|pc| pitch_class_name(pc).to_string())
                .collect(),
        })
    }

    /// Template score of `chroma` for `template` rotated to `root`
    pub fn score(&self, chroma: &Chromagram, root: usize, template: &ChordTemplate) -> f32 {
        let mut present = 0.0f32;
        let mut absent = 0.0f32;
        for pc in 0..12 {
            if template.contains(root, pc) {
                present += chroma[pc];
            } else {
                absent += chroma[pc];
            }
        }
        (present - self.config.absent_penalty * absent) / template.note_count() as f32
    }
}
