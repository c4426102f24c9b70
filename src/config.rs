//! Configuration parameters for audio analysis
//!
//! [`AnalysisConfig`] groups the per-stage settings. Every field has a
//! default, so a TOML document only needs the values it changes:
//!
//! ```
//! use cadence_dsp::AnalysisConfig;
//!
//! let config = AnalysisConfig::from_toml_str(
//!     r#"
//!     [chords]
//!     window_ms = 400.0
//!
//!     [tempo]
//!     max_bpm = 180.0
//!     "#,
//! )?;
//! assert_eq!(config.chords.window_ms, 400.0);
//! assert_eq!(config.chords.hop_ms, 250.0);
//! # Ok::<(), cadence_dsp::AnalysisError>(())
//! ```

use serde::{Deserialize, Serialize};

use crate::analysis::batch::{ChordAnalysisConfig, ChordAnalyzer};
use crate::analysis::streaming::StreamingChordAnalyzer;
use crate::error::AnalysisError;
use crate::features::chord::{ChordClassifier, ClassifierConfig, SmoothingConfig};
use crate::features::chroma::{ChromaConfig, ChromaExtractor, MIN_CHROMA_SAMPLES};
use crate::features::onset::{OnsetConfig, OnsetDetector};
use crate::features::period::{TempoConfig, TempoEstimator};
use crate::features::pitch::{PitchConfig, PitchDetector};

/// Analysis configuration parameters
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Chroma extraction
    pub chroma: ChromaConfig,

    /// Chord classification thresholds
    pub classifier: ClassifierConfig,

    /// Chord smoothing
    pub smoothing: SmoothingConfig,

    /// Batch chord windowing
    pub chords: ChordAnalysisConfig,

    /// Pitch detection, used by [`AnalysisConfig::pitch_detector`]
    /// (`analyze_audio` does not track pitch)
    pub pitch: PitchConfig,

    /// Onset detection
    pub onset: OnsetConfig,

    /// Tempo estimation
    pub tempo: TempoConfig,
}

fn check(ok: bool, message: impl FnOnce() -> String) -> Result<(), AnalysisError> {
    if ok {
        Ok(())
    } else {
        Err(AnalysisError::Config(message()))
    }
}

impl AnalysisConfig {
    /// Parse and validate a TOML document
    ///
    /// # Errors
    ///
    /// `AnalysisError::Config` for malformed TOML or out-of-range values.
    pub fn from_toml_str(source: &str) -> Result<Self, AnalysisError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Render as a TOML document
    ///
    /// # Errors
    ///
    /// `AnalysisError::Config` if serialization fails.
    pub fn to_toml_string(&self) -> Result<String, AnalysisError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Batch chord analyzer using the chroma, classifier, smoothing and
    /// windowing sections
    pub fn chord_analyzer(&self) -> ChordAnalyzer {
        ChordAnalyzer::new(self.chords.clone())
            .with_extractor(ChromaExtractor::new(self.chroma.clone()))
            .with_classifier(ChordClassifier::new(self.classifier.clone()))
            .with_smoothing(self.smoothing.clone())
    }

    /// Per-block chord analyzer with the same thresholds as the batch path
    pub fn streaming_analyzer(&self) -> StreamingChordAnalyzer {
        StreamingChordAnalyzer::new(
            ChromaExtractor::new(self.chroma.clone()),
            ChordClassifier::new(self.classifier.clone()),
            self.chords.min_confidence,
        )
        .with_smoothing(self.smoothing.clone())
    }

    /// Pitch detector from the `[pitch]` section
    pub fn pitch_detector(&self) -> PitchDetector {
        PitchDetector::new(self.pitch.clone())
    }

    /// Onset detector from the `[onset]` section
    pub fn onset_detector(&self) -> OnsetDetector {
        OnsetDetector::new(self.onset.clone())
    }

    /// Tempo estimator from the `[tempo]` section
    pub fn tempo_estimator(&self) -> TempoEstimator {
        TempoEstimator::new(self.tempo.clone())
    }

    /// Check every stage's parameters for consistency
    ///
    /// # Errors
    ///
    /// `AnalysisError::Config` naming the first offending field.
    pub fn validate(&self) -> Result<(), AnalysisError> {
        let c = &self.chroma;
        check(c.min_frequency > 0.0 && c.min_frequency < c.max_frequency, || {
            format!(
                "chroma: frequency band [{}, {}] Hz is empty",
                c.min_frequency, c.max_frequency
            )
        })?;
        check(c.min_octave <= c.max_octave, || {
            format!("chroma: min_octave {} > max_octave {}", c.min_octave, c.max_octave)
        })?;
        check(c.max_window_samples >= MIN_CHROMA_SAMPLES, || {
            format!(
                "chroma: max_window_samples {} below minimum {}",
                c.max_window_samples, MIN_CHROMA_SAMPLES
            )
        })?;

        let k = &self.classifier;
        check(k.min_active <= k.max_active && k.max_active <= 12, || {
            format!("classifier: active range [{}, {}] invalid", k.min_active, k.max_active)
        })?;
        check(k.absent_penalty >= 0.0 && k.min_score.is_finite(), || {
            "classifier: absent_penalty must be >= 0 and min_score finite".to_string()
        })?;

        let s = &self.smoothing;
        check(s.min_duration_secs >= 0.0 && s.majority_window >= 1, || {
            "smoothing: min_duration_secs must be >= 0 and majority_window >= 1".to_string()
        })?;
        check(s.window_ms.map_or(true, |ms| ms > 0.0), || {
            "smoothing: window_ms must be > 0 when set".to_string()
        })?;

        let w = &self.chords;
        check(w.window_ms > 0.0 && w.hop_ms > 0.0, || {
            format!("chords: window_ms {} and hop_ms {} must be > 0", w.window_ms, w.hop_ms)
        })?;
        check((0.0..=1.0).contains(&w.min_confidence), || {
            format!("chords: min_confidence {} outside [0, 1]", w.min_confidence)
        })?;

        let p = &self.pitch;
        check(p.sensitivity >= 0.0, || {
            format!("pitch: sensitivity {} must be >= 0", p.sensitivity)
        })?;
        check(p.min_frequency > 0.0 && p.min_frequency < p.max_frequency, || {
            format!(
                "pitch: frequency range [{}, {}] Hz is empty",
                p.min_frequency, p.max_frequency
            )
        })?;

        let o = &self.onset;
        check(o.target_rate > 0 && o.window_ms > 0.0 && o.hop_ms > 0.0, || {
            "onset: target_rate, window_ms and hop_ms must be > 0".to_string()
        })?;
        check(o.min_spacing_secs >= 0.0, || {
            "onset: min_spacing_secs must be >= 0".to_string()
        })?;

        let t = &self.tempo;
        check(t.bin_width_secs > 0.0 && t.min_interval_secs <= t.max_interval_secs, || {
            format!(
                "tempo: interval range [{}, {}] s with bin width {} is invalid",
                t.min_interval_secs, t.max_interval_secs, t.bin_width_secs
            )
        })?;
        check(t.min_bpm > 0.0 && t.min_bpm <= t.max_bpm, || {
            format!("tempo: bpm range [{}, {}] invalid", t.min_bpm, t.max_bpm)
        })?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(AnalysisConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = AnalysisConfig::from_toml_str(
            r#"
            [pitch]
            sensitivity = 0.8

            [smoothing]
            window_ms = 600.0
            "#,
        )
        .unwrap();
        assert_eq!(config.pitch.sensitivity, 0.8);
        assert_eq!(config.pitch.min_frequency, 80.0);
        assert_eq!(config.smoothing.window_ms, Some(600.0));
        assert_eq!(config.classifier, ClassifierConfig::default());
    }

    #[test]
    fn test_toml_round_trip() {
        let mut config = AnalysisConfig::default();
        config.tempo.max_bpm = 180.0;
        config.chords.hop_ms = 125.0;
        let text = config.to_toml_string().unwrap();
        assert_eq!(AnalysisConfig::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn test_malformed_toml_is_config_error() {
        let err = AnalysisConfig::from_toml_str("[chords\nwindow_ms = ").unwrap_err();
        assert!(matches!(err, AnalysisError::Config(_)));
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let mut config = AnalysisConfig::default();
        config.chords.hop_ms = 0.0;
        assert!(matches!(config.validate(), Err(AnalysisError::Config(_))));

        let mut config = AnalysisConfig::default();
        config.classifier.min_active = 9;
        assert!(config.validate().is_err());

        let mut config = AnalysisConfig::default();
        config.tempo.min_bpm = 250.0;
        assert!(config.validate().is_err());

        let err = AnalysisConfig::from_toml_str("[chroma]\nmin_octave = 6").unwrap_err();
        assert!(matches!(err, AnalysisError::Config(msg) if msg.contains("min_octave")));
    }

    #[test]
    fn test_pitch_section_drives_detector() {
        let config = AnalysisConfig::from_toml_str(
            r#"
            [pitch]
            sensitivity = 0.8
            min_frequency = 100.0
            "#,
        )
        .unwrap();
        let detector = config.pitch_detector();
        assert_eq!(detector.config().sensitivity, 0.8);
        assert_eq!(detector.config().min_frequency, 100.0);

        // Gate is 0.08: a sine with mean |x| ~ 0.064 reads as silence
        let samples: Vec<f32> = (0..4096)
            .map(|i| 0.1 * (2.0 * std::f32::consts::PI * 440.0 * i as f32 / 44100.0).sin())
            .collect();
        let frame = crate::io::AudioFrame::new(&samples, 44100).unwrap();
        assert!(detector.detect(&frame).unwrap().is_none());
    }

    #[test]
    fn test_stage_constructors_follow_sections() {
        let mut config = AnalysisConfig::default();
        config.chords.hop_ms = 125.0;
        config.onset.min_spacing_secs = 0.2;
        config.tempo.max_bpm = 180.0;

        assert_eq!(config.chord_analyzer().config().hop_ms, 125.0);
        assert_eq!(config.onset_detector().config().min_spacing_secs, 0.2);
        assert_eq!(config.tempo_estimator().config().max_bpm, 180.0);
    }
}
