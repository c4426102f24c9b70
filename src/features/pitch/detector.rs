//! Pitch detector: amplitude gate, estimator chain, note quantization
//!
//! # Example
//!
//! ```no_run
//! use cadence_dsp::features::pitch::PitchDetector;
//! use cadence_dsp::io::AudioFrame;
//!
//! let samples: Vec<f32> = (0..44100)
//!     .map(|i| (2.0 * std::f32::consts::PI * 440.0 * i as f32 / 44100.0).sin() * 0.9)
//!     .collect();
//! let frame = AudioFrame::new(&samples, 44100)?;
//! if let Some(reading) = PitchDetector::default().detect(&frame)? {
//!     println!("{} ({:+.1} cents)", reading.note, reading.cents);
//! }
//! # Ok::<(), cadence_dsp::AnalysisError>(())
//! ```

use serde::{Deserialize, Serialize};

use super::estimator::{AutocorrelationEstimator, PitchEstimator};
use super::quantize::quantize_frequency;
use super::PitchReading;
use crate::error::AnalysisError;
use crate::io::AudioFrame;

/// Shortest frame accepted for pitch detection
pub const MIN_PITCH_SAMPLES: usize = 256;

/// Pitch detection parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PitchConfig {
    /// Volume sensitivity; frames whose mean |x| is below
    /// `sensitivity * 0.1` are ignored (default: 0.5)
    pub sensitivity: f32,

    /// Lowest detectable frequency in Hz (default: 80.0)
    pub min_frequency: f32,

    /// Highest detectable frequency in Hz (default: 2000.0)
    pub max_frequency: f32,

    /// Minimum normalized autocorrelation (default: 0.3)
    pub min_correlation: f32,
}

impl Default for PitchConfig {
    fn default() -> Self {
        Self {
            sensitivity: 0.5,
            min_frequency: 80.0,
            max_frequency: 2000.0,
            min_correlation: 0.3,
        }
    }
}

/// Monophonic pitch detector
///
/// Asks the optional model estimator first and falls back to
/// autocorrelation when the model declines.
pub struct PitchDetector {
    config: PitchConfig,
    autocorrelation: AutocorrelationEstimator,
    model: Option<Box<dyn PitchEstimator>>,
}

impl std::fmt::Debug for PitchDetector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PitchDetector")
            .field("config", &self.config)
            .field("model", &self.model.as_ref().map(|m| m.name().to_string()))
            .finish()
    }
}

impl Default for PitchDetector {
    fn default() -> Self {
        Self::new(PitchConfig::default())
    }
}

impl PitchDetector {
    /// Autocorrelation-only detector
    pub fn new(config: PitchConfig) -> Self {
        let autocorrelation = AutocorrelationEstimator {
            min_frequency: config.min_frequency,
            max_frequency: config.max_frequency,
            min_correlation: config.min_correlation,
            ..AutocorrelationEstimator::default()
        };
        Self {
            config,
            autocorrelation,
            model: None,
        }
    }

    /// Consult `model` before autocorrelation
    pub fn with_model(mut self, model: Box<dyn PitchEstimator>) -> Self {
        log::debug!("Pitch detector using model estimator '{}'", model.name());
        self.model = Some(model);
        self
    }

    /// Detection parameters
    pub fn config(&self) -> &PitchConfig {
        &self.config
    }

    /// Estimate the raw fundamental of `frame`, bypassing the amplitude gate
    pub fn estimate_frequency(&self, frame: &AudioFrame<'_>) -> Option<f32> {
        if let Some(model) = &self.model {
            if let Some(frequency) = model.estimate(frame) {
                return Some(frequency);
            }
            log::debug!("Model '{}' declined, falling back to autocorrelation", model.name());
        }
        self.autocorrelation.estimate(frame)
    }

    /// Detect the dominant pitch in `frame`
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::InvalidInput` for frames shorter than
    /// [`MIN_PITCH_SAMPLES`]. Quiet, unpitched or out-of-range frames are
    /// `Ok(None)`.
    pub fn detect(&self, frame: &AudioFrame<'_>) -> Result<Option<PitchReading>, AnalysisError> {
        if frame.len() < MIN_PITCH_SAMPLES {
            return Err(AnalysisError::InvalidInput(format!(
                "Frame too short for pitch detection: {} samples (minimum {})",
                frame.len(),
                MIN_PITCH_SAMPLES
            )));
        }

        let level = frame.mean_abs();
        let gate = self.config.sensitivity * 0.1;
        if level < gate {
            log::debug!("Mean amplitude {:.4} below gate {:.4}, no pitch", level, gate);
            return Ok(None);
        }

        Ok(self.estimate_frequency(frame).and_then(quantize_frequency))
    }
}
