//! Validated view over mono PCM samples

use crate::error::AnalysisError;

/// Immutable mono audio frame plus its sample rate
///
/// Borrowed from the caller; analysis stages never mutate it. Stages that
/// need to taper the signal work on their own copy.
#[derive(Debug, Clone, Copy)]
pub struct AudioFrame<'a> {
    samples: &'a [f32],
    sample_rate: u32,
}

impl<'a> AudioFrame<'a> {
    /// Create a frame, rejecting a zero sample rate or an empty buffer
    pub fn new(samples: &'a [f32], sample_rate: u32) -> Result<Self, AnalysisError> {
        if sample_rate == 0 {
            return Err(AnalysisError::InvalidInput(
                "Invalid sample rate: 0".to_string(),
            ));
        }
        if samples.is_empty() {
            return Err(AnalysisError::InvalidInput(
                "Empty audio samples".to_string(),
            ));
        }
        Ok(Self {
            samples,
            sample_rate,
        })
    }

    /// Samples in [-1.0, 1.0]
    pub fn samples(&self) -> &'a [f32] {
        self.samples
    }

    /// Sample rate in Hz
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Number of samples
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Always false for a constructed frame
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Frame duration in seconds
    pub fn duration_seconds(&self) -> f64 {
        self.samples.len() as f64 / self.sample_rate as f64
    }

    /// Mean absolute amplitude
    pub fn mean_abs(&self) -> f32 {
        self.samples.iter().map(|s| s.abs()).sum::<f32>() / self.samples.len() as f32
    }
}
