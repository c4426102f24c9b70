//! Short-time energy onset detection
//!
//! Algorithm:
//! 1. Decimate to roughly `target_rate` by box-averaging an integer number
//!    of samples
//! 2. Compute mean-square energy over `window_ms` windows every `hop_ms`
//! 3. Flag an onset when the energy rose by more than `energy_delta` since
//!    the previous window and exceeds `energy_floor`
//! 4. Keep an onset only if it is at least `min_spacing_secs` after the last
//!    accepted one
//!
//! The onset time is the start of the window that triggered it.
//!
//! # Example
//!
//! ```no_run
//! use cadence_dsp::features::onset::OnsetDetector;
//! use cadence_dsp::io::AudioFrame;
//!
//! let samples = vec![0.0f32; 44100 * 10];
//! let frame = AudioFrame::new(&samples, 44100)?;
//! let onsets = OnsetDetector::default().detect(&frame)?;
//! println!("Found {} onsets", onsets.len());
//! # Ok::<(), cadence_dsp::AnalysisError>(())
//! ```

use serde::{Deserialize, Serialize};

use crate::error::AnalysisError;
use crate::io::AudioFrame;
use crate::preprocessing::decimate::{decimate, decimation_factor};

/// Spacing comparisons tolerate this much rounding (seconds)
const SPACING_EPSILON: f64 = 1e-9;

/// Onset detection parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OnsetConfig {
    /// Working sample rate after decimation, in Hz (default: 8000)
    pub target_rate: u32,

    /// Energy window length in milliseconds (default: 50.0)
    pub window_ms: f64,

    /// Hop between windows in milliseconds (default: 10.0)
    pub hop_ms: f64,

    /// Minimum energy rise over the previous window (default: 0.01)
    pub energy_delta: f32,

    /// Minimum absolute window energy (default: 0.05)
    pub energy_floor: f32,

    /// Minimum gap between accepted onsets in seconds (default: 0.1)
    pub min_spacing_secs: f64,
}

impl Default for OnsetConfig {
    fn default() -> Self {
        Self {
            target_rate: 8000,
            window_ms: 50.0,
            hop_ms: 10.0,
            energy_delta: 0.01,
            energy_floor: 0.05,
            min_spacing_secs: 0.1,
        }
    }
}

/// Energy-rise onset detector
#[derive(Debug, Clone, Default)]
pub struct OnsetDetector {
    config: OnsetConfig,
}

impl OnsetDetector {
    /// Create a detector with the given parameters
    pub fn new(config: OnsetConfig) -> Self {
        Self { config }
    }

    /// Detection parameters
    pub fn config(&self) -> &OnsetConfig {
        &self.config
    }

    /// Detect onset times (seconds) in `frame`
    ///
    /// The returned list is non-decreasing and respects the minimum spacing.
    /// A frame shorter than one energy window yields no onsets.
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::InvalidInput` if the window or hop is not
    /// positive.
    pub fn detect(&self, frame: &AudioFrame<'_>) -> Result<Vec<f64>, AnalysisError> {
        if !(self.config.window_ms > 0.0) || !(self.config.hop_ms > 0.0) {
            return Err(AnalysisError::InvalidInput(format!(
                "Onset window and hop must be > 0 (window={} ms, hop={} ms)",
                self.config.window_ms, self.config.hop_ms
            )));
        }

        let factor = decimation_factor(frame.sample_rate(), self.config.target_rate);
        let decimated = decimate(frame.samples(), factor);
        let rate = frame.sample_rate() as f64 / factor as f64;

        let window = ((self.config.window_ms / 1000.0 * rate).round() as usize).max(1);
        let hop = ((self.config.hop_ms / 1000.0 * rate).round() as usize).max(1);

        log::debug!(
            "Detecting onsets: {} samples decimated by {} to {:.0} Hz, window={}, hop={}",
            frame.len(),
            factor,
            rate,
            window,
            hop
        );

        if decimated.len() < window {
            log::debug!("Signal shorter than one energy window, no onsets");
            return Ok(Vec::new());
        }

        let mut onsets: Vec<f64> = Vec::new();
        let mut previous = 0.0f32;
        for start in (0..=decimated.len() - window).step_by(hop) {
            let energy = decimated[start..start + window]
                .iter()
                .map(|&x| x * x)
                .sum::<f32>()
                / window as f32;

            if energy - previous > self.config.energy_delta && energy > self.config.energy_floor {
                let time = start as f64 / rate;
                let spaced = onsets
                    .last()
                    .map_or(true, |&last| time - last + SPACING_EPSILON >= self.config.min_spacing_secs);
                if spaced {
                    onsets.push(time);
                }
            }
            previous = energy;
        }

        log::debug!("Energy onset detector found {} onsets", onsets.len());
        Ok(onsets)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Decaying kick every `60 / bpm` seconds, first kick at `offset` seconds
    fn kick_pattern(duration: f32, bpm: f32, sample_rate: u32, offset: f32) -> Vec<f32> {
        let sr = sample_rate as f32;
        let num_samples = (duration * sr) as usize;
        let mut samples = vec![0.0f32; num_samples];
        let beat_interval = (60.0 / bpm * sr) as usize;
        let kick_samples = (0.15 * sr) as usize;

        let mut pos = (offset * sr) as usize;
        while pos < num_samples {
            let end = (pos + kick_samples).min(num_samples);
            for i in pos..end {
                let t = (i - pos) as f32 / kick_samples as f32;
                samples[i] = 0.8 * (-t * 5.0).exp();
            }
            pos += beat_interval;
        }
        samples
    }

    #[test]
    fn test_one_onset_per_kick() {
        let samples = kick_pattern(6.0, 120.0, 44100, 0.25);
        let frame = AudioFrame::new(&samples, 44100).unwrap();
        let onsets = OnsetDetector::default().detect(&frame).unwrap();

        assert_eq!(onsets.len(), 12, "onsets: {:?}", onsets);
        for (n, &t) in onsets.iter().enumerate() {
            let kick = 0.25 + 0.5 * n as f64;
            // The triggering window starts shortly before the kick
            assert!(t <= kick && kick - t < 0.05, "onset {} at {} for kick at {}", n, t, kick);
        }
    }

    #[test]
    fn test_onsets_sorted_and_spaced() {
        let samples = kick_pattern(4.0, 300.0, 22050, 0.0);
        let frame = AudioFrame::new(&samples, 22050).unwrap();
        let onsets = OnsetDetector::default().detect(&frame).unwrap();
        assert!(!onsets.is_empty());
        for pair in onsets.windows(2) {
            assert!(pair[1] - pair[0] >= 0.1 - 1e-9, "too close: {:?}", pair);
        }
    }

    #[test]
    fn test_sound_at_start_is_an_onset() {
        let samples = vec![0.5f32; 8000];
        let frame = AudioFrame::new(&samples, 8000).unwrap();
        let onsets = OnsetDetector::default().detect(&frame).unwrap();
        assert_eq!(onsets, vec![0.0]);
    }

    #[test]
    fn test_silence_has_no_onsets() {
        let samples = vec![0.0f32; 44100];
        let frame = AudioFrame::new(&samples, 44100).unwrap();
        assert!(OnsetDetector::default().detect(&frame).unwrap().is_empty());
    }

    #[test]
    fn test_quiet_rise_below_floor_ignored() {
        // Mean square 0.04 stays under the 0.05 floor
        let mut samples = vec![0.0f32; 16000];
        for s in samples.iter_mut().skip(8000) {
            *s = 0.2;
        }
        let frame = AudioFrame::new(&samples, 8000).unwrap();
        assert!(OnsetDetector::default().detect(&frame).unwrap().is_empty());
    }

    #[test]
    fn test_short_signal_has_no_onsets() {
        let samples = vec![0.9f32; 100];
        let frame = AudioFrame::new(&samples, 8000).unwrap();
        assert!(OnsetDetector::default().detect(&frame).unwrap().is_empty());
    }

    #[test]
    fn test_invalid_hop() {
        let samples = vec![0.0f32; 8000];
        let frame = AudioFrame::new(&samples, 8000).unwrap();
        let detector = OnsetDetector::new(OnsetConfig {
            hop_ms: 0.0,
            ..OnsetConfig::default()
        });
        assert!(matches!(detector.detect(&frame), Err(AnalysisError::InvalidInput(_))));
    }
}
