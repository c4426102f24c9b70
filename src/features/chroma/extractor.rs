//! Chroma vector extraction
//!
//! Converts one analysis window to a 12-element chroma vector.
//!
//! # Algorithm
//!
//! 1. Copy the used portion of the frame and apply a Hann taper
//! 2. For each pitch class and each octave in the working range, compute the
//!    equal-tempered target `C0 * 2^((octave*12 + pc)/12)`; skip targets
//!    outside the working band
//! 3. Project the windowed signal onto a sinusoid at exactly that frequency
//!    (a single Goertzel bin at the fractional index `f * N / sr`)
//! 4. Average the magnitudes across the octaves that survived
//! 5. Normalize by the maximum bin
//!
//! Working on exact target frequencies instead of FFT bins avoids the bin
//! mapping problem at low frequencies, where one FFT bin spans several
//! semitones.
//!
//! # Example
//!
//! ```no_run
//! use cadence_dsp::features::chroma::ChromaExtractor;
//! use cadence_dsp::io::AudioFrame;
//!
//! let samples = vec![0.0f32; 8192];
//! let frame = AudioFrame::new(&samples, 44100)?;
//! let chroma = ChromaExtractor::default().extract(&frame)?;
//! println!("C energy: {:.2}", chroma[0]);
//! # Ok::<(), cadence_dsp::AnalysisError>(())
//! ```

use serde::{Deserialize, Serialize};

use super::normalization::normalize_by_max;
use super::window::apply_hann;
use super::Chromagram;
use crate::error::AnalysisError;
use crate::features::tuning::note_frequency;
use crate::io::AudioFrame;

/// Shortest frame accepted for chroma extraction
pub const MIN_CHROMA_SAMPLES: usize = 1024;

/// Chroma extraction parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChromaConfig {
    /// Lowest target frequency in Hz (default: 80.0)
    pub min_frequency: f32,

    /// Highest target frequency in Hz (default: 1200.0)
    pub max_frequency: f32,

    /// First octave examined (default: 2)
    pub min_octave: i32,

    /// Last octave examined, inclusive (default: 5)
    pub max_octave: i32,

    /// Longest prefix of a frame that is analyzed (default: 16384 samples)
    pub max_window_samples: usize,
}

impl Default for ChromaConfig {
    fn default() -> Self {
        Self {
            min_frequency: 80.0,
            max_frequency: 1200.0,
            min_octave: 2,
            max_octave: 5,
            max_window_samples: 16384,
        }
    }
}

/// Chroma extractor over equal-tempered target frequencies
#[derive(Debug, Clone, Default)]
pub struct ChromaExtractor {
    config: ChromaConfig,
}

impl ChromaExtractor {
    /// Create an extractor with the given parameters
    pub fn new(config: ChromaConfig) -> Self {
        Self { config }
    }

    /// Extraction parameters
    pub fn config(&self) -> &ChromaConfig {
        &self.config
    }

    /// Extract a normalized chromagram from one frame
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::InvalidInput` if the frame is shorter than
    /// [`MIN_CHROMA_SAMPLES`]. Silence is not an error: it yields all zeros.
    pub fn extract(&self, frame: &AudioFrame<'_>) -> Result<Chromagram, AnalysisError> {
        if frame.len() < MIN_CHROMA_SAMPLES {
            return Err(AnalysisError::InvalidInput(format!(
                "Frame too short for chroma extraction: {} samples (minimum {})",
                frame.len(),
                MIN_CHROMA_SAMPLES
            )));
        }

        let used = frame.len().min(self.config.max_window_samples.max(MIN_CHROMA_SAMPLES));
        let windowed = apply_hann(&frame.samples()[..used]);
        let sample_rate = frame.sample_rate() as f32;
        let nyquist = sample_rate / 2.0;

        let mut bins = [0.0f32; 12];
        for (pitch_class, bin) in bins.iter_mut().enumerate() {
            let mut sum = 0.0f32;
            let mut count = 0usize;
            for octave in self.config.min_octave..=self.config.max_octave {
                let target = note_frequency(pitch_class, octave);
                if target < self.config.min_frequency
                    || target > self.config.max_frequency
                    || target >= nyquist
                {
                    continue;
                }
                sum += projection_magnitude(&windowed, target, sample_rate);
                count += 1;
            }
            if count > 0 {
                *bin = sum / count as f32;
            }
        }

        normalize_by_max(&mut bins);

        log::debug!(
            "Chroma over {} samples at {} Hz: {:?}",
            used,
            frame.sample_rate(),
            bins
        );

        Ok(Chromagram(bins))
    }
}

/// Magnitude of the signal's projection onto a sinusoid at `frequency`
///
/// Goertzel recurrence at the fractional bin `frequency * N / sample_rate`.
/// The returned magnitude equals `|sum x[n] * exp(-2*pi*i*bin*n/N)|`.
pub fn projection_magnitude(samples: &[f32], frequency: f32, sample_rate: f32) -> f32 {
    let omega = 2.0 * std::f64::consts::PI * frequency as f64 / sample_rate as f64;
    let coeff = 2.0 * omega.cos();

    let mut s_prev = 0.0f64;
    let mut s_prev2 = 0.0f64;
    for &x in samples {
        let s = x as f64 + coeff * s_prev - s_prev2;
        s_prev2 = s_prev;
        s_prev = s;
    }

    let power = s_prev * s_prev + s_prev2 * s_prev2 - coeff * s_prev * s_prev2;
    power.max(0.0).sqrt() as f32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::tuning::note_frequency;

    fn sine_mix(freqs: &[f32], sample_rate: f32, len: usize, amplitude: f32) -> Vec<f32> {
        (0..len)
            .map(|i| {
                let t = i as f32 / sample_rate;
                freqs
                    .iter()
                    .map(|f| amplitude * (2.0 * std::f32::consts::PI * f * t).sin())
                    .sum::<f32>()
            })
            .collect()
    }

    fn direct_projection(samples: &[f32], frequency: f32, sample_rate: f32) -> f32 {
        let n = samples.len() as f64;
        let bin = frequency as f64 * n / sample_rate as f64;
        let (mut re, mut im) = (0.0f64, 0.0f64);
        for (i, &x) in samples.iter().enumerate() {
            let phase = -2.0 * std::f64::consts::PI * bin * i as f64 / n;
            re += x as f64 * phase.cos();
            im += x as f64 * phase.sin();
        }
        (re * re + im * im).sqrt() as f32
    }

    #[test]
    fn test_goertzel_matches_direct_projection() {
        let samples = sine_mix(&[220.0, 331.0], 8000.0, 2048, 0.4);
        for &f in &[220.0f32, 261.63, 331.0, 500.0] {
            let goertzel = projection_magnitude(&samples, f, 8000.0);
            let direct = direct_projection(&samples, f, 8000.0);
            assert!(
                (goertzel - direct).abs() <= 1e-3 * direct.max(1.0),
                "{} Hz: goertzel {} vs direct {}",
                f,
                goertzel,
                direct
            );
        }
    }

    #[test]
    fn test_chroma_single_note() {
        let a4 = note_frequency(9, 4);
        let samples = sine_mix(&[a4], 44100.0, 8192, 0.5);
        let frame = AudioFrame::new(&samples, 44100).unwrap();
        let chroma = ChromaExtractor::default().extract(&frame).unwrap();

        assert_eq!(chroma[9], 1.0, "A should be the strongest bin: {:?}", chroma);
        for pc in (0..12).filter(|&pc| pc != 9) {
            assert!(chroma[pc] < 0.1, "bin {} too strong: {:?}", pc, chroma);
        }
    }

    #[test]
    fn test_chroma_c_major_triad() {
        let freqs = [note_frequency(0, 4), note_frequency(4, 4), note_frequency(7, 4)];
        let samples = sine_mix(&freqs, 44100.0, 8192, 0.3);
        let frame = AudioFrame::new(&samples, 44100).unwrap();
        let chroma = ChromaExtractor::default().extract(&frame).unwrap();

        for pc in [0usize, 4, 7] {
            assert!(chroma[pc] > 0.5, "chord tone {} weak: {:?}", pc, chroma);
        }
        for pc in [1usize, 2, 3, 5, 6, 8, 9, 10, 11] {
            assert!(chroma[pc] < 0.1, "non-chord bin {} strong: {:?}", pc, chroma);
        }
    }

    #[test]
    fn test_chroma_values_in_unit_range() {
        let samples = sine_mix(&[110.0, 196.0, 523.25, 987.77], 22050.0, 4096, 0.2);
        let frame = AudioFrame::new(&samples, 22050).unwrap();
        let chroma = ChromaExtractor::default().extract(&frame).unwrap();
        assert!(chroma.bins().iter().all(|&v| (0.0..=1.0).contains(&v)));
        assert!(chroma.bins().iter().any(|&v| v == 1.0));
    }

    #[test]
    fn test_chroma_silence_is_zero() {
        let samples = vec![0.0f32; 4096];
        let frame = AudioFrame::new(&samples, 44100).unwrap();
        let chroma = ChromaExtractor::default().extract(&frame).unwrap();
        assert_eq!(chroma, Chromagram::zeros());
    }

    #[test]
    fn test_chroma_too_short() {
        let samples = vec![0.1f32; MIN_CHROMA_SAMPLES - 1];
        let frame = AudioFrame::new(&samples, 44100).unwrap();
        let result = ChromaExtractor::default().extract(&frame);
        assert!(matches!(result, Err(AnalysisError::InvalidInput(_))));
    }

    #[test]
    fn test_frame_is_not_mutated() {
        let samples = vec![0.25f32; 2048];
        let frame = AudioFrame::new(&samples, 44100).unwrap();
        let _ = ChromaExtractor::default().extract(&frame).unwrap();
        assert!(samples.iter().all(|&s| s == 0.25));
    }
}
