//! Fundamental-frequency estimators
//!
//! [`PitchEstimator`] is the seam for alternative estimators (for example a
//! pretrained frequency model). The detector asks an optional model first and
//! falls back to [`AutocorrelationEstimator`] when the model declines.

use crate::io::AudioFrame;

/// Frame + sample rate to an optional fundamental frequency
pub trait PitchEstimator: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &str;

    /// Estimate the fundamental of `frame` in Hz, or `None` to decline
    fn estimate(&self, frame: &AudioFrame<'_>) -> Option<f32>;
}

/// Time-domain autocorrelation estimator
///
/// For each lag `p` whose frequency `sr / p` lies in the search range:
///
/// ```text
/// r(p) = sum x[i] * x[i + p] / (N - p)
/// ```
///
/// The global maximum must exceed `min_correlation`. The reported period is
/// the shortest lag that is a local peak holding at least `peak_ratio` of
/// that maximum: a pure tone correlates almost equally well at every
/// multiple of its period, and the first strong peak is the fundamental.
#[derive(Debug, Clone)]
pub struct AutocorrelationEstimator {
    /// Lowest detectable frequency in Hz (default: 80.0)
    pub min_frequency: f32,
    /// Highest detectable frequency in Hz (default: 2000.0)
    pub max_frequency: f32,
    /// Minimum normalized correlation at the best lag (default: 0.3)
    pub min_correlation: f32,
    /// Fraction of the global maximum a shorter peak needs (default: 0.9)
    pub peak_ratio: f32,
}

impl Default for AutocorrelationEstimator {
    fn default() -> Self {
        Self {
            min_frequency: 80.0,
            max_frequency: 2000.0,
            min_correlation: 0.3,
            peak_ratio: 0.9,
        }
    }
}

impl AutocorrelationEstimator {
    /// Lag range `[min, max]` in samples for this sample rate and frame length
    pub fn lag_range(&self, sample_rate: u32, frame_len: usize) -> Option<(usize, usize)> {
        let sr = sample_rate as f32;
        let min_lag = ((sr / self.max_frequency).ceil() as usize).max(1);
        let max_lag = ((sr / self.min_frequency).floor() as usize).min(frame_len / 2);
        if min_lag > max_lag {
            return None;
        }
        Some((min_lag, max_lag))
    }

    /// Normalized autocorrelation for every lag in `[min_lag, max_lag]`
    ///
    /// Lags at or beyond `samples.len()` have no overlap and are left out,
    /// so the result may be shorter than the requested range (or empty).
    pub fn correlations(samples: &[f32], min_lag: usize, max_lag: usize) -> Vec<f32> {
        let n = samples.len();
        let max_lag = max_lag.min(n.saturating_sub(1));
        if n == 0 || min_lag > max_lag {
            return Vec::new();
        }
        (min_lag..=max_lag)
            .map(|lag| {
                let sum: f32 = samples[..n - lag]
                    .iter()
                    .zip(&samples[lag..])
                    .map(|(a, b)| a * b)
                    .sum();
                sum / (n - lag) as f32
            })
            .collect()
    }
}

impl PitchEstimator for AutocorrelationEstimator {
    fn name(&self) -> &str {
        "autocorrelation"
    }

    fn estimate(&self, frame: &AudioFrame<'_>) -> Option<f32> {
        let (min_lag, max_lag) = self.lag_range(frame.sample_rate(), frame.len())?;
        let acf = Self::correlations(frame.samples(), min_lag, max_lag);

        let (best_idx, best) = acf
            .iter()
            .copied()
            .enumerate()
            .fold((0usize, f32::NEG_INFINITY), |acc, (i, v)| if v > acc.1 { (i, v) } else { acc });

        if best <= self.min_correlation {
            log::debug!(
                "Autocorrelation peak {:.3} at or below {:.3}, no pitch",
                best,
                self.min_correlation
            );
            return None;
        }

        // Shortest interior peak close to the global maximum
        let floor = best * self.peak_ratio;
        let chosen = (1..acf.len().saturating_sub(1))
            .find(|&i| acf[i] >= floor && acf[i] >= acf[i - 1] && acf[i] >= acf[i + 1])
            .unwrap_or(best_idx);

        let period = min_lag + chosen;
        let frequency = frame.sample_rate() as f32 / period as f32;

        log::debug!(
            "Autocorrelation: period={} samples ({:.2} Hz), r={:.3}, global max={:.3} at {}",
            period,
            frequency,
            acf[chosen],
            best,
            min_lag + best_idx
        );

        Some(frequency)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sine(freq: f32, sample_rate: u32, len: usize, amplitude: f32) -> Vec<f32> {
        (0..len)
            .map(|i| amplitude * (2.0 * std::f32::consts::PI * freq * i as f32 / sample_rate as f32).sin())
            .collect()
    }

    #[test]
    fn test_lag_range() {
        let est = AutocorrelationEstimator::default();
        assert_eq!(est.lag_range(44100, 44100), Some((23, 551)));
        // Frame length caps the longest lag
        assert_eq!(est.lag_range(44100, 600), Some((23, 300)));
        assert_eq!(est.lag_range(44100, 40), None);
    }

    #[test]
    fn test_estimate_sine() {
        let samples = sine(220.0, 22050, 4096, 0.9);
        let frame = AudioFrame::new(&samples, 22050).unwrap();
        let f = AutocorrelationEstimator::default().estimate(&frame).unwrap();
        assert!((f - 220.0).abs() / 220.0 < 0.01, "got {}", f);
    }

    #[test]
    fn test_prefers_fundamental_over_multiples() {
        // Period 100.23 samples: lag 401 (4 periods) lines up better than lag
        // 100, but the fundamental must still win
        let samples = sine(440.0, 44100, 44100, 0.9);
        let frame = AudioFrame::new(&samples, 44100).unwrap();
        let f = AutocorrelationEstimator::default().estimate(&frame).unwrap();
        assert!((f - 441.0).abs() < 0.5, "got {}", f);
    }

    #[test]
    fn test_quiet_signal_declines() {
        // r(p) ~ A^2 / 2 = 0.02, well under the correlation floor
        let samples = sine(220.0, 22050, 4096, 0.2);
        let frame = AudioFrame::new(&samples, 22050).unwrap();
        assert!(AutocorrelationEstimator::default().estimate(&frame).is_none());
    }

    #[test]
    fn test_silence_declines() {
        let samples = vec![0.0f32; 4096];
        let frame = AudioFrame::new(&samples, 44100).unwrap();
        assert!(AutocorrelationEstimator::default().estimate(&frame).is_none());
    }

    #[test]
    fn test_correlations_clamp_lags_to_slice() {
        let samples = [1.0f32, 0.5, -0.5, -1.0];
        // Lags 4 and 5 have no overlap and are dropped
        let acf = AutocorrelationEstimator::correlations(&samples, 2, 5);
        assert_eq!(acf.len(), 2);
        assert!((acf[0] - (-0.5 - 0.5) / 2.0).abs() < 1e-6, "r(2) = {}", acf[0]);
        assert!((acf[1] - (-1.0)).abs() < 1e-6, "r(3) = {}", acf[1]);

        assert!(AutocorrelationEstimator::correlations(&samples, 6, 9).is_empty());
        assert!(AutocorrelationEstimator::correlations(&[], 1, 3).is_empty());
    }
}
