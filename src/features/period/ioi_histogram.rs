//! Tempo from an inter-onset-interval histogram
//!
//! Algorithm:
//! 1. Intervals between consecutive onsets
//! 2. Keep intervals inside the plausible beat range `[0.3, 1.0]` s
//! 3. Histogram them with fixed 10 ms bins
//! 4. The modal bin is the beat interval; on a count tie the shorter
//!    interval wins. The representative interval is the mean of the
//!    intervals in that bin.
//! 5. `bpm = 60 / interval`, folded once by doubling then halving if it
//!    falls outside `[60, 200]`
//!
//! # Example
//!
//! ```no_run
//! use cadence_dsp::features::period::TempoEstimator;
//!
//! let onsets: Vec<f64> = (0..12).map(|i| i as f64 * 0.5).collect();
//! if let Some(bpm) = TempoEstimator::default().estimate(&onsets) {
//!     println!("{:.1} BPM", bpm);
//! }
//! ```

use serde::{Deserialize, Serialize};

use super::BpmEstimate;

/// Added to bin positions so intervals sitting on a bin edge land in the
/// upper bin despite rounding
const BIN_EPSILON: f64 = 1e-6;

/// Tempo estimation parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TempoConfig {
    /// Fewest onsets needed for an estimate (default: 4)
    pub min_onsets: usize,

    /// Shortest beat interval considered, in seconds (default: 0.3)
    pub min_interval_secs: f64,

    /// Longest beat interval considered, in seconds (default: 1.0)
    pub max_interval_secs: f64,

    /// Histogram bin width in seconds (default: 0.01)
    pub bin_width_secs: f64,

    /// Lowest reported tempo (default: 60.0)
    pub min_bpm: f32,

    /// Highest reported tempo (default: 200.0)
    pub max_bpm: f32,
}

impl Default for TempoConfig {
    fn default() -> Self {
        Self {
            min_onsets: 4,
            min_interval_secs: 0.3,
            max_interval_secs: 1.0,
            bin_width_secs: 0.01,
            min_bpm: 60.0,
            max_bpm: 200.0,
        }
    }
}

/// IOI-histogram tempo estimator
#[derive(Debug, Clone, Default)]
pub struct TempoEstimator {
    config: TempoConfig,
}

impl TempoEstimator {
    /// Create an estimator with the given parameters
    pub fn new(config: TempoConfig) -> Self {
        Self { config }
    }

    /// Estimation parameters
    pub fn config(&self) -> &TempoConfig {
        &self.config
    }

    /// Estimated tempo in BPM, or `None` without enough evidence
    pub fn estimate(&self, onsets: &[f64]) -> Option<f32> {
        self.estimate_detailed(onsets).map(|e| e.bpm)
    }

    /// Estimated tempo with the fraction of intervals supporting it
    pub fn estimate_detailed(&self, onsets: &[f64]) -> Option<BpmEstimate> {
        let cfg = &self.config;
        if onsets.len() < cfg.min_onsets {
            log::debug!("{} onsets, need {} for tempo", onsets.len(), cfg.min_onsets);
            return None;
        }
        if !(cfg.bin_width_secs > 0.0) || cfg.max_interval_secs < cfg.min_interval_secs {
            log::warn!("Invalid tempo histogram range, no tempo");
            return None;
        }

        let intervals: Vec<f64> = onsets
            .windows(2)
            .map(|w| w[1] - w[0])
            .filter(|ioi| (cfg.min_interval_secs..=cfg.max_interval_secs).contains(ioi))
            .collect();
        if intervals.is_empty() {
            log::debug!("No inter-onset intervals in the beat range");
            return None;
        }

        let num_bins = ((cfg.max_interval_secs - cfg.min_interval_secs) / cfg.bin_width_secs).floor() as usize + 1;
        let mut counts = vec![0usize; num_bins];
        let mut sums = vec![0.0f64; num_bins];
        for &ioi in &intervals {
            let bin = (((ioi - cfg.min_interval_secs) / cfg.bin_width_secs + BIN_EPSILON).floor() as usize).min(num_bins - 1);
            counts[bin] += 1;
            sums[bin] += ioi;
        }

        // Ascending scan with strict > keeps the shorter interval on ties
        let mut modal = 0usize;
        for bin in 1..num_bins {
            if counts[bin] > counts[modal] {
                modal = bin;
            }
        }
        let interval = sums[modal] / counts[modal] as f64;
        let raw_bpm = (60.0 / interval) as f32;

        let bpm = fold_into_range(raw_bpm, cfg.min_bpm, cfg.max_bpm)?;
        let confidence = counts[modal] as f32 / intervals.len() as f32;

        log::debug!(
            "Tempo: modal interval {:.4} s ({} of {} IOIs) -> {:.2} BPM",
            interval,
            counts[modal],
            intervals.len(),
            bpm
        );

        Some(BpmEstimate {
            bpm,
            confidence,
            interval_secs: interval,
        })
    }
}

/// Bring `bpm` into `[min, max]` by one doubling, else one halving
fn fold_into_range(bpm: f32, min: f32, max: f32) -> Option<f32> {
    let in_range = |b: f32| (min..=max).contains(&b);
    if in_range(bpm) {
        Some(bpm)
    } else if in_range(bpm * 2.0) {
        Some(bpm * 2.0)
    } else if in_range(bpm / 2.0) {
        Some(bpm / 2.0)
    } else {
        None
    }
}
