//! Temporal smoothing of chord-frame streams
//!
//! Per-window classification jitters: a sustained chord is interrupted by
//! single-window misreadings. One smoothing pass applies, strictly in order:
//!
//! 1. [`dedup_consecutive`]: consecutive frames with the same label collapse
//!    to the first occurrence
//! 2. [`drop_short_chords`]: frames that last less than the minimum duration
//!    (gap to the next frame) are dropped; the last frame always stays
//! 3. [`majority_filter`]: in a centered window of three, every label is
//!    scored by `count * mean confidence` and the best one is emitted; each
//!    frame keeps its own timestamp and confidence
//!
//! [`smooth_chords`] repeats the pass until nothing changes, so its output is
//! a fixed point and smoothing it again returns it unchanged.
//!
//! Voting is limited to neighbours within `window_ms / 2` of the centre
//! (750 ms by default). Without that limit the strongest chord of a
//! progression outvotes its neighbours pass after pass until one label is
//! left.

use serde::{Deserialize, Serialize};

use super::ChordFrame;

/// Tolerance for the inclusive duration comparison (seconds)
const DURATION_EPSILON: f64 = 1e-6;

/// Smoothing parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmoothingConfig {
    /// Chords shorter than this are dropped (default: 0.1 s)
    pub min_duration_secs: f64,

    /// Frames considered by the majority filter (default: 3)
    pub majority_window: usize,

    /// Time span in milliseconds; neighbours further than half of it from
    /// the centre frame are left out of the vote. `None` lets every frame of
    /// the window vote (default: 750 ms)
    pub window_ms: Option<f64>,
}

impl Default for SmoothingConfig {
    fn default() -> Self {
        Self {
            min_duration_secs: 0.1,
            majority_window: 3,
            window_ms: Some(750.0),
        }
    }
}

/// Collapse runs of identical labels to their first frame
pub fn dedup_consecutive(frames: &[ChordFrame]) -> Vec<ChordFrame> {
    let mut out: Vec<ChordFrame> = Vec::with_capacity(frames.len());
    for frame in frames {
        if out.last().map_or(true, |last| last.chord != frame.chord) {
            out.push(frame.clone());
        }
    }
    out
}

/// Drop frames lasting less than `min_duration` seconds
///
/// A frame's duration is the gap to the following frame. The comparison is
/// inclusive: a chord lasting exactly `min_duration` survives. The final
/// frame has no successor and is always kept.
pub fn drop_short_chords(frames: &[ChordFrame], min_duration: f64) -> Vec<ChordFrame> {
    let mut out = Vec::with_capacity(frames.len());
    for (i, frame) in frames.iter().enumerate() {
        match frames.get(i + 1) {
            Some(next) => {
                let duration = next.time - frame.time;
                if duration + DURATION_EPSILON >= min_duration {
                    out.push(frame.clone());
                }
            }
            None => out.push(frame.clone()),
        }
    }
    out
}

/// Centered majority filter over `window` frames
///
/// Every label among the voters at a position is scored by
/// `count * mean confidence` and the highest score wins. Exact ties go to the
/// centre's own label, then to the label seen first in window order. The
/// emitted frame
/// keeps the timestamp and the original confidence of that position. When
/// `window_ms` is set, neighbours more than half of it away from the centre
/// do not vote.
pub fn majority_filter(frames: &[ChordFrame], window: usize, window_ms: Option<f64>) -> Vec<ChordFrame> {
    let half = window.max(1) / 2;
    let max_offset = window_ms.map(|ms| ms / 2000.0);

    frames
        .iter()
        .enumerate()
        .map(|(i, centre)| {
            let start = i.saturating_sub(half);
            let end = (i + half + 1).min(frames.len());

            // (label, count, confidence sum) in first-seen order
            let mut tally: Vec<(&str, usize, f32)> = Vec::with_capacity(end - start);
            for neighbour in &frames[start..end] {
                if let Some(max_offset) = max_offset {
                    if (neighbour.time - centre.time).abs() > max_offset + DURATION_EPSILON {
                        continue;
                    }
                }
                match tally.iter_mut().find(|(label, _, _)| *label == neighbour.chord) {
                    Some(entry) => {
                        entry.1 += 1;
                        entry.2 += neighbour.confidence;
                    }
                    None => tally.push((neighbour.chord.as_str(), 1, neighbour.confidence)),
                }
            }

            let score = |count: usize, sum: f32| count as f32 * (sum / count as f32);
            let mut winner = centre.chord.as_str();
            let mut best_score = tally
                .iter()
                .find(|(label, _, _)| *label == winner)
                .map_or(centre.confidence, |&(_, count, sum)| score(count, sum));
            for &(label, count, sum) in &tally {
                if label == centre.chord {
                    continue;
                }
                let candidate = score(count, sum);
                if candidate > best_score {
                    best_score = candidate;
                    winner = label;
                }
            }

            ChordFrame::new(centre.time, winner, centre.confidence)
        })
        .collect()
}

/// One smoothing pass: dedup, duration filter, majority filter
pub fn smooth_once(frames: &[ChordFrame], config: &SmoothingConfig) -> Vec<ChordFrame> {
    let deduped = dedup_consecutive(frames);
    let filtered = drop_short_chords(&deduped, config.min_duration_secs);
    majority_filter(&filtered, config.majority_window, config.window_ms)
}

/// Smooth a raw chord-frame stream to a stable sequence
///
/// Repeats [`smooth_once`] until a pass returns its input unchanged. A pass
/// that relabels a frame leaves equal neighbours behind, which the next pass
/// collapses, so the sequence shrinks until it settles. The loop is bounded
/// by twice the input length.
pub fn smooth_chords(frames: &[ChordFrame], config: &SmoothingConfig) -> Vec<ChordFrame> {
    let max_passes = 2 * frames.len() + 2;
    let mut current = frames.to_vec();
    for pass in 0..max_passes {
        let next = smooth_once(&current, config);
        if next == current {
            log::debug!(
                "Chord smoothing settled after {} passes: {} -> {} frames",
                pass + 1,
                frames.len(),
                current.len()
            );
            return current;
        }
        current = next;
    }
    log::warn!("Chord smoothing did not settle after {} passes", max_passes);
    current
}
