//! Live chord analysis over delivered blocks
//!
//! The caller owns a [`ChordHistory`] and passes it into every
//! [`StreamingChordAnalyzer::process_block`] call. The history keeps the raw
//! detections of the last `retention_secs` seconds; anything older is
//! evicted as new blocks arrive. [`ChordHistory::smoothed`] reruns the
//! smoother over what is retained.

use std::collections::VecDeque;

use crate::error::AnalysisError;
use crate::features::chord::{smooth_chords, ChordClassifier, ChordFrame, SmoothingConfig};
use crate::features::chroma::ChromaExtractor;
use crate::io::AudioBlock;

/// Default retention of the rolling chord history (seconds)
pub const DEFAULT_RETENTION_SECS: f64 = 30.0;

/// Caller-owned rolling buffer of raw chord frames
#[derive(Debug, Clone)]
pub struct ChordHistory {
    frames: VecDeque<ChordFrame>,
    retention_secs: f64,
}

impl Default for ChordHistory {
    fn default() -> Self {
        Self::new(DEFAULT_RETENTION_SECS)
    }
}

impl ChordHistory {
    /// Empty history retaining `retention_secs` seconds
    pub fn new(retention_secs: f64) -> Self {
        Self {
            frames: VecDeque::new(),
            retention_secs: retention_secs.max(0.0),
        }
    }

    /// Retention window in seconds
    pub fn retention_secs(&self) -> f64 {
        self.retention_secs
    }

    /// Append a frame
    ///
    /// Frames must arrive in time order; one older than the newest retained
    /// frame is ignored and `false` is returned.
    pub fn push(&mut self, frame: ChordFrame) -> bool {
        if let Some(last) = self.frames.back() {
            if frame.time < last.time {
                log::warn!(
                    "Ignoring out-of-order chord frame at {:.3}s (latest {:.3}s)",
                    frame.time,
                    last.time
                );
                return false;
            }
        }
        self.frames.push_back(frame);
        true
    }

    /// Drop frames older than `now - retention_secs`; returns how many
    pub fn evict(&mut self, now: f64) -> usize {
        let cutoff = now - self.retention_secs;
        let before = self.frames.len();
        while self.frames.front().map_or(false, |f| f.time < cutoff) {
            self.frames.pop_front();
        }
        before - self.frames.len()
    }

    /// Retained frames, oldest first
    pub fn frames(&self) -> impl Iterator<Item = &ChordFrame> {
        self.frames.iter()
    }

    /// Most recent raw frame
    pub fn latest(&self) -> Option<&ChordFrame> {
        self.frames.back()
    }

    /// Number of retained frames
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// True when nothing is retained
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Forget everything
    pub fn clear(&mut self) {
        self.frames.clear();
    }

    /// Smoothed view of the retained frames
    pub fn smoothed(&self, config: &SmoothingConfig) -> Vec<ChordFrame> {
        let frames: Vec<ChordFrame> = self.frames.iter().cloned().collect();
        smooth_chords(&frames, config)
    }
}

/// Per-block chord analyzer for live input
#[derive(Debug, Clone)]
pub struct StreamingChordAnalyzer {
    extractor: ChromaExtractor,
    classifier: ChordClassifier,
    smoothing: SmoothingConfig,
    min_confidence: f32,
}

impl Default for StreamingChordAnalyzer {
    fn default() -> Self {
        Self::new(ChromaExtractor::default(), ChordClassifier::default(), 0.5)
    }
}

impl StreamingChordAnalyzer {
    /// Analyzer keeping detections at or above `min_confidence`
    pub fn new(extractor: ChromaExtractor, classifier: ChordClassifier, min_confidence: f32) -> Self {
        Self {
            extractor,
            classifier,
            smoothing: SmoothingConfig::default(),
            min_confidence,
        }
    }

    /// Replace the smoothing parameters used by [`Self::current_chords`]
    pub fn with_smoothing(mut self, smoothing: SmoothingConfig) -> Self {
        self.smoothing = smoothing;
        self
    }

    /// Classify one block and record the detection in `history`
    ///
    /// Frames older than the retention window (measured from the end of
    /// this block) are evicted whether or not the block held a chord.
    ///
    /// # Errors
    ///
    /// Returns the extractor's error for a block too short to analyze; the
    /// history is left untouched in that case.
    pub fn process_block(
        &self,
        block: &AudioBlock,
        history: &mut ChordHistory,
    ) -> Result<Option<ChordFrame>, AnalysisError> {
        let frame = block.frame()?;
        let chroma = self.extractor.extract(&frame)?;

        let detected = self
            .classifier
            .classify(&chroma)
            .filter(|result| result.confidence >= self.min_confidence)
            .map(|result| ChordFrame::from_result(block.start_time, &result));

        if let Some(chord) = &detected {
            history.push(chord.clone());
        }

        let evicted = history.evict(block.start_time + frame.duration_seconds());
        if evicted > 0 {
            log::debug!("Evicted {} chord frames older than {:.1}s", evicted, history.retention_secs());
        }

        Ok(detected)
    }

    /// Smoothed chords currently held in `history`
    pub fn current_chords(&self, history: &ChordHistory) -> Vec<ChordFrame> {
        history.smoothed(&self.smoothing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::tuning::note_frequency;
    use crate::io::BlockQueue;

    const SR: u32 = 22050;

    fn triad(root_pc: usize, third: usize, fifth: usize, len: usize) -> Vec<f32> {
        let freqs = [
            note_frequency(root_pc, 4),
            note_frequency(third % 12, 4 + (third / 12) as i32),
            note_frequency(fifth % 12, 4 + (fifth / 12) as i32),
        ];
        (0..len)
            .map(|i| {
                let t = i as f32 / SR as f32;
                freqs
                    .iter()
                    .map(|f| 0.25 * (2.0 * std::f32::consts::PI * f * t).sin())
                    .sum()
            })
            .collect()
    }

    #[test]
    fn test_blocks_feed_history() {
        let block_len = SR as usize / 2;
        let mut queue = BlockQueue::new(block_len, 16, SR).unwrap();
        queue.push(&triad(0, 4, 7, block_len * 3));
        // G B D: D sits in octave 5
        queue.push(&triad(7, 11, 14, block_len * 3));

        let analyzer = StreamingChordAnalyzer::default();
        let mut history = ChordHistory::default();
        while let Some(block) = queue.pop() {
            analyzer.process_block(&block, &mut history).unwrap();
        }

        assert_eq!(history.len(), 6);
        assert_eq!(history.latest().unwrap().chord, "G");
        let labels: Vec<String> = analyzer.current_chords(&history).into_iter().map(|f| f.chord).collect();
        assert_eq!(labels, vec!["C", "G"]);
    }

    #[test]
    fn test_retention_evicts_old_frames() {
        let mut history = ChordHistory::new(1.0);
        for i in 0..5 {
            history.push(ChordFrame::new(i as f64 * 0.5, "C", 0.9));
        }
        assert_eq!(history.evict(2.5), 3);
        assert_eq!(history.frames().next().unwrap().time, 1.5);
    }

    #[test]
    fn test_out_of_order_frame_ignored() {
        let mut history = ChordHistory::default();
        assert!(history.push(ChordFrame::new(1.0, "C", 0.9)));
        assert!(!history.push(ChordFrame::new(0.5, "G", 0.9)));
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn test_silent_block_still_evicts() {
        let analyzer = StreamingChordAnalyzer::default();
        let mut history = ChordHistory::new(1.0);
        history.push(ChordFrame::new(0.0, "C", 0.9));

        let block = AudioBlock {
            start_time: 5.0,
            samples: vec![0.0; 4096],
            sample_rate: SR,
        };
        assert!(analyzer.process_block(&block, &mut history).unwrap().is_none());
        assert!(history.is_empty());
    }

    #[test]
    fn test_short_block_is_error() {
        let analyzer = StreamingChordAnalyzer::default();
        let mut history = ChordHistory::default();
        let block = AudioBlock {
            start_time: 0.0,
            samples: vec![0.1; 128],
            sample_rate: SR,
        };
        assert!(analyzer.process_block(&block, &mut history).is_err());
        assert!(history.is_empty());
    }
}
