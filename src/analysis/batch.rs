//! Batch chord analysis over a complete buffer
//!
//! The buffer is cut into windows of `window_ms` every `hop_ms`. Each window
//! goes through chroma extraction and classification; results at or above
//! `min_confidence` become raw [`ChordFrame`]s stamped with the window start
//! and are reported to the observer as soon as they are found. When the hop
//! grid stops short of the buffer end, one more full-length window ending
//! exactly at the last sample covers the tail. After the last window the raw
//! frames are smoothed once.
//!
//! Progress is `0.99 * windows_done / windows_total` while windows run and
//! 1.0 after smoothing. The analyzer yields to its [`Scheduler`] every
//! `yield_every` windows and checks its [`CancellationToken`] before each
//! window. A window that fails is logged and contributes nothing.
//!
//! # Example
//!
//! ```no_run
//! use cadence_dsp::analysis::batch::{callbacks, ChordAnalyzer};
//!
//! let samples = vec![0.0f32; 44100 * 10];
//! let analyzer = ChordAnalyzer::default();
//! let mut observer = callbacks(
//!     |p| println!("{:.0}%", p * 100.0),
//!     |frame| println!("{:.2}s {}", frame.time, frame.chord),
//! );
//! let analysis = analyzer.analyze(&samples, 44100, &mut observer)?;
//! println!("{} chords", analysis.chords.len());
//! # Ok::<(), cadence_dsp::AnalysisError>(())
//! ```

use serde::{Deserialize, Serialize};

use super::scheduler::{CancellationToken, Scheduler, ThreadYield};
use crate::error::AnalysisError;
use crate::features::chord::{smooth_chords, ChordClassifier, ChordFrame, SmoothingConfig};
use crate::features::chroma::ChromaExtractor;
use crate::io::AudioFrame;

/// Share of the progress range used by the window pass
const WINDOW_PROGRESS_SHARE: f32 = 0.99;

/// Windowing parameters for batch chord analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChordAnalysisConfig {
    /// Analysis window length in milliseconds (default: 500.0)
    pub window_ms: f64,

    /// Hop between window starts in milliseconds (default: 250.0)
    pub hop_ms: f64,

    /// Chord results below this confidence are discarded (default: 0.5)
    pub min_confidence: f32,

    /// Yield to the scheduler after this many windows; 0 disables (default: 10)
    pub yield_every: usize,
}

impl Default for ChordAnalysisConfig {
    fn default() -> Self {
        Self {
            window_ms: 500.0,
            hop_ms: 250.0,
            min_confidence: 0.5,
            yield_every: 10,
        }
    }
}

/// Receives batch analysis events
pub trait AnalysisObserver {
    /// Fraction of work done, non-decreasing, 1.0 exactly once at the end
    fn on_progress(&mut self, _fraction: f32) {}

    /// A window produced a chord above the confidence floor
    fn on_chord_found(&mut self, _frame: &ChordFrame) {}
}

/// Observer that ignores every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl AnalysisObserver for NoopObserver {}

/// Closure-backed observer, see [`callbacks`]
pub struct Callbacks<P, C> {
    on_progress: P,
    on_chord: C,
}

impl<P, C> AnalysisObserver for Callbacks<P, C>
where
    P: FnMut(f32),
    C: FnMut(&ChordFrame),
{
    fn on_progress(&mut self, fraction: f32) {
        (self.on_progress)(fraction)
    }

    fn on_chord_found(&mut self, frame: &ChordFrame) {
        (self.on_chord)(frame)
    }
}

/// Adapt a progress closure and a chord closure into an observer
pub fn callbacks<P, C>(on_progress: P, on_chord: C) -> Callbacks<P, C>
where
    P: FnMut(f32),
    C: FnMut(&ChordFrame),
{
    Callbacks { on_progress, on_chord }
}

/// Outcome of a batch chord analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChordAnalysis {
    /// Smoothed chord sequence
    pub chords: Vec<ChordFrame>,

    /// Per-window detections before smoothing
    pub raw_frames: Vec<ChordFrame>,

    /// Windows examined
    pub windows: usize,

    /// Windows skipped because analysis failed
    pub failed_windows: usize,
}

/// Batch chord analyzer
pub struct ChordAnalyzer {
    config: ChordAnalysisConfig,
    extractor: ChromaExtractor,
    classifier: ChordClassifier,
    smoothing: SmoothingConfig,
    scheduler: Box<dyn Scheduler>,
    cancellation: CancellationToken,
}

impl std::fmt::Debug for ChordAnalyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChordAnalyzer")
            .field("config", &self.config)
            .field("extractor", &self.extractor)
            .field("classifier", &self.classifier)
            .field("smoothing", &self.smoothing)
            .field("cancelled", &self.cancellation.is_cancelled())
            .finish()
    }
}

impl Default for ChordAnalyzer {
    fn default() -> Self {
        Self::new(ChordAnalysisConfig::default())
    }
}

impl ChordAnalyzer {
    /// Analyzer with default chroma, classifier and smoothing settings
    pub fn new(config: ChordAnalysisConfig) -> Self {
        Self {
            config,
            extractor: ChromaExtractor::default(),
            classifier: ChordClassifier::default(),
            smoothing: SmoothingConfig::default(),
            scheduler: Box::new(ThreadYield),
            cancellation: CancellationToken::new(),
        }
    }

    /// Replace the chroma extractor
    pub fn with_extractor(mut self, extractor: ChromaExtractor) -> Self {
        self.extractor = extractor;
        self
    }

    /// Replace the chord classifier
    pub fn with_classifier(mut self, classifier: ChordClassifier) -> Self {
        self.classifier = classifier;
        self
    }

    /// Replace the smoothing parameters
    pub fn with_smoothing(mut self, smoothing: SmoothingConfig) -> Self {
        self.smoothing = smoothing;
        self
    }

    /// Replace the yield strategy
    pub fn with_scheduler(mut self, scheduler: Box<dyn Scheduler>) -> Self {
        self.scheduler = scheduler;
        self
    }

    /// Observe `token` between windows
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = token;
        self
    }

    /// Windowing parameters
    pub fn config(&self) -> &ChordAnalysisConfig {
        &self.config
    }

    /// Token this analyzer checks between windows
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancellation.clone()
    }

    /// Window and hop lengths in samples
    fn window_geometry(&self, sample_rate: u32) -> Result<(usize, usize), AnalysisError> {
        let to_samples = |ms: f64| (ms / 1000.0 * sample_rate as f64).round();
        let window = to_samples(self.config.window_ms);
        let hop = to_samples(self.config.hop_ms);
        if !(window >= 1.0) || !(hop >= 1.0) {
            return Err(AnalysisError::InvalidInput(format!(
                "Window ({} ms) and hop ({} ms) must each span at least one sample at {} Hz",
                self.config.window_ms, self.config.hop_ms, sample_rate
            )));
        }
        Ok((window as usize, hop as usize))
    }

    /// Analyze a whole buffer
    ///
    /// # Errors
    ///
    /// `InvalidInput` for an empty buffer, a zero sample rate or a window
    /// shorter than one sample; `Cancelled` when the token fires. Failures
    /// inside a single window are not errors.
    pub fn analyze(
        &self,
        samples: &[f32],
        sample_rate: u32,
        observer: &mut dyn AnalysisObserver,
    ) -> Result<ChordAnalysis, AnalysisError> {
        AudioFrame::new(samples, sample_rate)?;
        let (window, hop) = self.window_geometry(sample_rate)?;

        let starts = window_starts(samples.len(), window, hop);
        let total = starts.len();

        log::debug!(
            "Batch chord analysis: {} samples at {} Hz, {} windows of {} (hop {})",
            samples.len(),
            sample_rate,
            total,
            window,
            hop
        );

        let mut raw_frames = Vec::new();
        let mut failed_windows = 0usize;

        for (index, &start) in starts.iter().enumerate() {
            if self.cancellation.is_cancelled() {
                log::debug!("Batch chord analysis cancelled at window {}/{}", index, total);
                return Err(AnalysisError::Cancelled);
            }

            let end = (start + window).min(samples.len());
            let time = start as f64 / sample_rate as f64;

            match self.analyze_window(&samples[start..end], sample_rate, time) {
                Ok(Some(frame)) => {
                    observer.on_chord_found(&frame);
                    raw_frames.push(frame);
                }
                Ok(None) => {}
                Err(e) => {
                    failed_windows += 1;
                    log::warn!("Skipping window at {:.3}s: {}", time, e);
                }
            }

            let done = index + 1;
            observer.on_progress(WINDOW_PROGRESS_SHARE * done as f32 / total as f32);

            if self.config.yield_every > 0 && done % self.config.yield_every == 0 {
                self.scheduler.yield_now();
            }
        }

        let chords = smooth_chords(&raw_frames, &self.smoothing);
        observer.on_progress(1.0);

        log::debug!(
            "Batch chord analysis done: {} raw frames -> {} chords, {} failed windows",
            raw_frames.len(),
            chords.len(),
            failed_windows
        );

        Ok(ChordAnalysis {
            chords,
            raw_frames,
            windows: total,
            failed_windows,
        })
    }

    /// Chroma and classify one window
    fn analyze_window(
        &self,
        window: &[f32],
        sample_rate: u32,
        time: f64,
    ) -> Result<Option<ChordFrame>, AnalysisError> {
        let frame = AudioFrame::new(window, sample_rate)?;
        let chroma = self.extractor.extract(&frame)?;
        Ok(self
            .classifier
            .classify(&chroma)
            .filter(|result| result.confidence >= self.config.min_confidence)
            .map(|result| ChordFrame::from_result(time, &result)))
    }
}

/// Window start offsets over a buffer of `len` samples
///
/// A buffer shorter than one window is a single window at 0. Otherwise the
/// hop grid is followed by a window ending at `len` if the grid misses it.
fn window_starts(len: usize, window: usize, hop: usize) -> Vec<usize> {
    if len <= window {
        return vec![0];
    }
    let last = len - window;
    let mut starts: Vec<usize> = (0..=last).step_by(hop).collect();
    if starts.last().map_or(true, |&s| s < last) {
        starts.push(last);
    }
    starts
}
