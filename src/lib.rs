//! # Cadence DSP
//!
//! A music-signal analysis engine: mono PCM audio in, symbolic musical
//! events out.
//!
//! ## Features
//!
//! - **Chord recognition**: Goertzel chroma over equal-tempered targets,
//!   template matching over nine chord qualities, temporal smoothing
//! - **Pitch detection**: autocorrelation with note quantization, and a
//!   trait seam for a model-based estimator
//! - **Tempo estimation**: energy onsets and an inter-onset-interval histogram
//! - **Orchestration**: batch analysis with progress, yielding and
//!   cancellation; per-block streaming analysis with a bounded queue
//!
//! ## Quick Start
//!
//! ```no_run
//! use cadence_dsp::{analyze_audio, AnalysisConfig};
//!
//! // Mono f32 samples in [-1.0, 1.0]
//! let samples: Vec<f32> = vec![0.0; 44100 * 10];
//! let result = analyze_audio(&samples, 44100, &AnalysisConfig::default())?;
//!
//! for chord in &result.chords {
//!     println!("{:6.2}s  {}", chord.time, chord.chord);
//! }
//! if let Some(bpm) = result.bpm {
//!     println!("Tempo: {:.1} BPM", bpm);
//! }
//! # Ok::<(), cadence_dsp::AnalysisError>(())
//! ```
//!
//! ## Architecture
//!
//! ```text
//! samples -> chroma -> classify (per window) -> smoother -> chord sequence
//! samples -> pitch detector -> note tracker   -> note events
//! samples -> onset detector -> tempo estimator -> BPM
//! ```
//!
//! The three pipelines share no mutable state.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod analysis;
pub mod config;
pub mod error;
pub mod features;
pub mod io;
pub mod preprocessing;

pub use analysis::batch::{callbacks, AnalysisObserver, ChordAnalysis, ChordAnalyzer};
pub use analysis::metadata::{AnalysisFlag, AnalysisMetadata};
pub use analysis::result::AnalysisResult;
pub use analysis::scheduler::{CancellationToken, NoYield, Scheduler, ThreadYield};
pub use analysis::streaming::{ChordHistory, StreamingChordAnalyzer};
pub use analysis::worker::{spawn_chord_analysis, AnalysisHandle, BatchEvent};
pub use config::AnalysisConfig;
pub use error::AnalysisError;
pub use features::chord::{ChordFrame, ChordResult};
pub use features::pitch::{NoteEvent, NoteTracker, PitchDetector, PitchReading};
pub use io::{AudioFrame, BlockQueue};

use analysis::batch::NoopObserver;

/// Share of supporting intervals below which a tempo is flagged ambiguous
const AMBIGUOUS_TEMPO_CONFIDENCE: f32 = 0.5;

/// Main analysis function
///
/// Runs batch chord analysis and onset/tempo estimation over the same
/// buffer in parallel and combines them into one [`AnalysisResult`].
///
/// # Arguments
///
/// * `samples` - Mono audio samples, normalized to [-1.0, 1.0]
/// * `sample_rate` - Sample rate in Hz (typically 44100 or 48000)
/// * `config` - Analysis configuration parameters
///
/// # Errors
///
/// `InvalidInput` for an empty buffer or zero sample rate, `Config` when
/// the configuration fails validation.
///
/// # Example
///
/// ```no_run
/// use cadence_dsp::{analyze_audio, AnalysisConfig};
///
/// let samples = vec![0.0f32; 44100 * 30];
/// let result = analyze_audio(&samples, 44100, &AnalysisConfig::default())?;
/// assert!(result.chords.is_empty());
/// # Ok::<(), cadence_dsp::AnalysisError>(())
/// ```
pub fn analyze_audio(
    samples: &[f32],
    sample_rate: u32,
    config: &AnalysisConfig,
) -> Result<AnalysisResult, AnalysisError> {
    use std::time::Instant;
    let start_time = Instant::now();

    log::debug!("Starting audio analysis: {} samples at {} Hz", samples.len(), sample_rate);

    config.validate()?;
    let frame = AudioFrame::new(samples, sample_rate)?;

    let chord_analyzer = config.chord_analyzer().with_scheduler(Box::new(NoYield));
    let onset_detector = config.onset_detector();

    let (chords, onsets) = rayon::join(
        || chord_analyzer.analyze(samples, sample_rate, &mut NoopObserver),
        || onset_detector.detect(&frame),
    );
    let chords = chords?;
    let onsets = onsets?;

    let tempo = config.tempo_estimator().estimate_detailed(&onsets);

    let mut metadata = AnalysisMetadata::new(frame.duration_seconds(), sample_rate);
    metadata.chord_windows = chords.windows;
    metadata.failed_windows = chords.failed_windows;

    if chords.chords.is_empty() {
        metadata.flag(AnalysisFlag::NoChordsDetected, "No window produced a chord above the confidence floor");
    }
    if chords.failed_windows > 0 {
        metadata.flag(
            AnalysisFlag::SkippedWindows,
            format!("{} of {} chord windows failed and were skipped", chords.failed_windows, chords.windows),
        );
    }
    match &tempo {
        None if onsets.len() < config.tempo.min_onsets => metadata.flag(
            AnalysisFlag::InsufficientOnsets,
            format!("{} onsets detected, {} needed for tempo", onsets.len(), config.tempo.min_onsets),
        ),
        None => metadata.warnings.push("No tempo found in the plausible beat range".to_string()),
        Some(estimate) if estimate.confidence < AMBIGUOUS_TEMPO_CONFIDENCE => metadata.flag(
            AnalysisFlag::AmbiguousTempo,
            format!("Only {:.0}% of intervals support {:.1} BPM", estimate.confidence * 100.0, estimate.bpm),
        ),
        Some(_) => {}
    }

    metadata.processing_time_ms = start_time.elapsed().as_secs_f32() * 1000.0;

    log::debug!(
        "Analysis complete in {:.1} ms: {} chords, {} onsets, bpm={:?}",
        metadata.processing_time_ms,
        chords.chords.len(),
        onsets.len(),
        tempo.as_ref().map(|t| t.bpm)
    );

    Ok(AnalysisResult {
        raw_chord_count: chords.raw_frames.len(),
        chords: chords.chords,
        onsets,
        bpm: tempo.as_ref().map(|t| t.bpm),
        bpm_confidence: tempo.map_or(0.0, |t| t.confidence),
        metadata,
    })
}
