//! Batch chord analysis on a background thread
//!
//! [`spawn_chord_analysis`] moves the analyzer and the buffer onto a worker
//! thread and streams [`BatchEvent`]s back over a crossbeam channel. The
//! last event is always [`BatchEvent::Finished`].

use std::thread::JoinHandle;

use crossbeam_channel::{unbounded, Receiver, Sender};

use super::batch::{AnalysisObserver, ChordAnalysis, ChordAnalyzer};
use super::scheduler::CancellationToken;
use crate::error::AnalysisError;
use crate::features::chord::ChordFrame;

/// Event emitted by a background analysis
#[derive(Debug, Clone, PartialEq)]
pub enum BatchEvent {
    /// Progress fraction in [0, 1]
    Progress(f32),
    /// A window produced a chord
    ChordFound(ChordFrame),
    /// Analysis ended; no further events follow
    Finished(Result<ChordAnalysis, AnalysisError>),
}

/// Forwards observer calls into the event channel
struct ChannelObserver {
    events: Sender<BatchEvent>,
}

impl AnalysisObserver for ChannelObserver {
    fn on_progress(&mut self, fraction: f32) {
        // A dropped receiver just means nobody is listening
        let _ = self.events.send(BatchEvent::Progress(fraction));
    }

    fn on_chord_found(&mut self, frame: &ChordFrame) {
        let _ = self.events.send(BatchEvent::ChordFound(frame.clone()));
    }
}

/// Handle to a running background analysis
#[derive(Debug)]
pub struct AnalysisHandle {
    events: Receiver<BatchEvent>,
    cancellation: CancellationToken,
    thread: Option<JoinHandle<()>>,
}

impl AnalysisHandle {
    /// Event stream
    pub fn events(&self) -> &Receiver<BatchEvent> {
        &self.events
    }

    /// Ask the worker to stop at the next window boundary
    pub fn cancel(&self) {
        self.cancellation.cancel();
    }

    /// Block until the analysis finishes, discarding intermediate events
    ///
    /// # Errors
    ///
    /// The analysis error, or `ProcessingError` if the worker died without
    /// reporting a result.
    pub fn wait(mut self) -> Result<ChordAnalysis, AnalysisError> {
        let mut outcome = None;
        for event in self.events.iter() {
            if let BatchEvent::Finished(result) = event {
                outcome = Some(result);
                break;
            }
        }
        self.join()?;
        outcome.unwrap_or_else(|| {
            Err(AnalysisError::ProcessingError(
                "Analysis worker exited without a result".to_string(),
            ))
        })
    }

    /// Wait for the worker thread to exit
    ///
    /// # Errors
    ///
    /// Returns `ProcessingError` if the worker panicked.
    pub fn join(&mut self) -> Result<(), AnalysisError> {
        match self.thread.take() {
            Some(thread) => thread
                .join()
                .map_err(|_| AnalysisError::ProcessingError("Analysis worker panicked".to_string())),
            None => Ok(()),
        }
    }
}

/// Run `analyzer` over `samples` on a new thread
///
/// The analyzer's cancellation token is shared with the returned handle.
///
/// # Errors
///
/// Returns `ProcessingError` if the thread cannot be spawned.
pub fn spawn_chord_analysis(
    analyzer: ChordAnalyzer,
    samples: Vec<f32>,
    sample_rate: u32,
) -> Result<AnalysisHandle, AnalysisError> {
    let (tx, rx) = unbounded();
    let cancellation = analyzer.cancellation_token();

    let thread = std::thread::Builder::new()
        .name("chord-analysis".to_string())
        .spawn(move || {
            log::debug!("Background chord analysis started: {} samples", samples.len());
            let mut observer = ChannelObserver { events: tx.clone() };
            let result = analyzer.analyze(&samples, sample_rate, &mut observer);
            if let Err(e) = &result {
                log::debug!("Background chord analysis ended with error: {}", e);
            }
            let _ = tx.send(BatchEvent::Finished(result));
        })
        .map_err(|e| AnalysisError::ProcessingError(format!("Failed to spawn analysis worker: {}", e)))?;

    Ok(AnalysisHandle {
        events: rx,
        cancellation,
        thread: Some(thread),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::batch::ChordAnalysisConfig;
    use crate::analysis::scheduler::NoYield;
    use crate::features::tuning::note_frequency;

    fn c_major(seconds: f32, sample_rate: u32) -> Vec<f32> {
        let freqs = [note_frequency(0, 4), note_frequency(4, 4), note_frequency(7, 4)];
        let len = (seconds * sample_rate as f32) as usize;
        (0..len)
            .map(|i| {
                let t = i as f32 / sample_rate as f32;
                freqs.iter().map(|f| 0.25 * (2.0 * std::f32::consts::PI * f * t).sin()).sum()
            })
            .collect()
    }

    #[test]
    fn test_events_end_with_finished() {
        let analyzer = ChordAnalyzer::new(ChordAnalysisConfig::default()).with_scheduler(Box::new(NoYield));
        let mut handle = spawn_chord_analysis(analyzer, c_major(2.0, 22050), 22050).unwrap();

        let events: Vec<BatchEvent> = handle.events().iter().collect();
        handle.join().unwrap();

        let found = events.iter().filter(|e| matches!(e, BatchEvent::ChordFound(_))).count();
        assert!(found > 0);
        match events.last() {
            Some(BatchEvent::Finished(Ok(analysis))) => {
                assert_eq!(analysis.raw_frames.len(), found);
                assert_eq!(analysis.chords.len(), 1);
                assert_eq!(analysis.chords[0].chord, "C");
            }
            other => panic!("unexpected last event: {:?}", other),
        }
        assert!(events.contains(&BatchEvent::Progress(1.0)));
    }

    #[test]
    fn test_cancel_before_start() {
        let token = CancellationToken::new();
        token.cancel();
        let analyzer = ChordAnalyzer::default()
            .with_scheduler(Box::new(NoYield))
            .with_cancellation(token);
        let handle = spawn_chord_analysis(analyzer, c_major(1.0, 22050), 22050).unwrap();
        assert_eq!(handle.wait(), Err(AnalysisError::Cancelled));
    }

    #[test]
    fn test_wait_returns_result() {
        let analyzer = ChordAnalyzer::default().with_scheduler(Box::new(NoYield));
        let handle = spawn_chord_analysis(analyzer, c_major(1.0, 22050), 22050).unwrap();
        let analysis = handle.wait().unwrap();
        assert_eq!(analysis.chords[0].chord, "C");
    }
}
