//! Example: Run batch chord analysis on a worker thread
//!
//! Usage:
//!   cargo run --release --example background_batch -- [--cancel-at 0.5]

use std::env;

use cadence_dsp::analysis::batch::ChordAnalysisConfig;
use cadence_dsp::features::tuning::note_frequency;
use cadence_dsp::{spawn_chord_analysis, AnalysisError, BatchEvent, ChordAnalyzer};

fn progression(sample_rate: u32) -> Vec<f32> {
    let chords = [
        [(0, 4), (4, 4), (7, 4)],
        [(9, 4), (0, 5), (4, 5)],
        [(5, 4), (9, 4), (0, 5)],
        [(7, 4), (11, 4), (2, 5)],
    ];
    let mut samples = Vec::new();
    for _ in 0..4 {
        for chord in &chords {
            let freqs: Vec<f32> = chord.iter().map(|&(pc, oct)| note_frequency(pc, oct)).collect();
            for i in 0..sample_rate as usize * 2 {
                let t = i as f32 / sample_rate as f32;
                samples.push(freqs.iter().map(|f| 0.25 * (2.0 * std::f32::consts::PI * f * t).sin()).sum());
            }
        }
    }
    samples
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let cancel_at: Option<f32> = args
        .iter()
        .position(|a| a == "--cancel-at")
        .and_then(|i| args.get(i + 1))
        .map(|v| v.parse())
        .transpose()?;

    let sample_rate = 22050;
    let analyzer = ChordAnalyzer::new(ChordAnalysisConfig::default());
    let handle = spawn_chord_analysis(analyzer, progression(sample_rate), sample_rate)?;

    for event in handle.events().iter() {
        match event {
            BatchEvent::Progress(fraction) => {
                if cancel_at.map_or(false, |at| fraction >= at) {
                    println!("cancelling at {:.0}%", fraction * 100.0);
                    handle.cancel();
                }
            }
            BatchEvent::ChordFound(frame) => {
                println!("{:>6.2}s  {:<6} ({:.2})", frame.time, frame.chord, frame.confidence);
            }
            BatchEvent::Finished(Ok(analysis)) => {
                println!(
                    "done: {} windows, {} skipped, {} chords after smoothing",
                    analysis.windows,
                    analysis.failed_windows,
                    analysis.chords.len()
                );
                break;
            }
            BatchEvent::Finished(Err(AnalysisError::Cancelled)) => {
                println!("cancelled");
                break;
            }
            BatchEvent::Finished(Err(e)) => return Err(e.into()),
        }
    }

    Ok(())
}
