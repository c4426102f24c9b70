//! Example: Feed a synthetic live signal through the streaming analyzers
//!
//! Audio arrives in odd-sized chunks, is cut into 100 ms blocks, and each
//! block drives both the chord history and the note tracker.

use cadence_dsp::features::tuning::note_frequency;
use cadence_dsp::{AnalysisConfig, BlockQueue, ChordHistory, NoteTracker};

const SR: u32 = 22050;

/// Triad pad with a melody on top, one bar per chord
fn synth(bars: &[([(usize, i32); 3], (usize, i32))], bar_secs: f32) -> Vec<f32> {
    let bar_len = (bar_secs * SR as f32) as usize;
    let mut out = Vec::with_capacity(bar_len * bars.len());
    for (chord, melody) in bars {
        let mut freqs: Vec<f32> = chord.iter().map(|&(pc, oct)| note_frequency(pc, oct)).collect();
        freqs.push(note_frequency(melody.0, melody.1));
        for i in 0..bar_len {
            let t = i as f32 / SR as f32;
            out.push(freqs.iter().map(|f| 0.2 * (2.0 * std::f32::consts::PI * f * t).sin()).sum());
        }
    }
    out
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let signal = synth(
        &[
            ([(0, 4), (4, 4), (7, 4)], (0, 5)),
            ([(9, 3), (0, 4), (4, 4)], (9, 4)),
            ([(5, 4), (9, 4), (0, 5)], (5, 4)),
            ([(7, 4), (11, 4), (2, 5)], (7, 4)),
        ],
        2.0,
    );

    let mut queue = BlockQueue::new(SR as usize / 10, 64, SR)?;
    let config = AnalysisConfig::default();
    let chords = config.streaming_analyzer();
    let pitch = config.pitch_detector();
    let mut history = ChordHistory::new(10.0);
    let mut tracker = NoteTracker::new();
    let mut last_chord: Option<String> = None;
    let mut end_time = 0.0;

    // Chunk size unrelated to the block size, as from an audio callback
    for (i, chunk) in signal.chunks(1337).enumerate() {
        let dropped = queue.push(chunk);
        if dropped > 0 {
            println!("chunk {}: dropped {} blocks", i, dropped);
        }

        while let Some(block) = queue.pop() {
            let frame = block.frame()?;
            end_time = block.start_time + frame.duration_seconds();

            if let Some(chord) = chords.process_block(&block, &mut history)? {
                if last_chord.as_deref() != Some(chord.chord.as_str()) {
                    println!("{:>6.2}s  chord {:<6} ({:.2})", chord.time, chord.chord, chord.confidence);
                    last_chord = Some(chord.chord);
                }
            }

            let reading = pitch.detect(&frame)?;
            if let Some(event) = tracker.update(reading.as_ref(), block.start_time, frame.mean_abs()) {
                println!(
                    "{:>6.2}s  note  {:<6} {:.1} Hz for {:.2}s",
                    event.timestamp, event.note, event.frequency, event.duration
                );
            }
        }
    }

    if let Some(event) = tracker.finish(end_time) {
        println!(
            "{:>6.2}s  note  {:<6} {:.1} Hz for {:.2}s",
            event.timestamp, event.note, event.frequency, event.duration
        );
    }

    println!("Smoothed chords in history:");
    for chord in chords.current_chords(&history) {
        println!("  {:>6.2}s  {}", chord.time, chord.chord);
    }

    Ok(())
}
