//! Example: Analyze a WAV file
//!
//! Usage:
//!   cargo run --release --example analyze_wav -- <file.wav> [config.toml] [--json]

use std::env;
use std::time::Instant;

use cadence_dsp::preprocessing::channel_mixer::{interleaved_to_mono, ChannelMixMode};
use cadence_dsp::{analyze_audio, AnalysisConfig};

fn load_wav(path: &str) -> Result<(Vec<f32>, u32), Box<dyn std::error::Error>> {
    let mut reader = hound::WavReader::open(path)?;
    let spec = reader.spec();

    let samples: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Float => reader.samples::<f32>().collect::<Result<Vec<_>, _>>()?,
        hound::SampleFormat::Int => {
            let max_value = (1i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .samples::<i32>()
                .map(|s| s.map(|s| s as f32 / max_value))
                .collect::<Result<Vec<_>, _>>()?
        }
    };

    let mono = interleaved_to_mono(&samples, spec.channels as usize, ChannelMixMode::Average)?;
    Ok((mono, spec.sample_rate))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let mut json = false;
    let mut paths = Vec::new();
    for arg in env::args().skip(1) {
        if arg == "--json" {
            json = true;
        } else {
            paths.push(arg);
        }
    }

    let Some(wav_path) = paths.first() else {
        eprintln!("Usage: analyze_wav <file.wav> [config.toml] [--json]");
        std::process::exit(2);
    };

    let config = match paths.get(1) {
        Some(config_path) => AnalysisConfig::from_toml_str(&std::fs::read_to_string(config_path)?)?,
        None => AnalysisConfig::default(),
    };

    let decode_start = Instant::now();
    let (samples, sample_rate) = load_wav(wav_path)?;
    let decode_ms = decode_start.elapsed().as_secs_f64() * 1000.0;

    let result = analyze_audio(&samples, sample_rate, &config)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    println!("{}", wav_path);
    println!(
        "  {:.1}s @ {} Hz (decode {:.1} ms, analysis {:.1} ms)",
        result.metadata.duration_seconds, sample_rate, decode_ms, result.metadata.processing_time_ms
    );
    match result.bpm {
        Some(bpm) => println!("  BPM: {:.1} (confidence: {:.2})", bpm, result.bpm_confidence),
        None => println!("  BPM: -"),
    }
    println!("  Onsets: {}", result.onsets.len());
    println!("  Chords ({} raw detections):", result.raw_chord_count);
    for chord in &result.chords {
        println!("    {:>7.2}s  {:<8} {:.2}", chord.time, chord.chord, chord.confidence);
    }
    for warning in &result.metadata.warnings {
        println!("  warning: {}", warning);
    }

    Ok(())
}
