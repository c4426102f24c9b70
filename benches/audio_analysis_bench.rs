//! Performance benchmarks for audio analysis

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use cadence_dsp::features::chord::ChordClassifier;
use cadence_dsp::features::chroma::ChromaExtractor;
use cadence_dsp::{analyze_audio, AnalysisConfig, AudioFrame, PitchDetector};

fn triad(seconds: usize, sample_rate: u32) -> Vec<f32> {
    let freqs = [261.63f32, 329.63, 392.0];
    (0..sample_rate as usize * seconds)
        .map(|i| {
            let t = i as f32 / sample_rate as f32;
            freqs
                .iter()
                .map(|f| 0.25 * (2.0 * std::f32::consts::PI * f * t).sin())
                .sum()
        })
        .collect()
}

fn bench_analyze_audio(c: &mut Criterion) {
    // 30 seconds at 44.1kHz
    let samples = triad(30, 44100);
    let config = AnalysisConfig::default();

    c.bench_function("analyze_audio_30s", |b| {
        b.iter(|| {
            let _ = analyze_audio(black_box(&samples), black_box(44100), black_box(&config));
        });
    });
}

fn bench_chord_window(c: &mut Criterion) {
    let samples = triad(1, 44100);
    let window = &samples[..22050];
    let extractor = ChromaExtractor::default();
    let classifier = ChordClassifier::default();

    c.bench_function("chroma_and_classify_500ms", |b| {
        b.iter(|| {
            let frame = AudioFrame::new(black_box(window), 44100).unwrap();
            let chroma = extractor.extract(&frame).unwrap();
            classifier.classify(&chroma)
        });
    });
}

fn bench_pitch_frame(c: &mut Criterion) {
    let samples: Vec<f32> = (0..2048)
        .map(|i| 0.8 * (2.0 * std::f32::consts::PI * 440.0 * i as f32 / 44100.0).sin())
        .collect();
    let detector = PitchDetector::default();

    c.bench_function("pitch_detect_2048", |b| {
        b.iter(|| {
            let frame = AudioFrame::new(black_box(&samples), 44100).unwrap();
            detector.detect(&frame).unwrap()
        });
    });
}

criterion_group!(benches, bench_analyze_audio, bench_chord_window, bench_pitch_frame);
criterion_main!(benches);
