//! Benchmarks for the layered synth.
//!
//! Cost grows with sounding voices, so the cases go from one note on one
//! layer to a full chord on all three.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use datatone::{
    io::NoteName,
    synth::SynthEngine,
    wavetable::SampleSeries,
    EngineConfig, LAYER_COUNT,
};

use crate::BLOCK_SIZES;

const CHORD: &[&str] = &["C3", "G3", "C4", "D#4", "G4", "A#4", "D5", "F5"];

fn day(phase: f64) -> SampleSeries {
    SampleSeries::new(
        "bench",
        (0..288)
            .map(|i| 120.0 + 40.0 * (i as f64 / 25.0 + phase).sin())
            .collect(),
    )
}

fn engine(layers: usize, notes: usize) -> SynthEngine {
    let mut engine = SynthEngine::new(EngineConfig::default());
    for layer in 0..layers.min(LAYER_COUNT) {
        engine
            .set_wavetable(layer, &day(layer as f64))
            .expect("valid layer");
    }
    engine.start();

    for name in &CHORD[..notes] {
        let note: NoteName = name.parse().expect("valid note");
        engine.note_on(note, 0.8);
    }
    // Get past the lookahead so every voice is already sounding.
    let mut warmup = vec![0.0; 1024];
    engine.render(&mut warmup);
    engine
}

pub fn bench_voices(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/voices");

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        for (name, layers, notes) in [
            ("1_layer_1_note", 1, 1),
            ("1_layer_chord", 1, 8),
            ("3_layer_chord", 3, 8),
        ] {
            let mut synth = engine(layers, notes);
            group.bench_with_input(BenchmarkId::new(name, size), &size, |b, _| {
                b.iter(|| synth.render(black_box(&mut buffer)))
            });
        }
    }

    group.finish();
}
