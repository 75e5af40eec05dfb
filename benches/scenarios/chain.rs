//! Benchmarks for the effects rack, alone and behind the synth.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use datatone::{
    effects::{EffectKind, EffectsChain, SeriesMetrics},
    graph::node::RenderCtx,
    wavetable::SampleSeries,
    EngineConfig, Session,
};

use crate::BLOCK_SIZES;

const SAMPLE_RATE: f32 = 48_000.0;

fn chain_with(enabled: &[EffectKind]) -> EffectsChain {
    let mut chain = EffectsChain::with_memory_store(SAMPLE_RATE);
    for &kind in enabled {
        chain.set_enabled(kind, true);
    }
    chain
}

pub fn bench_chain(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/chain");
    let ctx = RenderCtx::new(SAMPLE_RATE);

    let cases: [(&str, &[EffectKind]); 3] = [
        (
            "ambient_3",
            &[EffectKind::Chorus, EffectKind::Delay, EffectKind::Reverb],
        ),
        (
            "harsh_5",
            &[
                EffectKind::BitCrusher,
                EffectKind::Distortion,
                EffectKind::FreqShift,
                EffectKind::PitchShift,
                EffectKind::Phaser,
            ],
        ),
        ("all_15", &EffectKind::ALL),
    ];

    for &size in BLOCK_SIZES {
        let input: Vec<f32> = (0..size)
            .map(|i| (i as f32 * 0.07).sin() * 0.5)
            .collect();
        let mut left = input.clone();
        let mut right = input.clone();

        for (name, enabled) in cases {
            let mut chain = chain_with(enabled);
            group.bench_with_input(BenchmarkId::new(name, size), &size, |b, _| {
                b.iter(|| {
                    left.copy_from_slice(&input);
                    right.copy_from_slice(&input);
                    chain.render(black_box(&mut left), black_box(&mut right), &ctx);
                })
            });
        }

        // Whole session: three layers, a chord, a randomized rack.
        let mut session = Session::new(EngineConfig::default());
        for layer in 0..3 {
            let values = (0..288)
                .map(|i| 110.0 + 50.0 * (i as f64 / (20.0 + layer as f64)).sin())
                .collect();
            session
                .set_wavetable(layer, &SampleSeries::new("bench", values))
                .expect("valid layer");
        }
        session.randomize_effects(Some(&SeriesMetrics::new(0.5, 0.5, 0.5, 0.5, 0.5)), 1);
        session.start();
        for name in ["C3", "G3", "D#4", "A#4"] {
            session.note_on(name.parse().expect("valid note"), 0.8);
        }

        group.bench_with_input(BenchmarkId::new("session", size), &size, |b, _| {
            b.iter(|| session.render_stereo(black_box(&mut left), black_box(&mut right)))
        });
    }

    group.finish();
}
