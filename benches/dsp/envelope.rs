//! Benchmarks for ADSR envelope generator.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use datatone::{dsp::envelope::Envelope, graph::node::RenderCtx};

use crate::BLOCK_SIZES;

fn run(env: &mut Envelope, buffer: &mut [f32], ctx: &RenderCtx) {
    for sample in buffer.iter_mut() {
        *sample = env.next_sample(ctx);
    }
}

pub fn bench_envelope(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/envelope");
    let ctx = RenderCtx::new(48_000.0);

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        // Attack phase (ramping up); the calm end of the chaos mapping
        let mut env = Envelope::adsr(1.2, 0.8, 0.9, 3.0);
        env.note_on();
        group.bench_with_input(BenchmarkId::new("attack", size), &size, |b, _| {
            b.iter(|| run(&mut env, black_box(&mut buffer), black_box(&ctx)))
        });

        // Sustain phase (holding steady)
        let mut env = Envelope::adsr(0.001, 0.001, 0.7, 0.3);
        env.note_on();
        for _ in 0..200 {
            env.next_sample(&ctx);
        }
        group.bench_with_input(BenchmarkId::new("sustain", size), &size, |b, _| {
            b.iter(|| run(&mut env, black_box(&mut buffer), black_box(&ctx)))
        });

        // Release phase (ramping down)
        let mut env = Envelope::adsr(0.001, 0.001, 0.7, 3.0);
        env.note_on();
        for _ in 0..200 {
            env.next_sample(&ctx);
        }
        env.note_off(&ctx);
        group.bench_with_input(BenchmarkId::new("release", size), &size, |b, _| {
            b.iter(|| run(&mut env, black_box(&mut buffer), black_box(&ctx)))
        });
    }

    group.finish();
}
