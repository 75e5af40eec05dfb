//! Benchmarks for the state-variable filter used by the EQ and sweep units.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use datatone::dsp::filter::SVFilter;

use crate::BLOCK_SIZES;

const SAMPLE_RATE: f32 = 48_000.0;

pub fn bench_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/filter");

    for &size in BLOCK_SIZES {
        // Generate a test signal (sawtooth-like ramp)
        let input: Vec<f32> = (0..size)
            .map(|i| (i as f32 / size as f32) * 2.0 - 1.0)
            .collect();

        let filters = [
            ("lowpass", SVFilter::lowpass(1000.0).with_q(2.0)),
            ("highpass", SVFilter::highpass(1000.0).with_q(2.0)),
            ("bandpass", SVFilter::bandpass(1000.0).with_q(2.0)),
        ];

        for (name, mut filter) in filters {
            let mut buffer = input.clone();
            group.bench_with_input(BenchmarkId::new(name, size), &size, |b, _| {
                b.iter(|| {
                    buffer.copy_from_slice(&input);
                    filter.render(black_box(&mut buffer), SAMPLE_RATE);
                })
            });
        }

        // Auto-wah style: cutoff moves every sample
        let mut filter = SVFilter::bandpass(200.0).with_q(4.0);
        let mut buffer = input.clone();
        group.bench_with_input(BenchmarkId::new("swept", size), &size, |b, _| {
            b.iter(|| {
                for (i, sample) in buffer.iter_mut().enumerate() {
                    filter.set_cutoff(200.0 + i as f32 * 4.0);
                    *sample = filter.process(black_box(*sample), SAMPLE_RATE);
                }
            })
        });
    }

    group.finish();
}
