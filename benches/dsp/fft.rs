//! Benchmarks for the radix-2 FFT and the full wavetable pipeline.
//!
//! rustfft is the yardstick: the in-house transform only has to stay in the
//! same order of magnitude for table-sized inputs.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use datatone::{
    dsp::fft::FftPlanner,
    wavetable::{SampleSeries, WavetableGenerator},
};
use num_complex::Complex64;

const TABLE_LENS: &[usize] = &[256, 1024, 2048, 4096];

pub fn bench_fft(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/fft");

    for &len in TABLE_LENS {
        let input: Vec<Complex64> = (0..len)
            .map(|i| Complex64::new((i as f64 * 0.37).sin() + 0.3 * (i as f64 * 0.05).cos(), 0.0))
            .collect();

        let plan = FftPlanner::new()
            .plan_fft_forward(len)
            .expect("power-of-two length");
        let mut buffer = input.clone();
        group.bench_with_input(BenchmarkId::new("radix2", len), &len, |b, _| {
            b.iter(|| {
                buffer.copy_from_slice(&input);
                plan.process(black_box(&mut buffer)).expect("length matches plan");
            })
        });

        let reference = rustfft::FftPlanner::<f64>::new().plan_fft_forward(len);
        let input_ref: Vec<rustfft::num_complex::Complex64> = input
            .iter()
            .map(|c| rustfft::num_complex::Complex64::new(c.re, c.im))
            .collect();
        let mut buffer_ref = input_ref.clone();
        group.bench_with_input(BenchmarkId::new("rustfft", len), &len, |b, _| {
            b.iter(|| {
                buffer_ref.copy_from_slice(&input_ref);
                reference.process(black_box(&mut buffer_ref));
            })
        });
    }

    // A day of five-minute readings through normalize, resample, smooth,
    // analysis and additive resynthesis.
    let day = SampleSeries::new(
        "day",
        (0..288).map(|i| 120.0 + 40.0 * (i as f64 / 25.0).sin()).collect(),
    );
    let mut generator = WavetableGenerator::new(2048, 2, 32);
    group.bench_function("generate/2048x32", |b| {
        b.iter(|| generator.generate(black_box(&day)).expect("valid table"))
    });

    group.finish();
}
