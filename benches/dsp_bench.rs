//! Benchmarks for DSP primitives and real-world scenarios.
//!
//! Run with: cargo bench
//!
//! Render benchmarks must finish well inside the real-time deadline:
//!   - 64 samples  = 1.33ms at 48kHz
//!   - 128 samples = 2.67ms
//!   - 256 samples = 5.33ms
//!   - 512 samples = 10.67ms
//!
//! Wavetable analysis runs off the render path, but should still be cheap
//! enough to redo whenever the user picks another day.
//!
//! Benchmark groups:
//!   - dsp/*        FFT (against rustfft), filter, envelope
//!   - scenarios/*  Layered voices and effects racks

use criterion::{criterion_group, criterion_main};

mod dsp;
mod scenarios;

/// Common buffer sizes used in audio applications.
pub const BLOCK_SIZES: &[usize] = &[64, 128, 256, 512];

criterion_group!(
    benches,
    // Low-level DSP primitives
    dsp::bench_fft,
    dsp::bench_filter,
    dsp::bench_envelope,
    // Real-world scenarios
    scenarios::bench_voices,
    scenarios::bench_chain,
);
criterion_main!(benches);
