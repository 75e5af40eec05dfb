//! Benchmarks for low-level DSP primitives.

mod envelope;
mod fft;
mod filter;

pub use envelope::bench_envelope;
pub use fft::bench_fft;
pub use filter::bench_filter;
