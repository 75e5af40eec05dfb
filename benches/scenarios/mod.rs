//! Real-world scenario benchmarks.
//!
//! These model what the render callback actually does: a chord on the
//! layered synth, then a rack of effects over it.

mod chain;
mod voices;

pub use chain::bench_chain;
pub use voices::bench_voices;
