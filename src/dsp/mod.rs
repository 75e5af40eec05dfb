//! Low-level DSP primitives used by the synth voices and the effects rack.
//!
//! Everything here is allocation-free once constructed and safe to call from
//! the render path. The one exception is `fft`, which belongs to wavetable
//! analysis and runs on assignment, never per block.

/// Time-domain delay line with fractional reads.
pub mod delay;
/// Soft/hard clipping, waveshaping and bit-depth quantization.
pub mod distortion;
/// Envelope follower and soft-knee compressor.
pub mod dynamics;
/// Attack/decay/sustain/release envelope generator.
pub mod envelope;
/// Radix-2 FFT with cached plans.
pub mod fft;
/// State-variable filter implementation with multiple responses.
pub mod filter;
/// Control-rate oscillators.
pub mod lfo;
/// Summing, wet/dry blending and dB conversion.
pub mod mix;
/// Wavetable playback.
pub mod oscillator;
/// Schroeder reverb building blocks.
pub mod reverb;

pub use envelope::{Adsr, EnvelopeState};
