//! Sonify a day of readings: build a wavetable timbre from a labeled sample
//! series, play it on a three-layer polyphonic synth, and route the result
//! through a reorderable effects rack.

pub mod config;
pub mod control; // Tick-coalesced parameter commits
pub mod dsp;
pub mod effects; // Reorderable, bypassable effects rack
pub mod error;
pub mod events;
pub mod graph; // Stereo block-processing nodes
pub mod io;
pub mod session;
pub mod synth; // Voice pools and the layered engine
pub mod wavetable;

pub use config::EngineConfig;
pub use session::Session;

pub const MAX_BLOCK_SIZE: usize = 2048;
pub(crate) const MIN_TIME: f32 = 1.0 / 48_000.0;

/// Number of independently-timbred oscillator layers in the engine.
pub const LAYER_COUNT: usize = 3;
