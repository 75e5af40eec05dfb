//! From a labeled series of readings to a playable timbre.
//!
//! ```text
//! SampleSeries ─→ normalize ─→ resample(N) ─→ smooth ─→ Wavetable
//!                                                         │ FFT
//!                                                         ↓
//!                                 Timbre ←─ additive ←─ PartialSet
//! ```
//!
//! Every step is a pure function of its input. The generator only holds the
//! FFT plan cache, so analysing many series of the same table length pays
//! for the twiddle factors once.

mod shape;
mod spectrum;

use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{config::EngineConfig, dsp::fft::FftPlanner, error::WavetableError};

pub use shape::{normalize, resample, smooth};
pub use spectrum::{additive_table, compute_partials};

/// An ordered run of readings with a display label, e.g. one day.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct SampleSeries {
    pub label: String,
    pub values: Vec<f64>,
}

impl SampleSeries {
    pub fn new(label: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            label: label.into(),
            values,
        }
    }
}

/// One periodic cycle, samples in [-1, 1].
#[derive(Debug, Clone, PartialEq)]
pub struct Wavetable(Vec<f32>);

impl Wavetable {
    pub fn new(samples: Vec<f32>) -> Self {
        Self(samples)
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn is_silent(&self) -> bool {
        self.0.iter().all(|&s| s == 0.0)
    }
}

/// Harmonic magnitudes; entry 0 is the fundamental.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct PartialSet(Vec<f32>);

impl PartialSet {
    pub fn new(magnitudes: Vec<f32>) -> Self {
        Self(magnitudes)
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Everything a voice needs to sound a series: its spectrum and a
/// playback table resynthesized from it. Shared read-only between voices.
#[derive(Debug, Clone)]
pub struct Timbre {
    pub label: String,
    pub wavetable: Wavetable,
    pub partials: PartialSet,
    playback: Vec<f32>,
}

impl Timbre {
    pub fn from_partials(
        label: impl Into<String>,
        wavetable: Wavetable,
        partials: PartialSet,
    ) -> Self {
        let playback = additive_table(&partials, wavetable.len().max(1));
        Self {
            label: label.into(),
            wavetable,
            partials,
            playback,
        }
    }

    pub fn playback_table(&self) -> &[f32] {
        &self.playback
    }
}

pub struct WavetableGenerator {
    planner: FftPlanner,
    table_len: usize,
    smoothing_passes: usize,
    harmonic_count: usize,
}

impl WavetableGenerator {
    pub fn new(table_len: usize, smoothing_passes: usize, harmonic_count: usize) -> Self {
        Self {
            planner: FftPlanner::new(),
            table_len,
            smoothing_passes,
            harmonic_count,
        }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(
            config.table_len,
            config.smoothing_passes,
            config.harmonic_count,
        )
    }

    /// normalize → resample → smooth.
    pub fn wavetable(&self, values: &[f64]) -> Wavetable {
        let mut table = resample(&normalize(values), self.table_len);
        smooth(&mut table, self.smoothing_passes);
        Wavetable::new(table)
    }

    pub fn compute_partials(
        &mut self,
        table: &Wavetable,
        harmonic_count: usize,
    ) -> Result<PartialSet, WavetableError> {
        compute_partials(&mut self.planner, table, harmonic_count)
    }

    /// Full pipeline: series in, shareable timbre out.
    pub fn generate(&mut self, series: &SampleSeries) -> Result<Arc<Timbre>, WavetableError> {
        let wavetable = self.wavetable(&series.values);
        let partials = self.compute_partials(&wavetable, self.harmonic_count)?;

        debug!(
            label = %series.label,
            readings = series.values.len(),
            fundamental = partials.as_slice().first().copied().unwrap_or(0.0),
            silent = wavetable.is_silent(),
            "generated wavetable"
        );

        Ok(Arc::new(Timbre::from_partials(
            series.label.clone(),
            wavetable,
            partials,
        )))
    }
}
