//! Harmonic analysis and additive resynthesis.

use std::f32::consts::TAU;

use crate::{dsp::fft::FftPlanner, error::WavetableError};

use super::{PartialSet, Wavetable};

/// A fundamental this far below the strongest harmonic is round-off from
/// an f32 table, not signal. Partials then stay raw.
const SILENT_FUNDAMENTAL_RATIO: f64 = 1e-6;

/// True when bin 1 carries real energy relative to the rest of `harmonics`.
fn has_fundamental(harmonics: &[f64]) -> bool {
    let strongest = harmonics.iter().fold(0.0f64, |acc, &m| acc.max(m));
    match harmonics.first() {
        Some(&fundamental) => {
            strongest > 0.0 && fundamental > strongest * SILENT_FUNDAMENTAL_RATIO
        }
        None => false,
    }
}

/// Harmonic magnitudes of one table cycle, fundamental normalized to 1.0.
///
/// Bin k of a one-cycle table is its k-th harmonic, so bins 1..=count are
/// read straight from the spectrum. The table length must be a power of two
/// and `harmonic_count` may not exceed half of it.
pub fn compute_partials(
    planner: &mut FftPlanner,
    table: &Wavetable,
    harmonic_count: usize,
) -> Result<PartialSet, WavetableError> {
    let samples = table.as_slice();
    let fft = planner.plan_fft_forward(samples.len())?;

    if harmonic_count > samples.len() / 2 {
        return Err(WavetableError::TooManyHarmonics {
            requested: harmonic_count,
            len: samples.len(),
        });
    }

    let spectrum = fft.magnitudes(samples)?;
    let harmonics = &spectrum[1..=harmonic_count];

    let magnitudes = if has_fundamental(harmonics) {
        let fundamental = harmonics[0];
        harmonics.iter().map(|&m| (m / fundamental) as f32).collect()
    } else {
        harmonics.iter().map(|&m| m as f32).collect()
    };

    Ok(PartialSet::new(magnitudes))
}

/// Sum of sines, one per partial, peak-normalized to ±1.
///
/// Partials that are all zero give a silent table.
pub fn additive_table(partials: &PartialSet, len: usize) -> Vec<f32> {
    let mut table = vec![0.0f32; len];

    for (h, &amp) in partials.as_slice().iter().enumerate() {
        if amp == 0.0 {
            continue;
        }
        let harmonic = (h + 1) as f32;
        for (i, sample) in table.iter_mut().enumerate() {
            let phase = TAU * harmonic * i as f32 / len as f32;
            *sample += amp * phase.sin();
        }
    }

    let peak = table.iter().fold(0.0f32, |acc, &s| acc.max(s.abs()));
    if peak > 0.0 {
        for sample in &mut table {
            *sample /= peak;
        }
    }

    table
}
