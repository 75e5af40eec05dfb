/*
Wavetable Playback
==================

A single-cycle table of N samples is read with a phase accumulator:

    phase += frequency / sample_rate      (cycles, wraps at 1.0)
    pos    = phase * N
    out    = table[i] + frac * (table[i + 1] - table[i])   (i + 1 wraps to 0)

The table is periodic, so index N is index 0. Linear interpolation is
enough here because playback tables are built from a limited set of
harmonics and carry no energy near the table's own Nyquist.
*/

/// Phase accumulator reading a periodic table.
#[derive(Debug, Clone, Default)]
pub struct TableOscillator {
    phase: f64,
}

impl TableOscillator {
    pub fn new() -> Self {
        Self { phase: 0.0 }
    }

    pub fn reset(&mut self) {
        self.phase = 0.0;
    }

    pub fn phase(&self) -> f64 {
        self.phase
    }

    /// Interpolated table value at the current phase, then advance.
    #[inline]
    pub fn next_sample(&mut self, table: &[f32], frequency: f32, sample_rate: f32) -> f32 {
        let len = table.len();
        if len == 0 {
            return 0.0;
        }

        let pos = self.phase * len as f64;
        let index = pos as usize % len;
        let frac = (pos - pos.floor()) as f32;
        let a = table[index];
        let b = table[(index + 1) % len];

        self.phase += frequency as f64 / sample_rate as f64;
        self.phase -= self.phase.floor();

        a + (b - a) * frac
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::TAU;

    #[test]
    fn test_sine_table_plays_sine() {
        let table: Vec<f32> = (0..1024).map(|i| (TAU * i as f32 / 1024.0).sin()).collect();
        let sample_rate = 48_000.0;
        let freq = 440.0;

        let mut osc = TableOscillator::new();
        for n in 0..256 {
            let expected = (TAU * freq * n as f32 / sample_rate).sin();
            let actual = osc.next_sample(&table, freq, sample_rate);
            assert!((actual - expected).abs() < 1e-3, "n={n} {actual} vs {expected}");
        }
    }

    #[test]
    fn test_phase_wraps() {
        let table = [0.0, 1.0];
        let mut osc = TableOscillator::new();
        for _ in 0..1000 {
            osc.next_sample(&table, 30_000.0, 48_000.0);
            assert!((0.0..1.0).contains(&osc.phase()));
        }
    }

    #[test]
    fn test_empty_table_is_silent() {
        let mut osc = TableOscillator::new();
        assert_eq!(osc.next_sample(&[], 440.0, 48_000.0), 0.0);
    }
}
