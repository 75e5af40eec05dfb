//! Low frequency oscillators for sweeping effect parameters.

/*
An LFO is an oscillator at control rate (roughly 0.01 - 20 Hz). The effects
rack uses them for:

  tremolo      LFO → amplitude
  vibrato      LFO → short delay time (pitch wobble)
  chorus       LFO → delay time, small depth
  autofilter   LFO → filter cutoff
  phaser       LFO → allpass cutoffs

Output is bipolar (-1..1). Parameters that only move one way take the
unipolar form: (bipolar + 1) / 2.

A stereo effect can run its right channel a quarter cycle behind the left
(`with_phase(0.25)`) so the motion spreads across the field.
*/

use std::f32::consts::TAU;

#[derive(Debug, Clone)]
pub struct Lfo {
    frequency: f32,
    /// Normalized phase, 0.0 - 1.0.
    phase: f32,
    start_phase: f32,
}

impl Lfo {
    pub fn sine(frequency: f32) -> Self {
        Self {
            frequency,
            phase: 0.0,
            start_phase: 0.0,
        }
    }

    pub fn with_phase(mut self, phase: f32) -> Self {
        self.start_phase = phase.rem_euclid(1.0);
        self.phase = self.start_phase;
        self
    }

    pub fn set_frequency(&mut self, frequency: f32) {
        self.frequency = frequency.max(0.0);
    }

    pub fn frequency(&self) -> f32 {
        self.frequency
    }

    /// Current value (bipolar), then advance one sample.
    #[inline]
    pub fn next_sample(&mut self, sample_rate: f32) -> f32 {
        let value = (self.phase * TAU).sin();

        self.phase += self.frequency / sample_rate;
        if self.phase >= 1.0 {
            self.phase -= self.phase.floor();
        }

        value
    }

    pub fn reset(&mut self) {
        self.phase = self.start_phase;
    }
}

/// Convert bipolar signal (-1.0 to +1.0) to unipolar (0.0 to 1.0).
#[inline]
pub fn bipolar_to_unipolar(bipolar: f32) -> f32 {
    (bipolar + 1.0) * 0.5
}
