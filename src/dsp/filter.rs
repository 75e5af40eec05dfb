use std::f32::consts::PI;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/*
Topology-preserving state variable filter (Simper/Cytomic form).

| response  | output                 | passes          |
| --------- | ---------------------- | --------------- |
| low-pass  | v2                     | below cutoff    |
| high-pass | x - k·v1 - v2          | above cutoff    |
| band-pass | v1                     | around cutoff   |

g = tan(π·fc/fs) prewarps the cutoff, k = 1/Q sets damping.
*/

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterType {
    LowPass,
    HighPass,
    BandPass,
}

pub struct FilterOutputs {
    pub lowpass: f32,
    pub bandpass: f32,
    pub highpass: f32,
}

#[derive(Debug, Clone)]
pub struct SVFilter {
    ic1eq: f32,
    ic2eq: f32,

    pub cutoff_hz: f32,
    pub q: f32,
    filter_type: FilterType,
}

impl SVFilter {
    pub fn new(filter_type: FilterType, cutoff_hz: f32) -> Self {
        Self {
            ic1eq: 0.0,
            ic2eq: 0.0,
            cutoff_hz,
            q: std::f32::consts::FRAC_1_SQRT_2,
            filter_type,
        }
    }

    pub fn lowpass(cutoff_hz: f32) -> Self {
        Self::new(FilterType::LowPass, cutoff_hz)
    }

    pub fn highpass(cutoff_hz: f32) -> Self {
        Self::new(FilterType::HighPass, cutoff_hz)
    }

    pub fn bandpass(cutoff_hz: f32) -> Self {
        Self::new(FilterType::BandPass, cutoff_hz)
    }

    pub fn with_q(mut self, q: f32) -> Self {
        self.set_q(q);
        self
    }

    /// (g, k) for the current cutoff and Q. Cutoff is kept below Nyquist.
    #[inline]
    pub fn coefficients(&self, sample_rate: f32) -> (f32, f32) {
        let cutoff = self.cutoff_hz.clamp(10.0, sample_rate * 0.49);
        let g = (PI * cutoff / sample_rate).tan();
        (g, 1.0 / self.q)
    }

    #[inline]
    pub fn tick(&mut self, sample: f32, g: f32, k: f32) -> FilterOutputs {
        let h = 1.0 / (1.0 + g * (g + k));
        let v3 = sample - self.ic2eq;
        let v1 = h * (self.ic1eq + g * v3);
        let v2 = self.ic2eq + g * v1;

        self.ic1eq = 2.0 * v1 - self.ic1eq;
        self.ic2eq = 2.0 * v2 - self.ic2eq;

        FilterOutputs {
            lowpass: v2,
            bandpass: v1,
            highpass: sample - k * v1 - v2,
        }
    }

    /// Filter one sample with this filter's configured response.
    #[inline]
    pub fn process(&mut self, sample: f32, sample_rate: f32) -> f32 {
        let (g, k) = self.coefficients(sample_rate);
        let outputs = self.tick(sample, g, k);
        match self.filter_type {
            FilterType::LowPass => outputs.lowpass,
            FilterType::HighPass => outputs.highpass,
            FilterType::BandPass => outputs.bandpass,
        }
    }

    pub fn render(&mut self, buffer: &mut [f32], sample_rate: f32) {
        for sample in buffer.iter_mut() {
            *sample = self.process(*sample, sample_rate);
        }
    }

    pub fn reset(&mut self) {
        self.ic1eq = 0.0;
        self.ic2eq = 0.0;
    }

    pub fn set_cutoff(&mut self, cutoff: f32) {
        self.cutoff_hz = cutoff;
    }

    pub fn set_q(&mut self, q: f32) {
        self.q = q.max(0.05);
    }
}

/// First-order allpass: `y = a·x + x[n-1] - a·y[n-1]`.
///
/// Unity magnitude everywhere, phase turns through 90° at the break
/// frequency. Chained stages make phaser notches and Hilbert pairs.
#[derive(Debug, Clone, Default)]
pub struct FirstOrderAllpass {
    a: f32,
    x1: f32,
    y1: f32,
}

impl FirstOrderAllpass {
    pub fn new(coefficient: f32) -> Self {
        Self {
            a: coefficient,
            ..Self::default()
        }
    }

    /// Coefficient placing the 90° point at `freq`.
    #[inline]
    pub fn coefficient_for(freq: f32, sample_rate: f32) -> f32 {
        let t = (PI * freq.clamp(10.0, sample_rate * 0.49) / sample_rate).tan();
        (t - 1.0) / (t + 1.0)
    }

    pub fn set_coefficient(&mut self, coefficient: f32) {
        self.a = coefficient;
    }

    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let output = self.a * input + self.x1 - self.a * self.y1;
        self.x1 = input;
        self.y1 = output;
        output
    }

    pub fn reset(&mut self) {
        self.x1 = 0.0;
        self.y1 = 0.0;
    }
}
