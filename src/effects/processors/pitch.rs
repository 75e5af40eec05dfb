use std::f64::consts::TAU;

use crate::{
    dsp::{delay::DelayLine, filter::FirstOrderAllpass, mix::blend_dry_wet},
    effects::{
        params::{FreqShiftParams, PitchShiftParams},
        EffectParams,
    },
    graph::node::{GraphNode, RenderCtx},
};

use super::Effect;

/// Two allpass chains whose outputs stay roughly 90° apart across the audio
/// band, giving an analytic signal (I, Q) for single-sideband shifting.
#[derive(Debug, Clone)]
struct HilbertPair {
    in_phase: [FirstOrderAllpass; 2],
    quadrature: [FirstOrderAllpass; 2],
}

impl HilbertPair {
    fn new() -> Self {
        Self {
            in_phase: [
                FirstOrderAllpass::new(0.692_387_8),
                FirstOrderAllpass::new(0.936_065_4),
            ],
            quadrature: [
                FirstOrderAllpass::new(0.402_192_1),
                FirstOrderAllpass::new(0.856_171_1),
            ],
        }
    }

    #[inline]
    fn process(&mut self, x: f32) -> (f32, f32) {
        let i = self.in_phase.iter_mut().fold(x, |s, ap| ap.process(s));
        let q = self.quadrature.iter_mut().fold(x, |s, ap| ap.process(s));
        (i, q)
    }

    fn reset(&mut self) {
        self.in_phase.iter_mut().for_each(FirstOrderAllpass::reset);
        self.quadrature.iter_mut().for_each(FirstOrderAllpass::reset);
    }
}

/*
Frequency shifter
=================

    (I, Q) = hilbert(x)
    y = I·cos(2π f t) - Q·sin(2π f t)

Every partial moves by the same number of Hz (not by a ratio), which is what
makes harmonic sounds turn clangorous.
*/
pub struct FreqShiftUnit {
    params: FreqShiftParams,
    hilbert: [HilbertPair; 2],
    phase: f64,
}

impl FreqShiftUnit {
    pub fn new() -> Self {
        Self {
            params: FreqShiftParams::default(),
            hilbert: [HilbertPair::new(), HilbertPair::new()],
            phase: 0.0,
        }
    }
}

impl GraphNode for FreqShiftUnit {
    fn render_block(&mut self, left: &mut [f32], right: &mut [f32], ctx: &RenderCtx) {
        let p = self.params;
        let step = p.shift_hz as f64 / ctx.sample_rate as f64;

        for (l, r) in left.iter_mut().zip(right.iter_mut()) {
            let angle = TAU * self.phase;
            let (cos, sin) = (angle.cos() as f32, angle.sin() as f32);

            for (hilbert, sample) in self.hilbert.iter_mut().zip([&mut *l, &mut *r]) {
                let (i, q) = hilbert.process(*sample);
                *sample = blend_dry_wet(*sample, i * cos - q * sin, p.wet);
            }

            self.phase = (self.phase + step).rem_euclid(1.0);
        }
    }

    fn reset(&mut self) {
        self.hilbert.iter_mut().for_each(HilbertPair::reset);
        self.phase = 0.0;
    }
}

impl Effect for FreqShiftUnit {
    fn configure(&mut self, params: &EffectParams) {
        if let EffectParams::FreqShift(p) = params {
            self.params = *p;
        }
    }
}

/*
Pitch shifter
=============

Two read taps sweep through a delay line of one window length, half a
window apart. A tap whose delay shrinks plays faster (pitch up), a growing
delay plays slower (pitch down):

    ratio  = 2^(semitones / 12)
    phase += (1 - ratio) / window_samples      (wraps in 0..1)
    tap_k  = phase_k · window_samples

Each tap is weighted by sin(π·phase_k), which is zero exactly where that tap
jumps from one end of the window to the other, so the jumps are inaudible.
*/
pub struct PitchShiftUnit {
    params: PitchShiftParams,
    lines: [DelayLine; 2],
    phase: f32,
}

impl PitchShiftUnit {
    pub fn new(sample_rate: f32) -> Self {
        let max_window = PitchShiftParams::RANGES
            .iter()
            .find(|(name, _)| *name == "window")
            .map_or(0.1, |(_, range)| range.max);

        Self {
            params: PitchShiftParams::default(),
            lines: [
                DelayLine::with_duration(max_window, sample_rate),
                DelayLine::with_duration(max_window, sample_rate),
            ],
            phase: 0.0,
        }
    }
}

impl GraphNode for PitchShiftUnit {
    fn render_block(&mut self, left: &mut [f32], right: &mut [f32], ctx: &RenderCtx) {
        let p = self.params;
        let window = (p.window * ctx.sample_rate).max(4.0);
        let ratio = (p.semitones / 12.0).exp2();
        let step = (1.0 - ratio) / window;

        for (l, r) in left.iter_mut().zip(right.iter_mut()) {
            let phases = [self.phase, (self.phase + 0.5).fract()];

            for (line, sample) in self.lines.iter_mut().zip([&mut *l, &mut *r]) {
                let wet: f32 = phases
                    .iter()
                    .map(|&ph| {
                        let gain = (std::f32::consts::PI * ph).sin();
                        line.read_interpolated(ph * window) * gain
                    })
                    .sum();
                line.write(*sample);
                *sample = blend_dry_wet(*sample, wet, p.wet);
            }

            self.phase = (self.phase + step).rem_euclid(1.0);
        }
    }

    fn reset(&mut self) {
        self.lines.iter_mut().for_each(DelayLine::reset);
        self.phase = 0.0;
    }
}

impl Effect for PitchShiftUnit {
    fn configure(&mut self, params: &EffectParams) {
        if let EffectParams::PitchShift(p) = params {
            self.params = *p;
        }
    }
}
