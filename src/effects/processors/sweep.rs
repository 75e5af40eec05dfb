//! Swept filters: cutoff driven by the input level or by an LFO.
//!
//! All three map a 0..1 control onto an exponential frequency sweep,
//! `base · 2^(octaves · control)`, so equal control steps sound like equal
//! musical intervals.

use crate::{
    dsp::{
        dynamics::EnvelopeFollower,
        filter::{FirstOrderAllpass, SVFilter},
        lfo::{bipolar_to_unipolar, Lfo},
        mix::{blend_dry_wet, db_to_gain},
    },
    effects::{
        params::{AutoFilterParams, AutoWahParams, PhaserParams},
        EffectParams,
    },
    graph::node::{GraphNode, RenderCtx},
};

use super::Effect;

const PHASER_STAGES: usize = 4;

#[inline]
fn sweep(base: f32, octaves: f32, control: f32) -> f32 {
    base * (octaves * control).exp2()
}

/// Band-pass whose centre follows the input envelope.
pub struct AutoWahUnit {
    params: AutoWahParams,
    follower: EnvelopeFollower,
    filters: [SVFilter; 2],
}

impl AutoWahUnit {
    pub fn new() -> Self {
        let p = AutoWahParams::default();
        Self {
            params: p,
            follower: EnvelopeFollower::new(0.01, 0.1),
            filters: [
                SVFilter::bandpass(p.base_freq).with_q(p.q),
                SVFilter::bandpass(p.base_freq).with_q(p.q),
            ],
        }
    }
}

impl GraphNode for AutoWahUnit {
    fn render_block(&mut self, left: &mut [f32], right: &mut [f32], ctx: &RenderCtx) {
        let p = self.params;
        // Level that opens the filter all the way.
        let full_scale = db_to_gain(p.sensitivity_db);

        for (l, r) in left.iter_mut().zip(right.iter_mut()) {
            let level = self.follower.process(l.abs().max(r.abs()), ctx.sample_rate);
            let cutoff = sweep(p.base_freq, p.octaves, (level / full_scale).min(1.0));

            for (filter, sample) in self.filters.iter_mut().zip([&mut *l, &mut *r]) {
                filter.set_cutoff(cutoff);
                let wet = filter.process(*sample, ctx.sample_rate);
                *sample = blend_dry_wet(*sample, wet, p.wet);
            }
        }
    }

    fn reset(&mut self) {
        self.follower.reset();
        self.filters.iter_mut().for_each(SVFilter::reset);
    }
}

impl Effect for AutoWahUnit {
    fn configure(&mut self, params: &EffectParams) {
        if let EffectParams::AutoWah(p) = params {
            self.params = *p;
            for filter in &mut self.filters {
                filter.set_q(p.q);
            }
        }
    }
}

/// Low-pass swept by a sine LFO, right channel a quarter cycle behind.
pub struct AutoFilterUnit {
    params: AutoFilterParams,
    lfos: [Lfo; 2],
    filters: [SVFilter; 2],
}

impl AutoFilterUnit {
    pub fn new() -> Self {
        let p = AutoFilterParams::default();
        Self {
            params: p,
            lfos: [Lfo::sine(p.rate), Lfo::sine(p.rate).with_phase(0.25)],
            filters: [SVFilter::lowpass(p.base_freq), SVFilter::lowpass(p.base_freq)],
        }
    }
}

impl GraphNode for AutoFilterUnit {
    fn render_block(&mut self, left: &mut [f32], right: &mut [f32], ctx: &RenderCtx) {
        let p = self.params;
        for (l, r) in left.iter_mut().zip(right.iter_mut()) {
            for ((lfo, filter), sample) in self
                .lfos
                .iter_mut()
                .zip(self.filters.iter_mut())
                .zip([&mut *l, &mut *r])
            {
                let control = bipolar_to_unipolar(lfo.next_sample(ctx.sample_rate)) * p.depth;
                filter.set_cutoff(sweep(p.base_freq, p.octaves, control));
                let wet = filter.process(*sample, ctx.sample_rate);
                *sample = blend_dry_wet(*sample, wet, p.wet);
            }
        }
    }

    fn reset(&mut self) {
        self.lfos.iter_mut().for_each(Lfo::reset);
        self.filters.iter_mut().for_each(SVFilter::reset);
    }
}

impl Effect for AutoFilterUnit {
    fn configure(&mut self, params: &EffectParams) {
        if let EffectParams::AutoFilter(p) = params {
            self.params = *p;
            for lfo in &mut self.lfos {
                lfo.set_frequency(p.rate);
            }
        }
    }
}

/*
Phaser
======

  x ──┬───────────────────────────────────────────┐
      │                                           (dry)
      └→ (+) → AP → AP → AP → AP ──┬──→ wet ──→ mix → y
          ↑                        │
          └──── feedback ←─────────┘

Four first-order allpass stages share one break frequency, swept by the LFO
between base_freq and base_freq · 2^octaves. Mixing with the dry signal
turns their phase shift into moving notches.
*/
pub struct PhaserUnit {
    params: PhaserParams,
    lfo: Lfo,
    stages: [[FirstOrderAllpass; PHASER_STAGES]; 2],
    last: [f32; 2],
}

impl PhaserUnit {
    pub fn new() -> Self {
        let p = PhaserParams::default();
        Self {
            params: p,
            lfo: Lfo::sine(p.rate),
            stages: Default::default(),
            last: [0.0; 2],
        }
    }
}

impl GraphNode for PhaserUnit {
    fn render_block(&mut self, left: &mut [f32], right: &mut [f32], ctx: &RenderCtx) {
        let p = self.params;
        for (l, r) in left.iter_mut().zip(right.iter_mut()) {
            let control = bipolar_to_unipolar(self.lfo.next_sample(ctx.sample_rate));
            let coefficient =
                FirstOrderAllpass::coefficient_for(sweep(p.base_freq, p.octaves, control), ctx.sample_rate);

            for ((chain, last), sample) in self
                .stages
                .iter_mut()
                .zip(self.last.iter_mut())
                .zip([&mut *l, &mut *r])
            {
                let mut y = *sample + *last * p.feedback;
                for stage in chain.iter_mut() {
                    stage.set_coefficient(coefficient);
                    y = stage.process(y);
                }
                *last = y;
                *sample = blend_dry_wet(*sample, y, p.wet);
            }
        }
    }

    fn reset(&mut self) {
        self.lfo.reset();
        self.last = [0.0; 2];
        for stage in self.stages.iter_mut().flatten() {
            stage.reset();
        }
    }
}

impl Effect for PhaserUnit {
    fn configure(&mut self, params: &EffectParams) {
        if let EffectParams::Phaser(p) = params {
            self.params = *p;
            self.lfo.set_frequency(p.rate);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::TAU;

    fn sine(freq: f32, len: usize) -> Vec<f32> {
        (0..len)
            .map(|i| (TAU * freq * i as f32 / 48_000.0).sin())
            .collect()
    }

    #[test]
    fn test_sweep_is_exponential() {
        assert!((sweep(100.0, 3.0, 0.0) - 100.0).abs() < 1e-4);
        assert!((sweep(100.0, 3.0, 1.0) - 800.0).abs() < 1e-2);
    }

    #[test]
    fn test_closed_autofilter_darkens_highs() {
        let ctx = RenderCtx::new(48_000.0);
        let mut fx = AutoFilterUnit::new();
        fx.configure(&EffectParams::AutoFilter(AutoFilterParams {
            rate: 0.1,
            base_freq: 200.0,
            octaves: 1.0,
            depth: 0.0,
            wet: 1.0,
        }));

        let mut left = sine(8_000.0, 2048);
        let mut right = left.clone();
        fx.render_block(&mut left, &mut right, &ctx);

        let peak = left[1024..].iter().fold(0.0f32, |a, &s| a.max(s.abs()));
        assert!(peak < 0.05, "peak={peak}");
    }

    #[test]
    fn test_dry_phaser_passes_input() {
        let ctx = RenderCtx::new(48_000.0);
        let mut fx = PhaserUnit::new();
        let mut params = PhaserParams::default();
        params.wet = 0.0;
        fx.configure(&EffectParams::Phaser(params));

        let input = sine(440.0, 256);
        let mut left = input.clone();
        let mut right = input.clone();
        fx.render_block(&mut left, &mut right, &ctx);
        assert_eq!(left, input);
    }
}
