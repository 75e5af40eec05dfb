use crate::{
    dsp::{dynamics::Compressor, filter::SVFilter, mix::db_to_gain},
    effects::{
        params::{CompressorParams, Eq3Params},
        EffectParams,
    },
    graph::node::{GraphNode, RenderCtx},
};

use super::Effect;

/// Stereo-linked compressor: both channels get the gain computed from the
/// louder one, so the image does not shift under compression.
pub struct CompressorUnit {
    compressor: Compressor,
}

impl CompressorUnit {
    pub fn new() -> Self {
        let p = CompressorParams::default();
        Self {
            compressor: Compressor::new(p.threshold_db, p.ratio, p.attack, p.release),
        }
    }
}

impl GraphNode for CompressorUnit {
    fn render_block(&mut self, left: &mut [f32], right: &mut [f32], ctx: &RenderCtx) {
        for (l, r) in left.iter_mut().zip(right.iter_mut()) {
            let gain = self
                .compressor
                .next_gain(l.abs().max(r.abs()), ctx.sample_rate);
            *l *= gain;
            *r *= gain;
        }
    }

    fn reset(&mut self) {
        self.compressor.reset();
    }
}

impl Effect for CompressorUnit {
    fn configure(&mut self, params: &EffectParams) {
        if let EffectParams::Compressor(p) = params {
            self.compressor
                .set_params(p.threshold_db, p.ratio, p.attack, p.release);
        }
    }
}

/*
Three-band EQ
=============

    low  = lowpass(x, low_freq)
    high = highpass(x, high_freq)
    mid  = x - low - high

    y = low·g_low + mid·g_mid + high·g_high

With every gain at 0 dB the bands sum back to x exactly.
*/
pub struct Eq3Unit {
    lows: [SVFilter; 2],
    highs: [SVFilter; 2],
    gains: [f32; 3],
}

impl Eq3Unit {
    pub fn new() -> Self {
        let p = Eq3Params::default();
        Self {
            lows: [SVFilter::lowpass(p.low_freq), SVFilter::lowpass(p.low_freq)],
            highs: [SVFilter::highpass(p.high_freq), SVFilter::highpass(p.high_freq)],
            gains: [1.0; 3],
        }
    }

    #[inline]
    fn process(&mut self, channel: usize, x: f32, sample_rate: f32) -> f32 {
        let low = self.lows[channel].process(x, sample_rate);
        let high = self.highs[channel].process(x, sample_rate);
        let mid = x - low - high;
        low * self.gains[0] + mid * self.gains[1] + high * self.gains[2]
    }
}

impl GraphNode for Eq3Unit {
    fn render_block(&mut self, left: &mut [f32], right: &mut [f32], ctx: &RenderCtx) {
        for (l, r) in left.iter_mut().zip(right.iter_mut()) {
            *l = self.process(0, *l, ctx.sample_rate);
            *r = self.process(1, *r, ctx.sample_rate);
        }
    }

    fn reset(&mut self) {
        self.lows.iter_mut().for_each(SVFilter::reset);
        self.highs.iter_mut().for_each(SVFilter::reset);
    }
}

impl Effect for Eq3Unit {
    fn configure(&mut self, params: &EffectParams) {
        if let EffectParams::Eq3(p) = params {
            for filter in &mut self.lows {
                filter.set_cutoff(p.low_freq);
            }
            for filter in &mut self.highs {
                filter.set_cutoff(p.high_freq);
            }
            self.gains = [db_to_gain(p.low_db), db_to_gain(p.mid_db), db_to_gain(p.high_db)];
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_eq_is_transparent() {
        let ctx = RenderCtx::new(48_000.0);
        let mut eq = Eq3Unit::new();
        let input: Vec<f32> = (0..512).map(|i| ((i * 7) % 13) as f32 / 13.0 - 0.5).collect();
        let mut left = input.clone();
        let mut right = input.clone();

        eq.render_block(&mut left, &mut right, &ctx);
        for (a, b) in left.iter().zip(&input) {
            assert!((a - b).abs() < 1e-5);
        }
    }

    #[test]
    fn test_compressor_reduces_loud_signal() {
        let ctx = RenderCtx::new(48_000.0);
        let mut comp = CompressorUnit::new();
        comp.configure(&EffectParams::Compressor(CompressorParams {
            threshold_db: -30.0,
            ratio: 10.0,
            attack: 0.001,
            release: 0.1,
        }));

        let mut left = vec![0.9; 4096];
        let mut right = vec![0.9; 4096];
        comp.render_block(&mut left, &mut right, &ctx);
        assert!(left[4095] < 0.2);
        assert_eq!(left[4095], right[4095]);
    }
}
