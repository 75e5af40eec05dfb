use crate::{
    dsp::{
        distortion::{quantize, waveshape},
        mix::blend_dry_wet,
    },
    effects::{
        params::{BitCrusherParams, DistortionParams},
        EffectParams,
    },
    graph::node::{GraphNode, RenderCtx},
};

use super::Effect;

/// Bit reduction plus sample-and-hold downsampling.
pub struct BitCrusherUnit {
    params: BitCrusherParams,
    hold: [f32; 2],
    counter: u32,
}

impl BitCrusherUnit {
    pub fn new() -> Self {
        Self {
            params: BitCrusherParams::default(),
            hold: [0.0; 2],
            counter: 0,
        }
    }
}

impl GraphNode for BitCrusherUnit {
    fn render_block(&mut self, left: &mut [f32], right: &mut [f32], _ctx: &RenderCtx) {
        let factor = self.params.downsample.round().max(1.0) as u32;
        let bits = self.params.bits;
        let wet = self.params.wet;

        for (l, r) in left.iter_mut().zip(right.iter_mut()) {
            if self.counter == 0 {
                self.hold = [quantize(*l, bits), quantize(*r, bits)];
            }
            self.counter = (self.counter + 1) % factor;

            *l = blend_dry_wet(*l, self.hold[0], wet);
            *r = blend_dry_wet(*r, self.hold[1], wet);
        }
    }

    fn reset(&mut self) {
        self.hold = [0.0; 2];
        self.counter = 0;
    }
}

impl Effect for BitCrusherUnit {
    fn configure(&mut self, params: &EffectParams) {
        if let EffectParams::BitCrusher(p) = params {
            self.params = *p;
        }
    }
}

pub struct DistortionUnit {
    params: DistortionParams,
}

impl DistortionUnit {
    pub fn new() -> Self {
        Self {
            params: DistortionParams::default(),
        }
    }
}

impl GraphNode for DistortionUnit {
    fn render_block(&mut self, left: &mut [f32], right: &mut [f32], _ctx: &RenderCtx) {
        let DistortionParams { drive, wet } = self.params;
        for sample in left.iter_mut().chain(right.iter_mut()) {
            *sample = blend_dry_wet(*sample, waveshape(*sample, drive), wet);
        }
    }
}

impl Effect for DistortionUnit {
    fn configure(&mut self, params: &EffectParams) {
        if let EffectParams::Distortion(p) = params {
            self.params = *p;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_downsampling_holds_values() {
        let ctx = RenderCtx::new(48_000.0);
        let mut crusher = BitCrusherUnit::new();
        crusher.configure(&EffectParams::BitCrusher(BitCrusherParams {
            bits: 16.0,
            downsample: 4.0,
            wet: 1.0,
        }));

        let mut left: Vec<f32> = (0..8).map(|i| i as f32 * 0.1).collect();
        let mut right = left.clone();
        crusher.render_block(&mut left, &mut right, &ctx);

        assert_eq!(left[0], left[3]);
        assert_eq!(left[4], left[7]);
        assert_ne!(left[3], left[4]);
    }

    #[test]
    fn test_dry_distortion_is_transparent() {
        let ctx = RenderCtx::new(48_000.0);
        let mut dist = DistortionUnit::new();
        dist.configure(&EffectParams::Distortion(DistortionParams { drive: 1.0, wet: 0.0 }));

        let mut left = vec![0.3, -0.2];
        let mut right = vec![0.1, 0.0];
        dist.render_block(&mut left, &mut right, &ctx);
        assert_eq!(left, vec![0.3, -0.2]);
    }
}
