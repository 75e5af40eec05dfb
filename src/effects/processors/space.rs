use crate::{
    dsp::{delay::DelayLine, mix::blend_dry_wet, reverb::SchroederReverb},
    effects::{
        params::{DelayParams, ReverbParams, WidenerParams},
        EffectParams,
    },
    graph::node::{GraphNode, RenderCtx},
};

use super::Effect;

/// Right-channel reverb delays are lengthened by this many samples so the
/// two tails decorrelate.
const REVERB_STEREO_SPREAD: usize = 23;

/// Feedback delay, one line per channel.
pub struct DelayUnit {
    params: DelayParams,
    lines: [DelayLine; 2],
}

impl DelayUnit {
    pub fn new(sample_rate: f32) -> Self {
        let max_time = DelayParams::RANGES
            .iter()
            .find(|(name, _)| *name == "time")
            .map_or(1.0, |(_, range)| range.max);

        Self {
            params: DelayParams::default(),
            lines: [
                DelayLine::with_duration(max_time, sample_rate),
                DelayLine::with_duration(max_time, sample_rate),
            ],
        }
    }
}

impl GraphNode for DelayUnit {
    fn render_block(&mut self, left: &mut [f32], right: &mut [f32], ctx: &RenderCtx) {
        let p = self.params;
        let delay = p.time * ctx.sample_rate;

        for (l, r) in left.iter_mut().zip(right.iter_mut()) {
            for (line, sample) in self.lines.iter_mut().zip([&mut *l, &mut *r]) {
                let echo = line.read_interpolated(delay);
                line.write(*sample + echo * p.feedback);
                *sample = blend_dry_wet(*sample, echo, p.wet);
            }
        }
    }

    fn reset(&mut self) {
        self.lines.iter_mut().for_each(DelayLine::reset);
    }
}

impl Effect for DelayUnit {
    fn configure(&mut self, params: &EffectParams) {
        if let EffectParams::Delay(p) = params {
            self.params = *p;
        }
    }
}

pub struct ReverbUnit {
    params: ReverbParams,
    reverbs: [SchroederReverb; 2],
}

impl ReverbUnit {
    pub fn new(sample_rate: f32) -> Self {
        let mut unit = Self {
            params: ReverbParams::default(),
            reverbs: [
                SchroederReverb::new(sample_rate),
                SchroederReverb::with_spread(sample_rate, REVERB_STEREO_SPREAD),
            ],
        };
        unit.apply();
        unit
    }

    fn apply(&mut self) {
        let decay = ReverbParams::RANGES
            .iter()
            .find(|(name, _)| *name == "decay")
            .map(|(_, range)| range);

        // Tail length maps linearly onto room size across its documented range.
        let room = decay.map_or(0.5, |range| {
            (self.params.decay - range.min) / (range.max - range.min)
        });

        for reverb in &mut self.reverbs {
            reverb.set_room_size(room);
            reverb.set_damping(self.params.damping);
        }
    }
}

impl GraphNode for ReverbUnit {
    fn render_block(&mut self, left: &mut [f32], right: &mut [f32], _ctx: &RenderCtx) {
        let wet = self.params.wet;
        for (l, r) in left.iter_mut().zip(right.iter_mut()) {
            for (reverb, sample) in self.reverbs.iter_mut().zip([&mut *l, &mut *r]) {
                let tail = reverb.process(*sample);
                *sample = blend_dry_wet(*sample, tail, wet);
            }
        }
    }

    fn reset(&mut self) {
        self.reverbs.iter_mut().for_each(SchroederReverb::reset);
    }
}

impl Effect for ReverbUnit {
    fn configure(&mut self, params: &EffectParams) {
        if let EffectParams::Reverb(p) = params {
            self.params = *p;
            self.apply();
        }
    }
}

/*
Mid/side widener
================

    mid  = (L + R) / 2
    side = (L - R) / 2 · 2·width

    L' = mid + side,  R' = mid - side

width 0 collapses to mono, 0.5 leaves the image alone, 1 doubles the side.
*/
pub struct WidenerUnit {
    params: WidenerParams,
}

impl WidenerUnit {
    pub fn new() -> Self {
        Self {
            params: WidenerParams::default(),
        }
    }
}

impl GraphNode for WidenerUnit {
    fn render_block(&mut self, left: &mut [f32], right: &mut [f32], _ctx: &RenderCtx) {
        let side_gain = 2.0 * self.params.width;
        for (l, r) in left.iter_mut().zip(right.iter_mut()) {
            let mid = (*l + *r) * 0.5;
            let side = (*l - *r) * 0.5 * side_gain;
            *l = mid + side;
            *r = mid - side;
        }
    }
}

impl Effect for WidenerUnit {
    fn configure(&mut self, params: &EffectParams) {
        if let EffectParams::Widener(p) = params {
            self.params = *p;
        }
    }
}
