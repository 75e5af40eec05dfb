use crate::{
    dsp::{
        delay::DelayLine,
        lfo::{bipolar_to_unipolar, Lfo},
        mix::blend_dry_wet,
    },
    effects::{
        params::{ChorusParams, TremoloParams, VibratoParams},
        EffectParams,
    },
    graph::node::{GraphNode, RenderCtx},
};

use super::Effect;

/// Longest chorus delay: delay_ms at its max plus full-depth modulation.
const CHORUS_MAX_SECS: f32 = 0.045;
/// Vibrato sweeps up to this much delay at depth 1.0.
const VIBRATO_MAX_SECS: f32 = 0.005;

/*
Chorus
======

Each channel reads a delay line whose length wobbles around `delay_ms`:

    delay = delay_ms · (1 + depth · lfo)        lfo ∈ [0, 1]

The right LFO runs a quarter cycle behind the left so the copies drift
apart in the stereo field.
*/
pub struct ChorusUnit {
    params: ChorusParams,
    lfos: [Lfo; 2],
    lines: [DelayLine; 2],
}

impl ChorusUnit {
    pub fn new(sample_rate: f32) -> Self {
        let p = ChorusParams::default();
        Self {
            params: p,
            lfos: [Lfo::sine(p.rate), Lfo::sine(p.rate).with_phase(0.25)],
            lines: [
                DelayLine::with_duration(CHORUS_MAX_SECS, sample_rate),
                DelayLine::with_duration(CHORUS_MAX_SECS, sample_rate),
            ],
        }
    }
}

impl GraphNode for ChorusUnit {
    fn render_block(&mut self, left: &mut [f32], right: &mut [f32], ctx: &RenderCtx) {
        let p = self.params;
        let base = p.delay_ms * ctx.sample_rate / 1000.0;

        for (l, r) in left.iter_mut().zip(right.iter_mut()) {
            for ((lfo, line), sample) in self
                .lfos
                .iter_mut()
                .zip(self.lines.iter_mut())
                .zip([&mut *l, &mut *r])
            {
                let wobble = bipolar_to_unipolar(lfo.next_sample(ctx.sample_rate));
                let wet = line.read_interpolated(base * (1.0 + p.depth * wobble));
                line.write(*sample);
                *sample = blend_dry_wet(*sample, wet, p.wet);
            }
        }
    }

    fn reset(&mut self) {
        self.lfos.iter_mut().for_each(Lfo::reset);
        self.lines.iter_mut().for_each(DelayLine::reset);
    }
}

impl Effect for ChorusUnit {
    fn configure(&mut self, params: &EffectParams) {
        if let EffectParams::Chorus(p) = params {
            self.params = *p;
            for lfo in &mut self.lfos {
                lfo.set_frequency(p.rate);
            }
        }
    }
}

/// Amplitude modulation, channels half a cycle apart.
pub struct TremoloUnit {
    params: TremoloParams,
    lfos: [Lfo; 2],
}

impl TremoloUnit {
    pub fn new() -> Self {
        let p = TremoloParams::default();
        Self {
            params: p,
            lfos: [Lfo::sine(p.rate), Lfo::sine(p.rate).with_phase(0.5)],
        }
    }
}

impl GraphNode for TremoloUnit {
    fn render_block(&mut self, left: &mut [f32], right: &mut [f32], ctx: &RenderCtx) {
        let p = self.params;
        for (l, r) in left.iter_mut().zip(right.iter_mut()) {
            for (lfo, sample) in self.lfos.iter_mut().zip([&mut *l, &mut *r]) {
                let gain = 1.0 - p.depth * bipolar_to_unipolar(lfo.next_sample(ctx.sample_rate));
                *sample = blend_dry_wet(*sample, *sample * gain, p.wet);
            }
        }
    }

    fn reset(&mut self) {
        self.lfos.iter_mut().for_each(Lfo::reset);
    }
}

impl Effect for TremoloUnit {
    fn configure(&mut self, params: &EffectParams) {
        if let EffectParams::Tremolo(p) = params {
            self.params = *p;
            for lfo in &mut self.lfos {
                lfo.set_frequency(p.rate);
            }
        }
    }
}

/// Pitch wobble from a short modulated delay, no dry path inside the delay.
pub struct VibratoUnit {
    params: VibratoParams,
    lfo: Lfo,
    lines: [DelayLine; 2],
}

impl VibratoUnit {
    pub fn new(sample_rate: f32) -> Self {
        let p = VibratoParams::default();
        Self {
            params: p,
            lfo: Lfo::sine(p.rate),
            lines: [
                DelayLine::with_duration(VIBRATO_MAX_SECS, sample_rate),
                DelayLine::with_duration(VIBRATO_MAX_SECS, sample_rate),
            ],
        }
    }
}

impl GraphNode for VibratoUnit {
    fn render_block(&mut self, left: &mut [f32], right: &mut [f32], ctx: &RenderCtx) {
        let p = self.params;
        let span = VIBRATO_MAX_SECS * ctx.sample_rate * p.depth;

        for (l, r) in left.iter_mut().zip(right.iter_mut()) {
            let delay = 1.0 + span * bipolar_to_unipolar(self.lfo.next_sample(ctx.sample_rate));
            for (line, sample) in self.lines.iter_mut().zip([&mut *l, &mut *r]) {
                let wet = line.read_interpolated(delay);
                line.write(*sample);
                *sample = blend_dry_wet(*sample, wet, p.wet);
            }
        }
    }

    fn reset(&mut self) {
        self.lfo.reset();
        self.lines.iter_mut().for_each(DelayLine::reset);
    }
}

impl Effect for VibratoUnit {
    fn configure(&mut self, params: &EffectParams) {
        if let EffectParams::Vibrato(p) = params {
            self.params = *p;
            self.lfo.set_frequency(p.rate);
        }
    }
}
