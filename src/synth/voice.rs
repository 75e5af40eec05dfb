use std::sync::Arc;

use crate::{
    dsp::{
        envelope::{Adsr, Envelope},
        oscillator::TableOscillator,
    },
    graph::node::RenderCtx,
    wavetable::Timbre,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoiceState {
    Idle,      // Silent, tail finished
    Sounding,  // Attack/decay/sustain running (or waiting for its start frame)
    Releasing, // Envelope fading after note-off
}

/// A trigger waiting for its start frame.
struct PendingNote {
    timbre: Option<Arc<Timbre>>,
    frequency: f32,
    velocity: f32,
    start_frame: u64,
    release_at: Option<u64>,
}

/// One table oscillator behind one envelope.
///
/// Start and release are scheduled on the engine's frame clock and applied
/// sample-accurately inside `render`. The timbre is bound at trigger time and
/// kept until the voice is triggered again. Until a new trigger reaches its
/// start frame the previous note keeps ringing out.
pub struct Voice {
    state: VoiceState,
    envelope: Envelope,
    oscillator: TableOscillator,
    timbre: Option<Arc<Timbre>>,
    frequency: f32,
    velocity: f32,
    pending: Option<PendingNote>,
    release_at: Option<u64>,
}

impl Voice {
    pub fn new(shape: Adsr) -> Self {
        Self {
            state: VoiceState::Idle,
            envelope: Envelope::new(shape),
            oscillator: TableOscillator::new(),
            timbre: None,
            frequency: 0.0,
            velocity: 0.0,
            pending: None,
            release_at: None,
        }
    }

    pub fn trigger(
        &mut self,
        timbre: Option<Arc<Timbre>>,
        frequency: f32,
        velocity: f32,
        start_frame: u64,
    ) {
        self.pending = Some(PendingNote {
            timbre,
            frequency,
            velocity: velocity.clamp(0.0, 1.0),
            start_frame,
            release_at: None,
        });
        self.state = VoiceState::Sounding;
    }

    pub fn release(&mut self, at_frame: u64) {
        if self.state != VoiceState::Sounding {
            return;
        }
        self.state = VoiceState::Releasing;
        match &mut self.pending {
            Some(note) => note.release_at = Some(at_frame),
            None => self.release_at = Some(at_frame),
        }
    }

    /// Cut whatever is still ringing and start the pending note from zero.
    fn begin(&mut self, note: PendingNote) {
        self.timbre = note.timbre;
        self.frequency = note.frequency;
        self.velocity = note.velocity;
        self.release_at = note.release_at;

        self.envelope.reset();
        self.oscillator.reset();
        self.envelope.note_on();
    }

    pub fn set_shape(&mut self, shape: Adsr) {
        self.envelope.set_shape(shape);
    }

    /// Add this voice's output into `out`.
    pub fn render(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        if self.state == VoiceState::Idle {
            return;
        }

        for (i, sample) in out.iter_mut().enumerate() {
            let frame = ctx.frame + i as u64;

            if self
                .pending
                .as_ref()
                .is_some_and(|note| frame >= note.start_frame)
            {
                if let Some(note) = self.pending.take() {
                    self.begin(note);
                }
            }

            if let Some(release) = self.release_at {
                if frame >= release {
                    self.envelope.note_off(ctx);
                    self.release_at = None;
                }
            }

            if !self.envelope.is_active() {
                if self.pending.is_some() {
                    continue;
                }
                self.state = VoiceState::Idle;
                return;
            }

            let level = self.envelope.next_sample(ctx);
            if !self.envelope.is_active() && self.pending.is_none() {
                self.state = VoiceState::Idle;
                return;
            }

            if let Some(timbre) = &self.timbre {
                let table = timbre.playback_table();
                *sample += self
                    .oscillator
                    .next_sample(table, self.frequency, ctx.sample_rate)
                    * level
                    * self.velocity;
            }
        }
    }

    pub fn state(&self) -> VoiceState {
        self.state
    }

    pub fn is_idle(&self) -> bool {
        self.state == VoiceState::Idle
    }

    /// Timbre of the latest trigger, even if it has not started yet.
    pub fn timbre(&self) -> Option<&Arc<Timbre>> {
        match &self.pending {
            Some(note) => note.timbre.as_ref(),
            None => self.timbre.as_ref(),
        }
    }

    pub fn frequency(&self) -> f32 {
        self.pending
            .as_ref()
            .map_or(self.frequency, |note| note.frequency)
    }
}
