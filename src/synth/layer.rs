/*
Voice Pool
==========

Each layer owns a fixed arena of voices addressed by index:

    voices:  [ v0 ][ v1 ][ v2 ][ v3 ] ... [ vN-1 ]
    free:    front → [ 2, 3, ..., 0 ] ← back

allocate() takes from the front, release() appends at the back. Both are
O(1) and never allocate. There is no voice stealing: when the queue is empty
the layer simply declines the note.

A released voice rejoins the queue immediately even though its envelope is
still fading. Because it goes to the back, the voices that have been idle
longest are handed out first and a fresh tail is only cut when the pool is
nearly exhausted. Even then the tail rings until the new note's start frame.
*/

use std::{collections::VecDeque, sync::Arc};

use crate::{
    dsp::{envelope::Adsr, mix},
    graph::node::RenderCtx,
    synth::voice::{Voice, VoiceState},
    wavetable::Timbre,
    MAX_BLOCK_SIZE,
};

/// Stable index of a voice inside its layer's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VoiceId(pub(crate) usize);

impl VoiceId {
    pub fn index(self) -> usize {
        self.0
    }
}

pub struct OscillatorLayer {
    voices: Vec<Voice>,
    allocated: Vec<bool>,
    free: VecDeque<VoiceId>,
    timbre: Option<Arc<Timbre>>,
    level: f32,
    scratch: Vec<f32>,
}

impl OscillatorLayer {
    pub fn new(pool_size: usize, shape: Adsr) -> Self {
        Self {
            voices: (0..pool_size).map(|_| Voice::new(shape)).collect(),
            allocated: vec![false; pool_size],
            free: (0..pool_size).map(VoiceId).collect(),
            timbre: None,
            level: 1.0,
            scratch: vec![0.0; MAX_BLOCK_SIZE],
        }
    }

    pub fn allocate(&mut self) -> Option<VoiceId> {
        let id = self.free.pop_front()?;
        self.allocated[id.0] = true;
        Some(id)
    }

    /// Start the voice's release at `at_frame` and return it to the pool.
    ///
    /// Returns `false` if the voice was not allocated (double release).
    pub fn release(&mut self, id: VoiceId, at_frame: u64) -> bool {
        match self.allocated.get_mut(id.0) {
            Some(slot) if *slot => {
                *slot = false;
                self.voices[id.0].release(at_frame);
                self.free.push_back(id);
                true
            }
            _ => false,
        }
    }

    /// Bind the current timbre to an allocated voice and schedule its start.
    pub fn trigger(&mut self, id: VoiceId, frequency: f32, velocity: f32, start_frame: u64) -> bool {
        if !self.allocated.get(id.0).copied().unwrap_or(false) {
            return false;
        }
        self.voices[id.0].trigger(self.timbre.clone(), frequency, velocity, start_frame);
        true
    }

    /// Swap the timbre used by future triggers. Sounding voices keep theirs.
    pub fn assign(&mut self, timbre: Option<Arc<Timbre>>) {
        self.timbre = timbre;
    }

    pub fn timbre(&self) -> Option<&Arc<Timbre>> {
        self.timbre.as_ref()
    }

    pub fn set_level(&mut self, level: f32) {
        self.level = if level.is_finite() {
            level.clamp(0.0, 1.0)
        } else {
            0.0
        };
    }

    pub fn level(&self) -> f32 {
        self.level
    }

    pub fn set_envelope(&mut self, shape: Adsr) {
        for voice in &mut self.voices {
            voice.set_shape(shape);
        }
    }

    /// A layer takes part in new notes only with a timbre and a level above 0.
    pub fn is_active(&self) -> bool {
        self.timbre.is_some() && self.level > 0.0
    }

    pub fn capacity(&self) -> usize {
        self.voices.len()
    }

    pub fn allocated_count(&self) -> usize {
        self.voices.len() - self.free.len()
    }

    /// Voices still producing sound, including release tails.
    pub fn sounding_count(&self) -> usize {
        self.voices
            .iter()
            .filter(|v| v.state() != VoiceState::Idle)
            .count()
    }

    pub fn voice(&self, id: VoiceId) -> Option<&Voice> {
        self.voices.get(id.0)
    }

    /// Mix every voice into `out`, scaled by the layer level.
    /// `out` must not exceed `MAX_BLOCK_SIZE`.
    pub fn render(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        let len = out.len().min(self.scratch.len());
        let scratch = &mut self.scratch[..len];
        scratch.fill(0.0);

        for voice in self.voices.iter_mut().filter(|v| !v.is_idle()) {
            voice.render(scratch, ctx);
        }

        mix::sum_scaled_in_place(&mut out[..len], scratch, self.level);
    }
}
