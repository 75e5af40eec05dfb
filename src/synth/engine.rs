/*
Layered Engine
==============

            ┌──────────── layer 0 (pool, timbre, level) ─┐
  note_on ─→├──────────── layer 1 (pool, timbre, level) ─┼─→ Σ ─→ × master ─→ out
            └──────────── layer 2 (pool, timbre, level) ─┘

A note asks every active layer for one voice. Whatever it gets is recorded
under the note name, and note_off releases exactly that set later, no matter
what happened to the layers' timbres in between.

Gain compensation
-----------------
Uncorrelated signals add in power, so N equal layers are about sqrt(N)
louder than one:

    master = user_volume / sqrt(active_layers)     (0 active ⇒ divisor 1)

then clamped in dB to [gain_floor_db, gain_ceiling_db].

Scheduling
----------
Starts and releases land `lookahead` frames after the current clock so that
a change issued between two render calls never falls on a block boundary.
*/

use std::{collections::HashMap, sync::Arc};

use tracing::{debug, info, warn};

use crate::{
    config::EngineConfig,
    dsp::{envelope::Adsr, mix},
    error::SynthError,
    events::EngineEvent,
    graph::node::RenderCtx,
    io::NoteName,
    synth::{
        layer::{OscillatorLayer, VoiceId},
        message::{MessageReceiver, SynthMessage},
    },
    wavetable::{SampleSeries, Timbre, WavetableGenerator},
    LAYER_COUNT, MAX_BLOCK_SIZE,
};

type NoteVoices = [Option<VoiceId>; LAYER_COUNT];

pub struct SynthEngine {
    config: EngineConfig,
    layers: [OscillatorLayer; LAYER_COUNT],
    generator: WavetableGenerator,
    notes: HashMap<NoteName, NoteVoices>,
    envelope: Adsr,
    user_volume: f32,
    master_gain: f32,
    frame: u64,
    lookahead: u64,
    started: bool,
    outbox: Vec<EngineEvent>,
}

impl SynthEngine {
    pub fn new(config: EngineConfig) -> Self {
        let envelope = Adsr::default();
        let layers = std::array::from_fn(|_| OscillatorLayer::new(config.voices_per_layer, envelope));

        let mut engine = Self {
            generator: WavetableGenerator::from_config(&config),
            lookahead: config.lookahead_frames(),
            user_volume: config.user_volume.clamp(0.0, 1.0),
            notes: HashMap::with_capacity(config.voices_per_layer * LAYER_COUNT),
            config,
            layers,
            envelope,
            master_gain: 0.0,
            frame: 0,
            started: false,
            outbox: Vec::new(),
        };
        engine.master_gain = engine.compute_gain();
        engine
    }

    /// Allow `note_on` to sound. Hosts call this once their audio output is up.
    pub fn start(&mut self) {
        if !self.started {
            info!(sample_rate = self.config.sample_rate, "synth engine started");
        }
        self.started = true;
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    // Layers ----------------------------------------------------------------

    /// Generate a timbre from `series` and give it to `layer`.
    pub fn set_wavetable(&mut self, layer: usize, series: &SampleSeries) -> Result<(), SynthError> {
        Self::check_layer(layer)?;
        let timbre = self.generator.generate(series)?;
        self.assign_timbre(layer, timbre)
    }

    /// Swap in a timbre built elsewhere (e.g. off the render thread).
    pub fn assign_timbre(&mut self, layer: usize, timbre: Arc<Timbre>) -> Result<(), SynthError> {
        Self::check_layer(layer)?;
        let label = timbre.label.clone();
        self.layers[layer].assign(Some(timbre));

        debug!(layer, %label, "timbre assigned");
        self.outbox.push(EngineEvent::TimbreAssigned { layer, label });
        self.update_gain();
        Ok(())
    }

    pub fn clear_wavetable(&mut self, layer: usize) -> Result<(), SynthError> {
        Self::check_layer(layer)?;
        self.layers[layer].assign(None);

        self.outbox.push(EngineEvent::TimbreCleared { layer });
        self.update_gain();
        Ok(())
    }

    pub fn set_layer_level(&mut self, layer: usize, level: f32) -> Result<(), SynthError> {
        Self::check_layer(layer)?;
        self.layers[layer].set_level(level);
        self.update_gain();
        Ok(())
    }

    pub fn layer(&self, layer: usize) -> Result<&OscillatorLayer, SynthError> {
        Self::check_layer(layer)?;
        Ok(&self.layers[layer])
    }

    pub fn active_layer_count(&self) -> usize {
        self.layers.iter().filter(|l| l.is_active()).count()
    }

    fn check_layer(layer: usize) -> Result<(), SynthError> {
        if layer < LAYER_COUNT {
            Ok(())
        } else {
            Err(SynthError::InvalidLayer(layer))
        }
    }

    // Envelope & gain -------------------------------------------------------

    /// One envelope shape for every voice of every layer.
    pub fn set_envelope(&mut self, shape: Adsr) {
        self.envelope = shape;
        for layer in &mut self.layers {
            layer.set_envelope(shape);
        }
    }

    pub fn envelope(&self) -> Adsr {
        self.envelope
    }

    pub fn set_volume(&mut self, volume: f32) {
        self.user_volume = if volume.is_finite() {
            volume.clamp(0.0, 1.0)
        } else {
            0.0
        };
        self.update_gain();
    }

    pub fn user_volume(&self) -> f32 {
        self.user_volume
    }

    pub fn master_gain(&self) -> f32 {
        self.master_gain
    }

    fn compute_gain(&self) -> f32 {
        let active = self.active_layer_count();
        let divisor = if active == 0 { 1.0 } else { (active as f32).sqrt() };

        let db = mix::gain_to_db(self.user_volume / divisor)
            .clamp(self.config.gain_floor_db, self.config.gain_ceiling_db);
        mix::db_to_gain(db)
    }

    fn update_gain(&mut self) {
        let gain = self.compute_gain();
        if gain != self.master_gain {
            self.master_gain = gain;
            self.outbox.push(EngineEvent::GainChanged { gain });
        }
    }

    // Notes -----------------------------------------------------------------

    pub fn note_on(&mut self, note: NoteName, velocity: f32) {
        if !self.started {
            warn!(%note, "note_on before start, ignored");
            return;
        }
        if self.notes.contains_key(&note) {
            return;
        }

        let start = self.frame + self.lookahead;
        let frequency = note.frequency();
        let velocity = velocity.clamp(0.0, 1.0);

        let mut voices: NoteVoices = [None; LAYER_COUNT];
        for (index, layer) in self.layers.iter_mut().enumerate() {
            if !layer.is_active() {
                continue;
            }
            match layer.allocate() {
                Some(id) => {
                    layer.trigger(id, frequency, velocity, start);
                    voices[index] = Some(id);
                }
                None => {
                    debug!(%note, layer = index, "voice pool exhausted");
                    self.outbox.push(EngineEvent::VoiceDropped { note, layer: index });
                }
            }
        }

        let count = voices.iter().flatten().count();
        if count > 0 {
            self.notes.insert(note, voices);
            self.outbox.push(EngineEvent::NoteStarted { note, voices: count });
        }
    }

    pub fn note_off(&mut self, note: NoteName) {
        let Some(voices) = self.notes.remove(&note) else {
            return;
        };

        let at = self.frame + self.lookahead;
        for (layer, id) in self.layers.iter_mut().zip(voices) {
            if let Some(id) = id {
                layer.release(id, at);
            }
        }
        self.outbox.push(EngineEvent::NoteStopped { note });
    }

    pub fn all_notes_off(&mut self) {
        let held: Vec<NoteName> = self.notes.keys().copied().collect();
        for note in held {
            self.note_off(note);
        }
    }

    pub fn is_note_held(&self, note: NoteName) -> bool {
        self.notes.contains_key(&note)
    }

    pub fn held_notes(&self) -> usize {
        self.notes.len()
    }

    pub fn process_messages<R: MessageReceiver>(&mut self, rx: &mut R) {
        while let Some(msg) = rx.pop() {
            match msg {
                SynthMessage::NoteOn { note, velocity } => self.note_on(note, velocity),
                SynthMessage::NoteOff { note } => self.note_off(note),
                SynthMessage::AllNotesOff => self.all_notes_off(),
            }
        }
    }

    // Rendering -------------------------------------------------------------

    /// Frame clock at the start of the next block.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Render a mono block and advance the clock.
    pub fn render(&mut self, out: &mut [f32]) {
        for chunk in out.chunks_mut(MAX_BLOCK_SIZE) {
            chunk.fill(0.0);
            let ctx = RenderCtx::new(self.config.sample_rate).at_frame(self.frame);

            for layer in &mut self.layers {
                layer.render(chunk, &ctx);
            }
            mix::scale_in_place(chunk, self.master_gain);

            self.frame += chunk.len() as u64;
        }
    }

    /// Take the events queued since the last call.
    pub fn drain_events(&mut self) -> std::vec::Drain<'_, EngineEvent> {
        self.outbox.drain(..)
    }
}
