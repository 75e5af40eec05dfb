/*
Session
=======

The one object a host builds. It owns everything that makes sound and
everything that listens:

    notes ─→ SynthEngine ─(mono)─→ L/R ─→ EffectsChain ─→ OutputSink
                 │                             │
                 └──────── events ─────────────┴──→ EventBus ─→ subscribers

Every mutating call goes through the session, which forwards the
components' queued events to the bus before returning.

Control changes that arrive in bursts (knobs, sliders) can be staged
instead of applied; `tick` commits each staged value once, last one wins.
Hosts call `tick` from whatever loop they already have (a UI frame, a
timer), never from the audio callback.
*/

use std::sync::Arc;

use rtrb::Consumer;
use tracing::info;

use crate::{
    config::EngineConfig,
    control::Coalescer,
    dsp::envelope::Adsr,
    effects::{
        EffectKind, EffectParams, EffectsChain, MemoryOrderStore, OrderStore, RandomizeOutcome,
        SeriesMetrics,
    },
    error::{ChainError, SynthError},
    events::{EngineEvent, EventBus},
    graph::{node::RenderCtx, output::OutputSink},
    io::NoteName,
    synth::{MessageReceiver, SynthEngine},
    wavetable::{SampleSeries, Timbre},
    MAX_BLOCK_SIZE,
};

/// What the environment turned out to provide. Missing pieces degrade the
/// session instead of failing it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Capabilities {
    /// An output sink is connected and receiving blocks.
    pub audio_output: bool,
    /// Effect order changes go to a host-provided store rather than memory.
    pub order_persistence: bool,
}

pub struct Session {
    synth: SynthEngine,
    chain: EffectsChain,
    bus: EventBus,
    staged_params: Coalescer<EffectKind, EffectParams>,
    staged_levels: Coalescer<usize, f32>,
    staged_volume: Coalescer<(), f32>,
    capabilities: Capabilities,
    output: Option<Box<dyn OutputSink>>,
    mono: Vec<f32>,
    left: Vec<f32>,
    right: Vec<f32>,
}

impl Session {
    /// Session whose effect order lives in memory only.
    pub fn new(config: EngineConfig) -> Self {
        Self::build(config, Box::new(MemoryOrderStore::new()), false)
    }

    pub fn with_store(config: EngineConfig, store: Box<dyn OrderStore>) -> Self {
        Self::build(config, store, true)
    }

    fn build(config: EngineConfig, store: Box<dyn OrderStore>, persistent: bool) -> Self {
        let chain = EffectsChain::new(config.sample_rate, store);
        let mut session = Self {
            synth: SynthEngine::new(config),
            chain,
            bus: EventBus::new(),
            staged_params: Coalescer::new(),
            staged_levels: Coalescer::new(),
            staged_volume: Coalescer::new(),
            capabilities: Capabilities {
                audio_output: false,
                order_persistence: persistent,
            },
            output: None,
            mono: vec![0.0; MAX_BLOCK_SIZE],
            left: vec![0.0; MAX_BLOCK_SIZE],
            right: vec![0.0; MAX_BLOCK_SIZE],
        };
        // Nobody is subscribed yet; construction noise is not news.
        session.synth.drain_events().for_each(drop);
        session.chain.drain_events().for_each(drop);
        session
    }

    pub fn synth(&self) -> &SynthEngine {
        &self.synth
    }

    pub fn chain(&self) -> &EffectsChain {
        &self.chain
    }

    pub fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    pub fn subscribe(&mut self, capacity: usize) -> Consumer<EngineEvent> {
        self.bus.subscribe(capacity)
    }

    pub fn connect_output(&mut self, sink: Box<dyn OutputSink>) {
        self.output = Some(sink);
        self.capabilities.audio_output = true;
        info!("output connected");
    }

    pub fn disconnect_output(&mut self) -> Option<Box<dyn OutputSink>> {
        self.capabilities.audio_output = false;
        self.output.take()
    }

    pub fn start(&mut self) {
        self.synth.start();
    }

    fn flush(&mut self) {
        self.bus.publish_all(self.synth.drain_events());
        self.bus.publish_all(self.chain.drain_events());
    }

    // Synth -----------------------------------------------------------------

    pub fn set_wavetable(&mut self, layer: usize, series: &SampleSeries) -> Result<(), SynthError> {
        let result = self.synth.set_wavetable(layer, series);
        self.flush();
        result
    }

    pub fn assign_timbre(&mut self, layer: usize, timbre: Arc<Timbre>) -> Result<(), SynthError> {
        let result = self.synth.assign_timbre(layer, timbre);
        self.flush();
        result
    }

    pub fn clear_wavetable(&mut self, layer: usize) -> Result<(), SynthError> {
        let result = self.synth.clear_wavetable(layer);
        self.flush();
        result
    }

    pub fn set_layer_level(&mut self, layer: usize, level: f32) -> Result<(), SynthError> {
        let result = self.synth.set_layer_level(layer, level);
        self.flush();
        result
    }

    /// Queue a level for the next `tick`. The index is checked now so a bad
    /// one never sits in the queue.
    pub fn stage_layer_level(&mut self, layer: usize, level: f32) -> Result<(), SynthError> {
        self.synth.layer(layer)?;
        self.staged_levels.stage(layer, level);
        Ok(())
    }

    pub fn set_envelope(&mut self, shape: Adsr) {
        self.synth.set_envelope(shape);
    }

    pub fn set_volume(&mut self, volume: f32) {
        self.synth.set_volume(volume);
        self.flush();
    }

    pub fn stage_volume(&mut self, volume: f32) {
        self.staged_volume.stage((), volume);
    }

    pub fn note_on(&mut self, note: NoteName, velocity: f32) {
        self.synth.note_on(note, velocity);
        self.flush();
    }

    pub fn note_off(&mut self, note: NoteName) {
        self.synth.note_off(note);
        self.flush();
    }

    pub fn all_notes_off(&mut self) {
        self.synth.all_notes_off();
        self.flush();
    }

    pub fn process_messages<R: MessageReceiver>(&mut self, rx: &mut R) {
        self.synth.process_messages(rx);
        self.flush();
    }

    // Effects ---------------------------------------------------------------

    pub fn set_effect_enabled(&mut self, kind: EffectKind, enabled: bool) {
        self.chain.set_enabled(kind, enabled);
        self.flush();
    }

    pub fn reorder_effects(&mut self, order: &[EffectKind]) -> Result<(), ChainError> {
        let result = self.chain.reorder(order);
        self.flush();
        result
    }

    pub fn reorder_effect_ids<S: AsRef<str>>(&mut self, ids: &[S]) -> Result<(), ChainError> {
        let result = self.chain.reorder_ids(ids);
        self.flush();
        result
    }

    pub fn set_effect_params(&mut self, params: EffectParams) {
        self.chain.set_params(params);
        self.flush();
    }

    /// Queue parameters for the next `tick`; a later record for the same
    /// kind replaces this one.
    pub fn stage_effect_params(&mut self, params: EffectParams) {
        self.staged_params.stage(params.kind(), params);
    }

    /// Reroll the rack. With metrics, the synth also takes the envelope the
    /// chaos score maps to.
    pub fn randomize_effects(&mut self, metrics: Option<&SeriesMetrics>, seed: u64) -> RandomizeOutcome {
        let outcome = self.chain.randomize(metrics, seed);
        if let Some(shape) = outcome.envelope {
            self.synth.set_envelope(shape);
        }
        self.flush();
        outcome
    }

    pub fn reset_effects(&mut self) {
        self.chain.reset();
        self.flush();
    }

    // Clock -----------------------------------------------------------------

    /// Commit everything staged since the last tick, once per key. Returns
    /// how many values were committed.
    pub fn tick(&mut self) -> usize {
        let mut committed = 0;

        for (_, params) in self.staged_params.drain() {
            self.chain.set_params(params);
            committed += 1;
        }
        for (layer, level) in self.staged_levels.drain() {
            // Indices were checked when staged.
            if self.synth.set_layer_level(layer, level).is_ok() {
                committed += 1;
            }
        }
        for ((), volume) in self.staged_volume.drain() {
            self.synth.set_volume(volume);
            committed += 1;
        }

        self.flush();
        committed
    }

    /// Render `frames` stereo frames into the connected sink. Without a sink
    /// the clock still advances.
    pub fn render(&mut self, frames: usize) {
        let mut remaining = frames;
        while remaining > 0 {
            let n = remaining.min(MAX_BLOCK_SIZE);
            let (left, right) = (&mut self.left[..n], &mut self.right[..n]);
            Self::process_block(&mut self.synth, &mut self.chain, &mut self.mono, left, right);

            if let Some(sink) = self.output.as_mut() {
                sink.consume(&self.left[..n], &self.right[..n]);
            }
            remaining -= n;
        }
    }

    /// Render into caller buffers of equal length, bypassing the sink.
    pub fn render_stereo(&mut self, left: &mut [f32], right: &mut [f32]) {
        debug_assert_eq!(left.len(), right.len());
        for (l, r) in left
            .chunks_mut(MAX_BLOCK_SIZE)
            .zip(right.chunks_mut(MAX_BLOCK_SIZE))
        {
            Self::process_block(&mut self.synth, &mut self.chain, &mut self.mono, l, r);
        }
    }

    fn process_block(
        synth: &mut SynthEngine,
        chain: &mut EffectsChain,
        mono: &mut [f32],
        left: &mut [f32],
        right: &mut [f32],
    ) {
        let n = left.len().min(right.len());
        let ctx = RenderCtx::new(synth.config().sample_rate).at_frame(synth.frame());

        let mono = &mut mono[..n];
        synth.render(mono);
        left[..n].copy_from_slice(mono);
        right[..n].copy_from_slice(mono);

        chain.render(&mut left[..n], &mut right[..n], &ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects::params::DelayParams;
    use rtrb::RingBuffer;

    fn readings() -> SampleSeries {
        let values = (0..288)
            .map(|i| 110.0 + 50.0 * (i as f64 / 20.0).sin())
            .collect();
        SampleSeries::new("tuesday", values)
    }

    fn events(rx: &mut Consumer<EngineEvent>) -> Vec<EngineEvent> {
        std::iter::from_fn(|| rx.pop().ok()).collect()
    }

    fn session() -> Session {
        let mut s = Session::new(EngineConfig::default());
        s.start();
        s.set_wavetable(0, &readings()).unwrap();
        s
    }

    #[test]
    fn test_staged_params_commit_once_per_tick() {
        let mut s = session();
        let mut rx = s.subscribe(64);

        for feedback in [0.1, 0.2, 0.7] {
            s.stage_effect_params(EffectParams::Delay(DelayParams {
                time: 0.3,
                feedback,
                wet: 0.5,
            }));
        }
        assert_eq!(s.chain().params(EffectKind::Delay).get("feedback"), Some(0.5));
        assert!(events(&mut rx).is_empty());

        assert_eq!(s.tick(), 1);
        assert_eq!(s.chain().params(EffectKind::Delay).get("feedback"), Some(0.7));

        let changed = events(&mut rx)
            .into_iter()
            .filter(|e| matches!(e, EngineEvent::ParamsChanged { .. }))
            .count();
        assert_eq!(changed, 1);
        assert_eq!(s.tick(), 0);
    }

    #[test]
    fn test_staged_volume_and_levels() {
        let mut s = session();
        s.stage_volume(0.2);
        s.stage_volume(0.5);
        s.stage_layer_level(0, 0.0).unwrap();
        s.stage_layer_level(0, 1.0).unwrap();
        assert!(s.stage_layer_level(7, 1.0).is_err());

        assert_eq!(s.tick(), 2);
        assert_eq!(s.synth().user_volume(), 0.5);
        assert!((s.synth().master_gain() - 0.5).abs() < 1e-5);
    }

    #[test]
    fn test_notes_reach_the_sink() {
        let mut s = session();
        let (tx, mut rx) = RingBuffer::<f32>::new(2 * 4800);
        s.connect_output(Box::new(tx));
        assert!(s.capabilities().audio_output);

        s.note_on("A4".parse().unwrap(), 1.0);
        s.render(4800);

        let samples: Vec<f32> = std::iter::from_fn(|| rx.pop().ok()).collect();
        assert_eq!(samples.len(), 2 * 4800);
        assert!(samples.iter().any(|s| s.abs() > 1e-3));
        assert!(samples.iter().all(|s| s.is_finite()));
    }

    #[test]
    fn test_dry_render_is_centered() {
        let mut s = session();
        s.note_on("C4".parse().unwrap(), 0.8);

        let mut left = vec![0.0; 3000];
        let mut right = vec![0.0; 3000];
        s.render_stereo(&mut left, &mut right);
        assert_eq!(left, right);
        assert_eq!(s.synth().frame(), 3000);
    }

    #[test]
    fn test_observers_see_note_and_chain_events() {
        let mut s = session();
        let mut rx = s.subscribe(64);
        let c4: NoteName = "C4".parse().unwrap();

        s.note_on(c4, 1.0);
        s.set_effect_enabled(EffectKind::Reverb, true);
        s.note_off(c4);

        assert_eq!(
            events(&mut rx),
            vec![
                EngineEvent::NoteStarted { note: c4, voices: 1 },
                EngineEvent::ChainRewired {
                    active: vec![EffectKind::Reverb]
                },
                EngineEvent::NoteStopped { note: c4 },
            ]
        );
    }

    #[test]
    fn test_randomize_with_metrics_sets_envelope() {
        let mut s = session();
        let metrics = SeriesMetrics::from_values(
            &[60.0, 250.0, 90.0, 310.0, 70.0],
            &Default::default(),
        );
        let outcome = s.randomize_effects(Some(&metrics), 5);

        assert_eq!(outcome.envelope, Some(s.synth().envelope()));
        assert_eq!(s.chain().active_path().len(), outcome.enabled.len());

        let before = s.synth().envelope();
        s.randomize_effects(None, 6);
        assert_eq!(s.synth().envelope(), before);
    }

    #[test]
    fn test_direct_params_and_reset() {
        let mut s = session();
        let mut rx = s.subscribe(64);

        s.set_effect_enabled(EffectKind::Delay, true);
        s.set_effect_params(EffectParams::Delay(DelayParams {
            time: 0.3,
            feedback: 0.6,
            wet: 0.5,
        }));
        assert_eq!(s.chain().params(EffectKind::Delay).get("feedback"), Some(0.6));

        s.reset_effects();
        assert!(s.chain().active_path().is_empty());
        assert_eq!(
            s.chain().params(EffectKind::Delay),
            &EffectParams::default_for(EffectKind::Delay)
        );
        assert_eq!(
            events(&mut rx).last(),
            Some(&EngineEvent::ChainRewired { active: vec![] })
        );
    }

    #[test]
    fn test_disconnected_sink_stops_receiving() {
        let mut s = session();
        let (tx, mut rx) = RingBuffer::<f32>::new(2 * 256);
        s.connect_output(Box::new(tx));
        assert!(s.disconnect_output().is_some());
        assert!(!s.capabilities().audio_output);

        s.note_on("A4".parse().unwrap(), 1.0);
        s.render(256);
        assert!(rx.pop().is_err());
    }

    #[test]
    fn test_store_flag_reflects_persistence() {
        let s = Session::new(EngineConfig::default());
        assert!(!s.capabilities().order_persistence);
        assert!(!s.capabilities().audio_output);

        let s = Session::with_store(EngineConfig::default(), Box::new(MemoryOrderStore::new()));
        assert!(s.capabilities().order_persistence);
    }
}
