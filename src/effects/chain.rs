/*
Effects Chain
=============

Fifteen units, one of each kind, live in a fixed table. What changes is the
order they are visited in and which of them are switched on:

    order   : [compressor, eq3, bitcrusher, ..., reverb, widener]   (a permutation)
    enabled : { distortion, chorus, reverb }
    active  : [distortion, chorus, reverb]                          (order ∩ enabled)

`render` walks only `active`. Every topology change rebuilds the active path
from scratch and replaces it in a single assignment, so a render never sees a
half-edited path.

Disabled units keep their parameters and are simply skipped. Orders come from
and go to an `OrderStore`; a bad stored order never prevents the chain from
starting.
*/

use tracing::{debug, info, warn};

use crate::{
    dsp::envelope::Adsr,
    error::ChainError,
    events::EngineEvent,
    graph::node::{GraphNode, RenderCtx},
};

use super::{
    persist::{self, MemoryOrderStore, OrderStore},
    randomize::{self, SeriesMetrics},
    unit::EffectUnit,
    EffectKind, EffectParams,
};

/// What a randomize call did, for the caller to apply elsewhere
/// (the envelope goes to the synth).
#[derive(Debug, Clone, PartialEq)]
pub struct RandomizeOutcome {
    pub enabled: Vec<EffectKind>,
    pub chaos: Option<f32>,
    pub envelope: Option<Adsr>,
}

pub struct EffectsChain {
    /// Indexed by `EffectKind::index`.
    units: Vec<EffectUnit>,
    order: Vec<EffectKind>,
    active: Vec<EffectKind>,
    store: Box<dyn OrderStore>,
    outbox: Vec<EngineEvent>,
}

impl EffectsChain {
    pub fn new(sample_rate: f32, mut store: Box<dyn OrderStore>) -> Self {
        let order = persist::load_order(store.as_mut());
        let units = EffectKind::ALL
            .iter()
            .map(|&kind| EffectUnit::new(kind, sample_rate))
            .collect();

        Self {
            units,
            order,
            active: Vec::with_capacity(EffectKind::COUNT),
            store,
            outbox: Vec::new(),
        }
    }

    pub fn with_memory_store(sample_rate: f32) -> Self {
        Self::new(sample_rate, Box::new(MemoryOrderStore::new()))
    }

    pub fn order(&self) -> &[EffectKind] {
        &self.order
    }

    /// Enabled units in processing order.
    pub fn active_path(&self) -> &[EffectKind] {
        &self.active
    }

    pub fn unit(&self, kind: EffectKind) -> &EffectUnit {
        &self.units[kind.index()]
    }

    pub fn is_enabled(&self, kind: EffectKind) -> bool {
        self.unit(kind).is_enabled()
    }

    // Topology --------------------------------------------------------------

    pub fn set_enabled(&mut self, kind: EffectKind, enabled: bool) {
        if self.units[kind.index()].set_enabled(enabled) {
            debug!(%kind, enabled, "effect toggled");
            self.rewire();
        }
    }

    /// Adopt a new order. Anything but a permutation of every kind is
    /// rejected and the current order stays.
    pub fn reorder(&mut self, order: &[EffectKind]) -> Result<(), ChainError> {
        if let Err(err) = persist::validate_order(order) {
            return Err(self.reject(err));
        }
        self.commit_order(order.to_vec());
        Ok(())
    }

    /// `reorder` from string ids, e.g. as handed over by a drag-and-drop UI.
    pub fn reorder_ids<S: AsRef<str>>(&mut self, ids: &[S]) -> Result<(), ChainError> {
        match persist::decode_order(ids) {
            Ok(order) => {
                self.commit_order(order);
                Ok(())
            }
            Err(err) => Err(self.reject(err)),
        }
    }

    fn reject(&mut self, err: ChainError) -> ChainError {
        warn!(%err, "effect order rejected");
        self.outbox.push(EngineEvent::OrderRejected { reason: err.clone() });
        err
    }

    fn commit_order(&mut self, order: Vec<EffectKind>) {
        self.order = order;
        self.rewire();

        if let Err(err) = self.store.save(&persist::encode_order(&self.order)) {
            warn!(%err, "effect order not saved");
        }
    }

    fn rewire(&mut self) {
        let active: Vec<EffectKind> = self
            .order
            .iter()
            .copied()
            .filter(|kind| self.units[kind.index()].is_enabled())
            .collect();

        self.active = active;
        self.outbox.push(EngineEvent::ChainRewired {
            active: self.active.clone(),
        });
    }

    // Parameters ------------------------------------------------------------

    pub fn params(&self, kind: EffectKind) -> &EffectParams {
        self.unit(kind).params()
    }

    /// Replace a unit's parameters; the target unit is the record's kind.
    /// Values are clamped into their documented ranges.
    pub fn set_params(&mut self, params: EffectParams) {
        let kind = params.kind();
        if self.units[kind.index()].set_params(params) {
            self.outbox.push(EngineEvent::ParamsChanged { kind });
        }
    }

    /// Edit some fields of a unit's record in place.
    pub fn update_params(&mut self, kind: EffectKind, edit: impl FnOnce(&mut EffectParams)) {
        let mut params = *self.params(kind);
        edit(&mut params);
        if params.kind() != kind {
            warn!(%kind, other = %params.kind(), "parameter edit changed kind, ignored");
            return;
        }
        self.set_params(params);
    }

    /// Set one field by name. Unknown names return false.
    pub fn set_param(&mut self, kind: EffectKind, name: &str, value: f32) -> bool {
        let mut params = *self.params(kind);
        if !params.set(name, value) {
            return false;
        }
        self.set_params(params);
        true
    }

    // Whole-rack operations -------------------------------------------------

    pub fn randomize(&mut self, metrics: Option<&SeriesMetrics>, seed: u64) -> RandomizeOutcome {
        let plan = randomize::plan(metrics, seed);

        for (unit, params) in self.units.iter_mut().zip(plan.params) {
            unit.set_params(params);
            unit.set_enabled(plan.enabled.contains(&unit.kind()));
        }
        self.rewire();

        info!(enabled = ?plan.enabled, chaos = ?plan.chaos, seed, "effects randomized");
        self.outbox.push(EngineEvent::Randomized {
            enabled: plan.enabled.clone(),
            chaos: plan.chaos,
        });

        RandomizeOutcome {
            enabled: plan.enabled,
            chaos: plan.chaos,
            envelope: plan.envelope,
        }
    }

    /// Factory parameters, everything off. The order is kept.
    pub fn reset(&mut self) {
        for unit in &mut self.units {
            unit.set_params(EffectParams::default_for(unit.kind()));
            unit.set_enabled(false);
            unit.reset();
        }
        self.rewire();
    }

    pub fn render(&mut self, left: &mut [f32], right: &mut [f32], ctx: &RenderCtx) {
        for kind in &self.active {
            self.units[kind.index()].process(left, right, ctx);
        }
    }

    /// Events produced since the last drain.
    pub fn drain_events(&mut self) -> std::vec::Drain<'_, EngineEvent> {
        self.outbox.drain(..)
    }
}

impl GraphNode for EffectsChain {
    fn render_block(&mut self, left: &mut [f32], right: &mut [f32], ctx: &RenderCtx) {
        self.render(left, right, ctx);
    }

    fn reset(&mut self) {
        for unit in &mut self.units {
            unit.reset();
        }
    }
}
