// Purpose: the stereo effects rack that sits between the synth and the output.
//
// - kind: the fixed set of units, their string ids and categories
// - params: typed parameter records with documented ranges
// - processors: the DSP behind each unit
// - chain: ordering, bypass, parameter edits, randomization
// - randomize: metrics-driven selection policy
// - persist: order storage seam

pub mod chain;
pub mod kind;
pub mod params;
pub mod persist;
pub mod processors;
pub mod randomize;
pub mod unit;

pub use chain::{EffectsChain, RandomizeOutcome};
pub use kind::{Category, EffectKind};
pub use params::{EffectParams, ParamRange};
pub use persist::{MemoryOrderStore, OrderStore};
pub use randomize::{chaos_envelope, MetricsConfig, SeriesMetrics};
pub use unit::EffectUnit;
