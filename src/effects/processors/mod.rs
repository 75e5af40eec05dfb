//! Stereo processors behind each rack unit.
//!
//! Every processor is a [`GraphNode`] that also accepts its typed parameter
//! record. Parameters arrive already clamped; processors only derive their
//! coefficients from them.

use crate::graph::node::GraphNode;

use super::{EffectKind, EffectParams};

mod dynamics;
mod lofi;
mod modulation;
mod pitch;
mod space;
mod sweep;

pub use dynamics::{CompressorUnit, Eq3Unit};
pub use lofi::{BitCrusherUnit, DistortionUnit};
pub use modulation::{ChorusUnit, TremoloUnit, VibratoUnit};
pub use pitch::{FreqShiftUnit, PitchShiftUnit};
pub use space::{DelayUnit, ReverbUnit, WidenerUnit};
pub use sweep::{AutoFilterUnit, AutoWahUnit, PhaserUnit};

pub trait Effect: GraphNode {
    /// Adopt new parameters. Records of another kind are ignored.
    fn configure(&mut self, params: &EffectParams);
}

/// Fresh processor for `kind`, set to factory defaults.
pub fn build(kind: EffectKind, sample_rate: f32) -> Box<dyn Effect> {
    let mut effect: Box<dyn Effect> = match kind {
        EffectKind::Compressor => Box::new(CompressorUnit::new()),
        EffectKind::Eq3 => Box::new(Eq3Unit::new()),
        EffectKind::BitCrusher => Box::new(BitCrusherUnit::new()),
        EffectKind::Distortion => Box::new(DistortionUnit::new()),
        EffectKind::AutoWah => Box::new(AutoWahUnit::new()),
        EffectKind::AutoFilter => Box::new(AutoFilterUnit::new()),
        EffectKind::Phaser => Box::new(PhaserUnit::new()),
        EffectKind::Chorus => Box::new(ChorusUnit::new(sample_rate)),
        EffectKind::Tremolo => Box::new(TremoloUnit::new()),
        EffectKind::Vibrato => Box::new(VibratoUnit::new(sample_rate)),
        EffectKind::FreqShift => Box::new(FreqShiftUnit::new()),
        EffectKind::PitchShift => Box::new(PitchShiftUnit::new(sample_rate)),
        EffectKind::Delay => Box::new(DelayUnit::new(sample_rate)),
        EffectKind::Reverb => Box::new(ReverbUnit::new(sample_rate)),
        EffectKind::Widener => Box::new(WidenerUnit::new()),
    };
    effect.configure(&EffectParams::default_for(kind));
    effect
}
