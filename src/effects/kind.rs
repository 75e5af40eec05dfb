use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The fixed universe of rack units. `ALL` is also the factory order.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EffectKind {
    Compressor,
    Eq3,
    BitCrusher,
    Distortion,
    AutoWah,
    AutoFilter,
    Phaser,
    Chorus,
    Tremolo,
    Vibrato,
    FreqShift,
    PitchShift,
    Delay,
    Reverb,
    Widener,
}

/// Broad families used to bias randomization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Dynamics,
    LoFi,
    Filter,
    Modulation,
    Pitch,
    Space,
}

impl EffectKind {
    pub const COUNT: usize = 15;

    pub const ALL: [EffectKind; Self::COUNT] = [
        EffectKind::Compressor,
        EffectKind::Eq3,
        EffectKind::BitCrusher,
        EffectKind::Distortion,
        EffectKind::AutoWah,
        EffectKind::AutoFilter,
        EffectKind::Phaser,
        EffectKind::Chorus,
        EffectKind::Tremolo,
        EffectKind::Vibrato,
        EffectKind::FreqShift,
        EffectKind::PitchShift,
        EffectKind::Delay,
        EffectKind::Reverb,
        EffectKind::Widener,
    ];

    /// Position in `ALL`, used to index per-kind storage.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Stable identifier used for persistence.
    pub fn id(&self) -> &'static str {
        match self {
            EffectKind::Compressor => "compressor",
            EffectKind::Eq3 => "eq3",
            EffectKind::BitCrusher => "bitcrusher",
            EffectKind::Distortion => "distortion",
            EffectKind::AutoWah => "autowah",
            EffectKind::AutoFilter => "autofilter",
            EffectKind::Phaser => "phaser",
            EffectKind::Chorus => "chorus",
            EffectKind::Tremolo => "tremolo",
            EffectKind::Vibrato => "vibrato",
            EffectKind::FreqShift => "freqshift",
            EffectKind::PitchShift => "pitchshift",
            EffectKind::Delay => "delay",
            EffectKind::Reverb => "reverb",
            EffectKind::Widener => "widener",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.id() == id)
    }

    pub fn category(&self) -> Category {
        match self {
            EffectKind::Compressor | EffectKind::Eq3 => Category::Dynamics,
            EffectKind::BitCrusher | EffectKind::Distortion => Category::LoFi,
            EffectKind::AutoWah | EffectKind::AutoFilter | EffectKind::Phaser => Category::Filter,
            EffectKind::Chorus | EffectKind::Tremolo | EffectKind::Vibrato => Category::Modulation,
            EffectKind::FreqShift | EffectKind::PitchShift => Category::Pitch,
            EffectKind::Delay | EffectKind::Reverb | EffectKind::Widener => Category::Space,
        }
    }
}

impl fmt::Display for EffectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}
