//! Typed parameter records, one per effect kind.
//!
//! Every field carries a documented `[min, max]` range and a factory
//! default. Records are always stored clamped; randomization draws each
//! field uniformly from its range.

use rand::Rng;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::EffectKind;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamRange {
    pub min: f32,
    pub max: f32,
    pub default: f32,
}

impl ParamRange {
    pub const fn new(min: f32, max: f32, default: f32) -> Self {
        Self { min, max, default }
    }

    /// NaN falls back to the default.
    pub fn clamp(&self, value: f32) -> f32 {
        if value.is_nan() {
            self.default
        } else {
            value.clamp(self.min, self.max)
        }
    }

    pub fn contains(&self, value: f32) -> bool {
        (self.min..=self.max).contains(&value)
    }
}

macro_rules! param_record {
    (
        $(#[$meta:meta])*
        $name:ident {
            $($field:ident: ($min:expr, $max:expr, $default:expr)),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
        #[derive(Debug, Clone, Copy, PartialEq)]
        pub struct $name {
            $(pub $field: f32),+
        }

        impl $name {
            pub const RANGES: &'static [(&'static str, ParamRange)] = &[
                $((stringify!($field), ParamRange::new($min, $max, $default))),+
            ];

            pub fn clamped(self) -> Self {
                Self {
                    $($field: ParamRange::new($min, $max, $default).clamp(self.$field)),+
                }
            }

            pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
                Self {
                    $($field: rng.gen_range($min..=$max)),+
                }
            }

            pub fn get(&self, name: &str) -> Option<f32> {
                $(if name == stringify!($field) {
                    return Some(self.$field);
                })+
                None
            }

            /// Set one field by name, clamped. Unknown names return false.
            pub fn set(&mut self, name: &str, value: f32) -> bool {
                $(if name == stringify!($field) {
                    self.$field = ParamRange::new($min, $max, $default).clamp(value);
                    return true;
                })+
                false
            }

            pub fn fields(&self) -> Vec<(&'static str, f32)> {
                vec![$((stringify!($field), self.$field)),+]
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self {
                    $($field: $default),+
                }
            }
        }
    };
}

param_record! {
    /// Times in seconds.
    CompressorParams {
        threshold_db: (-60.0, 0.0, -24.0),
        ratio: (1.0, 20.0, 4.0),
        attack: (0.001, 0.1, 0.003),
        release: (0.01, 1.0, 0.25),
    }
}

param_record! {
    Eq3Params {
        low_db: (-12.0, 12.0, 0.0),
        mid_db: (-12.0, 12.0, 0.0),
        high_db: (-12.0, 12.0, 0.0),
        low_freq: (100.0, 800.0, 400.0),
        high_freq: (1500.0, 6000.0, 2500.0),
    }
}

param_record! {
    /// `downsample` is the sample-and-hold factor (1 = off).
    BitCrusherParams {
        bits: (1.0, 16.0, 8.0),
        downsample: (1.0, 16.0, 1.0),
        wet: (0.0, 1.0, 1.0),
    }
}

param_record! {
    DistortionParams {
        drive: (0.0, 1.0, 0.4),
        wet: (0.0, 1.0, 1.0),
    }
}

param_record! {
    AutoWahParams {
        base_freq: (50.0, 500.0, 100.0),
        octaves: (1.0, 8.0, 6.0),
        sensitivity_db: (-40.0, 0.0, 0.0),
        q: (1.0, 10.0, 2.0),
        wet: (0.0, 1.0, 1.0),
    }
}

param_record! {
    AutoFilterParams {
        rate: (0.1, 10.0, 1.0),
        base_freq: (100.0, 1000.0, 200.0),
        octaves: (1.0, 6.0, 2.6),
        depth: (0.0, 1.0, 1.0),
        wet: (0.0, 1.0, 1.0),
    }
}

param_record! {
    PhaserParams {
        rate: (0.1, 10.0, 0.5),
        octaves: (1.0, 6.0, 3.0),
        base_freq: (100.0, 1000.0, 350.0),
        feedback: (0.0, 0.9, 0.3),
        wet: (0.0, 1.0, 0.5),
    }
}

param_record! {
    ChorusParams {
        rate: (0.1, 5.0, 1.5),
        delay_ms: (2.0, 20.0, 3.5),
        depth: (0.0, 1.0, 0.7),
        wet: (0.0, 1.0, 0.5),
    }
}

param_record! {
    TremoloParams {
        rate: (1.0, 20.0, 10.0),
        depth: (0.0, 1.0, 0.5),
        wet: (0.0, 1.0, 1.0),
    }
}

param_record! {
    VibratoParams {
        rate: (1.0, 20.0, 5.0),
        depth: (0.0, 1.0, 0.1),
        wet: (0.0, 1.0, 1.0),
    }
}

param_record! {
    FreqShiftParams {
        shift_hz: (-500.0, 500.0, 0.0),
        wet: (0.0, 1.0, 1.0),
    }
}

param_record! {
    /// `window` is the grain length in seconds.
    PitchShiftParams {
        semitones: (-12.0, 12.0, 0.0),
        window: (0.03, 0.1, 0.1),
        wet: (0.0, 1.0, 1.0),
    }
}

param_record! {
    DelayParams {
        time: (0.05, 1.0, 0.25),
        feedback: (0.0, 0.9, 0.5),
        wet: (0.0, 1.0, 0.5),
    }
}

param_record! {
    /// `decay` is the approximate tail length in seconds.
    ReverbParams {
        decay: (0.5, 10.0, 1.5),
        damping: (0.0, 1.0, 0.5),
        wet: (0.0, 1.0, 0.5),
    }
}

param_record! {
    /// 0 = mono, 0.5 = unchanged, 1 = side doubled.
    WidenerParams {
        width: (0.0, 1.0, 0.5),
    }
}

/// Parameters of any unit, tagged by kind.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EffectParams {
    Compressor(CompressorParams),
    Eq3(Eq3Params),
    BitCrusher(BitCrusherParams),
    Distortion(DistortionParams),
    AutoWah(AutoWahParams),
    AutoFilter(AutoFilterParams),
    Phaser(PhaserParams),
    Chorus(ChorusParams),
    Tremolo(TremoloParams),
    Vibrato(VibratoParams),
    FreqShift(FreqShiftParams),
    PitchShift(PitchShiftParams),
    Delay(DelayParams),
    Reverb(ReverbParams),
    Widener(WidenerParams),
}

/// Run `$body` with `$p` bound to the inner record, whatever the variant.
macro_rules! with_record {
    ($value:expr, |$p:ident| $body:expr) => {
        match $value {
            EffectParams::Compressor($p) => $body,
            EffectParams::Eq3($p) => $body,
            EffectParams::BitCrusher($p) => $body,
            EffectParams::Distortion($p) => $body,
            EffectParams::AutoWah($p) => $body,
            EffectParams::AutoFilter($p) => $body,
            EffectParams::Phaser($p) => $body,
            EffectParams::Chorus($p) => $body,
            EffectParams::Tremolo($p) => $body,
            EffectParams::Vibrato($p) => $body,
            EffectParams::FreqShift($p) => $body,
            EffectParams::PitchShift($p) => $body,
            EffectParams::Delay($p) => $body,
            EffectParams::Reverb($p) => $body,
            EffectParams::Widener($p) => $body,
        }
    };
}

impl EffectParams {
    pub fn kind(&self) -> EffectKind {
        match self {
            EffectParams::Compressor(_) => EffectKind::Compressor,
            EffectParams::Eq3(_) => EffectKind::Eq3,
            EffectParams::BitCrusher(_) => EffectKind::BitCrusher,
            EffectParams::Distortion(_) => EffectKind::Distortion,
            EffectParams::AutoWah(_) => EffectKind::AutoWah,
            EffectParams::AutoFilter(_) => EffectKind::AutoFilter,
            EffectParams::Phaser(_) => EffectKind::Phaser,
            EffectParams::Chorus(_) => EffectKind::Chorus,
            EffectParams::Tremolo(_) => EffectKind::Tremolo,
            EffectParams::Vibrato(_) => EffectKind::Vibrato,
            EffectParams::FreqShift(_) => EffectKind::FreqShift,
            EffectParams::PitchShift(_) => EffectKind::PitchShift,
            EffectParams::Delay(_) => EffectKind::Delay,
            EffectParams::Reverb(_) => EffectKind::Reverb,
            EffectParams::Widener(_) => EffectKind::Widener,
        }
    }

    /// Factory defaults for `kind`.
    pub fn default_for(kind: EffectKind) -> Self {
        match kind {
            EffectKind::Compressor => EffectParams::Compressor(Default::default()),
            EffectKind::Eq3 => EffectParams::Eq3(Default::default()),
            EffectKind::BitCrusher => EffectParams::BitCrusher(Default::default()),
            EffectKind::Distortion => EffectParams::Distortion(Default::default()),
            EffectKind::AutoWah => EffectParams::AutoWah(Default::default()),
            EffectKind::AutoFilter => EffectParams::AutoFilter(Default::default()),
            EffectKind::Phaser => EffectParams::Phaser(Default::default()),
            EffectKind::Chorus => EffectParams::Chorus(Default::default()),
            EffectKind::Tremolo => EffectParams::Tremolo(Default::default()),
            EffectKind::Vibrato => EffectParams::Vibrato(Default::default()),
            EffectKind::FreqShift => EffectParams::FreqShift(Default::default()),
            EffectKind::PitchShift => EffectParams::PitchShift(Default::default()),
            EffectKind::Delay => EffectParams::Delay(Default::default()),
            EffectKind::Reverb => EffectParams::Reverb(Default::default()),
            EffectKind::Widener => EffectParams::Widener(Default::default()),
        }
    }

    /// Every field drawn uniformly from its range.
    pub fn random_for<R: Rng + ?Sized>(kind: EffectKind, rng: &mut R) -> Self {
        match kind {
            EffectKind::Compressor => EffectParams::Compressor(CompressorParams::random(rng)),
            EffectKind::Eq3 => EffectParams::Eq3(Eq3Params::random(rng)),
            EffectKind::BitCrusher => EffectParams::BitCrusher(BitCrusherParams::random(rng)),
            EffectKind::Distortion => EffectParams::Distortion(DistortionParams::random(rng)),
            EffectKind::AutoWah => EffectParams::AutoWah(AutoWahParams::random(rng)),
            EffectKind::AutoFilter => EffectParams::AutoFilter(AutoFilterParams::random(rng)),
            EffectKind::Phaser => EffectParams::Phaser(PhaserParams::random(rng)),
            EffectKind::Chorus => EffectParams::Chorus(ChorusParams::random(rng)),
            EffectKind::Tremolo => EffectParams::Tremolo(TremoloParams::random(rng)),
            EffectKind::Vibrato => EffectParams::Vibrato(VibratoParams::random(rng)),
            EffectKind::FreqShift => EffectParams::FreqShift(FreqShiftParams::random(rng)),
            EffectKind::PitchShift => EffectParams::PitchShift(PitchShiftParams::random(rng)),
            EffectKind::Delay => EffectParams::Delay(DelayParams::random(rng)),
            EffectKind::Reverb => EffectParams::Reverb(ReverbParams::random(rng)),
            EffectKind::Widener => EffectParams::Widener(WidenerParams::random(rng)),
        }
    }

    pub fn ranges(kind: EffectKind) -> &'static [(&'static str, ParamRange)] {
        match kind {
            EffectKind::Compressor => CompressorParams::RANGES,
            EffectKind::Eq3 => Eq3Params::RANGES,
            EffectKind::BitCrusher => BitCrusherParams::RANGES,
            EffectKind::Distortion => DistortionParams::RANGES,
            EffectKind::AutoWah => AutoWahParams::RANGES,
            EffectKind::AutoFilter => AutoFilterParams::RANGES,
            EffectKind::Phaser => PhaserParams::RANGES,
            EffectKind::Chorus => ChorusParams::RANGES,
            EffectKind::Tremolo => TremoloParams::RANGES,
            EffectKind::Vibrato => VibratoParams::RANGES,
            EffectKind::FreqShift => FreqShiftParams::RANGES,
            EffectKind::PitchShift => PitchShiftParams::RANGES,
            EffectKind::Delay => DelayParams::RANGES,
            EffectKind::Reverb => ReverbParams::RANGES,
            EffectKind::Widener => WidenerParams::RANGES,
        }
    }

    pub fn clamped(self) -> Self {
        match self {
            EffectParams::Compressor(p) => EffectParams::Compressor(p.clamped()),
            EffectParams::Eq3(p) => EffectParams::Eq3(p.clamped()),
            EffectParams::BitCrusher(p) => EffectParams::BitCrusher(p.clamped()),
            EffectParams::Distortion(p) => EffectParams::Distortion(p.clamped()),
            EffectParams::AutoWah(p) => EffectParams::AutoWah(p.clamped()),
            EffectParams::AutoFilter(p) => EffectParams::AutoFilter(p.clamped()),
            EffectParams::Phaser(p) => EffectParams::Phaser(p.clamped()),
            EffectParams::Chorus(p) => EffectParams::Chorus(p.clamped()),
            EffectParams::Tremolo(p) => EffectParams::Tremolo(p.clamped()),
            EffectParams::Vibrato(p) => EffectParams::Vibrato(p.clamped()),
            EffectParams::FreqShift(p) => EffectParams::FreqShift(p.clamped()),
            EffectParams::PitchShift(p) => EffectParams::PitchShift(p.clamped()),
            EffectParams::Delay(p) => EffectParams::Delay(p.clamped()),
            EffectParams::Reverb(p) => EffectParams::Reverb(p.clamped()),
            EffectParams::Widener(p) => EffectParams::Widener(p.clamped()),
        }
    }

    pub fn get(&self, name: &str) -> Option<f32> {
        with_record!(self, |p| p.get(name))
    }

    pub fn set(&mut self, name: &str, value: f32) -> bool {
        with_record!(self, |p| p.set(name, value))
    }

    pub fn fields(&self) -> Vec<(&'static str, f32)> {
        with_record!(self, |p| p.fields())
    }

    /// True when every field lies inside its documented range.
    pub fn in_range(&self) -> bool {
        self.fields()
            .iter()
            .zip(Self::ranges(self.kind()))
            .all(|((_, value), (_, range))| range.contains(*value))
    }
}
