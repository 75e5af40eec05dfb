use thiserror::Error;

use crate::effects::EffectKind;

/// Failures while turning a sample series into a wavetable or spectrum.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WavetableError {
    #[error("FFT length {0} is not a power of two")]
    NotPowerOfTwo(usize),

    #[error("requested {requested} harmonics, a {len}-sample table resolves at most {}", .len / 2)]
    TooManyHarmonics { requested: usize, len: usize },

    #[error("buffer holds {got} samples, plan expects {expected}")]
    LengthMismatch { expected: usize, got: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SynthError {
    #[error("layer index {0} out of range (engine has {} layers)", crate::LAYER_COUNT)]
    InvalidLayer(usize),

    #[error(transparent)]
    Wavetable(#[from] WavetableError),
}

/// Rejected effects-rack mutations. The rack is left untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChainError {
    #[error("order has {got} entries, expected {expected}")]
    WrongLength { expected: usize, got: usize },

    #[error("effect `{}` appears more than once", .0.id())]
    Duplicate(EffectKind),

    #[error("effect `{}` is missing from the order", .0.id())]
    Missing(EffectKind),

    #[error("unknown effect id `{0}`")]
    UnknownId(String),
}

/// Failures reported by an order persistence backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("order store unavailable: {0}")]
    Unavailable(String),

    #[error("stored order rejected: {0}")]
    Rejected(#[from] ChainError),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NoteError {
    #[error("`{0}` is not a note name (expected e.g. C#4, Db4, A-1)")]
    Malformed(String),

    #[error("note `{0}` lies outside the MIDI range")]
    OutOfRange(String),
}
