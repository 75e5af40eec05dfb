// Purpose: voice pools, layering and note bookkeeping
// This layer sits above the dsp primitives and below the session

pub mod engine;
pub mod layer;
pub mod message;
pub mod voice;

pub use engine::SynthEngine;
pub use layer::{OscillatorLayer, VoiceId};
pub use message::{MessageReceiver, SynthMessage};
pub use voice::VoiceState;
