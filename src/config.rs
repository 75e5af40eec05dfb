#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Engine-wide settings, fixed at construction time.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Render sample rate in Hz.
    pub sample_rate: f32,
    /// Wavetable length in samples. Must be a power of two.
    pub table_len: usize,
    /// Number of harmonic partials extracted from each wavetable.
    pub harmonic_count: usize,
    /// Passes of the circular 3-point smoother after resampling.
    pub smoothing_passes: usize,
    /// Fixed voice pool size of each oscillator layer.
    pub voices_per_layer: usize,
    /// Offset applied to every note start/release, in seconds.
    pub lookahead_secs: f32,
    /// User master volume (0.0 - 1.0), before layer gain compensation.
    pub user_volume: f32,
    /// Lowest master gain the compensation may produce, in dB.
    pub gain_floor_db: f32,
    /// Highest master gain the compensation may produce, in dB.
    pub gain_ceiling_db: f32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            sample_rate: 48_000.0,
            table_len: 2048,
            harmonic_count: 32,
            smoothing_passes: 2,
            voices_per_layer: 8,
            lookahead_secs: 0.01,
            user_volume: 0.8,
            gain_floor_db: -60.0,
            gain_ceiling_db: 0.0,
        }
    }
}

impl EngineConfig {
    pub fn with_sample_rate(mut self, sample_rate: f32) -> Self {
        self.sample_rate = sample_rate.max(1.0);
        self
    }

    pub fn with_voices_per_layer(mut self, voices: usize) -> Self {
        self.voices_per_layer = voices;
        self
    }

    pub fn with_table_len(mut self, table_len: usize) -> Self {
        self.table_len = table_len;
        self
    }

    pub fn with_harmonic_count(mut self, harmonic_count: usize) -> Self {
        self.harmonic_count = harmonic_count;
        self
    }

    pub fn with_user_volume(mut self, volume: f32) -> Self {
        self.user_volume = volume.clamp(0.0, 1.0);
        self
    }

    /// Lookahead converted to whole frames at the configured sample rate.
    pub fn lookahead_frames(&self) -> u64 {
        (self.lookahead_secs.max(0.0) * self.sample_rate).round() as u64
    }
}
