//! Level detection and gain reduction.
//!
//! `EnvelopeFollower` tracks the peak level of a signal with separate attack
//! and release smoothing. `Compressor` feeds that level through a soft-knee
//! gain computer:
//!
//! ```text
//! below knee      no reduction
//! inside knee     quadratic blend
//! above knee      (threshold - level) · (1 - 1/ratio)
//! ```

use super::mix::{db_to_gain, gain_to_db};

#[derive(Debug, Clone)]
pub struct EnvelopeFollower {
    attack: f32,
    release: f32,
    level: f32,
}

impl EnvelopeFollower {
    pub fn new(attack: f32, release: f32) -> Self {
        Self {
            attack,
            release,
            level: 0.0,
        }
    }

    pub fn set_times(&mut self, attack: f32, release: f32) {
        self.attack = attack;
        self.release = release;
    }

    #[inline]
    pub fn process(&mut self, input: f32, sample_rate: f32) -> f32 {
        let input = input.abs();
        let time = if input > self.level {
            self.attack
        } else {
            self.release
        };
        let coef = (-1.0 / (time.max(1e-5) * sample_rate)).exp();
        self.level = input + coef * (self.level - input);
        self.level
    }

    pub fn level(&self) -> f32 {
        self.level
    }

    pub fn reset(&mut self) {
        self.level = 0.0;
    }
}

#[derive(Debug, Clone)]
pub struct Compressor {
    pub threshold_db: f32,
    pub ratio: f32,
    pub knee_db: f32,
    follower: EnvelopeFollower,
}

impl Compressor {
    pub fn new(threshold_db: f32, ratio: f32, attack: f32, release: f32) -> Self {
        Self {
            threshold_db,
            ratio: ratio.max(1.0),
            knee_db: 6.0,
            follower: EnvelopeFollower::new(attack, release),
        }
    }

    pub fn set_params(&mut self, threshold_db: f32, ratio: f32, attack: f32, release: f32) {
        self.threshold_db = threshold_db;
        self.ratio = ratio.max(1.0);
        self.follower.set_times(attack, release);
    }

    /// Gain reduction in dB (always <= 0) for an input level in dB.
    pub fn gain_reduction_db(&self, input_db: f32) -> f32 {
        let slope = 1.0 - 1.0 / self.ratio;
        let half_knee = self.knee_db / 2.0;
        let over = input_db - self.threshold_db;

        if over <= -half_knee {
            0.0
        } else if over >= half_knee || self.knee_db <= 0.0 {
            -over * slope
        } else {
            let x = over + half_knee;
            -slope * x * x / (2.0 * self.knee_db)
        }
    }

    /// Linear gain to apply for a detector sample (usually max(|l|, |r|)).
    #[inline]
    pub fn next_gain(&mut self, detector: f32, sample_rate: f32) -> f32 {
        let level = self.follower.process(detector, sample_rate);
        db_to_gain(self.gain_reduction_db(gain_to_db(level).max(-120.0)))
    }

    pub fn reset(&mut self) {
        self.follower.reset();
    }
}
