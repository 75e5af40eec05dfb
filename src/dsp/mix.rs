//! Signal mixing helpers.

/*
Summing uncorrelated signals adds their POWER, not their amplitude: N layers
at equal level come out roughly sqrt(N) times louder than one. Scaling the
sum by 1/sqrt(N) keeps perceived loudness steady as layers come and go.

    layers   plain sum   × 1/sqrt(N)
    1        1.0         1.0
    2        ~1.41       1.0
    3        ~1.73       1.0

Wet/dry blending is a linear crossfade: dry·(1 - mix) + wet·mix.
*/

/// Add `b · gain` into `a`.
#[inline]
pub fn sum_scaled_in_place(a: &mut [f32], b: &[f32], gain: f32) {
    debug_assert_eq!(a.len(), b.len());
    for (sa, &sb) in a.iter_mut().zip(b.iter()) {
        *sa += sb * gain;
    }
}

#[inline]
pub fn scale_in_place(buffer: &mut [f32], gain: f32) {
    for sample in buffer.iter_mut() {
        *sample *= gain;
    }
}

/// dry·(1 - mix) + wet·mix for a single sample.
#[inline]
pub fn blend_dry_wet(dry: f32, wet: f32, mix: f32) -> f32 {
    dry * (1.0 - mix) + wet * mix
}

/// Linear amplitude from decibels.
#[inline]
pub fn db_to_gain(db: f32) -> f32 {
    10.0f32.powf(db / 20.0)
}

/// Decibels from linear amplitude; silence maps to -inf.
#[inline]
pub fn gain_to_db(gain: f32) -> f32 {
    if gain <= 0.0 {
        f32::NEG_INFINITY
    } else {
        20.0 * gain.log10()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scaled_sum_accumulates() {
        let mut a = [1.0, 0.5];
        sum_scaled_in_place(&mut a, &[1.0, 1.0], 0.5);
        assert_eq!(a, [1.5, 1.0]);
    }

    #[test]
    fn test_blend_endpoints() {
        assert_eq!(blend_dry_wet(1.0, 0.0, 0.0), 1.0);
        assert_eq!(blend_dry_wet(1.0, 0.0, 1.0), 0.0);
        assert!((blend_dry_wet(1.0, 0.0, 0.3) - 0.7).abs() < 1e-6);
    }

    #[test]
    fn test_db_roundtrip() {
        for &db in &[-60.0, -6.0, 0.0, 6.0] {
            assert!((gain_to_db(db_to_gain(db)) - db).abs() < 1e-3);
        }
        assert_eq!(gain_to_db(0.0), f32::NEG_INFINITY);
    }
}
