//! Waveshaping and quantization.
//!
//! A waveshaper applies a transfer function to each sample. Low drive stays
//! in the near-linear region; higher drive pushes into the curve and adds
//! harmonics.
//!
//! Quantization (bit reduction) snaps samples onto `2^bits` levels. Paired
//! with sample-and-hold downsampling it gives the stepped, aliased lo-fi
//! sound of early samplers.

/// Amount-controlled waveshaper (0.0 = clean, 1.0 = heavy).
///
/// f(x) = (1 + k)·x / (1 + k·|x|), k = 50·amount. Unity gain at ±1 for every
/// amount, so sweeping the amount changes tone rather than level.
#[inline]
pub fn waveshape(sample: f32, amount: f32) -> f32 {
    let k = 50.0 * amount.clamp(0.0, 1.0);
    let x = sample.clamp(-1.0, 1.0);
    (1.0 + k) * x / (1.0 + k * x.abs())
}

/// Snap onto `2^bits` evenly spaced levels. Fractional bit depths are allowed.
#[inline]
pub fn quantize(sample: f32, bits: f32) -> f32 {
    let steps = 2.0f32.powf(bits.clamp(1.0, 24.0) - 1.0);
    (sample * steps).round() / steps
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_waveshape_clean_at_zero_amount() {
        for &x in &[-1.0, -0.3, 0.0, 0.5, 1.0] {
            assert!((waveshape(x, 0.0) - x).abs() < 1e-6);
        }
    }

    #[test]
    fn test_waveshape_keeps_full_scale() {
        assert!((waveshape(1.0, 0.8) - 1.0).abs() < 1e-6);
        assert!(waveshape(0.1, 0.8) > 0.5);
    }

    #[test]
    fn test_one_bit_quantize_is_three_level() {
        assert_eq!(quantize(0.2, 1.0), 0.0);
        assert_eq!(quantize(0.8, 1.0), 1.0);
        assert_eq!(quantize(-0.8, 1.0), -1.0);
    }
}
