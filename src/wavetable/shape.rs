//! Time-domain shaping: normalize → resample → smooth.

/// Scale a series onto [-1, 1] using its own min and max.
///
/// A flat series (max == min) has no shape to keep and comes back as silence.
/// Non-finite values are skipped when finding the range and map to 0.0.
pub fn normalize(values: &[f64]) -> Vec<f32> {
    let (min, max) = values
        .iter()
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });

    let range = max - min;
    if !range.is_finite() || range <= 0.0 {
        return vec![0.0; values.len()];
    }

    values
        .iter()
        .map(|&v| {
            if v.is_finite() {
                (2.0 * (v - min) / range - 1.0) as f32
            } else {
                0.0
            }
        })
        .collect()
}

/// Stretch or squeeze to `target_len` samples by linear interpolation.
///
/// Output sample i reads source position `i · len / target_len`; the right
/// neighbour is clamped to the last source sample.
pub fn resample(source: &[f32], target_len: usize) -> Vec<f32> {
    let len = source.len();
    if len == 0 {
        return vec![0.0; target_len];
    }

    let step = len as f64 / target_len as f64;
    (0..target_len)
        .map(|i| {
            let pos = i as f64 * step;
            let lo = (pos.floor() as usize).min(len - 1);
            let hi = (lo + 1).min(len - 1);
            let frac = (pos - lo as f64) as f32;
            source[lo] + (source[hi] - source[lo]) * frac
        })
        .collect()
}

/// Circular 0.25 / 0.5 / 0.25 moving average, `passes` times.
///
/// Neighbours wrap around, matching the periodic nature of a wavetable.
pub fn smooth(table: &mut [f32], passes: usize) {
    let len = table.len();
    if len < 3 {
        return;
    }

    let mut scratch = vec![0.0f32; len];
    for _ in 0..passes {
        for (i, out) in scratch.iter_mut().enumerate() {
            let prev = table[(i + len - 1) % len];
            let next = table[(i + 1) % len];
            *out = 0.25 * prev + 0.5 * table[i] + 0.25 * next;
        }
        table.copy_from_slice(&scratch);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_series_normalizes_to_silence() {
        let out = normalize(&[50.0; 96]);
        assert_eq!(out.len(), 96);
        assert!(out.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn test_normalize_uses_full_range() {
        let out = normalize(&[100.0, 150.0, 200.0]);
        assert_eq!(out, vec![-1.0, 0.0, 1.0]);
    }

    #[test]
    fn test_normalize_ignores_non_finite() {
        let out = normalize(&[0.0, f64::NAN, 10.0, f64::INFINITY]);
        assert_eq!(out, vec![-1.0, 0.0, 1.0, 0.0]);
    }

    #[test]
    fn test_empty_series_stays_empty() {
        assert!(normalize(&[]).is_empty());
        assert_eq!(resample(&[], 4), vec![0.0; 4]);
    }

    #[test]
    fn test_resample_preserves_monotonic_ramp() {
        let ramp: Vec<f32> = (0..10).map(|i| i as f32 / 9.0).collect();
        let out = resample(&ramp, 64);

        assert_eq!(out.len(), 64);
        assert!(out.windows(2).all(|w| w[1] >= w[0]));
        for (i, &s) in out.iter().enumerate() {
            let expected = (i as f32 * 10.0 / 64.0).min(9.0) / 9.0;
            assert!((s - expected).abs() < 1e-5, "i={i}");
        }
    }

    #[test]
    fn test_resample_downsamples() {
        let source: Vec<f32> = (0..8).map(|i| i as f32).collect();
        assert_eq!(resample(&source, 4), vec![0.0, 2.0, 4.0, 6.0]);
    }

    #[test]
    fn test_smooth_wraps_around() {
        let mut table = vec![1.0, 0.0, 0.0, 0.0];
        smooth(&mut table, 1);
        assert_eq!(table, vec![0.5, 0.25, 0.0, 0.25]);
    }

    #[test]
    fn test_smooth_keeps_range_and_mean() {
        let mut table: Vec<f32> = (0..32).map(|i| if i % 2 == 0 { 1.0 } else { -1.0 }).collect();
        let mean_before: f32 = table.iter().sum::<f32>() / 32.0;
        smooth(&mut table, 3);
        let mean_after: f32 = table.iter().sum::<f32>() / 32.0;

        assert!(table.iter().all(|s| (-1.0..=1.0).contains(s)));
        assert!((mean_before - mean_after).abs() < 1e-6);
    }
}
