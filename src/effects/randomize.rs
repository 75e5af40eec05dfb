/*
Metrics-driven randomization
============================

A roll enables 3-5 units and redraws every unit's parameters from its
documented range. Without metrics the units are picked uniformly. With
metrics the pick is weighted by category:

    category      weight
    LoFi, Pitch   1 + 2·chaos
    Space, Mod    1 + 2·(1 - chaos) + time_in_range
    Filter        1 + average_level
    Dynamics      1

    chaos = 0.4·volatility + 0.3·cv + 0.3·rate_of_change

so a jumpy day leans toward crushed, detuned sounds and a steady day toward
ambient ones. The same chaos score shapes the shared envelope:

    chaos     attack   decay   sustain   release
    0.0       1.2 s    0.8 s   0.9       3.0 s
    1.0       5 ms     50 ms   0.2       0.1 s

Everything stochastic comes from one PCG32 stream seeded by the caller, so a
(metrics, seed) pair always gives the same result.
*/

use rand::{seq::SliceRandom, Rng, SeedableRng};
use rand_pcg::Pcg32;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::dsp::envelope::Adsr;

use super::{Category, EffectKind, EffectParams};

pub const MIN_ENABLED: usize = 3;
pub const MAX_ENABLED: usize = 5;

/// Target band and plotting scale used to normalize raw readings.
/// Defaults are glucose-style mg/dL values.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricsConfig {
    pub target_low: f64,
    pub target_high: f64,
    pub scale_min: f64,
    pub scale_max: f64,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            target_low: 70.0,
            target_high: 180.0,
            scale_min: 40.0,
            scale_max: 400.0,
        }
    }
}

/// Summary of a series, every field normalized to [0, 1].
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SeriesMetrics {
    pub volatility: f32,
    pub average_level: f32,
    pub time_in_range: f32,
    pub rate_of_change: f32,
    pub coefficient_of_variation: f32,
}

impl SeriesMetrics {
    pub fn new(
        volatility: f32,
        average_level: f32,
        time_in_range: f32,
        rate_of_change: f32,
        coefficient_of_variation: f32,
    ) -> Self {
        let unit = |v: f32| if v.is_finite() { v.clamp(0.0, 1.0) } else { 0.0 };
        Self {
            volatility: unit(volatility),
            average_level: unit(average_level),
            time_in_range: unit(time_in_range),
            rate_of_change: unit(rate_of_change),
            coefficient_of_variation: unit(coefficient_of_variation),
        }
    }

    /// Derive metrics from raw readings. Non-finite readings are skipped;
    /// an empty series gives all zeros.
    ///
    /// - volatility: standard deviation over a quarter of the scale span
    /// - average level: mean placed on the scale
    /// - time in range: fraction of readings inside the target band
    /// - rate of change: mean step size over a tenth of the scale span
    /// - cv: standard deviation over mean
    pub fn from_values(values: &[f64], config: &MetricsConfig) -> Self {
        let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
        if finite.is_empty() {
            return Self::default();
        }

        let n = finite.len() as f64;
        let span = (config.scale_max - config.scale_min).max(f64::EPSILON);
        let mean = finite.iter().sum::<f64>() / n;
        let variance = finite.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
        let std_dev = variance.sqrt();

        let in_range = finite
            .iter()
            .filter(|&&v| v >= config.target_low && v <= config.target_high)
            .count();

        let mean_step = if finite.len() > 1 {
            finite.windows(2).map(|w| (w[1] - w[0]).abs()).sum::<f64>() / (n - 1.0)
        } else {
            0.0
        };

        let cv = if mean > 0.0 { std_dev / mean } else { 0.0 };

        Self::new(
            (std_dev / (span / 4.0)) as f32,
            ((mean - config.scale_min) / span) as f32,
            (in_range as f64 / n) as f32,
            (mean_step / (span / 10.0)) as f32,
            cv as f32,
        )
    }

    pub fn chaos(&self) -> f32 {
        chaos_score(self)
    }
}

pub fn chaos_score(metrics: &SeriesMetrics) -> f32 {
    (0.4 * metrics.volatility
        + 0.3 * metrics.coefficient_of_variation
        + 0.3 * metrics.rate_of_change)
        .clamp(0.0, 1.0)
}

/// Envelope for a chaos score: calm is slow and sustained, chaos is short
/// and percussive. Linear in `chaos`.
pub fn chaos_envelope(chaos: f32) -> Adsr {
    let c = if chaos.is_finite() { chaos.clamp(0.0, 1.0) } else { 0.0 };
    let lerp = |calm: f32, wild: f32| calm + (wild - calm) * c;

    Adsr::new(lerp(1.2, 0.005), lerp(0.8, 0.05), lerp(0.9, 0.2), lerp(3.0, 0.1))
}

pub fn category_weight(category: Category, metrics: &SeriesMetrics) -> f32 {
    let chaos = metrics.chaos();
    match category {
        Category::LoFi | Category::Pitch => 1.0 + 2.0 * chaos,
        Category::Space | Category::Modulation => {
            1.0 + 2.0 * (1.0 - chaos) + metrics.time_in_range
        }
        Category::Filter => 1.0 + metrics.average_level,
        Category::Dynamics => 1.0,
    }
}

/// Everything one roll decides, before it is applied to a chain.
#[derive(Debug, Clone, PartialEq)]
pub struct RandomPlan {
    pub enabled: Vec<EffectKind>,
    /// One record per kind, in `EffectKind::ALL` order.
    pub params: Vec<EffectParams>,
    pub chaos: Option<f32>,
    pub envelope: Option<Adsr>,
}

pub fn plan(metrics: Option<&SeriesMetrics>, seed: u64) -> RandomPlan {
    let mut rng = Pcg32::seed_from_u64(seed);
    let count = rng.gen_range(MIN_ENABLED..=MAX_ENABLED);

    let enabled = match metrics {
        Some(m) => pick_weighted(&mut rng, count, m),
        None => pick_uniform(&mut rng, count),
    };

    let params = EffectKind::ALL
        .iter()
        .map(|&kind| EffectParams::random_for(kind, &mut rng))
        .collect();

    let chaos = metrics.map(SeriesMetrics::chaos);

    RandomPlan {
        enabled,
        params,
        chaos,
        envelope: chaos.map(chaos_envelope),
    }
}

fn pick_uniform<R: Rng + ?Sized>(rng: &mut R, count: usize) -> Vec<EffectKind> {
    EffectKind::ALL.choose_multiple(rng, count).copied().collect()
}

fn pick_weighted<R: Rng + ?Sized>(
    rng: &mut R,
    count: usize,
    metrics: &SeriesMetrics,
) -> Vec<EffectKind> {
    match EffectKind::ALL.choose_multiple_weighted(rng, count, |kind| {
        category_weight(kind.category(), metrics)
    }) {
        Ok(picked) => picked.copied().collect(),
        Err(err) => {
            warn!(%err, "weighted effect pick failed, falling back to uniform");
            pick_uniform(rng, count)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn calm() -> SeriesMetrics {
        SeriesMetrics::new(0.0, 0.3, 1.0, 0.0, 0.0)
    }

    fn wild() -> SeriesMetrics {
        SeriesMetrics::new(1.0, 0.7, 0.0, 1.0, 1.0)
    }

    #[test]
    fn test_chaos_weights_components() {
        let m = SeriesMetrics::new(0.5, 0.0, 0.0, 0.2, 1.0);
        assert!((chaos_score(&m) - (0.2 + 0.3 + 0.06)).abs() < 1e-6);
        assert_eq!(chaos_score(&calm()), 0.0);
        assert!((chaos_score(&wild()) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_envelope_endpoints_and_monotonicity() {
        let slow = chaos_envelope(0.0);
        let fast = chaos_envelope(1.0);
        assert!((slow.attack - 1.2).abs() < 1e-6 && (slow.release - 3.0).abs() < 1e-6);
        assert!((fast.attack - 0.005).abs() < 1e-6 && (fast.sustain - 0.2).abs() < 1e-6);

        let mid = chaos_envelope(0.5);
        assert!(mid.attack < slow.attack && mid.attack > fast.attack);
        assert!(mid.sustain < slow.sustain && mid.sustain > fast.sustain);
        assert_eq!(chaos_envelope(0.3), chaos_envelope(0.3));
    }

    #[test]
    fn test_plan_without_metrics_enables_three_to_five() {
        for seed in 0..200 {
            let plan = plan(None, seed);
            assert!((MIN_ENABLED..=MAX_ENABLED).contains(&plan.enabled.len()));
            assert!(plan.params.iter().all(EffectParams::in_range));
            assert_eq!(plan.chaos, None);
            assert_eq!(plan.envelope, None);

            let mut unique = plan.enabled.clone();
            unique.sort_by_key(|k| k.index());
            unique.dedup();
            assert_eq!(unique.len(), plan.enabled.len());
        }
    }

    #[test]
    fn test_same_seed_same_plan() {
        let m = wild();
        assert_eq!(plan(Some(&m), 9), plan(Some(&m), 9));
        assert_eq!(plan(None, 9), plan(None, 9));
    }

    #[test]
    fn test_chaos_biases_category_choice() {
        let count_in = |metrics: &SeriesMetrics, cats: &[Category]| -> usize {
            (0..400)
                .map(|seed| plan(Some(metrics), seed))
                .flat_map(|p| p.enabled)
                .filter(|k| cats.contains(&k.category()))
                .count()
        };

        let harsh = [Category::LoFi, Category::Pitch];
        let ambient = [Category::Space, Category::Modulation];

        assert!(count_in(&wild(), &harsh) > count_in(&calm(), &harsh));
        assert!(count_in(&calm(), &ambient) > count_in(&wild(), &ambient));
    }

    #[test]
    fn test_metrics_from_readings() {
        let config = MetricsConfig::default();
        let steady = SeriesMetrics::from_values(&[120.0; 50], &config);
        assert_eq!(steady.volatility, 0.0);
        assert_eq!(steady.time_in_range, 1.0);
        assert_eq!(steady.rate_of_change, 0.0);
        assert!((steady.average_level - (80.0 / 360.0)).abs() < 1e-6);

        let swings: Vec<f64> = (0..50).map(|i| if i % 2 == 0 { 60.0 } else { 300.0 }).collect();
        let wild = SeriesMetrics::from_values(&swings, &config);
        assert_eq!(wild.time_in_range, 0.0);
        assert!(wild.volatility > 0.9);
        assert_eq!(wild.rate_of_change, 1.0);
        assert!(wild.chaos() > steady.chaos());

        assert_eq!(SeriesMetrics::from_values(&[], &config), SeriesMetrics::default());
    }
}
