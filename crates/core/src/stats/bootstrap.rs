//! Percentile bootstrap for confidence intervals on a relative-difference
//! statistic between two independent samples.
//!
//! Adapted from a seedable resampling kernel originally built for
//! portfolio-metric confidence intervals: a `ChaCha8Rng`, optionally seeded
//! for reproducibility, drives `B` resampling replicates and the interval
//! is read off the sorted replicate distribution's percentiles.

use crate::config::BootstrapConfig;
use crate::types::ConfidenceInterval;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Runs a percentile bootstrap over the relative difference of `statistic`
/// applied to independently resampled variation/control arrays.
///
/// Each replicate draws `var_resample_size` values (with replacement) from
/// `a_v` and `ctrl_resample_size` values (with replacement) from `a_c`. Most
/// calculators pass matching sizes (`a_v.len()`/`a_c.len()`); AOV is the one
/// documented exception that resamples control at `a_v.len()` (see the
/// AOV calculator and the design notes on this asymmetry).
///
/// Returns a zero interval if either input array is empty.
pub fn bootstrap_relative_diff_ci<F>(
    a_v: &[f64],
    a_c: &[f64],
    var_resample_size: usize,
    ctrl_resample_size: usize,
    statistic: F,
    config: &BootstrapConfig,
) -> ConfidenceInterval
where
    F: Fn(&[f64]) -> f64,
{
    if a_v.is_empty() || a_c.is_empty() {
        return ConfidenceInterval::zero();
    }

    let mut rng = config
        .seed
        .map_or_else(ChaCha8Rng::from_entropy, ChaCha8Rng::seed_from_u64);

    let mut diffs = Vec::with_capacity(config.iterations);
    for _ in 0..config.iterations {
        let sample_v = resample(a_v, var_resample_size, &mut rng);
        let sample_c = resample(a_c, ctrl_resample_size, &mut rng);

        let stat_v = statistic(&sample_v);
        let stat_c = statistic(&sample_c);

        let diff = if stat_c == 0.0 {
            0.0
        } else {
            (stat_v - stat_c) / stat_c * 100.0
        };
        diffs.push(diff);
    }

    let (lower, upper) = percentile_ci(&mut diffs, config.confidence_level);
    ConfidenceInterval { lower, upper }
}

fn resample(data: &[f64], size: usize, rng: &mut ChaCha8Rng) -> Vec<f64> {
    (0..size).map(|_| data[rng.gen_range(0..data.len())]).collect()
}

/// Reads the `(alpha/2, 1 - alpha/2)` percentiles off a replicate
/// distribution, sorting it in place.
#[must_use]
pub fn percentile_ci(distribution: &mut [f64], confidence_level: f64) -> (f64, f64) {
    if distribution.is_empty() {
        return (0.0, 0.0);
    }
    distribution.sort_by(|a, b| a.partial_cmp(b).expect("NaN in bootstrap distribution"));
    if distribution.len() == 1 {
        return (distribution[0], distribution[0]);
    }

    let alpha = 1.0 - confidence_level;
    let n = distribution.len();
    let lower_idx = ((alpha / 2.0) * n as f64).floor() as usize;
    let upper_idx = ((1.0 - alpha / 2.0) * n as f64).ceil() as usize;
    let lower_idx = lower_idx.min(n - 1);
    let upper_idx = upper_idx.min(n - 1).max(lower_idx);

    (distribution[lower_idx], distribution[upper_idx])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mean(data: &[f64]) -> f64 {
        data.iter().sum::<f64>() / data.len() as f64
    }

    #[test]
    fn identical_distributions_center_near_zero() {
        let a_v = vec![100.0; 50];
        let a_c = vec![100.0; 50];
        let config = BootstrapConfig {
            iterations: 1000,
            confidence_level: 0.95,
            seed: Some(42),
        };
        let ci = bootstrap_relative_diff_ci(&a_v, &a_c, a_v.len(), a_c.len(), mean, &config);
        assert!((ci.lower - 0.0).abs() < 1e-9);
        assert!((ci.upper - 0.0).abs() < 1e-9);
    }

    #[test]
    fn scenario_s2_aov_ten_percent_uplift_fully_separated() {
        let a_v = vec![110.0; 50];
        let a_c = vec![100.0; 50];
        let config = BootstrapConfig {
            iterations: 1000,
            confidence_level: 0.95,
            seed: Some(7),
        };
        // AOV's documented asymmetry: control resampled at a_v.len().
        let ci = bootstrap_relative_diff_ci(&a_v, &a_c, a_v.len(), a_v.len(), mean, &config);
        assert!((ci.lower - 10.0).abs() < 1e-6);
        assert!((ci.upper - 10.0).abs() < 1e-6);
    }

    #[test]
    fn empty_input_returns_zero() {
        let config = BootstrapConfig::default();
        let ci = bootstrap_relative_diff_ci(&[], &[1.0], 1, 1, mean, &config);
        assert_eq!(ci, ConfidenceInterval::zero());
    }

    #[test]
    fn reproducible_with_fixed_seed() {
        let a_v = vec![12.0, 15.0, 9.0, 20.0, 11.0];
        let a_c = vec![10.0, 10.0, 11.0, 9.0, 12.0];
        let config = BootstrapConfig {
            iterations: 500,
            confidence_level: 0.95,
            seed: Some(123),
        };
        let ci1 = bootstrap_relative_diff_ci(&a_v, &a_c, a_v.len(), a_c.len(), mean, &config);
        let ci2 = bootstrap_relative_diff_ci(&a_v, &a_c, a_v.len(), a_c.len(), mean, &config);
        assert_eq!(ci1, ci2);
    }

    #[test]
    fn percentile_ci_single_element() {
        let mut d = vec![3.0];
        let (l, u) = percentile_ci(&mut d, 0.95);
        assert!((l - 3.0).abs() < f64::EPSILON);
        assert!((u - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn percentile_ci_empty() {
        let mut d: Vec<f64> = vec![];
        let (l, u) = percentile_ci(&mut d, 0.95);
        assert_eq!((l, u), (0.0, 0.0));
    }
}
