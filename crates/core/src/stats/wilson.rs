//! Wilson-style confidence interval on the *relative* difference of two
//! proportions.
//!
//! This is distinct from the classic single-proportion Wilson score
//! interval: it reports a percent interval around `diff_rel = (p_v - p_c)
//! / p_c * 100`, built from the unpooled standard error of the proportion
//! difference. Used for add-to-cart rate, transaction rate, and revenue
//! distribution buckets.

use crate::types::ConfidenceInterval;

/// 95% Wilson-style interval on the relative difference of two proportions.
///
/// # Formula
/// ```text
/// p_v = s_v / n_v, p_c = s_c / n_c
/// diff_rel = (p_v - p_c) / p_c * 100
/// se = sqrt(p_v(1-p_v)/n_v + p_c(1-p_c)/n_c)
/// margin = 1.96 * se * 100
/// ```
///
/// # Examples
/// ```
/// use abtest_core::stats::wilson_relative_diff_ci;
///
/// let ci = wilson_relative_diff_ci(330.0, 1000.0, 300.0, 1000.0);
/// assert!(ci.lower < 20.0 && ci.upper > 20.0);
/// ```
#[must_use]
pub fn wilson_relative_diff_ci(s_v: f64, n_v: f64, s_c: f64, n_c: f64) -> ConfidenceInterval {
    if n_v <= 0.0 || n_c <= 0.0 {
        return ConfidenceInterval::zero();
    }

    let p_v = s_v / n_v;
    let p_c = s_c / n_c;

    if p_c == 0.0 {
        return ConfidenceInterval::zero();
    }

    let diff_rel = (p_v - p_c) / p_c * 100.0;
    let se = (p_v * (1.0 - p_v) / n_v + p_c * (1.0 - p_c) / n_c).sqrt();
    let margin = 1.96 * se * 100.0;

    ConfidenceInterval {
        lower: diff_rel - margin,
        upper: diff_rel + margin,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scenario_s4_straddles_five_percent_uplift() {
        // Control: 2000/10000=0.20, V1: 2100/10000=0.21 -> uplift = 5%
        let ci = wilson_relative_diff_ci(2100.0, 10000.0, 2000.0, 10000.0);
        assert!(ci.lower < 5.0 && ci.upper > 5.0, "ci was {ci:?}");

        let se = (0.21_f64 * 0.79 / 10000.0 + 0.2 * 0.8 / 10000.0).sqrt();
        let expected_margin = 1.96 * se * 100.0;
        let width = ci.upper - ci.lower;
        assert!((width - 2.0 * expected_margin).abs() < 1e-6, "width was {width}");
    }

    #[test]
    fn zero_control_rate_returns_zero() {
        let ci = wilson_relative_diff_ci(5.0, 100.0, 0.0, 100.0);
        assert_eq!(ci, ConfidenceInterval::zero());
    }

    #[test]
    fn zero_users_returns_zero() {
        let ci = wilson_relative_diff_ci(0.0, 0.0, 0.0, 0.0);
        assert_eq!(ci, ConfidenceInterval::zero());
    }

    #[test]
    fn equal_rates_center_on_zero() {
        let ci = wilson_relative_diff_ci(300.0, 1000.0, 300.0, 1000.0);
        assert!(ci.lower < 0.0 && ci.upper > 0.0);
        assert!((ci.lower + ci.upper).abs() < 1e-9);
    }
}
