//! Standard normal CDF, shared by every kernel function that converts a
//! z-score into a two-sided p-value.

/// Approximation of the standard normal CDF using the Abramowitz and Stegun
/// formula (26.2.17). Accurate to about 1e-5.
#[must_use]
pub fn standard_normal_cdf(x: f64) -> f64 {
    if x < 0.0 {
        return 1.0 - standard_normal_cdf(-x);
    }

    let b1 = 0.319_381_530;
    let b2 = -0.356_563_782;
    let b3 = 1.781_477_937;
    let b4 = -1.821_255_978;
    let b5 = 1.330_274_429;
    let p = 0.231_641_9;

    let t = 1.0 / (1.0 + p * x);
    let t2 = t * t;
    let t3 = t2 * t;
    let t4 = t3 * t;
    let t5 = t4 * t;

    let pdf = (-x * x / 2.0).exp() / (2.0 * std::f64::consts::PI).sqrt();
    1.0 - pdf * (b1 * t + b2 * t2 + b3 * t3 + b4 * t4 + b5 * t5)
}

/// Two-sided p-value for a z statistic: `2 * (1 - Phi(|z|))`, clamped to `[0, 1]`.
#[must_use]
pub fn two_sided_p_from_z(z: f64) -> f64 {
    (2.0 * (1.0 - standard_normal_cdf(z.abs()))).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cdf_at_zero_is_one_half() {
        assert!((standard_normal_cdf(0.0) - 0.5).abs() < 1e-4);
    }

    #[test]
    fn cdf_symmetric() {
        let a = standard_normal_cdf(1.3);
        let b = standard_normal_cdf(-1.3);
        assert!((a + b - 1.0).abs() < 1e-8);
    }

    #[test]
    fn two_sided_p_from_zero_z_is_one() {
        assert!((two_sided_p_from_z(0.0) - 1.0).abs() < 1e-4);
    }

    #[test]
    fn two_sided_p_shrinks_with_larger_z() {
        assert!(two_sided_p_from_z(3.0) < two_sided_p_from_z(1.0));
    }
}
