//! Welch's t-test (unequal-variance two-sample), two-sided.
//!
//! No calculator in the metric layer uses this: every rate-typed metric
//! uses Fisher's exact test and every continuous metric uses Mann-Whitney
//! U. This mirrors the original service, which keeps a `metric_type='normal'`
//! branch in its generic confidence helper that no live caller selects.
//! Kept and tested because it is a documented part of the kernel surface.

/// Two-sided Welch's t-test p-value for samples `x` and `y`.
///
/// Uses the large-sample normal approximation to the t-distribution rather
/// than an exact Student's t CDF (no t-distribution is otherwise needed in
/// this crate), which is adequate for the sample sizes this kernel expects.
///
/// # Examples
/// ```
/// use abtest_core::stats::welch_t_test_p;
///
/// let x = vec![10.0, 11.0, 9.0, 10.5, 10.2];
/// let y = vec![10.0, 11.0, 9.0, 10.5, 10.2];
/// let p = welch_t_test_p(&x, &y);
/// assert!(p > 0.9);
/// ```
#[must_use]
pub fn welch_t_test_p(x: &[f64], y: &[f64]) -> f64 {
    let n1 = x.len();
    let n2 = y.len();
    if n1 < 2 || n2 < 2 {
        return 1.0;
    }

    let mean_x = mean(x);
    let mean_y = mean(y);
    let var_x = variance(x, mean_x);
    let var_y = variance(y, mean_y);

    let se_sq = var_x / n1 as f64 + var_y / n2 as f64;
    if se_sq <= 0.0 {
        return if (mean_x - mean_y).abs() < f64::EPSILON {
            1.0
        } else {
            0.0
        };
    }

    let t = (mean_x - mean_y) / se_sq.sqrt();
    super::normal::two_sided_p_from_z(t)
}

fn mean(data: &[f64]) -> f64 {
    data.iter().sum::<f64>() / data.len() as f64
}

fn variance(data: &[f64], mean: f64) -> f64 {
    if data.len() < 2 {
        return 0.0;
    }
    data.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (data.len() - 1) as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_samples_are_not_significant() {
        let x = vec![10.0, 11.0, 9.0, 10.5, 10.2];
        let p = welch_t_test_p(&x, &x);
        assert!(p > 0.9, "p was {p}");
    }

    #[test]
    fn separated_samples_are_significant() {
        let x = vec![10.0, 10.1, 9.9, 10.05, 9.95];
        let y = vec![20.0, 20.1, 19.9, 20.05, 19.95];
        let p = welch_t_test_p(&x, &y);
        assert!(p < 0.01, "p was {p}");
    }

    #[test]
    fn too_few_samples_returns_one() {
        assert!((welch_t_test_p(&[1.0], &[1.0, 2.0]) - 1.0).abs() < f64::EPSILON);
    }
}
