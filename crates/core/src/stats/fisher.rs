//! Fisher's exact test on a 2x2 contingency table.
//!
//! Used for proportion comparisons (transaction rate, add-to-cart rate),
//! matching `scipy.stats.fisher_exact` in the service this crate reimplements.

/// Two-sided exact p-value for the 2x2 table `[[succ_v, fail_v], [succ_c, fail_c]]`.
///
/// # Formula
/// The hypergeometric probability of every table sharing the observed
/// row/column margins is computed exactly; the p-value is the sum of
/// probabilities no greater than the observed table's probability
/// (within a small relative tolerance), which is the standard two-sided
/// exact-test definition.
///
/// # Examples
/// ```
/// use abtest_core::stats::fisher_exact_p;
///
/// // A fully separated table is maximally significant.
/// let p = fisher_exact_p(10, 0, 0, 10);
/// assert!(p < 0.001);
///
/// // A perfectly balanced table is not significant.
/// let p = fisher_exact_p(5, 5, 5, 5);
/// assert!(p > 0.5);
/// ```
#[must_use]
pub fn fisher_exact_p(succ_v: i64, fail_v: i64, succ_c: i64, fail_c: i64) -> f64 {
    if succ_v < 0 || fail_v < 0 || succ_c < 0 || fail_c < 0 {
        return 1.0;
    }

    let row1 = succ_v + fail_v; // total variation
    let row2 = succ_c + fail_c; // total control
    let col1 = succ_v + succ_c; // total successes
    let n = row1 + row2;

    if n == 0 || row1 == 0 || row2 == 0 || col1 == 0 || col1 == n {
        return 1.0;
    }

    let lo = 0.max(col1 - row2);
    let hi = row1.min(col1);

    let ln_observed = hypergeom_ln_pmf(succ_v, row1, col1, n);
    let tolerance = 1e-7;

    let mut p_sum = 0.0;
    for a in lo..=hi {
        let ln_p = hypergeom_ln_pmf(a, row1, col1, n);
        if ln_p <= ln_observed + tolerance {
            p_sum += ln_p.exp();
        }
    }

    p_sum.clamp(0.0, 1.0)
}

/// ln P(a successes in `row1` draws from a population of `n` with `col1` total successes).
fn hypergeom_ln_pmf(a: i64, row1: i64, col1: i64, n: i64) -> f64 {
    ln_choose(row1, a) + ln_choose(n - row1, col1 - a) - ln_choose(n, col1)
}

fn ln_choose(n: i64, k: i64) -> f64 {
    if k < 0 || k > n {
        return f64::NEG_INFINITY;
    }
    ln_factorial(n) - ln_factorial(k) - ln_factorial(n - k)
}

fn ln_factorial(n: i64) -> f64 {
    (1..=n).map(|x| (x as f64).ln()).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn balanced_table_not_significant() {
        let p = fisher_exact_p(5, 5, 5, 5);
        assert!((p - 1.0).abs() < 1e-9, "p was {p}");
    }

    #[test]
    fn fully_separated_table_is_significant() {
        let p = fisher_exact_p(10, 0, 0, 10);
        assert!(p < 0.001, "p was {p}");
    }

    #[test]
    fn scenario_s1_transaction_rate() {
        // 120 successes / 1000 users (880 failures) vs 100 / 1000 (900 failures)
        let p = fisher_exact_p(120, 880, 100, 900);
        let confidence = (1.0 - p) * 100.0;
        assert!((85.0..=90.0).contains(&confidence), "confidence was {confidence}");
    }

    #[test]
    fn zero_total_returns_one() {
        assert!((fisher_exact_p(0, 0, 0, 0) - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn classic_tea_tasting_example() {
        // Fisher's original 2x2: [[3,1],[1,3]] -> p = 0.485714...
        let p = fisher_exact_p(3, 1, 1, 3);
        assert!((p - 0.485_714_285_714).abs() < 1e-6, "p was {p}");
    }
}
