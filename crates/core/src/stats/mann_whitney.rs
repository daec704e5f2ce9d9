//! Mann-Whitney U test (two-sided, normal approximation with tie and
//! continuity correction).
//!
//! Used for AOV, ARPU, total revenue, avg products, and revenue
//! distribution — every continuous-metric comparison in the calculator
//! layer, matching `scipy.stats.mannwhitneyu(..., alternative='two-sided')`'s
//! default asymptotic method.

/// Two-sided Mann-Whitney U p-value for samples `x` (variation) and `y` (control).
///
/// # Formula
/// Ranks are assigned to the pooled sample (ties receive the average rank
/// of the tied group). `U1 = sum(rank(x)) - n1(n1+1)/2`; the test
/// statistic is standardized against its null mean `n1*n2/2` and its
/// tie-corrected standard deviation, with a continuity correction of 0.5.
///
/// # Examples
/// ```
/// use abtest_core::stats::mann_whitney_u_p;
///
/// let x = vec![110.0; 50];
/// let y = vec![100.0; 50];
/// let p = mann_whitney_u_p(&x, &y);
/// assert!(p < 0.001);
/// ```
#[must_use]
pub fn mann_whitney_u_p(x: &[f64], y: &[f64]) -> f64 {
    let n1 = x.len();
    let n2 = y.len();
    if n1 == 0 || n2 == 0 {
        return 1.0;
    }

    let mut combined: Vec<(f64, bool)> = Vec::with_capacity(n1 + n2);
    combined.extend(x.iter().map(|&v| (v, true)));
    combined.extend(y.iter().map(|&v| (v, false)));
    combined.sort_by(|a, b| a.0.partial_cmp(&b.0).expect("NaN in Mann-Whitney input"));

    let mut ranks = vec![0.0; combined.len()];
    let mut tie_term = 0.0;
    let mut i = 0;
    while i < combined.len() {
        let mut j = i;
        while j + 1 < combined.len() && (combined[j + 1].0 - combined[i].0).abs() < f64::EPSILON {
            j += 1;
        }
        // Ranks are 1-based; a tied group [i, j] shares the average rank.
        let avg_rank = ((i + 1) + (j + 1)) as f64 / 2.0;
        for rank in ranks.iter_mut().take(j + 1).skip(i) {
            *rank = avg_rank;
        }
        let t = (j - i + 1) as f64;
        tie_term += t * t * t - t;
        i = j + 1;
    }

    let rank_sum_x: f64 = combined
        .iter()
        .zip(ranks.iter())
        .filter(|((_, is_x), _)| *is_x)
        .map(|(_, r)| r)
        .sum();

    let n1_f = n1 as f64;
    let n2_f = n2 as f64;
    let u1 = rank_sum_x - n1_f * (n1_f + 1.0) / 2.0;
    let mean_u = n1_f * n2_f / 2.0;

    let total = n1_f + n2_f;
    let variance = n1_f * n2_f / 12.0 * ((total + 1.0) - tie_term / (total * (total - 1.0).max(1.0)));
    if variance <= 0.0 {
        return 1.0;
    }
    let sigma = variance.sqrt();

    let diff = u1 - mean_u;
    let correction = if diff > 0.0 {
        -0.5
    } else if diff < 0.0 {
        0.5
    } else {
        0.0
    };
    let z = (diff + correction) / sigma;

    super::normal::two_sided_p_from_z(z)
}
