// Nonparametric comparison engine: omnibus + pairwise rank tests
//
// Per-trial scores from stochastic runs cannot be assumed normal or
// homoscedastic, so both tests are rank-based:
// - omnibus: Kruskal-Wallis H over >=3 cross-sections, tie-corrected,
//   p-value from the chi-squared survival function with k-1 df
// - pairwise: Wilcoxon rank-sum normal approximation (average ranks on
//   ties, no continuity correction), two-sided p-value
//
// The pairwise effect size is Glass's delta rather than Cohen's d: compared
// groups may have non-interchangeable variances, so the baseline group's
// sample stddev is the fixed reference scale across all comparisons.

use statrs::distribution::{ContinuousCDF, Normal};
use statrs::function::gamma::gamma_ur;

use crate::aggregate::{mean, sample_stddev};
use crate::error::{AnalysisError, Result};

/// Result of a rank-based k-sample test over >=3 cross-sections
#[derive(Debug, Clone, PartialEq)]
pub struct OmnibusResult {
    /// Kruskal-Wallis H statistic (tie-corrected)
    pub statistic: f64,

    /// Two-sided p-value under the null of a common distribution
    pub pvalue: f64,

    /// Number of cross-sections tested
    pub groups: usize,
}

/// Result of a rank-based two-sample test with standardized effect size
#[derive(Debug, Clone, PartialEq)]
pub struct PairwiseResult {
    /// Standardized rank-sum statistic (z) for the first section
    pub statistic: f64,

    /// Two-sided p-value
    pub pvalue: f64,

    /// Glass's delta: (mean(b) - mean(a)) / sample_stddev(a)
    ///
    /// Direction is fixed as second-vs-first; swapping the arguments keeps
    /// the p-value but switches the denominator to the other group.
    pub glass_delta: f64,
}

/// Kruskal-Wallis test over three or more cross-sections
///
/// # Errors
/// - `InsufficientGroups` with fewer than 3 sections
/// - `DegenerateSample` when a section is empty, or when every pooled value
///   is identical (the tie correction is zero and H is undefined)
///
/// # Example
/// ```
/// use cotejo::compare::omnibus_test;
///
/// let a = [10.0, 12.0, 11.0, 13.0];
/// let b = [20.0, 22.0, 21.0, 23.0]; // shifted
/// let c = [10.0, 12.0, 11.0, 13.0, 12.0];
///
/// let result = omnibus_test(&[&a, &b, &c]).unwrap();
/// assert!(result.pvalue < 0.05);
/// ```
pub fn omnibus_test(sections: &[&[f64]]) -> Result<OmnibusResult> {
    if sections.len() < 3 {
        return Err(AnalysisError::InsufficientGroups {
            actual: sections.len(),
        });
    }
    for (index, section) in sections.iter().enumerate() {
        if section.is_empty() {
            return Err(AnalysisError::DegenerateSample {
                reason: format!("cross-section {} is empty", index),
            });
        }
    }

    let pooled: Vec<f64> = sections.iter().flat_map(|s| s.iter().copied()).collect();
    let total = pooled.len() as f64;
    let ranks = average_ranks(&pooled);

    let mut h = 0.0;
    let mut offset = 0;
    for section in sections {
        let n = section.len();
        let rank_sum: f64 = ranks[offset..offset + n].iter().sum();
        h += rank_sum * rank_sum / n as f64;
        offset += n;
    }
    h = 12.0 / (total * (total + 1.0)) * h - 3.0 * (total + 1.0);

    let correction = tie_correction(&pooled);
    if correction == 0.0 {
        return Err(AnalysisError::DegenerateSample {
            reason: "all values identical across cross-sections".to_string(),
        });
    }
    h /= correction;
    h = h.max(0.0); // floating-point rounding can push a null H slightly negative

    let df = (sections.len() - 1) as f64;
    let pvalue = if h > 0.0 { gamma_ur(df / 2.0, h / 2.0) } else { 1.0 };

    Ok(OmnibusResult {
        statistic: h,
        pvalue,
        groups: sections.len(),
    })
}

/// Wilcoxon rank-sum test between two cross-sections, plus Glass's delta
///
/// `a` is the baseline: its sample stddev scales the effect size.
///
/// # Errors
/// - `DegenerateSample` when either section is empty or the baseline has
///   fewer than 2 values (sample stddev undefined)
/// - `ZeroVariance` when the baseline stddev is 0 — the delta is undefined
///   and must never surface as NaN or infinity
///
/// # Example
/// ```
/// use cotejo::compare::pairwise_test;
///
/// let a = [10.0, 12.0, 11.0, 13.0];
/// let b = [20.0, 22.0, 21.0, 23.0];
///
/// let result = pairwise_test(&a, &b).unwrap();
/// assert!(result.pvalue < 0.05);
/// assert!((result.glass_delta - 7.746).abs() < 0.001);
/// ```
pub fn pairwise_test(a: &[f64], b: &[f64]) -> Result<PairwiseResult> {
    if a.is_empty() || b.is_empty() {
        return Err(AnalysisError::DegenerateSample {
            reason: "cross-section is empty".to_string(),
        });
    }
    if a.len() < 2 {
        return Err(AnalysisError::DegenerateSample {
            reason: "baseline needs at least 2 values for a sample stddev".to_string(),
        });
    }

    let stddev_a = sample_stddev(a);
    if stddev_a == 0.0 {
        return Err(AnalysisError::ZeroVariance);
    }

    let n1 = a.len() as f64;
    let n2 = b.len() as f64;
    let total = n1 + n2;

    let pooled: Vec<f64> = a.iter().chain(b.iter()).copied().collect();
    let ranks = average_ranks(&pooled);
    let rank_sum: f64 = ranks[..a.len()].iter().sum();

    let expected = n1 * (total + 1.0) / 2.0;
    let spread = (n1 * n2 * (total + 1.0) / 12.0).sqrt();
    let z = (rank_sum - expected) / spread;

    let normal = Normal::standard();
    let pvalue = 2.0 * (1.0 - normal.cdf(z.abs()));

    Ok(PairwiseResult {
        statistic: z,
        pvalue,
        glass_delta: (mean(b) - mean(a)) / stddev_a,
    })
}

/// Ranks with ties assigned the average of their positions (1-based)
fn average_ranks(values: &[f64]) -> Vec<f64> {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&i, &j| {
        values[i]
            .partial_cmp(&values[j])
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut ranks = vec![0.0; values.len()];
    let mut i = 0;
    while i < order.len() {
        let mut j = i;
        while j + 1 < order.len() && values[order[j + 1]] == values[order[i]] {
            j += 1;
        }
        let average = (i + j) as f64 / 2.0 + 1.0;
        for k in i..=j {
            ranks[order[k]] = average;
        }
        i = j + 1;
    }
    ranks
}

/// Kruskal-Wallis tie correction: 1 - sum(t^3 - t) / (N^3 - N)
fn tie_correction(pooled: &[f64]) -> f64 {
    let mut sorted = pooled.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let mut ties = 0.0;
    let mut i = 0;
    while i < sorted.len() {
        let mut j = i;
        while j + 1 < sorted.len() && sorted[j + 1] == sorted[i] {
            j += 1;
        }
        let t = (j - i + 1) as f64;
        ties += t * t * t - t;
        i = j + 1;
    }

    let n = sorted.len() as f64;
    1.0 - ties / (n * n * n - n)
}
