//! Hypothesis tests and effect sizes.
//!
//! All tests are two-sided and return the raw statistic and p-value; the
//! caller applies its own significance level. The location, independence
//! and normality tests run through `anofox-statistics` and `normality`;
//! degenerate inputs are rejected here first so the reason stays specific.

use super::descriptive::{is_constant, mean, median, sorted, variance};
use super::{StatsError, StatsResult};
use anofox_statistics::categorical::chisq_test;
use anofox_statistics::nonparametric::wilcoxon::mann_whitney_u as wilcoxon_rank_sum;
use anofox_statistics::parametric::ttest::{Alternative, TTestKind, t_test};
use normality::dagostino_k_squared;
use statrs::distribution::{ContinuousCDF, FisherSnedecor};

/// Largest group size (with no ties) that uses the exact Mann-Whitney distribution.
const MANN_WHITNEY_EXACT_LIMIT: usize = 8;

/// Statistic, p-value and degrees of freedom of a test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TestOutcome {
    pub statistic: f64,
    pub p_value: f64,
    pub dof: Option<f64>,
}

impl TestOutcome {
    fn new(statistic: f64, p_value: f64, dof: Option<f64>) -> StatsResult<Self> {
        if !statistic.is_finite() || !p_value.is_finite() {
            return Err(StatsError::Distribution(
                "test produced a non-finite result".to_string(),
            ));
        }
        Ok(Self {
            statistic,
            p_value: p_value.clamp(0.0, 1.0),
            dof,
        })
    }
}

fn dist_err(e: impl std::fmt::Display) -> StatsError {
    StatsError::Distribution(e.to_string())
}

fn backend_err(e: impl std::fmt::Display) -> StatsError {
    StatsError::TestFailed(e.to_string())
}

fn require(values: &[f64], required: usize) -> StatsResult<()> {
    if values.len() < required {
        return Err(StatsError::InsufficientData {
            required,
            actual: values.len(),
        });
    }
    Ok(())
}

fn require_groups(a: &[f64], b: &[f64]) -> StatsResult<()> {
    if a.is_empty() || b.is_empty() {
        return Err(StatsError::EmptyGroup(
            if a.is_empty() { "first" } else { "second" }.to_string(),
        ));
    }
    Ok(())
}

// =============================================================================
// Normality
// =============================================================================

/// D'Agostino-Pearson K² omnibus normality test.
///
/// K² follows a chi-square distribution with two degrees of freedom under
/// normality.
pub fn normality_k2(values: &[f64], min_samples: usize) -> StatsResult<TestOutcome> {
    require(values, min_samples.max(8))?;
    if is_constant(values) {
        return Err(StatsError::ZeroVariance);
    }

    let result = dagostino_k_squared(values.to_vec()).map_err(backend_err)?;
    TestOutcome::new(result.statistic, result.p_value, Some(2.0))
}

// =============================================================================
// Two-sample location tests
// =============================================================================

/// Pooled-variance (Student) two-sample t-test.
pub fn student_t_test(a: &[f64], b: &[f64]) -> StatsResult<TestOutcome> {
    require_groups(a, b)?;
    if a.len() + b.len() < 3 {
        return Err(StatsError::InsufficientData {
            required: 3,
            actual: a.len() + b.len(),
        });
    }

    let ss_a = variance(a).unwrap_or(0.0) * (a.len() - 1) as f64;
    let ss_b = variance(b).unwrap_or(0.0) * (b.len() - 1) as f64;
    if ss_a + ss_b <= 0.0 {
        return Err(StatsError::ZeroVariance);
    }

    let result = t_test(
        a,
        b,
        TTestKind::Student,
        Alternative::TwoSided,
        0.0,
        None,
    )
    .map_err(backend_err)?;
    TestOutcome::new(result.statistic, result.p_value, Some(result.df))
}

fn has_ties(a: &[f64], b: &[f64]) -> bool {
    let mut combined: Vec<f64> = a.iter().chain(b).copied().collect();
    combined.sort_by(f64::total_cmp);
    combined.windows(2).any(|w| w[0] == w[1])
}

/// Two-sided Mann-Whitney U test.
///
/// The reported statistic is U for the first group. When the smaller group
/// has at most eight values and there are no ties the exact distribution is
/// used, otherwise the normal approximation with tie and continuity
/// correction.
pub fn mann_whitney_u(a: &[f64], b: &[f64]) -> StatsResult<TestOutcome> {
    require_groups(a, b)?;
    let combined: Vec<f64> = a.iter().chain(b).copied().collect();
    if is_constant(&combined) {
        return Err(StatsError::ZeroVariance);
    }

    let exact = a.len().min(b.len()) <= MANN_WHITNEY_EXACT_LIMIT && !has_ties(a, b);
    let result = wilcoxon_rank_sum(a, b, Alternative::TwoSided, true, exact, None, None)
        .map_err(backend_err)?;
    TestOutcome::new(result.statistic, result.p_value, None)
}

// =============================================================================
// Variance homogeneity
// =============================================================================

/// Median-centered Levene (Brown-Forsythe) test across groups.
///
/// Runs a one-way ANOVA on absolute deviations from each group's median.
pub fn levene_median(groups: &[&[f64]]) -> StatsResult<TestOutcome> {
    if groups.len() < 2 {
        return Err(StatsError::InsufficientData {
            required: 2,
            actual: groups.len(),
        });
    }

    let mut z_values: Vec<Vec<f64>> = Vec::with_capacity(groups.len());
    for group in groups {
        require(group, 2)?;
        let group_median = median(&sorted(group)).unwrap_or(0.0);
        z_values.push(group.iter().map(|v| (v - group_median).abs()).collect());
    }

    let n_total: usize = z_values.iter().map(Vec::len).sum();
    let z_means: Vec<f64> = z_values
        .iter()
        .map(|values| values.iter().sum::<f64>() / values.len() as f64)
        .collect();
    let z_grand_mean: f64 = z_values.iter().flatten().sum::<f64>() / n_total as f64;

    let ss_between: f64 = z_values
        .iter()
        .zip(&z_means)
        .map(|(values, &m)| values.len() as f64 * (m - z_grand_mean).powi(2))
        .sum();
    let ss_within: f64 = z_values
        .iter()
        .zip(&z_means)
        .map(|(values, &m)| values.iter().map(|v| (v - m).powi(2)).sum::<f64>())
        .sum();

    let df1 = (groups.len() - 1) as f64;
    let df2 = (n_total - groups.len()) as f64;
    if df2 <= 0.0 {
        return Err(StatsError::InsufficientData {
            required: groups.len() + 1,
            actual: n_total,
        });
    }

    let ms_within = ss_within / df2;
    if ms_within <= 0.0 {
        return Err(StatsError::ZeroVariance);
    }
    let f_stat = (ss_between / df1) / ms_within;

    let f_dist = FisherSnedecor::new(df1, df2).map_err(dist_err)?;
    TestOutcome::new(f_stat, f_dist.sf(f_stat), Some(df1))
}

// =============================================================================
// Independence
// =============================================================================

/// Chi-square test of independence on a contingency table of counts.
///
/// Applies the Yates continuity correction when there is one degree of freedom.
pub fn chi_square_independence(table: &[Vec<usize>]) -> StatsResult<TestOutcome> {
    let rows = table.len();
    let cols = table.first().map(Vec::len).unwrap_or(0);
    if rows < 2 || cols < 2 || table.iter().any(|row| row.len() != cols) {
        return Err(StatsError::DegenerateTable { rows, cols });
    }

    let empty_row = table.iter().any(|row| row.iter().all(|&c| c == 0));
    let empty_col = (0..cols).any(|j| table.iter().all(|row| row[j] == 0));
    if empty_row || empty_col {
        return Err(StatsError::DegenerateTable { rows, cols });
    }

    let dof = ((rows - 1) * (cols - 1)) as f64;
    let counts: Vec<Vec<usize>> = table.to_vec();
    let result = chisq_test(&counts, dof == 1.0).map_err(backend_err)?;
    TestOutcome::new(result.statistic, result.p_value, Some(dof))
}

// =============================================================================
// Effect sizes
// =============================================================================

/// Cohen's d with the root-mean-square of the two group standard deviations.
///
/// Zero when that pooled deviation is zero or undefined, which includes a
/// group with a single value.
pub fn cohens_d(a: &[f64], b: &[f64]) -> StatsResult<f64> {
    let (mean_a, mean_b) = match (mean(a), mean(b)) {
        (Some(x), Some(y)) => (x, y),
        (None, _) => return Err(StatsError::EmptyGroup("first".to_string())),
        (_, None) => return Err(StatsError::EmptyGroup("second".to_string())),
    };
    let pooled = match (variance(a), variance(b)) {
        (Some(va), Some(vb)) => ((va + vb) / 2.0).sqrt(),
        _ => 0.0,
    };
    if pooled <= 0.0 || !pooled.is_finite() {
        return Ok(0.0);
    }
    Ok((mean_a - mean_b).abs() / pooled)
}

/// Cramér's V from the chi-square statistic reported for the table.
///
/// Zero when `n · (min(rows, cols) - 1)` is zero.
pub fn cramers_v(chi2: f64, n: usize, rows: usize, cols: usize) -> f64 {
    let denom = n as f64 * (rows.min(cols).saturating_sub(1)) as f64;
    if denom <= 0.0 {
        return 0.0;
    }
    (chi2 / denom).max(0.0).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use statrs::distribution::Normal;

    fn approx(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() < tol
    }

    // ========================================================================
    // t-test
    // ========================================================================

    #[test]
    fn test_student_t_known_value() {
        // scipy.stats.ttest_ind([1,2,3,4,5],[2,4,6,8,10]) -> t=-1.8974, p=0.0943
        let r = student_t_test(&[1.0, 2.0, 3.0, 4.0, 5.0], &[2.0, 4.0, 6.0, 8.0, 10.0]).unwrap();
        assert!(approx(r.statistic, -1.8974, 1e-4));
        assert!(approx(r.p_value, 0.0943, 1e-3));
        assert_eq!(r.dof, Some(8.0));
    }

    #[test]
    fn test_backend_errors_keep_their_message() {
        let err = backend_err("sample too small");
        assert_eq!(err, StatsError::TestFailed("sample too small".to_string()));
        assert_eq!(err.to_string(), "test failed: sample too small");
    }

    #[test]
    fn test_student_t_degenerate() {
        assert!(matches!(
            student_t_test(&[], &[1.0, 2.0]),
            Err(StatsError::EmptyGroup(_))
        ));
        assert_eq!(
            student_t_test(&[1.0, 1.0], &[1.0, 1.0]),
            Err(StatsError::ZeroVariance)
        );
        assert!(matches!(
            student_t_test(&[1.0], &[2.0]),
            Err(StatsError::InsufficientData { .. })
        ));
    }

    // ========================================================================
    // Mann-Whitney
    // ========================================================================

    #[test]
    fn test_mann_whitney_exact() {
        // Complete separation of 3 vs 3: U1 = 0, p = 2 / C(6,3) = 0.1
        let r = mann_whitney_u(&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0]).unwrap();
        assert_eq!(r.statistic, 0.0);
        assert!(approx(r.p_value, 0.1, 1e-12));
    }

    #[test]
    fn test_mann_whitney_small_vs_large_is_exact() {
        // 5 vs 50 without ties: U1 = 60, exact p = 0.0573296 (normal
        // approximation would give 0.0589767)
        let a = [2.5, 7.5, 12.5, 17.5, 22.5];
        let b: Vec<f64> = (1..=50).map(|i| i as f64).collect();
        let r = mann_whitney_u(&a, &b).unwrap();
        assert!(approx(r.statistic, 60.0, 1e-9));
        assert!(approx(r.p_value, 0.057_329_606_7, 1e-6));
        assert_eq!(r.dof, None);

        // 8 vs 8 is still exact: complete separation gives p = 2 / C(16, 8)
        let a: Vec<f64> = (1..=8).map(f64::from).collect();
        let b: Vec<f64> = (9..=16).map(f64::from).collect();
        let r = mann_whitney_u(&a, &b).unwrap();
        assert_eq!(r.statistic, 0.0);
        assert!(approx(r.p_value, 2.0 / 12_870.0, 1e-9));
    }

    #[test]
    fn test_mann_whitney_asymptotic_with_ties() {
        // Tie-corrected normal approximation with continuity correction:
        // U1 = 32, p = 4.6467e-6
        let a: Vec<f64> = (0..20).map(|i| (i % 5) as f64).collect();
        let b: Vec<f64> = (0..20).map(|i| (i % 5 + 3) as f64).collect();
        let r = mann_whitney_u(&a, &b).unwrap();
        assert!(approx(r.statistic, 32.0, 1e-9));
        assert!(approx(r.p_value, 4.646_748_5e-6, 1e-9));
    }

    #[test]
    fn test_has_ties() {
        assert!(!has_ties(&[1.0, 2.0], &[3.0, 4.0]));
        assert!(has_ties(&[1.0, 2.0], &[2.0, 4.0]));
        assert!(has_ties(&[1.0, 1.0], &[3.0]));
    }

    #[test]
    fn test_mann_whitney_identical_groups() {
        let r = mann_whitney_u(&[1.0, 2.0, 3.0, 4.0], &[1.0, 2.0, 3.0, 4.0]).unwrap();
        assert_eq!(r.statistic, 8.0);
        assert!(r.p_value > 0.9);
    }

    #[test]
    fn test_mann_whitney_constant_is_not_computable() {
        let r = mann_whitney_u(&[1.0; 10], &[1.0; 10]);
        assert_eq!(r, Err(StatsError::ZeroVariance));
    }

    // ========================================================================
    // Chi-square
    // ========================================================================

    #[test]
    fn test_chi_square_yates() {
        // scipy.stats.chi2_contingency([[10, 20], [20, 10]]) -> chi2=5.4, p=0.0201
        let r = chi_square_independence(&[vec![10, 20], vec![20, 10]]).unwrap();
        assert!(approx(r.statistic, 5.4, 1e-9));
        assert!(approx(r.p_value, 0.0201, 1e-3));
        assert_eq!(r.dof, Some(1.0));
    }

    #[test]
    fn test_chi_square_without_correction() {
        // 3x2 table, no correction: expected 10 everywhere
        let r = chi_square_independence(&[vec![15, 5], vec![10, 10], vec![5, 15]]).unwrap();
        assert!(approx(r.statistic, 10.0, 1e-9));
        assert_eq!(r.dof, Some(2.0));
    }

    #[test]
    fn test_chi_square_degenerate() {
        assert_eq!(
            chi_square_independence(&[vec![3, 4]]),
            Err(StatsError::DegenerateTable { rows: 1, cols: 2 })
        );
        assert!(chi_square_independence(&[]).is_err());
    }

    // ========================================================================
    // Levene
    // ========================================================================

    #[test]
    fn test_levene_equal_spread() {
        let a = [1.0, 2.0, 3.0, 4.0, 5.0];
        let b = [11.0, 12.0, 13.0, 14.0, 15.0];
        let r = levene_median(&[&a, &b]).unwrap();
        assert!(approx(r.statistic, 0.0, 1e-12));
        assert!(approx(r.p_value, 1.0, 1e-9));
    }

    #[test]
    fn test_levene_unequal_spread() {
        let a = [9.0, 10.0, 10.0, 10.0, 11.0, 9.5, 10.5, 10.0];
        let b = [0.0, 20.0, 5.0, 15.0, -10.0, 30.0, 2.0, 18.0];
        let r = levene_median(&[&a, &b]).unwrap();
        assert!(r.p_value < 0.05);
    }

    #[test]
    fn test_levene_degenerate() {
        assert!(matches!(
            levene_median(&[&[1.0], &[2.0, 3.0]]),
            Err(StatsError::InsufficientData { .. })
        ));
        assert_eq!(
            levene_median(&[&[1.0, 1.0], &[2.0, 2.0]]),
            Err(StatsError::ZeroVariance)
        );
    }

    // ========================================================================
    // Normality
    // ========================================================================

    #[test]
    fn test_normality_insufficient() {
        let r = normality_k2(&[1.0, 2.0, 3.0], 8);
        assert_eq!(
            r,
            Err(StatsError::InsufficientData {
                required: 8,
                actual: 3
            })
        );
    }

    #[test]
    fn test_normality_constant() {
        assert_eq!(normality_k2(&[2.0; 20], 8), Err(StatsError::ZeroVariance));
    }

    #[test]
    fn test_normality_reference_value() {
        // Squares 1..=30: K2 = 3.858201, p = 0.145279
        let values: Vec<f64> = (1..=30).map(|i| (i * i) as f64).collect();
        let r = normality_k2(&values, 8).unwrap();
        assert!(approx(r.statistic, 3.858_200_5, 1e-5));
        assert!(approx(r.p_value, 0.145_278_9, 1e-5));
        assert_eq!(r.dof, Some(2.0));
    }

    #[test]
    fn test_normality_detects_heavy_skew() {
        let values: Vec<f64> = (0..200).map(|i| (i as f64 / 20.0).exp()).collect();
        let r = normality_k2(&values, 8).unwrap();
        assert!(r.p_value < 0.05);
        assert!(r.statistic > 0.0);
    }

    #[test]
    fn test_normality_accepts_symmetric_bell() {
        // Quantiles of a standard normal at evenly spaced probabilities.
        let normal = Normal::new(0.0, 1.0).unwrap();
        let values: Vec<f64> = (1..=99)
            .map(|i| normal.inverse_cdf(i as f64 / 100.0))
            .collect();
        let r = normality_k2(&values, 8).unwrap();
        assert!(r.p_value > 0.05);
    }

    // ========================================================================
    // Effect sizes
    // ========================================================================

    #[test]
    fn test_cohens_d() {
        let d = cohens_d(&[1.0, 2.0, 3.0], &[3.0, 4.0, 5.0]).unwrap();
        assert!(approx(d, 2.0, 1e-12));
        // swapping groups leaves d unchanged
        assert_eq!(d, cohens_d(&[3.0, 4.0, 5.0], &[1.0, 2.0, 3.0]).unwrap());
    }

    #[test]
    fn test_cohens_d_zero_pooled() {
        assert_eq!(cohens_d(&[1.0, 1.0], &[2.0, 2.0]).unwrap(), 0.0);
        assert_eq!(cohens_d(&[1.0], &[2.0, 3.0]).unwrap(), 0.0);
        assert!(matches!(
            cohens_d(&[], &[2.0]),
            Err(StatsError::EmptyGroup(_))
        ));
    }

    #[test]
    fn test_cramers_v() {
        assert!(approx(cramers_v(5.4, 60, 2, 2), (0.09f64).sqrt(), 1e-12));
        assert_eq!(cramers_v(3.0, 0, 2, 2), 0.0);
        assert_eq!(cramers_v(3.0, 10, 1, 2), 0.0);
    }
}
