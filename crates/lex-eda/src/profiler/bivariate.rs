//! Feature versus outcome comparisons.
//!
//! Numeric features are compared across the two outcome groups with a pooled
//! t-test, a Mann-Whitney U test, a median-centered Levene test and Cohen's d.
//! Categorical features get a contingency table, a chi-square test of
//! independence and Cramér's V.

use super::overview::Outcome;
use crate::config::ProfilerConfig;
use crate::dataset::{Column, ColumnData};
use crate::error::EdaError;
use crate::stats::{
    StatsResult, TestOutcome, chi_square_independence, hypothesis, levene_median, mann_whitney_u,
    mean, median, sorted, std_dev, student_t_test,
};
use crate::types::{
    BivariateDetail, BivariateResult, Computation, ContingencyTable, EffectSize, GroupStats,
    LeveneResult, TestResult,
};
use std::collections::HashMap;
use tracing::warn;

/// Compare every non-outcome column against the outcome, in dataset order.
pub fn analyze_features(
    columns: &[Column],
    outcome: &Outcome<'_>,
    config: &ProfilerConfig,
) -> Vec<BivariateResult> {
    columns
        .iter()
        .filter(|c| c.name() != outcome.name())
        .map(|c| analyze_feature(c, outcome, config))
        .collect()
}

/// Compare one column against the outcome.
pub fn analyze_feature(
    column: &Column,
    outcome: &Outcome<'_>,
    config: &ProfilerConfig,
) -> BivariateResult {
    let detail = match column.data() {
        ColumnData::Numeric(values) => numeric_vs_outcome(column.name(), values, outcome, config),
        ColumnData::Categorical(values) => {
            categorical_vs_outcome(column.name(), values, outcome, config)
        }
    };
    BivariateResult {
        feature: column.name().to_string(),
        detail,
    }
}

fn test_result(
    name: &str,
    feature: &str,
    result: StatsResult<TestOutcome>,
    alpha: f64,
) -> Computation<TestResult> {
    match result {
        Ok(outcome) => Computation::Computed(TestResult {
            test: name.to_string(),
            statistic: outcome.statistic,
            p_value: outcome.p_value,
            significant: outcome.p_value < alpha,
            degrees_of_freedom: outcome.dof,
        }),
        Err(e) => {
            warn!("{} not computable for '{}': {}", name, feature, e);
            Computation::from(e)
        }
    }
}

/// Split non-missing values by outcome group.
fn split_by_outcome(values: &[Option<f64>], outcome: &Outcome<'_>) -> [Vec<f64>; 2] {
    let mut groups = [Vec::new(), Vec::new()];
    for (value, group) in values.iter().zip(&outcome.groups) {
        if let (Some(v), Some(g)) = (value, group) {
            groups[*g].push(*v);
        }
    }
    groups
}

fn group_stats(label: &str, values: &[f64]) -> GroupStats {
    GroupStats {
        label: label.to_string(),
        count: values.len(),
        mean: mean(values),
        median: median(&sorted(values)),
        std: std_dev(values),
    }
}

fn numeric_vs_outcome(
    name: &str,
    values: &[Option<f64>],
    outcome: &Outcome<'_>,
    config: &ProfilerConfig,
) -> BivariateDetail {
    if values.iter().flatten().any(|v| !v.is_finite()) {
        let error = EdaError::NonFiniteValues(name.to_string());
        warn!("Skipping outcome comparison: {}", error);
        return BivariateDetail::Failed {
            error: error.to_string(),
        };
    }

    let alpha = config.significance_level;
    let [g0, g1] = split_by_outcome(values, outcome);

    let levene = match levene_median(&[&g0, &g1]) {
        Ok(r) => Computation::Computed(LeveneResult {
            statistic: r.statistic,
            p_value: r.p_value,
            equal_variance: r.p_value > alpha,
        }),
        Err(e) => {
            warn!("levene not computable for '{}': {}", name, e);
            Computation::from(e)
        }
    };

    let effect_size: Computation<EffectSize> = hypothesis::cohens_d(&g0, &g1)
        .map(EffectSize::cohens_d)
        .into();

    BivariateDetail::Numeric {
        groups: vec![
            group_stats(&outcome.labels[0], &g0),
            group_stats(&outcome.labels[1], &g1),
        ],
        t_test: test_result("student_t", name, student_t_test(&g0, &g1), alpha),
        mann_whitney: test_result("mann_whitney_u", name, mann_whitney_u(&g0, &g1), alpha),
        levene,
        effect_size,
    }
}

/// Counts of feature value by outcome group over rows where both are present.
pub fn contingency_table(values: &[Option<String>], outcome: &Outcome<'_>) -> ContingencyTable {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut row_labels: Vec<String> = Vec::new();
    let mut counts: Vec<Vec<usize>> = Vec::new();
    let mut total = 0;

    for (value, group) in values.iter().zip(&outcome.groups) {
        let (Some(value), Some(group)) = (value, group) else {
            continue;
        };
        let row = *index.entry(value.as_str()).or_insert_with(|| {
            row_labels.push(value.clone());
            counts.push(vec![0; 2]);
            counts.len() - 1
        });
        counts[row][*group] += 1;
        total += 1;
    }

    ContingencyTable {
        row_labels,
        column_labels: outcome.labels.to_vec(),
        counts,
        total,
    }
}

fn categorical_vs_outcome(
    name: &str,
    values: &[Option<String>],
    outcome: &Outcome<'_>,
    config: &ProfilerConfig,
) -> BivariateDetail {
    let contingency = contingency_table(values, outcome);
    let chi = chi_square_independence(&contingency.counts);

    let cramers_v = match &chi {
        Ok(r) => hypothesis::cramers_v(
            r.statistic,
            contingency.total,
            contingency.row_labels.len(),
            contingency.column_labels.len(),
        ),
        Err(_) => 0.0,
    };

    BivariateDetail::Categorical {
        chi_square: test_result("chi_square", name, chi, config.significance_level),
        effect_size: EffectSize::cramers_v(cramers_v),
        contingency,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Dataset;
    use crate::profiler::overview::resolve_outcome;
    use crate::types::EffectMagnitude;

    fn run(ds: &Dataset) -> Vec<BivariateResult> {
        let config = ProfilerConfig::default();
        let outcome = resolve_outcome(ds, &config).unwrap().unwrap();
        analyze_features(ds.columns(), &outcome, &config)
    }

    #[test]
    fn test_numeric_feature_with_clear_shift() {
        let n = 40;
        let target: Vec<Option<f64>> = (0..n).map(|i| Some((i % 2) as f64)).collect();
        let x: Vec<Option<f64>> = (0..n)
            .map(|i| Some((i / 2) as f64 % 7.0 + if i % 2 == 1 { 20.0 } else { 0.0 }))
            .collect();
        let ds = Dataset::new(vec![
            Column::numeric("x", x),
            Column::numeric("target", target),
        ])
        .unwrap();

        let results = run(&ds);
        assert_eq!(results.len(), 1);
        match &results[0].detail {
            BivariateDetail::Numeric {
                groups,
                t_test,
                mann_whitney,
                levene,
                effect_size,
            } => {
                assert_eq!(groups[0].label, "0");
                assert_eq!(groups[1].label, "1");
                assert_eq!(groups[0].count, 20);
                assert!(t_test.value().unwrap().significant);
                assert!(mann_whitney.value().unwrap().significant);
                assert!(levene.value().unwrap().equal_variance);
                let d = effect_size.value().unwrap();
                assert_eq!(d.magnitude, EffectMagnitude::Large);
            }
            other => panic!("unexpected detail {:?}", other),
        }
    }

    #[test]
    fn test_empty_group_is_not_computable() {
        let ds = Dataset::new(vec![
            Column::numeric("x", vec![Some(1.0), Some(2.0), None, None]),
            Column::numeric("target", vec![Some(0.0), Some(0.0), Some(1.0), Some(1.0)]),
        ])
        .unwrap();

        match &run(&ds)[0].detail {
            BivariateDetail::Numeric {
                groups,
                t_test,
                mann_whitney,
                effect_size,
                ..
            } => {
                assert_eq!(groups[1].count, 0);
                assert_eq!(groups[1].mean, None);
                assert!(!t_test.is_computed());
                assert!(!mann_whitney.is_computed());
                assert!(!effect_size.is_computed());
            }
            other => panic!("unexpected detail {:?}", other),
        }
    }

    #[test]
    fn test_cohens_d_symmetric_under_label_swap() {
        let x: Vec<Option<f64>> = [1.0, 4.0, 2.0, 6.0, 3.0, 9.0, 2.5, 7.0]
            .iter()
            .copied()
            .map(Some)
            .collect();
        let t: Vec<Option<f64>> = (0..8).map(|i| Some((i % 2) as f64)).collect();
        let flipped: Vec<Option<f64>> = t.iter().map(|v| v.map(|b| 1.0 - b)).collect();

        let d_of = |target: Vec<Option<f64>>| {
            let ds = Dataset::new(vec![
                Column::numeric("x", x.clone()),
                Column::numeric("target", target),
            ])
            .unwrap();
            match &run(&ds)[0].detail {
                BivariateDetail::Numeric { effect_size, .. } => effect_size.value().unwrap().value,
                other => panic!("unexpected detail {:?}", other),
            }
        };

        let d = d_of(t);
        assert!(d >= 0.0);
        assert_eq!(d, d_of(flipped));
    }

    #[test]
    fn test_categorical_feature() {
        let mut sex = Vec::new();
        let mut target = Vec::new();
        for i in 0..60 {
            let t = if i < 30 { 0.0 } else { 1.0 };
            let s = if (i < 30 && i % 3 == 0) || (i >= 30 && i % 3 != 0) {
                "m"
            } else {
                "f"
            };
            sex.push(Some(s));
            target.push(Some(t));
        }
        let ds = Dataset::new(vec![
            Column::categorical("sex", sex),
            Column::numeric("target", target),
        ])
        .unwrap();

        match &run(&ds)[0].detail {
            BivariateDetail::Categorical {
                contingency,
                chi_square,
                effect_size,
            } => {
                assert_eq!(contingency.row_labels, vec!["m", "f"]);
                assert_eq!(contingency.counts, vec![vec![10, 20], vec![20, 10]]);
                assert_eq!(contingency.total, 60);
                let chi = chi_square.value().unwrap();
                assert!((chi.statistic - 5.4).abs() < 1e-9);
                assert!(chi.significant);
                assert!((effect_size.value - 0.3).abs() < 1e-9);
                assert!(effect_size.value >= 0.0);
            }
            other => panic!("unexpected detail {:?}", other),
        }
    }

    #[test]
    fn test_constant_categorical_is_not_computable() {
        let ds = Dataset::new(vec![
            Column::categorical("c", vec![Some("a"), Some("a"), Some("a"), Some("a")]),
            Column::numeric("target", vec![Some(0.0), Some(1.0), Some(0.0), Some(1.0)]),
        ])
        .unwrap();

        match &run(&ds)[0].detail {
            BivariateDetail::Categorical {
                chi_square,
                effect_size,
                ..
            } => {
                assert!(!chi_square.is_computed());
                assert_eq!(effect_size.value, 0.0);
                assert_eq!(effect_size.magnitude, EffectMagnitude::Negligible);
            }
            other => panic!("unexpected detail {:?}", other),
        }
    }

    #[test]
    fn test_non_finite_feature_fails_in_isolation() {
        let ds = Dataset::new(vec![
            Column::numeric("x", vec![Some(f64::INFINITY), Some(1.0)]),
            Column::numeric("y", vec![Some(2.0), Some(1.0)]),
            Column::numeric("target", vec![Some(0.0), Some(1.0)]),
        ])
        .unwrap();

        let results = run(&ds);
        assert!(matches!(results[0].detail, BivariateDetail::Failed { .. }));
        assert!(matches!(results[1].detail, BivariateDetail::Numeric { .. }));
    }
}
