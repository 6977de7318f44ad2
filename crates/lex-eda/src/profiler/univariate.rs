//! Per-column summary statistics.

use super::outliers::OutlierDetector;
use crate::config::ProfilerConfig;
use crate::dataset::{Column, ColumnData};
use crate::error::EdaError;
use crate::stats::{
    kurtosis, mean, median, mode, normality_k2, quantile_sorted, skewness, sorted, std_dev,
    variance,
};
use crate::types::{
    CategoricalProfile, Computation, FeatureDetail, FeatureProfile, NormalityResult,
    NumericProfile, ValueFrequency,
};
use crate::utils::percentage;
use std::collections::HashMap;
use tracing::{debug, warn};

/// Name under which the normality test is reported.
const NORMALITY_TEST: &str = "dagostino_pearson";

/// Profile every column in dataset order.
pub fn profile_columns(columns: &[Column], config: &ProfilerConfig) -> Vec<FeatureProfile> {
    columns
        .iter()
        .map(|column| profile_column(column, config))
        .collect()
}

/// Profile one column. Failures are isolated into a `Failed` detail.
pub fn profile_column(column: &Column, config: &ProfilerConfig) -> FeatureProfile {
    let missing_count = column.missing_count();
    let detail = match column.data() {
        ColumnData::Numeric(values) => {
            let present: Vec<f64> = values.iter().flatten().copied().collect();
            match numeric_profile(column.name(), &present, config) {
                Ok(profile) => FeatureDetail::Numeric(profile),
                Err(e) => {
                    warn!("Column '{}' could not be profiled: {}", column.name(), e);
                    FeatureDetail::Failed {
                        error: e.to_string(),
                    }
                }
            }
        }
        ColumnData::Categorical(values) => {
            FeatureDetail::Categorical(categorical_profile(values, config.top_values))
        }
    };

    FeatureProfile {
        name: column.name().to_string(),
        missing_count,
        missing_percentage: percentage(missing_count, column.len()),
        detail,
    }
}

/// Numeric statistics over the non-missing values of a column.
pub fn numeric_profile(
    name: &str,
    values: &[f64],
    config: &ProfilerConfig,
) -> Result<NumericProfile, EdaError> {
    if values.iter().any(|v| !v.is_finite()) {
        return Err(EdaError::NonFiniteValues(name.to_string()));
    }

    let sorted_values = sorted(values);
    let min = sorted_values.first().copied();
    let max = sorted_values.last().copied();
    let q1 = quantile_sorted(&sorted_values, 0.25);
    let q3 = quantile_sorted(&sorted_values, 0.75);

    let normality = match normality_k2(values, config.min_normality_samples) {
        Ok(outcome) => Computation::Computed(NormalityResult {
            test: NORMALITY_TEST.to_string(),
            statistic: outcome.statistic,
            p_value: outcome.p_value,
            is_normal: outcome.p_value > config.significance_level,
        }),
        Err(e) => {
            debug!("Normality test skipped for '{}': {}", name, e);
            Computation::from(e)
        }
    };

    let outliers = OutlierDetector::new(config.iqr_multiplier)
        .with_max_values(config.max_outlier_values)
        .detect(name, values);

    Ok(NumericProfile {
        count: values.len(),
        mean: mean(values),
        median: median(&sorted_values),
        mode: mode(values),
        std: std_dev(values),
        variance: variance(values),
        min,
        max,
        range: min.zip(max).map(|(lo, hi)| hi - lo),
        q1,
        q3,
        iqr: q1.zip(q3).map(|(a, b)| b - a),
        skewness: skewness(values),
        kurtosis: kurtosis(values),
        normality,
        outliers,
    })
}

/// Frequency table and entropy of a categorical column.
///
/// Top values are ranked by count; ties keep first-seen order.
pub fn categorical_profile(values: &[Option<String>], top_values: usize) -> CategoricalProfile {
    let (counts, count) = value_counts(values);

    let entropy = counts
        .iter()
        .map(|(_, c)| {
            let p = *c as f64 / count as f64;
            p * (1.0 / p).log2()
        })
        .sum();

    let mut ranked: Vec<&(String, usize)> = counts.iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    let top = ranked
        .into_iter()
        .take(top_values)
        .map(|(value, c)| ValueFrequency {
            value: value.clone(),
            count: *c,
            percentage: percentage(*c, count),
        })
        .collect();

    CategoricalProfile {
        count,
        unique_values: counts.len(),
        top_values: top,
        entropy,
    }
}

/// Distinct values with their counts in first-seen order, plus the total.
pub(crate) fn value_counts(values: &[Option<String>]) -> (Vec<(String, usize)>, usize) {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<(String, usize)> = Vec::new();
    let mut total = 0;

    for value in values.iter().flatten() {
        total += 1;
        match index.get(value.as_str()) {
            Some(&i) => counts[i].1 += 1,
            None => {
                index.insert(value.as_str(), counts.len());
                counts.push((value.clone(), 1));
            }
        }
    }

    (counts, total)
}
