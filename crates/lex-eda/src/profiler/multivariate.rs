//! Correlation structure across numeric columns.

use crate::config::ProfilerConfig;
use crate::dataset::Column;
use crate::stats::{correlation_matrix, explained_variance};
use crate::types::{Computation, CorrelationPair, MultivariateResult, PcaSummary};
use tracing::{debug, warn};

/// Correlation matrix, strongly correlated pairs and, with more than two
/// columns, the PCA explained-variance summary.
///
/// Columns holding infinite values are left out.
pub fn analyze<'a>(
    columns: impl IntoIterator<Item = &'a Column>,
    config: &ProfilerConfig,
) -> MultivariateResult {
    let selected: Vec<&Column> = columns
        .into_iter()
        .filter(|c| {
            let finite = c.present_numeric().iter().all(|v| v.is_finite());
            if !finite {
                warn!("Excluding '{}' from correlation analysis: non-finite values", c.name());
            }
            finite
        })
        .collect();

    let names: Vec<String> = selected.iter().map(|c| c.name().to_string()).collect();
    let data: Vec<&[Option<f64>]> = selected.iter().filter_map(|c| c.as_numeric()).collect();

    let matrix = correlation_matrix(&data);
    let high_correlations = high_correlation_pairs(&names, &matrix, config.correlation_threshold);
    debug!(
        "Correlation matrix over {} columns, {} strong pairs",
        names.len(),
        high_correlations.len()
    );

    let pca = (data.len() > 2).then(|| pca_summary(&data, config.pca_variance_target));

    MultivariateResult {
        columns: names,
        correlation_matrix: matrix,
        high_correlations,
        pca,
    }
}

/// Pairs from the upper triangle with `|r|` above the threshold.
pub fn high_correlation_pairs(
    names: &[String],
    matrix: &[Vec<Option<f64>>],
    threshold: f64,
) -> Vec<CorrelationPair> {
    let mut pairs = Vec::new();
    for i in 0..names.len() {
        for j in (i + 1)..names.len() {
            if let Some(r) = matrix[i][j]
                && r.abs() > threshold
            {
                pairs.push(CorrelationPair {
                    column_a: names[i].clone(),
                    column_b: names[j].clone(),
                    correlation: r,
                });
            }
        }
    }
    pairs
}

fn pca_summary(data: &[&[Option<f64>]], target: f64) -> Computation<PcaSummary> {
    match explained_variance(data) {
        Ok(ev) => Computation::Computed(PcaSummary {
            components_needed: ev.components_for(target),
            explained_variance_ratio: ev.ratios,
            cumulative_variance: ev.cumulative,
            variance_target: target,
        }),
        Err(e) => {
            warn!("PCA not computable: {}", e);
            Computation::from(e)
        }
    }
}
