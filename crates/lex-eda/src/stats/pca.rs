//! Principal component explained variance on standardized columns.

use super::{StatsError, StatsResult};
use nalgebra::{DMatrix, SymmetricEigen};

/// Explained-variance ratios of all principal components, largest first.
#[derive(Debug, Clone, PartialEq)]
pub struct ExplainedVariance {
    pub ratios: Vec<f64>,
    pub cumulative: Vec<f64>,
}

impl ExplainedVariance {
    /// Smallest 1-indexed component count whose cumulative ratio reaches `target`.
    pub fn components_for(&self, target: f64) -> usize {
        self.cumulative
            .iter()
            .position(|&c| c >= target - 1e-12)
            .map(|i| i + 1)
            .unwrap_or(self.cumulative.len())
    }
}

/// Standardize columns and decompose their covariance matrix.
///
/// Missing values are replaced by the column mean and columns without any
/// observed value are left out. Constant columns standardize to zero.
pub fn explained_variance(columns: &[&[Option<f64>]]) -> StatsResult<ExplainedVariance> {
    let observed: Vec<&[Option<f64>]> = columns
        .iter()
        .copied()
        .filter(|c| c.iter().any(Option::is_some))
        .collect();

    let n_rows = observed.first().map(|c| c.len()).unwrap_or(0);
    if n_rows < 2 || observed.is_empty() {
        return Err(StatsError::InsufficientData {
            required: 2,
            actual: n_rows,
        });
    }
    let n_cols = observed.len();

    let standardized: Vec<Vec<f64>> = observed.iter().map(|c| standardize(c)).collect();
    let data = DMatrix::from_fn(n_rows, n_cols, |i, j| standardized[j][i]);
    let covariance = (data.transpose() * &data) / (n_rows as f64 - 1.0);

    let mut eigenvalues: Vec<f64> = SymmetricEigen::new(covariance)
        .eigenvalues
        .iter()
        .map(|v| v.max(0.0))
        .collect();
    eigenvalues.sort_by(|a, b| b.total_cmp(a));

    let total: f64 = eigenvalues.iter().sum();
    if !(total > 0.0) {
        return Err(StatsError::ZeroVariance);
    }

    eigenvalues.truncate(n_rows.min(n_cols));
    let ratios: Vec<f64> = eigenvalues.iter().map(|v| v / total).collect();
    let cumulative = ratios
        .iter()
        .scan(0.0, |acc, r| {
            *acc += r;
            Some(*acc)
        })
        .collect();

    Ok(ExplainedVariance { ratios, cumulative })
}

fn standardize(values: &[Option<f64>]) -> Vec<f64> {
    let present: Vec<f64> = values.iter().flatten().copied().collect();
    let n = present.len() as f64;
    let mean = present.iter().sum::<f64>() / n;
    let imputed: Vec<f64> = values.iter().map(|v| v.unwrap_or(mean)).collect();

    let var = imputed.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / imputed.len() as f64;
    let std = var.sqrt();
    if !(std > 0.0) {
        return vec![0.0; imputed.len()];
    }
    imputed.iter().map(|v| (v - mean) / std).collect()
}
