//! Pearson correlation with pairwise-complete observations.

use super::descriptive::is_constant;
use anofox_statistics::correlation::pearson;

/// Pearson correlation over rows where both values are present.
///
/// `None` with fewer than three complete pairs, when either side is constant
/// or when the backend cannot produce an estimate.
pub fn pearson_pairwise(x: &[Option<f64>], y: &[Option<f64>]) -> Option<f64> {
    let (xs, ys): (Vec<f64>, Vec<f64>) = x
        .iter()
        .zip(y)
        .filter_map(|(a, b)| Some(((*a)?, (*b)?)))
        .unzip();
    if xs.len() < 3 || is_constant(&xs) || is_constant(&ys) {
        return None;
    }
    if xs.iter().chain(&ys).any(|v| !v.is_finite()) {
        return None;
    }

    let estimate = pearson(&xs, &ys, None).ok()?.estimate;
    estimate.is_finite().then(|| estimate.clamp(-1.0, 1.0))
}

fn has_spread(column: &[Option<f64>]) -> bool {
    let observed: Vec<f64> = column.iter().flatten().copied().collect();
    observed.len() >= 3
        && observed.iter().all(|v| v.is_finite())
        && !is_constant(&observed)
}

/// Symmetric correlation matrix over the given columns.
///
/// The diagonal is 1 for any column with at least three observed, non-constant
/// values and `None` otherwise.
pub fn correlation_matrix(columns: &[&[Option<f64>]]) -> Vec<Vec<Option<f64>>> {
    let size = columns.len();
    let mut matrix = vec![vec![None; size]; size];

    for i in 0..size {
        matrix[i][i] = has_spread(columns[i]).then_some(1.0);
        for j in (i + 1)..size {
            let r = pearson_pairwise(columns[i], columns[j]);
            matrix[i][j] = r;
            matrix[j][i] = r;
        }
    }

    matrix
}
