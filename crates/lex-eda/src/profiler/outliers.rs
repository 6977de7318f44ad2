//! IQR-based outlier detection.

use crate::config::thresholds::{IQR_MULTIPLIER, MAX_OUTLIER_VALUES};
use crate::dataset::{ColumnKind, Dataset};
use crate::error::{EdaError, Result};
use crate::stats::{quantile_sorted, sorted};
use crate::types::OutlierReport;
use tracing::{debug, warn};

/// Flags values outside `[Q1 - k·IQR, Q3 + k·IQR]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutlierDetector {
    multiplier: f64,
    max_values: usize,
}

impl Default for OutlierDetector {
    fn default() -> Self {
        Self::new(IQR_MULTIPLIER)
    }
}

impl OutlierDetector {
    pub fn new(multiplier: f64) -> Self {
        Self {
            multiplier,
            max_values: MAX_OUTLIER_VALUES,
        }
    }

    /// Limit how many outlier values are listed in a report.
    pub fn with_max_values(mut self, max_values: usize) -> Self {
        self.max_values = max_values;
        self
    }

    pub fn multiplier(&self) -> f64 {
        self.multiplier
    }

    /// Detect outliers in the non-missing values of one column.
    ///
    /// An empty input yields a zero count and undefined bounds.
    pub fn detect(&self, column: &str, values: &[f64]) -> OutlierReport {
        let sorted_values = sorted(values);
        let q1 = quantile_sorted(&sorted_values, 0.25);
        let q3 = quantile_sorted(&sorted_values, 0.75);

        let (lower, upper) = match (q1, q3) {
            (Some(q1), Some(q3)) => {
                let iqr = q3 - q1;
                (
                    Some(q1 - self.multiplier * iqr),
                    Some(q3 + self.multiplier * iqr),
                )
            }
            _ => (None, None),
        };

        let mut count = 0;
        let mut outlier_values = Vec::new();
        if let (Some(lo), Some(hi)) = (lower, upper) {
            for &v in values.iter().filter(|v| **v < lo || **v > hi) {
                count += 1;
                if outlier_values.len() < self.max_values {
                    outlier_values.push(v);
                }
            }
        }

        OutlierReport {
            column: column.to_string(),
            count,
            percentage: crate::utils::percentage(count, values.len()),
            lower_bound: lower,
            upper_bound: upper,
            min: sorted_values.first().copied(),
            max: sorted_values.last().copied(),
            multiplier: self.multiplier,
            outlier_values,
        }
    }

    /// Detect outliers for several numeric columns of a dataset.
    ///
    /// With `columns = None` every numeric column is scanned. Unknown names
    /// fail with `ColumnNotFound`; categorical columns are skipped.
    pub fn detect_columns(
        dataset: &Dataset,
        columns: Option<&[&str]>,
        multiplier: f64,
    ) -> Result<Vec<OutlierReport>> {
        if !(multiplier.is_finite() && multiplier > 0.0) {
            return Err(EdaError::InvalidConfig(format!(
                "IQR multiplier must be positive, got {}",
                multiplier
            )));
        }
        let detector = Self::new(multiplier);

        let selected: Vec<&crate::dataset::Column> = match columns {
            Some(names) => names
                .iter()
                .map(|name| dataset.require_column(name))
                .collect::<Result<_>>()?,
            None => dataset.numeric_columns().collect(),
        };

        let mut reports = Vec::with_capacity(selected.len());
        for column in selected {
            if column.kind() == ColumnKind::Categorical {
                debug!("Skipping categorical column '{}'", column.name());
                continue;
            }
            let values = column.present_numeric();
            if values.iter().any(|v| !v.is_finite()) {
                warn!(
                    "Skipping column '{}': contains non-finite values",
                    column.name()
                );
                continue;
            }
            reports.push(detector.detect(column.name(), &values));
        }

        Ok(reports)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Column;

    #[test]
    fn test_detect_basic() {
        let values = [1.0, 2.0, 3.0, 4.0, 5.0, 100.0];
        let report = OutlierDetector::default().detect("x", &values);

        // q1 = 2.25, q3 = 4.75, iqr = 2.5
        assert_eq!(report.lower_bound, Some(-1.5));
        assert_eq!(report.upper_bound, Some(8.5));
        assert_eq!(report.count, 1);
        assert_eq!(report.outlier_values, vec![100.0]);
        assert!((report.percentage - 100.0 / 6.0).abs() < 1e-12);
        assert_eq!(report.min, Some(1.0));
        assert_eq!(report.max, Some(100.0));
    }

    #[test]
    fn test_detect_empty() {
        let report = OutlierDetector::default().detect("x", &[]);
        assert_eq!(report.count, 0);
        assert_eq!(report.percentage, 0.0);
        assert_eq!(report.lower_bound, None);
        assert_eq!(report.min, None);
        assert!(report.outlier_values.is_empty());
    }

    #[test]
    fn test_outlier_values_keep_row_order_and_cap() {
        let mut values: Vec<f64> = vec![10.0; 40];
        values.extend([-500.0, 900.0, -300.0]);
        let report = OutlierDetector::new(1.5)
            .with_max_values(2)
            .detect("x", &values);
        assert_eq!(report.count, 3);
        assert_eq!(report.outlier_values, vec![-500.0, 900.0]);
    }

    #[test]
    fn test_containment() {
        let values: Vec<f64> = (0..50).map(|i| ((i * 37) % 23) as f64 * 1.7 - 5.0).collect();
        let report = OutlierDetector::new(0.5).detect("x", &values);
        let (lo, hi) = (report.lower_bound.unwrap(), report.upper_bound.unwrap());
        let outside = values.iter().filter(|v| **v < lo || **v > hi).count();
        assert_eq!(outside, report.count);
        for v in &report.outlier_values {
            assert!(*v < lo || *v > hi);
        }
    }

    #[test]
    fn test_detect_columns() {
        let ds = Dataset::new(vec![
            Column::numeric("a", vec![Some(1.0), Some(2.0), Some(3.0), Some(50.0)]),
            Column::categorical("b", vec![Some("x"), Some("y"), None, Some("x")]),
            Column::numeric("c", vec![None, Some(1.0), Some(1.0), Some(1.0)]),
        ])
        .unwrap();

        let all = OutlierDetector::detect_columns(&ds, None, 1.5).unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].column, "a");
        assert_eq!(all[1].column, "c");

        let some = OutlierDetector::detect_columns(&ds, Some(&["b", "a"][..]), 1.5).unwrap();
        assert_eq!(some.len(), 1);
        assert_eq!(some[0].column, "a");

        let err = OutlierDetector::detect_columns(&ds, Some(&["zzz"][..]), 1.5).unwrap_err();
        assert_eq!(err.error_code(), "COLUMN_NOT_FOUND");

        let err = OutlierDetector::detect_columns(&ds, None, 0.0).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_CONFIG");
    }
}
