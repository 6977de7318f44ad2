//! Tabular data model consumed by the profiler.
//!
//! A [`Dataset`] is an ordered list of named [`Column`]s, each holding either
//! numeric or categorical values with explicit missingness. The kind of a
//! column is fixed when the dataset is built and never re-inspected.

mod loader;

pub use loader::load_csv;

use crate::error::{EdaError, Result, ResultExt};
use crate::utils::is_numeric_dtype;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Declared kind of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    Numeric,
    Categorical,
}

/// Values of a single column. `None` marks a missing value.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnData {
    Numeric(Vec<Option<f64>>),
    Categorical(Vec<Option<String>>),
}

/// A named column of the dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    name: String,
    data: ColumnData,
}

impl Column {
    /// Create a numeric column. `NaN` entries are treated as missing.
    pub fn numeric(name: impl Into<String>, values: Vec<Option<f64>>) -> Self {
        let values = values
            .into_iter()
            .map(|v| v.filter(|x| !x.is_nan()))
            .collect();
        Self {
            name: name.into(),
            data: ColumnData::Numeric(values),
        }
    }

    /// Create a categorical column.
    pub fn categorical<S: Into<String>>(name: impl Into<String>, values: Vec<Option<S>>) -> Self {
        Self {
            name: name.into(),
            data: ColumnData::Categorical(values.into_iter().map(|v| v.map(Into::into)).collect()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn data(&self) -> &ColumnData {
        &self.data
    }

    pub fn kind(&self) -> ColumnKind {
        match self.data {
            ColumnData::Numeric(_) => ColumnKind::Numeric,
            ColumnData::Categorical(_) => ColumnKind::Categorical,
        }
    }

    pub fn len(&self) -> usize {
        match &self.data {
            ColumnData::Numeric(v) => v.len(),
            ColumnData::Categorical(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether the value at `row` is missing.
    pub fn is_missing(&self, row: usize) -> bool {
        match &self.data {
            ColumnData::Numeric(v) => v.get(row).is_none_or(Option::is_none),
            ColumnData::Categorical(v) => v.get(row).is_none_or(Option::is_none),
        }
    }

    pub fn missing_count(&self) -> usize {
        match &self.data {
            ColumnData::Numeric(v) => v.iter().filter(|x| x.is_none()).count(),
            ColumnData::Categorical(v) => v.iter().filter(|x| x.is_none()).count(),
        }
    }

    /// Raw numeric values, or `None` for a categorical column.
    pub fn as_numeric(&self) -> Option<&[Option<f64>]> {
        match &self.data {
            ColumnData::Numeric(v) => Some(v),
            ColumnData::Categorical(_) => None,
        }
    }

    /// Raw categorical values, or `None` for a numeric column.
    pub fn as_categorical(&self) -> Option<&[Option<String>]> {
        match &self.data {
            ColumnData::Categorical(v) => Some(v),
            ColumnData::Numeric(_) => None,
        }
    }

    /// Non-missing numeric values in row order. Empty for categorical columns.
    pub fn present_numeric(&self) -> Vec<f64> {
        self.as_numeric()
            .map(|v| v.iter().flatten().copied().collect())
            .unwrap_or_default()
    }

    /// Value at `row` rendered as a label, used to group rows by outcome.
    pub(crate) fn label_at(&self, row: usize) -> Option<String> {
        match &self.data {
            ColumnData::Numeric(v) => v
                .get(row)
                .copied()
                .flatten()
                .map(crate::utils::format_label),
            ColumnData::Categorical(v) => v.get(row).cloned().flatten(),
        }
    }
}

/// An ordered collection of equally long, uniquely named columns.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Dataset {
    columns: Vec<Column>,
    n_rows: usize,
}

impl Dataset {
    /// Build a dataset, rejecting ragged columns and duplicate names.
    pub fn new(columns: Vec<Column>) -> Result<Self> {
        let n_rows = columns.first().map(Column::len).unwrap_or(0);
        let mut seen = HashSet::with_capacity(columns.len());

        for column in &columns {
            if !seen.insert(column.name()) {
                return Err(EdaError::DuplicateColumn(column.name().to_string()));
            }
            if column.len() != n_rows {
                return Err(EdaError::ColumnLengthMismatch {
                    column: column.name().to_string(),
                    expected: n_rows,
                    actual: column.len(),
                });
            }
        }

        Ok(Self { columns, n_rows })
    }

    /// Convert a polars frame.
    ///
    /// Integer and float columns become numeric (float `NaN` becomes missing).
    /// Every other dtype is cast to string and becomes categorical.
    pub fn from_dataframe(df: &DataFrame) -> Result<Self> {
        let mut columns = Vec::with_capacity(df.width());

        for col in df.get_columns() {
            let name = col.name().as_str();
            let series = col.as_materialized_series();

            let column = if is_numeric_dtype(series.dtype()) {
                let cast = series
                    .cast(&DataType::Float64)
                    .context(format!("Casting column '{}' to float", name))?;
                let values = cast
                    .f64()
                    .context(format!("Reading column '{}'", name))?
                    .into_iter()
                    .collect();
                Column::numeric(name, values)
            } else {
                let cast = series
                    .cast(&DataType::String)
                    .context(format!("Casting column '{}' to string", name))?;
                let values = cast
                    .str()
                    .context(format!("Reading column '{}'", name))?
                    .into_iter()
                    .map(|v| v.map(str::to_string))
                    .collect();
                Column {
                    name: name.to_string(),
                    data: ColumnData::Categorical(values),
                }
            };
            columns.push(column);
        }

        Self::new(columns)
    }

    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name() == name)
    }

    /// Look up a column, failing with `ColumnNotFound` when absent.
    pub fn require_column(&self, name: &str) -> Result<&Column> {
        self.column(name)
            .ok_or_else(|| EdaError::ColumnNotFound(name.to_string()))
    }

    /// Numeric columns in dataset order.
    pub fn numeric_columns(&self) -> impl Iterator<Item = &Column> {
        self.columns
            .iter()
            .filter(|c| c.kind() == ColumnKind::Numeric)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ========================================================================
    // Column
    // ========================================================================

    #[test]
    fn test_numeric_column_nan_is_missing() {
        let col = Column::numeric("x", vec![Some(1.0), Some(f64::NAN), None]);
        assert_eq!(col.kind(), ColumnKind::Numeric);
        assert_eq!(col.missing_count(), 2);
        assert_eq!(col.present_numeric(), vec![1.0]);
        assert!(col.is_missing(1));
    }

    #[test]
    fn test_numeric_column_keeps_infinity() {
        let col = Column::numeric("x", vec![Some(f64::INFINITY), Some(1.0)]);
        assert_eq!(col.missing_count(), 0);
        assert_eq!(col.present_numeric().len(), 2);
    }

    #[test]
    fn test_categorical_column() {
        let col = Column::categorical("sex", vec![Some("m"), None, Some("f")]);
        assert_eq!(col.kind(), ColumnKind::Categorical);
        assert_eq!(col.missing_count(), 1);
        assert!(col.present_numeric().is_empty());
        assert_eq!(col.label_at(2), Some("f".to_string()));
        assert_eq!(col.label_at(1), None);
    }

    #[test]
    fn test_numeric_label_formatting() {
        let col = Column::numeric("target", vec![Some(0.0), Some(1.0), Some(0.5)]);
        assert_eq!(col.label_at(0), Some("0".to_string()));
        assert_eq!(col.label_at(1), Some("1".to_string()));
        assert_eq!(col.label_at(2), Some("0.5".to_string()));
    }

    // ========================================================================
    // Dataset
    // ========================================================================

    #[test]
    fn test_dataset_new() {
        let ds = Dataset::new(vec![
            Column::numeric("a", vec![Some(1.0), Some(2.0)]),
            Column::categorical("b", vec![Some("x"), None]),
        ])
        .unwrap();
        assert_eq!(ds.n_rows(), 2);
        assert_eq!(ds.n_columns(), 2);
        assert_eq!(ds.numeric_columns().count(), 1);
        assert!(ds.column("b").is_some());
        assert!(ds.column("c").is_none());
    }

    #[test]
    fn test_dataset_rejects_length_mismatch() {
        let err = Dataset::new(vec![
            Column::numeric("a", vec![Some(1.0), Some(2.0)]),
            Column::numeric("b", vec![Some(1.0)]),
        ])
        .unwrap_err();
        assert!(matches!(
            err,
            EdaError::ColumnLengthMismatch {
                expected: 2,
                actual: 1,
                ..
            }
        ));
    }

    #[test]
    fn test_dataset_rejects_duplicate_names() {
        let err = Dataset::new(vec![
            Column::numeric("a", vec![Some(1.0)]),
            Column::numeric("a", vec![Some(2.0)]),
        ])
        .unwrap_err();
        assert_eq!(err.error_code(), "DUPLICATE_COLUMN");
    }

    #[test]
    fn test_require_column() {
        let ds = Dataset::new(vec![Column::numeric("a", vec![Some(1.0)])]).unwrap();
        assert!(ds.require_column("a").is_ok());
        assert_eq!(
            ds.require_column("target").unwrap_err().error_code(),
            "COLUMN_NOT_FOUND"
        );
    }

    #[test]
    fn test_from_dataframe() {
        let df = df! {
            "age" => &[Some(20i64), None, Some(40)],
            "score" => &[Some(1.5f64), Some(f64::NAN), Some(2.5)],
            "sex" => &[Some("m"), Some("f"), None],
            "flag" => &[true, false, true],
        }
        .unwrap();

        let ds = Dataset::from_dataframe(&df).unwrap();
        assert_eq!(ds.n_rows(), 3);

        let age = ds.column("age").unwrap();
        assert_eq!(age.kind(), ColumnKind::Numeric);
        assert_eq!(age.as_numeric().unwrap(), &[Some(20.0), None, Some(40.0)]);

        let score = ds.column("score").unwrap();
        assert_eq!(score.missing_count(), 1);

        let sex = ds.column("sex").unwrap();
        assert_eq!(sex.kind(), ColumnKind::Categorical);
        assert_eq!(sex.missing_count(), 1);

        let flag = ds.column("flag").unwrap();
        assert_eq!(flag.kind(), ColumnKind::Categorical);
        assert_eq!(flag.label_at(0), Some("true".to_string()));
    }
}
